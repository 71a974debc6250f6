pub mod excel;
pub mod types;
