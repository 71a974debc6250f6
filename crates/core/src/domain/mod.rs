pub mod diagnosis;
pub mod event;
pub mod metrics;
pub mod money;
