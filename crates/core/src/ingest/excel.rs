use crate::ingest::types::{SalesRow, StockRow};
use anyhow::Context;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDate;
use std::io::Cursor;

/// Both exports carry two header rows before the data.
const HEADER_ROWS: usize = 2;

/// Offset between the Excel date serial epoch and the Unix epoch, in days.
const EXCEL_EPOCH_OFFSET_DAYS: f64 = 25_569.0;

// Positional column contract with the external export format.
const STOCK_COL_CODE: usize = 1;
const STOCK_COL_NAME: usize = 2;
const STOCK_COL_TAG: usize = 3;
const STOCK_COL_PLAN_TYPE: usize = 4;
const STOCK_COL_COST: usize = 7;
const STOCK_COL_STOCK: usize = 8;

const SALES_COL_DATE: usize = 0;
const SALES_COL_CODE: usize = 1;
const SALES_COL_COLOR: usize = 4;
const SALES_COL_SIZE: usize = 5;
const SALES_COL_TAG: usize = 6;
const SALES_COL_QTY: usize = 7;
const SALES_COL_UNIT_COST: usize = 8;
const SALES_COL_AMOUNT: usize = 9;

/// Parse the inventory export. Rows without a product code are dropped.
pub fn parse_stock_rows(bytes: &[u8]) -> anyhow::Result<Vec<StockRow>> {
    let range = first_sheet(bytes).context("failed to read inventory workbook")?;

    let mut out = Vec::new();
    for row in range.rows().skip(HEADER_ROWS) {
        let code = cell_str(row, STOCK_COL_CODE);
        if code.is_empty() {
            continue;
        }
        let plan_type = cell_str(row, STOCK_COL_PLAN_TYPE);
        out.push(StockRow {
            code,
            name: cell_str(row, STOCK_COL_NAME),
            tag_price: cell_i64(row, STOCK_COL_TAG),
            plan_type: if plan_type.is_empty() {
                "정상".to_string()
            } else {
                plan_type
            },
            cost: cell_i64(row, STOCK_COL_COST),
            stock: cell_i64(row, STOCK_COL_STOCK),
        });
    }
    Ok(out)
}

/// Parse the sales ledger. Rows without a code are kept (they still count
/// toward daily totals); unparseable dates become `None`.
pub fn parse_sales_rows(bytes: &[u8]) -> anyhow::Result<Vec<SalesRow>> {
    let range = first_sheet(bytes).context("failed to read sales workbook")?;

    let mut out = Vec::new();
    for row in range.rows().skip(HEADER_ROWS) {
        if row.iter().all(is_blank) {
            continue;
        }
        out.push(SalesRow {
            date: date_from_serial(cell_f64(row, SALES_COL_DATE)),
            code: cell_str(row, SALES_COL_CODE),
            color: cell_str(row, SALES_COL_COLOR),
            size: cell_str(row, SALES_COL_SIZE),
            tag_price: cell_i64(row, SALES_COL_TAG),
            unit_cost: cell_i64(row, SALES_COL_UNIT_COST),
            qty: cell_i64(row, SALES_COL_QTY),
            amount: cell_i64(row, SALES_COL_AMOUNT),
        });
    }
    Ok(out)
}

fn first_sheet(bytes: &[u8]) -> anyhow::Result<Range<Data>> {
    let mut wb = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| anyhow::anyhow!("workbook open failed: {e}"))?;
    let range = wb
        .worksheet_range_at(0)
        .context("workbook has no sheets")?
        .map_err(|e| anyhow::anyhow!("worksheet read failed: {e}"))?;
    Ok(range)
}

/// Excel date serial to calendar date. Fractional time-of-day is discarded.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial <= 0.0 {
        return None;
    }
    let days = (serial - EXCEL_EPOCH_OFFSET_DAYS).floor() as i64;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(days))
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_str(row: &[Data], idx: usize) -> String {
    match row.get(idx) {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Some(Data::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Numeric coercion: missing or non-numeric cells become 0.
fn cell_f64(row: &[Data], idx: usize) -> f64 {
    match row.get(idx) {
        Some(Data::Int(i)) => *i as f64,
        Some(Data::Float(f)) => *f,
        Some(Data::String(s)) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        Some(Data::DateTime(dt)) => dt.as_f64(),
        _ => 0.0,
    }
}

fn cell_i64(row: &[Data], idx: usize) -> i64 {
    cell_f64(row, idx).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_maps_through_unix_epoch_offset() {
        assert_eq!(
            date_from_serial(25_569.0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        // 2026-01-27 is 20,480 days after the Unix epoch.
        assert_eq!(
            date_from_serial(46_049.0),
            NaiveDate::from_ymd_opt(2026, 1, 27)
        );
    }

    #[test]
    fn serial_discards_time_of_day() {
        assert_eq!(
            date_from_serial(46_049.75),
            NaiveDate::from_ymd_opt(2026, 1, 27)
        );
    }

    #[test]
    fn non_positive_serial_is_not_a_date() {
        assert_eq!(date_from_serial(0.0), None);
        assert_eq!(date_from_serial(-3.0), None);
        assert_eq!(date_from_serial(f64::NAN), None);
    }

    #[test]
    fn numeric_coercion_tolerates_text_and_blanks() {
        let row = vec![
            Data::String(" 12,500 ".to_string()),
            Data::String("가죽 샌들".to_string()),
            Data::Empty,
            Data::Int(300),
        ];
        assert_eq!(cell_i64(&row, 0), 12_500);
        assert_eq!(cell_i64(&row, 1), 0);
        assert_eq!(cell_i64(&row, 2), 0);
        assert_eq!(cell_i64(&row, 3), 300);
        // Out of range reads are zero, not panics.
        assert_eq!(cell_i64(&row, 9), 0);
    }

    #[test]
    fn string_cells_trim_and_render_numeric_codes() {
        let row = vec![Data::Float(700123.0), Data::String("  BX-100  ".to_string())];
        assert_eq!(cell_str(&row, 0), "700123");
        assert_eq!(cell_str(&row, 1), "BX-100");
    }
}
