use crate::models::Record;
use crate::store::parse_timestamp;
use chrono::{Local, NaiveDate};
use serde::Serialize;

const EMPTY_CELL: &str = "-";

/// Display projection of one cached record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    pub date: String,
    pub expenditure: String,
    pub reason: String,
    pub reason_title: String,
    pub factor: String,
    pub style: String,
    pub style_title: String,
}

pub fn render_rows(records: &[Record]) -> Vec<RecordRow> {
    records.iter().map(render_row).collect()
}

pub fn render_row(record: &Record) -> RecordRow {
    RecordRow {
        date: display_date(&record.date),
        expenditure: or_dash(&record.expenditure),
        reason: or_dash(&record.reason),
        reason_title: record.reason.clone(),
        factor: or_dash(&record.factor),
        style: or_dash(&record.style),
        style_title: record.style.clone(),
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        value.to_string()
    }
}

fn display_date(raw: &str) -> String {
    const FORMAT: &str = "%Y. %-m. %-d.";

    if raw.is_empty() {
        return EMPTY_CELL.to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return date.format(FORMAT).to_string();
    }
    match parse_timestamp(raw) {
        Some(instant) => instant.with_timezone(&Local).format(FORMAT).to_string(),
        None => raw.to_string(),
    }
}
