//! Client for the spreadsheet endpoint plus the record cache it fills.

use crate::models::{Record, SubmitPayload};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::cmp::Reverse;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error! status: {status}")]
    Fetch { status: StatusCode },

    /// The endpoint answered with something other than a list, usually a
    /// relayed script error object.
    #[error("endpoint returned a non-list payload: {body}")]
    Format { body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Proof that a write left this process. Carries nothing: the write
/// endpoint's response is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched;

#[derive(Clone)]
pub struct RecordStoreClient {
    http: Client,
    endpoint: String,
}

impl RecordStoreClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, StoreError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches every record, newest first.
    pub async fn load(&self) -> Result<Vec<Record>, StoreError> {
        let response = self.http.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Fetch { status });
        }

        let body = response.bytes().await?;
        let mut records = parse_records(&body)?;
        sort_newest_first(&mut records);
        debug!(count = records.len(), "records loaded");
        Ok(records)
    }

    pub async fn submit(&self, payload: &SubmitPayload) -> Result<Dispatched, StoreError> {
        // Status and body are deliberately ignored; only transport failures count.
        self.http
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await?;
        info!(date = %payload.date, "record dispatched");
        Ok(Dispatched)
    }
}

pub fn parse_records(body: &[u8]) -> Result<Vec<Record>, StoreError> {
    let format_error = || StoreError::Format {
        body: String::from_utf8_lossy(body).into_owned(),
    };

    let value: Value = serde_json::from_slice(body).map_err(|_| format_error())?;
    let Value::Array(items) = value else {
        return Err(format_error());
    };

    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Record>, _>>()
        .map_err(|_| format_error())
}

/// Sorts by parsed `Timestamp`, newest first. Records whose timestamp does
/// not parse have no defined position among themselves; they currently
/// trail the dated ones.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by_cached_key(|record| Reverse(parse_timestamp(&record.timestamp)));
}

const BROWSER_DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Reads the timestamp shapes the sheet has been seen to hold: RFC 3339,
/// RFC 2822, a browser `Date` string, and a few offset-less layouts that are
/// taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    // "Sat Mar 01 2025 10:00:00 GMT+0900 (Korean Standard Time)"
    let without_zone_name = text.split(" (").next().unwrap_or(text);
    if let Ok(parsed) = DateTime::parse_from_str(without_zone_name, BROWSER_DATE_FORMAT) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Most recently fetched records. Replaced wholesale by each successful load.
#[derive(Debug, Default)]
pub struct RecordCache {
    records: Vec<Record>,
}

impl RecordCache {
    pub fn replace(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamped(timestamp: &str, expenditure: &str) -> Record {
        Record {
            timestamp: timestamp.into(),
            expenditure: expenditure.into(),
            ..Default::default()
        }
    }

    #[test]
    fn sorts_descending_by_timestamp() {
        let mut records = vec![
            stamped("2025-01-02T09:00:00.000Z", "mid"),
            stamped("2025-03-01T09:00:00.000Z", "new"),
            stamped("2024-12-31 23:59:59", "old"),
        ];

        sort_newest_first(&mut records);
        let order: Vec<_> = records.iter().map(|r| r.expenditure.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, 0))
            .unwrap()
            .and_utc()
    }

    #[test]
    fn minute_precision_layouts_parse_as_utc() {
        assert_eq!(parse_timestamp("2025-03-01T10:00"), Some(utc(2025, 3, 1, 10, 0)));
        assert_eq!(parse_timestamp("2025/03/01 10:00"), Some(utc(2025, 3, 1, 10, 0)));
    }

    #[test]
    fn rfc2822_timestamp_honors_its_offset() {
        assert_eq!(
            parse_timestamp("Sat, 01 Mar 2025 10:00:00 +0900"),
            Some(utc(2025, 3, 1, 1, 0))
        );
    }

    #[test]
    fn browser_date_string_parses_with_or_without_zone_name() {
        let expected = Some(utc(2025, 3, 1, 1, 0));
        assert_eq!(parse_timestamp("Sat Mar 01 2025 10:00:00 GMT+0900"), expected);
        assert_eq!(
            parse_timestamp("Sat Mar 01 2025 10:00:00 GMT+0900 (Korean Standard Time)"),
            expected
        );
    }

    #[test]
    fn mixed_layouts_sort_by_instant() {
        let mut records = vec![
            stamped("2025/03/01 00:30", "third"),
            stamped("Sat Mar 01 2025 10:00:00 GMT+0900", "second"),
            stamped("Sat, 01 Mar 2025 08:00:00 +0900", "first"),
            stamped("2025-03-01T02:00", "fourth"),
        ];

        sort_newest_first(&mut records);
        let order: Vec<_> = records.iter().map(|r| r.expenditure.as_str()).collect();
        assert_eq!(order, vec!["fourth", "second", "third", "first"]);
    }

    #[test]
    fn unparsable_timestamps_do_not_disturb_dated_order() {
        let mut records = vec![
            stamped("not a date", "x"),
            stamped("2025-01-01", "old"),
            stamped("", "y"),
            stamped("2025-02-01", "new"),
        ];

        sort_newest_first(&mut records);
        let dated: Vec<_> = records
            .iter()
            .filter(|r| parse_timestamp(&r.timestamp).is_some())
            .map(|r| r.expenditure.as_str())
            .collect();
        assert_eq!(dated, vec!["new", "old"]);
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn error_object_is_a_format_error() {
        let err = parse_records(br#"{"error": "Script function not found"}"#).unwrap_err();
        match err {
            StoreError::Format { body } => assert!(body.contains("Script function")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_json_is_a_format_error() {
        assert!(matches!(
            parse_records(b"<html>oops</html>"),
            Err(StoreError::Format { .. })
        ));
    }

    #[test]
    fn empty_array_is_an_empty_list() {
        assert!(parse_records(b"[]").unwrap().is_empty());
    }

    #[test]
    fn cache_replaces_wholesale() {
        let mut cache = RecordCache::default();
        cache.replace(vec![stamped("2025-01-01", "a"), stamped("2025-01-02", "b")]);
        cache.replace(vec![stamped("2025-01-03", "c")]);
        assert_eq!(cache.records().len(), 1);
        assert_eq!(cache.records()[0].expenditure, "c");
    }
}
