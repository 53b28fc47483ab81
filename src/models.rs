use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One survey entry as the spreadsheet endpoint returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Timestamp", default, deserialize_with = "lenient_text")]
    pub timestamp: String,
    #[serde(rename = "Date", default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(rename = "Expenditure", default, deserialize_with = "lenient_text")]
    pub expenditure: String,
    #[serde(rename = "Reason", default, deserialize_with = "lenient_text")]
    pub reason: String,
    #[serde(rename = "Factor", default, deserialize_with = "lenient_text")]
    pub factor: String,
    #[serde(rename = "Style", default, deserialize_with = "lenient_text")]
    pub style: String,
    #[serde(rename = "Channel", default, deserialize_with = "lenient_text")]
    pub channel: String,
    #[serde(rename = "Tendency", default, deserialize_with = "lenient_text")]
    pub tendency: String,
    #[serde(rename = "Expectation", default, deserialize_with = "lenient_text")]
    pub expectation: String,
}

impl Record {
    /// Column headers in export order. Matches the wire names.
    pub const COLUMNS: [&'static str; 9] = [
        "Timestamp",
        "Date",
        "Expenditure",
        "Reason",
        "Factor",
        "Style",
        "Channel",
        "Tendency",
        "Expectation",
    ];

    pub fn columns(&self) -> [&str; 9] {
        [
            &self.timestamp,
            &self.date,
            &self.expenditure,
            &self.reason,
            &self.factor,
            &self.style,
            &self.channel,
            &self.tendency,
            &self.expectation,
        ]
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Expenditure => &self.expenditure,
            Field::Factor => &self.factor,
            Field::Style => &self.style,
            Field::Channel => &self.channel,
            Field::Tendency => &self.tendency,
        }
    }
}

/// Categorical record fields that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Expenditure,
    Factor,
    Style,
    Channel,
    Tendency,
}

impl Field {
    /// `Style` stores several comma-joined tags in one cell.
    pub fn is_multi_value(self) -> bool {
        matches!(self, Field::Style)
    }
}

/// Body posted to the write endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPayload {
    pub date: String,
    pub expenditure: String,
    pub factor: String,
    pub style: String,
    pub channel: String,
    pub tendency: String,
    pub reason: String,
    pub expectation: String,
}

#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub dispatched: bool,
}

// Spreadsheet backends hand back dates and numeric buckets as non-string
// JSON values; keep everything as display text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accepts_non_string_cells() {
        let record: Record = serde_json::from_value(serde_json::json!({
            "Timestamp": "2025-03-01T10:00:00.000Z",
            "Expenditure": 50000,
            "Style": null,
            "Unknown": "ignored"
        }))
        .unwrap();

        assert_eq!(record.expenditure, "50000");
        assert_eq!(record.style, "");
        assert_eq!(record.factor, "");
    }

    #[test]
    fn payload_uses_lowercase_keys() {
        let payload = SubmitPayload {
            factor: "X".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["factor"], "X");
        assert!(json.get("Factor").is_none());
    }
}
