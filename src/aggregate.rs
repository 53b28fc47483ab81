use crate::models::{Field, Record};
use serde::Serialize;

/// Bucket for single-value fields left blank.
pub const UNCLASSIFIED: &str = "미분류";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
}

/// Label to count mapping that remembers first-seen label order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Aggregation {
    buckets: Vec<Bucket>,
}

impl Aggregation {
    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(|bucket| bucket.label.clone()).collect()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.buckets.iter().map(|bucket| bucket.count).collect()
    }

    pub fn get(&self, label: &str) -> u64 {
        self.buckets
            .iter()
            .find(|bucket| bucket.label == label)
            .map_or(0, |bucket| bucket.count)
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn bump(&mut self, label: &str) {
        match self.buckets.iter_mut().find(|bucket| bucket.label == label) {
            Some(bucket) => bucket.count = bucket.count.saturating_add(1),
            None => self.buckets.push(Bucket {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
}

pub fn aggregate(records: &[Record], field: Field) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for record in records {
        let value = record.field(field);
        if field.is_multi_value() {
            for tag in split_tags(value) {
                aggregation.bump(tag);
            }
        } else if value.is_empty() {
            aggregation.bump(UNCLASSIFIED);
        } else {
            aggregation.bump(value);
        }
    }

    aggregation
}

/// Splits a stored `"A, B"` cell into its tags. Blank cells yield nothing.
pub fn split_tags(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
}
