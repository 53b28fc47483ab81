use crate::aggregate::{Aggregation, aggregate};
use crate::models::{Field, Record};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

pub const PALETTE: [&str; 5] = ["#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF"];

/// Colors wrap around once the labels outnumber the palette.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Share of the whole, drawn as a pie or doughnut.
    Proportion,
    /// Comparable frequencies, drawn as bars.
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    Expenditure,
    Factor,
    Style,
    Tendency,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 4] = [
        ChartSlot::Expenditure,
        ChartSlot::Factor,
        ChartSlot::Style,
        ChartSlot::Tendency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartSlot::Expenditure => "expenditure",
            ChartSlot::Factor => "factor",
            ChartSlot::Style => "style",
            ChartSlot::Tendency => "tendency",
        }
    }

    pub fn field(self) -> Field {
        match self {
            ChartSlot::Expenditure => Field::Expenditure,
            ChartSlot::Factor => Field::Factor,
            ChartSlot::Style => Field::Style,
            ChartSlot::Tendency => Field::Tendency,
        }
    }

    pub fn kind(self) -> ChartKind {
        match self {
            ChartSlot::Expenditure | ChartSlot::Factor => ChartKind::Proportion,
            ChartSlot::Style | ChartSlot::Tendency => ChartKind::Count,
        }
    }

    /// Chart.js type name.
    pub fn chart_type(self) -> &'static str {
        match self {
            ChartSlot::Expenditure => "pie",
            ChartSlot::Factor => "doughnut",
            ChartSlot::Style | ChartSlot::Tendency => "bar",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartSlot::Expenditure => "월 평균 지출 금액 분포",
            ChartSlot::Factor => "구매 결정 요인",
            ChartSlot::Style => "선호 스타일",
            ChartSlot::Tendency => "소비 성향",
        }
    }

    pub fn dataset_label(self) -> &'static str {
        match self {
            ChartSlot::Expenditure => "지출 구간별 횟수",
            ChartSlot::Factor => "요인별 횟수",
            ChartSlot::Style => "스타일별 횟수",
            ChartSlot::Tendency => "성향별 횟수",
        }
    }
}

/// A chart instance bound to a slot, ready for the page to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub kind: ChartKind,
    pub chart_type: &'static str,
    pub title: &'static str,
    pub dataset_label: &'static str,
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub colors: Vec<&'static str>,
    pub generation: u64,
}

/// Holds at most one chart per slot.
#[derive(Debug, Default)]
pub struct ChartPresenter {
    slots: BTreeMap<ChartSlot, ChartSpec>,
    next_generation: u64,
}

impl ChartPresenter {
    pub fn render(&mut self, slot: ChartSlot, aggregation: &Aggregation) -> &ChartSpec {
        if let Some(previous) = self.slots.remove(&slot) {
            debug!(?slot, generation = previous.generation, "destroying chart");
        }

        self.next_generation += 1;
        let spec = ChartSpec {
            slot,
            kind: slot.kind(),
            chart_type: slot.chart_type(),
            title: slot.title(),
            dataset_label: slot.dataset_label(),
            labels: aggregation.labels(),
            data: aggregation.counts(),
            colors: (0..aggregation.len()).map(palette_color).collect(),
            generation: self.next_generation,
        };
        self.slots.entry(slot).or_insert(spec)
    }

    /// One render pass over every slot from the given records.
    pub fn render_all(&mut self, records: &[Record]) {
        for slot in ChartSlot::ALL {
            let aggregation = aggregate(records, slot.field());
            self.render(slot, &aggregation);
        }
    }

    pub fn get(&self, slot: ChartSlot) -> Option<&ChartSpec> {
        self.slots.get(&slot)
    }

    pub fn charts(&self) -> Vec<ChartSpec> {
        self.slots.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(style: &str) -> Record {
        Record {
            style: style.into(),
            ..Default::default()
        }
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(palette_color(0), "#FF6384");
        assert_eq!(palette_color(4), "#9966FF");
        assert_eq!(palette_color(5), "#FF6384");
        assert_eq!(palette_color(12), "#FFCE56");
    }

    #[test]
    fn rerender_replaces_slot_instance() {
        let mut presenter = ChartPresenter::default();
        presenter.render_all(&[styled("A")]);
        let first = presenter.get(ChartSlot::Style).unwrap().generation;

        presenter.render_all(&[styled("A, B")]);
        let second = presenter.get(ChartSlot::Style).unwrap();

        assert!(second.generation > first);
        assert_eq!(second.labels, vec!["A", "B"]);
        assert_eq!(presenter.charts().len(), ChartSlot::ALL.len());
    }

    #[test]
    fn colors_follow_label_positions() {
        let records: Vec<_> = ["a", "b", "c", "d", "e", "f", "g"]
            .into_iter()
            .map(|label| Record {
                expenditure: label.into(),
                ..Default::default()
            })
            .collect();

        let mut presenter = ChartPresenter::default();
        presenter.render_all(&records);
        let spec = presenter.get(ChartSlot::Expenditure).unwrap();

        assert_eq!(spec.colors.len(), 7);
        assert_eq!(spec.colors[5], PALETTE[0]);
        assert_eq!(spec.colors[6], PALETTE[1]);
        assert_eq!(spec.chart_type, "pie");
        assert_eq!(spec.kind, ChartKind::Proportion);
    }

    #[test]
    fn count_charts_for_style_and_tendency() {
        assert_eq!(ChartSlot::Style.kind(), ChartKind::Count);
        assert_eq!(ChartSlot::Tendency.chart_type(), "bar");
    }
}
