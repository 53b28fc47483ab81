//! Survey form state: escape-hatch "other" fields, the style checkbox cap,
//! the submit control, and payload construction.

use crate::models::SubmitPayload;
use chrono::NaiveDate;
use serde::Deserialize;

/// Option value that reveals a question's free-text field.
pub const OTHER_SENTINEL: &str = "기타";
pub const MAX_STYLE_SELECTIONS: usize = 2;
pub const SUBMIT_LABEL: &str = "리포트 기록하기";
pub const BUSY_LABEL: &str = "저장 중...";

pub const EXPENDITURE_OPTIONS: &[&str] = &[
    "5만원 미만",
    "5~10만원",
    "10~20만원",
    "20~30만원",
    "30만원 이상",
];
pub const FACTOR_OPTIONS: &[&str] = &[
    "가격",
    "디자인",
    "브랜드",
    "품질",
    "트렌드",
    OTHER_SENTINEL,
];
pub const STYLE_OPTIONS: &[&str] = &[
    "캐주얼",
    "미니멀",
    "스트릿",
    "포멀",
    "빈티지",
    "스포티",
    OTHER_SENTINEL,
];
pub const CHANNEL_OPTIONS: &[&str] = &[
    "온라인 쇼핑몰",
    "오프라인 매장",
    "SNS",
    "중고거래",
    OTHER_SENTINEL,
];
pub const TENDENCY_OPTIONS: &[&str] = &[
    "계획 구매",
    "충동 구매",
    "세일 구매",
    OTHER_SENTINEL,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("스타일은 최대 {limit}개까지 선택할 수 있습니다.")]
    TooManyStyles { limit: usize },

    #[error("알 수 없는 스타일입니다: {0}")]
    UnknownStyle(String),

    #[error("날짜 형식이 올바르지 않습니다: {0}")]
    InvalidDate(String),
}

/// Questions that carry a free-text escape hatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherGroup {
    Factor,
    Style,
    Channel,
    Tendency,
}

impl OtherGroup {
    pub const ALL: [OtherGroup; 4] = [
        OtherGroup::Factor,
        OtherGroup::Style,
        OtherGroup::Channel,
        OtherGroup::Tendency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OtherGroup::Factor => "factor",
            OtherGroup::Style => "style",
            OtherGroup::Channel => "channel",
            OtherGroup::Tendency => "tendency",
        }
    }

    /// Name of the free-text input, e.g. `factor-other`.
    pub fn other_input(self) -> &'static str {
        match self {
            OtherGroup::Factor => "factor-other",
            OtherGroup::Style => "style-other",
            OtherGroup::Channel => "channel-other",
            OtherGroup::Tendency => "tendency-other",
        }
    }

    pub fn options(self) -> &'static [&'static str] {
        match self {
            OtherGroup::Factor => FACTOR_OPTIONS,
            OtherGroup::Style => STYLE_OPTIONS,
            OtherGroup::Channel => CHANNEL_OPTIONS,
            OtherGroup::Tendency => TENDENCY_OPTIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtherVisibility {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct OtherField {
    visibility: OtherVisibility,
    text: String,
}

impl OtherField {
    fn follow(&mut self, sentinel_selected: bool) {
        if sentinel_selected {
            self.visibility = OtherVisibility::Visible;
        } else {
            self.visibility = OtherVisibility::Hidden;
            self.text.clear();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ChoiceGroup {
    selected: String,
    other: OtherField,
}

impl ChoiceGroup {
    fn select(&mut self, value: &str) {
        self.selected = value.to_string();
        self.other.follow(value == OTHER_SENTINEL);
    }

    // A sentinel with no text keeps the sentinel so the answer is not lost.
    fn resolved(&self) -> String {
        let text = self.other.text.trim();
        if self.selected == OTHER_SENTINEL && !text.is_empty() {
            text.to_string()
        } else {
            self.selected.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleBox {
    pub value: &'static str,
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StyleGroup {
    boxes: Vec<StyleBox>,
    other: OtherField,
}

impl Default for StyleGroup {
    fn default() -> Self {
        Self {
            boxes: STYLE_OPTIONS
                .iter()
                .map(|&value| StyleBox {
                    value,
                    checked: false,
                    disabled: false,
                })
                .collect(),
            other: OtherField::default(),
        }
    }
}

impl StyleGroup {
    fn toggle(&mut self, value: &str, checked: bool) -> Result<(), FormError> {
        let style_box = self
            .boxes
            .iter_mut()
            .find(|style_box| style_box.value == value)
            .ok_or_else(|| FormError::UnknownStyle(value.to_string()))?;

        if checked && style_box.disabled {
            return Err(FormError::TooManyStyles {
                limit: MAX_STYLE_SELECTIONS,
            });
        }
        style_box.checked = checked;

        if value == OTHER_SENTINEL {
            self.other.follow(checked);
        }
        self.apply_cap();
        Ok(())
    }

    fn apply_cap(&mut self) {
        let at_cap = self.checked_count() >= MAX_STYLE_SELECTIONS;
        for style_box in &mut self.boxes {
            style_box.disabled = at_cap && !style_box.checked;
        }
    }

    fn checked_count(&self) -> usize {
        self.boxes.iter().filter(|style_box| style_box.checked).count()
    }

    // Free text rides along as an extra tag even at the cap.
    fn joined(&self) -> String {
        let mut tags: Vec<&str> = self
            .boxes
            .iter()
            .filter(|style_box| style_box.checked && style_box.value != OTHER_SENTINEL)
            .map(|style_box| style_box.value)
            .collect();

        let extra = self.other.text.trim();
        if !extra.is_empty() {
            tags.push(extra);
        }
        tags.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            enabled: true,
            label: SUBMIT_LABEL,
        }
    }
}

/// Raw field values of one submission, as posted by the page or an API client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormSubmission {
    pub date: String,
    pub expenditure: String,
    pub factor: String,
    #[serde(rename = "factor-other")]
    pub factor_other: String,
    pub style: Vec<String>,
    #[serde(rename = "style-other")]
    pub style_other: String,
    pub channel: String,
    #[serde(rename = "channel-other")]
    pub channel_other: String,
    pub tendency: String,
    #[serde(rename = "tendency-other")]
    pub tendency_other: String,
    pub reason: String,
    pub expectation: String,
}

impl FormSubmission {
    /// Collects urlencoded pairs; repeated `style` keys accumulate.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut submission = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "date" => submission.date = value,
                "expenditure" => submission.expenditure = value,
                "factor" => submission.factor = value,
                "factor-other" => submission.factor_other = value,
                "style" => submission.style.push(value),
                "style-other" => submission.style_other = value,
                "channel" => submission.channel = value,
                "channel-other" => submission.channel_other = value,
                "tendency" => submission.tendency = value,
                "tendency-other" => submission.tendency_other = value,
                "reason" => submission.reason = value,
                "expectation" => submission.expectation = value,
                _ => {}
            }
        }
        submission
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub date: String,
    pub expenditure: String,
    pub reason: String,
    pub expectation: String,
    factor: ChoiceGroup,
    channel: ChoiceGroup,
    tendency: ChoiceGroup,
    style: StyleGroup,
    submit: SubmitControl,
}

impl FormState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            expenditure: String::new(),
            reason: String::new(),
            expectation: String::new(),
            factor: ChoiceGroup::default(),
            channel: ChoiceGroup::default(),
            tendency: ChoiceGroup::default(),
            style: StyleGroup::default(),
            submit: SubmitControl::default(),
        }
    }

    /// Replays a posted submission as the user's sequence of selections.
    pub fn from_submission(
        submission: &FormSubmission,
        today: NaiveDate,
    ) -> Result<Self, FormError> {
        if submission.style.len() > MAX_STYLE_SELECTIONS {
            return Err(FormError::TooManyStyles {
                limit: MAX_STYLE_SELECTIONS,
            });
        }

        let mut form = Self::new(today);
        let date = submission.date.trim();
        if !date.is_empty() {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| FormError::InvalidDate(date.to_string()))?;
            form.date = date.to_string();
        }
        form.expenditure = submission.expenditure.clone();
        form.reason = submission.reason.clone();
        form.expectation = submission.expectation.clone();

        let singles = [
            (OtherGroup::Factor, &submission.factor, &submission.factor_other),
            (OtherGroup::Channel, &submission.channel, &submission.channel_other),
            (OtherGroup::Tendency, &submission.tendency, &submission.tendency_other),
        ];
        for (group, value, other) in singles {
            if !value.is_empty() {
                form.select(group, value)?;
            }
            form.set_other_text(group, other);
        }

        for value in &submission.style {
            form.toggle_style(value, true)?;
        }
        form.set_other_text(OtherGroup::Style, &submission.style_other);

        Ok(form)
    }

    /// Radio-style selection. For `Style` this checks the box.
    pub fn select(&mut self, group: OtherGroup, value: &str) -> Result<(), FormError> {
        match group {
            OtherGroup::Style => return self.toggle_style(value, true),
            OtherGroup::Factor => self.factor.select(value),
            OtherGroup::Channel => self.channel.select(value),
            OtherGroup::Tendency => self.tendency.select(value),
        }
        Ok(())
    }

    pub fn toggle_style(&mut self, value: &str, checked: bool) -> Result<(), FormError> {
        self.style.toggle(value, checked)
    }

    /// Typing only lands while the field is shown.
    pub fn set_other_text(&mut self, group: OtherGroup, text: &str) {
        let other = self.other_mut(group);
        if other.visibility == OtherVisibility::Visible {
            other.text = text.to_string();
        }
    }

    pub fn other_visibility(&self, group: OtherGroup) -> OtherVisibility {
        self.other(group).visibility
    }

    pub fn other_text(&self, group: OtherGroup) -> &str {
        &self.other(group).text
    }

    /// Current radio value. `None` for `Style`, which is read via `style_boxes`.
    pub fn selected(&self, group: OtherGroup) -> Option<&str> {
        match group {
            OtherGroup::Factor => Some(&self.factor.selected),
            OtherGroup::Channel => Some(&self.channel.selected),
            OtherGroup::Tendency => Some(&self.tendency.selected),
            OtherGroup::Style => None,
        }
    }

    pub fn style_boxes(&self) -> &[StyleBox] {
        &self.style.boxes
    }

    pub fn submit_control(&self) -> &SubmitControl {
        &self.submit
    }

    pub fn begin_submit(&mut self) {
        self.submit = SubmitControl {
            enabled: false,
            label: BUSY_LABEL,
        };
    }

    pub fn finish_submit(&mut self) {
        self.submit = SubmitControl::default();
    }

    pub fn build_payload(&self) -> SubmitPayload {
        SubmitPayload {
            date: self.date.clone(),
            expenditure: self.expenditure.clone(),
            factor: self.factor.resolved(),
            style: self.style.joined(),
            channel: self.channel.resolved(),
            tendency: self.tendency.resolved(),
            reason: self.reason.clone(),
            expectation: self.expectation.clone(),
        }
    }

    /// Clears every field, hides every other-field and re-enables the
    /// checkboxes. The submit control is left as is.
    pub fn reset(&mut self, today: NaiveDate) {
        let submit = self.submit.clone();
        *self = Self::new(today);
        self.submit = submit;
    }

    fn other(&self, group: OtherGroup) -> &OtherField {
        match group {
            OtherGroup::Factor => &self.factor.other,
            OtherGroup::Style => &self.style.other,
            OtherGroup::Channel => &self.channel.other,
            OtherGroup::Tendency => &self.tendency.other,
        }
    }

    fn other_mut(&mut self, group: OtherGroup) -> &mut OtherField {
        match group {
            OtherGroup::Factor => &mut self.factor.other,
            OtherGroup::Style => &mut self.style.other,
            OtherGroup::Channel => &mut self.channel.other,
            OtherGroup::Tendency => &mut self.tendency.other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn disabled(form: &FormState) -> Vec<&'static str> {
        form.style_boxes()
            .iter()
            .filter(|style_box| style_box.disabled)
            .map(|style_box| style_box.value)
            .collect()
    }

    #[test]
    fn sentinel_reveals_and_other_choice_hides_and_clears() {
        let mut form = FormState::new(today());
        form.select(OtherGroup::Factor, OTHER_SENTINEL).unwrap();
        assert_eq!(form.other_visibility(OtherGroup::Factor), OtherVisibility::Visible);

        form.set_other_text(OtherGroup::Factor, "지인 추천");
        form.select(OtherGroup::Factor, "가격").unwrap();
        assert_eq!(form.other_visibility(OtherGroup::Factor), OtherVisibility::Hidden);
        assert_eq!(form.other_text(OtherGroup::Factor), "");
    }

    #[test]
    fn text_is_ignored_while_hidden() {
        let mut form = FormState::new(today());
        form.set_other_text(OtherGroup::Channel, "라이브 커머스");
        assert_eq!(form.other_text(OtherGroup::Channel), "");
    }

    #[test]
    fn factor_other_text_replaces_sentinel() {
        let mut form = FormState::new(today());
        form.select(OtherGroup::Factor, OTHER_SENTINEL).unwrap();
        form.set_other_text(OtherGroup::Factor, "X");
        assert_eq!(form.build_payload().factor, "X");
    }

    #[test]
    fn two_checked_styles_disable_the_rest() {
        let mut form = FormState::new(today());
        form.toggle_style("캐주얼", true).unwrap();
        assert!(disabled(&form).is_empty());

        form.toggle_style("미니멀", true).unwrap();
        assert_eq!(disabled(&form).len(), STYLE_OPTIONS.len() - 2);
        assert!(!disabled(&form).contains(&"캐주얼"));

        assert_eq!(
            form.toggle_style("포멀", true),
            Err(FormError::TooManyStyles { limit: MAX_STYLE_SELECTIONS })
        );

        form.toggle_style("캐주얼", false).unwrap();
        assert!(disabled(&form).is_empty());
    }

    #[test]
    fn style_payload_drops_sentinel_and_appends_text() {
        let mut form = FormState::new(today());
        form.toggle_style("빈티지", true).unwrap();
        form.toggle_style(OTHER_SENTINEL, true).unwrap();
        form.set_other_text(OtherGroup::Style, "  고프코어 ");

        assert_eq!(form.build_payload().style, "빈티지, 고프코어");
    }

    #[test]
    fn unchecking_style_sentinel_clears_text() {
        let mut form = FormState::new(today());
        form.toggle_style(OTHER_SENTINEL, true).unwrap();
        form.set_other_text(OtherGroup::Style, "Y2K");
        form.toggle_style(OTHER_SENTINEL, false).unwrap();

        assert_eq!(form.other_visibility(OtherGroup::Style), OtherVisibility::Hidden);
        assert_eq!(form.build_payload().style, "");
    }

    #[test]
    fn reset_restores_today_and_hides_everything() {
        let mut form = FormState::new(today());
        form.date = "2020-01-01".into();
        form.select(OtherGroup::Tendency, OTHER_SENTINEL).unwrap();
        form.toggle_style("캐주얼", true).unwrap();
        form.toggle_style("포멀", true).unwrap();

        let later = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        form.reset(later);

        assert_eq!(form.date, "2026-03-15");
        for group in OtherGroup::ALL {
            assert_eq!(form.other_visibility(group), OtherVisibility::Hidden);
        }
        assert!(disabled(&form).is_empty());
        assert!(form.style_boxes().iter().all(|style_box| !style_box.checked));
    }

    #[test]
    fn submit_control_goes_busy_and_back() {
        let mut form = FormState::new(today());
        form.begin_submit();
        assert!(!form.submit_control().enabled);
        assert_eq!(form.submit_control().label, BUSY_LABEL);

        form.finish_submit();
        assert!(form.submit_control().enabled);
        assert_eq!(form.submit_control().label, SUBMIT_LABEL);
    }

    #[test]
    fn submission_round_trips_into_state() {
        let submission = FormSubmission::from_pairs(vec![
            ("date".to_string(), "2026-03-01".to_string()),
            ("factor".to_string(), OTHER_SENTINEL.to_string()),
            ("factor-other".to_string(), "X".to_string()),
            ("style".to_string(), "캐주얼".to_string()),
            ("style".to_string(), "미니멀".to_string()),
            ("channel".to_string(), "SNS".to_string()),
            ("channel-other".to_string(), "stale".to_string()),
        ]);

        let form = FormState::from_submission(&submission, today()).unwrap();
        let payload = form.build_payload();

        assert_eq!(payload.date, "2026-03-01");
        assert_eq!(payload.factor, "X");
        assert_eq!(payload.style, "캐주얼, 미니멀");
        assert_eq!(payload.channel, "SNS");
        assert_eq!(form.other_visibility(OtherGroup::Factor), OtherVisibility::Visible);
        assert_eq!(disabled(&form).len(), STYLE_OPTIONS.len() - 2);
    }

    #[test]
    fn submission_rejects_third_style_and_bad_dates() {
        let three = FormSubmission {
            style: vec!["캐주얼".into(), "미니멀".into(), "포멀".into()],
            ..Default::default()
        };
        assert!(matches!(
            FormState::from_submission(&three, today()),
            Err(FormError::TooManyStyles { .. })
        ));

        let bad_date = FormSubmission {
            date: "14/03/2026".into(),
            ..Default::default()
        };
        assert!(matches!(
            FormState::from_submission(&bad_date, today()),
            Err(FormError::InvalidDate(_))
        ));
    }

    #[test]
    fn blank_date_defaults_to_today() {
        let form = FormState::from_submission(&FormSubmission::default(), today()).unwrap();
        assert_eq!(form.date, "2026-03-14");
    }
}
