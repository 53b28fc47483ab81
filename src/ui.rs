use crate::chart::{ChartSlot, ChartSpec};
use crate::form::{EXPENDITURE_OPTIONS, FormState, OtherGroup, OtherVisibility};
use crate::list::RecordRow;
use crate::state::{DashboardView, SUBMIT_FAILED_MESSAGE, SUBMIT_OK_MESSAGE};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Saved,
    SubmitFailed,
}

pub fn render_index(view: &DashboardView, form: &FormState, notice: Option<Notice>) -> String {
    INDEX_HTML
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace("{{FORM}}", &render_form(form))
        .replace("{{CHART_CARDS}}", &render_chart_cards())
        .replace("{{RECORDS}}", &render_records(view))
        .replace("{{CHARTS_JSON}}", &charts_json(&view.charts))
}

fn render_notice(notice: Option<Notice>) -> String {
    match notice {
        None => String::new(),
        Some(Notice::Saved) => format!(
            r#"<div class="status" data-type="ok">{}</div>"#,
            escape_html(SUBMIT_OK_MESSAGE)
        ),
        Some(Notice::SubmitFailed) => format!(
            r#"<div class="status" data-type="error">{message}</div>
<script>window.addEventListener('load', () => alert({alert}));</script>"#,
            message = escape_html(SUBMIT_FAILED_MESSAGE),
            alert = script_json(&SUBMIT_FAILED_MESSAGE),
        ),
    }
}

fn render_records(view: &DashboardView) -> String {
    if let Some(message) = view.load_error {
        return format!(r#"<p class="load-error">{}</p>"#, escape_html(message));
    }
    if view.rows.is_empty() {
        return r#"<p class="hint">아직 기록이 없습니다.</p>"#.to_string();
    }

    let mut out = String::new();
    for row in &view.rows {
        render_record_row(&mut out, row);
    }
    out
}

fn render_record_row(out: &mut String, row: &RecordRow) {
    let _ = write!(
        out,
        r#"<div class="record-row">
  <div class="record-date">{date}</div>
  <div class="record-expenditure">{expenditure}</div>
  <div class="record-reason" title="{reason_title}">{reason}</div>
  <div class="record-factor">{factor}</div>
  <div class="record-style" title="{style_title}">{style}</div>
</div>
"#,
        date = escape_html(&row.date),
        expenditure = escape_html(&row.expenditure),
        reason_title = escape_html(&row.reason_title),
        reason = escape_html(&row.reason),
        factor = escape_html(&row.factor),
        style_title = escape_html(&row.style_title),
        style = escape_html(&row.style),
    );
}

fn render_chart_cards() -> String {
    ChartSlot::ALL
        .iter()
        .map(|slot| {
            format!(
                r#"<div class="chart-card"><canvas id="chart-{}"></canvas></div>"#,
                slot.name()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn charts_json(charts: &[ChartSpec]) -> String {
    script_json(&charts)
}

// JSON safe to inline inside a <script> element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

fn render_form(form: &FormState) -> String {
    let control = form.submit_control();
    let mut out = String::new();

    let _ = write!(
        out,
        r#"<label class="field">날짜
  <input type="date" id="date" name="date" value="{}" required />
</label>
"#,
        escape_html(&form.date)
    );

    out.push_str(r#"<label class="field">월 평균 지출 금액
  <select name="expenditure" required>
    <option value="">선택하세요</option>
"#);
    for option in EXPENDITURE_OPTIONS {
        let selected = if form.expenditure == *option { " selected" } else { "" };
        let _ = writeln!(
            out,
            r#"    <option value="{value}"{selected}>{value}</option>"#,
            value = escape_html(option)
        );
    }
    out.push_str("  </select>\n</label>\n");

    render_radio_group(&mut out, form, OtherGroup::Factor, "구매에 가장 큰 영향을 준 요인");
    render_style_group(&mut out, form);
    render_radio_group(&mut out, form, OtherGroup::Channel, "주로 이용하는 구매 채널");
    render_radio_group(&mut out, form, OtherGroup::Tendency, "소비 성향");

    let _ = write!(
        out,
        r#"<label class="field">구매 이유
  <textarea name="reason" rows="2">{reason}</textarea>
</label>
<label class="field">앞으로의 기대
  <textarea name="expectation" rows="2">{expectation}</textarea>
</label>
<button class="btn-submit" type="submit"{disabled}>{label}</button>
"#,
        reason = escape_html(&form.reason),
        expectation = escape_html(&form.expectation),
        disabled = if control.enabled { "" } else { " disabled" },
        label = escape_html(control.label),
    );

    out
}

fn render_radio_group(out: &mut String, form: &FormState, group: OtherGroup, legend: &str) {
    let name = group.name();
    let selected = form.selected(group).unwrap_or_default();

    let _ = writeln!(
        out,
        r#"<fieldset class="field" data-group="{name}"><legend>{legend}</legend>"#
    );
    for option in group.options() {
        let checked = if selected == *option { " checked" } else { "" };
        let _ = writeln!(
            out,
            r#"  <label class="choice"><input type="radio" name="{name}" value="{value}"{checked} /> {value}</label>"#,
            value = escape_html(option)
        );
    }
    render_other_input(out, form, group);
    out.push_str("</fieldset>\n");
}

fn render_style_group(out: &mut String, form: &FormState) {
    out.push_str(
        r#"<fieldset class="field" data-group="style"><legend>선호 스타일 (최대 2개)</legend>
"#,
    );
    for style_box in form.style_boxes() {
        let _ = writeln!(
            out,
            r#"  <label class="choice"><input type="checkbox" name="style" value="{value}"{checked}{disabled} /> {value}</label>"#,
            value = escape_html(style_box.value),
            checked = if style_box.checked { " checked" } else { "" },
            disabled = if style_box.disabled { " disabled" } else { "" },
        );
    }
    render_other_input(out, form, OtherGroup::Style);
    out.push_str("</fieldset>\n");
}

fn render_other_input(out: &mut String, form: &FormState, group: OtherGroup) {
    let hidden = match form.other_visibility(group) {
        OtherVisibility::Hidden => " hidden",
        OtherVisibility::Visible => "",
    };
    let _ = writeln!(
        out,
        r#"  <input type="text" class="other-input" name="{name}" placeholder="직접 입력" value="{value}"{hidden} />"#,
        name = group.other_input(),
        value = escape_html(form.other_text(group)),
    );
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Fitter Meter</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.4rem;
    }

    .subtitle,
    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.95rem;
    }

    #record-form {
      display: grid;
      gap: 16px;
    }

    .field {
      display: grid;
      gap: 8px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      border-radius: 18px;
      padding: 14px 18px;
      background: white;
    }

    .choice {
      display: inline-flex;
      gap: 6px;
      margin-right: 14px;
    }

    .other-input[hidden] {
      display: none;
    }

    input[type="text"],
    input[type="date"],
    select,
    textarea {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 16px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      color: white;
    }

    button:disabled {
      opacity: 0.6;
      cursor: progress;
    }

    .btn-submit {
      background: var(--accent);
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
    }

    .btn-export {
      background: var(--accent-2);
      box-shadow: 0 10px 24px rgba(47, 72, 88, 0.3);
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
      gap: 16px;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .record-row {
      display: grid;
      grid-template-columns: 110px 110px 1fr 110px 1fr;
      gap: 10px;
      padding: 10px 4px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    .record-row div {
      overflow: hidden;
      text-overflow: ellipsis;
      white-space: nowrap;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
    }

    .status[data-type="error"],
    .load-error {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      .record-row {
        grid-template-columns: 1fr 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Fitter Meter</h1>
      <p class="subtitle">패션 소비 습관을 기록하고 모두의 응답을 한눈에 확인하세요.</p>
    </header>

    {{NOTICE}}

    <section>
      <h2>리포트 작성</h2>
      <form id="record-form" method="post" action="/records">
{{FORM}}
      </form>
    </section>

    <section>
      <h2>통계</h2>
      <div class="charts">
{{CHART_CARDS}}
      </div>
      <script id="chart-data" type="application/json">{{CHARTS_JSON}}</script>
    </section>

    <section>
      <h2>전체 기록</h2>
      <div id="records-container">
{{RECORDS}}
      </div>
      <p><a href="/export"><button class="btn-export" type="button" id="export-excel">엑셀로 내보내기</button></a></p>
    </section>
  </main>

  <script>
    const SENTINEL = '기타';
    const STYLE_LIMIT = 2;
    const charts = {};

    const renderCharts = () => {
      const specs = JSON.parse(document.getElementById('chart-data').textContent);
      specs.forEach((spec) => {
        if (charts[spec.slot]) {
          charts[spec.slot].destroy();
        }
        const canvas = document.getElementById(`chart-${spec.slot}`);
        if (!canvas || typeof Chart === 'undefined') {
          return;
        }
        charts[spec.slot] = new Chart(canvas, {
          type: spec.chart_type,
          data: {
            labels: spec.labels,
            datasets: [{
              label: spec.dataset_label,
              data: spec.data,
              backgroundColor: spec.colors,
              hoverOffset: 4
            }]
          },
          options: {
            responsive: true,
            plugins: {
              legend: { position: 'top', display: spec.kind === 'proportion' },
              title: { display: true, text: spec.title }
            }
          }
        });
      });
    };

    const otherInput = (group) => document.querySelector(`input[name="${group}-other"]`);

    const followSentinel = (group, selected) => {
      const input = otherInput(group);
      if (!input) {
        return;
      }
      input.hidden = !selected;
      if (!selected) {
        input.value = '';
      }
    };

    document.querySelectorAll('input[type="radio"]').forEach((radio) => {
      radio.addEventListener('change', () => followSentinel(radio.name, radio.value === SENTINEL));
    });

    const styleBoxes = Array.from(document.querySelectorAll('input[name="style"]'));
    styleBoxes.forEach((box) => {
      box.addEventListener('change', () => {
        if (box.value === SENTINEL) {
          followSentinel('style', box.checked);
        }
        const atCap = styleBoxes.filter((b) => b.checked).length >= STYLE_LIMIT;
        styleBoxes.forEach((b) => {
          b.disabled = atCap && !b.checked;
        });
      });
    });

    document.getElementById('record-form').addEventListener('submit', (event) => {
      const button = event.target.querySelector('button[type="submit"]');
      button.disabled = true;
      button.textContent = '저장 중...';
    });

    renderCharts();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::OTHER_SENTINEL;
    use crate::state::LOAD_FAILED_MESSAGE;
    use chrono::NaiveDate;

    fn form() -> FormState {
        FormState::new(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
    }

    fn empty_view() -> DashboardView {
        DashboardView {
            rows: Vec::new(),
            charts: Vec::new(),
            load_error: None,
        }
    }

    #[test]
    fn load_error_replaces_record_list() {
        let view = DashboardView {
            load_error: Some(LOAD_FAILED_MESSAGE),
            ..empty_view()
        };
        let html = render_index(&view, &form(), None);
        assert!(html.contains(LOAD_FAILED_MESSAGE));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn fresh_form_hides_other_inputs() {
        let html = render_index(&empty_view(), &form(), None);
        assert!(html.contains(r#"name="factor-other" placeholder="직접 입력" value="" hidden"#));
        assert!(html.contains(r#"value="2026-03-14""#));
    }

    #[test]
    fn rehydrated_form_shows_other_and_disabled_boxes() {
        let mut state = form();
        state.select(OtherGroup::Factor, OTHER_SENTINEL).unwrap();
        state.set_other_text(OtherGroup::Factor, "<X>");
        state.toggle_style("캐주얼", true).unwrap();
        state.toggle_style("미니멀", true).unwrap();

        let html = render_index(&empty_view(), &state, Some(Notice::SubmitFailed));
        assert!(
            html.contains(r#"name="factor-other" placeholder="직접 입력" value="&lt;X&gt;" />"#)
        );
        assert!(html.contains(r#"value="포멀" disabled"#));
        assert!(html.contains(SUBMIT_FAILED_MESSAGE));
    }

    #[test]
    fn chart_json_cannot_close_script_tag() {
        assert_eq!(script_json("</script>"), r#""<\/script>""#);
    }

    #[test]
    fn record_cells_are_escaped() {
        let view = DashboardView {
            rows: vec![RecordRow {
                date: "2026. 3. 1.".into(),
                expenditure: "5~10만원".into(),
                reason: "<b>sale</b>".into(),
                reason_title: "<b>sale</b>".into(),
                factor: "-".into(),
                style: "-".into(),
                style_title: String::new(),
            }],
            ..empty_view()
        };
        let html = render_index(&view, &form(), None);
        assert!(html.contains("&lt;b&gt;sale&lt;/b&gt;"));
    }
}
