use crate::chart::ChartSpec;
use crate::errors::AppError;
use crate::export::{EXPORT_FILENAME, XLSX_CONTENT_TYPE, export_workbook};
use crate::form::{FormState, FormSubmission};
use crate::list::RecordRow;
use crate::models::DispatchResponse;
use crate::state::AppState;
use crate::ui::{Notice, render_index};
use axum::{
    Form, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    saved: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Html<String> {
    let mut dashboard = state.dashboard.lock().await;
    // A failed load is logged and shown inline; the page still renders.
    let _ = dashboard.reload().await;

    let notice = query.saved.is_some().then_some(Notice::Saved);
    Html(render_index(&dashboard.view(), &FormState::new(today()), notice))
}

pub async fn submit_form(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let today = today();
    let submission = FormSubmission::from_pairs(pairs);
    let mut form = FormState::from_submission(&submission, today)?;

    let mut dashboard = state.dashboard.lock().await;
    match dashboard.submit(&mut form, today).await {
        Ok(_) => Ok(Redirect::to("/?saved=1").into_response()),
        Err(_) => {
            let page = render_index(&dashboard.view(), &form, Some(Notice::SubmitFailed));
            Ok((StatusCode::BAD_GATEWAY, Html(page)).into_response())
        }
    }
}

pub async fn get_records(State(state): State<AppState>) -> Result<Json<Vec<RecordRow>>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.reload().await?;
    Ok(Json(dashboard.view().rows))
}

pub async fn get_charts(State(state): State<AppState>) -> Result<Json<Vec<ChartSpec>>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.reload().await?;
    Ok(Json(dashboard.view().charts))
}

pub async fn post_record(
    State(state): State<AppState>,
    Json(submission): Json<FormSubmission>,
) -> Result<(StatusCode, Json<DispatchResponse>), AppError> {
    let today = today();
    let mut form = FormState::from_submission(&submission, today)?;

    let mut dashboard = state.dashboard.lock().await;
    dashboard.submit(&mut form, today).await?;
    Ok((StatusCode::ACCEPTED, Json(DispatchResponse { dispatched: true })))
}

/// Exports whatever the cache holds right now; no reload.
pub async fn export(State(state): State<AppState>) -> Result<Response, AppError> {
    let dashboard = state.dashboard.lock().await;
    let bytes = export_workbook(dashboard.cache().records())?;

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{EXPORT_FILENAME}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
