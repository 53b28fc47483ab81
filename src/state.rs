use crate::chart::{ChartPresenter, ChartSpec};
use crate::form::FormState;
use crate::list::{RecordRow, render_rows};
use crate::store::{Dispatched, RecordCache, RecordStoreClient, StoreError};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, warn};

pub const LOAD_FAILED_MESSAGE: &str = "데이터를 불러오는 데 실패했습니다. 설정을 확인하세요.";
pub const SUBMIT_FAILED_MESSAGE: &str = "기록 저장에 실패했습니다. 인터넷 연결을 확인하세요.";
pub const SUBMIT_OK_MESSAGE: &str = "성공적으로 기록되었습니다!";

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(store: RecordStoreClient) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(Dashboard::new(store))),
        }
    }
}

/// Owns the record cache and everything derived from it.
pub struct Dashboard {
    store: RecordStoreClient,
    cache: RecordCache,
    charts: ChartPresenter,
    load_error: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub rows: Vec<RecordRow>,
    pub charts: Vec<ChartSpec>,
    pub load_error: Option<&'static str>,
}

impl Dashboard {
    pub fn new(store: RecordStoreClient) -> Self {
        Self {
            store,
            cache: RecordCache::default(),
            charts: ChartPresenter::default(),
            load_error: None,
        }
    }

    /// Load, replace the cache, re-render every chart. A failed load keeps
    /// the previous cache and records the inline error message.
    pub async fn reload(&mut self) -> Result<(), StoreError> {
        match self.store.load().await {
            Ok(records) => {
                self.cache.replace(records);
                self.charts.render_all(self.cache.records());
                self.load_error = None;
                Ok(())
            }
            Err(err) => {
                error!(endpoint = %self.store.endpoint(), "error loading records: {err}");
                self.load_error = Some(LOAD_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    /// Runs the submit sequence for a filled-in form. On success the form is
    /// reset to `today` and the dashboard reloaded; on failure it is left
    /// populated. The submit control is re-enabled either way.
    pub async fn submit(
        &mut self,
        form: &mut FormState,
        today: NaiveDate,
    ) -> Result<Dispatched, StoreError> {
        form.begin_submit();
        let payload = form.build_payload();

        let outcome = self.store.submit(&payload).await;
        match &outcome {
            Ok(_) => {
                form.reset(today);
                if let Err(err) = self.reload().await {
                    warn!("reload after submit failed: {err}");
                }
            }
            Err(err) => error!("error submitting record: {err}"),
        }

        form.finish_submit();
        outcome
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            rows: render_rows(self.cache.records()),
            charts: self.charts.charts(),
            load_error: self.load_error,
        }
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn load_error(&self) -> Option<&'static str> {
        self.load_error
    }
}
