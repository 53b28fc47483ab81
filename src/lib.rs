pub mod aggregate;
pub mod app;
pub mod chart;
pub mod config;
pub mod errors;
pub mod export;
pub mod form;
pub mod handlers;
pub mod list;
pub mod models;
pub mod state;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use store::RecordStoreClient;
