use std::env;

/// Deployed spreadsheet script used when `FITTER_ENDPOINT_URL` is unset.
pub const DEFAULT_ENDPOINT_URL: &str = "https://script.google.com/macros/s/AKfycbxqL1oB8cY_cMHmfCROSIByhW47pFIXPY6Cg1-lzF5LChFT-yn_cUTHGLiyfnwxanE5PQ/exec";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub endpoint_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let endpoint_url = lookup("FITTER_ENDPOINT_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string());

        Self { port, endpoint_url }
    }
}
