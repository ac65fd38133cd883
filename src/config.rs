//! Tunables for the fetch pipeline and for the NDBC HTTP services.

use crate::pool::WorkerPool;
use bon::{bon, Builder};
use std::time::Duration;

pub(crate) const DEFAULT_BASE_URL: &str = "https://www.ndbc.noaa.gov";
pub(crate) const DEFAULT_REQUIRED_VARIABLE: &str = "WTMP";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("buoydata/", env!("CARGO_PKG_VERSION"));

/// Controls how station-years are fetched and normalized.
///
/// # Examples
///
/// ```
/// use buoydata::{FetchConfig, WorkerPool};
///
/// // Deterministic, one request at a time, no column requirement.
/// let config = FetchConfig::builder()
///     .pool(WorkerPool::Sequential)
///     .build()
///     .without_required_variable();
/// assert_eq!(config.required_variable, None);
///
/// let default = FetchConfig::default();
/// assert_eq!(default.required_variable.as_deref(), Some("WTMP"));
/// ```
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Worker pool used for per-year and per-station fan-out.
    pub pool: WorkerPool,
    /// A station-year lacking this column is skipped. `None` accepts any columns.
    pub required_variable: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl FetchConfig {
    /// Builds a config; the required variable defaults to water temperature (`WTMP`).
    ///
    /// Leaving `required_variable` unset and passing `None` to
    /// `maybe_required_variable` are the same to the builder: both select
    /// `WTMP`. Call [`FetchConfig::without_required_variable`] on the built
    /// config to drop the requirement.
    #[builder]
    pub fn new(
        #[builder(default)] pool: WorkerPool,
        #[builder(into)] required_variable: Option<String>,
    ) -> Self {
        Self {
            pool,
            required_variable: Some(
                required_variable.unwrap_or_else(|| DEFAULT_REQUIRED_VARIABLE.to_string()),
            ),
        }
    }

    /// Accept station-years regardless of which variables they carry.
    pub fn without_required_variable(mut self) -> Self {
        self.required_variable = None;
        self
    }
}

/// Endpoint and HTTP client settings for the NDBC services.
#[derive(Debug, Clone, Builder)]
pub struct ServiceConfig {
    /// Root of the NDBC web site; every service URL is derived from it.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(into, default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ServiceConfig {
    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
