use thiserror::Error;

/// Failure of a dashboard query, as reported to the caller.
///
/// Network and parsing problems are collapsed into [`DashboardError::FetchFailed`];
/// the underlying cause stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no city given")]
    EmptyCity,

    #[error("failed to fetch weather data for '{city}': {source:#}")]
    FetchFailed {
        city: String,
        #[source]
        source: anyhow::Error,
    },
}
