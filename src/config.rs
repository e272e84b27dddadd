//! Client configuration. The defaults point at the production API root with a
//! three hour response cache and a 0.05 degree search box.

use crate::cache::response_cache::{DEFAULT_CACHE_STORE_NAME, DEFAULT_CACHE_TTL_SECS};
use crate::http::client::ConnectionFailurePolicy;
use crate::stations::locate_station::{DistanceMetric, DEFAULT_SEARCH_RADIUS_DEGREES};
use bon::Builder;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_ROOT: &str = "https://mintaka.niwa.co.nz/rest/api/V1.1/products/geo/data/1";

/// Settings for a [`crate::Vcsn`] client.
///
/// # Examples
///
/// ```
/// use vcsn::{ConnectionFailurePolicy, VcsnConfig};
///
/// let config = VcsnConfig::builder()
///     .cache_ttl_secs(0) // no response caching
///     .connection_failure_policy(ConnectionFailurePolicy::Abort)
///     .build();
/// assert_eq!(config.api_root, vcsn::DEFAULT_API_ROOT);
/// assert_eq!(config.search_radius_degrees, 0.05);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct VcsnConfig {
    /// Base URL; requests go to `{api_root}/{station}/{measurement}`.
    #[builder(into, default = DEFAULT_API_ROOT.to_string())]
    pub api_root: String,

    /// Directory holding the response cache. `None` uses the user cache directory.
    #[builder(into)]
    pub cache_dir: Option<PathBuf>,

    #[builder(into, default = DEFAULT_CACHE_STORE_NAME.to_string())]
    pub cache_store_name: String,

    /// Response time-to-live in seconds; `0` or less disables caching.
    #[builder(default = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: i64,

    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub request_timeout: Option<Duration>,

    #[builder(default)]
    pub connection_failure_policy: ConnectionFailurePolicy,

    /// Half-width of the station search box when selecting by coordinates.
    #[builder(default = DEFAULT_SEARCH_RADIUS_DEGREES)]
    pub search_radius_degrees: f64,

    #[builder(default)]
    pub distance_metric: DistanceMetric,

    /// Directory holding the two reference CSV files.
    #[builder(into, default = PathBuf::from("."))]
    pub reference_dir: PathBuf,
}

impl Default for VcsnConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = VcsnConfig::default();
        assert_eq!(config.api_root, DEFAULT_API_ROOT);
        assert_eq!(config.cache_store_name, "VCSN_cache");
        assert_eq!(config.cache_ttl_secs, 10_800);
        assert_eq!(config.search_radius_degrees, 0.05);
        assert_eq!(config.distance_metric, DistanceMetric::Planar);
        assert_eq!(
            config.connection_failure_policy,
            ConnectionFailurePolicy::Recoverable
        );
        assert_eq!(config.cache_dir, None);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn builder_overrides() {
        let config = VcsnConfig::builder()
            .api_root("http://localhost:8080/data")
            .cache_dir("/tmp/vcsn")
            .request_timeout(Duration::from_secs(3))
            .distance_metric(DistanceMetric::Haversine)
            .build();
        assert_eq!(config.api_root, "http://localhost:8080/data");
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/vcsn")));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.distance_metric, DistanceMetric::Haversine);
    }
}
