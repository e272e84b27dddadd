//! The main entry point: a client that selects a VCSN station and fetches time
//! series for it.

use crate::cache::error::CacheError;
use crate::cache::response_cache::ResponseCache;
use crate::config::VcsnConfig;
use crate::error::VcsnError;
use crate::http::client::HttpClient;
use crate::http::error::TransportError;
use crate::http::transport::{Credentials, Transport};
use crate::reference::ReferenceTables;
use crate::stations::locate_station::StationLocator;
use crate::types::date_bound::DateBound;
use crate::types::measurement::{MeasurementRef, MeasurementType};
use crate::types::station::StationRef;
use crate::types::time_series::{format_request_time, DateRange, TimeSeriesFrame};
use crate::utils::get_cache_dir;
use crate::weather_data::reply::{parse_span, reply_to_frame};
use bon::bon;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde_json::Value;
use std::path::PathBuf;

/// Days from the Unix epoch to 1990-07-01, the start used when no span is known.
const DEFAULT_START_DAYS: i64 = 7486;

fn default_start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(DEFAULT_START_DAYS)
}

/// Client for the NIWA Virtual Climate Station Network API.
///
/// A client owns its reference tables, its transport and a handle to the
/// response cache, plus the current selection: a station id and optional
/// credentials. Select a station with [`Vcsn::select_station`], then call
/// [`Vcsn::fetch_data`].
///
/// Selection is mutated through `&mut self`; share a client across threads only
/// behind a lock.
///
/// # Examples
///
/// ```no_run
/// use vcsn::{LatLon, StationRef, Vcsn, VcsnConfig, VcsnError};
///
/// # fn main() -> Result<(), VcsnError> {
/// let config = VcsnConfig::builder().reference_dir("data").build();
/// let mut client = Vcsn::with_config(config)?;
/// client.set_credentials("user", "secret");
///
/// let station = client.select_station(StationRef::ByCoordinates(LatLon(-41.2865, 174.7762)))?;
/// println!("Using station {}", station);
///
/// if let Some(rain) = client
///     .fetch_data()
///     .measurement("rain")
///     .start("2020-01-01")
///     .end("2020-12-31")
///     .call()?
/// {
///     println!("{}", rain.frame);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Vcsn {
    config: VcsnConfig,
    reference: ReferenceTables,
    locator: StationLocator,
    transport: Box<dyn Transport>,
    cache: ResponseCache,
    station: Option<i64>,
    credentials: Option<Credentials>,
}

#[bon]
impl Vcsn {
    /// Creates a client with default settings, reading the reference tables from
    /// the current directory.
    ///
    /// # Errors
    ///
    /// [`VcsnError::ReferenceTable`] if either reference CSV cannot be loaded,
    /// [`VcsnError::Cache`] if caching is enabled and no cache directory can be
    /// determined.
    pub fn new() -> Result<Self, VcsnError> {
        Self::with_config(VcsnConfig::default())
    }

    /// Creates a client from `config`, loading reference tables from
    /// `config.reference_dir` and talking to the network over [`HttpClient`].
    pub fn with_config(config: VcsnConfig) -> Result<Self, VcsnError> {
        let reference = ReferenceTables::from_dir(&config.reference_dir)?;
        let transport =
            HttpClient::new(config.request_timeout, config.connection_failure_policy)?;
        let cache_dir = resolve_cache_dir(&config, get_cache_dir)?;
        let cache = ResponseCache::new(&cache_dir, &config.cache_store_name, config.cache_ttl_secs);
        Ok(Self::with_parts(config, reference, Box::new(transport), cache))
    }

    /// Assembles a client from already constructed parts.
    pub fn with_parts(
        config: VcsnConfig,
        reference: ReferenceTables,
        transport: Box<dyn Transport>,
        cache: ResponseCache,
    ) -> Self {
        let locator = StationLocator::new(&reference.grid);
        Self {
            config,
            reference,
            locator,
            transport,
            cache,
            station: None,
            credentials: None,
        }
    }

    pub fn config(&self) -> &VcsnConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceTables {
        &self.reference
    }

    /// Selects the station used by subsequent fetches and returns its id.
    ///
    /// [`StationRef::ById`] is stored as given, without consulting the grid.
    /// [`StationRef::ByCoordinates`] resolves the nearest grid station within the
    /// configured search box.
    ///
    /// # Errors
    ///
    /// [`VcsnError::LocateStation`] when coordinates are out of range or no
    /// station lies in the search box. The previous selection is kept.
    pub fn select_station(&mut self, station: impl Into<StationRef>) -> Result<i64, VcsnError> {
        let id = match station.into() {
            StationRef::ById(id) => id,
            StationRef::ByCoordinates(location) => self.locator.nearest_station(
                location.0,
                location.1,
                self.config.search_radius_degrees,
                self.config.distance_metric,
            )?,
        };
        info!("Selected station {}", id);
        self.station = Some(id);
        Ok(id)
    }

    /// The selected station id, if any.
    pub fn station(&self) -> Option<i64> {
        self.station
    }

    /// Sets basic-auth credentials used for every subsequent request.
    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.credentials = Some(Credentials::new(username, password));
    }

    pub fn clear_credentials(&mut self) {
        self.credentials = None;
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn measurement_code(&self, name: &str) -> Option<i64> {
        self.reference.measurements.code(name)
    }

    pub fn measurement_name(&self, code: i64) -> Option<&str> {
        self.reference.measurements.name(code)
    }

    /// Deletes the response cache store. A store that does not exist is fine.
    pub fn clobber_cache(&self) -> Result<(), VcsnError> {
        self.cache.clear().map_err(VcsnError::from)
    }

    /// Asks the API for the full date span it holds for `measurement` at the
    /// selected station.
    ///
    /// Returns `Ok(None)` when the span cannot be retrieved or read.
    ///
    /// # Errors
    ///
    /// [`VcsnError::UnknownMeasurement`] and [`VcsnError::NoStationSelected`],
    /// both raised before any request.
    pub fn available_span(
        &self,
        measurement: impl Into<MeasurementRef>,
    ) -> Result<Option<DateRange>, VcsnError> {
        let measurement = self.resolve_measurement(measurement.into())?;
        let station = self.station.ok_or(VcsnError::NoStationSelected)?;
        Ok(self.query_span(station, measurement))
    }

    /// Fetches a time series for the selected station.
    ///
    /// Missing bounds are taken from the station's available span; if that
    /// cannot be retrieved the start falls back to 1990-07-01 and the end to
    /// now. Bounds are sent as `YYYY-MM-DDTHH:MM:SSZ`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.measurement(..)`: **Required.** A measurement name (`"rain"`) or code (`1`).
    /// * `.start(..)`: Optional. Anything convertible to [`DateBound`]. A date means
    ///   midnight; a month or year starts at its first instant.
    /// * `.end(..)`: Optional. As `start`, except a month or year ends at its last instant.
    ///
    /// # Returns
    ///
    /// `Ok(Some(frame))` with columns `timestamp` and the measurement name.
    /// `Ok(None)` when the request fails (timeout, HTTP error, redirects) or the
    /// reply cannot be converted; the cause is logged.
    ///
    /// # Errors
    ///
    /// Raised before any request:
    /// * [`VcsnError::UnknownMeasurement`] if the measurement is not in the table.
    /// * [`VcsnError::NoStationSelected`] if no station has been selected.
    /// * [`VcsnError::DateParsing`] if a bound cannot be resolved.
    ///
    /// And [`VcsnError::Transport`] if the host cannot be reached (with
    /// [`crate::ConnectionFailurePolicy::Abort`] the process exits instead).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use vcsn::{Vcsn, VcsnError, Year};
    /// # fn main() -> Result<(), VcsnError> {
    /// let mut client = Vcsn::new()?;
    /// client.select_station(31001_i64)?;
    ///
    /// // Everything the station holds
    /// let all = client.fetch_data().measurement("tmax").call()?;
    ///
    /// // One year, by product code
    /// let year = client
    ///     .fetch_data()
    ///     .measurement(1_i64)
    ///     .start(Year(2020))
    ///     .end(Year(2020))
    ///     .call()?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn fetch_data(
        &self,
        #[builder(into)] measurement: MeasurementRef,
        #[builder(into)] start: Option<DateBound>,
        #[builder(into)] end: Option<DateBound>,
    ) -> Result<Option<TimeSeriesFrame>, VcsnError> {
        let measurement = self.resolve_measurement(measurement)?;
        let station = self.station.ok_or(VcsnError::NoStationSelected)?;
        let start = start.map(|b| resolve_bound(&b, DateBound::earliest)).transpose()?;
        let end = end.map(|b| resolve_bound(&b, DateBound::latest)).transpose()?;

        let range = match (start, end) {
            (Some(start), Some(end)) => DateRange { start, end },
            _ => {
                let span = self.query_span(station, measurement);
                DateRange {
                    start: start.or(span.map(|s| s.start)).unwrap_or_else(default_start),
                    end: end.or(span.map(|s| s.end)).unwrap_or_else(Utc::now),
                }
            }
        };

        let url = format!(
            "{}?startDate={}&endDate={}",
            self.series_url(station, measurement),
            format_request_time(range.start),
            format_request_time(range.end)
        );

        let reply = match self.web_fetch(&url) {
            Ok(reply) => reply,
            Err(e) if e.is_connection() => return Err(e.into()),
            Err(e) => {
                warn!(
                    "No data for station {} / {}: {}",
                    station, measurement.name, e
                );
                return Ok(None);
            }
        };

        match reply_to_frame(&reply, &measurement.name) {
            Ok(frame) => {
                info!(
                    "Fetched {} {} records for station {} ({})",
                    frame.len(),
                    measurement.name,
                    station,
                    range
                );
                Ok(Some(frame))
            }
            Err(e) => {
                warn!(
                    "No data found for station {} / {}: {}",
                    station, measurement.name, e
                );
                Ok(None)
            }
        }
    }

    fn resolve_measurement(
        &self,
        measurement: MeasurementRef,
    ) -> Result<&MeasurementType, VcsnError> {
        self.reference
            .measurements
            .resolve(&measurement)
            .ok_or(VcsnError::UnknownMeasurement(measurement))
    }

    fn series_url(&self, station: i64, measurement: &MeasurementType) -> String {
        format!(
            "{}/{}/{}",
            self.config.api_root.trim_end_matches('/'),
            station,
            measurement.code
        )
    }

    fn query_span(&self, station: i64, measurement: &MeasurementType) -> Option<DateRange> {
        let url = self.series_url(station, measurement);
        let reply = match self.web_fetch(&url) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Span query failed, using default bounds: {}", e);
                return None;
            }
        };
        match parse_span(&reply) {
            Ok(span) => {
                debug!("Station {} holds {} from {}", station, measurement.name, span);
                Some(span)
            }
            Err(e) => {
                warn!("Unreadable span reply from {}, using default bounds: {}", url, e);
                None
            }
        }
    }

    /// GET through the response cache.
    fn web_fetch(&self, url: &str) -> Result<Value, TransportError> {
        if let Some(cached) = self.cache.get(url) {
            return Ok(cached);
        }
        debug!("Requesting {}", url);
        let reply = self.transport.get(url, self.credentials.as_ref())?;
        if let Err(e) = self.cache.put(url, &reply) {
            warn!("Failed to cache reply for {}: {}", url, e);
        }
        Ok(reply)
    }
}

/// The configured cache directory, else the user cache directory. With caching
/// disabled the temp directory stands in when there is no user cache directory.
fn resolve_cache_dir(
    config: &VcsnConfig,
    user_cache_dir: impl FnOnce() -> Result<PathBuf, CacheError>,
) -> Result<PathBuf, CacheError> {
    if let Some(dir) = &config.cache_dir {
        return Ok(dir.clone());
    }
    match user_cache_dir() {
        Ok(dir) => Ok(dir),
        Err(e) if config.cache_ttl_secs <= 0 => {
            debug!("{}; caching is disabled, using the temp directory", e);
            Ok(std::env::temp_dir())
        }
        Err(e) => Err(e),
    }
}

fn resolve_bound(
    bound: &DateBound,
    pick: fn(&DateBound) -> Option<DateTime<Utc>>,
) -> Result<DateTime<Utc>, VcsnError> {
    pick(bound).ok_or_else(|| {
        VcsnError::DateParsing(match bound {
            DateBound::Text(text) => text.clone(),
            other => format!("{:?}", other),
        })
    })
}
