mod cache;
mod config;
mod error;
mod http;
mod reference;
mod stations;
mod types;
mod utils;
mod vcsn;
mod weather_data;

pub use config::*;
pub use error::VcsnError;
pub use vcsn::*;

pub use cache::error::CacheError;
pub use cache::response_cache::*;

pub use http::client::*;
pub use http::error::TransportError;
pub use http::transport::*;

pub use reference::error::ReferenceTableError;
pub use reference::grid_table::*;
pub use reference::measurement_table::*;
pub use reference::ReferenceTables;

pub use stations::error::LocateStationError;
pub use stations::locate_station::*;

pub use types::calendar::{Month, StartEndDateTime, Year};
pub use types::date_bound::DateBound;
pub use types::measurement::*;
pub use types::station::*;
pub use types::time_series::*;

pub use utils::get_cache_dir;
pub use weather_data::error::ReplyFormatError;
pub use weather_data::reply::{parse_records, parse_span, reply_to_frame};
