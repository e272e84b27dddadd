pub mod error;
pub mod response_cache;
