use super::models::Coordinates;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Where a cafe lands on the map when its link carries no usable coordinates (London).
pub const FALLBACK_COORDINATES: Coordinates = Coordinates {
    lat: 51.5074,
    lng: -0.1278,
};

/// Fetched lists are served from cache without a network call inside this window.
pub const STALE_AFTER_SECS: u64 = 5 * 60;

/// Cache entries untouched for this long are evicted.
pub const EVICT_AFTER_SECS: u64 = 10 * 60;

pub const OVERVIEW_ZOOM: u8 = 13;
pub const SELECTED_ZOOM: u8 = 15;
