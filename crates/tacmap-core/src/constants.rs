//! Engine constants and tuning parameters.

// --- Geodesy ---

/// Mean Earth radius used by the haversine formula (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude bound in degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Longitude bound in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

// --- Simulation ---

/// Default real-time update interval (ms).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 5000;

/// Default per-axis position jitter applied each tick (degrees).
/// A uniform draw in [-0.0005, 0.0005], i.e. a 0.001° wide window.
pub const DEFAULT_JITTER_DEG: f64 = 0.0005;

/// Upper bound on the per-axis jitter (degrees).
pub const MAX_JITTER_DEG: f64 = 0.001;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

// --- Zones ---

/// Minimum vertex count of an operation zone polygon.
pub const MIN_ZONE_POINTS: usize = 3;

// --- Palette ---

pub const COLOR_ACTIVE: &str = "#22c55e";
pub const COLOR_ALERT: &str = "#ef4444";
pub const COLOR_OFFLINE: &str = "#6b7280";

pub const ZONE_FILL_SECURE: &str = "rgba(34, 197, 94, 0.3)";
pub const ZONE_FILL_DANGER: &str = "rgba(239, 68, 68, 0.3)";
pub const ZONE_FILL_RESTRICTED: &str = "rgba(245, 158, 11, 0.3)";

pub const COLOR_OBJECTIVE_PRIMARY: &str = "#3b82f6";
pub const COLOR_OBJECTIVE_SECONDARY: &str = "#a855f7";
pub const COLOR_OBJECTIVE_INTEL: &str = "#f97316";
