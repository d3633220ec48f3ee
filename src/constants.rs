/// Source name constants to ensure consistency across the codebase
// User-friendly source names (used in CLI)
pub const ROSGRANSTROY_SOURCE: &str = "rosgranstroy";
pub const KASPIKO_SOURCE: &str = "kaspiko";

// Upstream endpoints
pub const ROSGRANSTROY_API_URL: &str = "https://rosgranstroy.ru/api/map_data";
pub const KASPIKO_PAGE_URL: &str =
    "https://kaspiko.ru/info/punkty-propuska-cherez-gosgranitsu-rossiyskoy-federatsii/";

// Confidence levels recorded in provenance fields
pub const CONFIDENCE_HIGH: &str = "high";
pub const CONFIDENCE_MEDIUM: &str = "medium";

// Identifier synthesis
pub const COUNTRY_PREFIX: &str = "RUS";
pub const FALLBACK_REGION_CODE: &str = "RUS";

// Generated artifact file names
pub const ROSGRANSTROY_SNAPSHOT_FILE: &str = "rosgranstroy_map_data.json";
pub const KASPIKO_SNAPSHOT_FILE: &str = "kaspiko_checkpoints_raw.csv";
pub const CHECKPOINTS_CSV_FILE: &str = "checkpoints_v1.csv";
pub const CHECKPOINTS_GEOJSON_FILE: &str = "checkpoints_v1.geojson";
pub const FRONTEND_GEOJSON_FILE: &str = "checkpoints.geojson";

/// Get all supported user-friendly source names
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![ROSGRANSTROY_SOURCE, KASPIKO_SOURCE]
}
