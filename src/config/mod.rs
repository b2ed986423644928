//! Configuration for loading and exporting establishment data.

/// Default number of rows per Arrow batch when reading CSV partitions
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Earliest year accepted by timelines and year-range options
pub const MIN_VALID_YEAR: i32 = 1900;

/// Activity description table expected next to the partitions
pub const ACTIVITY_LOOKUP_FILE: &str = "codigos_cnae_2.csv";

/// Municipality boundaries expected next to the partitions
pub const BOUNDARY_FILE: &str = "municipios_rs.json";

/// Configuration for the establishment reader
#[derive(Debug, Clone)]
pub struct EstabReaderConfig {
    /// Field delimiter of the partition files
    pub delimiter: u8,
    /// Field delimiter of the activity description file
    pub lookup_delimiter: u8,
    /// Rows per Arrow batch while reading
    pub batch_size: usize,
    /// `chrono` format of the registry's date fields
    pub date_format: String,
    /// Read partitions on the rayon pool (output order is unchanged)
    pub parallel_load: bool,
    /// Show a progress bar while loading partitions
    pub show_progress: bool,
    /// GeoJSON feature property holding the municipality name
    pub boundary_name_property: String,
    /// Worksheet name used by the spreadsheet export
    pub sheet_name: String,
}

impl Default for EstabReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            lookup_delimiter: b',',
            batch_size: DEFAULT_BATCH_SIZE,
            date_format: "%Y%m%d".to_string(),
            parallel_load: false,
            show_progress: false,
            boundary_name_property: "name".to_string(),
            sheet_name: "Estabelecimentos".to_string(),
        }
    }
}

impl EstabReaderConfig {
    /// Defaults with overrides from `ESTAB_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(batch_size) = get_batch_size() {
            config.batch_size = batch_size;
        }
        if let Some(delimiter) = env_delimiter("ESTAB_DELIMITER") {
            config.delimiter = delimiter;
        }
        if let Some(delimiter) = env_delimiter("ESTAB_LOOKUP_DELIMITER") {
            config.lookup_delimiter = delimiter;
        }
        if let Ok(value) = std::env::var("ESTAB_PARALLEL_LOAD") {
            config.parallel_load = parse_flag(&value);
        }
        if let Ok(value) = std::env::var("ESTAB_SHOW_PROGRESS") {
            config.show_progress = parse_flag(&value);
        }
        if let Ok(property) = std::env::var("ESTAB_BOUNDARY_NAME_PROPERTY") {
            config.boundary_name_property = property;
        }

        config
    }
}

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("ESTAB_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
}

fn env_delimiter(key: &str) -> Option<u8> {
    std::env::var(key).ok().and_then(|s| s.bytes().next())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
