//! A Rust library for loading, filtering and aggregating business-establishment
//! registry data, with geographic matching and table export.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod geo;
pub mod loader;
pub mod lookup;
pub mod normalize;
pub mod schema;
pub mod table;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{DEFAULT_BATCH_SIZE, EstabReaderConfig, MIN_VALID_YEAR};
pub use error::{Error, Result};
pub use table::EstablishmentTable;

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Loading
pub use cache::LoadCache;
pub use loader::{
    LoadOutcome, PartitionWarning, find_partition_files, load_directory, load_partitions,
    read_partition,
};
pub use lookup::ActivityLookup;
pub use normalize::normalize_batch;
pub use schema::{EstablishmentType, RegistryStatus, map_status_code, map_type_code};

// Filtering capabilities
pub use filter::{Expr, FilterSelection, LiteralValue, YearRange, filter_table};

// Aggregation
pub use aggregate::{
    RankedActivity, SummaryStats, ValueCount, decade_distribution, distinct_values, percentage,
    summary_stats, timeline, top_activities, top_municipalities,
};

// Geography and export
pub use export::{to_csv, to_spreadsheet};
pub use format::format_cnpj_basico;
pub use geo::{BoundaryCollection, MunicipalityCount, municipality_map_data, normalize_name};
