use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use itertools::Itertools;
use log::{error, info, warn};

use estab_reader::aggregate::{
    decade_distribution, decade_label, percentage, top_activities_with_descriptions,
    top_municipalities,
};
use estab_reader::config::{ACTIVITY_LOOKUP_FILE, BOUNDARY_FILE};
use estab_reader::export::{export_file_name, to_csv, to_spreadsheet};
use estab_reader::geo::{join_counts, unmatched_municipalities};
use estab_reader::schema::{ANO_INICIO, SITUACAO_DESCRICAO};
use estab_reader::{
    ActivityLookup, BoundaryCollection, EstabReaderConfig, EstablishmentTable, Error,
    FilterSelection, RegistryStatus, Result, filter_table, find_partition_files, load_partitions,
    municipality_map_data, summary_stats,
};

const TOP_N: usize = 10;

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage: estab-reader [DATA_DIR] [EXPORT_DIR]
    let mut args = std::env::args().skip(1);
    let data_dir = args.next().map_or_else(|| PathBuf::from("dados"), PathBuf::from);
    let export_dir = args.next().map(PathBuf::from);

    if !data_dir.exists() {
        warn!("Data directory not found: {}", data_dir.display());
        return Ok(());
    }

    let config = EstabReaderConfig::from_env();
    let lookup_path = data_dir.join(ACTIVITY_LOOKUP_FILE);
    let boundary_path = data_dir.join(BOUNDARY_FILE);

    info!("Loading establishment data from: {}", data_dir.display());
    let partitions = find_partition_files(&data_dir)?
        .into_iter()
        .filter(|p| *p != lookup_path)
        .collect_vec();

    let outcome = match load_partitions(&partitions, &config) {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(Error::NoDataAvailable { .. }) = e.downcast_ref::<Error>() {
                error!("No data available. Check that the partition files exist in {}", data_dir.display());
            }
            return Err(e);
        }
    };
    for warning in &outcome.warnings {
        warn!("{warning}");
    }
    let table = &outcome.table;

    // Headline numbers
    let stats = summary_stats(table)?;
    info!("Summary: {}", serde_json::to_string(&stats)?);

    // Rankings
    let lookup = ActivityLookup::load_or_degrade(&lookup_path, &config);
    for activity in top_activities_with_descriptions(table, TOP_N, lookup.as_ref())? {
        info!(
            "Activity {} ({:.2}%): {} [{}]",
            activity.count,
            percentage(activity.count, stats.total),
            activity.description,
            activity.code
        );
    }
    for municipality in top_municipalities(table, TOP_N)? {
        info!(
            "Municipality {} ({:.2}%): {}",
            municipality.count,
            municipality.share_of(stats.total),
            municipality.value
        );
    }

    // Openings per decade
    let decades = decade_distribution(table, ANO_INICIO)?
        .iter()
        .map(|d| format!("{}={}", decade_label(d.value), d.count))
        .join(", ");
    info!("Openings per decade: {decades}");

    // Map join
    if let Some(boundaries) = BoundaryCollection::load_or_degrade(&boundary_path, &config) {
        let counts = municipality_map_data(table)?;
        let joined = join_counts(&boundaries, &counts);
        let with_records = joined.iter().filter(|j| j.count > 0).count();
        info!(
            "{with_records} of {} boundary features have establishments",
            joined.len()
        );
        let unmatched = unmatched_municipalities(&boundaries, &counts);
        if !unmatched.is_empty() {
            warn!(
                "{} municipalities did not match a boundary: {}",
                unmatched.len(),
                unmatched.iter().take(TOP_N).map(|m| &m.name).join(", ")
            );
        }
    }

    if let Some(dir) = export_dir {
        export_active(table, &dir, &config)?;
    }

    info!("Done");
    Ok(())
}

/// Write the active establishments as CSV and xlsx into `dir`
fn export_active(table: &EstablishmentTable, dir: &Path, config: &EstabReaderConfig) -> Result<()> {
    let start = Instant::now();
    let selection =
        FilterSelection::new().with_values(SITUACAO_DESCRICAO, [RegistryStatus::Ativa.label()]);
    let active = filter_table(table, &selection)?;

    let now = Local::now().naive_local();
    let csv_path = dir.join(export_file_name("estabelecimentos_ativos", "csv", now));
    std::fs::write(&csv_path, to_csv(&active)?)?;

    let xlsx_path = dir.join(export_file_name("estabelecimentos_ativos", "xlsx", now));
    std::fs::write(&xlsx_path, to_spreadsheet(&active, &config.sheet_name)?)?;

    info!(
        "Exported {} active establishments to {} and {} in {:?}",
        active.num_rows(),
        csv_path.display(),
        xlsx_path.display(),
        start.elapsed()
    );
    Ok(())
}
