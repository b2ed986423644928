use crate::utils::{RawRow, sample_table, table_from_rows};
use estab_reader::aggregate::{
    RankedActivity, ValueCount, available_year_range, decade_distribution, decade_label,
    distinct_values, percentage, status_distribution, summary_stats, timeline_until,
    top_activities, top_activities_with_descriptions, top_municipalities, type_distribution,
};
use estab_reader::schema::{ANO_INICIO, ANO_SITUACAO, NOME_MUNICIPIO};
use estab_reader::{ActivityLookup, FilterSelection, SummaryStats, filter_table};

fn pairs<K: Clone>(counts: &[ValueCount<K>]) -> Vec<(K, usize)> {
    counts.iter().map(|vc| (vc.value.clone(), vc.count)).collect()
}

fn row_in(municipio: &'static str) -> RawRow {
    [Some("00000001"), Some("1"), Some("02"), None, None, None, Some(municipio)]
}

fn row_started(start: &'static str) -> RawRow {
    [Some("00000001"), Some("1"), Some("02"), None, Some(start), None, None]
}

#[test]
fn test_summary_stats() -> estab_reader::Result<()> {
    let stats = summary_stats(&sample_table())?;
    assert_eq!(
        stats,
        SummaryStats {
            total: 7,
            headquarters: 4,
            branches: 2,
            active: 4,
            closed: 1,
            municipalities: 3,
            activity_codes: 3,
        }
    );
    Ok(())
}

/// Top-N with ties broken by first appearance
#[test]
fn test_top_values_order() -> estab_reader::Result<()> {
    let table = table_from_rows(&[
        row_in("A"),
        row_in("B"),
        row_in("A"),
        row_in("C"),
        row_in("B"),
        row_in("A"),
    ]);

    let top = top_municipalities(&table, 2)?;
    assert_eq!(pairs(&top), vec![("A".to_string(), 3), ("B".to_string(), 2)]);

    // Asking for more than there is returns what there is
    assert_eq!(top_municipalities(&table, 10)?.len(), 3);
    assert!(top_municipalities(&table, 0)?.is_empty());
    Ok(())
}

#[test]
fn test_top_rankings_on_sample() -> estab_reader::Result<()> {
    let table = sample_table();

    let cities = top_municipalities(&table, 10)?;
    assert_eq!(
        pairs(&cities),
        vec![
            ("Porto Alegre".to_string(), 3),
            ("Canoas".to_string(), 2),
            ("São Leopoldo".to_string(), 1),
        ]
    );
    assert_eq!(cities[0].share_of(table.num_rows()), 42.86);

    let activities = top_activities(&table, 2)?;
    assert_eq!(
        pairs(&activities),
        vec![("4711302".to_string(), 3), ("6422100".to_string(), 2)]
    );
    Ok(())
}

#[test]
fn test_activity_descriptions() -> estab_reader::Result<()> {
    let table = sample_table();
    let lookup = ActivityLookup::from_pairs([
        ("4711-3/02", "Supermercados"),
        ("4731-8/00", "Comércio varejista de combustíveis"),
    ]);

    let ranked = top_activities_with_descriptions(&table, 3, Some(&lookup))?;
    assert_eq!(
        ranked[0],
        RankedActivity {
            code: "4711302".to_string(),
            description: "Supermercados".to_string(),
            count: 3,
        }
    );
    // No description falls back to the code
    assert_eq!(ranked[1].description, "6422100");
    assert_eq!(ranked[2].description, "Comércio varejista de combustíveis");

    let without = top_activities_with_descriptions(&table, 1, None)?;
    assert_eq!(without[0].description, without[0].code);
    Ok(())
}

#[test]
fn test_categorical_distributions() -> estab_reader::Result<()> {
    let table = sample_table();

    assert_eq!(
        pairs(&status_distribution(&table)?),
        vec![
            ("ATIVA".to_string(), 4),
            ("BAIXADA".to_string(), 1),
            ("SUSPENSA".to_string(), 1),
        ]
    );
    assert_eq!(
        pairs(&type_distribution(&table)?),
        vec![("MATRIZ".to_string(), 4), ("FILIAL".to_string(), 2)]
    );
    Ok(())
}

#[test]
fn test_timeline_window() -> estab_reader::Result<()> {
    let table = sample_table();

    let timeline = timeline_until(&table, ANO_INICIO, 2020)?;
    assert_eq!(
        pairs(&timeline),
        vec![(1966, 1), (1998, 1), (2011, 1), (2019, 1), (2020, 1)]
    );

    let clipped = timeline_until(&table, ANO_INICIO, 2019)?;
    assert_eq!(clipped.last().map(|vc| vc.value), Some(2019));

    let by_status_year = timeline_until(&table, ANO_SITUACAO, 2024)?;
    assert_eq!(pairs(&by_status_year)[0], (2005, 2));
    Ok(())
}

#[test]
fn test_years_before_1900_are_excluded() -> estab_reader::Result<()> {
    let table = table_from_rows(&[row_started("18991231"), row_started("19000101")]);
    assert_eq!(pairs(&timeline_until(&table, ANO_INICIO, 2024)?), vec![(1900, 1)]);
    assert_eq!(available_year_range(&table, ANO_INICIO, 2024)?, Some((1900, 1900)));
    Ok(())
}

#[test]
fn test_decade_buckets() -> estab_reader::Result<()> {
    let table = table_from_rows(&[
        row_started("20110101"),
        row_started("20190101"),
        row_started("20200101"),
        row_started("19980101"),
    ]);

    let decades = decade_distribution(&table, ANO_INICIO)?;
    assert_eq!(pairs(&decades), vec![(1990, 1), (2010, 2), (2020, 1)]);

    let labels: Vec<String> = decades.iter().map(|d| decade_label(d.value)).collect();
    assert_eq!(labels, vec!["1990s", "2010s", "2020s"]);
    Ok(())
}

#[test]
fn test_year_options() -> estab_reader::Result<()> {
    let table = sample_table();
    assert_eq!(available_year_range(&table, ANO_INICIO, 2030)?, Some((1966, 2020)));
    assert_eq!(available_year_range(&table, ANO_INICIO, 2015)?, Some((1966, 2011)));

    assert_eq!(
        distinct_values(&table, NOME_MUNICIPIO)?,
        vec!["Canoas", "Porto Alegre", "São Leopoldo"]
    );
    Ok(())
}

/// Every aggregation is total on an empty table
#[test]
fn test_empty_table() -> estab_reader::Result<()> {
    let selection = FilterSelection::new().with_values(NOME_MUNICIPIO, ["Gramado"]);
    let empty = filter_table(&sample_table(), &selection)?;

    let stats = summary_stats(&empty)?;
    assert_eq!(stats.total, 0);
    assert_eq!(percentage(stats.active, stats.total), 0.0);
    assert!(top_municipalities(&empty, 10)?.is_empty());
    assert!(top_activities_with_descriptions(&empty, 10, None)?.is_empty());
    assert!(timeline_until(&empty, ANO_INICIO, 2024)?.is_empty());
    assert!(decade_distribution(&empty, ANO_INICIO)?.is_empty());
    assert_eq!(available_year_range(&empty, ANO_INICIO, 2024)?, None);
    assert!(distinct_values(&empty, NOME_MUNICIPIO)?.is_empty());
    Ok(())
}
