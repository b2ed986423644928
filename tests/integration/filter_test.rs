use crate::utils::sample_table;
use estab_reader::aggregate::summary_stats;
use estab_reader::filter::filter_table_by_expr;
use estab_reader::schema::{
    ANO_INICIO, CNPJ_BASICO, NOME_MUNICIPIO, SITUACAO_DESCRICAO, TIPO_ESTABELECIMENTO,
};
use estab_reader::{Error, Expr, FilterSelection, LiteralValue, filter_table};

fn cnpjs(table: &estab_reader::EstablishmentTable) -> Vec<String> {
    table
        .strings(CNPJ_BASICO)
        .unwrap()
        .iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

/// An empty selection keeps every row
#[test]
fn test_unconstrained_selection() -> estab_reader::Result<()> {
    let table = sample_table();
    let selection = FilterSelection::new()
        .with_values(NOME_MUNICIPIO, Vec::<String>::new())
        .with_values(SITUACAO_DESCRICAO, Vec::<String>::new());

    let filtered = filter_table(&table, &selection)?;
    assert_eq!(filtered.num_rows(), table.num_rows());
    assert_eq!(cnpjs(&filtered), cnpjs(&table));
    Ok(())
}

/// Constraints on several columns combine with AND
#[test]
fn test_conjunction_of_columns() -> estab_reader::Result<()> {
    let table = sample_table();

    let by_city = FilterSelection::new().with_values(NOME_MUNICIPIO, ["Porto Alegre"]);
    assert_eq!(filter_table(&table, &by_city)?.num_rows(), 3);

    let by_city_and_status = by_city.with_values(SITUACAO_DESCRICAO, ["ATIVA"]);
    let filtered = filter_table(&table, &by_city_and_status)?;
    assert_eq!(cnpjs(&filtered), vec!["00000191", "33000167"]);

    // An empty set next to real constraints changes nothing
    let with_empty = by_city_and_status.with_values(TIPO_ESTABELECIMENTO, Vec::<String>::new());
    assert_eq!(filter_table(&table, &with_empty)?.num_rows(), 2);
    Ok(())
}

/// Several accepted values act as OR within a column
#[test]
fn test_multiple_values_in_column() -> estab_reader::Result<()> {
    let table = sample_table();
    let selection =
        FilterSelection::new().with_values(SITUACAO_DESCRICAO, ["BAIXADA", "SUSPENSA"]);

    let filtered = filter_table(&table, &selection)?;
    assert_eq!(cnpjs(&filtered), vec!["11111111", "33333333"]);
    Ok(())
}

/// Year ranges are inclusive and drop rows without a year
#[test]
fn test_year_range() -> estab_reader::Result<()> {
    let table = sample_table();
    let selection = FilterSelection::new().with_year_range(ANO_INICIO, 2011, 2020);

    let filtered = filter_table(&table, &selection)?;
    assert_eq!(cnpjs(&filtered), vec!["33000167", "22222222", "33333333"]);

    let years: Vec<Option<i32>> = filtered.years(ANO_INICIO)?.iter().collect();
    assert_eq!(years, vec![Some(2011), Some(2019), Some(2020)]);
    Ok(())
}

/// Filtering returns a new table and leaves the input untouched
#[test]
fn test_input_is_not_modified() -> estab_reader::Result<()> {
    let table = sample_table();
    let selection = FilterSelection::new().with_values(NOME_MUNICIPIO, ["Canoas"]);

    let filtered = filter_table(&table, &selection)?;
    assert_eq!(filtered.num_rows(), 2);
    assert_eq!(table.num_rows(), 7);
    assert_eq!(filtered.column_names(), table.column_names());
    Ok(())
}

/// A selection matching nothing yields an empty table with zero statistics
#[test]
fn test_no_matches() -> estab_reader::Result<()> {
    let table = sample_table();
    let selection = FilterSelection::new().with_values(NOME_MUNICIPIO, ["Gramado"]);

    let filtered = filter_table(&table, &selection)?;
    assert!(filtered.is_empty());
    assert_eq!(summary_stats(&filtered)?, Default::default());
    Ok(())
}

#[test]
fn test_unknown_column_is_error() {
    let table = sample_table();
    let selection = FilterSelection::new().with_values("uf", ["RS"]);

    let err = filter_table(&table, &selection).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::ColumnNotFound { column }) if column == "uf"
    ));
}

#[test]
fn test_expression_filter() -> estab_reader::Result<()> {
    let table = sample_table();
    let expr = Expr::And(vec![
        Expr::Eq(TIPO_ESTABELECIMENTO.to_string(), LiteralValue::from("MATRIZ")),
        Expr::IsNotNull(ANO_INICIO.to_string()),
    ]);

    let filtered = filter_table_by_expr(&table, &expr)?;
    assert_eq!(cnpjs(&filtered), vec!["00000191", "11111111", "33333333"]);
    Ok(())
}
