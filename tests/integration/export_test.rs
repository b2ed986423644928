use std::io::{Cursor, Read};

use crate::utils::sample_table;
use estab_reader::schema::{CNPJ_BASICO, NOME_MUNICIPIO};
use estab_reader::{FilterSelection, filter_table, format_cnpj_basico, to_csv, to_spreadsheet};
use tempfile::TempDir;

#[test]
fn test_csv_export() -> estab_reader::Result<()> {
    let table = sample_table();
    let text = String::from_utf8(to_csv(&table)?)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), table.num_rows() + 1);
    assert_eq!(lines[0], table.column_names().join(","));
    assert!(lines[0].ends_with("situacao_descricao,tipo_estabelecimento,ano_situacao,ano_inicio"));

    // Text codes keep their zeros, dates are ISO formatted
    assert!(lines[1].starts_with("00000191,1,02,2005-01-03,1966-11-01,6422100,Porto Alegre,"));
    assert!(lines[1].ends_with("ATIVA,MATRIZ,2005,1966"));
    // Missing values are empty
    assert!(lines[6].starts_with("44444444,1,02,,,4711302,Canoas"));
    Ok(())
}

#[test]
fn test_csv_of_empty_table_is_header_only() -> estab_reader::Result<()> {
    let table = sample_table();
    let empty = filter_table(
        &table,
        &FilterSelection::new().with_values(NOME_MUNICIPIO, ["Gramado"]),
    )?;

    let text = String::from_utf8(to_csv(&empty)?)?;
    assert_eq!(text.lines().collect::<Vec<_>>(), vec![table.column_names().join(",")]);
    Ok(())
}

#[test]
fn test_spreadsheet_export() -> estab_reader::Result<()> {
    let dir = TempDir::new()?;
    let bytes = to_spreadsheet(&sample_table(), "Estabelecimentos")?;

    // Written bytes are an xlsx (zip) container
    let path = dir.path().join("export.xlsx");
    std::fs::write(&path, &bytes)?;
    let mut magic = [0u8; 4];
    std::fs::File::open(&path)?.read_exact(&mut magic)?;
    assert_eq!(&magic, b"PK\x03\x04");
    Ok(())
}

/// Text of one file inside an xlsx container
fn workbook_part(bytes: &[u8], name: &str) -> estab_reader::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut text = String::new();
    archive.by_name(name)?.read_to_string(&mut text)?;
    Ok(text)
}

/// Entries of `<si><t>..</t></si>` in the shared string table
fn shared_strings(xml: &str) -> Vec<String> {
    xml.split("<si>")
        .skip(1)
        .filter_map(|si| {
            let open = si.find("<t")?;
            let start = open + si[open..].find('>')? + 1;
            let end = si.find("</t>")?;
            Some(si[start..end].to_string())
        })
        .collect()
}

/// Cells of one worksheet row as `(is_text, value)`, shared strings resolved
fn row_cells(sheet: &str, row: u32, strings: &[String]) -> Vec<(bool, String)> {
    let marker = format!("<row r=\"{row}\"");
    let Some(start) = sheet.find(&marker) else {
        return Vec::new();
    };
    let row_xml = &sheet[start..];
    let row_xml = &row_xml[..row_xml.find("</row>").unwrap_or(row_xml.len())];

    row_xml
        .split("<c ")
        .skip(1)
        .map(|cell| {
            let is_text = cell.contains("t=\"s\"");
            let value = cell
                .find("<v>")
                .and_then(|open| {
                    let close = cell.find("</v>")?;
                    Some(&cell[open + 3..close])
                })
                .unwrap_or_default();
            if is_text {
                (true, strings[value.parse::<usize>().unwrap()].clone())
            } else {
                (false, value.to_string())
            }
        })
        .collect()
}

#[test]
fn test_spreadsheet_layout() -> estab_reader::Result<()> {
    let table = sample_table();
    let bytes = to_spreadsheet(&table, "Estabelecimentos")?;

    // One worksheet, named as requested
    let workbook = workbook_part(&bytes, "xl/workbook.xml")?;
    assert_eq!(workbook.matches("<sheet name=").count(), 1);
    assert!(workbook.contains("<sheet name=\"Estabelecimentos\""));

    let strings = shared_strings(&workbook_part(&bytes, "xl/sharedStrings.xml")?);
    let sheet = workbook_part(&bytes, "xl/worksheets/sheet1.xml")?;

    // Header row holds exactly the table columns, in order
    let header: Vec<String> = row_cells(&sheet, 1, &strings)
        .into_iter()
        .map(|(is_text, name)| {
            assert!(is_text);
            name
        })
        .collect();
    assert_eq!(header, table.column_names());

    // First record: the registry number stays text with its leading zeros
    let first = row_cells(&sheet, 2, &strings);
    assert_eq!(first[0], (true, "00000191".to_string()));
    assert!(first.contains(&(false, "2005".to_string())));
    assert_eq!(row_cells(&sheet, table.num_rows() as u32 + 2, &strings), Vec::new());
    Ok(())
}

#[test]
fn test_spreadsheet_of_empty_table() -> estab_reader::Result<()> {
    let empty = sample_table().head(0);
    let bytes = to_spreadsheet(&empty, "Estabelecimentos")?;
    assert!(!bytes.is_empty());
    Ok(())
}

#[test]
fn test_format_cnpj() -> estab_reader::Result<()> {
    let table = sample_table();
    let formatted: Vec<String> = table
        .strings(CNPJ_BASICO)?
        .iter()
        .take(2)
        .map(format_cnpj_basico)
        .collect();
    assert_eq!(formatted, vec!["00.000.191", "33.000.167"]);
    Ok(())
}
