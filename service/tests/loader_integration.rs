//! Loader integration tests over real workbook and CSV bytes.

use atenea_core::ScalarValue;
use atenea_service::loader::{
    CsvLoader, CsvOptions, DataLoader, ExcelLoader, ExcelOptions, LoadOptions, LoaderError,
};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

/// A small workbook: headers plus two data rows, one blank row in between.
fn sample_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Datos").expect("sheet name");

    for (col, header) in ["nombre", "cargo", "edad", "desde"].iter().enumerate() {
        sheet
            .write(0, u16::try_from(col).expect("col"), *header)
            .expect("write header");
    }

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    sheet.write(1, 0, "Ana María Rojas").expect("write");
    sheet.write(1, 1, "Ingeniera de Sistemas").expect("write");
    sheet.write(1, 2, 30.0).expect("write");
    sheet
        .write_with_format(
            1,
            3,
            &ExcelDateTime::from_ymd(2024, 1, 15).expect("valid date"),
            &date_format,
        )
        .expect("write date");

    // Row 2 left blank entirely; it must not become a record.

    sheet.write(3, 0, "Luis Pérez").expect("write");
    sheet.write(3, 1, "Analista").expect("write");
    sheet.write(3, 2, 28.5).expect("write");

    workbook.save_to_buffer().expect("serialize workbook")
}

#[test]
fn excel_rows_become_records_in_sheet_order() {
    let records = ExcelLoader::new()
        .load_bytes(&sample_workbook(), &LoadOptions::default())
        .expect("load workbook");

    assert_eq!(records.len(), 2);
    let names: Vec<&String> = records[0].field_names().collect();
    assert_eq!(names, ["nombre", "cargo", "edad", "desde"]);
    assert_eq!(
        records[0].get("nombre"),
        Some(&ScalarValue::Text("Ana María Rojas".to_string()))
    );
    // 30.0 has no fractional part, so it loads (and renders) as an integer.
    assert_eq!(records[0].get("edad"), Some(&ScalarValue::Integer(30)));
    assert_eq!(
        records[0].get("desde").map(ToString::to_string),
        Some("2024-01-15".to_string())
    );

    assert_eq!(records[1].get("edad"), Some(&ScalarValue::Float(28.5)));
    // Missing trailing cells load as nulls, which render empty.
    assert_eq!(records[1].get("desde"), Some(&ScalarValue::Null));
}

#[test]
fn named_sheet_is_selected() {
    let loader = ExcelLoader::with_options(ExcelOptions {
        target_sheet: Some("Datos".to_string()),
        ..ExcelOptions::default()
    });
    let records = loader
        .load_bytes(&sample_workbook(), &LoadOptions::default())
        .expect("load workbook");
    assert_eq!(records.len(), 2);
}

#[test]
fn missing_sheet_is_a_configuration_error() {
    let loader = ExcelLoader::with_options(ExcelOptions {
        target_sheet: Some("NoExiste".to_string()),
        ..ExcelOptions::default()
    });
    let err = loader
        .load_bytes(&sample_workbook(), &LoadOptions::default())
        .expect_err("sheet does not exist");
    assert!(matches!(err, LoaderError::Configuration(_)));
}

#[test]
fn blank_headers_get_positional_names() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write(0, 0, "nombre").expect("write");
    // Column 1 header left blank.
    sheet.write(1, 0, "Ana").expect("write");
    sheet.write(1, 1, "x").expect("write");
    let bytes = workbook.save_to_buffer().expect("serialize workbook");

    let records = ExcelLoader::new()
        .load_bytes(&bytes, &LoadOptions::default())
        .expect("load workbook");
    let names: Vec<&String> = records[0].field_names().collect();
    assert_eq!(names, ["nombre", "col_1"]);
}

#[test]
fn load_limit_is_honored() {
    let records = ExcelLoader::new()
        .load_bytes(&sample_workbook(), &LoadOptions { limit: Some(1) })
        .expect("load workbook");
    assert_eq!(records.len(), 1);
}

#[test]
fn load_file_reads_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("datos.xlsx");
    std::fs::write(&path, sample_workbook()).expect("write workbook");

    let records = ExcelLoader::new()
        .load_file(&path, &LoadOptions::default())
        .expect("load file");
    assert_eq!(records.len(), 2);
}

#[test]
fn csv_fields_are_type_inferred() {
    let data = "nombre,edad,nota,observaciones\nAna,30,4.5,\nLuis,28,3.9,puntual\n";
    let records = CsvLoader::new()
        .load_bytes(data.as_bytes(), &LoadOptions::default())
        .expect("load csv");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("edad"), Some(&ScalarValue::Integer(30)));
    assert_eq!(records[0].get("nota"), Some(&ScalarValue::Float(4.5)));
    assert_eq!(records[0].get("observaciones"), Some(&ScalarValue::Null));
    assert_eq!(
        records[1].get("observaciones"),
        Some(&ScalarValue::Text("puntual".to_string()))
    );
}

#[test]
fn csv_fields_are_trimmed_by_default() {
    let data = "nombre , cargo\n Ana , Ingeniera \n";
    let records = CsvLoader::new()
        .load_bytes(data.as_bytes(), &LoadOptions::default())
        .expect("load csv");

    let names: Vec<&String> = records[0].field_names().collect();
    assert_eq!(names, ["nombre", "cargo"]);
    assert_eq!(
        records[0].get("cargo"),
        Some(&ScalarValue::Text("Ingeniera".to_string()))
    );
}

#[test]
fn tsv_preset_uses_tab_delimiter() {
    let data = "nombre\tcargo\nAna\tIngeniera\n";
    let records = CsvLoader::with_options(CsvOptions::tsv())
        .load_bytes(data.as_bytes(), &LoadOptions::default())
        .expect("load tsv");

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("cargo"),
        Some(&ScalarValue::Text("Ingeniera".to_string()))
    );
}
