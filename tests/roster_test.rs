//! 名簿ファイル読み込みテスト
//!
//! CSV / JSON / Excel の各形式から同じレコードが得られることを検証

use car_lookup::error::LookupError;
use car_lookup::loader::{self, RosterFormat};
use car_lookup_common::{Error, DEFAULT_PLATE_FIELD};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

fn write_xlsx(path: &Path, rows: &[[&str; 5]], members: &[bool]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let headers = ["First Name", "Last Name", "Plate Number", "Car Manufacturer", "Car Type", "Member"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            sheet.write_string(r, col as u16, *value).unwrap();
        }
        sheet.write_boolean(r, 5, members[i]).unwrap();
    }

    workbook.save(path).unwrap();
}

#[test]
fn test_load_csv_with_quotes_and_bom() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("members.csv");
    std::fs::write(
        &path,
        "\u{feff}First Name,Last Name,Member,Car Type,Car Manufacturer,Plate Number\r\n\"Mary Ann\",\"D'Souza\",yes,\"SUV, 7 seater\",Tata,MH-12-AB-1234\r\n\r\n",
    )
    .unwrap();

    let roster = loader::load_roster(&path, DEFAULT_PLATE_FIELD).unwrap();
    assert_eq!(roster.len(), 1);

    let record = &roster.records()[0];
    assert_eq!(record.first_name, "Mary Ann");
    assert_eq!(record.last_name, "D'Souza");
    assert_eq!(record.car_type, "SUV, 7 seater");
    assert_eq!(record.plate_number, "MH-12-AB-1234");
    assert!(record.is_active_member);
}

#[test]
fn test_load_json_array_and_envelope() {
    let dir = tempdir().expect("Failed to create temp dir");

    let array = dir.path().join("array.json");
    std::fs::write(
        &array,
        r#"[{"firstName":"John","lastName":"Smith","plateNumber":"ABC-1234","manufacturer":"Jaguar","carType":"Sedan","isActiveMember":true}]"#,
    )
    .unwrap();

    let envelope = dir.path().join("envelope.json");
    std::fs::write(
        &envelope,
        r#"{"data":[{"First Name":"John","Last Name":"Smith","Car Number":"ABC-1234","Car Manufacturer":"Jaguar","Car Type":"Sedan","Member":"Y"}]}"#,
    )
    .unwrap();

    let a = loader::load_roster(&array, DEFAULT_PLATE_FIELD).unwrap();
    let b = loader::load_roster(&envelope, DEFAULT_PLATE_FIELD).unwrap();
    assert_eq!(a.records(), b.records());
    assert!(a.records()[0].is_active_member);
}

#[test]
fn test_load_excel() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("members.xlsx");
    write_xlsx(
        &path,
        &[
            ["John", "Smith", "ABC-1234", "Jaguar", "Sedan"],
            ["Mary", "Thomas", "XYZ-987", "Honda", "SUV"],
        ],
        &[true, false],
    );

    let roster = loader::load_roster(&path, DEFAULT_PLATE_FIELD).unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.records()[0].plate_number, "ABC-1234");
    assert!(roster.records()[0].is_active_member);
    assert!(!roster.records()[1].is_active_member);

    let engine = roster.into_engine(Default::default());
    assert_eq!(engine.search("xyz 987").unwrap().record.first_name, "Mary");
}

#[test]
fn test_missing_file() {
    let result = loader::load_roster(Path::new("/nonexistent/members_12345.csv"), DEFAULT_PLATE_FIELD);
    assert!(matches!(result, Err(LookupError::FileNotFound(_))));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("members.txt");
    std::fs::write(&path, "First Name\n").unwrap();

    let result = loader::load_roster(&path, DEFAULT_PLATE_FIELD);
    assert!(matches!(result, Err(LookupError::UnsupportedFormat(_))));
    assert!(RosterFormat::from_path(&path).is_err());
}

#[test]
fn test_missing_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("members.csv");
    std::fs::write(&path, "First Name,Last Name,Plate Number\nJohn,Smith,ABC-1234\n").unwrap();

    let result = loader::load_roster(&path, DEFAULT_PLATE_FIELD);
    assert!(matches!(
        result,
        Err(LookupError::Common(Error::MissingColumn(_)))
    ));
}

#[test]
fn test_invalid_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("members.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(loader::load_roster(&path, DEFAULT_PLATE_FIELD).is_err());
}
