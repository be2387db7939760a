use crate::error::{LookupError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use car_lookup_common::roster::ColumnMap;
use car_lookup_common::Roster;
use std::path::Path;

/// 先頭シートから名簿を読み込み
pub fn read_roster(path: &Path, plate_field: &str) -> Result<Roster> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| LookupError::Excel(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LookupError::Excel("workbook has no sheets".into()))?
        .map_err(|e| LookupError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| LookupError::InvalidRoster("sheet is empty".into()))?
        .iter()
        .map(cell_text)
        .collect();
    let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
    let columns = ColumnMap::from_headers(&header_refs, plate_field)?;

    let records = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|values| values.iter().any(|v| !v.trim().is_empty()))
        .map(|values| columns.to_record(&values))
        .collect();

    Ok(Roster::new(records))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Bool(true) => "Y".into(),
        Data::Bool(false) => "N".into(),
        other => other.to_string(),
    }
}
