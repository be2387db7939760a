//! 名簿ファイル読み込みモジュール
//!
//! 拡張子で形式を判定して `MemberRecord` の列にする:
//! - `.csv`: ヘッダー付きCSV
//! - `.json`: レコード配列、または `{ "data": [...] }`
//! - `.xlsx` / `.xls`: 先頭シートの1行目をヘッダーとして扱う

mod excel;

use crate::error::{LookupError, Result};
use car_lookup_common::{PlateSearchEngine, Roster, SearchOptions};
use std::path::Path;

/// 名簿ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Csv,
    Json,
    Excel,
}

impl RosterFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(RosterFormat::Csv),
            "json" => Ok(RosterFormat::Json),
            "xlsx" | "xls" | "xlsm" => Ok(RosterFormat::Excel),
            _ => Err(LookupError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// 名簿ファイルを読み込む
pub fn load_roster(path: &Path, plate_field: &str) -> Result<Roster> {
    if !path.exists() {
        return Err(LookupError::FileNotFound(path.display().to_string()));
    }

    let roster = match RosterFormat::from_path(path)? {
        RosterFormat::Csv => {
            let content = std::fs::read_to_string(path)?;
            Roster::from_csv_str(&content, plate_field)?
        }
        RosterFormat::Json => {
            let content = std::fs::read_to_string(path)?;
            Roster::from_json_str(&content)?
        }
        RosterFormat::Excel => excel::read_roster(path, plate_field)?,
    };

    tracing::info!(path = %path.display(), records = roster.len(), "roster loaded");
    Ok(roster)
}

/// 名簿を読み込んで検索エンジンを構築する
pub fn load_engine(path: &Path, plate_field: &str, options: SearchOptions) -> Result<PlateSearchEngine> {
    Ok(load_roster(path, plate_field)?.into_engine(options))
}
