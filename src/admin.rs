//! 管理者機能モジュール
//!
//! - パスワード認証（ソルト付きSHA-256）
//! - 名簿CSVの検証（必須列・登録番号形式）
//! - 名簿の差し替え（タイムスタンプ付きバックアップを残す）

use crate::config::Config;
use crate::error::{LookupError, Result};
use car_lookup_common::roster::ColumnMap;
use car_lookup_common::Roster;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// アップロード可能なCSVの最大サイズ
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// アップロード結果
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub records: usize,
    pub backup: Option<PathBuf>,
}

/// パスワードをハッシュ化（hex(sha256(password + salt))）
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// 管理者パスワードを検証
///
/// ハッシュが未設定の場合は常に失敗する。
pub fn verify_admin_password(password: &str, config: &Config) -> bool {
    if password.is_empty() {
        return false;
    }

    let Some(expected) = config.admin_password_hash() else {
        tracing::warn!("admin password hash is not configured");
        return false;
    };

    let actual = hash_password(password, &config.salt());
    let ok = constant_time_eq(actual.as_bytes(), expected.trim().to_lowercase().as_bytes());
    if ok {
        tracing::info!(at = %chrono::Local::now().to_rfc3339(), "admin authentication succeeded");
    } else {
        tracing::warn!(at = %chrono::Local::now().to_rfc3339(), "admin authentication failed");
    }
    ok
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// 登録番号の形式チェック
///
/// 米国式 `ABC-1234` / `123-ABC` 等と、インド式 `GJ-01-AB-1234` を受け付ける。
pub fn is_valid_plate_format(plate: &str) -> bool {
    lazy_static::lazy_static! {
        static ref US_PLATE_RE: Regex = Regex::new(r"(?i)^[A-Z0-9]{2,4}-[A-Z0-9]{2,4}$").unwrap();
        static ref GJ_PLATE_RE: Regex = Regex::new(r"(?i)^GJ-\d{2}-[A-Z]{2}-\d{4}$").unwrap();
    }

    US_PLATE_RE.is_match(plate) || GJ_PLATE_RE.is_match(plate)
}

/// 名簿CSVを検証してデコードする
///
/// 行番号はファイル上の行（1始まり、空行も数える）。
pub fn validate_roster_csv(content: &str, plate_field: &str) -> Result<Roster> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let (_, header_line) = lines.next().ok_or_else(|| {
        LookupError::InvalidRoster("CSV must have at least a header and one data row".into())
    })?;
    let headers = car_lookup_common::roster::parse_csv_line(header_line.trim_start_matches('\u{feff}'));
    let columns = ColumnMap::from_headers(&headers, plate_field)
        .map_err(|e| LookupError::InvalidRoster(e.to_string()))?;

    let mut records = Vec::new();
    for (i, line) in lines {
        let record = columns.to_record(&car_lookup_common::roster::parse_csv_line(line));
        if !record.plate_number.is_empty() && !is_valid_plate_format(&record.plate_number) {
            return Err(LookupError::InvalidRoster(format!(
                "Invalid plate number format at row {}: {}. Expected e.g. ABC-1234, 123-ABC or GJ-01-AB-1234",
                i + 1,
                record.plate_number
            )));
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(LookupError::InvalidRoster(
            "CSV must have at least a header and one data row".into(),
        ));
    }

    Ok(Roster::new(records))
}

/// 名簿を差し替える
///
/// 認証 → 検証 → 既存名簿のバックアップ → 書き込み の順に行う。
/// 途中で失敗した場合、既存の名簿は変更されない。
pub fn upload_roster(
    source: &Path,
    target: &Path,
    password: &str,
    config: &Config,
) -> Result<UploadReport> {
    if !verify_admin_password(password, config) {
        return Err(LookupError::Unauthorized);
    }

    if !source.exists() {
        return Err(LookupError::FileNotFound(source.display().to_string()));
    }

    let is_csv = source
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(LookupError::InvalidRoster("Only CSV files are allowed".into()));
    }

    let size = std::fs::metadata(source)?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(LookupError::InvalidRoster(format!(
            "file is too large ({} bytes, limit {} bytes)",
            size, MAX_UPLOAD_BYTES
        )));
    }

    let content = std::fs::read_to_string(source)?;
    let roster = validate_roster_csv(&content, &config.plate_field)?;

    let backup = if target.exists() {
        let backup_path = backup_path(target);
        std::fs::copy(target, &backup_path)?;
        tracing::info!(backup = %backup_path.display(), "previous roster backed up");
        Some(backup_path)
    } else {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        None
    };

    std::fs::write(target, &content)?;
    tracing::info!(target = %target.display(), records = roster.len(), "roster replaced");

    Ok(UploadReport {
        records: roster.len(),
        backup,
    })
}

/// `members_data.csv` → `members_data.20250101093000.bak`
pub fn backup_path(target: &Path) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "roster".into());
    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    target.with_file_name(format!("{}.{}.bak", stem, timestamp))
}
