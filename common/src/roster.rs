//! 名簿デコードモジュール
//!
//! CSV/JSONのテキストを `MemberRecord` の列に変換する。
//! ファイルの読み込みは呼び出し側の責務。

use crate::engine::{PlateSearchEngine, SearchOptions};
use crate::error::{Error, Result};
use crate::types::MemberRecord;
use serde::Deserialize;

pub const FIRST_NAME_COLUMN: &str = "First Name";
pub const LAST_NAME_COLUMN: &str = "Last Name";
pub const MANUFACTURER_COLUMN: &str = "Car Manufacturer";
pub const CAR_TYPE_COLUMN: &str = "Car Type";
pub const MEMBER_COLUMN: &str = "Member";
/// 登録番号列のデフォルト名
pub const DEFAULT_PLATE_FIELD: &str = "Plate Number";
/// 旧形式の名簿で使われていた登録番号列
pub const LEGACY_PLATE_FIELD: &str = "Car Number";

/// 必須列の一覧（登録番号列の名前は可変）
pub fn required_columns(plate_field: &str) -> [&str; 6] {
    [
        FIRST_NAME_COLUMN,
        LAST_NAME_COLUMN,
        MEMBER_COLUMN,
        CAR_TYPE_COLUMN,
        MANUFACTURER_COLUMN,
        plate_field,
    ]
}

/// 会員フラグを解釈する（Y/YES/TRUE/1/ACTIVE を会員とみなす）
pub fn parse_member_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_uppercase().as_str(),
        "Y" | "YES" | "TRUE" | "1" | "ACTIVE"
    )
}

/// ヘッダー行から各列の位置を求めたもの
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    first_name: usize,
    last_name: usize,
    plate_number: usize,
    manufacturer: usize,
    car_type: usize,
    member: usize,
}

impl ColumnMap {
    /// ヘッダーから列位置を解決する
    ///
    /// 登録番号列は `plate_field` → `"Car Number"` → `"Plate Number"` の順で探す。
    pub fn from_headers(headers: &[&str], plate_field: &str) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| find(name).ok_or_else(|| Error::MissingColumn(name.to_string()));

        let plate_number = find(plate_field)
            .or_else(|| find(LEGACY_PLATE_FIELD))
            .or_else(|| find(DEFAULT_PLATE_FIELD))
            .ok_or_else(|| Error::MissingColumn(plate_field.to_string()))?;

        Ok(Self {
            first_name: require(FIRST_NAME_COLUMN)?,
            last_name: require(LAST_NAME_COLUMN)?,
            plate_number,
            manufacturer: require(MANUFACTURER_COLUMN)?,
            car_type: require(CAR_TYPE_COLUMN)?,
            member: require(MEMBER_COLUMN)?,
        })
    }

    /// 1行分の値からレコードを作る（足りない値は空文字）
    pub fn to_record<S: AsRef<str>>(&self, values: &[S]) -> MemberRecord {
        let get = |i: usize| {
            values
                .get(i)
                .map(|v| v.as_ref().trim().to_string())
                .unwrap_or_default()
        };

        MemberRecord {
            first_name: get(self.first_name),
            last_name: get(self.last_name),
            plate_number: get(self.plate_number),
            manufacturer: get(self.manufacturer),
            car_type: get(self.car_type),
            is_active_member: parse_member_flag(&get(self.member)),
        }
    }
}

/// デコード済みの名簿
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<MemberRecord>,
}

/// 名簿APIのレスポンス形式 `{ "success": true, "data": [...] }`
#[derive(Deserialize)]
struct RosterEnvelope {
    data: Vec<MemberRecord>,
}

impl Roster {
    pub fn new(records: Vec<MemberRecord>) -> Self {
        Self { records }
    }

    /// CSV文字列から読み込み
    ///
    /// 先頭の空でない行をヘッダーとして扱う。空行は無視する。
    pub fn from_csv_str(content: &str, plate_field: &str) -> Result<Self> {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());

        let header_line = lines
            .next()
            .ok_or_else(|| Error::Parse("CSV is empty".into()))?;
        let headers = parse_csv_line(header_line.trim_start_matches('\u{feff}'));
        let columns = ColumnMap::from_headers(&headers, plate_field)?;

        let records: Vec<MemberRecord> = lines
            .map(|line| columns.to_record(&parse_csv_line(line)))
            .collect();

        tracing::debug!(records = records.len(), "roster decoded from CSV");
        Ok(Self { records })
    }

    /// JSON文字列から読み込み
    ///
    /// レコード配列、またはAPI形式の `{ "data": [...] }` を受け付ける。
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;

        let records: Vec<MemberRecord> = if value.is_array() {
            serde_json::from_value(value)?
        } else if value.get("data").is_some() {
            serde_json::from_value::<RosterEnvelope>(value)?.data
        } else {
            return Err(Error::Parse("expected an array of members or a {\"data\": [...]} object".into()));
        };

        tracing::debug!(records = records.len(), "roster decoded from JSON");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[MemberRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MemberRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 検索エンジンを構築（名簿の所有権はエンジンへ移る）
    pub fn into_engine(self, options: SearchOptions) -> PlateSearchEngine {
        PlateSearchEngine::with_options(self.records, options)
    }
}

/// CSV行をパース（ダブルクォート対応）
pub fn parse_csv_line(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut field_start = 0;

    for (i, c) in line.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == ',' && !in_quotes {
            fields.push(trim_quotes(&line[field_start..i]));
            field_start = i + 1;
        }
    }

    // 最後のフィールド
    fields.push(trim_quotes(&line[field_start..]));

    fields
}

fn trim_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CSV: &str = "First Name,Last Name,Member,Car Type,Car Manufacturer,Plate Number
John,Smith,Y,Sedan,Jaguar,ABC-1234
Mary,Thomas,N,SUV,Honda,XYZ-987

\"Anna\",\"George, Jr\",y,Hatchback,Maruti,KL-07
";

    #[test]
    fn test_load_csv() {
        let roster = Roster::from_csv_str(TEST_CSV, DEFAULT_PLATE_FIELD).unwrap();
        assert_eq!(roster.len(), 3);

        let john = &roster.records()[0];
        assert_eq!(john.first_name, "John");
        assert_eq!(john.plate_number, "ABC-1234");
        assert_eq!(john.manufacturer, "Jaguar");
        assert!(john.is_active_member);
        assert!(!roster.records()[1].is_active_member);
    }

    #[test]
    fn test_load_csv_quoted_comma() {
        let roster = Roster::from_csv_str(TEST_CSV, DEFAULT_PLATE_FIELD).unwrap();
        let anna = &roster.records()[2];
        assert_eq!(anna.first_name, "Anna");
        assert_eq!(anna.last_name, "George, Jr");
        assert!(anna.is_active_member);
    }

    #[test]
    fn test_load_csv_legacy_plate_column() {
        let csv = "First Name,Last Name,Car Number,Car Manufacturer,Car Type,Member\nA,B,GJ-01-AB-1234,Jaguar,Sedan,Y\n";
        let roster = Roster::from_csv_str(csv, DEFAULT_PLATE_FIELD).unwrap();
        assert_eq!(roster.records()[0].plate_number, "GJ-01-AB-1234");
    }

    #[test]
    fn test_load_csv_custom_plate_column() {
        let csv = "First Name,Last Name,Registration,Car Manufacturer,Car Type,Member\nA,B,MH-12,Tata,SUV,N\n";
        let roster = Roster::from_csv_str(csv, "Registration").unwrap();
        assert_eq!(roster.records()[0].plate_number, "MH-12");
    }

    #[test]
    fn test_load_csv_missing_column() {
        let csv = "First Name,Last Name,Plate Number,Car Type,Member\nA,B,ABC-1234,Sedan,Y\n";
        let err = Roster::from_csv_str(csv, DEFAULT_PLATE_FIELD).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "Car Manufacturer"));
    }

    #[test]
    fn test_load_csv_short_row() {
        let csv = "First Name,Last Name,Member,Car Type,Car Manufacturer,Plate Number\nA,B,Y\n";
        let roster = Roster::from_csv_str(csv, DEFAULT_PLATE_FIELD).unwrap();
        assert_eq!(roster.records()[0].plate_number, "");
    }

    #[test]
    fn test_load_csv_empty() {
        assert!(matches!(
            Roster::from_csv_str("\n\n", DEFAULT_PLATE_FIELD),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_load_json_array() {
        let json = r#"[{"First Name": "John", "Last Name": "Smith", "Plate Number": "ABC-1234", "Member": "Y"}]"#;
        let roster = Roster::from_json_str(json).unwrap();
        assert_eq!(roster.len(), 1);
        assert!(roster.records()[0].is_active_member);
    }

    #[test]
    fn test_load_json_envelope() {
        let json = r#"{"success": true, "count": 1, "data": [{"firstName": "Mary", "plateNumber": "XYZ-987"}]}"#;
        let roster = Roster::from_json_str(json).unwrap();
        assert_eq!(roster.records()[0].plate_number, "XYZ-987");
    }

    #[test]
    fn test_load_json_invalid_shape() {
        assert!(matches!(Roster::from_json_str(r#"{"members": []}"#), Err(Error::Parse(_))));
        assert!(matches!(Roster::from_json_str("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_member_flag() {
        for yes in ["Y", "y", "Yes", "TRUE", "1", " active "] {
            assert!(parse_member_flag(yes), "{}", yes);
        }
        for no in ["N", "no", "", "0", "false", "maybe"] {
            assert!(!parse_member_flag(no), "{}", no);
        }
    }

    #[test]
    fn test_parse_csv_line() {
        assert_eq!(parse_csv_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_csv_line(" a , \"b,c\" ,"), vec!["a", "b,c", ""]);
        assert_eq!(parse_csv_line(""), vec![""]);
    }
}
