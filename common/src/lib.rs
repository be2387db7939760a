//! Car Lookup Common Library
//!
//! 登録番号検索エンジンと、CLIから使う名簿デコード・マスク・プロンプト生成

pub mod types;
pub mod error;
pub mod normalize;
pub mod similarity;
pub mod mask;
pub mod engine;
pub mod roster;
pub mod prompts;

pub use types::{MaskedView, MatchResult, MatchType, MemberRecord, RosterStats, Suggestion};
pub use error::{Error, Result};
pub use normalize::{is_plausible_plate, normalize_plate};
pub use similarity::{levenshtein_distance, similarity};
pub use mask::{mask_last_name, mask_personal_info};
pub use engine::{PlateSearchEngine, SearchIndex, SearchOptions};
pub use roster::{Roster, DEFAULT_PLATE_FIELD};
pub use prompts::{build_privacy_context, build_system_prompt};
