use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "car-lookup")]
#[command(about = "会員車両の登録番号検索ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (none/openai/claude/codex/gemini)。未指定なら設定ファイルの値
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,

    /// 名簿ファイル（CSV/JSON/Excel）
    #[arg(short, long, global = true)]
    pub roster: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 登録番号で車両を検索
    Search {
        /// 登録番号（例: ABC-1234）
        #[arg(required = true)]
        plate: String,

        /// マスク済み結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 入力途中の登録番号から候補を表示
    Suggest {
        /// 登録番号の先頭部分
        #[arg(required = true)]
        partial: String,

        /// 最大件数
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// 名簿の集計を表示
    Stats,

    /// 対話モードで問い合わせ
    Chat,

    /// 1件だけ問い合わせ
    Ask {
        #[arg(required = true)]
        message: String,
    },

    /// 名簿CSVを検証
    Validate {
        #[arg(required = true)]
        csv: PathBuf,
    },

    /// 名簿CSVを差し替え（管理者）
    Upload {
        /// 新しい名簿CSV
        #[arg(required = true)]
        csv: PathBuf,

        /// 差し替え先（デフォルト: 設定済みの名簿）
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// 管理者パスワード（未指定なら入力を求める）
        #[arg(short, long)]
        password: Option<String>,
    },

    /// 管理者パスワードのハッシュを生成
    HashPassword {
        #[arg(required = true)]
        password: String,
    },

    /// 設定管理
    Config {
        /// OpenAI APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 名簿ファイルのパスを設定
        #[arg(long)]
        set_roster: Option<PathBuf>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from(["car-lookup", "search", "ABC-1234", "--json", "-r", "members.csv"]);
        assert!(!cli.verbose);
        assert_eq!(cli.roster, Some(PathBuf::from("members.csv")));
        match cli.command {
            Commands::Search { plate, json } => {
                assert_eq!(plate, "ABC-1234");
                assert!(json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_global_provider() {
        let cli = Cli::parse_from(["car-lookup", "ask", "who owns ABC-1234", "--ai-provider", "claude", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.ai_provider, Some(AiProvider::Claude));
    }

    #[test]
    fn test_parse_suggest_default_limit() {
        let cli = Cli::parse_from(["car-lookup", "suggest", "AB"]);
        match cli.command {
            Commands::Suggest { partial, limit } => {
                assert_eq!(partial, "AB");
                assert_eq!(limit, 5);
            }
            _ => panic!("expected suggest"),
        }
    }
}
