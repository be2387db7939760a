use car_lookup::{admin, assistant, chat, cli, config, error, llm, loader};
use car_lookup_common::PlateSearchEngine;
use assistant::{Assistant, LocalMatch};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.verbose {
        "car_lookup=debug,car_lookup_common=debug"
    } else {
        "car_lookup=info,car_lookup_common=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load()?;
    if let Some(provider) = cli.ai_provider {
        config.provider = provider;
    }
    let roster_arg = cli.roster.as_deref();

    match cli.command {
        Commands::Search { plate, json } => {
            let engine = open_engine(&config, roster_arg)?;
            let matched = engine.lookup(&plate).map(|result| LocalMatch {
                view: engine.mask_personal_info(result.record),
                match_type: result.match_type,
                confidence: result.confidence,
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&matched)?);
            } else {
                match matched {
                    Some(m) => println!("{}", assistant::format_vehicle_card(&m)),
                    None => println!("🔍 {} は名簿に見つかりませんでした", plate),
                }
            }
        }

        Commands::Suggest { partial, limit } => {
            let engine = open_engine(&config, roster_arg)?;
            let suggestions = engine.suggest(&partial, limit);

            if suggestions.is_empty() {
                println!("候補はありません");
            }
            for s in suggestions {
                println!("  {}", s.display_text);
            }
        }

        Commands::Stats => {
            let engine = open_engine(&config, roster_arg)?;
            let stats = engine.stats();

            println!("名簿の集計:");
            println!("  登録台数: {}", stats.total_vehicles);
            println!("  会員: {}", stats.active_members);
            println!("  メーカー: {}", stats.manufacturers.join(", "));
            println!("  車種: {}", stats.car_types.join(", "));
        }

        Commands::Chat => {
            let assistant = open_assistant(&config, roster_arg)?;
            chat::run_interactive_chat(&assistant).await?;
        }

        Commands::Ask { message } => {
            let assistant = open_assistant(&config, roster_arg)?;
            let reply = assistant.answer(&message).await;
            println!("{}", reply.text);
        }

        Commands::Validate { csv } => {
            if !csv.exists() {
                return Err(error::LookupError::FileNotFound(csv.display().to_string()));
            }
            let content = std::fs::read_to_string(&csv)?;
            let roster = admin::validate_roster_csv(&content, &config.plate_field)?;
            println!("✔ {}件のレコードを確認しました", roster.len());
        }

        Commands::Upload { csv, target, password } => {
            let target = match target {
                Some(path) => path,
                None => config.resolve_roster_path(roster_arg)?,
            };
            let password = match password {
                Some(p) => p,
                None => dialoguer::Password::new()
                    .with_prompt("管理者パスワード")
                    .interact()
                    .map_err(|e| error::LookupError::CliExecution(e.to_string()))?,
            };

            let report = admin::upload_roster(&csv, &target, &password, &config)?;
            if let Some(backup) = &report.backup {
                println!("✔ 旧名簿をバックアップ: {}", backup.display());
            }
            println!("✔ {}件のレコードで名簿を更新しました: {}", report.records, target.display());
        }

        Commands::HashPassword { password } => {
            println!("{}", admin::hash_password(&password, &config.salt()));
        }

        Commands::Config { set_api_key, set_roster, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(path) = set_roster {
                config.roster_path = Some(path);
                config.save()?;
                println!("✔ 名簿のパスを設定しました");
            }

            if show {
                println!("設定:");
                println!(
                    "  名簿: {}",
                    config
                        .roster_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  登録番号列: {}", config.plate_field);
                println!("  最低信頼度: {}", config.min_confidence);
                println!("  AIプロバイダ: {}", config.provider);
                println!("  モデル: {}", config.model);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
                println!(
                    "  管理者パスワード: {}",
                    if config.admin_password_hash().is_some() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

fn open_engine(config: &Config, roster_arg: Option<&Path>) -> Result<PlateSearchEngine> {
    let path = config.resolve_roster_path(roster_arg)?;
    loader::load_engine(&path, &config.plate_field, config.search_options())
}

fn open_assistant(config: &Config, roster_arg: Option<&Path>) -> Result<Assistant> {
    let engine = open_engine(config, roster_arg)?;
    let llm = match llm::LlmClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("LLM disabled: {}", e);
            None
        }
    };
    Ok(Assistant::new(engine, llm, config.organization.clone()))
}
