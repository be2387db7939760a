//! 外部LLM CLIの呼び出し

use crate::error::{LookupError, Result};
use std::time::Duration;
use tokio::process::Command;

/// CLIごとの引数
fn build_args<'a>(command: &str, prompt: &'a str) -> Vec<&'a str> {
    match command {
        "claude" => vec!["-p", prompt, "--output-format", "text"],
        "codex" => vec!["exec", prompt],
        _ => vec!["-p", prompt],
    }
}

pub async fn run(command: &str, prompt: &str, timeout: Duration) -> Result<String> {
    let args = build_args(command, prompt);
    tracing::debug!(command, prompt_len = prompt.len(), "running LLM CLI");

    // Windowsではcmd /c経由
    #[cfg(windows)]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.arg("/c").arg(command).args(&args);
        c
    };

    #[cfg(not(windows))]
    let mut cmd = {
        let mut c = Command::new(command);
        c.args(&args);
        c
    };

    cmd.kill_on_drop(true);

    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| LookupError::ApiCall(format!("{} timed out after {}s", command, timeout.as_secs())))?
        .map_err(|e| LookupError::CliExecution(format!("{}: {}", command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LookupError::ApiCall(format!(
            "{} failed (code {:?}): {}",
            command,
            output.status.code(),
            stderr.trim()
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();
    tracing::debug!(response_len = response.len(), "LLM CLI responded");
    Ok(response)
}
