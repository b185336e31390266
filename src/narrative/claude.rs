use super::retry::with_retry;
use super::{command_for, non_empty, NarrativeContext, NarrativeProvider};
use crate::config::RetryConfig;
use crate::error::NarrativeError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

pub struct ClaudeNarrator {
    pub binary: PathBuf,
    pub model: String,
    pub retry: RetryConfig,
}

impl ClaudeNarrator {
    async fn run_once(&self, prompt: &str) -> Result<String, NarrativeError> {
        let mut cmd = command_for(&self.binary);

        // Ensure subscription auth is used (not API key)
        cmd.env_remove("ANTHROPIC_API_KEY");

        cmd.arg("-p")
            .arg(prompt)
            .arg("--model")
            .arg(&self.model)
            .arg("--output-format")
            .arg("json");

        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(NarrativeError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Pull the reply out of `--output-format json`, accepting plain text too
fn parse_output(stdout: &str) -> Result<String, NarrativeError> {
    match serde_json::from_str::<Value>(stdout) {
        Ok(value) => {
            if value.get("is_error").and_then(Value::as_bool) == Some(true) {
                let reason = value
                    .get("result")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                return Err(NarrativeError::Provider(reason.to_string()));
            }
            let text = value
                .get("result")
                .and_then(Value::as_str)
                .unwrap_or_default();
            non_empty(text.to_string())
        }
        Err(_) => non_empty(stdout.to_string()),
    }
}

#[async_trait]
impl NarrativeProvider for ClaudeNarrator {
    fn name(&self) -> &'static str {
        "claude_cli"
    }

    async fn summarize(&self, context: &NarrativeContext) -> Result<String, NarrativeError> {
        let prompt = context.prompt();
        let prompt = prompt.as_str();
        debug!("Requesting narrative from claude ({} chars)", prompt.len());
        with_retry(&self.retry, self.name(), move || self.run_once(prompt)).await
    }
}
