use super::retry::with_retry;
use super::{command_for, non_empty, NarrativeContext, NarrativeProvider};
use crate::config::RetryConfig;
use crate::error::NarrativeError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub struct CodexNarrator {
    pub binary: PathBuf,
    pub model: String,
    pub retry: RetryConfig,
}

impl CodexNarrator {
    async fn run_once(&self, prompt: &str) -> Result<String, NarrativeError> {
        // Codex writes its final message to a file; stdout carries the event stream
        let out_file = NamedTempFile::new()?;

        let mut cmd = command_for(&self.binary);
        cmd.arg("exec")
            .arg("--model")
            .arg(&self.model)
            .arg("--output-last-message")
            .arg(out_file.path())
            // Read prompt from stdin
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(NarrativeError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let message = tokio::fs::read_to_string(out_file.path()).await?;
        non_empty(message)
    }
}

#[async_trait]
impl NarrativeProvider for CodexNarrator {
    fn name(&self) -> &'static str {
        "codex_cli"
    }

    async fn summarize(&self, context: &NarrativeContext) -> Result<String, NarrativeError> {
        let prompt = context.prompt();
        let prompt = prompt.as_str();
        debug!("Requesting narrative from codex ({} chars)", prompt.len());
        with_retry(&self.retry, self.name(), move || self.run_once(prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::tests::sample_context;

    #[tokio::test]
    async fn test_missing_binary_fails_fast() {
        let narrator = CodexNarrator {
            binary: PathBuf::from("/nonexistent/loadbalance-test/codex"),
            model: "gpt-4.1".to_string(),
            retry: RetryConfig {
                max_attempts: 3,
                backoff_base_ms: 1000,
            },
        };
        let err = narrator.summarize(&sample_context()).await.unwrap_err();
        assert!(matches!(err, NarrativeError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
