use crate::adb::runner::{ToolOutput, ToolRunner};
use crate::error::{AdbxError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Canned reaction of the fake bridge to one invocation
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Lines emitted by `stream`
    pub lines: Vec<String>,
    /// Never finish after emitting `lines`
    pub hang: bool,
    /// Create a file at the last argument (the transfer destination)
    pub touch_destination: bool,
    /// Fail to spawn as if adb were missing
    pub missing_tool: bool,
}

impl Scripted {
    pub fn ok(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            ..Default::default()
        }
    }

    pub fn fail(exit_code: i32, stderr: &str) -> Self {
        Self {
            exit_code,
            stderr: stderr.to_string(),
            ..Default::default()
        }
    }

    pub fn lines(lines: &[&str], exit_code: i32) -> Self {
        Self {
            exit_code,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn missing() -> Self {
        Self {
            missing_tool: true,
            ..Default::default()
        }
    }

    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn touching_destination(mut self) -> Self {
        self.touch_destination = true;
        self
    }
}

/// Fake bridge tool answering by substring match on the joined arguments.
///
/// Rules are tried in registration order; unmatched invocations succeed with
/// empty output. Every invocation is recorded.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, Scripted)>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, pattern: &str, response: Scripted) -> Self {
        self.rules.push((pattern.to_string(), response));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded invocations as space-joined command lines
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.join(" ")).collect()
    }

    pub fn was_called_with(&self, pattern: &str) -> bool {
        self.command_lines().iter().any(|c| c.contains(pattern))
    }

    fn respond(&self, args: &[String]) -> Scripted {
        self.calls.lock().unwrap().push(args.to_vec());
        let joined = args.join(" ");
        self.rules
            .iter()
            .find(|(pattern, _)| joined.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ToolRunner for ScriptedRunner {
    async fn run(&self, args: &[String]) -> Result<ToolOutput> {
        let response = self.respond(args);
        if response.missing_tool {
            return Err(AdbxError::ToolNotFound(PathBuf::from("/nonexistent/adb")));
        }
        if response.hang {
            std::future::pending::<()>().await;
        }
        Ok(ToolOutput {
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
        })
    }

    async fn stream(&self, args: &[String], lines: mpsc::UnboundedSender<String>) -> Result<i32> {
        let response = self.respond(args);
        if response.missing_tool {
            return Err(AdbxError::ToolNotFound(PathBuf::from("/nonexistent/adb")));
        }
        for line in response.lines {
            let _ = lines.send(line);
        }
        if response.hang {
            std::future::pending::<()>().await;
        }
        if response.touch_destination {
            if let Some(dst) = args.last() {
                std::fs::write(dst, b"transferred")?;
            }
        }
        Ok(response.exit_code)
    }
}
