use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    /// Process exit code: anything other than success is `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.status {
            CommandStatus::Ok => 0,
            CommandStatus::UserError | CommandStatus::Failure => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

/// Why a tool stage did not succeed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("`{command}` exited with status {code}")]
    NonZeroExit { command: String, code: i32 },
    #[error("failed to start `{command}`: {reason}")]
    Spawn { command: String, reason: String },
    #[error("no artifacts found in {dir}/")]
    NoArtifacts { dir: String },
    #[error("artifact name is not valid UTF-8: {path}")]
    NonUtf8Artifact { path: String },
}
