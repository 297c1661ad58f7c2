#![deny(clippy::all)]

mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::config::context;
pub(crate) use crate::core::runtime::{effects, process};
pub(crate) use crate::core::tooling::{outcome, reporter};

pub use crate::core::config::context::CommandContext;
pub use crate::core::config::{Config, InstallConfig, PublishConfig, PythonConfig};
pub use crate::core::pipeline::{
    run_pipeline, Orchestrator, PipelineRequest, Stage, StageReport, StageStatus, UploadTarget,
    MANIFEST_FILE,
};
pub use crate::core::runtime::effects::{
    Effects, FileSystem, SharedEffects, SystemEffects, ToolRunner,
};
pub use crate::core::runtime::process::RunOutput;
pub use crate::core::runtime::ToolInvocation;
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome, StageError};
pub use crate::core::tooling::reporter::{ReportEvent, Reporter};
pub use crate::core::tooling::{format_status_message, to_json_response};
