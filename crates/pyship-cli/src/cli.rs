use clap::{ArgAction, Parser};
use pyship_core::{PipelineRequest, UploadTarget};

pub const PYSHIP_BEFORE_HELP: &str = concat!(
    "pyship ",
    env!("CARGO_PKG_VERSION"),
    " – build, check, and publish a Python distribution\n\n",
    "Runs from the directory holding pyproject.toml:\n",
    "  install build + twine, clean build/ dist/ *.egg-info,\n",
    "  python -m build, twine check, then optionally twine upload.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "pyship",
    author,
    version,
    disable_help_flag = true,
    before_help = PYSHIP_BEFORE_HELP
)]
#[allow(clippy::struct_excessive_bools)]
pub struct PyshipCli {
    #[arg(long, help = "Build, check, then upload to TestPyPI", conflicts_with = "upload")]
    pub test: bool,
    #[arg(long, help = "Build, check, then upload to PyPI")]
    pub upload: bool,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Print usage after the build (the pipeline still runs)"
    )]
    pub help: bool,
    #[arg(short, long, help = "Suppress step output (failures still print to stderr)")]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    pub trace: bool,
    #[arg(long, help = "Emit a {status,message,details} JSON envelope")]
    pub json: bool,
    #[arg(long, help = "Disable colored human output")]
    pub no_color: bool,
    /// Anything else, flags included, is accepted and ignored.
    #[arg(
        hide = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..
    )]
    pub rest: Vec<String>,
}

impl PyshipCli {
    pub fn request(&self) -> PipelineRequest {
        let upload = if self.test {
            Some(UploadTarget::TestPypi)
        } else if self.upload {
            Some(UploadTarget::Pypi)
        } else {
            None
        };
        PipelineRequest {
            upload,
            show_usage: self.help,
        }
    }
}
