use std::sync::Arc;

use atty::Stream;
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use pyship_core::{CommandContext, SystemEffects};

mod cli;
mod output;
mod style;

use cli::PyshipCli;
use output::{ConsoleReporter, OutputOptions};
use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = PyshipCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
    };
    if !cli.rest.is_empty() {
        tracing::debug!(ignored = ?cli.rest, "ignoring extra arguments");
    }

    let ctx = CommandContext::new(Arc::new(SystemEffects::new()));
    let reporter = ConsoleReporter::new(Style::new(cli.no_color, atty::is(Stream::Stdout)), opts);
    let outcome = pyship_core::run_pipeline(&ctx, &reporter, &cli.request())
        .map_err(|err| eyre!("{err:?}"))?;
    let code = output::emit_output(&opts, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("pyship={level},pyship_core={level},pyship_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
