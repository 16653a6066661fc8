mod args;
mod run;

use args::Args;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::FmtSubscriber;

/// Environment variable holding the log filter, e.g. `PQREAD_LOG=debug`
const LOG_ENV_VAR: &str = "PQREAD_LOG";

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run::run(&args, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout only carries records.
fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {e}");
    }
}
