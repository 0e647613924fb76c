mod cli;
mod commands;
mod evaluate;
mod measure;
mod membership;
mod model;
mod scorer;
mod taxonomy;
mod util;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

const DEFAULT_LOG_FILTER: &str = "info";

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "wups failed");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Score(args) => commands::score::run(args),
        Commands::ImportTaxonomy(args) => commands::import::run(args),
        Commands::Status(args) => commands::status::run(args),
    }
}

/// Logs go to stderr so stdout carries only the score summary.
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn run_status_without_database_succeeds() {
        let cli = parse(&[
            "wups",
            "status",
            "--db-path",
            "/nonexistent/wups-status-test/taxonomy.sqlite",
        ]);
        assert!(run(cli).is_ok());
    }

    #[test]
    fn run_score_with_unreadable_inputs_fails() {
        let cli = parse(&[
            "wups",
            "score",
            "/nonexistent/wups-score-test/gt.txt",
            "/nonexistent/wups-score-test/pred.txt",
            "-1",
        ]);
        let error = run(cli).expect_err("missing input files must fail");
        assert!(error.to_string().contains("failed to read"));
    }
}
