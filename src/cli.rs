use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_TAXONOMY_DB: &str = ".cache/wups/taxonomy.sqlite";

#[derive(Parser, Debug)]
#[command(
    name = "wups",
    version,
    about = "Soft set-matching evaluation of predicted answers (WUPS and accuracy)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score predicted answers against ground truth answers.
    Score(ScoreArgs),
    /// Build the taxonomy database from sense and hypernym TSV files.
    ImportTaxonomy(ImportTaxonomyArgs),
    /// Report what the taxonomy database contains.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// File with one ground truth answer per line.
    pub ground_truth_path: PathBuf,

    /// File with one predicted answer per line, aligned with the ground truth.
    pub predicted_path: PathBuf,

    /// Similarity threshold in [0, 1]; -1 selects standard accuracy.
    #[arg(allow_negative_numbers = true, value_parser = parse_threshold)]
    pub threshold: f64,

    #[arg(long, default_value = DEFAULT_TAXONOMY_DB)]
    pub taxonomy_db: PathBuf,

    /// Trim whitespace around each comma-separated item.
    #[arg(long, default_value_t = false)]
    pub trim_items: bool,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ImportTaxonomyArgs {
    /// TSV of `word<TAB>sense_id` rows.
    #[arg(long)]
    pub senses: PathBuf,

    /// TSV of `sense_id<TAB>hypernym_id` rows.
    #[arg(long)]
    pub hypernyms: PathBuf,

    #[arg(long, default_value = DEFAULT_TAXONOMY_DB)]
    pub db_path: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = DEFAULT_TAXONOMY_DB)]
    pub db_path: PathBuf,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid threshold `{raw}`: {err}"))?;

    if value == -1.0 || (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "threshold must be -1 (standard accuracy) or within [0, 1], got {value}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, parse_threshold};
    use clap::Parser;

    #[test]
    fn parse_threshold_accepts_accuracy_sentinel_and_unit_interval() {
        assert_eq!(parse_threshold("-1"), Ok(-1.0));
        assert_eq!(parse_threshold("0"), Ok(0.0));
        assert_eq!(parse_threshold("0.9"), Ok(0.9));
        assert_eq!(parse_threshold("1.0"), Ok(1.0));
    }

    #[test]
    fn parse_threshold_rejects_values_outside_range() {
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("-0.5").is_err());
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("high").is_err());
    }

    #[test]
    fn score_command_takes_three_positionals_with_negative_threshold() {
        let cli = Cli::try_parse_from(["wups", "score", "gt.txt", "pred.txt", "-1"])
            .expect("score invocation should parse");

        match cli.command {
            Commands::Score(args) => {
                assert_eq!(args.threshold, -1.0);
                assert!(!args.trim_items);
                assert!(args.report_path.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn score_command_requires_threshold_argument() {
        let result = Cli::try_parse_from(["wups", "score", "gt.txt", "pred.txt"]);
        assert!(result.is_err());
    }
}
