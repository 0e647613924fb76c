use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cli::ScoreArgs;
use crate::evaluate::{Evaluation, answer_lines, evaluate};
use crate::measure::{ItemMeasure, ScoringMode};
use crate::model::{EvaluationReport, InputFile, LineScore};
use crate::taxonomy::{Taxonomy, open_read_only};
use crate::util::{now_utc_string, read_text_file, write_json_pretty};

pub fn run(args: ScoreArgs) -> Result<()> {
    let mode = ScoringMode::from_threshold(args.threshold);

    let (truth_contents, truth_sha256) = read_text_file(&args.ground_truth_path)?;
    let (predicted_contents, predicted_sha256) = read_text_file(&args.predicted_path)?;
    let truth_lines = answer_lines(&truth_contents);
    let predicted_lines = answer_lines(&predicted_contents);

    info!(
        mode = mode.as_str(),
        ground_truth = %args.ground_truth_path.display(),
        predicted = %args.predicted_path.display(),
        ground_truth_answers = truth_lines.len(),
        predicted_answers = predicted_lines.len(),
        trim_items = args.trim_items,
        "scoring answers"
    );

    let evaluation = match mode {
        ScoringMode::Accuracy => evaluate(
            &truth_lines,
            &predicted_lines,
            &ItemMeasure::Exact,
            args.trim_items,
        )?,
        ScoringMode::Wups { threshold } => {
            let connection = open_read_only(&args.taxonomy_db)?;
            let taxonomy = Taxonomy::load(&connection)?;
            info!(
                path = %args.taxonomy_db.display(),
                words = taxonomy.word_count(),
                nodes = taxonomy.node_count(),
                "loaded taxonomy"
            );
            evaluate(
                &truth_lines,
                &predicted_lines,
                &ItemMeasure::taxonomic(&taxonomy, threshold),
                args.trim_items,
            )?
        }
    };

    if let Some(report_path) = &args.report_path {
        let report = EvaluationReport {
            report_version: 1,
            generated_at: now_utc_string(),
            mode: mode.as_str().to_string(),
            threshold: mode.threshold(),
            trim_items: args.trim_items,
            ground_truth: input_file(&args.ground_truth_path, truth_sha256, truth_lines.len()),
            predicted: input_file(
                &args.predicted_path,
                predicted_sha256,
                predicted_lines.len(),
            ),
            pair_count: evaluation.line_scores.len(),
            final_score: evaluation.final_score,
            final_score_percent: evaluation.percent(),
            line_scores: line_scores(&truth_lines, &predicted_lines, &evaluation),
        };
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote evaluation report");
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_summary(&mut output, mode, &evaluation)?;
    output.flush()?;
    Ok(())
}

/// Three-line report; the raw score keeps a fractional part (`1.0`, not `1`).
fn write_summary(
    output: &mut impl Write,
    mode: ScoringMode,
    evaluation: &Evaluation,
) -> Result<()> {
    writeln!(output, "{mode} is used")?;
    writeln!(output, "exact final score: {:?}", evaluation.final_score)?;
    writeln!(output, "final score is {:.2}%", evaluation.percent())?;
    Ok(())
}

fn input_file(path: &Path, sha256: String, answer_count: usize) -> InputFile {
    InputFile {
        path: path.display().to_string(),
        sha256,
        answer_count,
    }
}

fn line_scores(truth: &[&str], predicted: &[&str], evaluation: &Evaluation) -> Vec<LineScore> {
    truth
        .iter()
        .zip(predicted)
        .zip(&evaluation.line_scores)
        .enumerate()
        .map(|(index, ((truth, predicted), score))| LineScore {
            index: index + 1,
            ground_truth: truth.to_string(),
            predicted: predicted.to_string(),
            score: *score,
        })
        .collect()
}
