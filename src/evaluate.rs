use anyhow::{Result, bail};
use tracing::debug;

use crate::measure::ItemMeasure;
use crate::model::{AnswerSet, Item};
use crate::scorer::score_pair;

pub const ITEM_DELIMITER: char = ',';

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub line_scores: Vec<f64>,
    pub final_score: f64,
}

impl Evaluation {
    pub fn percent(&self) -> f64 {
        self.final_score * 100.0
    }
}

/// Non-blank answer lines with surrounding whitespace stripped.
pub fn answer_lines(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Splits a raw answer on commas. Empty pieces become [`Item::Missing`]; an
/// empty answer is the empty set.
pub fn parse_answer(raw: &str, trim_items: bool) -> AnswerSet {
    let raw = if trim_items { raw.trim() } else { raw };
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(ITEM_DELIMITER)
        .map(|piece| if trim_items { piece.trim() } else { piece })
        .map(|piece| {
            if piece.is_empty() {
                Item::Missing
            } else {
                Item::Token(piece.to_string())
            }
        })
        .collect()
}

pub fn evaluate(
    truth_lines: &[&str],
    predicted_lines: &[&str],
    measure: &ItemMeasure<'_>,
    trim_items: bool,
) -> Result<Evaluation> {
    if truth_lines.len() != predicted_lines.len() {
        bail!(
            "answer files are not aligned: {} ground truth answers vs {} predicted answers",
            truth_lines.len(),
            predicted_lines.len()
        );
    }
    if truth_lines.is_empty() {
        bail!("no answers to score: both files contain only blank lines");
    }

    let mut line_scores = Vec::with_capacity(truth_lines.len());
    for (index, (truth_raw, predicted_raw)) in
        truth_lines.iter().zip(predicted_lines).enumerate()
    {
        let truth = parse_answer(truth_raw, trim_items);
        let predicted = parse_answer(predicted_raw, trim_items);
        let score = score_pair(&predicted, &truth, measure);
        debug!(
            line = index + 1,
            truth = %truth_raw,
            predicted = %predicted_raw,
            score,
            "scored answer pair"
        );
        line_scores.push(score);
    }

    let final_score = line_scores.iter().sum::<f64>() / line_scores.len() as f64;
    Ok(Evaluation {
        line_scores,
        final_score,
    })
}
