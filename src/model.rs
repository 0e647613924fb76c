use serde::Serialize;

/// One answer item. Empty comma-separated pieces become `Missing`, which
/// never matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Token(String),
    Missing,
}

impl Item {
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }
}

/// Parsed answer. Order and multiplicity are preserved.
pub type AnswerSet = Vec<Item>;

#[derive(Debug, Clone, Serialize)]
pub struct InputFile {
    pub path: String,
    pub sha256: String,
    pub answer_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineScore {
    pub index: usize,
    pub ground_truth: String,
    pub predicted: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub report_version: u32,
    pub generated_at: String,
    pub mode: String,
    pub threshold: Option<f64>,
    pub trim_items: bool,
    pub ground_truth: InputFile,
    pub predicted: InputFile,
    pub pair_count: usize,
    pub final_score: f64,
    pub final_score_percent: f64,
    pub line_scores: Vec<LineScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomySource {
    pub path: String,
    pub sha256: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyImportManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub db_path: String,
    pub senses: TaxonomySource,
    pub hypernyms: TaxonomySource,
    pub noun_sense_count: usize,
    pub node_count: usize,
    pub max_depth: usize,
}
