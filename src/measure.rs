use std::fmt;

use crate::model::Item;
use crate::taxonomy::LexicalResource;

pub const ACCURACY_THRESHOLD: f64 = -1.0;
const LOOSE_SENSE_WEIGHT: f64 = 0.1;

/// Scoring mode picked from the threshold argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringMode {
    Accuracy,
    Wups { threshold: f64 },
}

impl ScoringMode {
    pub fn from_threshold(threshold: f64) -> Self {
        if threshold == ACCURACY_THRESHOLD {
            Self::Accuracy
        } else {
            Self::Wups { threshold }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Wups { .. } => "wups",
        }
    }

    pub fn threshold(self) -> Option<f64> {
        match self {
            Self::Accuracy => None,
            Self::Wups { threshold } => Some(threshold),
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accuracy => write!(f, "standard Accuracy"),
            Self::Wups { threshold } => write!(f, "soft WUPS at {threshold:.2}"),
        }
    }
}

/// Item-to-item similarity in [0, 1].
pub enum ItemMeasure<'a> {
    Exact,
    Taxonomic {
        resource: &'a dyn LexicalResource,
        threshold: f64,
    },
}

impl<'a> ItemMeasure<'a> {
    pub fn taxonomic(resource: &'a dyn LexicalResource, threshold: f64) -> Self {
        Self::Taxonomic {
            resource,
            threshold,
        }
    }

    pub fn similarity(&self, left: &Item, right: &Item) -> f64 {
        match self {
            Self::Exact => exact_similarity(left, right),
            Self::Taxonomic {
                resource,
                threshold,
            } => taxonomic_similarity(*resource, *threshold, left, right),
        }
    }
}

fn exact_similarity(left: &Item, right: &Item) -> f64 {
    match (left.as_token(), right.as_token()) {
        (Some(left), Some(right)) if left == right => 1.0,
        _ => 0.0,
    }
}

fn taxonomic_similarity(
    resource: &dyn LexicalResource,
    threshold: f64,
    left: &Item,
    right: &Item,
) -> f64 {
    let (Some(left), Some(right)) = (left.as_token(), right.as_token()) else {
        return 0.0;
    };
    if left == right {
        return 1.0;
    }

    let left_senses = resource.noun_senses(left);
    let right_senses = resource.noun_senses(right);
    if left_senses.is_empty() || right_senses.is_empty() {
        return 0.0;
    }

    // Most optimistic interpretation over all sense pairs.
    let mut global_max = 0.0_f64;
    for left_sense in left_senses {
        for right_sense in right_senses {
            let local = resource.sense_similarity(left_sense, right_sense);
            if local > global_max {
                global_max = local;
            }
        }
    }
    let global_max = global_max.clamp(0.0, 1.0);

    // Below the threshold the words likely share only a semantic field.
    let interpretation_weight = if global_max < threshold {
        LOOSE_SENSE_WEIGHT
    } else {
        1.0
    };

    global_max * interpretation_weight
}
