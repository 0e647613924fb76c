use crate::measure::ItemMeasure;
use crate::membership::membership;
use crate::model::Item;

/// Symmetric fuzzy set score of `predicted` against `truth`.
///
/// Each direction multiplies the membership of every item in the other set,
/// so one unmatched item pulls that direction to zero. The minimum of both
/// directions penalizes missing items and extra items alike.
pub fn score_pair(predicted: &[Item], truth: &[Item], measure: &ItemMeasure<'_>) -> f64 {
    if predicted.is_empty() && truth.is_empty() {
        return 1.0;
    }

    let left = directional_score(predicted, truth, measure);
    let right = directional_score(truth, predicted, measure);
    left.min(right)
}

fn directional_score(items: &[Item], other: &[Item], measure: &ItemMeasure<'_>) -> f64 {
    if items.is_empty() {
        return 0.0;
    }

    items
        .iter()
        .map(|item| membership(item, other, measure))
        .product()
}

#[cfg(test)]
mod tests {
    use super::score_pair;
    use crate::measure::ItemMeasure;
    use crate::measure::fixtures::pets;
    use crate::model::Item;

    fn items(values: &[&str]) -> Vec<Item> {
        values
            .iter()
            .map(|value| Item::Token(value.to_string()))
            .collect()
    }

    #[test]
    fn both_empty_sets_match_perfectly() {
        assert_eq!(score_pair(&[], &[], &ItemMeasure::Exact), 1.0);
        let lexicon = pets();
        assert_eq!(score_pair(&[], &[], &ItemMeasure::taxonomic(&lexicon, 0.9)), 1.0);
    }

    #[test]
    fn one_empty_side_scores_zero() {
        let chair = items(&["chair"]);
        assert_eq!(score_pair(&chair, &[], &ItemMeasure::Exact), 0.0);
        assert_eq!(score_pair(&[], &chair, &ItemMeasure::Exact), 0.0);
    }

    #[test]
    fn exact_mode_ignores_order_within_sets() {
        let truth = items(&["chair", "table"]);
        let predicted = items(&["table", "chair"]);
        assert_eq!(score_pair(&predicted, &truth, &ItemMeasure::Exact), 1.0);
    }

    #[test]
    fn exact_mode_scores_identical_sets_as_one() {
        let set = items(&["book", "book", "lamp"]);
        assert_eq!(score_pair(&set, &set, &ItemMeasure::Exact), 1.0);
    }

    #[test]
    fn exact_mode_penalizes_subsets_and_supersets() {
        let truth = items(&["chair", "table"]);
        let subset = items(&["chair"]);
        let superset = items(&["chair", "table", "lamp"]);
        assert_eq!(score_pair(&subset, &truth, &ItemMeasure::Exact), 0.0);
        assert_eq!(score_pair(&superset, &truth, &ItemMeasure::Exact), 0.0);
    }

    #[test]
    fn exact_mode_treats_duplicates_as_set_members() {
        let truth = items(&["book"]);
        let predicted = items(&["book", "book"]);
        assert_eq!(score_pair(&predicted, &truth, &ItemMeasure::Exact), 1.0);
    }

    #[test]
    fn missing_items_never_match() {
        let truth = vec![Item::Token("chair".to_string()), Item::Missing];
        assert_eq!(score_pair(&truth, &truth, &ItemMeasure::Exact), 0.0);
    }

    #[test]
    fn taxonomic_single_items_downweight_loose_matches() {
        let lexicon = pets();
        let measure = ItemMeasure::taxonomic(&lexicon, 0.9);
        let score = score_pair(&items(&["cat"]), &items(&["dog"]), &measure);
        assert!((score - 0.0857).abs() < 1e-12);
    }

    #[test]
    fn taxonomic_product_compounds_partial_matches() {
        let lexicon = pets();
        let measure = ItemMeasure::taxonomic(&lexicon, 0.9);
        let truth = items(&["dog", "sofa"]);
        let predicted = items(&["puppy", "couch"]);
        // Each direction is 0.93 * 1.0.
        let score = score_pair(&predicted, &truth, &measure);
        assert!((score - 0.93).abs() < 1e-12);
    }

    #[test]
    fn score_is_symmetric_for_symmetric_measures() {
        let lexicon = pets();
        let taxonomic = ItemMeasure::taxonomic(&lexicon, 0.9);
        let cases = [
            (items(&["dog", "cat"]), items(&["puppy"])),
            (items(&["sofa"]), items(&["couch", "dog"])),
            (items(&["chair", "table"]), items(&["table"])),
        ];
        for (left, right) in &cases {
            for measure in [&ItemMeasure::Exact, &taxonomic] {
                assert_eq!(
                    score_pair(left, right, measure),
                    score_pair(right, left, measure)
                );
            }
        }
    }

    #[test]
    fn scores_stay_within_unit_interval() {
        let lexicon = pets();
        let measure = ItemMeasure::taxonomic(&lexicon, 0.5);
        let sets = [
            items(&["dog"]),
            items(&["cat", "dog"]),
            items(&["couch", "zebra"]),
            items(&["puppy", "puppy"]),
        ];
        for left in &sets {
            for right in &sets {
                let score = score_pair(left, right, &measure);
                assert!((0.0..=1.0).contains(&score), "{score} out of range");
            }
        }
    }
}
