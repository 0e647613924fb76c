use crate::measure::ItemMeasure;
use crate::model::Item;

/// Fuzzy `item ∈ set`: the best similarity against any member, 0 for an
/// empty set.
pub fn membership(item: &Item, set: &[Item], measure: &ItemMeasure<'_>) -> f64 {
    set.iter()
        .map(|member| measure.similarity(item, member))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::membership;
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
    fn membership_in_empty_set_is_zero() {
        let item = Item::Token("chair".to_string());
        assert_eq!(membership(&item, &[], &ItemMeasure::Exact), 0.0);
    }

    #[test]
    fn membership_finds_exact_member_anywhere_in_set() {
        let item = Item::Token("table".to_string());
        let set = items(&["chair", "window", "table"]);
        assert_eq!(membership(&item, &set, &ItemMeasure::Exact), 1.0);
        let absent = Item::Token("lamp".to_string());
        assert_eq!(membership(&absent, &set, &ItemMeasure::Exact), 0.0);
    }

    #[test]
    fn membership_takes_best_taxonomic_match() {
        let lexicon = pets();
        let measure = ItemMeasure::taxonomic(&lexicon, 0.9);
        let item = Item::Token("dog".to_string());
        let set = items(&["cat", "puppy", "sofa"]);
        let score = membership(&item, &set, &measure);
        assert!((score - 0.93).abs() < 1e-12);
    }
}
