//! Property tests for app version ordering.

use std::cmp::Ordering;

use idlookup_core::{compare_versions, AppVersion};
use proptest::prelude::*;

fn dotted(parts: &[u32]) -> String {
    parts
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

proptest! {
    #[test]
    fn comparison_is_antisymmetric(
        a in prop::collection::vec(0u32..1000, 1..6),
        b in prop::collection::vec(0u32..1000, 1..6),
    ) {
        let (a, b) = (dotted(&a), dotted(&b));
        prop_assert_eq!(compare_versions(&a, &b), compare_versions(&b, &a).reverse());
    }

    #[test]
    fn trailing_zero_components_do_not_matter(
        parts in prop::collection::vec(0u32..1000, 1..6),
        zeros in 0usize..4,
    ) {
        let base = dotted(&parts);
        let padded = format!("{base}{}", ".0".repeat(zeros));
        prop_assert_eq!(compare_versions(&base, &padded), Ordering::Equal);
    }

    #[test]
    fn matches_lexicographic_order_of_equal_length_vectors(
        a in prop::collection::vec(0u32..1000, 3),
        b in prop::collection::vec(0u32..1000, 3),
    ) {
        prop_assert_eq!(compare_versions(&dotted(&a), &dotted(&b)), a.cmp(&b));
    }

    #[test]
    fn bumping_any_component_orders_higher(
        parts in prop::collection::vec(0u32..1000, 1..6),
        index in 0usize..6,
    ) {
        let index = index % parts.len();
        let mut bumped = parts.clone();
        bumped[index] += 1;
        prop_assert!(AppVersion::parse(&dotted(&bumped)) > AppVersion::parse(&dotted(&parts)));
    }
}

#[test]
fn documented_examples() {
    assert_eq!(compare_versions("1.2.3", "1.2.3"), Ordering::Equal);
    assert_eq!(compare_versions("1.9", "1.10"), Ordering::Less);
    assert_eq!(compare_versions("2", "1.9.9"), Ordering::Greater);
    assert_eq!(compare_versions("1.0", "1"), Ordering::Equal);
}
