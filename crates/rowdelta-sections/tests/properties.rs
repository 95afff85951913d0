use proptest::prelude::*;
use rowdelta_sections::{
    apply_sections, diff_sections, diff_sections_with, ApplyOptions, DisjointPolicy, Section,
    SectionChange, SectionDiffConfig, SectionSet, SectionedDiff,
};

type Set = SectionSet<u8, u8>;
type Sec = Section<u8, u8>;

fn section() -> impl Strategy<Value = Sec> {
    (
        prop::option::of(0u8..3),
        prop::option::of(0u8..2),
        prop::collection::vec(0u8..5, 0..6),
    )
        .prop_map(|(id, header, items)| {
            let mut section = Sec::new(items);
            if let Some(id) = id {
                section = section.with_id(u64::from(id));
            }
            if let Some(header) = header {
                section = section.with_header(header);
            }
            section
        })
}

fn section_set() -> impl Strategy<Value = Set> {
    prop::collection::vec(section(), 0..5).prop_map(Set::from)
}

fn replace_config() -> SectionDiffConfig {
    SectionDiffConfig {
        disjoint: DisjointPolicy::Replace,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn applying_a_sectioned_diff_yields_new(old in section_set(), new in section_set()) {
        let diff = diff_sections(&old, &new);
        let mut target = old.clone();
        apply_sections(&diff, &mut target, &ApplyOptions::default()).unwrap();
        prop_assert_eq!(target, new);
    }

    #[test]
    fn replace_policy_also_round_trips(old in section_set(), new in section_set()) {
        let diff = diff_sections_with(&old, &new, &replace_config(), |a, b| a == b);
        let mut target = old.clone();
        target.apply(&diff, &ApplyOptions::default()).unwrap();
        prop_assert_eq!(target, new);
    }

    #[test]
    fn compacting_apply_drops_only_empty_sections(old in section_set(), new in section_set()) {
        let diff = diff_sections(&old, &new);
        let mut target = old.clone();
        target.apply(&diff, &ApplyOptions::compacting()).unwrap();

        let mut expected = new.clone();
        expected.compact();
        prop_assert_eq!(target, expected);
    }

    #[test]
    fn self_diff_is_empty(set in section_set()) {
        prop_assert!(diff_sections(&set, &set).is_empty());
    }

    #[test]
    fn unchanged_regions_only_produce_item_diffs(
        old in section_set(),
        fresh in prop::collection::vec(prop::collection::vec(0u8..5, 0..6), 5),
    ) {
        // Distinct ids pin every section to its own slot.
        let old: Set = old
            .into_sections()
            .into_iter()
            .enumerate()
            .map(|(index, section)| section.with_id(index as u64))
            .collect();
        let new: Set = old
            .sections()
            .iter()
            .zip(fresh)
            .map(|(section, items)| {
                let mut section = section.clone();
                *section.items_mut() = items;
                section
            })
            .collect();

        let diff = diff_sections(&old, &new);
        for change in &diff {
            let is_items = matches!(change, SectionChange::Items { .. });
            prop_assert!(is_items);
        }
        for (old_section, section, _) in diff.item_diffs() {
            prop_assert_eq!(old_section, section);
        }
    }
}

#[test]
fn sectioned_diff_serializes_to_json() {
    let old = Set::from(vec![Sec::new(vec![1, 2]).with_id("a"), Sec::new(vec![3])]);
    let new = Set::from(vec![Sec::new(vec![2]).with_id("a")]);
    let diff = diff_sections(&old, &new);

    let json = serde_json::to_string(&diff).unwrap();
    let back: SectionedDiff<u8, u8> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, diff);
    assert!(json.contains("remove_section"));
}
