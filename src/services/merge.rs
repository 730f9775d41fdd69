use std::collections::HashSet;

use crate::models::{OutfitItem, OutfitRole, ProposedItem};
use crate::services::builder::{self, BuildContext, BuildOptions};

/// Reconciles untrusted generator proposals with a rule-based baseline
///
/// Proposals are walked in order and kept only when the item id is
/// non-empty, exists in the wardrobe snapshot, and neither the id nor the
/// (non-catch-all) role has been claimed yet; everything else is dropped
/// silently, since the generator is known to be occasionally unreliable.
/// The rule-based builder then fills whatever roles survive unclaimed, so
/// the result is always a valid outfit no matter how malformed the input.
pub fn merge_with_baseline(
    proposals: &[ProposedItem],
    ctx: &BuildContext<'_>,
    options: &BuildOptions,
) -> Vec<OutfitItem> {
    let valid_ids: HashSet<&str> = ctx.wardrobe.iter().map(|item| item.id.as_str()).collect();

    let mut used_ids: HashSet<String> = HashSet::new();
    let mut used_roles: HashSet<OutfitRole> = HashSet::new();
    let mut merged: Vec<OutfitItem> = Vec::new();

    for proposal in proposals {
        let id = proposal.cloth_item_id.trim();
        if id.is_empty() || !valid_ids.contains(id) || used_ids.contains(id) {
            continue;
        }
        let role = OutfitRole::from_raw(&proposal.role);
        if role != OutfitRole::Other && used_roles.contains(&role) {
            continue;
        }
        used_ids.insert(id.to_string());
        used_roles.insert(role);
        merged.push(OutfitItem {
            cloth_item_id: id.to_string(),
            role,
        });
    }

    for candidate in builder::build_outfit(ctx, options) {
        if used_ids.contains(&candidate.cloth_item_id) {
            continue;
        }
        if candidate.role != OutfitRole::Other && used_roles.contains(&candidate.role) {
            continue;
        }
        used_ids.insert(candidate.cloth_item_id.clone());
        used_roles.insert(candidate.role);
        merged.push(candidate);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Formality, Season, WardrobeItem};

    fn item(id: &str, category: Category) -> WardrobeItem {
        WardrobeItem {
            id: id.to_string(),
            category,
            color: "grey".to_string(),
            season: Season::AllSeasons,
            formality: Formality::Casual,
            image_url: format!("/uploads/{}.png", id),
        }
    }

    fn proposal(id: &str, role: &str) -> ProposedItem {
        ProposedItem {
            cloth_item_id: id.to_string(),
            role: role.to_string(),
        }
    }

    fn ctx(wardrobe: &[WardrobeItem]) -> BuildContext<'_> {
        BuildContext {
            wardrobe,
            season: Season::Summer,
            formality: Formality::Casual,
            weather: None,
        }
    }

    fn default_options() -> BuildOptions {
        BuildOptions::default()
    }

    #[test]
    fn test_valid_proposals_survive_in_order() {
        let wardrobe = vec![item("top-1", Category::Top), item("bottom-1", Category::Bottom)];
        let proposals = vec![proposal("bottom-1", "BOTTOM"), proposal("top-1", "TOP")];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        assert_eq!(merged[0].cloth_item_id, "bottom-1");
        assert_eq!(merged[1].cloth_item_id, "top-1");
    }

    #[test]
    fn test_unknown_item_id_dropped_and_role_backfilled() {
        let wardrobe = vec![
            item("top-1", Category::Top),
            item("bottom-1", Category::Bottom),
            item("shoes-1", Category::Shoes),
        ];
        let proposals = vec![proposal("ghost-item", "TOP"), proposal("bottom-1", "BOTTOM")];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        assert!(merged.iter().all(|i| i.cloth_item_id != "ghost-item"));
        // the baseline fills TOP with the real wardrobe item
        let top = merged.iter().find(|i| i.role == OutfitRole::Top).unwrap();
        assert_eq!(top.cloth_item_id, "top-1");
    }

    #[test]
    fn test_empty_and_whitespace_ids_dropped() {
        let wardrobe = vec![item("top-1", Category::Top)];
        let proposals = vec![proposal("", "TOP"), proposal("   ", "BOTTOM")];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].cloth_item_id, "top-1");
    }

    #[test]
    fn test_duplicate_role_first_seen_wins() {
        let wardrobe = vec![item("top-1", Category::Top), item("top-2", Category::Top)];
        let proposals = vec![proposal("top-1", "TOP"), proposal("top-2", "TOP")];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        let tops: Vec<_> = merged.iter().filter(|i| i.role == OutfitRole::Top).collect();
        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].cloth_item_id, "top-1");
    }

    #[test]
    fn test_duplicate_item_id_dropped() {
        let wardrobe = vec![item("top-1", Category::Top)];
        let proposals = vec![proposal("top-1", "TOP"), proposal("top-1", "OTHER")];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_malformed_role_becomes_other() {
        let wardrobe = vec![item("thing-1", Category::Accessory), item("top-1", Category::Top)];
        let proposals = vec![proposal("thing-1", "HEADWEAR??")];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        assert_eq!(merged[0].role, OutfitRole::Other);
        assert_eq!(merged[0].cloth_item_id, "thing-1");
    }

    #[test]
    fn test_multiple_other_roles_allowed() {
        let wardrobe = vec![
            item("thing-1", Category::Accessory),
            item("thing-2", Category::Accessory),
        ];
        let proposals = vec![proposal("thing-1", "junk"), proposal("thing-2", "junk")];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        let others = merged.iter().filter(|i| i.role == OutfitRole::Other).count();
        assert_eq!(others, 2);
    }

    #[test]
    fn test_baseline_fills_missing_roles_without_overriding() {
        let wardrobe = vec![
            item("top-1", Category::Top),
            item("top-2", Category::Top),
            item("bottom-1", Category::Bottom),
            item("shoes-1", Category::Shoes),
        ];
        // generator picked the "wrong" top; merger must keep it anyway
        let proposals = vec![proposal("top-2", "TOP")];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        let top = merged.iter().find(|i| i.role == OutfitRole::Top).unwrap();
        assert_eq!(top.cloth_item_id, "top-2");
        assert!(merged.iter().any(|i| i.role == OutfitRole::Bottom));
        assert!(merged.iter().any(|i| i.role == OutfitRole::Shoes));
    }

    #[test]
    fn test_empty_proposals_equal_pure_baseline() {
        let wardrobe = vec![
            item("top-1", Category::Top),
            item("bottom-1", Category::Bottom),
            item("shoes-1", Category::Shoes),
        ];
        let context = ctx(&wardrobe);
        let options = default_options();

        let merged = merge_with_baseline(&[], &context, &options);
        let baseline = builder::build_outfit(&context, &options);

        assert_eq!(merged, baseline);
    }

    #[test]
    fn test_output_never_references_ids_outside_wardrobe() {
        let wardrobe = vec![item("top-1", Category::Top)];
        let proposals = vec![
            proposal("x", "TOP"),
            proposal("y", "BOTTOM"),
            proposal("z", "SHOES"),
        ];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        for entry in &merged {
            assert!(wardrobe.iter().any(|w| w.id == entry.cloth_item_id));
        }
    }

    #[test]
    fn test_unique_non_other_roles_in_output() {
        let wardrobe = vec![
            item("top-1", Category::Top),
            item("top-2", Category::Top),
            item("bottom-1", Category::Bottom),
            item("shoes-1", Category::Shoes),
        ];
        let proposals = vec![
            proposal("top-1", "TOP"),
            proposal("top-2", "top"),
            proposal("bottom-1", "BOTTOM"),
        ];

        let merged = merge_with_baseline(&proposals, &ctx(&wardrobe), &default_options());

        let mut seen = HashSet::new();
        for entry in &merged {
            if entry.role != OutfitRole::Other {
                assert!(seen.insert(entry.role), "duplicate role {:?}", entry.role);
            }
        }
    }
}
