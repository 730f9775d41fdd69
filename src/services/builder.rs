use std::collections::HashSet;

use crate::models::{Category, Formality, OutfitItem, OutfitRole, Season, WardrobeItem, WeatherConditions};
use crate::services::scoring;

/// Immutable inputs for one build pass: the wardrobe snapshot and the
/// desired (season, formality, weather) context for a single day
pub struct BuildContext<'a> {
    pub wardrobe: &'a [WardrobeItem],
    pub season: Season,
    pub formality: Formality,
    pub weather: Option<&'a WeatherConditions>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Always try to add an outerwear layer regardless of weather
    pub enforce_outerwear: bool,
    /// Actively suggest an accessory (special occasions)
    pub encourage_accessories: bool,
}

/// Assembles one complete, role-consistent outfit for one day
///
/// Greedy selection, one role at a time: every unused item of a matching
/// category is scored as season fit + formality fit (plus role-specific
/// adjustments) and the best one wins; ties go to the first item in
/// wardrobe order, so output is deterministic for a given snapshot.
///
/// Never fails: an empty wardrobe yields an empty outfit, and a wardrobe
/// where nothing matched still yields its first item as a catch-all.
pub fn build_outfit(ctx: &BuildContext<'_>, options: &BuildOptions) -> Vec<OutfitItem> {
    let mut used: HashSet<&str> = HashSet::new();
    let mut items: Vec<OutfitItem> = Vec::new();

    let dress = try_add(ctx, options, &mut used, &mut items, &[Category::Dress], OutfitRole::Dress);

    if !dress {
        let mut top = try_add(ctx, options, &mut used, &mut items, &[Category::Top], OutfitRole::Top);
        if !top {
            // no dedicated top: an outerwear piece can stand in for one
            top = try_add(
                ctx,
                options,
                &mut used,
                &mut items,
                &[Category::Outerwear],
                OutfitRole::Top,
            );
        }
        let bottom = try_add(ctx, options, &mut used, &mut items, &[Category::Bottom], OutfitRole::Bottom);

        if !top && bottom {
            // keep a bottom-only outfit from going out the door alone
            try_add(
                ctx,
                options,
                &mut used,
                &mut items,
                &[Category::Outerwear],
                OutfitRole::Outerwear,
            );
        }
    }

    let need_outerwear = options.enforce_outerwear
        || ctx
            .weather
            .map(|w| w.temperature_max_c < 16.0 || w.precipitation_chance > 0.5)
            .unwrap_or(false);
    if need_outerwear {
        try_add(
            ctx,
            options,
            &mut used,
            &mut items,
            &[Category::Outerwear],
            OutfitRole::Outerwear,
        );
    }

    let shoes = try_add(ctx, options, &mut used, &mut items, &[Category::Shoes], OutfitRole::Shoes);
    if shoes {
        if let Some(weather) = ctx.weather {
            if weather.temperature_min_c < 18.0 {
                try_add(ctx, options, &mut used, &mut items, &[Category::Socks], OutfitRole::Socks);
            }
        }
    }

    if options.encourage_accessories {
        try_add(
            ctx,
            options,
            &mut used,
            &mut items,
            &[Category::Accessory],
            OutfitRole::Accessory,
        );
    }

    if items.is_empty() {
        if let Some(first) = ctx.wardrobe.first() {
            items.push(OutfitItem {
                cloth_item_id: first.id.clone(),
                role: OutfitRole::Other,
            });
        }
    }

    items
}

/// Picks the best unused item for the role and appends it; returns whether
/// anything was added. Non-catch-all roles are filled at most once.
fn try_add<'a>(
    ctx: &BuildContext<'a>,
    options: &BuildOptions,
    used: &mut HashSet<&'a str>,
    items: &mut Vec<OutfitItem>,
    categories: &[Category],
    role: OutfitRole,
) -> bool {
    if role != OutfitRole::Other && items.iter().any(|item| item.role == role) {
        return false;
    }

    match pick_best(ctx, options, used, categories, role) {
        Some(item) => {
            used.insert(item.id.as_str());
            items.push(OutfitItem {
                cloth_item_id: item.id.clone(),
                role,
            });
            true
        }
        None => false,
    }
}

/// Highest-scoring unused wardrobe item of a matching category
fn pick_best<'a>(
    ctx: &BuildContext<'a>,
    options: &BuildOptions,
    used: &HashSet<&'a str>,
    categories: &[Category],
    role: OutfitRole,
) -> Option<&'a WardrobeItem> {
    let mut best: Option<&WardrobeItem> = None;
    let mut best_score = i32::MIN;

    for item in ctx.wardrobe {
        if !categories.contains(&item.category) || used.contains(item.id.as_str()) {
            continue;
        }

        let mut score = scoring::season_score(item.season, ctx.season)
            + scoring::formality_score(item.formality, ctx.formality);

        if role == OutfitRole::Outerwear {
            if let Some(weather) = ctx.weather {
                if weather.temperature_max_c < 18.0 || weather.precipitation_chance > 0.4 {
                    score += 3;
                } else {
                    score -= 2;
                }
            }
        }

        if role == OutfitRole::Accessory && !options.encourage_accessories {
            score -= 1;
        }

        if score > best_score {
            best = Some(item);
            best_score = score;
        }
    }

    best
}
