//! Category-level threat aggregation with compounding penalties.

use ahash::AHashMap;

use crate::config::threat::ThreatConfig;
use crate::entities::block::{BlockCategory, BlockSnapshot};

/// Folds one bucket of block values left to right.
///
/// The first value enters unchanged; every further value is added and the
/// running total rescaled, so stacking many copies of a block yields
/// diminishing returns when the multiplier is below one.
fn compound(values: &[f32], multiplier: f32) -> f32 {
    let [first, rest @ ..] = values else {
        return 0.0;
    };
    rest.iter().fold(*first, |acc, v| (acc + v) * multiplier)
}

/// Scores every usable block of one category.
///
/// Blocks with their own entry in the block table fold in per-key buckets
/// under that entry's multiplier; the rest share a single bucket under the
/// category entry. Blocks matching neither table contribute nothing.
pub fn category_threat<'a>(
    blocks: impl IntoIterator<Item = &'a BlockSnapshot>,
    category: BlockCategory,
    config: &ThreatConfig,
    scan_inventory: bool,
) -> f32 {
    let category_def = config.category_definition(category.as_str());

    let mut category_values: Vec<f32> = Vec::new();
    let mut block_buckets: AHashMap<&'a str, (f32, Vec<f32>)> = AHashMap::new();

    for block in blocks {
        if block.closed || !block.functional {
            continue;
        }

        let key = block.threat_key();
        let (definition, block_keyed) = match config.block_definition(key) {
            Some(def) => (def, true),
            None => match category_def {
                Some(def) => (def, false),
                None => continue,
            },
        };

        let mut value = definition.threat as f32;
        if scan_inventory {
            if let Some(inventory) = block.inventory {
                if inventory.max_volume > 0.0 {
                    let fill = inventory.current_volume / inventory.max_volume + 1.0;
                    if fill.is_finite() {
                        value += fill * definition.potential_volume as f32;
                    }
                }
            }
        }

        if block_keyed {
            block_buckets
                .entry(key)
                .or_insert_with(|| (definition.multiplier as f32, Vec::new()))
                .1
                .push(value);
        } else {
            category_values.push(value);
        }
    }

    let mut total = 0.0;
    if let Some(def) = category_def {
        total += compound(&category_values, def.multiplier as f32);
    }
    for (multiplier, values) in block_buckets.values() {
        total += compound(values, *multiplier);
    }
    total
}
