//! Slicer metadata extraction: recovers filament mass (grams) from the text
//! of a sliced G-code file or a project-archive config entry.
//!
//! # Tiers
//!
//! Slicers write the same fact in incompatible layouts, so the extractor runs
//! an ordered cascade of pattern sets. The first tier that produces a value
//! wins; later tiers are never consulted.
//!
//! | Tier | Example |
//! |------|---------|
//! | [`ExtractionTier::DirectField`]    | `; filament used [g] = 12.50, 8.30` |
//! | [`ExtractionTier::InlineMarker`]   | `; filament used = 7.82m (23.69g)` |
//! | [`ExtractionTier::StructuredTag`]  | `<filament id="1" used_g="18.42" />` |
//! | [`ExtractionTier::VolumeFallback`] | `; filament used [mm³] = 1520.4` |
//! | [`ExtractionTier::Fuzzy`]          | `filament ... 3.1g` anywhere |
//!
//! Mass fields outrank volume fields because the material density is only
//! known when the slicer states the mass itself.

pub mod numbers;

use once_cell::sync::Lazy;
use regex::Regex;

use numbers::{parse_leading_f64, sum_comma_separated};

/// Density (g/cm³) used to turn a volume field into a mass estimate.
/// Generic PLA; the real material is not recoverable from volume alone.
pub const VOLUME_FALLBACK_DENSITY: f64 = 1.24;

/// The confidence level at which a mass value was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionTier {
    DirectField,
    InlineMarker,
    StructuredTag,
    VolumeFallback,
    Fuzzy,
}

/// A mass value together with the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extraction {
    pub grams: f64,
    pub tier: ExtractionTier,
}

/// One pattern paired with the function that turns its first capture into grams.
struct Strategy {
    pattern: Regex,
    interpret: fn(&str) -> f64,
}

struct Tier {
    tier: ExtractionTier,
    /// When set, a match only counts if it yields a value > 0; otherwise the
    /// next strategy is tried.
    require_positive: bool,
    strategies: Vec<Strategy>,
}

fn strategy(pattern: &str, interpret: fn(&str) -> f64) -> Strategy {
    Strategy {
        pattern: Regex::new(pattern).expect("extraction pattern must compile"),
        interpret,
    }
}

fn single_value(capture: &str) -> f64 {
    parse_leading_f64(capture).unwrap_or(0.0)
}

fn mm3_to_grams(capture: &str) -> f64 {
    single_value(capture) / 1000.0 * VOLUME_FALLBACK_DENSITY
}

fn cm3_to_grams(capture: &str) -> f64 {
    single_value(capture) * VOLUME_FALLBACK_DENSITY
}

static TIERS: Lazy<Vec<Tier>> = Lazy::new(|| {
    vec![
        Tier {
            tier: ExtractionTier::DirectField,
            require_positive: true,
            strategies: vec![
                strategy(r"(?i)filament used \[g\]\s*[:=]\s*([0-9.,\s]+)", sum_comma_separated),
                strategy(
                    r"(?i)total filament used \[g\]\s*[:=]\s*([0-9.,\s]+)",
                    sum_comma_separated,
                ),
                strategy(
                    r"(?i)estimated filament weight \(g\)\s*[:=]\s*([0-9.,\s]+)",
                    sum_comma_separated,
                ),
                strategy(r"(?i)filament_weight_g\s*[:=]\s*([0-9.,\s]+)", sum_comma_separated),
                strategy(r"(?i)weight\s*[:=]\s*([0-9.,\s]+)\s*g", sum_comma_separated),
            ],
        },
        Tier {
            tier: ExtractionTier::InlineMarker,
            require_positive: true,
            strategies: vec![
                strategy(r"(?i)\(([0-9.]+)\s*g\)", single_value),
                strategy(r"(?i)filament.*?[:=]\s*([0-9.]+)\s*g", single_value),
                strategy(r"(?i)weight.*?[:=]\s*([0-9.]+)\s*g", single_value),
            ],
        },
        Tier {
            tier: ExtractionTier::StructuredTag,
            require_positive: true,
            strategies: vec![
                strategy(
                    r"(?i)<filament_used_g>([0-9.,\s]+)</filament_used_g>",
                    sum_comma_separated,
                ),
                strategy(
                    r"(?i)<total_filament_used_g>([0-9.,\s]+)</total_filament_used_g>",
                    sum_comma_separated,
                ),
                strategy(
                    r"(?i)<filament_used>([0-9.,\s]+)</filament_used>",
                    sum_comma_separated,
                ),
                strategy(r#"(?i)used_g="([0-9.,\s]+)""#, sum_comma_separated),
                strategy(r#"(?i)filament_weight\s*=\s*"([0-9.,\s]+)""#, sum_comma_separated),
            ],
        },
        Tier {
            tier: ExtractionTier::VolumeFallback,
            require_positive: true,
            strategies: vec![
                strategy(r"(?i)filament used \[mm³\]\s*[:=]\s*([0-9]+\.?[0-9]*)", mm3_to_grams),
                strategy(r"(?i)filament used \[cm³\]\s*[:=]\s*([0-9]+\.?[0-9]*)", cm3_to_grams),
                strategy(
                    r"(?i)<filament_used_mm3>([0-9.]+)</filament_used_mm3>",
                    mm3_to_grams,
                ),
            ],
        },
        // Last resort: accepted as-is, even when it reads as zero.
        Tier {
            tier: ExtractionTier::Fuzzy,
            require_positive: false,
            strategies: vec![strategy(r"(?i)filament.+?([0-9.]+)\s*g", single_value)],
        },
    ]
});

/// Run the tier cascade over `text` and report which tier matched.
///
/// Returns `None` when no tier produced an acceptable value. A
/// [`ExtractionTier::Fuzzy`] match is returned even when it reads as zero.
pub fn extract(text: &str) -> Option<Extraction> {
    for tier in TIERS.iter() {
        for strategy in &tier.strategies {
            let Some(capture) = strategy.pattern.captures(text).and_then(|c| c.get(1)) else {
                continue;
            };
            let grams = (strategy.interpret)(capture.as_str());
            if !tier.require_positive || grams > 0.0 {
                return Some(Extraction {
                    grams,
                    tier: tier.tier,
                });
            }
        }
    }
    None
}

/// Recover the filament mass in grams from `text`.
///
/// Never fails: `0.0` means no interpretation succeeded and callers decide
/// what "not found" means in their context.
pub fn extract_mass_grams(text: &str) -> f64 {
    extract(text).map(|e| e.grams).unwrap_or(0.0)
}
