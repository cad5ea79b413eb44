//! Trend classification from the EMA triplet and ADX.
//!
//! Rules are evaluated top-down and the first match decides both the
//! direction and the strength formula, so two SIDEWAYS results can carry
//! different strengths depending on which rule produced them.

use super::indicators::{IndicatorSnapshot, DEFAULT_ADX};
use crate::types::{TrendAssessment, TrendDirection};

/// Inputs the trend rules look at.
#[derive(Debug, Clone, Copy)]
pub struct TrendInputs {
    pub price: f64,
    pub ema9: Option<f64>,
    pub ema21: Option<f64>,
    pub ema50: Option<f64>,
    pub adx: f64,
}

impl TrendInputs {
    /// Missing ADX falls back to [`DEFAULT_ADX`].
    pub fn from_snapshot(snapshot: &IndicatorSnapshot, price: f64) -> Self {
        Self {
            price,
            ema9: snapshot.ema9,
            ema21: snapshot.ema21,
            ema50: snapshot.ema50,
            adx: snapshot.adx.unwrap_or(DEFAULT_ADX),
        }
    }

    fn emas(&self) -> Option<(f64, f64, f64)> {
        Some((self.ema9?, self.ema21?, self.ema50?))
    }
}

/// One entry of the trend cascade.
pub struct TrendRule {
    pub name: &'static str,
    pub direction: TrendDirection,
    pub matches: fn(&TrendInputs) -> bool,
    pub strength: fn(f64) -> f64,
}

fn stacked_up(inputs: &TrendInputs) -> bool {
    inputs
        .emas()
        .is_some_and(|(e9, e21, e50)| e9 > e21 && e21 > e50 && inputs.price > e9)
}

fn stacked_down(inputs: &TrendInputs) -> bool {
    inputs
        .emas()
        .is_some_and(|(e9, e21, e50)| e9 < e21 && e21 < e50 && inputs.price < e9)
}

fn weak_adx(inputs: &TrendInputs) -> bool {
    inputs.adx < 20.0
}

fn always(_: &TrendInputs) -> bool {
    true
}

fn trending_strength(adx: f64) -> f64 {
    (adx * 2.5).min(100.0)
}

fn ranging_strength(adx: f64) -> f64 {
    100.0 - adx * 2.0
}

fn base_strength(adx: f64) -> f64 {
    (adx * 2.0).min(100.0)
}

/// Trend cascade in priority order.
pub static TREND_RULES: [TrendRule; 4] = [
    TrendRule {
        name: "stacked_up",
        direction: TrendDirection::Uptrend,
        matches: stacked_up,
        strength: trending_strength,
    },
    TrendRule {
        name: "stacked_down",
        direction: TrendDirection::Downtrend,
        matches: stacked_down,
        strength: trending_strength,
    },
    TrendRule {
        name: "weak_adx",
        direction: TrendDirection::Sideways,
        matches: weak_adx,
        strength: ranging_strength,
    },
    TrendRule {
        name: "fallback",
        direction: TrendDirection::Sideways,
        matches: always,
        strength: base_strength,
    },
];

/// First rule matching the inputs. The last rule always matches.
pub fn matching_rule(inputs: &TrendInputs) -> &'static TrendRule {
    TREND_RULES
        .iter()
        .find(|rule| (rule.matches)(inputs))
        .unwrap_or(&TREND_RULES[TREND_RULES.len() - 1])
}

/// Classify the trend at the latest bar.
pub fn assess(inputs: &TrendInputs) -> TrendAssessment {
    let rule = matching_rule(inputs);
    let strength = (rule.strength)(inputs.adx).clamp(0.0, 100.0);

    TrendAssessment {
        direction: rule.direction,
        strength,
        adx: inputs.adx,
        description: describe(rule, inputs),
    }
}

fn describe(rule: &TrendRule, inputs: &TrendInputs) -> String {
    match rule.name {
        "stacked_up" => format!(
            "Uptrend: EMA9 > EMA21 > EMA50 with price above EMA9 (ADX {:.1})",
            inputs.adx
        ),
        "stacked_down" => format!(
            "Downtrend: EMA9 < EMA21 < EMA50 with price below EMA9 (ADX {:.1})",
            inputs.adx
        ),
        "weak_adx" => format!(
            "Sideways: ADX {:.1} below 20 shows no clear trend",
            inputs.adx
        ),
        _ => format!(
            "Sideways: moving averages are mixed (ADX {:.1})",
            inputs.adx
        ),
    }
}
