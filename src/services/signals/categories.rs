//! Screener category cascade and entry/exit levels.

use crate::types::{Category, ScoringProfile};

/// Values the category rules look at. A rule reading a `None` value does
/// not match.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryInputs {
    pub price: f64,
    pub score: u8,
    pub rsi: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma50: Option<f64>,
    /// Latest volume over the 20-bar average volume.
    pub volume_ratio: Option<f64>,
    /// Percent change over the last five bars.
    pub price_change_5d: Option<f64>,
    /// Percent the price sits above its 52-week low.
    pub above_low_52w: Option<f64>,
}

/// One entry of the category cascade.
pub struct CategoryRule {
    pub category: Category,
    pub matches: fn(&CategoryInputs, ScoringProfile) -> bool,
}

fn momentum(inputs: &CategoryInputs, _: ScoringProfile) -> bool {
    match (inputs.volume_ratio, inputs.price_change_5d, inputs.rsi) {
        (Some(volume_ratio), Some(change), Some(rsi)) => {
            volume_ratio > 1.5 && change > 3.0 && rsi > 50.0 && rsi < 75.0
        }
        _ => false,
    }
}

fn value(inputs: &CategoryInputs, profile: ScoringProfile) -> bool {
    let (Some(rsi), Some(sma50)) = (inputs.rsi, inputs.sma50) else {
        return false;
    };
    let near_low = !profile.value_requires_near_low()
        || inputs.above_low_52w.is_some_and(|pct| pct < 20.0);

    rsi < 35.0 && inputs.price < sma50 && near_low
}

fn daily(inputs: &CategoryInputs, profile: ScoringProfile) -> bool {
    let (Some(histogram), Some(sma50)) = (inputs.macd_histogram, inputs.sma50) else {
        return false;
    };
    inputs.score >= profile.daily_min_score() && histogram > 0.0 && inputs.price > sma50
}

fn watchout(inputs: &CategoryInputs, profile: ScoringProfile) -> bool {
    inputs.rsi.is_some_and(|rsi| rsi > 70.0) || inputs.score < profile.watchout_max_score()
}

fn neutral(_: &CategoryInputs, _: ScoringProfile) -> bool {
    true
}

/// Category cascade in priority order; the first matching rule wins.
pub static CATEGORY_RULES: [CategoryRule; 5] = [
    CategoryRule {
        category: Category::Momentum,
        matches: momentum,
    },
    CategoryRule {
        category: Category::Value,
        matches: value,
    },
    CategoryRule {
        category: Category::Daily,
        matches: daily,
    },
    CategoryRule {
        category: Category::Watchout,
        matches: watchout,
    },
    CategoryRule {
        category: Category::Neutral,
        matches: neutral,
    },
];

/// Classify a symbol. Falling through to neutral is a normal outcome.
pub fn classify(inputs: &CategoryInputs, profile: ScoringProfile) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.matches)(inputs, profile))
        .map(|rule| rule.category)
        .unwrap_or(Category::Neutral)
}

/// Whether a single rule matches, regardless of its position in the cascade.
pub fn rule_matches(category: Category, inputs: &CategoryInputs, profile: ScoringProfile) -> bool {
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.category == category)
        .is_some_and(|rule| (rule.matches)(inputs, profile))
}

/// Suggested entry and exit prices.
///
/// Above SMA50 the plan is to buy a pullback to the average and sell just
/// under the 52-week high; below it, buy just above the 52-week low and sell
/// at the average.
pub fn entry_exit(
    price: f64,
    sma50: Option<f64>,
    high_52w: f64,
    low_52w: f64,
) -> (Option<f64>, Option<f64>) {
    let Some(sma50) = sma50 else {
        return (None, None);
    };

    if price > sma50 {
        (Some(sma50), Some(high_52w * 0.95))
    } else {
        (Some(low_52w * 1.05), Some(sma50))
    }
}
