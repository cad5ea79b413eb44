use serde::{Deserialize, Serialize};

/// Call site a classification runs for.
///
/// The screener and the daily-picks board share one rule cascade but use
/// slightly different cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringProfile {
    #[default]
    Screener,
    DailyPicks,
}

impl ScoringProfile {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "screener" | "scan" => Some(Self::Screener),
            "daily_picks" | "daily-picks" | "daily" | "picks" => Some(Self::DailyPicks),
            _ => None,
        }
    }

    /// Minimum score for the daily category.
    pub fn daily_min_score(&self) -> u8 {
        match self {
            Self::Screener => 65,
            Self::DailyPicks => 70,
        }
    }

    /// Scores below this land in the watchout category.
    pub fn watchout_max_score(&self) -> u8 {
        match self {
            Self::Screener => 35,
            Self::DailyPicks => 30,
        }
    }

    /// Whether the value category also requires proximity to the 52-week low.
    pub fn value_requires_near_low(&self) -> bool {
        matches!(self, Self::DailyPicks)
    }
}

/// Trend direction from the EMA triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Uptrend,
    Downtrend,
    Sideways,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Uptrend => "UPTREND",
            TrendDirection::Downtrend => "DOWNTREND",
            TrendDirection::Sideways => "SIDEWAYS",
        }
    }

    /// Slope multiplier applied by the price projection.
    pub fn projection_multiplier(&self) -> f64 {
        match self {
            TrendDirection::Uptrend => 1.2,
            TrendDirection::Downtrend => 0.8,
            TrendDirection::Sideways => 1.0,
        }
    }
}

/// Trend classification with strength score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAssessment {
    pub direction: TrendDirection,
    /// Strength from 0 to 100.
    pub strength: f64,
    /// ADX value the assessment used (after the degenerate-input fallback).
    pub adx: f64,
    pub description: String,
}

/// Support and resistance levels around the current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSet {
    /// Up to three levels below price, closest first.
    pub support: Vec<f64>,
    /// Up to three levels above price, closest first.
    pub resistance: Vec<f64>,
    pub pivot: f64,
}

/// Projected price range for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Horizon in days.
    pub horizon: u32,
    pub expected: f64,
    pub min: f64,
    pub max: f64,
    /// Confidence percentage; shrinks as the horizon grows.
    pub confidence: f64,
}

/// Latest MACD values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSnapshot {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Rating bucket derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Rating {
    /// Bucket a 0-100 score, highest cutoff first.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => Rating::StrongBuy,
            s if s >= 60 => Rating::Buy,
            s if s >= 40 => Rating::Hold,
            s if s >= 20 => Rating::Sell,
            _ => Rating::StrongSell,
        }
    }

    /// Get display label for this rating.
    pub fn label(&self) -> &'static str {
        match self {
            Rating::StrongBuy => "Strong Buy",
            Rating::Buy => "Buy",
            Rating::Hold => "Hold",
            Rating::Sell => "Sell",
            Rating::StrongSell => "Strong Sell",
        }
    }

    /// CSS class the dashboard styles the badge with.
    pub fn css_class(&self) -> &'static str {
        match self {
            Rating::StrongBuy => "strong-buy",
            Rating::Buy => "buy",
            Rating::Hold => "hold",
            Rating::Sell => "sell",
            Rating::StrongSell => "strong-sell",
        }
    }
}

/// Screener category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Momentum,
    Value,
    Daily,
    Watchout,
    Neutral,
}

impl Category {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "momentum" => Some(Self::Momentum),
            "value" => Some(Self::Value),
            "daily" | "strong_buy" | "strong-buy" => Some(Self::Daily),
            "watchout" | "watch_out" => Some(Self::Watchout),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Momentum => "momentum",
            Category::Value => "value",
            Category::Daily => "daily",
            Category::Watchout => "watchout",
            Category::Neutral => "neutral",
        }
    }

    /// Holding horizon suggested for this category.
    pub fn horizon(&self) -> Horizon {
        match self {
            Category::Momentum | Category::Daily | Category::Watchout => Horizon::ShortTerm,
            Category::Value => Horizon::LongTerm,
            Category::Neutral => Horizon::MediumTerm,
        }
    }
}

/// Suggested holding horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl Horizon {
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::ShortTerm => "1-2 weeks",
            Horizon::MediumTerm => "1-3 months",
            Horizon::LongTerm => "3-6 months",
        }
    }

    pub fn thai_label(&self) -> &'static str {
        match self {
            Horizon::ShortTerm => "ระยะสั้น",
            Horizon::MediumTerm => "ระยะกลาง",
            Horizon::LongTerm => "ระยะยาว",
        }
    }
}

/// Risk bucket shown next to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}
