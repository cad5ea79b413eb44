//! Assembles the per-symbol summary from the indicator engine.

use super::categories::{self, CategoryInputs};
use super::indicators::{IndicatorSet, IndicatorSnapshot};
use super::levels;
use super::math::{mean, percent_change};
use super::predictions::{self, ProjectionInputs};
use super::scoring::{self, ScoreBreakdown, ScoreInputs};
use super::trend::{self, TrendInputs};
use crate::types::{
    Category, LevelSet, MarketSnapshot, OverlaySeries, Prediction, RiskLevel, ScoringProfile,
    StockAnalysis, TrendAssessment,
};

/// Bars in the long volume average.
pub const VOLUME_LONG_WINDOW: usize = 20;
/// Bars in the short volume average.
pub const VOLUME_SHORT_WINDOW: usize = 5;

/// Volume ratio and volume trend from the trailing bars.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeMetrics {
    /// Latest volume over the 20-bar average.
    pub ratio: Option<f64>,
    /// 5-bar average over the 20-bar average.
    pub trend: Option<f64>,
}

impl VolumeMetrics {
    pub fn from_volumes(volumes: &[f64]) -> Self {
        if volumes.len() < VOLUME_LONG_WINDOW {
            return Self::default();
        }
        let long = &volumes[volumes.len() - VOLUME_LONG_WINDOW..];
        let short = &volumes[volumes.len() - VOLUME_SHORT_WINDOW..];

        let Some(long_avg) = mean(long).filter(|avg| *avg > 0.0) else {
            return Self::default();
        };

        Self {
            ratio: volumes.last().map(|v| v / long_avg),
            trend: mean(short).map(|avg| avg / long_avg),
        }
    }
}

/// Everything derived from one market snapshot.
///
/// Indicators are computed once on construction; the accessors reuse them.
pub struct Analysis<'a> {
    market: &'a MarketSnapshot,
    indicators: IndicatorSet,
    latest: IndicatorSnapshot,
    trend: TrendAssessment,
}

impl<'a> Analysis<'a> {
    pub fn new(market: &'a MarketSnapshot) -> Self {
        let indicators = IndicatorSet::compute(&market.series);
        let latest = indicators.snapshot();
        let trend = trend::assess(&TrendInputs::from_snapshot(&latest, market.quote.price));

        Self {
            market,
            indicators,
            latest,
            trend,
        }
    }

    pub fn price(&self) -> f64 {
        self.market.quote.price
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    pub fn latest(&self) -> &IndicatorSnapshot {
        &self.latest
    }

    pub fn trend(&self) -> &TrendAssessment {
        &self.trend
    }

    pub fn levels(&self) -> Option<LevelSet> {
        levels::detect(&self.market.series.bars, self.price())
    }

    pub fn predictions(&self) -> Vec<Prediction> {
        ProjectionInputs::from_closes(
            &self.market.series.closes(),
            self.price(),
            self.latest.atr,
            self.trend.direction,
        )
        .map(|inputs| predictions::project_all(&inputs))
        .unwrap_or_default()
    }

    pub fn overlay(&self) -> OverlaySeries {
        self.indicators.overlay(&self.market.series.symbol)
    }

    pub fn volume(&self) -> VolumeMetrics {
        VolumeMetrics::from_volumes(&self.market.series.volumes())
    }

    pub fn score(&self) -> ScoreBreakdown {
        self.score_with(&self.volume())
    }

    fn score_with(&self, volume: &VolumeMetrics) -> ScoreBreakdown {
        scoring::score(&ScoreInputs {
            price: self.price(),
            rsi: self.latest.rsi,
            macd_histogram: self.macd_histogram(),
            sma50: self.latest.sma50,
            sma200: self.latest.sma200,
            volume_trend: volume.trend,
        })
    }

    fn macd_histogram(&self) -> Option<f64> {
        self.latest.macd.map(|m| m.histogram)
    }

    /// Percent the price sits below the 52-week high.
    fn near_high_52w(&self) -> Option<f64> {
        let high = self.market.quote.high_52w;
        (high > 0.0).then(|| (high - self.price()) / high * 100.0)
    }

    /// Percent the price sits above the 52-week low.
    fn above_low_52w(&self) -> Option<f64> {
        let low = self.market.quote.low_52w;
        (low > 0.0).then(|| (self.price() - low) / low * 100.0)
    }

    fn risk_level(&self, category: Category) -> RiskLevel {
        if category == Category::Watchout {
            return RiskLevel::High;
        }
        let Some(atr) = self.latest.atr.filter(|_| self.price() > 0.0) else {
            return RiskLevel::Medium;
        };
        let atr_pct = atr / self.price() * 100.0;
        if atr_pct > 4.0 {
            RiskLevel::High
        } else if atr_pct > 2.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Flat summary for the dashboard.
    pub fn summary(&self, profile: ScoringProfile) -> StockAnalysis {
        let quote = &self.market.quote;
        let closes = self.market.series.closes();
        let volume = self.volume();
        let breakdown = self.score_with(&volume);
        let price_change_5d = percent_change(&closes, 5);
        let rating = breakdown.rating();

        let category = categories::classify(
            &CategoryInputs {
                price: quote.price,
                score: breakdown.score,
                rsi: self.latest.rsi,
                macd_histogram: self.macd_histogram(),
                sma50: self.latest.sma50,
                volume_ratio: volume.ratio,
                price_change_5d,
                above_low_52w: self.above_low_52w(),
            },
            profile,
        );
        let (entry_point, exit_point) =
            categories::entry_exit(quote.price, self.latest.sma50, quote.high_52w, quote.low_52w);
        let horizon = category.horizon();

        StockAnalysis {
            symbol: quote.symbol.to_uppercase(),
            price: quote.price,
            change_pct: quote.change_pct(),
            rsi: self.latest.rsi,
            macd_histogram: self.macd_histogram(),
            sma50: self.latest.sma50,
            sma200: self.latest.sma200,
            price_change_5d,
            price_change_20d: percent_change(&closes, 20),
            near_high_52w: self.near_high_52w(),
            volume_ratio: volume.ratio,
            ai_score: breakdown.score,
            rating: rating.label().to_string(),
            rating_class: rating.css_class().to_string(),
            rating_bucket: rating,
            category,
            horizon: horizon.label().to_string(),
            horizon_thai: horizon.thai_label().to_string(),
            horizon_bucket: horizon,
            recommendation: recommendation_text(category).to_string(),
            analysis: self.bullets(volume),
            entry_point,
            exit_point,
            risk_level: self.risk_level(category),
            trend: self.trend.clone(),
            levels: self.levels(),
            predictions: self.predictions(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    fn bullets(&self, volume: VolumeMetrics) -> Vec<String> {
        let price = self.price();
        let mut bullets = vec![self.trend.description.clone()];

        if let Some(rsi) = self.latest.rsi {
            let zone = if rsi < 30.0 {
                "oversold"
            } else if rsi > 70.0 {
                "overbought"
            } else {
                "neutral"
            };
            bullets.push(format!("RSI {:.1} is {}", rsi, zone));
        }

        if let Some(histogram) = self.macd_histogram() {
            let bias = if histogram > 0.0 { "bullish" } else { "bearish" };
            bullets.push(format!("MACD histogram {:.3} shows {} momentum", histogram, bias));
        }

        for (label, average) in [("50-day", self.latest.sma50), ("200-day", self.latest.sma200)] {
            if let Some(average) = average {
                let side = if price > average {
                    "above"
                } else if price < average {
                    "below"
                } else {
                    "at"
                };
                bullets.push(format!(
                    "Price is {} the {} average ({:.2})",
                    side, label, average
                ));
            }
        }

        if let Some(ratio) = volume.ratio {
            bullets.push(format!("Volume is {:.1}x the 20-day average", ratio));
        }

        if let Some(pct) = self.near_high_52w() {
            bullets.push(format!("Price is {:.1}% below the 52-week high", pct));
        }

        bullets
    }
}

/// Headline recommendation for a category.
pub fn recommendation_text(category: Category) -> &'static str {
    match category {
        Category::Momentum => {
            "Strong momentum on rising volume; ride the trend with a trailing stop"
        }
        Category::Value => {
            "Oversold below the 50-day average; a value entry for patient buyers"
        }
        Category::Daily => {
            "Bullish setup with positive MACD momentum above the 50-day average"
        }
        Category::Watchout => "Overbought or weak technicals; wait for a better entry",
        Category::Neutral => "No clear signal; keep on the watchlist",
    }
}
