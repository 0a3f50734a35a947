//! Reference creator personas.
//!
//! Four fixed metric sets covering the interesting regions of the reward
//! formula. Used by the CLI demo and as regression anchors in tests.
//!
//! | Persona | Reward |
//! |---|---|
//! | Popular, high quality | ≈ 57.8% |
//! | Less popular, high quality | ≈ 41.5% |
//! | Less popular, low quality | ≈ 12.2% |
//! | Malicious | 0% (gate blocked) |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::MetricSet;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    PopularHighQuality,
    LessPopularHighQuality,
    LessPopularLowQuality,
    Malicious,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Self::PopularHighQuality,
        Self::LessPopularHighQuality,
        Self::LessPopularLowQuality,
        Self::Malicious,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PopularHighQuality => "Popular, high-quality",
            Self::LessPopularHighQuality => "Less-popular, high-quality",
            Self::LessPopularLowQuality => "Less-popular, low-quality",
            Self::Malicious => "Malicious actor",
        }
    }

    /// Short command-line name.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::PopularHighQuality => "popular-high-quality",
            Self::LessPopularHighQuality => "less-popular-high-quality",
            Self::LessPopularLowQuality => "less-popular-low-quality",
            Self::Malicious => "malicious",
        }
    }

    pub fn metrics(&self) -> MetricSet {
        match self {
            Self::PopularHighQuality => MetricSet {
                fraud_gate: 1.0,
                market_health: 1.10,
                category_weight: 1.20,
                content_quality: 0.9,
                interaction_quality: 0.9,
                immediate_engagement: 0.95,
                weekly_engagement: 0.90,
            },
            Self::LessPopularHighQuality => MetricSet {
                fraud_gate: 1.0,
                market_health: 1.05,
                category_weight: 1.00,
                content_quality: 0.8,
                interaction_quality: 0.8,
                immediate_engagement: 0.70,
                weekly_engagement: 0.75,
            },
            Self::LessPopularLowQuality => MetricSet {
                fraud_gate: 1.0,
                market_health: 1.00,
                category_weight: 0.90,
                content_quality: 0.3,
                interaction_quality: 0.3,
                immediate_engagement: 0.40,
                weekly_engagement: 0.50,
            },
            Self::Malicious => MetricSet {
                fraud_gate: 0.0,
                market_health: 1.00,
                category_weight: 1.00,
                content_quality: 0.1,
                interaction_quality: 0.1,
                immediate_engagement: 0.20,
                weekly_engagement: 0.20,
            },
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| format!("unknown persona: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::RewardCalculator;

    fn fraction(p: Persona) -> f64 {
        RewardCalculator::default().compute(&p.metrics()).reward_fraction
    }

    #[test]
    fn popular_high_quality() {
        // Dashboards once showed 66.6% here; the formula yields ≈57.8%.
        assert!((fraction(Persona::PopularHighQuality) - 0.578).abs() < 5e-4);
    }

    #[test]
    fn less_popular_high_quality() {
        assert!((fraction(Persona::LessPopularHighQuality) - 0.415).abs() < 5e-4);
    }

    #[test]
    fn less_popular_low_quality() {
        assert!((fraction(Persona::LessPopularLowQuality) - 0.122).abs() < 5e-4);
    }

    #[test]
    fn malicious_is_blocked() {
        let r = RewardCalculator::default().compute(&Persona::Malicious.metrics());
        assert!(r.gate_blocked);
        assert_eq!(r.reward_fraction, 0.0);
    }

    #[test]
    fn personas_are_ordered_by_reward() {
        let fractions: Vec<f64> = Persona::ALL.iter().map(|p| fraction(*p)).collect();
        for pair in fractions.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn slug_round_trip() {
        for p in Persona::ALL {
            assert_eq!(p.slug().parse::<Persona>().unwrap(), p);
        }
        assert!("celebrity".parse::<Persona>().is_err());
    }

    #[test]
    fn slug_matches_label_and_serde_name() {
        assert_eq!(
            "less-popular-low-quality".parse::<Persona>().unwrap(),
            Persona::LessPopularLowQuality
        );
        for p in Persona::ALL {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(json, format!("\"{}\"", p.slug()));
        }
        assert!(Persona::LessPopularHighQuality.label().starts_with("Less-popular"));
    }
}
