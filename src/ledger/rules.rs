use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Tolerance used when checking that rule percentages add up to 100.
pub const PERCENT_SUM_TOLERANCE: f64 = 0.01;

/// Target split of net worth across the four allocation buckets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RulePercentages {
    pub growth: f64,
    pub stability: f64,
    pub essentials: f64,
    pub rewards: f64,
}

impl Default for RulePercentages {
    fn default() -> Self {
        Self {
            growth: 25.0,
            stability: 15.0,
            essentials: 50.0,
            rewards: 10.0,
        }
    }
}

impl RulePercentages {
    pub fn new(growth: f64, stability: f64, essentials: f64, rewards: f64) -> Self {
        Self {
            growth,
            stability,
            essentials,
            rewards,
        }
    }

    pub fn sum(&self) -> f64 {
        self.growth + self.stability + self.essentials + self.rewards
    }

    /// Combined weight of the buckets that split the cash balance.
    pub fn non_growth_sum(&self) -> f64 {
        self.stability + self.essentials + self.rewards
    }

    pub fn totals_hundred(&self) -> bool {
        (self.sum() - 100.0).abs() <= PERCENT_SUM_TOLERANCE
    }

    pub fn weight(&self, bucket: Bucket) -> f64 {
        match bucket {
            Bucket::Growth => self.growth,
            Bucket::Stability => self.stability,
            Bucket::Essentials => self.essentials,
            Bucket::Rewards => self.rewards,
        }
    }
}

impl fmt::Display for RulePercentages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.growth, self.stability, self.essentials, self.rewards
        )
    }
}

/// One of the four allocation buckets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Bucket {
    Growth,
    Stability,
    Essentials,
    Rewards,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Growth,
        Bucket::Stability,
        Bucket::Essentials,
        Bucket::Rewards,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Growth => "Growth",
            Bucket::Stability => "Stability",
            Bucket::Essentials => "Essentials",
            Bucket::Rewards => "Rewards",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Informational tag attached to a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RuleTag {
    #[default]
    #[serde(rename = "-", alias = "None")]
    None,
    Growth,
    Stability,
    Essentials,
    Rewards,
}

impl RuleTag {
    pub fn bucket(self) -> Option<Bucket> {
        match self {
            RuleTag::None => None,
            RuleTag::Growth => Some(Bucket::Growth),
            RuleTag::Stability => Some(Bucket::Stability),
            RuleTag::Essentials => Some(Bucket::Essentials),
            RuleTag::Rewards => Some(Bucket::Rewards),
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bucket() {
            Some(bucket) => f.write_str(bucket.label()),
            None => f.write_str("-"),
        }
    }
}

impl FromStr for RuleTag {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "-" | "none" => Ok(RuleTag::None),
            "growth" => Ok(RuleTag::Growth),
            "stability" => Ok(RuleTag::Stability),
            "essentials" => Ok(RuleTag::Essentials),
            "rewards" => Ok(RuleTag::Rewards),
            other => Err(format!("unknown rule category `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_percentages_total_hundred() {
        let rules = RulePercentages::default();
        assert!(rules.totals_hundred());
        assert_eq!(rules.non_growth_sum(), 75.0);
    }

    #[test]
    fn rule_tag_parses_case_insensitively() {
        assert_eq!("essentials".parse::<RuleTag>().unwrap(), RuleTag::Essentials);
        assert_eq!("-".parse::<RuleTag>().unwrap(), RuleTag::None);
        assert!("savings".parse::<RuleTag>().is_err());
    }

    #[test]
    fn rule_tag_serializes_none_as_dash() {
        let json = serde_json::to_string(&RuleTag::None).unwrap();
        assert_eq!(json, "\"-\"");
        let parsed: RuleTag = serde_json::from_str("\"None\"").unwrap();
        assert_eq!(parsed, RuleTag::None);
    }
}
