// Platforms and their industry-average engagement benchmarks.
//
// The benchmark table is the engine's only configuration surface. Quality
// tiers, insight thresholds and the readiness engagement factor are all
// measured relative to the platform's average rate.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Average rate used for any platform missing from a benchmark table.
pub const DEFAULT_INDUSTRY_AVERAGE: f64 = 2.5;

/// A supported social platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    #[serde(rename = "tiktok")]
    TikTok,
    #[serde(rename = "youtube")]
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::TikTok, Platform::YouTube];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
        }
    }

    /// Human-facing name for rendered documents.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            "youtube" => Ok(Platform::YouTube),
            other => anyhow::bail!("Unknown platform: {other} (expected instagram, tiktok or youtube)"),
        }
    }
}

/// Industry-average engagement rates (percent) per platform.
///
/// Lookups for a platform with no entry fall back to `default_average`
/// rather than failing.
#[derive(Debug, Clone, PartialEq)]
pub struct Benchmarks {
    averages: HashMap<Platform, f64>,
    /// Rate used for platforms not present in the table (default 2.5)
    pub default_average: f64,
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            averages: HashMap::from([
                (Platform::Instagram, 2.5),
                (Platform::TikTok, 5.3),
                (Platform::YouTube, 1.8),
            ]),
            default_average: DEFAULT_INDUSTRY_AVERAGE,
        }
    }
}

impl Benchmarks {
    /// An empty table where every platform resolves to `default_average`.
    pub fn empty(default_average: f64) -> Self {
        Self {
            averages: HashMap::new(),
            default_average,
        }
    }

    /// Replace (or add) one platform's average rate.
    pub fn with_average(mut self, platform: Platform, average: f64) -> Self {
        self.averages.insert(platform, average);
        self
    }

    /// The industry-average rate for `platform`, or the default when unmapped.
    pub fn industry_average(&self, platform: Platform) -> f64 {
        self.averages
            .get(&platform)
            .copied()
            .unwrap_or(self.default_average)
    }

    /// Start from the built-in table and apply `MEDIAKIT_BENCHMARK_<PLATFORM>`
    /// overrides from the environment.
    pub fn from_env() -> Result<Self> {
        let mut benchmarks = Self::default();
        for platform in Platform::ALL {
            let key = format!("MEDIAKIT_BENCHMARK_{}", platform.as_str().to_uppercase());
            if let Ok(raw) = std::env::var(&key) {
                let average = parse_average(&raw).with_context(|| format!("Invalid {key}"))?;
                benchmarks = benchmarks.with_average(platform, average);
            }
        }
        Ok(benchmarks)
    }
}

/// Parse a benchmark override. Averages divide rates, so they must be positive.
fn parse_average(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{raw}' is not a number"))?;
    if !value.is_finite() || value <= 0.0 {
        anyhow::bail!("benchmark average must be a positive number, got {value}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let b = Benchmarks::default();
        assert_eq!(b.industry_average(Platform::Instagram), 2.5);
        assert_eq!(b.industry_average(Platform::TikTok), 5.3);
        assert_eq!(b.industry_average(Platform::YouTube), 1.8);
    }

    #[test]
    fn test_unmapped_platform_uses_default() {
        let b = Benchmarks::empty(DEFAULT_INDUSTRY_AVERAGE).with_average(Platform::TikTok, 4.0);
        assert_eq!(b.industry_average(Platform::YouTube), 2.5);
        assert_eq!(b.industry_average(Platform::TikTok), 4.0);
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("Instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!(" tiktok ".parse::<Platform>().unwrap(), Platform::TikTok);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serde_is_lowercase() {
        let json = serde_json::to_string(&Platform::YouTube).unwrap();
        assert_eq!(json, "\"youtube\"");
        let back: Platform = serde_json::from_str("\"tiktok\"").unwrap();
        assert_eq!(back, Platform::TikTok);
    }

    #[test]
    fn test_parse_average_rejects_non_positive() {
        assert!(parse_average("0").is_err());
        assert!(parse_average("-1.5").is_err());
        assert!(parse_average("abc").is_err());
        assert_eq!(parse_average(" 3.1 ").unwrap(), 3.1);
    }
}
