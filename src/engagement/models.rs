// Engagement data models: the inputs and outputs of the analysis engine.
//
// These types are serialized straight into API responses and storage
// records, so field names match the JSON wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::platform::Platform;

/// One published post and its raw interaction counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub likes: u64,
    pub comments: u64,
    pub post_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Post {
    /// Likes plus comments for this post, saturating at `u64::MAX`.
    pub fn engagement(&self) -> u64 {
        self.likes.saturating_add(self.comments)
    }
}

/// Everything the analyzer needs for one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub platform: Platform,
    pub handle: String,
    pub followers: u64,
    pub posts: Vec<Post>,
}

/// Engagement quality relative to the platform benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementQuality {
    Poor,
    Average,
    Good,
    Excellent,
}

impl EngagementQuality {
    /// Classify a rate against the platform's industry average.
    ///
    /// Boundaries are inclusive and checked from the top down, so a rate
    /// sitting exactly on a boundary gets the higher tier.
    pub fn classify(rate: f64, industry_average: f64) -> Self {
        match rate {
            r if r >= industry_average * 2.0 => EngagementQuality::Excellent,
            r if r >= industry_average * 1.2 => EngagementQuality::Good,
            r if r >= industry_average * 0.8 => EngagementQuality::Average,
            _ => EngagementQuality::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementQuality::Poor => "poor",
            EngagementQuality::Average => "average",
            EngagementQuality::Good => "good",
            EngagementQuality::Excellent => "excellent",
        }
    }
}

impl std::fmt::Display for EngagementQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EngagementQuality {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "poor" => Ok(EngagementQuality::Poor),
            "average" => Ok(EngagementQuality::Average),
            "good" => Ok(EngagementQuality::Good),
            "excellent" => Ok(EngagementQuality::Excellent),
            other => anyhow::bail!("Unknown engagement quality: {other}"),
        }
    }
}

/// Output of one analyzer call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Percentage, rounded to two decimals
    pub engagement_rate: f64,
    /// Truncated mean likes per post
    pub avg_likes: u64,
    /// Truncated mean comments per post
    pub avg_comments: u64,
    /// Sum of likes and comments across every post
    pub total_engagement: u64,
    pub engagement_quality: EngagementQuality,
    /// At most three insights, in rule order
    pub insights: Vec<String>,
    pub best_post: Option<Post>,
}

/// Weight-scaled sub-scores making up a readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessBreakdown {
    pub engagement: u32,
    pub followers: u32,
    pub profile: u32,
    pub platform: u32,
}

/// Composite 0-100 brand readiness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub score: u32,
    pub breakdown: ReadinessBreakdown,
    pub recommendations: Vec<String>,
}
