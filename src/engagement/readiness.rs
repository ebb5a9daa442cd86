// Brand readiness score: weighted composite of four factors.
//
// score = engagement (max 40) + followers (max 30) + profile (max 20)
//       + platform bonus (10 or 8), clamped to 0-100.
//
// Sub-scores are reported truncated to integers; recommendation thresholds
// compare the unrounded values.

use serde::{Deserialize, Serialize};

use super::models::{ReadinessBreakdown, ReadinessScore};
use super::platform::{Benchmarks, Platform};
use super::validate::ValidationError;

/// Completeness assumed when no profile data is available.
pub const DEFAULT_PROFILE_COMPLETENESS: f64 = 0.8;

/// Configurable weights for the readiness formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadinessWeights {
    /// Cap for the engagement factor (default 40.0)
    pub engagement: f64,
    /// Scale for the profile factor (default 20.0)
    pub profile: f64,
    /// Bonus for Instagram and TikTok (default 10.0)
    pub preferred_platform_bonus: f64,
    /// Bonus for every other platform (default 8.0)
    pub other_platform_bonus: f64,
}

impl Default for ReadinessWeights {
    fn default() -> Self {
        Self {
            engagement: 40.0,
            profile: 20.0,
            preferred_platform_bonus: 10.0,
            other_platform_bonus: 8.0,
        }
    }
}

/// Fraction of the profile that is filled in, guaranteed to be within 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ProfileCompleteness(f64);

impl ProfileCompleteness {
    pub const FULL: ProfileCompleteness = ProfileCompleteness(1.0);

    /// Reject values outside 0.0-1.0 (and NaN) instead of clamping them.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::new(
                "profile_completeness",
                format!("must be between 0.0 and 1.0, got {value}"),
            ));
        }
        Ok(Self(value))
    }

    /// `present` of `total` fields filled in. An empty field set counts as complete.
    pub fn from_fields(present: usize, total: usize) -> Self {
        if total == 0 {
            return Self::FULL;
        }
        Self((present.min(total)) as f64 / total as f64)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for ProfileCompleteness {
    fn default() -> Self {
        Self(DEFAULT_PROFILE_COMPLETENESS)
    }
}

impl TryFrom<f64> for ProfileCompleteness {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProfileCompleteness> for f64 {
    fn from(c: ProfileCompleteness) -> f64 {
        c.0
    }
}

/// Step score for follower count: crossing 1k, 5k, 10k, 50k and 100k each
/// moves up a tier.
pub fn follower_score(followers: u64) -> f64 {
    match followers {
        f if f >= 100_000 => 30.0,
        f if f >= 50_000 => 25.0,
        f if f >= 10_000 => 20.0,
        f if f >= 5_000 => 15.0,
        f if f >= 1_000 => 10.0,
        _ => 5.0,
    }
}

/// Compute the readiness score.
///
/// The engagement factor is clamped to `0..=weights.engagement`; a NaN rate
/// counts as zero.
pub fn compute_readiness_score(
    engagement_rate: f64,
    followers: u64,
    platform: Platform,
    completeness: ProfileCompleteness,
    benchmarks: &Benchmarks,
    weights: &ReadinessWeights,
) -> ReadinessScore {
    let industry_average = benchmarks.industry_average(platform);
    let ratio = engagement_rate / industry_average;
    let engagement = if ratio.is_nan() {
        0.0
    } else {
        (ratio * weights.engagement).clamp(0.0, weights.engagement)
    };
    let followers_score = follower_score(followers);
    let profile = completeness.value() * weights.profile;
    let platform_bonus = match platform {
        Platform::Instagram | Platform::TikTok => weights.preferred_platform_bonus,
        Platform::YouTube => weights.other_platform_bonus,
    };

    let total = (engagement + followers_score + profile + platform_bonus).clamp(0.0, 100.0);

    let mut recommendations = Vec::new();
    if engagement < 20.0 {
        recommendations.push("Improve engagement rate by posting more interactive content".to_string());
    }
    if followers_score < 15.0 {
        recommendations.push("Grow your follower base through consistent, quality content".to_string());
    }
    if profile < 15.0 {
        recommendations
            .push("Complete your profile with bio, contact info, and profile picture".to_string());
    }

    ReadinessScore {
        score: total as u32,
        breakdown: ReadinessBreakdown {
            engagement: engagement as u32,
            followers: followers_score as u32,
            profile: profile as u32,
            platform: platform_bonus as u32,
        },
        recommendations,
    }
}
