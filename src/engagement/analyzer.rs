// Engagement analyzer: turns raw post metrics into an AnalysisResult.
//
// Pipeline for one request:
// 1. Sum likes and comments, compute per-post averages
// 2. Engagement rate = (avg likes + avg comments) / followers * 100
// 3. Classify quality against the platform benchmark
// 4. Pick the best post by per-post rate
// 5. Run the insight cascade and keep the first three
//
// The rate used for quality and insights is the unrounded one; rounding to
// two decimals only happens on the returned value.

use tracing::debug;

use super::insights::{self, InsightContext};
use super::models::{AnalysisRequest, AnalysisResult, EngagementQuality, Post, ReadinessScore};
use super::platform::{Benchmarks, Platform};
use super::readiness::{self, ProfileCompleteness, ReadinessWeights};

/// Stateless analyzer bound to a benchmark table.
#[derive(Debug, Clone, Default)]
pub struct EngagementAnalyzer {
    benchmarks: Benchmarks,
}

impl EngagementAnalyzer {
    pub fn new(benchmarks: Benchmarks) -> Self {
        Self { benchmarks }
    }

    pub fn benchmarks(&self) -> &Benchmarks {
        &self.benchmarks
    }

    /// Analyze a request. Bounds are assumed to be validated by the caller;
    /// zero followers and an empty post list still produce a defined result.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let post_count = request.posts.len();
        let total_likes = saturating_total(request.posts.iter().map(|p| p.likes));
        let total_comments = saturating_total(request.posts.iter().map(|p| p.comments));

        let (avg_likes, avg_comments) = if post_count == 0 {
            (0.0, 0.0)
        } else {
            (
                total_likes as f64 / post_count as f64,
                total_comments as f64 / post_count as f64,
            )
        };

        let rate = engagement_rate(avg_likes + avg_comments, request.followers);
        let industry_average = self.benchmarks.industry_average(request.platform);
        let quality = EngagementQuality::classify(rate, industry_average);
        let best_post = find_best_post(&request.posts, request.followers);

        let insights = insights::generate(&InsightContext {
            platform: request.platform,
            rate,
            industry_average,
            avg_likes,
            avg_comments,
            followers: request.followers,
            posts: &request.posts,
        });

        debug!(
            handle = %request.handle,
            platform = %request.platform,
            posts = post_count,
            rate = format!("{:.4}", rate),
            quality = quality.as_str(),
            "Analyzed engagement"
        );

        AnalysisResult {
            engagement_rate: round2(rate),
            avg_likes: avg_likes as u64,
            avg_comments: avg_comments as u64,
            total_engagement: total_likes.saturating_add(total_comments),
            engagement_quality: quality,
            insights,
            best_post: best_post.cloned(),
        }
    }

    /// Brand readiness against this analyzer's benchmark table, with default weights.
    pub fn score_readiness(
        &self,
        engagement_rate: f64,
        followers: u64,
        platform: Platform,
        completeness: ProfileCompleteness,
    ) -> ReadinessScore {
        readiness::compute_readiness_score(
            engagement_rate,
            followers,
            platform,
            completeness,
            &self.benchmarks,
            &ReadinessWeights::default(),
        )
    }
}

/// Engagement as a percentage of followers. Zero followers yields 0.0.
pub fn engagement_rate(engagement: f64, followers: u64) -> f64 {
    if followers == 0 {
        return 0.0;
    }
    (engagement / followers as f64) * 100.0
}

/// The post with the strictly highest per-post rate.
///
/// Starts from the first post and only replaces it on a strictly greater
/// rate, so ties keep the earliest post. `None` only for an empty slice.
pub fn find_best_post(posts: &[Post], followers: u64) -> Option<&Post> {
    let mut iter = posts.iter();
    let mut best = iter.next()?;
    let mut best_rate = engagement_rate(best.engagement() as f64, followers);

    for post in iter {
        let rate = engagement_rate(post.engagement() as f64, followers);
        if rate > best_rate {
            best = post;
            best_rate = rate;
        }
    }

    Some(best)
}

fn saturating_total(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// Round to two decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
