// Insight generation: a fixed-order cascade of rules.
//
// Each rule looks at the same InsightContext and contributes at most one
// sentence. Rules always run in RULES order and the list is only cut to
// MAX_INSIGHTS at the very end, so later rules (consistency, platform tips)
// only surface when earlier ones stay silent.

use super::models::Post;
use super::platform::Platform;

/// Maximum number of insights returned per analysis.
pub const MAX_INSIGHTS: usize = 3;

/// Minimum posts before the consistency rule has anything to say.
const CONSISTENCY_MIN_POSTS: usize = 3;

/// Consistency score (1 - coefficient of variation) above which engagement
/// counts as consistent.
const CONSISTENCY_THRESHOLD: f64 = 0.7;

/// Inputs shared by every insight rule. Averages and rate are unrounded.
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub platform: Platform,
    pub rate: f64,
    pub industry_average: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub followers: u64,
    pub posts: &'a [Post],
}

type InsightRule = fn(&InsightContext<'_>) -> Option<String>;

/// Rule order is part of the output contract.
const RULES: [InsightRule; 5] = [
    rate_vs_benchmark,
    comment_ratio,
    audience_size,
    consistency,
    platform_tip,
];

/// Run every rule in order and keep the first `MAX_INSIGHTS` results.
pub fn generate(ctx: &InsightContext<'_>) -> Vec<String> {
    let mut insights: Vec<String> = RULES.iter().filter_map(|rule| rule(ctx)).collect();
    insights.truncate(MAX_INSIGHTS);
    insights
}

fn rate_vs_benchmark(ctx: &InsightContext<'_>) -> Option<String> {
    let avg = ctx.industry_average;
    let insight = if ctx.rate > avg * 1.5 {
        let multiplier = ctx.rate / avg;
        format!("Your engagement rate is {multiplier:.1}x above industry average")
    } else if ctx.rate > avg {
        "Your engagement rate is above industry average".to_string()
    } else {
        "Focus on creating more engaging content to improve your rate".to_string()
    };
    Some(insight)
}

fn comment_ratio(ctx: &InsightContext<'_>) -> Option<String> {
    let engagement = ctx.avg_likes + ctx.avg_comments;
    if engagement <= 0.0 {
        return None;
    }

    let share = ctx.avg_comments / engagement;
    let insight = if share > 0.15 {
        "Excellent comment engagement shows strong audience connection"
    } else if share > 0.08 {
        "Good balance of likes and comments indicates engaged audience"
    } else {
        "Consider asking questions to encourage more comments"
    };
    Some(insight.to_string())
}

fn audience_size(ctx: &InsightContext<'_>) -> Option<String> {
    let insight = match ctx.followers {
        f if f > 100_000 => "Large audience with strong reach potential for brand partnerships",
        f if f > 10_000 => "Growing audience size is attractive to mid-tier brand collaborations",
        _ => "Focus on consistent posting and engagement to grow your audience",
    };
    Some(insight.to_string())
}

fn consistency(ctx: &InsightContext<'_>) -> Option<String> {
    if ctx.posts.len() < CONSISTENCY_MIN_POSTS {
        return None;
    }

    let values: Vec<f64> = ctx.posts.iter().map(|p| p.engagement() as f64).collect();
    let score = consistency_score(&values)?;

    let insight = if score > CONSISTENCY_THRESHOLD {
        "Consistent engagement across posts shows reliable audience interest"
    } else {
        "Engagement varies significantly - analyze your top posts for patterns"
    };
    Some(insight.to_string())
}

fn platform_tip(ctx: &InsightContext<'_>) -> Option<String> {
    let tip = match ctx.platform {
        Platform::Instagram if ctx.avg_likes > ctx.avg_comments * 20.0 => {
            "Consider using Instagram Stories and Reels to boost engagement"
        }
        Platform::TikTok if ctx.rate < 3.0 => {
            "TikTok thrives on trending content - try incorporating popular sounds and hashtags"
        }
        Platform::YouTube if ctx.avg_comments < ctx.avg_likes * 0.02 => {
            "Encourage viewers to comment by asking questions in your videos"
        }
        _ => return None,
    };
    Some(tip.to_string())
}

/// `1 - (sample stdev / mean)` over per-post engagement.
///
/// Returns `None` with fewer than two values or a zero mean, where the
/// coefficient of variation is undefined.
pub fn consistency_score(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(1.0 - variance.sqrt() / mean)
}
