// Colored terminal output for analyses and readiness scores.
//
// main.rs display paths delegate here so formatting stays in one place.

use colored::Colorize;

use crate::db::models::EngagementAnalysisRecord;
use crate::engagement::models::{AnalysisRequest, AnalysisResult, EngagementQuality, Post, ReadinessScore};
use crate::render::format_number;

/// Display a fresh analysis for a request.
pub fn display_analysis(request: &AnalysisRequest, result: &AnalysisResult) {
    println!(
        "\n{}",
        format!(
            "=== Engagement for @{} ({}) ===",
            request.handle.trim_start_matches('@'),
            request.platform.display_name()
        )
        .bold()
    );
    println!(
        "  Followers: {}  |  Posts analyzed: {}",
        format_number(request.followers),
        request.posts.len()
    );
    display_metrics(
        result.engagement_rate,
        result.avg_likes,
        result.avg_comments,
        result.total_engagement,
        result.engagement_quality,
    );
    if let Some(best) = &result.best_post {
        display_best_post(best);
    }
    display_insights(&result.insights);
}

/// Display a stored analysis record.
pub fn display_record(record: &EngagementAnalysisRecord) {
    println!(
        "\n{}",
        format!("=== Analysis {} ===", record.id).bold()
    );
    println!(
        "  Created: {}  |  Posts analyzed: {}",
        record.created_at.format("%Y-%m-%d %H:%M UTC"),
        record.post_data.len()
    );
    display_metrics(
        record.engagement_rate,
        record.avg_likes,
        record.avg_comments,
        record.total_engagement,
        record.quality,
    );
    if let Some(best) = &record.best_post {
        display_best_post(best);
    }
    display_insights(&record.insights);
}

/// Display a brand readiness score with its breakdown.
pub fn display_readiness(score: &ReadinessScore) {
    println!("\n{}", "=== Brand Readiness ===".bold());
    println!("  Score: {}", colorize_score(score.score));
    println!(
        "  Engagement {:>2}/40  Followers {:>2}/30  Profile {:>2}/20  Platform {:>2}/10",
        score.breakdown.engagement,
        score.breakdown.followers,
        score.breakdown.profile,
        score.breakdown.platform,
    );

    if !score.recommendations.is_empty() {
        println!("\n  Recommendations:");
        for rec in &score.recommendations {
            println!("    {} {}", "→".yellow(), rec);
        }
    }
}

fn display_metrics(rate: f64, avg_likes: u64, avg_comments: u64, total: u64, quality: EngagementQuality) {
    println!(
        "  Engagement rate: {:.2}%  Quality: {}",
        rate,
        colorize_quality(quality)
    );
    println!(
        "  Avg likes: {}  Avg comments: {}  Total engagement: {}",
        format_number(avg_likes),
        format_number(avg_comments),
        format_number(total)
    );
}

fn display_best_post(post: &Post) {
    let caption = post
        .caption
        .as_deref()
        .map(|c| super::truncate_chars(c, 80))
        .unwrap_or_else(|| "(no caption)".to_string());
    println!(
        "\n  Best post ({}): {} likes, {} comments  {}",
        post.post_date.format("%Y-%m-%d"),
        post.likes,
        post.comments,
        caption.dimmed()
    );
}

fn display_insights(insights: &[String]) {
    if insights.is_empty() {
        return;
    }
    println!("\n  Insights:");
    for (i, insight) in insights.iter().enumerate() {
        println!("    {}. {}", i + 1, insight);
    }
}

/// Colorize a quality tier.
fn colorize_quality(quality: EngagementQuality) -> colored::ColoredString {
    let label = quality.as_str();
    match quality {
        EngagementQuality::Excellent => label.green().bold(),
        EngagementQuality::Good => label.bright_green(),
        EngagementQuality::Average => label.yellow(),
        EngagementQuality::Poor => label.red(),
    }
}

fn colorize_score(score: u32) -> colored::ColoredString {
    let text = format!("{score}/100");
    match score {
        s if s >= 75 => text.green().bold(),
        s if s >= 50 => text.yellow(),
        _ => text.red(),
    }
}
