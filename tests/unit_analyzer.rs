// Unit tests for the engagement analyzer and insight cascade.
//
// Properties that must hold for any input: zero followers, bounded
// averages, exact totals, monotonic quality tiers and the insight cap.

use chrono::{Duration, TimeZone, Utc};
use mediakit::engagement::insights::{consistency_score, MAX_INSIGHTS};
use mediakit::engagement::models::{AnalysisRequest, EngagementQuality, Post};
use mediakit::engagement::validate::{validate_request, MAX_COUNT};
use mediakit::engagement::{Benchmarks, EngagementAnalyzer, Platform};

fn post(likes: u64, comments: u64) -> Post {
    Post {
        likes,
        comments,
        post_date: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        image_url: None,
        caption: None,
    }
}

fn request(platform: Platform, followers: u64, posts: Vec<Post>) -> AnalysisRequest {
    AnalysisRequest {
        platform,
        handle: "creator".to_string(),
        followers,
        posts,
    }
}

/// Small deterministic generator so property checks cover many shapes.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

fn random_requests(count: usize) -> Vec<AnalysisRequest> {
    let mut rng = Lcg(42);
    (0..count)
        .map(|i| {
            let platform = Platform::ALL[i % Platform::ALL.len()];
            let followers = rng.next(2_000_000);
            let n = 1 + rng.next(10) as usize;
            let posts = (0..n)
                .map(|_| post(rng.next(100_000), rng.next(5_000)))
                .collect();
            request(platform, followers, posts)
        })
        .collect()
}

// ============================================================
// Degenerate inputs
// ============================================================

#[test]
fn zero_followers_gives_zero_rate_and_poor_quality() {
    let analyzer = EngagementAnalyzer::default();
    for platform in Platform::ALL {
        let result = analyzer.analyze(&request(platform, 0, vec![post(1_000, 100), post(5, 1)]));
        assert_eq!(result.engagement_rate, 0.0);
        assert_eq!(result.engagement_quality, EngagementQuality::Poor);
    }
}

#[test]
fn all_zero_posts_still_have_a_best_post_and_no_comment_insight() {
    let analyzer = EngagementAnalyzer::default();
    let result = analyzer.analyze(&request(
        Platform::Instagram,
        1_000,
        vec![post(0, 0), post(0, 0), post(0, 0)],
    ));
    assert_eq!(result.total_engagement, 0);
    assert_eq!(result.best_post, Some(post(0, 0)));
    assert_eq!(
        result.insights,
        vec![
            "Focus on creating more engaging content to improve your rate",
            "Focus on consistent posting and engagement to grow your audience",
        ]
    );
}

// ============================================================
// Properties over many inputs
// ============================================================

#[test]
fn averages_are_bounded_by_per_post_extremes() {
    let analyzer = EngagementAnalyzer::default();
    for req in random_requests(200) {
        let result = analyzer.analyze(&req);
        let min_likes = req.posts.iter().map(|p| p.likes).min().unwrap();
        let max_likes = req.posts.iter().map(|p| p.likes).max().unwrap();
        let min_comments = req.posts.iter().map(|p| p.comments).min().unwrap();
        let max_comments = req.posts.iter().map(|p| p.comments).max().unwrap();
        assert!(min_likes <= result.avg_likes && result.avg_likes <= max_likes);
        assert!(min_comments <= result.avg_comments && result.avg_comments <= max_comments);
    }
}

#[test]
fn total_engagement_is_exact_sum() {
    let analyzer = EngagementAnalyzer::default();
    for req in random_requests(200) {
        let expected: u64 = req.posts.iter().map(|p| p.likes + p.comments).sum();
        assert_eq!(analyzer.analyze(&req).total_engagement, expected);
    }
}

#[test]
fn rate_is_never_negative_and_insights_are_capped() {
    let analyzer = EngagementAnalyzer::default();
    for req in random_requests(300) {
        let result = analyzer.analyze(&req);
        assert!(result.engagement_rate >= 0.0);
        assert!(result.insights.len() <= MAX_INSIGHTS);
        assert!(result.best_post.is_some());
    }
}

#[test]
fn best_post_has_the_highest_engagement() {
    let analyzer = EngagementAnalyzer::default();
    for req in random_requests(100).into_iter().filter(|r| r.followers > 0) {
        let best = analyzer.analyze(&req).best_post.unwrap();
        let max = req.posts.iter().map(|p| p.engagement()).max().unwrap();
        assert_eq!(best.engagement(), max);
    }
}

#[test]
fn quality_is_monotonic_in_rate() {
    let benchmarks = Benchmarks::default();
    for platform in Platform::ALL {
        let avg = benchmarks.industry_average(platform);
        let mut previous = EngagementQuality::Poor;
        for step in 0..=2_000 {
            let rate = step as f64 * 0.01;
            let quality = EngagementQuality::classify(rate, avg);
            assert!(quality >= previous, "{platform} rate {rate} dropped a tier");
            previous = quality;
        }
        assert_eq!(previous, EngagementQuality::Excellent);
    }
}

#[test]
fn quality_boundaries_resolve_to_higher_tier() {
    assert_eq!(EngagementQuality::classify(5.0, 2.5), EngagementQuality::Excellent);
    assert_eq!(EngagementQuality::classify(3.0, 2.5), EngagementQuality::Good);
    assert_eq!(EngagementQuality::classify(2.0, 2.5), EngagementQuality::Average);
    assert_eq!(EngagementQuality::classify(1.999, 2.5), EngagementQuality::Poor);
}

// ============================================================
// Insight cascade
// ============================================================

#[test]
fn insights_follow_rule_order() {
    let analyzer = EngagementAnalyzer::default();
    // rate 12.0 on instagram: 4.8x, comments 20%, 50k followers
    let result = analyzer.analyze(&request(
        Platform::Instagram,
        50_000,
        vec![post(4_800, 1_200), post(4_800, 1_200)],
    ));
    assert_eq!(
        result.insights,
        vec![
            "Your engagement rate is 4.8x above industry average",
            "Excellent comment engagement shows strong audience connection",
            "Growing audience size is attractive to mid-tier brand collaborations",
        ]
    );
}

#[test]
fn uniform_posts_are_perfectly_consistent() {
    assert_eq!(consistency_score(&[100.0, 100.0, 100.0]), Some(1.0));

    // The consistency line exists but is cut by the three earlier rules
    let analyzer = EngagementAnalyzer::default();
    let result = analyzer.analyze(&request(
        Platform::YouTube,
        5_000,
        vec![post(90, 10), post(90, 10), post(90, 10)],
    ));
    assert_eq!(result.insights.len(), MAX_INSIGHTS);
    assert!(!result
        .insights
        .iter()
        .any(|i| i.starts_with("Consistent engagement")));
}

#[test]
fn consistency_is_undefined_for_zero_mean() {
    assert_eq!(consistency_score(&[0.0, 0.0, 0.0]), None);
    assert_eq!(consistency_score(&[5.0]), None);
}

#[test]
fn moderate_rate_insight_without_multiplier() {
    let analyzer = EngagementAnalyzer::default();
    // tiktok avg 5.3; rate 6.0 is above average but below 1.5x
    let result = analyzer.analyze(&request(Platform::TikTok, 10_000, vec![post(550, 50)]));
    assert_eq!(
        result.insights[0],
        "Your engagement rate is above industry average"
    );
}

#[test]
fn tiktok_with_no_engagement_surfaces_platform_tip() {
    let analyzer = EngagementAnalyzer::default();
    let result = analyzer.analyze(&request(Platform::TikTok, 1_000, vec![post(0, 0)]));
    assert_eq!(
        result.insights,
        vec![
            "Focus on creating more engaging content to improve your rate",
            "Focus on consistent posting and engagement to grow your audience",
            "TikTok thrives on trending content - try incorporating popular sounds and hashtags",
        ]
    );
}

// ============================================================
// Validation
// ============================================================

#[test]
fn validation_rejects_out_of_contract_requests() {
    let ok = request(Platform::Instagram, 10, vec![post(1, 1)]);
    assert!(validate_request(&ok).is_ok());

    let no_posts = request(Platform::Instagram, 10, vec![]);
    assert_eq!(validate_request(&no_posts).unwrap_err().field, "posts");

    let eleven = request(Platform::Instagram, 10, vec![post(1, 1); 11]);
    assert_eq!(validate_request(&eleven).unwrap_err().field, "posts");

    let zero_followers = request(Platform::Instagram, 0, vec![post(1, 1)]);
    assert_eq!(validate_request(&zero_followers).unwrap_err().field, "followers");

    let mut long_handle = ok.clone();
    long_handle.handle = "x".repeat(51);
    assert_eq!(validate_request(&long_handle).unwrap_err().field, "handle");

    let mut long_caption = ok.clone();
    long_caption.posts[0].caption = Some("é".repeat(501));
    assert_eq!(
        validate_request(&long_caption).unwrap_err().field,
        "posts[0].caption"
    );
}

#[test]
fn validation_rejects_counts_that_could_overflow() {
    let huge_likes = request(Platform::Instagram, 10, vec![post(u64::MAX, 1), post(1, 0)]);
    assert_eq!(validate_request(&huge_likes).unwrap_err().field, "posts[0].likes");

    let huge_comments = request(Platform::Instagram, 10, vec![post(1, 0), post(1, MAX_COUNT + 1)]);
    assert_eq!(validate_request(&huge_comments).unwrap_err().field, "posts[1].comments");

    let huge_followers = request(Platform::Instagram, MAX_COUNT + 1, vec![post(1, 1)]);
    assert_eq!(validate_request(&huge_followers).unwrap_err().field, "followers");

    // Ten maxed-out posts are accepted and their total stays exact
    let maxed = request(Platform::YouTube, MAX_COUNT, vec![post(MAX_COUNT, MAX_COUNT); 10]);
    assert!(validate_request(&maxed).is_ok());
    let result = EngagementAnalyzer::default().analyze(&maxed);
    assert_eq!(result.total_engagement, MAX_COUNT * 20);
    assert!(result.total_engagement <= i64::MAX as u64);
}

#[test]
fn request_parses_from_json_wire_format() {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let json = format!(
        r#"{{"platform": "tiktok", "handle": "@dancer", "followers": 1200,
            "posts": [{{"likes": 10, "comments": 2, "post_date": "{}"}}]}}"#,
        (start + Duration::hours(3)).to_rfc3339()
    );
    let req: AnalysisRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(req.platform, Platform::TikTok);
    assert_eq!(req.posts[0].post_date, start + Duration::hours(3));
    assert!(req.posts[0].caption.is_none());
}
