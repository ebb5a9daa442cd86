// Composition tests: the analysis flows through storage into a rendered kit.
//
//   AnalysisRequest -> analyze -> store record -> publish kit
//     -> look up by username -> RenderContext -> HTML
//
// Everything runs against an in-memory SQLite database.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rusqlite::Connection;

use mediakit::db::models::{
    new_id, EngagementAnalysisRecord, EngagementSnapshot, MediaKit, Profile, SocialAccount, TopPost,
    ViewerInfo,
};
use mediakit::db::schema::create_tables;
use mediakit::db::{Database, SqliteDatabase};
use mediakit::engagement::models::{AnalysisRequest, Post};
use mediakit::engagement::{Benchmarks, EngagementAnalyzer, Platform};
use mediakit::render::{self, RenderContext};

fn memory_db() -> Arc<dyn Database> {
    let conn = Connection::open_in_memory().unwrap();
    create_tables(&conn).unwrap();
    Arc::new(SqliteDatabase::new(conn))
}

fn instagram_request() -> AnalysisRequest {
    let day = |d| Utc.with_ymd_and_hms(2024, 3, d, 18, 0, 0).unwrap();
    AnalysisRequest {
        platform: Platform::Instagram,
        handle: "@sunny.bakes".to_string(),
        followers: 10_000,
        posts: vec![
            Post {
                likes: 500,
                comments: 50,
                post_date: day(1),
                image_url: Some("https://cdn.example/1.jpg".to_string()),
                caption: Some("Sourdough <3 & friends".to_string()),
            },
            Post {
                likes: 300,
                comments: 20,
                post_date: day(4),
                image_url: None,
                caption: None,
            },
        ],
    }
}

/// Analyze, store and publish; returns (user id, kit id).
async fn publish(db: &Arc<dyn Database>, completeness: Option<f64>) -> (String, String) {
    let request = instagram_request();
    let analyzer = EngagementAnalyzer::default();
    let result = analyzer.analyze(&request);

    let user_id = new_id();
    let mut profile = Profile::new(&user_id);
    profile.username = Some("sunny".to_string());
    profile.full_name = Some("Sunny Baker".to_string());
    db.upsert_profile(&profile).await.unwrap();

    let account = SocialAccount::new(&user_id, request.platform, &request.handle, request.followers);
    db.create_social_account(&account).await.unwrap();

    let record = EngagementAnalysisRecord::from_result(&user_id, &account.id, &request, &result);
    db.create_engagement_analysis(&record).await.unwrap();

    let now = Utc::now();
    let kit = MediaKit {
        id: new_id(),
        user_id: user_id.clone(),
        social_account_id: account.id.clone(),
        engagement_analysis_id: Some(record.id.clone()),
        title: "Sunny Baker's Media Kit".to_string(),
        bio: None,
        top_posts: request.posts.iter().map(TopPost::from).collect(),
        contact_email: None,
        engagement: EngagementSnapshot::from(&result),
        profile_completeness: completeness,
        is_public: true,
        view_count: 0,
        pdf_generated_at: None,
        created_at: now,
        updated_at: now,
    };
    db.create_media_kit(&kit).await.unwrap();
    (user_id, kit.id)
}

#[tokio::test]
async fn stored_analysis_matches_fresh_result() {
    let db = memory_db();
    let request = instagram_request();
    let result = EngagementAnalyzer::default().analyze(&request);

    let account = SocialAccount::new("u1", request.platform, &request.handle, request.followers);
    db.create_social_account(&account).await.unwrap();
    let record = EngagementAnalysisRecord::from_result("u1", &account.id, &request, &result);
    db.create_engagement_analysis(&record).await.unwrap();

    let loaded = db.get_engagement_analysis(&record.id).await.unwrap().unwrap();
    assert_eq!(loaded.engagement_rate, 4.35);
    assert_eq!(loaded.quality, result.engagement_quality);
    assert_eq!(loaded.insights, result.insights);
    assert_eq!(loaded.post_data, request.posts);
    assert_eq!(loaded.best_post, result.best_post);

    let account = db.get_social_account(&loaded.social_account_id).await.unwrap().unwrap();
    assert_eq!(account.handle, "sunny.bakes");

    let history = db.list_engagement_analyses("u1", 5).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(db.list_engagement_analyses("someone-else", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn published_kit_renders_with_readiness_and_defaults() {
    let db = memory_db();
    let (_user, kit_id) = publish(&db, Some(0.8)).await;

    let view = db.get_media_kit_by_username("SUNNY").await.unwrap().unwrap();
    assert_eq!(view.kit.id, kit_id);

    let ctx = RenderContext::from_view(&view, &Benchmarks::default());
    assert_eq!(ctx.full_name, "Sunny Baker");
    assert_eq!(ctx.bio, render::DEFAULT_BIO);
    assert_eq!(ctx.contact_email, render::DEFAULT_CONTACT);
    assert_eq!(ctx.readiness.as_ref().map(|r| r.score), Some(86));

    let map = ctx.to_map();
    for key in [
        "platform",
        "handle",
        "followers",
        "engagement_rate",
        "avg_likes",
        "avg_comments",
        "quality",
        "bio",
        "top_posts",
        "contact_email",
        "insights",
    ] {
        assert!(map.contains_key(key), "missing {key}");
    }
    assert_eq!(map["quality"], "good");

    let html = render::html::render(&ctx);
    assert!(html.contains("Sunny Baker"));
    assert!(html.contains("10.0K"));
    assert!(html.contains("4.35%"));
    assert!(html.contains("86/100"));
    // captions are escaped
    assert!(html.contains("Sourdough &lt;3 &amp; friends"));
    assert!(!html.contains("Sourdough <3"));
}

#[tokio::test]
async fn kit_without_completeness_has_no_readiness() {
    let db = memory_db();
    let (_user, kit_id) = publish(&db, None).await;
    let view = db.get_media_kit_view(&kit_id).await.unwrap().unwrap();
    let ctx = RenderContext::from_view(&view, &Benchmarks::default());
    assert!(ctx.readiness.is_none());
    assert!(!render::html::render(&ctx).contains("Brand readiness"));
}

#[tokio::test]
async fn views_and_pdf_marks_are_recorded() {
    let db = memory_db();
    let (_user, kit_id) = publish(&db, Some(1.0)).await;

    let viewer = ViewerInfo {
        viewer_ip: Some("203.0.113.7".to_string()),
        ..Default::default()
    };
    assert_eq!(db.track_media_kit_view(&kit_id, &viewer).await.unwrap(), 1);
    assert_eq!(db.track_media_kit_view(&kit_id, &ViewerInfo::default()).await.unwrap(), 2);

    db.mark_pdf_generated(&kit_id).await.unwrap();
    let kit = db.get_media_kit(&kit_id).await.unwrap().unwrap();
    assert_eq!(kit.view_count, 2);
    assert!(kit.pdf_generated_at.is_some());

    let counts = db.store_counts().await.unwrap();
    assert_eq!(counts.profiles, 1);
    assert_eq!(counts.analyses, 1);
    assert_eq!(counts.media_kits, 1);
    assert_eq!(counts.views, 2);
}

#[tokio::test]
async fn private_kits_are_not_found_by_username() {
    let db = memory_db();
    let (user_id, _kit_id) = publish(&db, None).await;

    let account = SocialAccount::new(&user_id, Platform::TikTok, "hidden", 50);
    db.create_social_account(&account).await.unwrap();
    let now = Utc::now();
    let private = MediaKit {
        id: new_id(),
        user_id: user_id.clone(),
        social_account_id: account.id,
        engagement_analysis_id: None,
        title: "Draft".to_string(),
        bio: None,
        top_posts: vec![],
        contact_email: None,
        engagement: EngagementSnapshot::default(),
        profile_completeness: None,
        is_public: false,
        view_count: 0,
        pdf_generated_at: None,
        created_at: now + chrono::Duration::seconds(5),
        updated_at: now,
    };
    db.create_media_kit(&private).await.unwrap();

    // The newest kit is private, so the public lookup still returns the first
    let view = db.get_media_kit_by_username("sunny").await.unwrap().unwrap();
    assert!(view.kit.is_public);
    assert_ne!(view.kit.id, private.id);
}
