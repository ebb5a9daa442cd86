// Data models: Rust structs that map to database rows.
//
// These are separate from the queries so the web and render layers can use
// them without depending on rusqlite directly. Identifiers are UUID v4
// strings and timestamps are RFC 3339 UTC, both generated here rather than
// by the engagement engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engagement::models::{AnalysisRequest, AnalysisResult, EngagementQuality, Post};
use crate::engagement::platform::Platform;
use crate::engagement::readiness::ProfileCompleteness;

/// Fresh random identifier for a new row.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A creator's profile. `id` is the authenticated user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: None,
            username: None,
            full_name: None,
            bio: None,
            avatar_url: None,
            contact_email: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// How much of the public-facing profile is filled in: username, full
    /// name, bio, avatar and contact email each count for a fifth.
    pub fn completeness(&self) -> ProfileCompleteness {
        let fields = [
            &self.username,
            &self.full_name,
            &self.bio,
            &self.avatar_url,
            &self.contact_email,
        ];
        let present = fields
            .iter()
            .filter(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
            .count();
        ProfileCompleteness::from_fields(present, fields.len())
    }
}

/// A social account the analysis was run for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAccount {
    pub id: String,
    pub user_id: String,
    pub platform: Platform,
    pub handle: String,
    pub followers: u64,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SocialAccount {
    pub fn new(user_id: &str, platform: Platform, handle: &str, followers: u64) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            platform,
            handle: handle.trim_start_matches('@').to_string(),
            followers,
            is_primary: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An analysis result flattened into a storage record, with the raw posts
/// kept alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementAnalysisRecord {
    pub id: String,
    pub user_id: String,
    pub social_account_id: String,
    pub engagement_rate: f64,
    pub avg_likes: u64,
    pub avg_comments: u64,
    pub total_engagement: u64,
    pub quality: EngagementQuality,
    pub insights: Vec<String>,
    pub post_data: Vec<Post>,
    pub best_post: Option<Post>,
    pub created_at: DateTime<Utc>,
}

impl EngagementAnalysisRecord {
    pub fn from_result(
        user_id: &str,
        social_account_id: &str,
        request: &AnalysisRequest,
        result: &AnalysisResult,
    ) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            social_account_id: social_account_id.to_string(),
            engagement_rate: result.engagement_rate,
            avg_likes: result.avg_likes,
            avg_comments: result.avg_comments,
            total_engagement: result.total_engagement,
            quality: result.engagement_quality,
            insights: result.insights.clone(),
            post_data: request.posts.clone(),
            best_post: result.best_post.clone(),
            created_at: Utc::now(),
        }
    }
}

/// A post highlighted in a media kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPost {
    pub likes: u64,
    pub comments: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl From<&Post> for TopPost {
    fn from(post: &Post) -> Self {
        Self {
            likes: post.likes,
            comments: post.comments,
            image_url: post.image_url.clone(),
            caption: post.caption.clone(),
        }
    }
}

/// Engagement figures shown on a media kit. Every field is optional on the
/// wire so partially-known numbers can still be published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementSnapshot {
    pub engagement_rate: f64,
    pub avg_likes: u64,
    pub avg_comments: u64,
    pub quality: Option<EngagementQuality>,
    pub insights: Vec<String>,
}

impl From<&AnalysisResult> for EngagementSnapshot {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            engagement_rate: result.engagement_rate,
            avg_likes: result.avg_likes,
            avg_comments: result.avg_comments,
            quality: Some(result.engagement_quality),
            insights: result.insights.clone(),
        }
    }
}

/// A stored media kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaKit {
    pub id: String,
    pub user_id: String,
    pub social_account_id: String,
    pub engagement_analysis_id: Option<String>,
    pub title: String,
    pub bio: Option<String>,
    pub top_posts: Vec<TopPost>,
    pub contact_email: Option<String>,
    pub engagement: EngagementSnapshot,
    /// Owner's profile completeness when the kit was published
    pub profile_completeness: Option<f64>,
    pub is_public: bool,
    pub view_count: u64,
    pub pdf_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A media kit joined with its owner's profile and social account: the
/// shape the public page and the renderer work from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaKitView {
    pub kit: MediaKit,
    pub profile: Profile,
    pub account: SocialAccount,
}

impl MediaKitView {
    /// The name the kit is published under: profile username, else the handle.
    pub fn username(&self) -> &str {
        self.profile
            .username
            .as_deref()
            .unwrap_or(&self.account.handle)
    }
}

/// One recorded visit to a public media kit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerInfo {
    pub viewer_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}
