// Media kit rendering: template context, HTML document and PDF export.
//
// The renderer never computes engagement numbers itself. It receives them
// from a stored kit (or a fresh analysis), fills in presentation defaults
// for anything missing, and hands a flat key/value context to the template.

pub mod html;
pub mod pdf;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::models::{MediaKitView, TopPost};
use crate::engagement::models::{EngagementQuality, ReadinessScore};
use crate::engagement::platform::Benchmarks;
use crate::engagement::readiness::{self, ProfileCompleteness, ReadinessWeights};

pub const DEFAULT_FULL_NAME: &str = "Creator";
pub const DEFAULT_BIO: &str = "Passionate content creator building authentic connections.";
pub const DEFAULT_CONTACT: &str = "Available upon request";

/// Quality shown when a kit was published without one.
pub const DEFAULT_QUALITY: EngagementQuality = EngagementQuality::Good;

/// Everything the media kit template needs, with defaults already applied.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub username: String,
    pub full_name: String,
    pub platform: String,
    pub handle: String,
    pub followers: u64,
    pub engagement_rate: f64,
    pub avg_likes: u64,
    pub avg_comments: u64,
    pub quality: EngagementQuality,
    pub bio: String,
    pub top_posts: Vec<TopPost>,
    pub contact_email: String,
    pub avatar_url: Option<String>,
    pub insights: Vec<String>,
    pub readiness: Option<ReadinessScore>,
    pub generated_at: DateTime<Utc>,
}

impl RenderContext {
    /// Build the context for a stored kit.
    ///
    /// The readiness score is only included when the kit recorded its
    /// owner's profile completeness at publish time.
    pub fn from_view(view: &MediaKitView, benchmarks: &Benchmarks) -> Self {
        let kit = &view.kit;
        let username = view.username().to_string();
        let full_name = non_blank(view.profile.full_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| {
                if username.is_empty() {
                    DEFAULT_FULL_NAME.to_string()
                } else {
                    username.clone()
                }
            });

        let readiness = kit
            .profile_completeness
            .and_then(|c| ProfileCompleteness::new(c).ok())
            .map(|completeness| {
                readiness::compute_readiness_score(
                    kit.engagement.engagement_rate,
                    view.account.followers,
                    view.account.platform,
                    completeness,
                    benchmarks,
                    &ReadinessWeights::default(),
                )
            });

        let contact = non_blank(kit.contact_email.as_deref())
            .or_else(|| non_blank(view.profile.contact_email.as_deref()))
            .unwrap_or(DEFAULT_CONTACT);

        Self {
            username,
            full_name,
            platform: view.account.platform.display_name().to_string(),
            handle: view.account.handle.clone(),
            followers: view.account.followers,
            engagement_rate: kit.engagement.engagement_rate,
            avg_likes: kit.engagement.avg_likes,
            avg_comments: kit.engagement.avg_comments,
            quality: kit.engagement.quality.unwrap_or(DEFAULT_QUALITY),
            bio: non_blank(kit.bio.as_deref())
                .or_else(|| non_blank(view.profile.bio.as_deref()))
                .unwrap_or(DEFAULT_BIO)
                .to_string(),
            top_posts: kit.top_posts.clone(),
            contact_email: contact.to_string(),
            avatar_url: view.profile.avatar_url.clone(),
            insights: kit.engagement.insights.clone(),
            readiness,
            generated_at: Utc::now(),
        }
    }

    /// The flattened key/value form handed to templates.
    pub fn to_map(&self) -> BTreeMap<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Compact follower-style numbers: 950, 1.2K, 3.4M.
pub fn format_number(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Long-form date, e.g. "March 05, 2024".
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%B %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1.0K");
        assert_eq!(format_number(12_345), "12.3K");
        assert_eq!(format_number(2_500_000), "2.5M");
    }

    #[test]
    fn test_format_date() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(format_date(&dt), "March 05, 2024");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some("x")), Some("x"));
        assert_eq!(non_blank(None), None);
    }
}
