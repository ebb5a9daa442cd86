// Database trait: async interface for all storage operations.
//
// The web server holds an `Arc<dyn Database>`. Methods are async so the
// rusqlite backend (behind a tokio Mutex) and any future native-async
// backend fit behind the same interface.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{EngagementAnalysisRecord, MediaKit, MediaKitView, Profile, SocialAccount, ViewerInfo};
use super::queries::StoreCounts;

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    /// Row counts for the status display.
    async fn store_counts(&self) -> Result<StoreCounts>;

    // --- Profiles ---

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Insert or update a profile.
    async fn upsert_profile(&self, profile: &Profile) -> Result<()>;

    // --- Social accounts ---

    async fn create_social_account(&self, account: &SocialAccount) -> Result<()>;

    async fn get_social_account(&self, id: &str) -> Result<Option<SocialAccount>>;

    // --- Engagement analyses ---

    async fn create_engagement_analysis(&self, record: &EngagementAnalysisRecord) -> Result<()>;

    async fn get_engagement_analysis(&self, id: &str) -> Result<Option<EngagementAnalysisRecord>>;

    /// A user's most recent analyses, newest first.
    async fn list_engagement_analyses(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<EngagementAnalysisRecord>>;

    // --- Media kits ---

    async fn create_media_kit(&self, kit: &MediaKit) -> Result<()>;

    async fn get_media_kit(&self, id: &str) -> Result<Option<MediaKit>>;

    /// A kit joined with its profile and account, by kit id.
    async fn get_media_kit_view(&self, id: &str) -> Result<Option<MediaKitView>>;

    /// The newest public kit published under a username (or handle).
    async fn get_media_kit_by_username(&self, username: &str) -> Result<Option<MediaKitView>>;

    async fn mark_pdf_generated(&self, kit_id: &str) -> Result<()>;

    /// Record a view and return the new view count.
    async fn track_media_kit_view(&self, kit_id: &str, viewer: &ViewerInfo) -> Result<u64>;
}
