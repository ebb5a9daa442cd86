// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The free functions in queries.rs stay usable against a bare Connection.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{EngagementAnalysisRecord, MediaKit, MediaKitView, Profile, SocialAccount, ViewerInfo};
use super::queries::{self, StoreCounts};
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn store_counts(&self) -> Result<StoreCounts> {
        let conn = self.conn.lock().await;
        queries::store_counts(&conn)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let conn = self.conn.lock().await;
        queries::get_profile(&conn, user_id)
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::upsert_profile(&conn, profile)
    }

    async fn create_social_account(&self, account: &SocialAccount) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::create_social_account(&conn, account)
    }

    async fn get_social_account(&self, id: &str) -> Result<Option<SocialAccount>> {
        let conn = self.conn.lock().await;
        queries::get_social_account(&conn, id)
    }

    async fn create_engagement_analysis(&self, record: &EngagementAnalysisRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::create_engagement_analysis(&conn, record)
    }

    async fn get_engagement_analysis(&self, id: &str) -> Result<Option<EngagementAnalysisRecord>> {
        let conn = self.conn.lock().await;
        queries::get_engagement_analysis(&conn, id)
    }

    async fn list_engagement_analyses(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<EngagementAnalysisRecord>> {
        let conn = self.conn.lock().await;
        queries::list_engagement_analyses(&conn, user_id, limit)
    }

    async fn create_media_kit(&self, kit: &MediaKit) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::create_media_kit(&conn, kit)
    }

    async fn get_media_kit(&self, id: &str) -> Result<Option<MediaKit>> {
        let conn = self.conn.lock().await;
        queries::get_media_kit(&conn, id)
    }

    async fn get_media_kit_view(&self, id: &str) -> Result<Option<MediaKitView>> {
        let conn = self.conn.lock().await;
        queries::get_media_kit_view(&conn, id)
    }

    async fn get_media_kit_by_username(&self, username: &str) -> Result<Option<MediaKitView>> {
        let conn = self.conn.lock().await;
        queries::get_media_kit_by_username(&conn, username)
    }

    async fn mark_pdf_generated(&self, kit_id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::mark_pdf_generated(&conn, kit_id)
    }

    async fn track_media_kit_view(&self, kit_id: &str, viewer: &ViewerInfo) -> Result<u64> {
        let conn = self.conn.lock().await;
        queries::track_media_kit_view(&conn, kit_id, viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use crate::engagement::platform::Platform;

    async fn test_db() -> SqliteDatabase {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteDatabase::new(conn)
    }

    #[tokio::test]
    async fn test_trait_profile_roundtrip() {
        let db = test_db().await;
        assert!(db.get_profile("u1").await.unwrap().is_none());
        let mut profile = Profile::new("u1");
        profile.full_name = Some("Ada Creator".to_string());
        db.upsert_profile(&profile).await.unwrap();
        let loaded = db.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(loaded.full_name.as_deref(), Some("Ada Creator"));
    }

    #[tokio::test]
    async fn test_trait_social_account_roundtrip() {
        let db = test_db().await;
        let account = SocialAccount::new("u1", Platform::YouTube, "@tubes", 42_000);
        db.create_social_account(&account).await.unwrap();
        let loaded = db.get_social_account(&account.id).await.unwrap().unwrap();
        assert_eq!(loaded.platform, Platform::YouTube);
        assert_eq!(loaded.followers, 42_000);
        assert_eq!(loaded.handle, "tubes");
    }

    #[tokio::test]
    async fn test_trait_table_count() {
        let db = test_db().await;
        assert_eq!(db.table_count().await.unwrap(), 6);
        assert_eq!(db.store_counts().await.unwrap(), StoreCounts::default());
    }
}
