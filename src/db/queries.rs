// Database queries: CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.
//
// Rows are read into small raw structs inside the rusqlite closures and
// converted afterwards, so JSON and timestamp parse errors surface as
// anyhow errors with context instead of being squeezed into rusqlite::Error.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{
    EngagementAnalysisRecord, EngagementSnapshot, MediaKit, MediaKitView, Profile, SocialAccount,
    ViewerInfo,
};

fn to_ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid timestamp in database: {raw}"))?
        .with_timezone(&Utc))
}

/// Counts are `u64` in Rust and INTEGER (i64) in SQLite. Refuse values that
/// would wrap instead of storing a negative number.
fn sql_count(field: &str, value: u64) -> Result<i64> {
    i64::try_from(value).with_context(|| format!("{field} {value} is too large to store"))
}

// --- Profiles ---

const PROFILE_COLUMNS: &str =
    "id, email, username, full_name, bio, avatar_url, contact_email, created_at, updated_at";

struct RawProfile {
    id: String,
    email: Option<String>,
    username: Option<String>,
    full_name: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    contact_email: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RawProfile {
    /// Read profile columns starting at `offset` (joined queries put them later).
    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            email: row.get(offset + 1)?,
            username: row.get(offset + 2)?,
            full_name: row.get(offset + 3)?,
            bio: row.get(offset + 4)?,
            avatar_url: row.get(offset + 5)?,
            contact_email: row.get(offset + 6)?,
            created_at: row.get(offset + 7)?,
            updated_at: row.get(offset + 8)?,
        })
    }

    fn into_profile(self) -> Result<Profile> {
        Ok(Profile {
            id: self.id,
            email: self.email,
            username: self.username,
            full_name: self.full_name,
            bio: self.bio,
            avatar_url: self.avatar_url,
            contact_email: self.contact_email,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

/// Get a profile by user id.
pub fn get_profile(conn: &Connection, user_id: &str) -> Result<Option<Profile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1");
    let raw = conn
        .query_row(&sql, params![user_id], |row| RawProfile::from_row(row, 0))
        .optional()?;
    raw.map(RawProfile::into_profile).transpose()
}

/// Insert or update a profile (keyed by id).
pub fn upsert_profile(conn: &Connection, profile: &Profile) -> Result<()> {
    conn.execute(
        "INSERT INTO profiles (id, email, username, full_name, bio, avatar_url, contact_email, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
            email = ?2,
            username = ?3,
            full_name = ?4,
            bio = ?5,
            avatar_url = ?6,
            contact_email = ?7,
            updated_at = ?9",
        params![
            profile.id,
            profile.email,
            profile.username,
            profile.full_name,
            profile.bio,
            profile.avatar_url,
            profile.contact_email,
            to_ts(&profile.created_at),
            to_ts(&profile.updated_at),
        ],
    )
    .with_context(|| format!("Failed to save profile {}", profile.id))?;
    Ok(())
}

// --- Social accounts ---

const ACCOUNT_COLUMNS: &str =
    "id, user_id, platform, handle, followers, is_primary, created_at, updated_at";

struct RawAccount {
    id: String,
    user_id: String,
    platform: String,
    handle: String,
    followers: i64,
    is_primary: bool,
    created_at: String,
    updated_at: String,
}

impl RawAccount {
    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            user_id: row.get(offset + 1)?,
            platform: row.get(offset + 2)?,
            handle: row.get(offset + 3)?,
            followers: row.get(offset + 4)?,
            is_primary: row.get(offset + 5)?,
            created_at: row.get(offset + 6)?,
            updated_at: row.get(offset + 7)?,
        })
    }

    fn into_account(self) -> Result<SocialAccount> {
        Ok(SocialAccount {
            id: self.id,
            user_id: self.user_id,
            platform: self.platform.parse()?,
            handle: self.handle,
            followers: self.followers.max(0) as u64,
            is_primary: self.is_primary,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

/// Store a new social account.
pub fn create_social_account(conn: &Connection, account: &SocialAccount) -> Result<()> {
    let followers = sql_count("followers", account.followers)?;
    conn.execute(
        "INSERT INTO social_accounts (id, user_id, platform, handle, followers, is_primary, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            account.id,
            account.user_id,
            account.platform.as_str(),
            account.handle,
            followers,
            account.is_primary,
            to_ts(&account.created_at),
            to_ts(&account.updated_at),
        ],
    )
    .with_context(|| format!("Failed to save social account @{}", account.handle))?;
    Ok(())
}

/// Get a social account by id.
pub fn get_social_account(conn: &Connection, id: &str) -> Result<Option<SocialAccount>> {
    let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM social_accounts WHERE id = ?1");
    let raw = conn
        .query_row(&sql, params![id], |row| RawAccount::from_row(row, 0))
        .optional()?;
    raw.map(RawAccount::into_account).transpose()
}

// --- Engagement analyses ---

const ANALYSIS_COLUMNS: &str = "id, user_id, social_account_id, engagement_rate, avg_likes, avg_comments,
     total_engagement, quality, insights, post_data, best_post, created_at";

struct RawAnalysis {
    id: String,
    user_id: String,
    social_account_id: String,
    engagement_rate: f64,
    avg_likes: i64,
    avg_comments: i64,
    total_engagement: i64,
    quality: String,
    insights: String,
    post_data: String,
    best_post: Option<String>,
    created_at: String,
}

impl RawAnalysis {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            social_account_id: row.get(2)?,
            engagement_rate: row.get(3)?,
            avg_likes: row.get(4)?,
            avg_comments: row.get(5)?,
            total_engagement: row.get(6)?,
            quality: row.get(7)?,
            insights: row.get(8)?,
            post_data: row.get(9)?,
            best_post: row.get(10)?,
            created_at: row.get(11)?,
        })
    }

    fn into_record(self) -> Result<EngagementAnalysisRecord> {
        let best_post = match self.best_post {
            Some(json) => Some(serde_json::from_str(&json).context("Invalid best_post JSON")?),
            None => None,
        };
        Ok(EngagementAnalysisRecord {
            id: self.id,
            user_id: self.user_id,
            social_account_id: self.social_account_id,
            engagement_rate: self.engagement_rate,
            avg_likes: self.avg_likes.max(0) as u64,
            avg_comments: self.avg_comments.max(0) as u64,
            total_engagement: self.total_engagement.max(0) as u64,
            quality: self.quality.parse()?,
            insights: serde_json::from_str(&self.insights).context("Invalid insights JSON")?,
            post_data: serde_json::from_str(&self.post_data).context("Invalid post_data JSON")?,
            best_post,
            created_at: parse_ts(&self.created_at)?,
        })
    }
}

/// Store a flattened analysis result.
pub fn create_engagement_analysis(conn: &Connection, record: &EngagementAnalysisRecord) -> Result<()> {
    let insights_json = serde_json::to_string(&record.insights)?;
    let posts_json = serde_json::to_string(&record.post_data)?;
    let best_json = record
        .best_post
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO engagement_analyses (id, user_id, social_account_id, engagement_rate, avg_likes,
            avg_comments, total_engagement, quality, insights, post_data, best_post, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            record.id,
            record.user_id,
            record.social_account_id,
            record.engagement_rate,
            sql_count("avg_likes", record.avg_likes)?,
            sql_count("avg_comments", record.avg_comments)?,
            sql_count("total_engagement", record.total_engagement)?,
            record.quality.as_str(),
            insights_json,
            posts_json,
            best_json,
            to_ts(&record.created_at),
        ],
    )
    .context("Failed to save engagement analysis")?;
    Ok(())
}

/// Get a stored analysis by id.
pub fn get_engagement_analysis(conn: &Connection, id: &str) -> Result<Option<EngagementAnalysisRecord>> {
    let sql = format!("SELECT {ANALYSIS_COLUMNS} FROM engagement_analyses WHERE id = ?1");
    let raw = conn
        .query_row(&sql, params![id], RawAnalysis::from_row)
        .optional()?;
    raw.map(RawAnalysis::into_record).transpose()
}

/// A user's most recent analyses, newest first.
pub fn list_engagement_analyses(
    conn: &Connection,
    user_id: &str,
    limit: u32,
) -> Result<Vec<EngagementAnalysisRecord>> {
    let sql = format!(
        "SELECT {ANALYSIS_COLUMNS} FROM engagement_analyses
         WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
        .query_map(params![user_id, limit], RawAnalysis::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawAnalysis::into_record).collect()
}

// --- Media kits ---

const KIT_COLUMNS: &str = "k.id, k.user_id, k.social_account_id, k.engagement_analysis_id, k.title, k.bio,
     k.top_posts, k.contact_email, k.engagement, k.profile_completeness, k.is_public, k.view_count,
     k.pdf_generated_at, k.created_at, k.updated_at";

/// Number of columns in KIT_COLUMNS, where joined profile columns start.
const KIT_COLUMN_COUNT: usize = 15;

struct RawKit {
    id: String,
    user_id: String,
    social_account_id: String,
    engagement_analysis_id: Option<String>,
    title: String,
    bio: Option<String>,
    top_posts: String,
    contact_email: Option<String>,
    engagement: String,
    profile_completeness: Option<f64>,
    is_public: bool,
    view_count: i64,
    pdf_generated_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RawKit {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            social_account_id: row.get(2)?,
            engagement_analysis_id: row.get(3)?,
            title: row.get(4)?,
            bio: row.get(5)?,
            top_posts: row.get(6)?,
            contact_email: row.get(7)?,
            engagement: row.get(8)?,
            profile_completeness: row.get(9)?,
            is_public: row.get(10)?,
            view_count: row.get(11)?,
            pdf_generated_at: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }

    fn into_kit(self) -> Result<MediaKit> {
        let pdf_generated_at = self.pdf_generated_at.as_deref().map(parse_ts).transpose()?;
        let engagement: EngagementSnapshot =
            serde_json::from_str(&self.engagement).context("Invalid engagement JSON")?;
        Ok(MediaKit {
            id: self.id,
            user_id: self.user_id,
            social_account_id: self.social_account_id,
            engagement_analysis_id: self.engagement_analysis_id,
            title: self.title,
            bio: self.bio,
            top_posts: serde_json::from_str(&self.top_posts).context("Invalid top_posts JSON")?,
            contact_email: self.contact_email,
            engagement,
            profile_completeness: self.profile_completeness,
            is_public: self.is_public,
            view_count: self.view_count.max(0) as u64,
            pdf_generated_at,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

/// Store a new media kit.
pub fn create_media_kit(conn: &Connection, kit: &MediaKit) -> Result<()> {
    conn.execute(
        "INSERT INTO media_kits (id, user_id, social_account_id, engagement_analysis_id, title, bio,
            top_posts, contact_email, engagement, profile_completeness, is_public, view_count,
            pdf_generated_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            kit.id,
            kit.user_id,
            kit.social_account_id,
            kit.engagement_analysis_id,
            kit.title,
            kit.bio,
            serde_json::to_string(&kit.top_posts)?,
            kit.contact_email,
            serde_json::to_string(&kit.engagement)?,
            kit.profile_completeness,
            kit.is_public,
            sql_count("view_count", kit.view_count)?,
            kit.pdf_generated_at.as_ref().map(to_ts),
            to_ts(&kit.created_at),
            to_ts(&kit.updated_at),
        ],
    )
    .context("Failed to save media kit")?;
    Ok(())
}

/// Get a media kit by id.
pub fn get_media_kit(conn: &Connection, id: &str) -> Result<Option<MediaKit>> {
    let sql = format!("SELECT {KIT_COLUMNS} FROM media_kits k WHERE k.id = ?1");
    let raw = conn
        .query_row(&sql, params![id], RawKit::from_row)
        .optional()?;
    raw.map(RawKit::into_kit).transpose()
}

fn joined_view_sql(filter: &str) -> String {
    let profile_cols = PROFILE_COLUMNS
        .split(", ")
        .map(|c| format!("p.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    let account_cols = ACCOUNT_COLUMNS
        .split(", ")
        .map(|c| format!("a.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {KIT_COLUMNS}, {profile_cols}, {account_cols}
         FROM media_kits k
         JOIN profiles p ON p.id = k.user_id
         JOIN social_accounts a ON a.id = k.social_account_id
         WHERE {filter}
         ORDER BY k.created_at DESC
         LIMIT 1"
    )
}

type RawView = (RawKit, RawProfile, RawAccount);

fn raw_view_from_row(row: &Row<'_>) -> rusqlite::Result<RawView> {
    Ok((
        RawKit::from_row(row)?,
        RawProfile::from_row(row, KIT_COLUMN_COUNT)?,
        RawAccount::from_row(row, KIT_COLUMN_COUNT + 9)?,
    ))
}

fn into_view((kit, profile, account): RawView) -> Result<MediaKitView> {
    Ok(MediaKitView {
        kit: kit.into_kit()?,
        profile: profile.into_profile()?,
        account: account.into_account()?,
    })
}

/// A media kit joined with its profile and social account.
pub fn get_media_kit_view(conn: &Connection, id: &str) -> Result<Option<MediaKitView>> {
    let sql = joined_view_sql("k.id = ?1");
    let raw = conn
        .query_row(&sql, params![id], raw_view_from_row)
        .optional()?;
    raw.map(into_view).transpose()
}

/// The newest public media kit published under `username`.
///
/// Matches the profile username first and falls back to the account handle,
/// case-insensitively, so kits created before a username was set still resolve.
pub fn get_media_kit_by_username(conn: &Connection, username: &str) -> Result<Option<MediaKitView>> {
    let sql = joined_view_sql(
        "k.is_public = 1 AND (p.username = ?1 COLLATE NOCASE
            OR (p.username IS NULL AND a.handle = ?1 COLLATE NOCASE))",
    );
    let raw = conn
        .query_row(&sql, params![username], raw_view_from_row)
        .optional()?;
    raw.map(into_view).transpose()
}

/// Record that a PDF was rendered for this kit.
pub fn mark_pdf_generated(conn: &Connection, kit_id: &str) -> Result<()> {
    let now = to_ts(&Utc::now());
    conn.execute(
        "UPDATE media_kits SET pdf_generated_at = ?1, updated_at = ?1 WHERE id = ?2",
        params![now, kit_id],
    )?;
    Ok(())
}

/// Record a view and return the kit's new view count.
pub fn track_media_kit_view(conn: &Connection, kit_id: &str, viewer: &ViewerInfo) -> Result<u64> {
    conn.execute(
        "INSERT INTO media_kit_views (media_kit_id, viewer_ip, user_agent, referrer, viewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            kit_id,
            viewer.viewer_ip,
            viewer.user_agent,
            viewer.referrer,
            to_ts(&Utc::now()),
        ],
    )?;
    conn.execute(
        "UPDATE media_kits SET view_count = view_count + 1 WHERE id = ?1",
        params![kit_id],
    )?;
    let count: i64 = conn.query_row(
        "SELECT view_count FROM media_kits WHERE id = ?1",
        params![kit_id],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as u64)
}

// --- Status ---

/// Row counts shown by `mediakit status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub profiles: i64,
    pub analyses: i64,
    pub media_kits: i64,
    pub views: i64,
}

pub fn store_counts(conn: &Connection) -> Result<StoreCounts> {
    let count = |table: &str| -> Result<i64> {
        let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n)
    };
    Ok(StoreCounts {
        profiles: count("profiles")?,
        analyses: count("engagement_analyses")?,
        media_kits: count("media_kits")?,
        views: count("media_kit_views")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{new_id, TopPost};
    use crate::db::schema::create_tables;
    use crate::engagement::models::{AnalysisRequest, EngagementQuality, Post};
    use crate::engagement::platform::Platform;
    use crate::engagement::EngagementAnalyzer;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn sample_request() -> AnalysisRequest {
        let post = |likes, comments| Post {
            likes,
            comments,
            post_date: Utc::now(),
            image_url: None,
            caption: Some("launch day".to_string()),
        };
        AnalysisRequest {
            platform: Platform::Instagram,
            handle: "creator".to_string(),
            followers: 10_000,
            posts: vec![post(500, 50), post(300, 20)],
        }
    }

    fn sample_kit(user_id: &str, account_id: &str) -> MediaKit {
        let now = Utc::now();
        MediaKit {
            id: new_id(),
            user_id: user_id.to_string(),
            social_account_id: account_id.to_string(),
            engagement_analysis_id: None,
            title: "creator's Media Kit".to_string(),
            bio: Some("Travel and food".to_string()),
            top_posts: vec![TopPost {
                likes: 500,
                comments: 50,
                image_url: None,
                caption: None,
            }],
            contact_email: Some("kit@example.com".to_string()),
            engagement: EngagementSnapshot {
                engagement_rate: 4.35,
                avg_likes: 400,
                avg_comments: 35,
                quality: Some(EngagementQuality::Good),
                insights: vec![],
            },
            profile_completeness: Some(0.6),
            is_public: true,
            view_count: 0,
            pdf_generated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_counts_beyond_i64_are_refused_not_wrapped() {
        let conn = test_conn();
        let account = SocialAccount::new("u1", Platform::TikTok, "creator", u64::MAX);
        let err = create_social_account(&conn, &account).unwrap_err();
        assert!(err.to_string().contains("followers"));

        let request = sample_request();
        let mut result = EngagementAnalyzer::default().analyze(&request);
        result.total_engagement = u64::MAX;
        let account = SocialAccount::new("u1", request.platform, &request.handle, request.followers);
        create_social_account(&conn, &account).unwrap();
        let record = EngagementAnalysisRecord::from_result("u1", &account.id, &request, &result);
        assert!(create_engagement_analysis(&conn, &record).is_err());
        assert!(list_engagement_analyses(&conn, "u1", 10).unwrap().is_empty());
    }

    #[test]
    fn test_profile_roundtrip_and_update() {
        let conn = test_conn();
        assert!(get_profile(&conn, "u1").unwrap().is_none());

        let mut profile = Profile::new("u1");
        profile.username = Some("creator".to_string());
        upsert_profile(&conn, &profile).unwrap();

        profile.bio = Some("hello".to_string());
        upsert_profile(&conn, &profile).unwrap();

        let loaded = get_profile(&conn, "u1").unwrap().unwrap();
        assert_eq!(loaded.username.as_deref(), Some("creator"));
        assert_eq!(loaded.bio.as_deref(), Some("hello"));
    }

    #[test]
    fn test_analysis_roundtrip() {
        let conn = test_conn();
        let request = sample_request();
        let result = EngagementAnalyzer::default().analyze(&request);

        let account = SocialAccount::new("u1", request.platform, &request.handle, request.followers);
        create_social_account(&conn, &account).unwrap();
        let record = EngagementAnalysisRecord::from_result("u1", &account.id, &request, &result);
        create_engagement_analysis(&conn, &record).unwrap();

        let loaded = get_engagement_analysis(&conn, &record.id).unwrap().unwrap();
        assert_eq!(loaded.quality, EngagementQuality::Good);
        assert_eq!(loaded.total_engagement, 870);
        assert_eq!(loaded.post_data.len(), 2);
        assert_eq!(loaded.best_post.unwrap().likes, 500);
        assert_eq!(loaded.insights, result.insights);

        let listed = list_engagement_analyses(&conn, "u1", 10).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(list_engagement_analyses(&conn, "someone-else", 10)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_media_kit_lookup_by_username_and_handle() {
        let conn = test_conn();
        let profile = Profile::new("u1");
        upsert_profile(&conn, &profile).unwrap();
        let account = SocialAccount::new("u1", Platform::TikTok, "@Dancer", 20_000);
        create_social_account(&conn, &account).unwrap();
        let kit = sample_kit("u1", &account.id);
        create_media_kit(&conn, &kit).unwrap();

        // No username yet: the handle resolves, case-insensitively
        let view = get_media_kit_by_username(&conn, "dancer").unwrap().unwrap();
        assert_eq!(view.kit.id, kit.id);
        assert_eq!(view.account.platform, Platform::TikTok);
        assert_eq!(view.username(), "Dancer");

        let mut named = profile.clone();
        named.username = Some("moves".to_string());
        upsert_profile(&conn, &named).unwrap();
        assert!(get_media_kit_by_username(&conn, "dancer").unwrap().is_none());
        assert!(get_media_kit_by_username(&conn, "moves").unwrap().is_some());
    }

    #[test]
    fn test_private_kits_are_not_public() {
        let conn = test_conn();
        let mut profile = Profile::new("u1");
        profile.username = Some("hidden".to_string());
        upsert_profile(&conn, &profile).unwrap();
        let account = SocialAccount::new("u1", Platform::YouTube, "hidden", 5);
        create_social_account(&conn, &account).unwrap();
        let mut kit = sample_kit("u1", &account.id);
        kit.is_public = false;
        create_media_kit(&conn, &kit).unwrap();

        assert!(get_media_kit_by_username(&conn, "hidden").unwrap().is_none());
        assert!(get_media_kit_view(&conn, &kit.id).unwrap().is_some());
    }

    #[test]
    fn test_track_views_and_pdf_timestamp() {
        let conn = test_conn();
        upsert_profile(&conn, &Profile::new("u1")).unwrap();
        let account = SocialAccount::new("u1", Platform::Instagram, "creator", 10);
        create_social_account(&conn, &account).unwrap();
        let kit = sample_kit("u1", &account.id);
        create_media_kit(&conn, &kit).unwrap();

        let viewer = ViewerInfo {
            viewer_ip: Some("127.0.0.1".to_string()),
            ..Default::default()
        };
        assert_eq!(track_media_kit_view(&conn, &kit.id, &viewer).unwrap(), 1);
        assert_eq!(track_media_kit_view(&conn, &kit.id, &viewer).unwrap(), 2);

        mark_pdf_generated(&conn, &kit.id).unwrap();
        let loaded = get_media_kit(&conn, &kit.id).unwrap().unwrap();
        assert_eq!(loaded.view_count, 2);
        assert!(loaded.pdf_generated_at.is_some());
        assert_eq!(loaded.engagement.avg_likes, 400);

        let counts = store_counts(&conn).unwrap();
        assert_eq!(counts.views, 2);
        assert_eq!(counts.media_kits, 1);
    }
}
