// Media kit handlers.
//
// POST /api/v1/media-kit                    create (auth)
// GET  /api/v1/media-kit/{username}         public page data
// POST /api/v1/media-kit/{username}/view    record a view
// GET  /api/v1/media-kits/{id}              stored kit, owner only
// GET  /api/v1/media-kits/{id}/html|pdf     rendered document; public kits
//                                           for anyone, private ones for
//                                           their owner
//
// Public URLs use the username (profile username, else the handle), so the
// owner-facing routes live under a separate `media-kits` prefix keyed by id.

use axum::body::Bytes;
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::models::{
    new_id, EngagementSnapshot, MediaKit, MediaKitView, Profile, SocialAccount, TopPost, ViewerInfo,
};
use crate::engagement::models::EngagementQuality;
use crate::engagement::platform::Platform;
use crate::engagement::validate::{self, ValidationError, MAX_BIO_CHARS, MAX_CAPTION_CHARS, MAX_TOP_POSTS};
use crate::render::{html, pdf, RenderContext};
use crate::web::{api_error, internal_error, validation_error, AppState, AuthUser};

#[derive(Debug, Deserialize)]
pub struct MediaKitRequest {
    pub platform: Platform,
    pub handle: String,
    pub followers: u64,
    /// Engagement figures to publish; ignored when `engagement_analysis_id`
    /// names a stored analysis
    #[serde(default)]
    pub engagement_data: EngagementSnapshot,
    #[serde(default)]
    pub engagement_analysis_id: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub top_posts: Vec<TopPost>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl MediaKitRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate::validate_handle(&self.handle)?;
        validate::check_count("followers", self.followers)?;
        if self.followers < 1 {
            return Err(ValidationError::new("followers", "must be at least 1"));
        }
        if let Some(bio) = &self.bio {
            validate::check_max_chars("bio", bio, MAX_BIO_CHARS)?;
        }
        if self.top_posts.len() > MAX_TOP_POSTS {
            return Err(ValidationError::new(
                "top_posts",
                format!("at most {MAX_TOP_POSTS} posts allowed, got {}", self.top_posts.len()),
            ));
        }
        for (i, post) in self.top_posts.iter().enumerate() {
            if let Some(caption) = &post.caption {
                validate::check_max_chars(&format!("top_posts[{i}].caption"), caption, MAX_CAPTION_CHARS)?;
            }
        }
        if let Some(email) = &self.contact_email {
            validate::validate_email(email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MediaKitCreated {
    pub id: String,
    pub username: String,
    pub public_url: String,
    pub pdf_url: String,
    pub created_at: DateTime<Utc>,
    pub view_count: u64,
}

/// What anyone can see of a published kit.
#[derive(Debug, Serialize)]
pub struct MediaKitPublic {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub platform: Platform,
    pub handle: String,
    pub followers: u64,
    pub engagement_rate: f64,
    pub avg_likes: u64,
    pub avg_comments: u64,
    pub engagement_quality: Option<EngagementQuality>,
    pub insights: Vec<String>,
    pub bio: Option<String>,
    pub top_posts: Vec<TopPost>,
    pub contact_email: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub view_count: u64,
}

impl From<MediaKitView> for MediaKitPublic {
    fn from(view: MediaKitView) -> Self {
        let username = view.username().to_string();
        let MediaKitView {
            kit,
            profile,
            account,
        } = view;
        Self {
            id: kit.id,
            username,
            full_name: profile.full_name,
            platform: account.platform,
            handle: account.handle,
            followers: account.followers,
            engagement_rate: kit.engagement.engagement_rate,
            avg_likes: kit.engagement.avg_likes,
            avg_comments: kit.engagement.avg_comments,
            engagement_quality: kit.engagement.quality,
            insights: kit.engagement.insights,
            bio: kit.bio,
            top_posts: kit.top_posts,
            contact_email: kit.contact_email,
            avatar_url: profile.avatar_url,
            created_at: kit.created_at,
            view_count: kit.view_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ViewRecorded {
    pub view_count: u64,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/v1/media-kit
pub async fn create_media_kit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<MediaKitRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        return validation_error(&e);
    }

    let engagement = match &request.engagement_analysis_id {
        Some(analysis_id) => match state.db.get_engagement_analysis(analysis_id).await {
            Ok(Some(record)) if record.user_id == user.user_id => EngagementSnapshot {
                engagement_rate: record.engagement_rate,
                avg_likes: record.avg_likes,
                avg_comments: record.avg_comments,
                quality: Some(record.quality),
                insights: record.insights,
            },
            Ok(Some(_)) => return api_error(StatusCode::FORBIDDEN, "Access denied"),
            Ok(None) => return api_error(StatusCode::NOT_FOUND, "Engagement analysis not found"),
            Err(e) => return internal_error(&e, "Failed to fetch engagement analysis"),
        },
        None => request.engagement_data.clone(),
    };

    match create_kit(&state, &user.user_id, request, engagement).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => internal_error(&e, "Failed to create media kit"),
    }
}

/// Store the profile (if new), social account and kit for a validated request.
async fn create_kit(
    state: &AppState,
    user_id: &str,
    request: MediaKitRequest,
    engagement: EngagementSnapshot,
) -> anyhow::Result<MediaKitCreated> {
    let handle = request.handle.trim().trim_start_matches('@').to_string();

    let profile = match state.db.get_profile(user_id).await? {
        Some(profile) => profile,
        None => {
            let mut profile = Profile::new(user_id);
            profile.username = Some(handle.clone());
            profile.contact_email = request.contact_email.clone();
            state.db.upsert_profile(&profile).await?;
            info!(user = %user_id, username = %handle, "Created profile");
            profile
        }
    };

    let account = SocialAccount::new(user_id, request.platform, &handle, request.followers);
    state.db.create_social_account(&account).await?;

    let title_name = profile
        .full_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(&handle);

    let now = Utc::now();
    let kit = MediaKit {
        id: new_id(),
        user_id: user_id.to_string(),
        social_account_id: account.id.clone(),
        engagement_analysis_id: request.engagement_analysis_id.clone(),
        title: format!("{title_name}'s Media Kit"),
        bio: request.bio,
        top_posts: request.top_posts,
        contact_email: request.contact_email.or_else(|| profile.contact_email.clone()),
        engagement,
        profile_completeness: Some(profile.completeness().value()),
        is_public: true,
        view_count: 0,
        pdf_generated_at: None,
        created_at: now,
        updated_at: now,
    };
    state.db.create_media_kit(&kit).await?;

    let username = profile.username.clone().unwrap_or_else(|| handle.clone());
    let base = &state.config.public_url;
    let created = MediaKitCreated {
        public_url: format!(
            "{base}/media-kit/{}",
            utf8_percent_encode(&username, NON_ALPHANUMERIC)
        ),
        pdf_url: format!("{base}/api/v1/media-kits/{}/pdf", kit.id),
        id: kit.id,
        username,
        created_at: kit.created_at,
        view_count: 0,
    };

    info!(user = %user_id, handle = %handle, kit = %created.id, "Media kit created");
    Ok(created)
}

/// GET /api/v1/media-kit/{username}
pub async fn get_public_media_kit(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Response {
    match state.db.get_media_kit_by_username(&username).await {
        Ok(Some(view)) => Json(MediaKitPublic::from(view)).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Media kit not found"),
        Err(e) => internal_error(&e, "Failed to fetch media kit"),
    }
}

/// POST /api/v1/media-kit/{username}/view
///
/// The body is optional. Missing viewer fields fall back to request headers.
pub async fn track_view(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut viewer: ViewerInfo = if body.iter().all(u8::is_ascii_whitespace) {
        ViewerInfo::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => {
                return api_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    &format!("invalid view payload: {e}"),
                )
            }
        }
    };
    fill_viewer_from_headers(&mut viewer, &headers);

    let view = match state.db.get_media_kit_by_username(&username).await {
        Ok(Some(view)) => view,
        Ok(None) => return api_error(StatusCode::NOT_FOUND, "Media kit not found"),
        Err(e) => return internal_error(&e, "Failed to track view"),
    };

    match state.db.track_media_kit_view(&view.kit.id, &viewer).await {
        Ok(view_count) => Json(ViewRecorded {
            view_count,
            timestamp: Utc::now(),
        })
        .into_response(),
        Err(e) => internal_error(&e, "Failed to track view"),
    }
}

/// GET /api/v1/media-kits/{id}
pub async fn get_owned_media_kit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Response {
    match state.db.get_media_kit(&id).await {
        Ok(Some(kit)) if kit.user_id == user.user_id => Json(kit).into_response(),
        Ok(Some(_)) => api_error(StatusCode::FORBIDDEN, "Access denied"),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Media kit not found"),
        Err(e) => internal_error(&e, "Failed to fetch media kit"),
    }
}

/// GET /api/v1/media-kits/{id}/html
pub async fn media_kit_html(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Response {
    let view = match load_viewable(&state, &id, request.extensions()).await {
        Ok(view) => view,
        Err(rejection) => return rejection,
    };
    let ctx = RenderContext::from_view(&view, &state.config.benchmarks);
    Html(html::render(&ctx)).into_response()
}

/// GET /api/v1/media-kits/{id}/pdf
pub async fn media_kit_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Response {
    let view = match load_viewable(&state, &id, request.extensions()).await {
        Ok(view) => view,
        Err(rejection) => return rejection,
    };

    let ctx = RenderContext::from_view(&view, &state.config.benchmarks);
    let document = html::render(&ctx);
    let bytes = match pdf::html_to_pdf(&state.config.wkhtmltopdf_path, &document).await {
        Ok(bytes) => bytes,
        Err(e) => return internal_error(&e, "Failed to generate PDF"),
    };

    if let Err(e) = state.db.mark_pdf_generated(&view.kit.id).await {
        warn!(kit = %view.kit.id, error = %e, "Failed to record PDF generation time");
    }

    let disposition = format!(
        "attachment; filename=\"{}-media-kit.pdf\"",
        safe_filename(&ctx.username)
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// Load a kit for rendering: public kits for anyone, private ones only for
/// the owner.
async fn load_viewable(state: &AppState, id: &str, extensions: &axum::http::Extensions) -> Result<MediaKitView, Response> {
    let view = match state.db.get_media_kit_view(id).await {
        Ok(Some(view)) => view,
        Ok(None) => return Err(api_error(StatusCode::NOT_FOUND, "Media kit not found")),
        Err(e) => return Err(internal_error(&e, "Failed to fetch media kit")),
    };

    let caller = extensions.get::<AuthUser>();
    let is_owner = caller.is_some_and(|u| u.user_id == view.kit.user_id);
    if !view.kit.is_public && !is_owner {
        return Err(api_error(StatusCode::FORBIDDEN, "Access denied"));
    }
    Ok(view)
}

fn fill_viewer_from_headers(viewer: &mut ViewerInfo, headers: &HeaderMap) {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    if viewer.user_agent.is_none() {
        viewer.user_agent = header_str(header::USER_AGENT.as_str());
    }
    if viewer.referrer.is_none() {
        viewer.referrer = header_str(header::REFERER.as_str());
    }
    if viewer.viewer_ip.is_none() {
        viewer.viewer_ip = header_str("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .filter(|ip| !ip.is_empty());
    }
}

/// Keep filenames to a conservative character set.
fn safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    if cleaned.is_empty() {
        "creator".to_string()
    } else {
        cleaned
    }
}
