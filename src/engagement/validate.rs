// Request validation: precondition checks run before the engine.
//
// The analyzer itself never rejects input. Callers that accept data from
// outside (CLI files, HTTP bodies) run these checks first so contract
// violations surface as a ValidationError naming the offending field.

use std::sync::OnceLock;

use regex_lite::Regex;
use thiserror::Error;

use super::models::AnalysisRequest;

pub const MIN_POSTS: usize = 1;
pub const MAX_POSTS: usize = 10;
pub const MAX_HANDLE_CHARS: usize = 50;
pub const MAX_CAPTION_CHARS: usize = 500;
pub const MAX_BIO_CHARS: usize = 1000;
pub const MAX_TOP_POSTS: usize = 10;

/// Largest accepted follower, like or comment count. Twenty such values
/// (likes and comments over `MAX_POSTS` posts) still sum within `i64`, which
/// is what SQLite stores.
pub const MAX_COUNT: u64 = i64::MAX as u64 / (2 * MAX_POSTS as u64);

/// A caller-supplied value outside its documented contract.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check an analysis request's bounds: 1-10 posts, 1 to `MAX_COUNT`
/// followers, a 1-50 character handle, like and comment counts of at most
/// `MAX_COUNT` and captions of at most 500 characters.
pub fn validate_request(request: &AnalysisRequest) -> Result<(), ValidationError> {
    validate_handle(&request.handle)?;

    check_count("followers", request.followers)?;
    if request.followers < 1 {
        return Err(ValidationError::new("followers", "must be at least 1"));
    }

    let count = request.posts.len();
    if !(MIN_POSTS..=MAX_POSTS).contains(&count) {
        return Err(ValidationError::new(
            "posts",
            format!("expected {MIN_POSTS}-{MAX_POSTS} posts, got {count}"),
        ));
    }

    for (i, post) in request.posts.iter().enumerate() {
        check_count(&format!("posts[{i}].likes"), post.likes)?;
        check_count(&format!("posts[{i}].comments"), post.comments)?;
        if let Some(caption) = &post.caption {
            check_max_chars(&format!("posts[{i}].caption"), caption, MAX_CAPTION_CHARS)?;
        }
    }

    Ok(())
}

/// A handle is 1-50 characters once a leading '@' is stripped.
pub fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    let trimmed = handle.trim().trim_start_matches('@');
    if trimmed.is_empty() {
        return Err(ValidationError::new("handle", "must not be empty"));
    }
    check_max_chars("handle", trimmed, MAX_HANDLE_CHARS)
}

/// Loose syntactic check: one '@', no whitespace, a dot in the domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    });
    if re.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "contact_email",
            format!("'{email}' is not a valid email address"),
        ))
    }
}

pub fn check_count(field: &str, value: u64) -> Result<(), ValidationError> {
    if value > MAX_COUNT {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_COUNT}, got {value}"),
        ));
    }
    Ok(())
}

pub fn check_max_chars(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let count = value.chars().count();
    if count > max {
        return Err(ValidationError::new(
            field,
            format!("at most {max} characters allowed, got {count}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("kit@example.com").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
    }

    #[test]
    fn test_handle_strips_at_sign() {
        assert!(validate_handle("@creator").is_ok());
        assert_eq!(validate_handle("@").unwrap_err().field, "handle");
        assert!(validate_handle(&"x".repeat(51)).is_err());
        assert!(validate_handle(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_max_chars_counts_characters_not_bytes() {
        // 5 two-byte characters
        assert!(check_max_chars("bio", "ééééé", 5).is_ok());
        assert!(check_max_chars("bio", "éééééé", 5).is_err());
    }

    #[test]
    fn test_count_bound_is_inclusive() {
        assert!(check_count("followers", MAX_COUNT).is_ok());
        let err = check_count("posts[3].likes", MAX_COUNT + 1).unwrap_err();
        assert_eq!(err.field, "posts[3].likes");
        // The bound keeps every stored sum representable
        assert!((MAX_COUNT as u128) * 2 * (MAX_POSTS as u128) <= i64::MAX as u128);
    }

    #[test]
    fn test_error_message_names_field() {
        let err = ValidationError::new("followers", "must be at least 1");
        assert_eq!(err.to_string(), "invalid followers: must be at least 1");
    }
}
