mod auth;
pub use auth::{
    resolve_user, AuthContext, AuthFailure, AuthToken, NewSession, NewUser, User, UserDirectory,
    UserId,
};

mod card;
pub use card::{Card, CardId, CardInList, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};

mod comment;
pub use comment::{Comment, CommentId, COMMENT_MAX_LEN};

mod error;
pub use error::Error;

pub use uuid::Uuid;
pub type Time = chrono::DateTime<chrono::Utc>;

pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(s.to_string()));
    }
    Ok(())
}

/// Checks that `s` fits in `max` characters, `field` being the user-facing name of the input
pub fn validate_bounded(field: &str, s: &str, max: usize) -> Result<(), Error> {
    validate_string(s)?;
    if s.chars().count() > max {
        return Err(Error::FieldTooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Truncates `s` to at most `max` characters, like a `maxLength` input would
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
