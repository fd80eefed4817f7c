use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Authentication failed")]
    Unauthenticated,

    #[error("Uuid already used {0}")]
    UuidAlreadyUsed(Uuid),

    #[error("Name already used {0}")]
    NameAlreadyUsed(String),

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Invalid character in name {0:?}")]
    InvalidName(String),

    #[error("Card not found {0}")]
    CardNotFound(Uuid),

    #[error("Field {0} must not be empty")]
    FieldEmpty(String),

    #[error("Field {field} is longer than {max} characters")]
    FieldTooLong { field: String, max: usize },

    #[error("Comment id used twice on the same card {0}")]
    DuplicateCommentId(i64),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::UuidAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::NameAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::InvalidName(_) => StatusCode::BAD_REQUEST,
            Error::CardNotFound(_) => StatusCode::NOT_FOUND,
            Error::FieldEmpty(_) => StatusCode::BAD_REQUEST,
            Error::FieldTooLong { .. } => StatusCode::BAD_REQUEST,
            Error::DuplicateCommentId(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::Unauthenticated => json!({
                "message": "sorry, some error occured",
                "type": "unauthenticated",
            }),
            Error::UuidAlreadyUsed(u) => json!({
                "message": "uuid conflict",
                "type": "conflict-uuid",
                "uuid": u,
            }),
            Error::NameAlreadyUsed(n) => json!({
                "message": "name already used",
                "type": "conflict-name",
                "name": n,
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::InvalidName(n) => json!({
                "message": "there was an invalid character in a user name",
                "type": "invalid-name",
                "name": n,
            }),
            Error::CardNotFound(c) => json!({
                "message": "card not found",
                "type": "card-not-found",
                "card": c,
            }),
            Error::FieldEmpty(f) => json!({
                "message": "a required field was empty",
                "type": "field-empty",
                "field": f,
            }),
            Error::FieldTooLong { field, max } => json!({
                "message": "a field was too long",
                "type": "field-too-long",
                "field": field,
                "max": max,
            }),
            Error::DuplicateCommentId(id) => json!({
                "message": "two comments share the same id",
                "type": "duplicate-comment",
                "comment": id,
            }),
        })
        .expect("serializing error")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let str_field = |name: &str| -> anyhow::Result<String> {
            data.get(name)
                .and_then(|s| s.as_str())
                .map(String::from)
                .ok_or_else(|| anyhow!("error contents is missing string field {name:?}"))
        };
        let uuid_field = |name: &str| -> anyhow::Result<Uuid> {
            Uuid::from_str(&str_field(name)?)
                .with_context(|| format!("error field {name:?} is not a uuid"))
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(str_field("message").unwrap_or_default()),
                "permission-denied" => Error::PermissionDenied,
                "unauthenticated" => Error::Unauthenticated,
                "conflict-uuid" => Error::UuidAlreadyUsed(uuid_field("uuid")?),
                "conflict-name" => Error::NameAlreadyUsed(str_field("name")?),
                "null-byte" => Error::NullByteInString(str_field("string")?),
                "invalid-name" => Error::InvalidName(str_field("name")?),
                "card-not-found" => Error::CardNotFound(uuid_field("card")?),
                "field-empty" => Error::FieldEmpty(str_field("field")?),
                "field-too-long" => Error::FieldTooLong {
                    field: str_field("field")?,
                    max: data
                        .get("max")
                        .and_then(|m| m.as_u64())
                        .ok_or_else(|| anyhow!("field-too-long error without a max"))?
                        as usize,
                },
                "duplicate-comment" => Error::DuplicateCommentId(
                    data.get("comment")
                        .and_then(|c| c.as_i64())
                        .ok_or_else(|| anyhow!("duplicate-comment error without a comment id"))?,
                ),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_parse_back() {
        let errors = [
            Error::Unknown(String::from("boom")),
            Error::PermissionDenied,
            Error::Unauthenticated,
            Error::UuidAlreadyUsed(Uuid::new_v4()),
            Error::NameAlreadyUsed(String::from("alice")),
            Error::NullByteInString(String::from("a\0")),
            Error::InvalidName(String::from("a b")),
            Error::CardNotFound(Uuid::new_v4()),
            Error::FieldEmpty(String::from("title")),
            Error::FieldTooLong {
                field: String::from("description"),
                max: 300,
            },
            Error::DuplicateCommentId(42),
        ];
        for e in errors {
            assert_eq!(Error::parse(&e.contents()).unwrap(), e);
        }
    }

    #[test]
    fn unauthenticated_body_is_generic() {
        let body: serde_json::Value =
            serde_json::from_slice(&Error::Unauthenticated.contents()).unwrap();
        assert_eq!(body["message"], "sorry, some error occured");
        assert_eq!(
            Error::Unauthenticated.status_code(),
            http::StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Error::parse(b"not json").is_err());
        assert!(Error::parse(br#"{"type":"nope"}"#).is_err());
        assert!(Error::parse(br#"{"type":"conflict-uuid","uuid":"zzz"}"#).is_err());
    }
}
