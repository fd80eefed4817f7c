use std::collections::BTreeSet;

use chrono::Utc;

use crate::{Error, Time};

pub const COMMENT_MAX_LEN: usize = 300;

/// Milliseconds since the unix epoch at the time the comment was created
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub i64);

impl CommentId {
    /// Returns an id derived from `now` that is strictly greater than every id in `taken`,
    /// or when `taken` already holds `i64::MAX`, the highest id not in `taken`
    pub fn fresh<'a>(now: Time, taken: impl IntoIterator<Item = &'a CommentId>) -> CommentId {
        let taken = taken.into_iter().map(|c| c.0).collect::<BTreeSet<i64>>();
        let from_time = now.timestamp_millis();
        match taken.iter().next_back() {
            Some(&highest) if highest >= from_time => match highest.checked_add(1) {
                Some(next) => CommentId(next),
                None => CommentId(
                    (i64::MIN..highest)
                        .rev()
                        .find(|id| !taken.contains(id))
                        .unwrap_or(i64::MIN),
                ),
            },
            _ => CommentId(from_time),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub body: String,

    /// Set at creation, comments cannot be edited afterwards
    pub edited_at: Time,
}

impl Comment {
    /// Builds a new comment from user input, returning `None` if the text is blank
    pub fn new<'a>(
        text: &str,
        now: Time,
        taken: impl IntoIterator<Item = &'a CommentId>,
    ) -> Option<Comment> {
        let body = text.trim();
        if body.is_empty() {
            return None;
        }
        Some(Comment {
            id: CommentId::fresh(now, taken),
            body: crate::truncate_chars(body, COMMENT_MAX_LEN),
            edited_at: now,
        })
    }

    pub fn now(text: &str, taken: &[Comment]) -> Option<Comment> {
        Comment::new(text, Utc::now(), taken.iter().map(|c| &c.id))
    }

    pub fn validate(&self) -> Result<(), Error> {
        if crate::is_blank(&self.body) {
            return Err(Error::FieldEmpty(String::from("comment")));
        }
        crate::validate_bounded("comment", &self.body, COMMENT_MAX_LEN)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(ms: i64) -> Time {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn fresh_id_follows_the_clock() {
        assert_eq!(CommentId::fresh(at(1_000), &[]), CommentId(1_000));
        assert_eq!(
            CommentId::fresh(at(1_000), &[CommentId(10), CommentId(999)]),
            CommentId(1_000)
        );
    }

    #[test]
    fn fresh_id_never_collides_with_same_millisecond() {
        let taken = [CommentId(1_000), CommentId(1_001)];
        assert_eq!(CommentId::fresh(at(1_000), &taken), CommentId(1_002));
    }

    #[test]
    fn fresh_id_does_not_overflow() {
        let taken = [CommentId(i64::MAX), CommentId(i64::MAX - 1)];
        assert_eq!(CommentId::fresh(at(1_000), &taken), CommentId(i64::MAX - 2));
        assert_eq!(
            CommentId::fresh(at(1_000), &[CommentId(i64::MAX)]),
            CommentId(i64::MAX - 1)
        );
    }

    #[test]
    fn new_comment_is_trimmed() {
        let c = Comment::new("  Looks good \n", at(5), &[]).unwrap();
        assert_eq!(c.body, "Looks good");
        assert_eq!(c.edited_at, at(5));
        assert!(Comment::new(" \t\n", at(5), &[]).is_none());
    }

    #[test]
    fn validate_rejects_blank_and_long_bodies() {
        let mut c = Comment::new("ok", at(0), &[]).unwrap();
        assert_eq!(c.validate(), Ok(()));
        c.body = String::from("   ");
        assert_eq!(c.validate(), Err(Error::FieldEmpty(String::from("comment"))));
        c.body = "x".repeat(COMMENT_MAX_LEN + 1);
        assert!(matches!(c.validate(), Err(Error::FieldTooLong { .. })));
    }
}
