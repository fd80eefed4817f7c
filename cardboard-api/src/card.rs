use std::collections::HashSet;

use uuid::Uuid;

use crate::{Comment, Error};

pub const TITLE_MAX_LEN: usize = 34;
pub const DESCRIPTION_MAX_LEN: usize = 300;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CardId(pub Uuid);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: String,

    /// Newest first
    pub comments: Vec<Comment>,
}

/// A card along with the name of the list it is filed under
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CardInList {
    pub list_title: String,
    pub card: Card,
}

impl Card {
    pub fn new(title: String) -> Card {
        Card {
            id: CardId(Uuid::new_v4()),
            title,
            description: String::new(),
            comments: Vec::new(),
        }
    }

    /// Checked by stores on every incoming record
    pub fn validate(&self) -> Result<(), Error> {
        if crate::is_blank(&self.title) {
            return Err(Error::FieldEmpty(String::from("title")));
        }
        crate::validate_bounded("title", &self.title, TITLE_MAX_LEN)?;
        crate::validate_bounded("description", &self.description, DESCRIPTION_MAX_LEN)?;
        let mut seen = HashSet::with_capacity(self.comments.len());
        for c in self.comments.iter() {
            c.validate()?;
            if !seen.insert(c.id) {
                return Err(Error::DuplicateCommentId(c.id.0));
            }
        }
        Ok(())
    }
}
