use crate::{
    api::{self, Card, Comment, CommentId},
    compute_patch, CardCloser, CardStore, Cause, Draft, SessionConfig,
};

/// Key that submits the comment draft
pub const SUBMIT_KEY: &str = "Enter";

/// What the host should do with a key event after the session saw it
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyResponse {
    /// Let the input handle the key as usual
    PassThrough,

    /// The key submitted the draft, the host must not insert a newline.
    /// Carries the record forwarded to the store, if any.
    Consumed(Option<Card>),
}

impl KeyResponse {
    pub fn prevent_default(&self) -> bool {
        matches!(self, KeyResponse::Consumed(_))
    }
}

/// Editing state for the single card whose detail view is open
///
/// Every operation on a closed session is a no-op.
pub struct CardEditSession<S, C> {
    store: S,
    closer: C,
    config: SessionConfig,

    // bumped on every open and close
    generation: u64,

    /// Last record known to the store, `None` while closed
    original: Option<Card>,
    list_title: String,

    working_title: String,
    working_description: String,
    comments: Vec<Comment>,
    description_editing: bool,
    confirming_delete: bool,
    new_comment_draft: String,
}

impl<S: CardStore, C: CardCloser> CardEditSession<S, C> {
    pub fn new(store: S, closer: C, config: SessionConfig) -> Self {
        CardEditSession {
            store,
            closer,
            config,
            generation: 0,
            original: None,
            list_title: String::new(),
            working_title: String::new(),
            working_description: String::new(),
            comments: Vec::new(),
            description_editing: false,
            confirming_delete: false,
            new_comment_draft: String::new(),
        }
    }

    /// Seeds the editor from `card`, discarding any unsaved edits unless
    /// `card` is the record already open
    pub fn open(&mut self, card: Card, list_title: String) {
        if self.original.as_ref() == Some(&card) {
            self.list_title = list_title;
            return;
        }
        tracing::debug!(card = ?card.id, "opening card editor");
        self.generation += 1;
        self.working_title = card.title.clone();
        self.working_description = card.description.clone();
        self.comments = card.comments.clone();
        self.description_editing = card.description.is_empty();
        self.confirming_delete = false;
        self.new_comment_draft = String::new();
        self.list_title = list_title;
        self.original = Some(card);
    }

    pub fn is_open(&self) -> bool {
        self.original.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a response to a request sent at `generation` may still be
    /// applied to this session
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_open() && self.generation == generation
    }

    pub fn original(&self) -> Option<&Card> {
        self.original.as_ref()
    }

    pub fn list_title(&self) -> &str {
        &self.list_title
    }

    pub fn title(&self) -> &str {
        &self.working_title
    }

    pub fn description(&self) -> &str {
        &self.working_description
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment_draft(&self) -> &str {
        &self.new_comment_draft
    }

    pub fn is_description_editing(&self) -> bool {
        self.description_editing
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn closer(&self) -> &C {
        &self.closer
    }

    pub fn set_title(&mut self, title: &str) {
        if self.is_open() {
            self.working_title = api::truncate_chars(title, api::TITLE_MAX_LEN);
        }
    }

    pub fn set_description(&mut self, description: &str) {
        if self.is_open() {
            self.working_description =
                api::truncate_chars(description, api::DESCRIPTION_MAX_LEN);
        }
    }

    pub fn set_comment_draft(&mut self, text: &str) {
        if self.is_open() {
            self.new_comment_draft = api::truncate_chars(text, api::COMMENT_MAX_LEN);
        }
    }

    pub fn begin_description_edit(&mut self) {
        if self.is_open() {
            self.description_editing = true;
        }
    }

    pub fn commit_description(&mut self) -> Option<Card> {
        let original = self.original.as_ref()?;
        if api::is_blank(&self.working_description) {
            return None;
        }
        if self.working_description == original.description {
            self.description_editing = false;
            return None;
        }
        let res = self.forward(Cause::Description);
        self.description_editing = false;
        res
    }

    pub fn commit_title(&mut self) -> Option<Card> {
        let original = self.original.as_ref()?;
        if api::is_blank(&self.working_title) {
            self.working_title = original.title.clone();
            return None;
        }
        if self.working_title == original.title {
            return None;
        }
        self.forward(Cause::Title)
    }

    /// Handles a key event on the comment input; only `SUBMIT_KEY` does anything
    pub fn add_comment(&mut self, text: &str, key: &str) -> KeyResponse {
        if key != SUBMIT_KEY {
            return KeyResponse::PassThrough;
        }
        if !self.is_open() {
            return KeyResponse::Consumed(None);
        }
        let comment = match Comment::now(text, &self.comments) {
            Some(c) => c,
            None => return KeyResponse::Consumed(None),
        };
        self.comments.insert(0, comment);
        self.new_comment_draft = String::new();
        KeyResponse::Consumed(self.forward(Cause::Comments))
    }

    /// Submits the current draft, as if the submit key was hit in the input
    pub fn submit_comment_draft(&mut self) -> Option<Card> {
        let draft = std::mem::take(&mut self.new_comment_draft);
        let res = match self.add_comment(&draft, SUBMIT_KEY) {
            KeyResponse::Consumed(res) => res,
            KeyResponse::PassThrough => None,
        };
        if res.is_none() && self.is_open() {
            self.new_comment_draft = draft;
        }
        res
    }

    pub fn delete_comment(&mut self, id: CommentId) -> Option<Card> {
        if !self.is_open() {
            return None;
        }
        let idx = self.comments.iter().position(|c| c.id == id)?;
        self.comments.remove(idx);
        self.forward(Cause::Comments)
    }

    pub fn request_delete(&mut self) {
        if self.is_open() {
            self.confirming_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    /// Deletes the card and closes the session, returns whether anything happened
    pub fn confirm_delete(&mut self) -> bool {
        if !self.confirming_delete {
            return false;
        }
        let card = match self.original.as_ref() {
            Some(card) => card,
            None => return false,
        };
        tracing::debug!(card = ?card.id, "deleting card");
        if let Err(err) = self.store.delete(card) {
            tracing::warn!(card = ?card.id, %err, "card deletion failed");
        }
        self.close();
        true
    }

    pub fn close(&mut self) {
        let card = match self.original.take() {
            Some(card) => card,
            None => return,
        };
        tracing::debug!(card = ?card.id, "closing card editor");
        self.generation += 1;
        self.list_title = String::new();
        self.working_title = String::new();
        self.working_description = String::new();
        self.comments = Vec::new();
        self.description_editing = false;
        self.confirming_delete = false;
        self.new_comment_draft = String::new();
        self.closer.on_close();
    }

    fn draft(&self) -> Draft<'_> {
        Draft {
            title: &self.working_title,
            description: &self.working_description,
            comments: &self.comments,
            description_editing: self.description_editing,
        }
    }

    /// Sends the merged record to the store and adopts it as the new baseline
    fn forward(&mut self, cause: Cause) -> Option<Card> {
        let original = self.original.as_ref()?;
        let patch = compute_patch(
            original,
            &self.draft(),
            cause,
            self.config.description_merge,
        );
        let merged = patch.apply_to(original);
        tracing::debug!(card = ?merged.id, ?cause, ?patch, "forwarding card update");
        if let Err(err) = self.store.update(merged.clone()) {
            // no rollback: the local state stays as applied
            tracing::warn!(card = ?merged.id, %err, "card update failed");
        }
        self.original = Some(merged.clone());
        Some(merged)
    }
}
