use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Comment, CreateComment};

const DEFAULT_SENDER: &str = "Director";

/// In-memory department mailbox. Comments live for the process lifetime and
/// are addressed by the id assigned at creation, so concurrent readers can
/// never delete the wrong message the way positional deletion could.
#[derive(Debug, Default)]
pub struct CommentStore {
    comments: RwLock<Vec<Comment>>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> Vec<Comment> {
        self.comments.read().clone()
    }

    /// Validate and append a new message. Validation happens before any
    /// mutation, so a rejected submission leaves the mailbox untouched.
    pub fn add(&self, data: CreateComment) -> Result<Comment, AppError> {
        let department = data.department.trim();
        if department.is_empty() {
            return Err(AppError::Validation("a department must be selected".into()));
        }
        let message = data.message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("message must not be empty".into()));
        }
        let sender = data
            .sender
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SENDER);

        let comment = Comment::new(
            department.to_string(),
            message.to_string(),
            sender.to_string(),
        );
        self.comments.write().push(comment.clone());
        Ok(comment)
    }

    /// Remove a message by id ("mark as read").
    pub fn mark_read(&self, id: Uuid) -> Result<(), AppError> {
        let mut comments = self.comments.write();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        if comments.len() == before {
            Err(AppError::NotFound)
        } else {
            Ok(())
        }
    }
}
