use serde::{Deserialize, Serialize};

// An inter-department message. Identity is the id assigned at creation, so
// deletions stay stable even when two clients hold different snapshots of
// the mailbox (positional deletion would not).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: uuid::Uuid,
    pub department: String,
    pub content: String,
    pub sender: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Comment {
    pub(crate) fn new(department: String, content: String, sender: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            department,
            content,
            sender,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub department: String,
    pub message: String,
    #[serde(default)]
    pub sender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteComment {
    pub id: uuid::Uuid,
}

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub comments: Vec<Comment>,
}
