use std::path::PathBuf;
use std::sync::Arc;

use crate::services::comment_service::CommentStore;

#[derive(Clone)]
pub struct AppState {
    /// CSV the dashboard payload is derived from on every `/api/data` call.
    pub sales_data_file: PathBuf,
    pub comments: Arc<CommentStore>,
}

impl AppState {
    pub fn from_env() -> Self {
        let sales_data_file = std::env::var("SALES_DATA_FILE")
            .unwrap_or_else(|_| "data/sales.csv".to_string())
            .into();
        Self {
            sales_data_file,
            comments: Arc::new(CommentStore::new()),
        }
    }
}
