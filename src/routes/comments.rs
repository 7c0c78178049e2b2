use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{Comment, CommentList, CreateComment, DeleteComment};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_comments).post(create_comment).delete(mark_read),
    )
}

async fn list_comments(State(state): State<AppState>) -> Json<CommentList> {
    info!("GET /api/comments - Listing messages");
    Json(CommentList {
        comments: state.comments.list(),
    })
}

async fn create_comment(
    State(state): State<AppState>,
    Json(data): Json<CreateComment>,
) -> Result<Json<Comment>, AppError> {
    info!("POST /api/comments - New message for {}", data.department);
    state.comments.add(data).map(Json).map_err(|e| {
        error!("Failed to store comment: {}", e);
        e
    })
}

async fn mark_read(
    State(state): State<AppState>,
    Json(data): Json<DeleteComment>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /api/comments - Marking {} as read", data.id);
    state.comments.mark_read(data.id).map(Json).map_err(|e| {
        error!("Failed to mark comment {} as read: {}", data.id, e);
        e
    })
}
