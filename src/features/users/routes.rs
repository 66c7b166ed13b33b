use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{
    routing::{delete, get, patch},
    Router,
};
use std::sync::Arc;

/// User administration routes (require auth middleware to be applied by caller)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/{id}/role", patch(handlers::update_user_role))
        .route("/api/users/{id}", delete(handlers::delete_user))
        .with_state(service)
}
