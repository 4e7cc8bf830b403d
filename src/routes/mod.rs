mod account;
mod health;
mod quiz;
mod shop;

use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::middleware::identity::resolve_identity;
use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config().public_dir)
        .not_found_service(fallback_handler.into_service());

    Router::new()
        .route("/signup", post(account::signup))
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/quiz", get(quiz::quiz))
        .route("/check-answer", post(quiz::check_answer))
        .route(
            "/api/quiz/session",
            get(quiz::session_view).post(quiz::start_session),
        )
        .route("/api/quiz/session/answer", post(quiz::answer_session))
        .route("/api/user-data", get(shop::user_data))
        .route("/api/purchase", post(shop::purchase))
        .route("/api/shop/items", get(shop::items))
        .nest("/health", health::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_identity,
        ))
        .fallback_service(static_files)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "not found").into_response()
}
