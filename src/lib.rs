pub mod config;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod words;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;
use crate::store::UserStore;
use crate::words::{LoadError, WordStore};

/// Loads both stores. Word lists are mandatory; the user store starts
/// empty when its file is unusable.
pub async fn build_state(config: Config) -> Result<AppState, LoadError> {
    let words =
        WordStore::load(&config.words_easy, &config.words_medium, &config.words_hard).await?;
    let users = UserStore::load(&config.users_file).await;

    if config.seed_demo_user {
        seed::seed_demo_user(&users, &config.demo_user_id).await;
    }

    Ok(AppState::new(config, words, users))
}

pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
