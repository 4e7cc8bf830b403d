use crate::store::{StoreError, UserRecord, UserStore};

const DEMO_PASSWORD: &str = "demo";
const DEMO_NAME: &str = "Demo Farmer";

pub async fn seed_demo_user(users: &UserStore, demo_user_id: &str) {
    if users.contains(demo_user_id).await {
        tracing::debug!(user_id = demo_user_id, "demo user already exists");
        return;
    }

    match users
        .insert_new(demo_user_id, UserRecord::new(DEMO_PASSWORD, DEMO_NAME))
        .await
    {
        Ok(()) => tracing::info!(user_id = demo_user_id, "seeded demo user"),
        Err(StoreError::AlreadyExists(_)) => {
            tracing::debug!(user_id = demo_user_id, "demo user created concurrently")
        }
        Err(err) => tracing::warn!(error = %err, user_id = demo_user_id, "failed to seed demo user"),
    }
}
