use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::identity::CurrentUser;
use crate::response::AppError;
use crate::services::shop::{self, Cart, SeedItem, SEED_CATALOG, SEED_PRICE};
use crate::state::AppState;
use crate::store::Inventory;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataResponse {
    name: String,
    coins: u64,
    score: u64,
    inventory: Inventory,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    unit_price: u64,
    items: &'static [SeedItem],
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    cart: Cart,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    coins: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inventory: Option<Inventory>,
}

impl PurchaseResponse {
    fn failure(status: StatusCode, message: impl Into<String>) -> Response {
        let body = Self {
            success: false,
            message: message.into(),
            coins: None,
            inventory: None,
        };
        (status, Json(body)).into_response()
    }
}

pub async fn user_data(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserDataResponse>, AppError> {
    let record = state
        .users()
        .get(&user.id)
        .await
        .ok_or_else(|| AppError::not_found(format!("user not found: {}", user.id)))?;

    Ok(Json(UserDataResponse {
        name: record.name,
        coins: record.coins,
        score: record.score,
        inventory: record.inventory,
    }))
}

pub async fn items() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        unit_price: SEED_PRICE,
        items: SEED_CATALOG,
    })
}

pub async fn purchase(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            return PurchaseResponse::failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match shop::purchase(&state.users(), &user.id, &payload.cart).await {
        Ok(receipt) => {
            let body = PurchaseResponse {
                success: true,
                message: format!("Purchased seeds for {} coins.", receipt.total_cost),
                coins: Some(receipt.coins),
                inventory: Some(receipt.inventory),
            };
            Json(body).into_response()
        }
        Err(err) => {
            tracing::info!(user_id = %user.id, error = %err, "purchase rejected");
            let err = AppError::from(err);
            PurchaseResponse::failure(err.status(), err.public_message())
        }
    }
}
