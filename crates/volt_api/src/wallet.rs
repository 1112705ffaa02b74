use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use volt_core::rewards::{self, RewardTier};

use crate::app_state::SharedState;
use crate::error::ApiError;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub rider_name: String,
    pub balance: u64,
    pub reward_points: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpRequest {
    pub amount: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsResponse {
    pub points: u32,
    pub tier: &'static RewardTier,
    pub next_tier: Option<&'static RewardTier>,
    pub points_to_next_tier: Option<u32>,
}

pub async fn get_wallet(
    State(app_state): State<SharedState>,
) -> Result<Json<WalletResponse>, ApiError> {
    let marketplace = app_state.lock()?;
    Ok(Json(WalletResponse {
        rider_name: marketplace.rider_name.clone(),
        balance: marketplace.wallet.balance(),
        reward_points: marketplace.reward_points,
    }))
}

/// Add funds to the rider wallet
pub async fn top_up(
    State(app_state): State<SharedState>,
    Json(payload): Json<TopUpRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    let mut marketplace = app_state.lock()?;
    let balance = marketplace.wallet.top_up(payload.amount)?;
    Ok(Json(WalletResponse {
        rider_name: marketplace.rider_name.clone(),
        balance,
        reward_points: marketplace.reward_points,
    }))
}

pub async fn get_rewards(Path(points): Path<u32>) -> Json<RewardsResponse> {
    Json(RewardsResponse {
        points,
        tier: rewards::tier_for(points),
        next_tier: rewards::next_tier(points),
        points_to_next_tier: rewards::points_to_next_tier(points),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::config::tests::test_config;
    use axum::{
        Router,
        routing::{get, post},
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_app() -> Router {
        let shared_state = Arc::new(AppState::new(test_config()));
        Router::new()
            .route("/wallet", get(get_wallet))
            .route("/wallet/top-up", post(top_up))
            .route("/rewards/{points}", get(get_rewards))
            .with_state(shared_state)
    }

    async fn top_up_request(app: &Router, amount: u64) -> (StatusCode, Vec<u8>) {
        let request = TopUpRequest { amount };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/wallet/top-up")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_get_wallet() {
        let app = create_app();
        let response = app
            .oneshot(Request::builder().uri("/wallet").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let wallet: WalletResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(wallet.rider_name, "Amit Patel");
        assert_eq!(wallet.balance, 500);
        assert_eq!(wallet.reward_points, 1250);
    }

    #[tokio::test]
    async fn test_top_up() {
        let app = create_app();
        let (status, body) = top_up_request(&app, 250).await;
        assert_eq!(status, StatusCode::OK);
        let wallet: WalletResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(wallet.balance, 750);

        let (status, _) = top_up_request(&app, 0).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_rewards() {
        let app = create_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rewards/1250")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let rewards: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(rewards["tier"]["name"], "Silver");
        assert_eq!(rewards["nextTier"]["name"], "Gold");
        assert_eq!(rewards["pointsToNextTier"], 750);
    }

    #[tokio::test]
    async fn test_rewards_at_top_tier() {
        let app = create_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rewards/7000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let rewards: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(rewards["tier"]["cashbackPercent"], 20);
        assert!(rewards["nextTier"].is_null());
        assert!(rewards["pointsToNextTier"].is_null());
    }
}
