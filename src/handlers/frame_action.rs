//! Frame interaction pipeline
//!
//! `POST /api/frame/:id/action` runs the whole flow for one interaction:
//! validate the signed message, resolve the viewer address, load the frame,
//! run its verification strategy, load the catalog, recommend a product and
//! assemble the response document. Every stage failure short-circuits to an
//! error frame; the request never fails with a bare status code.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::error::FrameActionError;
use crate::frame_html::{default_error_frame, error_frame, FrameButton, FrameHtml};
use crate::services::neynar::FrameActionPayload;

/// Handle one frame interaction.
pub async fn frame_action(
    State(state): State<AppState>,
    Path(id_part): Path<String>,
    Json(payload): Json<FrameActionPayload>,
) -> Html<String> {
    match process(&state, &id_part, payload).await {
        Ok(html) => Html(html),
        Err(FrameActionError::NoProductsAvailable(shop)) => {
            warn!(shop = %shop, "no products available for recommendation");
            Html(error_frame(&state.config.base_url, "No products available"))
        }
        Err(err) => {
            info!(id = %id_part, error = %err, "frame action rejected");
            Html(default_error_frame(&state.config.base_url))
        }
    }
}

async fn process(
    state: &AppState,
    id_part: &str,
    payload: FrameActionPayload,
) -> Result<String, FrameActionError> {
    // Validate frame message and get account address
    let message = state.verifier.validate(&payload).await.map_err(|err| {
        info!(error = %err, "frame message validation call failed");
        FrameActionError::InvalidSignature
    })?;

    if !message.is_valid {
        return Err(FrameActionError::InvalidSignature);
    }

    let dev = message.input.is_some();
    let account_address = message.account_address();

    let frame_id: i64 = id_part
        .parse()
        .map_err(|_| FrameActionError::MalformedRequest(id_part.to_string()))?;

    let frame = state
        .store
        .frame_by_id(frame_id)
        .await?
        .ok_or(FrameActionError::FrameNotFound(frame_id))?;

    // Get onchain data
    let outcome = state
        .verification
        .run(frame.matching_criteria, &account_address)
        .await
        .map_err(|err| {
            warn!(
                frame_id,
                address = %account_address,
                criteria = ?frame.matching_criteria,
                error = %err,
                "attestation lookup failed"
            );
            err
        })?;

    // Get products and recommend one
    let products = state.store.products_by_shop(&frame.shop).await?;

    let recommendation = state
        .policy
        .recommend(
            frame.matching_criteria,
            &outcome,
            &products,
            &account_address,
            &mut rand::thread_rng(),
        )
        .map_err(|_| FrameActionError::NoProductsAvailable(frame.shop.clone()))?;

    let mut buttons = vec![FrameButton::link(
        "View",
        format!(
            "https://{}/products/{}",
            frame.shop, recommendation.product.handle
        ),
    )];

    if let Some(variant_id) = &recommendation.product.variant_id {
        buttons.push(FrameButton::link(
            "Buy",
            format!("https://{}/cart/{variant_id}:1", frame.shop),
        ));
    }

    if dev {
        buttons.push(FrameButton::post(
            "Explain",
            format!("{}/api/frame/{frame_id}/explain", state.config.base_url),
        ));
    }

    let html = FrameHtml {
        buttons,
        image_src: recommendation.image_src,
        og_title: "Target Onchain".to_string(),
        og_description: recommendation.product.title.clone(),
        post_url: format!("{}/api/frame", state.config.base_url),
        state: dev.then(|| json!({ "description": recommendation.explanation })),
    }
    .render();

    Ok(html)
}

/// Dev-mode `Explain` target: renders the explanation carried in the
/// round-tripped frame state as an og image.
pub async fn frame_explain(
    State(state): State<AppState>,
    Path(_id_part): Path<String>,
    Json(payload): Json<FrameActionPayload>,
) -> Html<String> {
    let message = match state.verifier.validate(&payload).await {
        Ok(message) if message.is_valid => message,
        Ok(_) | Err(_) => {
            info!("explain message not valid");
            return Html(default_error_frame(&state.config.base_url));
        }
    };

    let description = payload
        .untrusted_data
        .as_ref()
        .and_then(|data| data.get("state"))
        .and_then(|value| value.as_str())
        .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
        .and_then(|parsed| {
            parsed
                .get("description")
                .and_then(|d| d.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            format!(
                "No explanation recorded for {}",
                message.account_address()
            )
        });

    Html(error_frame(&state.config.base_url, &description))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use tower::ServiceExt;

    use crate::app_state::AppState;
    use crate::config::AppConfig;
    use crate::models::{
        CreateFrameRequest, EditFrameRequest, Frame, MatchingCriteria, Product,
    };
    use crate::routes;
    use crate::services::attestation::{
        Attestation, AttestationError, AttestationIndex, AttestationSchema,
    };
    use crate::services::catalog::FrameStore;
    use crate::services::neynar::{
        FrameActionPayload, FrameMessageVerifier, ValidatedFrameMessage,
    };
    use crate::services::recommendation::RecommendationPolicy;
    use crate::services::verification::VerificationEngine;

    struct FakeStore {
        frames: Vec<Frame>,
        products: Vec<Product>,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl FrameStore for FakeStore {
        async fn frame_by_id(&self, id: i64) -> Result<Option<Frame>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.frames.iter().find(|frame| frame.id == id).cloned())
        }

        async fn list_frames(&self) -> Result<Vec<Frame>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.frames.clone())
        }

        async fn create_frame(&self, _request: CreateFrameRequest) -> Result<Frame> {
            anyhow::bail!("not used in these tests")
        }

        async fn update_frame(&self, _request: EditFrameRequest) -> Result<Option<Frame>> {
            anyhow::bail!("not used in these tests")
        }

        async fn delete_frame(&self, _id: i64) -> Result<bool> {
            anyhow::bail!("not used in these tests")
        }

        async fn products_by_shop(&self, shop: &str) -> Result<Vec<Product>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .products
                .iter()
                .filter(|product| product.shop == shop)
                .cloned()
                .collect())
        }
    }

    struct FakeVerifier {
        message: ValidatedFrameMessage,
    }

    #[async_trait]
    impl FrameMessageVerifier for FakeVerifier {
        async fn validate(&self, _payload: &FrameActionPayload) -> Result<ValidatedFrameMessage> {
            Ok(self.message.clone())
        }
    }

    struct FakeIndex {
        attestations: Vec<Attestation>,
    }

    #[async_trait]
    impl AttestationIndex for FakeIndex {
        async fn valid_attestations(
            &self,
            _recipient: &str,
            _schema: Option<&str>,
            _attester: Option<&str>,
        ) -> Result<Vec<Attestation>, AttestationError> {
            Ok(self.attestations.clone())
        }
    }

    fn frame(id: i64, criteria: MatchingCriteria) -> Frame {
        Frame {
            id,
            shop: "shop.example.com".to_string(),
            title: "Shop frame".to_string(),
            image: "https://cdn.example.com/frame.png".to_string(),
            button: "Find my product".to_string(),
            matching_criteria: criteria,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(description: &str) -> Product {
        Product {
            id: 1,
            shop: "shop.example.com".to_string(),
            title: "Limited Mug".to_string(),
            description: description.to_string(),
            image: "https://cdn.example.com/mug.png".to_string(),
            handle: "limited-mug".to_string(),
            variant_id: Some("123".to_string()),
            variant_formatted_price: "$10.00".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn attestation() -> Attestation {
        Attestation {
            id: "0x01".to_string(),
            attester: "0xAttester".to_string(),
            recipient: "0xABC".to_string(),
            ref_uid: "0x00".to_string(),
            revocable: true,
            revocation_time: 0,
            revoked: false,
            expiration_time: 0,
            data: "0x".to_string(),
            schema: AttestationSchema {
                id: "0xSchema".to_string(),
            },
        }
    }

    struct Setup {
        store: Arc<FakeStore>,
        state: AppState,
    }

    fn setup(
        message: ValidatedFrameMessage,
        frames: Vec<Frame>,
        products: Vec<Product>,
        attestations: Vec<Attestation>,
    ) -> Setup {
        let config = Arc::new(AppConfig {
            base_url: "http://localhost:3001".to_string(),
            eas_scan_url: "http://localhost:0/graphql".to_string(),
            neynar_api_key: String::new(),
            receipts_running_schema: "0xRunning".to_string(),
            receipts_attester: "0xReceipts".to_string(),
            coinbase_country_schema: "0xCountry".to_string(),
            coinbase_account_schema: "0xAccount".to_string(),
            coinbase_one_schema: "0xOne".to_string(),
            coinbase_attester: "0xCoinbase".to_string(),
            stores_data_path: "data/stores.json".to_string(),
        });

        let store = Arc::new(FakeStore {
            frames,
            products,
            reads: AtomicUsize::new(0),
        });

        let state = AppState::new(
            store.clone(),
            Arc::new(FakeVerifier { message }),
            Arc::new(VerificationEngine::new(
                Arc::new(FakeIndex { attestations }),
                config.clone(),
            )),
            Arc::new(RecommendationPolicy::new(config.base_url.clone())),
            config,
        );

        Setup { store, state }
    }

    fn valid_message(input: Option<&str>) -> ValidatedFrameMessage {
        ValidatedFrameMessage {
            is_valid: true,
            input: input.map(str::to_string),
            verified_accounts: vec!["0xWallet".to_string()],
        }
    }

    async fn post_action(state: AppState, path: &str) -> (StatusCode, String) {
        let app = routes::frame_routes().with_state(state);
        let body = serde_json::json!({
            "untrustedData": {},
            "trustedData": { "messageBytes": "0xdead" }
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn account_verification_end_to_end() {
        let setup = setup(
            valid_message(Some("0xABC")),
            vec![frame(42, MatchingCriteria::CoinbaseOnchainVerificationsAccount)],
            vec![product("Special Edition")],
            vec![attestation()],
        );

        let (status, html) = post_action(setup.state, "/api/frame/42/action").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("https://shop.example.com/products/limited-mug"));
        assert!(html.contains("fc:frame:button:1\" content=\"View\""));
        assert!(html.contains("https://shop.example.com/cart/123:1"));
        // Dev mode: explain button plus the explanation in the state.
        assert!(html.contains("fc:frame:button:3\" content=\"Explain\""));
        assert!(html.contains("Coinbase account member attestation for 0xABC"));
    }

    #[tokio::test]
    async fn non_numeric_id_short_circuits_before_any_store_read() {
        let setup = setup(
            valid_message(None),
            vec![frame(42, MatchingCriteria::CoinbaseOnchainVerificationsAccount)],
            vec![product("Special Edition")],
            vec![attestation()],
        );
        let store = setup.store.clone();

        let (status, html) = post_action(setup.state, "/api/frame/notanumber/action").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Something went wrong"));
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_signature_returns_default_error_frame() {
        let setup = setup(
            ValidatedFrameMessage::default(),
            vec![frame(42, MatchingCriteria::CoinbaseOnchainVerificationsAccount)],
            vec![product("Special Edition")],
            vec![attestation()],
        );

        let (_, html) = post_action(setup.state, "/api/frame/42/action").await;
        assert!(html.contains("Something went wrong"));
    }

    #[tokio::test]
    async fn missing_frame_returns_default_error_frame() {
        let setup = setup(valid_message(None), vec![], vec![product("x")], vec![]);

        let (_, html) = post_action(setup.state, "/api/frame/42/action").await;
        assert!(html.contains("Something went wrong"));
    }

    #[tokio::test]
    async fn empty_catalog_returns_distinct_error_frame() {
        let setup = setup(
            valid_message(None),
            vec![frame(42, MatchingCriteria::CoinbaseOnchainVerificationsAccount)],
            vec![],
            vec![attestation()],
        );

        let (_, html) = post_action(setup.state, "/api/frame/42/action").await;
        assert!(html.contains("No products available"));
        assert!(!html.contains("Something went wrong"));
    }

    #[tokio::test]
    async fn unknown_criteria_still_recommends_a_product() {
        let setup = setup(
            valid_message(None),
            vec![frame(42, MatchingCriteria::PoapsOwned)],
            vec![product("A plain mug")],
            vec![],
        );

        let (_, html) = post_action(setup.state, "/api/frame/42/action").await;
        assert!(html.contains("https://shop.example.com/products/limited-mug"));
    }

    #[tokio::test]
    async fn non_dev_interaction_has_no_explain_button_or_state() {
        let setup = setup(
            valid_message(None),
            vec![frame(42, MatchingCriteria::CoinbaseOnchainVerificationsAccount)],
            vec![product("Special Edition")],
            vec![attestation()],
        );

        let (_, html) = post_action(setup.state, "/api/frame/42/action").await;
        assert!(!html.contains("Explain"));
        assert!(!html.contains("fc:frame:state"));
    }
}
