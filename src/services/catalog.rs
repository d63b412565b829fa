//! Frame and product persistence
//!
//! Read paths feed the interaction pipeline; write paths back the frame
//! authoring API. Products are synced from the storefront by a separate
//! process and are read-only here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::models::{CreateFrameRequest, EditFrameRequest, Frame, Product};

/// Store access for frames and the product catalog.
#[async_trait]
pub trait FrameStore: Send + Sync {
    async fn frame_by_id(&self, id: i64) -> Result<Option<Frame>>;
    async fn list_frames(&self) -> Result<Vec<Frame>>;
    async fn create_frame(&self, request: CreateFrameRequest) -> Result<Frame>;
    async fn update_frame(&self, request: EditFrameRequest) -> Result<Option<Frame>>;
    async fn delete_frame(&self, id: i64) -> Result<bool>;
    async fn products_by_shop(&self, shop: &str) -> Result<Vec<Product>>;
}

/// Postgres-backed store.
pub struct PgFrameStore {
    pool: PgPool,
}

impl PgFrameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FrameStore for PgFrameStore {
    async fn frame_by_id(&self, id: i64) -> Result<Option<Frame>> {
        let frame = sqlx::query_as::<_, Frame>("SELECT * FROM frames WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to load frame")?;

        Ok(frame)
    }

    async fn list_frames(&self) -> Result<Vec<Frame>> {
        let frames = sqlx::query_as::<_, Frame>("SELECT * FROM frames ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list frames")?;

        Ok(frames)
    }

    async fn create_frame(&self, request: CreateFrameRequest) -> Result<Frame> {
        let frame = sqlx::query_as::<_, Frame>(
            r#"
            INSERT INTO frames (shop, title, image, button, matching_criteria, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(&request.shop)
        .bind(&request.title)
        .bind(&request.image)
        .bind(&request.button)
        .bind(request.matching_criteria)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert frame")?;

        Ok(frame)
    }

    async fn update_frame(&self, request: EditFrameRequest) -> Result<Option<Frame>> {
        let frame = sqlx::query_as::<_, Frame>(
            r#"
            UPDATE frames
            SET title = $1, image = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&request.title)
        .bind(&request.image)
        .bind(Utc::now())
        .bind(request.id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update frame")?;

        Ok(frame)
    }

    async fn delete_frame(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM frames WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete frame")?;

        Ok(result.rows_affected() > 0)
    }

    async fn products_by_shop(&self, shop: &str) -> Result<Vec<Product>> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE shop = $1 ORDER BY id")
                .bind(shop)
                .fetch_all(&self.pool)
                .await
                .context("Failed to load products")?;

        Ok(products)
    }
}
