//! Promotional banners.

use serde_json::Value;

use rentadmin_core::envelope::AdapterResult;

use super::{AdapterContext, Endpoint, resource_path};
use crate::gateway::RequestOptions;
use crate::models::{Advertisement, AdvertisementPayload, ListQuery};

/// Advertisement CRUD.
#[derive(Debug, Clone)]
pub struct AdvertisementsAdapter {
    ctx: AdapterContext,
}

impl AdvertisementsAdapter {
    pub(crate) fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// List advertisements.
    pub async fn list(&self, query: &ListQuery) -> AdapterResult<Vec<Advertisement>> {
        self.ctx
            .list(
                &Endpoint::get("/advertisements", "Failed to fetch advertisements"),
                query,
            )
            .await
    }

    /// Create an advertisement.
    pub async fn create(&self, payload: &AdvertisementPayload) -> AdapterResult<Advertisement> {
        self.ctx
            .send(
                &Endpoint::post("/advertisements", "Failed to create advertisement"),
                payload,
            )
            .await
    }

    /// Update an advertisement.
    pub async fn update(
        &self,
        id: &str,
        payload: &AdvertisementPayload,
    ) -> AdapterResult<Advertisement> {
        let endpoint = Endpoint::put(
            resource_path("/advertisements", id, ""),
            "Failed to update advertisement",
        );
        self.ctx.send(&endpoint, payload).await
    }

    /// Delete an advertisement.
    pub async fn delete(&self, id: &str) -> AdapterResult<Value> {
        let endpoint = Endpoint::delete(
            resource_path("/advertisements", id, ""),
            "Failed to delete advertisement",
        );
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }
}
