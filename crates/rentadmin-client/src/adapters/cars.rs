//! Car listings.

use serde_json::Value;

use rentadmin_core::envelope::AdapterResult;

use super::{AdapterContext, Endpoint, resource_path};
use crate::gateway::RequestOptions;
use crate::models::{Car, CarPayload, ListQuery, Page};

/// Car CRUD.
#[derive(Debug, Clone)]
pub struct CarsAdapter {
    ctx: AdapterContext,
}

impl CarsAdapter {
    pub(crate) fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// List cars.
    pub async fn list(&self, query: &ListQuery) -> AdapterResult<Page<Car>> {
        self.ctx
            .list(&Endpoint::get("/cars", "Failed to fetch cars"), query)
            .await
    }

    /// Fetch one car.
    pub async fn get(&self, id: &str) -> AdapterResult<Car> {
        let endpoint = Endpoint::get(resource_path("/cars", id, ""), "Failed to fetch car");
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }

    /// Create a car.
    pub async fn create(&self, payload: &CarPayload) -> AdapterResult<Car> {
        self.ctx
            .send(&Endpoint::post("/cars", "Failed to create car"), payload)
            .await
    }

    /// Update a car.
    pub async fn update(&self, id: &str, payload: &CarPayload) -> AdapterResult<Car> {
        let endpoint = Endpoint::put(resource_path("/cars", id, ""), "Failed to update car");
        self.ctx.send(&endpoint, payload).await
    }

    /// Delete a car.
    pub async fn delete(&self, id: &str) -> AdapterResult<Value> {
        let endpoint = Endpoint::delete(resource_path("/cars", id, ""), "Failed to delete car");
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }
}
