//! Discount coupons.
//!
//! Coupon responses are only trusted when the body also reports a 2xx
//! `statusCode`.

use serde_json::Value;

use rentadmin_core::envelope::AdapterResult;

use super::{AdapterContext, Endpoint, resource_path};
use crate::gateway::RequestOptions;
use crate::models::{Coupon, CouponPayload, ListQuery};

/// Coupon CRUD.
#[derive(Debug, Clone)]
pub struct CouponsAdapter {
    ctx: AdapterContext,
}

impl CouponsAdapter {
    pub(crate) fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// List coupons.
    pub async fn list(&self, query: &ListQuery) -> AdapterResult<Vec<Coupon>> {
        let endpoint = Endpoint::get("/coupons", "Failed to fetch coupons").checking_status_code();
        self.ctx.list(&endpoint, query).await
    }

    /// Create a coupon.
    pub async fn create(&self, payload: &CouponPayload) -> AdapterResult<Coupon> {
        let endpoint = Endpoint::post("/coupons", "Failed to create coupon").checking_status_code();
        self.ctx.send(&endpoint, payload).await
    }

    /// Update a coupon.
    pub async fn update(&self, id: &str, payload: &CouponPayload) -> AdapterResult<Coupon> {
        let endpoint = Endpoint::put(resource_path("/coupons", id, ""), "Failed to update coupon")
            .checking_status_code();
        self.ctx.send(&endpoint, payload).await
    }

    /// Delete a coupon.
    pub async fn delete(&self, id: &str) -> AdapterResult<Value> {
        let endpoint =
            Endpoint::delete(resource_path("/coupons", id, ""), "Failed to delete coupon")
                .checking_status_code();
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::MockBackend;
    use pretty_assertions::assert_eq;
    use rentadmin_core::credentials::MemoryCredentialStore;
    use serde_json::json;

    async fn setup() -> (MockBackend, CouponsAdapter) {
        let backend = MockBackend::start().await;
        let coupons = backend
            .context(Arc::new(MemoryCredentialStore::with_token("tok123")))
            .coupons();
        (backend, coupons)
    }

    fn payload() -> CouponPayload {
        CouponPayload {
            code: Some("SUMMER10".to_string()),
            discount_type: Some("percentage".to_string()),
            discount_value: Some(10.0),
            ..CouponPayload::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_coupon_code_is_reported_verbatim() {
        let (backend, coupons) = setup().await;
        backend.respond(
            "POST",
            "/coupons",
            200,
            json!({"success": false, "message": "Invalid coupon code"}),
        );

        let result = coupons.create(&payload()).await;
        assert_eq!(result, AdapterResult::fail("Invalid coupon code"));
    }

    #[tokio::test]
    async fn test_invalid_coupon_code_on_error_status() {
        let (backend, coupons) = setup().await;
        backend.respond(
            "POST",
            "/coupons",
            400,
            json!({"statusCode": 400, "success": false, "message": "Invalid coupon code"}),
        );

        let result = coupons.create(&payload()).await;
        assert_eq!(result, AdapterResult::fail("Invalid coupon code"));
    }

    #[tokio::test]
    async fn test_create_requires_status_code() {
        let (backend, coupons) = setup().await;
        backend.respond(
            "POST",
            "/coupons",
            200,
            json!({"success": true, "data": {"_id": "k1", "code": "SUMMER10"}}),
        );

        let result = coupons.create(&payload()).await;
        assert_eq!(result, AdapterResult::fail("Failed to create coupon"));
    }

    #[tokio::test]
    async fn test_create_success() {
        let (backend, coupons) = setup().await;
        backend.respond(
            "POST",
            "/coupons",
            201,
            json!({
                "statusCode": 201,
                "success": true,
                "message": "Coupon created",
                "data": {"_id": "k1", "code": "SUMMER10", "discountType": "percentage", "discountValue": 10, "isActive": true}
            }),
        );

        let coupon = coupons.create(&payload()).await.into_result().unwrap();
        assert_eq!(coupon.code, "SUMMER10");
        assert!((coupon.discount_value - 10.0).abs() < f64::EPSILON);
        assert_eq!(
            backend.requests()[0].body,
            json!({"code": "SUMMER10", "discountType": "percentage", "discountValue": 10.0})
        );
    }

    #[tokio::test]
    async fn test_list() {
        let (backend, coupons) = setup().await;
        backend.respond(
            "GET",
            "/coupons",
            200,
            json!({"statusCode": 200, "success": true, "data": [{"_id": "k1", "code": "A"}, {"_id": "k2", "code": "B"}]}),
        );

        let list = coupons.list(&ListQuery::default()).await.into_result().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].code, "B");
    }

    #[tokio::test]
    async fn test_update_at_wrong_depth_is_not_success() {
        let (backend, coupons) = setup().await;
        backend.respond(
            "PUT",
            "/coupons/k1",
            200,
            json!({"statusCode": 200, "success": true, "data": {"coupon": {"_id": "k1"}}}),
        );

        let result = coupons.update("k1", &payload()).await;
        assert_eq!(result, AdapterResult::fail("Failed to update coupon"));
    }
}
