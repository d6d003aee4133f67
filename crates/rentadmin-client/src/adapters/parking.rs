//! Parking spot approvals.

use rentadmin_core::envelope::{AdapterResult, UnwrapPath};

use super::{AdapterContext, Endpoint, resource_path};
use crate::gateway::RequestOptions;
use crate::models::{ParkingSpot, RejectParking};

const PARKINGS: UnwrapPath = UnwrapPath::new(&["parkings"]);

/// Review queue for submitted parking spots.
#[derive(Debug, Clone)]
pub struct ParkingAdapter {
    ctx: AdapterContext,
}

impl ParkingAdapter {
    pub(crate) fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// Spots awaiting review.
    pub async fn list_pending(&self) -> AdapterResult<Vec<ParkingSpot>> {
        let endpoint = Endpoint::get("/admin/parkings/pending", "Failed to fetch pending parkings")
            .unwrapping(PARKINGS);
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }

    /// Approve a spot.
    pub async fn approve(&self, id: &str) -> AdapterResult<ParkingSpot> {
        let endpoint = Endpoint::patch(
            resource_path("/admin/parkings", id, "/approve"),
            "Failed to approve parking",
        );
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }

    /// Reject a spot, telling the owner why.
    pub async fn reject(&self, id: &str, reason: &str) -> AdapterResult<ParkingSpot> {
        let endpoint = Endpoint::patch(
            resource_path("/admin/parkings", id, "/reject"),
            "Failed to reject parking",
        );
        let body = RejectParking {
            reason: reason.to_string(),
        };
        self.ctx.send(&endpoint, &body).await
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

    async fn setup() -> (MockBackend, ParkingAdapter) {
        let backend = MockBackend::start().await;
        let parking = backend
            .context(Arc::new(MemoryCredentialStore::with_token("tok123")))
            .parking();
        (backend, parking)
    }

    #[tokio::test]
    async fn test_pending_under_named_key() {
        let (backend, parking) = setup().await;
        backend.respond(
            "GET",
            "/admin/parkings/pending",
            200,
            json!({"success": true, "data": {"parkings": [{"_id": "s1", "name": "Garage A", "status": "pending"}]}}),
        );

        let spots = parking.list_pending().await.into_result().unwrap();
        assert_eq!(spots[0].title, "Garage A");
    }

    #[tokio::test]
    async fn test_reject_sends_reason() {
        let (backend, parking) = setup().await;
        backend.respond(
            "PATCH",
            "/admin/parkings/s1/reject",
            200,
            json!({"success": true, "message": "Parking rejected", "data": {"_id": "s1", "status": "rejected", "rejectionReason": "Blurry photos"}}),
        );

        let result = parking.reject("s1", "Blurry photos").await;
        assert!(result.success);
        assert_eq!(
            result.data.unwrap().rejection_reason.as_deref(),
            Some("Blurry photos")
        );
        assert_eq!(backend.requests()[0].body, json!({"reason": "Blurry photos"}));
    }

    #[tokio::test]
    async fn test_approve_rejected_by_backend() {
        let (backend, parking) = setup().await;
        backend.respond(
            "PATCH",
            "/admin/parkings/s1/approve",
            409,
            json!({"success": false, "message": "Parking already approved"}),
        );

        let result = parking.approve("s1").await;
        assert_eq!(result, AdapterResult::fail("Parking already approved"));
    }

    #[tokio::test]
    async fn test_approve_at_wrong_depth_is_not_success() {
        let (backend, parking) = setup().await;
        backend.respond(
            "PATCH",
            "/admin/parkings/s1/approve",
            200,
            json!({"success": true, "data": {"parking": {"_id": "s1"}}}),
        );

        let result = parking.approve("s1").await;
        assert!(!result.success);
        assert!(result.data.is_none());
    }
}
