//! Payment records (read-only).

use rentadmin_core::envelope::AdapterResult;

use super::{AdapterContext, Endpoint, resource_path};
use crate::gateway::RequestOptions;
use crate::models::{ListQuery, Page, Payment};

/// Payment lookups.
#[derive(Debug, Clone)]
pub struct PaymentsAdapter {
    ctx: AdapterContext,
}

impl PaymentsAdapter {
    pub(crate) fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// List payments.
    pub async fn list(&self, query: &ListQuery) -> AdapterResult<Page<Payment>> {
        self.ctx
            .list(
                &Endpoint::get("/admin/payments", "Failed to fetch payments"),
                query,
            )
            .await
    }

    /// Fetch one payment.
    pub async fn get(&self, id: &str) -> AdapterResult<Payment> {
        let endpoint = Endpoint::get(
            resource_path("/admin/payments", id, ""),
            "Failed to fetch payment",
        );
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }
}
