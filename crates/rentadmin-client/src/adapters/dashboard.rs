//! Dashboard metrics.

use rentadmin_core::envelope::AdapterResult;

use super::{AdapterContext, Endpoint};
use crate::gateway::RequestOptions;
use crate::models::DashboardStats;

/// Dashboard widgets.
#[derive(Debug, Clone)]
pub struct DashboardAdapter {
    ctx: AdapterContext,
}

impl DashboardAdapter {
    pub(crate) fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// Headline numbers.
    pub async fn stats(&self) -> AdapterResult<DashboardStats> {
        let endpoint = Endpoint::get("/admin/dashboard/stats", "Failed to fetch dashboard stats");
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }
}
