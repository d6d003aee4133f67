//! User and vendor administration.

use serde_json::Value;

use rentadmin_core::envelope::{AdapterResult, UnwrapPath};

use super::{AdapterContext, Endpoint, resource_path};
use crate::gateway::RequestOptions;
use crate::models::{ListQuery, Page, User, UserStatus, Vendor};

/// The user list is wrapped one level deeper than every other list.
const USER_PAGE: UnwrapPath = UnwrapPath::new(&["data"]);
const VENDORS: UnwrapPath = UnwrapPath::new(&["vendors"]);

/// User management.
#[derive(Debug, Clone)]
pub struct UsersAdapter {
    ctx: AdapterContext,
}

impl UsersAdapter {
    pub(crate) fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// List users.
    pub async fn list(&self, query: &ListQuery) -> AdapterResult<Page<User>> {
        let endpoint = Endpoint::get("/admin/users", "Failed to fetch users").unwrapping(USER_PAGE);
        self.ctx.list(&endpoint, query).await
    }

    /// Fetch one user.
    pub async fn get(&self, id: &str) -> AdapterResult<User> {
        let endpoint = Endpoint::get(resource_path("/admin/users", id, ""), "Failed to fetch user");
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }

    /// Activate or deactivate an account.
    pub async fn set_active(&self, id: &str, is_active: bool) -> AdapterResult<User> {
        let endpoint = Endpoint::patch(
            resource_path("/admin/users", id, "/status"),
            "Failed to update user status",
        );
        self.ctx.send(&endpoint, &UserStatus { is_active }).await
    }

    /// Delete a user.
    pub async fn delete(&self, id: &str) -> AdapterResult<Value> {
        let endpoint = Endpoint::delete(resource_path("/admin/users", id, ""), "Failed to delete user");
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }

    /// List vendors.
    pub async fn list_vendors(&self) -> AdapterResult<Vec<Vendor>> {
        let endpoint = Endpoint::get("/admin/vendors", "Failed to fetch vendors").unwrapping(VENDORS);
        self.ctx.call(&endpoint, RequestOptions::default()).await
    }
}
