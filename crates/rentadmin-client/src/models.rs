//! Resource shapes exchanged with the backend.
//!
//! Ids accept both `id` and Mongo-style `_id` and are required, so an object
//! at the wrong depth does not decode as a record. Fields the console does
//! not use are ignored on read.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination block returned next to list payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// Current page (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total matching records.
    #[serde(alias = "totalItems", alias = "totalDocs")]
    pub total: u64,
    /// Number of pages.
    #[serde(alias = "pages")]
    pub total_pages: u32,
}

/// A page of records.
///
/// The backend names the list field after the resource (`cars`, `users`,
/// `payments`) or simply `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page.
    #[serde(
        alias = "data",
        alias = "cars",
        alias = "users",
        alias = "payments",
        alias = "docs"
    )]
    pub items: Vec<T>,

    /// Pagination, when the endpoint paginates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Free-text search.
    pub search: Option<String>,
    /// Status filter.
    pub status: Option<String>,
}

impl ListQuery {
    /// Query string pairs, omitting unset fields.
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status".to_string(), status.to_string()));
        }
        pairs
    }
}

/// Login form.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Admin email.
    pub email: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login payload.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// The signed-in admin.
    pub user: User,
    /// Session token issued by the backend.
    pub access_token: String,
}

impl std::fmt::Debug for LoginData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginData")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// A rentable car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Manufacturer.
    #[serde(default)]
    pub make: String,
    /// Model name.
    #[serde(default)]
    pub model: String,
    /// Model year.
    pub year: Option<u16>,
    /// Daily price.
    pub price_per_day: Option<f64>,
    /// Pickup location.
    pub location: Option<String>,
    /// Listing status.
    pub status: Option<String>,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Owning vendor, as the backend sends it.
    pub vendor: Option<Value>,
}

/// Create/update body for a car.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPayload {
    /// Manufacturer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    /// Model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Model year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// Daily price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_day: Option<f64>,
    /// Pickup location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Listing status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Image URLs, usually from the media uploader.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Role (`admin`, `vendor`, `user`).
    pub role: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Whether the account may sign in.
    #[serde(default)]
    pub is_active: bool,
    /// Creation timestamp as sent by the backend.
    pub created_at: Option<String>,
}

/// Body of the user status toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    /// New active flag.
    pub is_active: bool,
}

/// A vendor account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    /// Id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Contact name.
    #[serde(default)]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Business name.
    pub business_name: Option<String>,
    /// Whether the vendor was verified.
    #[serde(default)]
    pub is_verified: bool,
}

/// A discount coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Code entered at checkout.
    #[serde(default)]
    pub code: String,
    /// `percentage` or `fixed`.
    pub discount_type: Option<String>,
    /// Discount amount.
    #[serde(default)]
    pub discount_value: f64,
    /// Expiry timestamp.
    pub expires_at: Option<String>,
    /// Maximum redemptions.
    pub usage_limit: Option<u32>,
    /// Whether the coupon can be redeemed.
    #[serde(default)]
    pub is_active: bool,
}

/// Create/update body for a coupon.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponPayload {
    /// Code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// `percentage` or `fixed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<String>,
    /// Discount amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<f64>,
    /// Expiry timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Maximum redemptions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    /// Active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A promotional banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    /// Id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Body text.
    pub description: Option<String>,
    /// Banner image URL.
    pub image_url: Option<String>,
    /// Click-through link.
    pub link: Option<String>,
    /// Whether the banner is shown.
    #[serde(default)]
    pub is_active: bool,
    /// Start of the campaign.
    pub start_date: Option<String>,
    /// End of the campaign.
    pub end_date: Option<String>,
}

/// Create/update body for an advertisement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementPayload {
    /// Title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Banner image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Click-through link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Start of the campaign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End of the campaign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Amount charged.
    #[serde(default)]
    pub amount: f64,
    /// Currency code.
    pub currency: Option<String>,
    /// Payment status.
    pub status: Option<String>,
    /// Payment method.
    pub method: Option<String>,
    /// Paying user, as the backend sends it.
    pub user: Option<Value>,
    /// Related booking id.
    pub booking: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

/// A parking spot submitted for approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    /// Id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Listing title.
    #[serde(default, alias = "name")]
    pub title: String,
    /// Street address.
    pub address: Option<String>,
    /// Hourly price.
    pub price_per_hour: Option<f64>,
    /// `pending`, `approved` or `rejected`.
    pub status: Option<String>,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
    /// Owner, as the backend sends it.
    pub owner: Option<Value>,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Body of a parking rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectParking {
    /// Shown to the owner.
    pub reason: String,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    /// Registered users.
    pub total_users: u64,
    /// Registered vendors.
    pub total_vendors: u64,
    /// Listed cars.
    pub total_cars: u64,
    /// Bookings made.
    pub total_bookings: u64,
    /// Revenue to date.
    pub total_revenue: f64,
    /// Parking spots awaiting review.
    pub pending_parkings: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_page_accepts_backend_list_names() {
        let page: Page<Car> = serde_json::from_value(json!({
            "cars": [{"_id": "c1", "make": "Toyota", "model": "Corolla"}],
            "pagination": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
        }))
        .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "c1");
        assert_eq!(page.pagination.unwrap().total_pages, 1);

        let nested: Page<User> =
            serde_json::from_value(json!({"data": [{"id": "u1", "email": "a@b.c"}]})).unwrap();
        assert_eq!(nested.items[0].email, "a@b.c");
        assert!(nested.pagination.is_none());
    }

    #[test]
    fn test_list_query_pairs() {
        let query = ListQuery {
            page: Some(2),
            limit: None,
            search: Some(String::new()),
            status: Some("active".to_string()),
        };
        assert_eq!(
            query.pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("status".to_string(), "active".to_string()),
            ]
        );
        assert!(ListQuery::default().pairs().is_empty());
    }

    #[test]
    fn test_payload_skips_unset_fields() {
        let payload = CouponPayload {
            code: Some("SUMMER10".to_string()),
            discount_value: Some(10.0),
            ..CouponPayload::default()
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"code": "SUMMER10", "discountValue": 10.0})
        );
    }

    #[test]
    fn test_login_debug_redacts() {
        let login = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{login:?}").contains("hunter2"));
    }

    #[test]
    fn test_records_require_an_id() {
        let wrapped = json!({"car": {"_id": "c1"}});
        assert!(serde_json::from_value::<Car>(wrapped.clone()).is_err());
        assert!(serde_json::from_value::<User>(wrapped.clone()).is_err());
        assert!(serde_json::from_value::<Vendor>(wrapped.clone()).is_err());
        assert!(serde_json::from_value::<Coupon>(wrapped.clone()).is_err());
        assert!(serde_json::from_value::<Advertisement>(wrapped.clone()).is_err());
        assert!(serde_json::from_value::<Payment>(wrapped.clone()).is_err());
        assert!(serde_json::from_value::<ParkingSpot>(wrapped).is_err());

        let car: Car = serde_json::from_value(json!({"_id": "c1"})).unwrap();
        assert_eq!(car.id, "c1");
        assert!(car.make.is_empty());
        assert!(car.images.is_empty());
    }
}
