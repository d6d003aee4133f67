//! Resource commands: thin wrappers over the domain adapters.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use rentadmin_client::AdapterContext;
use rentadmin_client::models::{
    AdvertisementPayload, CarPayload, CouponPayload, ListQuery, Page, Pagination,
};
use rentadmin_core::config::Config;
use rentadmin_core::envelope::{AdapterResult, NO_ACCESS_TOKEN_MESSAGE};

use super::upload::upload_images;
use crate::ui;

/// Paging and filtering shared by list commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Status filter
    #[arg(long)]
    pub status: Option<String>,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
            status: self.status.clone(),
        }
    }
}

/// Car fields for create/update.
#[derive(Debug, Clone, Default, Args)]
pub struct CarFields {
    /// Manufacturer
    #[arg(long)]
    pub make: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Model year
    #[arg(long)]
    pub year: Option<u16>,

    /// Daily price
    #[arg(long)]
    pub price: Option<f64>,

    /// Pickup location
    #[arg(long)]
    pub location: Option<String>,

    /// Listing status
    #[arg(long)]
    pub status: Option<String>,

    /// Image files to upload and attach
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

/// Car commands.
#[derive(Debug, Subcommand)]
pub enum CarCommands {
    /// List cars
    List(ListArgs),
    /// Show one car
    Get {
        /// Car id
        id: String,
    },
    /// Create a car
    Create(CarFields),
    /// Update a car
    Update {
        /// Car id
        id: String,
        #[command(flatten)]
        fields: CarFields,
    },
    /// Delete a car
    Delete {
        /// Car id
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// User commands.
#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// List users
    List(ListArgs),
    /// Show one user
    Get {
        /// User id
        id: String,
    },
    /// Allow a user to sign in
    Activate {
        /// User id
        id: String,
    },
    /// Block a user from signing in
    Deactivate {
        /// User id
        id: String,
    },
    /// Delete a user
    Delete {
        /// User id
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// List vendors
    Vendors {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
}

/// Coupon fields for create/update.
#[derive(Debug, Clone, Default, Args)]
pub struct CouponFields {
    /// Code entered at checkout
    #[arg(long)]
    pub code: Option<String>,

    /// `percentage` or `fixed`
    #[arg(long)]
    pub discount_type: Option<String>,

    /// Discount amount
    #[arg(long)]
    pub value: Option<f64>,

    /// Expiry timestamp
    #[arg(long)]
    pub expires_at: Option<String>,

    /// Maximum redemptions
    #[arg(long)]
    pub usage_limit: Option<u32>,

    /// Active flag
    #[arg(long)]
    pub active: Option<bool>,
}

impl From<CouponFields> for CouponPayload {
    fn from(fields: CouponFields) -> Self {
        Self {
            code: fields.code,
            discount_type: fields.discount_type,
            discount_value: fields.value,
            expires_at: fields.expires_at,
            usage_limit: fields.usage_limit,
            is_active: fields.active,
        }
    }
}

/// Coupon commands.
#[derive(Debug, Subcommand)]
pub enum CouponCommands {
    /// List coupons
    List(ListArgs),
    /// Create a coupon
    Create(CouponFields),
    /// Update a coupon
    Update {
        /// Coupon id
        id: String,
        #[command(flatten)]
        fields: CouponFields,
    },
    /// Delete a coupon
    Delete {
        /// Coupon id
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Advertisement fields for create/update.
#[derive(Debug, Clone, Default, Args)]
pub struct AdFields {
    /// Title
    #[arg(long)]
    pub title: Option<String>,

    /// Body text
    #[arg(long)]
    pub description: Option<String>,

    /// Banner image URL
    #[arg(long, conflicts_with = "image")]
    pub image_url: Option<String>,

    /// Banner image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Click-through link
    #[arg(long)]
    pub link: Option<String>,

    /// Active flag
    #[arg(long)]
    pub active: Option<bool>,

    /// Campaign start
    #[arg(long)]
    pub start_date: Option<String>,

    /// Campaign end
    #[arg(long)]
    pub end_date: Option<String>,
}

/// Advertisement commands.
#[derive(Debug, Subcommand)]
pub enum AdCommands {
    /// List advertisements
    List(ListArgs),
    /// Create an advertisement
    Create(AdFields),
    /// Update an advertisement
    Update {
        /// Advertisement id
        id: String,
        #[command(flatten)]
        fields: AdFields,
    },
    /// Delete an advertisement
    Delete {
        /// Advertisement id
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Payment commands.
#[derive(Debug, Subcommand)]
pub enum PaymentCommands {
    /// List payments
    List(ListArgs),
    /// Show one payment
    Get {
        /// Payment id
        id: String,
    },
}

/// Parking approval commands.
#[derive(Debug, Subcommand)]
pub enum ParkingCommands {
    /// List spots awaiting review
    Pending {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Approve a spot
    Approve {
        /// Parking spot id
        id: String,
    },
    /// Reject a spot
    Reject {
        /// Parking spot id
        id: String,
        /// Reason shown to the owner
        #[arg(long)]
        reason: String,
    },
}

fn confirmed(yes: bool, resource: &str, id: &str) -> Result<bool> {
    if yes || ui::prompts::confirm_delete(resource, id)? {
        return Ok(true);
    }
    ui::info("Cancelled");
    Ok(false)
}

fn print_pagination(pagination: Option<&Pagination>) {
    if let Some(p) = pagination {
        ui::info(&format!(
            "Page {} of {} ({} total)",
            p.page, p.total_pages, p.total
        ));
    }
}

/// Print a list result as JSON or as a table.
fn print_list<T: Serialize>(
    result: AdapterResult<Vec<T>>,
    json: bool,
    columns: &[(&str, usize)],
    row: impl Fn(&T) -> Vec<String>,
) -> Result<bool> {
    print_page(
        result.map(|items| Page {
            items,
            pagination: None,
        }),
        json,
        columns,
        row,
    )
}

fn print_page<T: Serialize>(
    result: AdapterResult<Page<T>>,
    json: bool,
    columns: &[(&str, usize)],
    row: impl Fn(&T) -> Vec<String>,
) -> Result<bool> {
    let Some(page) = ui::toast(result, "Fetched") else {
        return Ok(false);
    };
    if json {
        ui::json(&page)?;
        return Ok(true);
    }

    ui::table_header(columns);
    for item in &page.items {
        let cells = row(item);
        let cols: Vec<(&str, usize)> = cells
            .iter()
            .zip(columns)
            .map(|(cell, (_, width))| (cell.as_str(), *width))
            .collect();
        ui::table_row(&cols);
    }
    print_pagination(page.pagination.as_ref());
    Ok(true)
}

/// Print a single-item result as pretty JSON.
fn print_one<T: Serialize>(result: AdapterResult<T>, done: &str) -> Result<bool> {
    match ui::toast(result, done) {
        Some(item) => {
            ui::json(&item)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn yes_no(value: bool) -> String {
    String::from(if value { "yes" } else { "no" })
}

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Run a car command.
pub async fn run_cars(ctx: &AdapterContext, config: &Config, command: CarCommands) -> Result<bool> {
    let cars = ctx.cars();
    match command {
        CarCommands::List(args) => print_page(
            cars.list(&args.query()).await,
            args.json,
            &[("ID", 26), ("MAKE", 14), ("MODEL", 16), ("YEAR", 6), ("PRICE/DAY", 10), ("STATUS", 10)],
            |car| {
                vec![
                    car.id.clone(),
                    car.make.clone(),
                    car.model.clone(),
                    car.year.map_or_else(|| "-".to_string(), |y| y.to_string()),
                    price(car.price_per_day),
                    ui::or_dash(car.status.as_deref()).to_string(),
                ]
            },
        ),
        CarCommands::Get { id } => print_one(cars.get(&id).await, "Car fetched"),
        CarCommands::Create(fields) => {
            let Some(payload) = car_payload(ctx, config, fields).await? else {
                return Ok(false);
            };
            print_one(cars.create(&payload).await, "Car created")
        }
        CarCommands::Update { id, fields } => {
            let Some(payload) = car_payload(ctx, config, fields).await? else {
                return Ok(false);
            };
            print_one(cars.update(&id, &payload).await, "Car updated")
        }
        CarCommands::Delete { id, yes } => {
            if !confirmed(yes, "car", &id)? {
                return Ok(false);
            }
            Ok(ui::toast(cars.delete(&id).await, "Car deleted").is_some())
        }
    }
}

/// Uploads only go out for a signed-in session, so a save that is bound to
/// fail leaves nothing behind on the media host.
fn ready_to_upload(ctx: &AdapterContext, files: usize) -> bool {
    if files == 0 || ctx.has_session() {
        return true;
    }
    ui::error(NO_ACCESS_TOKEN_MESSAGE);
    ui::info("Sign in with: rentadmin login");
    false
}

/// Upload any image files, then build the payload. `None` if an upload failed.
async fn car_payload(
    ctx: &AdapterContext,
    config: &Config,
    fields: CarFields,
) -> Result<Option<CarPayload>> {
    if !ready_to_upload(ctx, fields.images.len()) {
        return Ok(None);
    }
    let Some(images) = upload_images(config, &fields.images, "cars").await? else {
        return Ok(None);
    };
    Ok(Some(CarPayload {
        make: fields.make,
        model: fields.model,
        year: fields.year,
        price_per_day: fields.price,
        location: fields.location,
        status: fields.status,
        images,
    }))
}

/// Run a user command.
pub async fn run_users(ctx: &AdapterContext, command: UserCommands) -> Result<bool> {
    let users = ctx.users();
    match command {
        UserCommands::List(args) => print_page(
            users.list(&args.query()).await,
            args.json,
            &[("ID", 26), ("NAME", 20), ("EMAIL", 30), ("ROLE", 10), ("ACTIVE", 8)],
            |user| {
                vec![
                    user.id.clone(),
                    user.name.clone(),
                    user.email.clone(),
                    ui::or_dash(user.role.as_deref()).to_string(),
                    yes_no(user.is_active),
                ]
            },
        ),
        UserCommands::Get { id } => print_one(users.get(&id).await, "User fetched"),
        UserCommands::Activate { id } => Ok(ui::toast(users.set_active(&id, true).await, "User activated").is_some()),
        UserCommands::Deactivate { id } => Ok(ui::toast(users.set_active(&id, false).await, "User deactivated").is_some()),
        UserCommands::Delete { id, yes } => {
            if !confirmed(yes, "user", &id)? {
                return Ok(false);
            }
            Ok(ui::toast(users.delete(&id).await, "User deleted").is_some())
        }
        UserCommands::Vendors { json } => print_list(
            users.list_vendors().await,
            json,
            &[("ID", 26), ("NAME", 20), ("BUSINESS", 24), ("EMAIL", 30), ("VERIFIED", 8)],
            |vendor| {
                vec![
                    vendor.id.clone(),
                    vendor.name.clone(),
                    ui::or_dash(vendor.business_name.as_deref()).to_string(),
                    vendor.email.clone(),
                    yes_no(vendor.is_verified),
                ]
            },
        ),
    }
}

/// Run a coupon command.
pub async fn run_coupons(ctx: &AdapterContext, command: CouponCommands) -> Result<bool> {
    let coupons = ctx.coupons();
    match command {
        CouponCommands::List(args) => print_list(
            coupons.list(&args.query()).await,
            args.json,
            &[("ID", 26), ("CODE", 16), ("TYPE", 12), ("VALUE", 8), ("EXPIRES", 26), ("ACTIVE", 8)],
            |coupon| {
                vec![
                    coupon.id.clone(),
                    coupon.code.clone(),
                    ui::or_dash(coupon.discount_type.as_deref()).to_string(),
                    format!("{}", coupon.discount_value),
                    ui::or_dash(coupon.expires_at.as_deref()).to_string(),
                    yes_no(coupon.is_active),
                ]
            },
        ),
        CouponCommands::Create(fields) => {
            print_one(coupons.create(&fields.into()).await, "Coupon created")
        }
        CouponCommands::Update { id, fields } => {
            print_one(coupons.update(&id, &fields.into()).await, "Coupon updated")
        }
        CouponCommands::Delete { id, yes } => {
            if !confirmed(yes, "coupon", &id)? {
                return Ok(false);
            }
            Ok(ui::toast(coupons.delete(&id).await, "Coupon deleted").is_some())
        }
    }
}

/// Run an advertisement command.
pub async fn run_ads(ctx: &AdapterContext, config: &Config, command: AdCommands) -> Result<bool> {
    let ads = ctx.advertisements();
    match command {
        AdCommands::List(args) => print_list(
            ads.list(&args.query()).await,
            args.json,
            &[("ID", 26), ("TITLE", 28), ("ACTIVE", 8), ("START", 26), ("END", 26)],
            |ad| {
                vec![
                    ad.id.clone(),
                    ad.title.clone(),
                    yes_no(ad.is_active),
                    ui::or_dash(ad.start_date.as_deref()).to_string(),
                    ui::or_dash(ad.end_date.as_deref()).to_string(),
                ]
            },
        ),
        AdCommands::Create(fields) => {
            let Some(payload) = ad_payload(ctx, config, fields).await? else {
                return Ok(false);
            };
            print_one(ads.create(&payload).await, "Advertisement created")
        }
        AdCommands::Update { id, fields } => {
            let Some(payload) = ad_payload(ctx, config, fields).await? else {
                return Ok(false);
            };
            print_one(ads.update(&id, &payload).await, "Advertisement updated")
        }
        AdCommands::Delete { id, yes } => {
            if !confirmed(yes, "advertisement", &id)? {
                return Ok(false);
            }
            Ok(ui::toast(ads.delete(&id).await, "Advertisement deleted").is_some())
        }
    }
}

async fn ad_payload(
    ctx: &AdapterContext,
    config: &Config,
    fields: AdFields,
) -> Result<Option<AdvertisementPayload>> {
    if !ready_to_upload(ctx, usize::from(fields.image.is_some())) {
        return Ok(None);
    }
    let image_url = match &fields.image {
        Some(path) => {
            let Some(mut urls) = upload_images(config, std::slice::from_ref(path), "advertisements").await? else {
                return Ok(None);
            };
            urls.pop()
        }
        None => fields.image_url,
    };
    Ok(Some(AdvertisementPayload {
        title: fields.title,
        description: fields.description,
        image_url,
        link: fields.link,
        is_active: fields.active,
        start_date: fields.start_date,
        end_date: fields.end_date,
    }))
}

/// Run a payment command.
pub async fn run_payments(ctx: &AdapterContext, command: PaymentCommands) -> Result<bool> {
    let payments = ctx.payments();
    match command {
        PaymentCommands::List(args) => print_page(
            payments.list(&args.query()).await,
            args.json,
            &[("ID", 26), ("AMOUNT", 12), ("CURRENCY", 10), ("STATUS", 12), ("METHOD", 12), ("CREATED", 26)],
            |payment| {
                vec![
                    payment.id.clone(),
                    format!("{:.2}", payment.amount),
                    ui::or_dash(payment.currency.as_deref()).to_string(),
                    ui::or_dash(payment.status.as_deref()).to_string(),
                    ui::or_dash(payment.method.as_deref()).to_string(),
                    ui::or_dash(payment.created_at.as_deref()).to_string(),
                ]
            },
        ),
        PaymentCommands::Get { id } => print_one(payments.get(&id).await, "Payment fetched"),
    }
}

/// Run a parking approval command.
pub async fn run_parking(ctx: &AdapterContext, command: ParkingCommands) -> Result<bool> {
    let parking = ctx.parking();
    match command {
        ParkingCommands::Pending { json } => print_list(
            parking.list_pending().await,
            json,
            &[("ID", 26), ("TITLE", 28), ("ADDRESS", 36), ("PRICE/HR", 10)],
            |spot| {
                vec![
                    spot.id.clone(),
                    spot.title.clone(),
                    ui::or_dash(spot.address.as_deref()).to_string(),
                    price(spot.price_per_hour),
                ]
            },
        ),
        ParkingCommands::Approve { id } => {
            Ok(ui::toast(parking.approve(&id).await, "Parking approved").is_some())
        }
        ParkingCommands::Reject { id, reason } => {
            Ok(ui::toast(parking.reject(&id, &reason).await, "Parking rejected").is_some())
        }
    }
}

/// Show dashboard numbers.
pub async fn run_dashboard(ctx: &AdapterContext, json: bool) -> Result<bool> {
    let Some(stats) = ui::toast(ctx.dashboard().stats().await, "Dashboard loaded") else {
        return Ok(false);
    };
    if json {
        ui::json(&stats)?;
        return Ok(true);
    }

    ui::header("Dashboard");
    ui::kv("Users", &stats.total_users.to_string());
    ui::kv("Vendors", &stats.total_vendors.to_string());
    ui::kv("Cars", &stats.total_cars.to_string());
    ui::kv("Bookings", &stats.total_bookings.to_string());
    ui::kv("Revenue", &format!("{:.2}", stats.total_revenue));
    ui::kv("Pending parkings", &stats.pending_parkings.to_string());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use rentadmin_client::GatewayClient;
    use rentadmin_core::auth::AuthBridge;
    use rentadmin_core::credentials::MemoryCredentialStore;

    fn context(store: MemoryCredentialStore) -> AdapterContext {
        let store = Arc::new(store);
        let gateway =
            GatewayClient::new("http://127.0.0.1:1", Arc::new(AuthBridge::new(store.clone())))
                .unwrap();
        AdapterContext::new(Arc::new(gateway), store)
    }

    fn media_config() -> Config {
        let mut config = Config::default();
        config.media.cloud_name = Some("demo".to_string());
        config.media.upload_preset = Some("unsigned".to_string());
        config
    }

    #[tokio::test]
    async fn test_signed_out_car_skips_upload() {
        let ctx = context(MemoryCredentialStore::new());
        let fields = CarFields {
            make: Some("Toyota".to_string()),
            images: vec![PathBuf::from("/nonexistent/front.jpg")],
            ..CarFields::default()
        };

        // Reading the missing file would fail if the upload were attempted.
        let payload = car_payload(&ctx, &media_config(), fields).await.unwrap();
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn test_signed_out_ad_skips_upload() {
        let ctx = context(MemoryCredentialStore::new());
        let fields = AdFields {
            title: Some("Spring sale".to_string()),
            image: Some(PathBuf::from("/nonexistent/banner.png")),
            ..AdFields::default()
        };

        let payload = ad_payload(&ctx, &media_config(), fields).await.unwrap();
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn test_payload_without_images_needs_no_upload() {
        let ctx = context(MemoryCredentialStore::new());
        let fields = CarFields {
            make: Some("Honda".to_string()),
            ..CarFields::default()
        };

        let payload = car_payload(&ctx, &Config::default(), fields)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload.make.as_deref(), Some("Honda"));
        assert!(payload.images.is_empty());
    }

    #[tokio::test]
    async fn test_signed_in_upload_is_attempted() {
        let ctx = context(MemoryCredentialStore::with_token("tok123"));
        let fields = CarFields {
            images: vec![PathBuf::from("/nonexistent/front.jpg")],
            ..CarFields::default()
        };

        let err = car_payload(&ctx, &media_config(), fields).await.unwrap_err();
        assert!(err.to_string().contains("front.jpg"));
    }
}
