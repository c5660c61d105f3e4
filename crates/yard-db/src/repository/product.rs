//! # Product Repository
//!
//! Database operations for the inventory catalog.
//!
//! ## Key Operations
//! - Registration with seasonal threshold defaults
//! - Filtered listing (category, name substring, planed flag)
//! - Manual stock correction with an adjustment trail
//! - The planing process
//!
//! ## The Planing Process
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    plane_stock("rough-pine", 20)                        │
//! │                                                                         │
//! │  Rough product                      Planed twin                         │
//! │  ┌──────────────────────┐           ┌──────────────────────┐            │
//! │  │ Pine board 2x4       │           │ Pine board 2x4       │            │
//! │  │ stock: 50 → 30       │  ──20──►  │ (planed)             │            │
//! │  │ price: $45.00        │           │ stock: 0 → 20        │            │
//! │  └──────────────────────┘           │ price: $45.00 + fee  │            │
//! │                                     └──────────────────────┘            │
//! │                                                                         │
//! │  The twin is created on first use and reused afterwards.                │
//! │  Both updates commit in one transaction.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use yard_core::validation::{
    validate_category, validate_price_cents, validate_product_name, validate_threshold,
};
use yard_core::{
    alerts, CoreError, Product, StockAdjustment, ValidationError, DEFAULT_THRESHOLD_SUMMER,
    DEFAULT_THRESHOLD_WINTER, PLANED_NAME_SUFFIX, PLANED_PRICE_SURCHARGE_CENTS,
};

/// Column list shared by every product SELECT in this module.
const PRODUCT_COLUMNS: &str = "id, name, category, stock, price_cents, threshold_winter, \
     threshold_summer, planed, special, length_cm, width_cm, height_cm, created_at, updated_at";

// =============================================================================
// Input Types
// =============================================================================

/// Fields supplied when registering a product.
///
/// Seasonal thresholds are not part of the input: new products always start
/// with the yard-wide defaults and are tuned later via
/// [`ProductRepository::update_thresholds`].
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    pub special: bool,
    pub length_cm: Option<f64>,
    pub width_cm: Option<f64>,
    pub height_cm: Option<f64>,
}

/// Optional filters for product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Planed flag match.
    pub planed: Option<bool>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Registers a new product with default seasonal thresholds.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The persisted product, including generated ID
    /// * `Err(DbError::Core)` - A field failed validation
    pub async fn register(&self, new: &NewProduct) -> DbResult<Product> {
        validate_product_name(&new.name).map_err(CoreError::from)?;
        validate_category(&new.category).map_err(CoreError::from)?;
        validate_price_cents(new.price_cents).map_err(CoreError::from)?;
        if new.stock < 0 {
            return Err(CoreError::from(ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            })
            .into());
        }

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: new.name.trim().to_string(),
            category: new.category.trim().to_string(),
            stock: new.stock,
            price_cents: new.price_cents,
            threshold_winter: DEFAULT_THRESHOLD_WINTER,
            threshold_summer: DEFAULT_THRESHOLD_SUMMER,
            planed: false,
            special: new.special,
            length_cm: new.length_cm,
            width_cm: new.width_cm,
            height_cm: new.height_cm,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Registering product");

        self.insert(&product).await?;
        Ok(product)
    }

    /// Inserts a fully-formed product row.
    async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, stock, price_cents,
                threshold_winter, threshold_summer, planed, special,
                length_cm, width_cm, height_cm,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.stock)
        .bind(product.price_cents)
        .bind(product.threshold_winter)
        .bind(product.threshold_summer)
        .bind(product.planed)
        .bind(product.special)
        .bind(product.length_cm)
        .bind(product.width_cm)
        .bind(product.height_cm)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products, newest filters applied, sorted by name.
    ///
    /// All filter fields are optional; an empty filter lists everything.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE (?1 IS NULL OR category = ?1)
              AND (?2 IS NULL OR name LIKE '%' || ?2 || '%')
              AND (?3 IS NULL OR planed = ?3)
            ORDER BY name
            "#
        ))
        .bind(&filter.category)
        .bind(&filter.name)
        .bind(filter.planed)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates an existing product's editable fields.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                stock = ?4,
                price_cents = ?5,
                threshold_winter = ?6,
                threshold_summer = ?7,
                planed = ?8,
                special = ?9,
                length_cm = ?10,
                width_cm = ?11,
                height_cm = ?12,
                updated_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.stock)
        .bind(product.price_cents)
        .bind(product.threshold_winter)
        .bind(product.threshold_summer)
        .bind(product.planed)
        .bind(product.special)
        .bind(product.length_cm)
        .bind(product.width_cm)
        .bind(product.height_cm)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Overwrites a product's stock level, recording the change as a signed
    /// delta in the adjustment trail.
    ///
    /// Both writes commit in one transaction.
    ///
    /// ## Returns
    /// The recorded adjustment (delta may be zero).
    pub async fn set_stock(&self, id: &str, new_stock: i64) -> DbResult<StockAdjustment> {
        if new_stock < 0 {
            return Err(CoreError::from(ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            })
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let old_stock: i64 = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        let now = Utc::now();
        let adjustment = StockAdjustment {
            id: Uuid::new_v4().to_string(),
            product_id: id.to_string(),
            delta: new_stock - old_stock,
            created_at: now,
        };

        sqlx::query(
            "INSERT INTO stock_adjustments (id, product_id, delta, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&adjustment.id)
        .bind(&adjustment.product_id)
        .bind(adjustment.delta)
        .bind(adjustment.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(new_stock)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(id = %id, old_stock, new_stock, "Stock set");
        Ok(adjustment)
    }

    /// Lists the adjustment trail for a product, newest first.
    pub async fn stock_adjustments(&self, product_id: &str) -> DbResult<Vec<StockAdjustment>> {
        let adjustments = sqlx::query_as::<_, StockAdjustment>(
            "SELECT id, product_id, delta, created_at FROM stock_adjustments \
             WHERE product_id = ?1 ORDER BY created_at DESC, id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(adjustments)
    }

    /// Updates both seasonal thresholds for a product.
    pub async fn update_thresholds(&self, id: &str, winter: i64, summer: i64) -> DbResult<()> {
        validate_threshold(winter).map_err(CoreError::from)?;
        validate_threshold(summer).map_err(CoreError::from)?;

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET threshold_winter = ?2, threshold_summer = ?3, updated_at = ?4 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(winter)
        .bind(summer)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Runs the planing process: moves `quantity` units from a rough product
    /// to its planed twin, creating the twin on first use.
    ///
    /// ## Rules
    /// - `quantity` must be positive and within the source's stock
    /// - The twin carries the source price plus a flat surcharge; its price
    ///   is set at creation and not revised on later runs
    /// - The source is flagged as planed-out when its stock reaches zero
    ///
    /// ## Returns
    /// The planed twin after the transfer.
    pub async fn plane_stock(&self, id: &str, quantity: i64) -> DbResult<Product> {
        if quantity <= 0 {
            return Err(CoreError::from(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            })
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let source = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        if source.stock < quantity {
            return Err(CoreError::InsufficientStock {
                product_id: source.id,
                available: source.stock,
                requested: quantity,
            }
            .into());
        }

        let now = Utc::now();
        let remaining = source.stock - quantity;

        sqlx::query(
            "UPDATE products SET stock = ?2, planed = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(&source.id)
        .bind(remaining)
        .bind(if remaining == 0 { true } else { source.planed })
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let twin_name = format!("{}{}", source.name, PLANED_NAME_SUFFIX);

        let existing = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name = ?1 AND category = ?2 AND planed = 1"
        ))
        .bind(&twin_name)
        .bind(&source.category)
        .fetch_optional(&mut *tx)
        .await?;

        let mut twin = match existing {
            Some(twin) => twin,
            None => {
                let twin = Product {
                    id: generate_product_id(),
                    name: twin_name,
                    category: source.category.clone(),
                    stock: 0,
                    price_cents: source.price_cents + PLANED_PRICE_SURCHARGE_CENTS,
                    threshold_winter: DEFAULT_THRESHOLD_WINTER,
                    threshold_summer: DEFAULT_THRESHOLD_SUMMER,
                    planed: true,
                    special: false,
                    length_cm: source.length_cm,
                    width_cm: source.width_cm,
                    height_cm: source.height_cm,
                    created_at: now,
                    updated_at: now,
                };

                sqlx::query(
                    r#"
                    INSERT INTO products (
                        id, name, category, stock, price_cents,
                        threshold_winter, threshold_summer, planed, special,
                        length_cm, width_cm, height_cm,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                    "#,
                )
                .bind(&twin.id)
                .bind(&twin.name)
                .bind(&twin.category)
                .bind(twin.stock)
                .bind(twin.price_cents)
                .bind(twin.threshold_winter)
                .bind(twin.threshold_summer)
                .bind(twin.planed)
                .bind(twin.special)
                .bind(twin.length_cm)
                .bind(twin.width_cm)
                .bind(twin.height_cm)
                .bind(twin.created_at)
                .bind(twin.updated_at)
                .execute(&mut *tx)
                .await?;

                twin
            }
        };

        twin.stock += quantity;
        twin.updated_at = now;

        sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&twin.id)
            .bind(twin.stock)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(source = %id, twin = %twin.id, quantity, "Planing run complete");
        Ok(twin)
    }

    /// Builds the seasonal low-stock alert report for a month (1-12).
    pub async fn stock_alerts(&self, month: u32) -> DbResult<Vec<alerts::StockAlert>> {
        let products = self.list(&ProductFilter::default()).await?;
        Ok(alerts::build_stock_alerts(&products, month))
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}
