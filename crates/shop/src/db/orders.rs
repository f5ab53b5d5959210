//! Order repository.
//!
//! Orders are append-only: the insert happens inside the checkout transaction
//! together with its line snapshots, and afterwards only the status column
//! ever changes.

use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;

use wildbriar_core::{Email, OrderId, OrderNumber, OrderStatus, PaymentReference, Price};

use super::RepositoryError;
use crate::models::order::{CustomerDetails, NewOrder, Order, OrderItem, ShippingAddress};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order (with its item snapshots) by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored fields fail to parse.
    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(&format!("{ORDER_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(&row).await?)),
            None => Ok(None),
        }
    }

    /// Get an order by its human-readable order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored fields fail to parse.
    #[instrument(skip(self, number), fields(number = %number))]
    pub async fn get_by_number(
        &self,
        number: &OrderNumber,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(&format!("{ORDER_COLUMNS} WHERE order_number = $1"))
            .bind(number.as_str())
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(&row).await?)),
            None => Ok(None),
        }
    }

    /// Insert an order and its item snapshots inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub(crate) async fn insert_with(
        conn: &mut PgConnection,
        order: &NewOrder,
    ) -> Result<OrderId, RepositoryError> {
        let (order_id,): (OrderId,) = sqlx::query_as(
            r"
            INSERT INTO shop.orders
                (order_number, status, customer_name, customer_email, customer_phone,
                 address_line1, address_line2, address_city, address_postcode,
                 delivery_method, subtotal, delivery, total,
                 payment_method, payment_reference)
            VALUES ($1, 'pending', $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            ",
        )
        .bind(order.number.as_str())
        .bind(&order.customer.name)
        .bind(order.customer.email.as_str())
        .bind(order.customer.phone.as_deref())
        .bind(order.shipping_address.as_ref().map(|a| a.line1.as_str()))
        .bind(order.shipping_address.as_ref().and_then(|a| a.line2.as_deref()))
        .bind(order.shipping_address.as_ref().map(|a| a.city.as_str()))
        .bind(order.shipping_address.as_ref().map(|a| a.postcode.as_str()))
        .bind(order.delivery_method)
        .bind(order.subtotal.amount())
        .bind(order.delivery.amount())
        .bind(order.total.amount())
        .bind(order.payment_method)
        .bind(order.payment_reference.as_str())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        for item in &order.items {
            sqlx::query(
                r"
                INSERT INTO shop.order_items
                    (order_id, product_id, title, unit_price, quantity, image_url)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.title)
            .bind(item.unit_price.amount())
            .bind(item.quantity)
            .bind(item.image_url.as_deref())
            .execute(&mut *conn)
            .await?;
        }

        Ok(order_id)
    }

    /// Read an order's current status and lock its row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub(crate) async fn status_for_update(
        conn: &mut PgConnection,
        id: OrderId,
    ) -> Result<Option<OrderStatus>, RepositoryError> {
        let row: Option<(OrderStatus,)> =
            sqlx::query_as("SELECT status FROM shop.orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(row.map(|(status,)| status))
    }

    /// Set an order's status (transition validity is checked by the caller).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub(crate) async fn set_status(
        conn: &mut PgConnection,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE shop.orders SET status = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&mut *conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Build the domain order from a row plus its item snapshots.
    async fn assemble(&self, row: &PgRow) -> Result<Order, RepositoryError> {
        let mut order = order_from_row(row)?;
        order.items = self.items_for(order.id).await?;
        Ok(order)
    }

    /// Fetch the item snapshots for an order.
    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT product_id, title, unit_price, quantity, image_url
            FROM shop.order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(OrderItem {
                    product_id: row.try_get("product_id")?,
                    title: row.try_get("title")?,
                    unit_price: Price::new(row.try_get("unit_price")?),
                    quantity: row.try_get("quantity")?,
                    image_url: row.try_get("image_url")?,
                })
            })
            .collect()
    }
}

/// Shared SELECT column list for order lookups.
const ORDER_COLUMNS: &str = r"
    SELECT id, order_number, status, customer_name, customer_email, customer_phone,
           address_line1, address_line2, address_city, address_postcode,
           delivery_method, subtotal, delivery, total,
           payment_method, payment_reference, created_at, updated_at
    FROM shop.orders
";

/// Map an order row to the domain type (items filled in separately).
fn order_from_row(row: &PgRow) -> Result<Order, RepositoryError> {
    let number_raw: String = row.try_get("order_number")?;
    let number = OrderNumber::parse(&number_raw).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid order number in database: {e}"))
    })?;

    let email_raw: String = row.try_get("customer_email")?;
    let email = Email::parse(&email_raw).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
    })?;

    let line1: Option<String> = row.try_get("address_line1")?;
    let city: Option<String> = row.try_get("address_city")?;
    let postcode: Option<String> = row.try_get("address_postcode")?;
    let shipping_address = match (line1, city, postcode) {
        (Some(line1), Some(city), Some(postcode)) => Some(ShippingAddress {
            line1,
            line2: row.try_get("address_line2")?,
            city,
            postcode,
        }),
        (None, None, None) => None,
        _ => {
            return Err(RepositoryError::DataCorruption(
                "partial shipping address in database".to_owned(),
            ));
        }
    };

    let payment_reference: String = row.try_get("payment_reference")?;

    Ok(Order {
        id: row.try_get("id")?,
        number,
        status: row.try_get("status")?,
        customer: CustomerDetails {
            name: row.try_get("customer_name")?,
            email,
            phone: row.try_get("customer_phone")?,
        },
        shipping_address,
        delivery_method: row.try_get("delivery_method")?,
        subtotal: Price::new(row.try_get("subtotal")?),
        delivery: Price::new(row.try_get("delivery")?),
        total: Price::new(row.try_get("total")?),
        payment_method: row.try_get("payment_method")?,
        payment_reference: PaymentReference::new(payment_reference),
        items: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
