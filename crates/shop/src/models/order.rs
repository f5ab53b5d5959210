//! Order domain types.
//!
//! Orders carry a snapshot of their lines captured at commit time, not live
//! product references: later price or title edits never rewrite history. Item
//! snapshot and pricing fields are immutable after creation; only the status
//! advances.

use chrono::{DateTime, Utc};

use wildbriar_core::{
    DeliveryMethod, Email, OrderId, OrderNumber, OrderStatus, PaymentMethod, PaymentReference,
    Price, ProductId,
};

/// Customer identity and contact details on an order.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Optional phone number.
    pub phone: Option<String>,
}

/// A shipping address; absent for collection orders.
#[derive(Debug, Clone)]
pub struct ShippingAddress {
    /// First address line.
    pub line1: String,
    /// Optional second address line.
    pub line2: Option<String>,
    /// Town or city.
    pub city: String,
    /// Postcode.
    pub postcode: String,
}

/// A snapshot of one ordered line, captured at commit time.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// The product this line referred to when ordered.
    pub product_id: ProductId,
    /// Product title at commit time.
    pub title: String,
    /// Unit price at commit time.
    pub unit_price: Price,
    /// Units ordered.
    pub quantity: i32,
    /// Product image URL at commit time.
    pub image_url: Option<String>,
}

/// An immutable order record.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Human-readable unique order number.
    pub number: OrderNumber,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// Customer contact details.
    pub customer: CustomerDetails,
    /// Shipping address; `None` for collection orders.
    pub shipping_address: Option<ShippingAddress>,
    /// How the order reaches the customer.
    pub delivery_method: DeliveryMethod,
    /// Sum of line prices.
    pub subtotal: Price,
    /// Order-level delivery fee.
    pub delivery: Price,
    /// Subtotal plus delivery.
    pub total: Price,
    /// Which payment processor was used.
    pub payment_method: PaymentMethod,
    /// Opaque confirmation id from the payment processor.
    pub payment_reference: PaymentReference,
    /// Line snapshots captured at commit time.
    pub items: Vec<OrderItem>,
    /// When the order was committed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated (status changes only).
    pub updated_at: DateTime<Utc>,
}

/// Parameters for inserting an order at checkout commit.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Allocated order number.
    pub number: OrderNumber,
    /// Customer contact details.
    pub customer: CustomerDetails,
    /// Shipping address; `None` for collection orders.
    pub shipping_address: Option<ShippingAddress>,
    /// How the order reaches the customer.
    pub delivery_method: DeliveryMethod,
    /// Sum of line prices.
    pub subtotal: Price,
    /// Order-level delivery fee.
    pub delivery: Price,
    /// Subtotal plus delivery.
    pub total: Price,
    /// Which payment processor was used.
    pub payment_method: PaymentMethod,
    /// Opaque confirmation id from the payment processor.
    pub payment_reference: PaymentReference,
    /// Line snapshots captured at commit time.
    pub items: Vec<OrderItem>,
}
