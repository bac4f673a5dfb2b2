//! In-memory form records, one per entity type.
//!
//! A form is the controller's projection of "the entity currently being
//! viewed". Rendering targets read it; actions snapshot it at dispatch time.

use std::fmt::Debug;

use shared::domain::{Order, OrderItem, OrderStatus};

use crate::error::{ClientError, ClientResult};

pub trait FormRecord: Default + Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Field names in display order.
    const FIELDS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Writes one named field. Unknown names and out-of-domain values are
    /// rejected and leave the form unchanged.
    fn set_field(&mut self, name: &str, value: &str) -> ClientResult<()>;

    fn field(&self, name: &str) -> Option<String>;

    /// Wipes the entity attributes but keeps the id field.
    fn clear_entity_fields(&mut self);

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn entries(&self) -> Vec<(&'static str, String)> {
        Self::FIELDS
            .iter()
            .map(|name| (*name, self.field(name).unwrap_or_default()))
            .collect()
    }
}

fn unknown_field(name: &str) -> ClientError {
    ClientError::InvalidField {
        field: name.to_string(),
        reason: "no such field".to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub id: String,
    pub customer_id: String,
    pub tracking_id: String,
    pub status: Option<OrderStatus>,
}

impl OrderForm {
    pub fn fill_from(&mut self, order: &Order) {
        self.id = order.id.to_string();
        self.customer_id = order.customer_id.to_string();
        self.tracking_id = order.tracking_id.to_string();
        self.status = order.status;
    }
}

impl FormRecord for OrderForm {
    const FIELDS: &'static [&'static str] = &["id", "customer_id", "tracking_id", "status"];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_field(&mut self, name: &str, value: &str) -> ClientResult<()> {
        match name {
            "id" | "order_id" => self.id = value.to_string(),
            "customer_id" => self.customer_id = value.to_string(),
            "tracking_id" => self.tracking_id = value.to_string(),
            "status" if value.trim().is_empty() => self.status = None,
            "status" => {
                self.status = Some(value.parse::<OrderStatus>().map_err(|err| {
                    ClientError::InvalidField {
                        field: "status".to_string(),
                        reason: err.to_string(),
                    }
                })?)
            }
            other => return Err(unknown_field(other)),
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "customer_id" => Some(self.customer_id.clone()),
            "tracking_id" => Some(self.tracking_id.clone()),
            "status" => Some(self.status.map(|s| s.to_string()).unwrap_or_default()),
            _ => None,
        }
    }

    fn clear_entity_fields(&mut self) {
        self.customer_id.clear();
        self.tracking_id.clear();
        self.status = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderItemForm {
    pub id: String,
    pub product_id: String,
    pub quantity: String,
    pub price: String,
    /// Parent order; scopes every item request.
    pub order_id: String,
}

impl OrderItemForm {
    pub fn fill_from(&mut self, item: &OrderItem) {
        self.id = item.id.to_string();
        self.product_id = item.product_id.to_string();
        self.quantity = item.quantity.to_string();
        self.price = item.price.to_string();
        self.order_id = item.order_id.to_string();
    }
}

impl FormRecord for OrderItemForm {
    const FIELDS: &'static [&'static str] = &["id", "product_id", "quantity", "price", "order_id"];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_field(&mut self, name: &str, value: &str) -> ClientResult<()> {
        let slot = match name {
            "id" => &mut self.id,
            "product_id" => &mut self.product_id,
            "quantity" => &mut self.quantity,
            "price" => &mut self.price,
            "order_id" | "orderid" => &mut self.order_id,
            other => return Err(unknown_field(other)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "product_id" => Some(self.product_id.clone()),
            "quantity" => Some(self.quantity.clone()),
            "price" => Some(self.price.clone()),
            "order_id" => Some(self.order_id.clone()),
            _ => None,
        }
    }

    fn clear_entity_fields(&mut self) {
        self.product_id.clear();
        self.quantity.clear();
        self.price.clear();
        self.order_id.clear();
    }
}
