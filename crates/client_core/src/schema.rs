//! Entity schemas: everything that differs between the order and the order
//! item controllers lives behind [`EntitySchema`].

use std::fmt::{self, Debug};

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Order, OrderItem},
    protocol::{OrderItemPayload, OrderPayload},
};

use crate::{
    error::{ClientError, ClientResult},
    form::{FormRecord, OrderForm, OrderItemForm},
};

/// Path below the server root, kept as raw segments so user-typed ids are
/// percent-encoded when the URL is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath(Vec<String>);

impl ResourcePath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

pub trait EntitySchema: Send + Sync + 'static {
    type Entity: DeserializeOwned + Clone + Debug + Send + Sync + 'static;
    type Form: FormRecord;
    type Payload: Serialize + Debug + Send + Sync;

    /// Human name used in messages and logs.
    const LABEL: &'static str;
    const COLUMNS: &'static [&'static str];
    const DELETED_MESSAGE: &'static str;
    /// `Some` when the schema exposes a cancel sub-action.
    const CANCELLED_MESSAGE: Option<&'static str> = None;
    const SUPPORTS_SEARCH: bool = false;

    /// Overwrites the form wholesale from a server entity.
    fn apply_entity(form: &mut Self::Form, entity: &Self::Entity);

    fn table_row(entity: &Self::Entity) -> Vec<String>;

    fn payload(form: &Self::Form) -> Self::Payload;

    fn collection_path(form: &Self::Form) -> ClientResult<ResourcePath>;

    fn item_path(form: &Self::Form) -> ClientResult<ResourcePath>;

    fn list_path(form: &Self::Form) -> ResourcePath;

    fn cancel_path(_form: &Self::Form) -> ClientResult<ResourcePath> {
        Err(ClientError::Unsupported {
            entity: Self::LABEL,
            action: "cancel",
        })
    }
}

fn required(entity: &'static str, field: &'static str, value: &str) -> ClientResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::MissingField { entity, field });
    }
    Ok(value.to_string())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug)]
pub struct OrderSchema;

impl EntitySchema for OrderSchema {
    type Entity = Order;
    type Form = OrderForm;
    type Payload = OrderPayload;

    const LABEL: &'static str = "Order";
    const COLUMNS: &'static [&'static str] = &["ID", "customer_id", "tracking_id", "status"];
    const DELETED_MESSAGE: &'static str = "Order has been Deleted!";
    const CANCELLED_MESSAGE: Option<&'static str> = Some("Order has been Cancelled!");
    const SUPPORTS_SEARCH: bool = true;

    fn apply_entity(form: &mut OrderForm, entity: &Order) {
        form.fill_from(entity);
    }

    fn table_row(entity: &Order) -> Vec<String> {
        vec![
            entity.id.to_string(),
            entity.customer_id.to_string(),
            entity.tracking_id.to_string(),
            entity.status.map(|s| s.to_string()).unwrap_or_default(),
        ]
    }

    fn payload(form: &OrderForm) -> OrderPayload {
        OrderPayload {
            id: optional(&form.id),
            customer_id: form.customer_id.clone(),
            tracking_id: form.tracking_id.clone(),
            status: form.status,
        }
    }

    fn collection_path(_form: &OrderForm) -> ClientResult<ResourcePath> {
        Ok(ResourcePath::new(["order"]))
    }

    fn item_path(form: &OrderForm) -> ClientResult<ResourcePath> {
        let id = required(Self::LABEL, "id", &form.id)?;
        Ok(ResourcePath::new(["order".to_string(), id]))
    }

    fn list_path(_form: &OrderForm) -> ResourcePath {
        ResourcePath::new(["order"])
    }

    fn cancel_path(form: &OrderForm) -> ClientResult<ResourcePath> {
        let id = required(Self::LABEL, "id", &form.id)?;
        Ok(ResourcePath::new([
            "order".to_string(),
            id,
            "cancel".to_string(),
        ]))
    }
}

#[derive(Debug)]
pub struct OrderItemSchema;

impl EntitySchema for OrderItemSchema {
    type Entity = OrderItem;
    type Form = OrderItemForm;
    type Payload = OrderItemPayload;

    const LABEL: &'static str = "Order Item";
    const COLUMNS: &'static [&'static str] =
        &["Item ID", "Product_id", "quantity", "Price", "Order ID"];
    const DELETED_MESSAGE: &'static str = "Order Item has been Deleted!";

    fn apply_entity(form: &mut OrderItemForm, entity: &OrderItem) {
        form.fill_from(entity);
    }

    fn table_row(entity: &OrderItem) -> Vec<String> {
        vec![
            entity.id.to_string(),
            entity.product_id.to_string(),
            entity.quantity.to_string(),
            entity.price.to_string(),
            entity.order_id.to_string(),
        ]
    }

    fn payload(form: &OrderItemForm) -> OrderItemPayload {
        OrderItemPayload {
            id: optional(&form.id),
            product_id: form.product_id.clone(),
            quantity: form.quantity.clone(),
            price: form.price.clone(),
            order_id: form.order_id.trim().to_string(),
        }
    }

    fn collection_path(form: &OrderItemForm) -> ClientResult<ResourcePath> {
        let order_id = required(Self::LABEL, "order_id", &form.order_id)?;
        Ok(ResourcePath::new([
            "order".to_string(),
            order_id,
            "orderitem".to_string(),
        ]))
    }

    fn item_path(form: &OrderItemForm) -> ClientResult<ResourcePath> {
        let order_id = required(Self::LABEL, "order_id", &form.order_id)?;
        let id = required(Self::LABEL, "id", &form.id)?;
        Ok(ResourcePath::new([
            "order".to_string(),
            order_id,
            "orderitem".to_string(),
            id,
        ]))
    }

    fn list_path(form: &OrderItemForm) -> ResourcePath {
        match optional(&form.order_id) {
            Some(order_id) => {
                ResourcePath::new(["order".to_string(), order_id, "orderitem".to_string()])
            }
            None => ResourcePath::new(["listorderitems"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::OrderStatus;

    #[test]
    fn order_paths_follow_the_collection_and_item_templates() {
        let form = OrderForm {
            id: " 7 ".into(),
            ..OrderForm::default()
        };
        assert_eq!(OrderSchema::collection_path(&form).expect("path").to_string(), "/order");
        assert_eq!(OrderSchema::item_path(&form).expect("path").to_string(), "/order/7");
        assert_eq!(
            OrderSchema::cancel_path(&form).expect("path").to_string(),
            "/order/7/cancel"
        );
    }

    #[test]
    fn item_paths_need_an_id() {
        let err = OrderSchema::item_path(&OrderForm::default()).expect_err("missing id");
        assert!(matches!(
            err,
            ClientError::MissingField {
                entity: "Order",
                field: "id"
            }
        ));
    }

    #[test]
    fn order_item_paths_are_scoped_to_the_parent_order() {
        let mut form = OrderItemForm {
            id: "3".into(),
            order_id: "1".into(),
            ..OrderItemForm::default()
        };
        assert_eq!(
            OrderItemSchema::item_path(&form).expect("path").to_string(),
            "/order/1/orderitem/3"
        );
        assert_eq!(OrderItemSchema::list_path(&form).to_string(), "/order/1/orderitem");

        form.order_id.clear();
        assert_eq!(OrderItemSchema::list_path(&form).to_string(), "/listorderitems");
        assert!(OrderItemSchema::collection_path(&form).is_err());
        assert!(OrderItemSchema::cancel_path(&form).is_err());
    }

    #[test]
    fn payloads_use_the_entity_key_names() {
        let form = OrderForm {
            id: String::new(),
            customer_id: "C1".into(),
            tracking_id: "T1".into(),
            status: Some(OrderStatus::Created),
        };
        let json = serde_json::to_value(OrderSchema::payload(&form)).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "id": null,
                "customer_id": "C1",
                "tracking_id": "T1",
                "status": "Created"
            })
        );

        let item = OrderItemForm {
            id: "3".into(),
            product_id: "11".into(),
            quantity: "2".into(),
            price: "9.5".into(),
            order_id: "1".into(),
        };
        let json = serde_json::to_value(OrderItemSchema::payload(&item)).expect("json");
        assert_eq!(json["order_id"], "1");
        assert_eq!(json["id"], "3");
        assert!(json.get("orderid").is_none());
    }
}
