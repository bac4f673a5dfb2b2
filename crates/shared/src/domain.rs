use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Created,
    Paid,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Created,
        OrderStatus::Paid,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Paid => "Paid",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status '{0}' (expected Created, Paid, Completed or Cancelled)")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

/// Text projection of a scalar wire value.
///
/// The server is free to send identifiers and amounts as JSON numbers or
/// strings; form fields are text, so both land here verbatim. `null`
/// becomes the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldText(pub String);

impl FieldText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FieldText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldText {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for FieldText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
            Bool(bool),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => FieldText(text),
            Raw::Int(value) => FieldText(value.to_string()),
            Raw::Float(value) => FieldText(value.to_string()),
            Raw::Bool(value) => FieldText(value.to_string()),
            Raw::Null(()) => FieldText::default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: FieldText,
    #[serde(default)]
    pub customer_id: FieldText,
    #[serde(default)]
    pub tracking_id: FieldText,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub id: FieldText,
    #[serde(default)]
    pub product_id: FieldText,
    #[serde(default)]
    pub quantity: FieldText,
    #[serde(default)]
    pub price: FieldText,
    #[serde(default)]
    pub order_id: FieldText,
}
