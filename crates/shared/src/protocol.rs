use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::OrderStatus;

/// Body sent on order create and update.
///
/// Keys mirror the `Order` response entity so that what the client sends
/// and what it reads back share one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub id: Option<String>,
    pub customer_id: String,
    pub tracking_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemPayload {
    pub id: Option<String>,
    pub product_id: String,
    pub quantity: String,
    pub price: String,
    pub order_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    CustomerId,
    Status,
}

impl SearchMode {
    /// Query-string key the collection endpoint filters on.
    pub fn query_key(self) -> &'static str {
        match self {
            SearchMode::CustomerId => "customer-id",
            SearchMode::Status => "status",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_key())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "customer-id" | "customer_id" | "customer" => Ok(SearchMode::CustomerId),
            "status" => Ok(SearchMode::Status),
            other => Err(format!("unknown search mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub value: String,
}

impl SearchQuery {
    pub fn new(mode: SearchMode, value: impl Into<String>) -> Self {
        Self {
            mode,
            value: value.into(),
        }
    }
}
