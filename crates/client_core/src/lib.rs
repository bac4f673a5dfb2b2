//! Client core for the order and order item workflows.
//!
//! One generic [`EntityController`] per entity type keeps a form record and a
//! result table in sync with the REST backend. The two controllers are fully
//! independent: each owns its view state, status line and event stream.

use std::sync::Arc;

pub mod backend;
pub mod controller;
pub mod error;
pub mod form;
pub mod schema;
pub mod table;

pub use backend::HttpBackend;
pub use controller::{
    Action, ControllerEvent, EntityController, Outcome, ViewState, SUCCESS_MESSAGE,
};
pub use error::{ClientError, ClientResult};
pub use form::{FormRecord, OrderForm, OrderItemForm};
pub use schema::{EntitySchema, OrderItemSchema, OrderSchema, ResourcePath};
pub use table::ResultTable;

pub type OrderController = EntityController<OrderSchema>;
pub type OrderItemController = EntityController<OrderItemSchema>;

/// The two controllers of one page, sharing a backend but nothing else.
pub struct OrderWorkspace {
    pub orders: Arc<OrderController>,
    pub items: Arc<OrderItemController>,
}

impl OrderWorkspace {
    pub fn connect(server_url: &str) -> ClientResult<Self> {
        let backend = HttpBackend::new(server_url)?;
        Ok(Self::with_backend(backend))
    }

    pub fn with_backend(backend: HttpBackend) -> Self {
        Self {
            orders: OrderController::new(backend.clone()),
            items: OrderItemController::new(backend),
        }
    }
}
