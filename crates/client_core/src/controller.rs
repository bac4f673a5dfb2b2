//! Entity Sync Controller: action dispatch and response rendering for one
//! entity type.
//!
//! Each action snapshots the form when it is issued, performs exactly one
//! request, then applies the outcome to the view when the response lands.
//! Nothing supersedes or deduplicates in-flight actions: two overlapping
//! actions are applied in completion order and the later one wins.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use reqwest::Method;
use shared::{error::FALLBACK_MESSAGE, protocol::SearchQuery};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    backend::HttpBackend,
    error::{ClientError, ClientResult},
    form::FormRecord,
    schema::EntitySchema,
    table::ResultTable,
};

pub const SUCCESS_MESSAGE: &str = "Success";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Retrieve,
    Delete,
    Cancel,
    Clear,
    ListAll,
    Search(SearchQuery),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Retrieve => "retrieve",
            Action::Delete => "delete",
            Action::Cancel => "cancel",
            Action::Clear => "clear",
            Action::ListAll => "list",
            Action::Search(_) => "search",
        }
    }

    /// Whether a failure of this action also wipes the form, so stale data
    /// is never shown next to an error.
    fn clears_form_on_failure(&self) -> bool {
        matches!(self, Action::Retrieve | Action::Delete | Action::Cancel)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded { message: String },
    Failed { message: String },
    /// Clear: local only, leaves the status line alone.
    Local,
}

impl Outcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Succeeded { message } | Outcome::Failed { message } => Some(message.as_str()),
            Outcome::Local => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed { .. })
    }
}

/// Everything a rendering target shows for one controller.
#[derive(Debug)]
pub struct ViewState<S: EntitySchema> {
    pub form: S::Form,
    pub table: Option<ResultTable>,
    pub status: Option<String>,
}

impl<S: EntitySchema> Clone for ViewState<S> {
    fn clone(&self) -> Self {
        Self {
            form: self.form.clone(),
            table: self.table.clone(),
            status: self.status.clone(),
        }
    }
}

impl<S: EntitySchema> Default for ViewState<S> {
    fn default() -> Self {
        Self {
            form: S::Form::default(),
            table: None,
            status: None,
        }
    }
}

#[derive(Debug)]
pub enum ControllerEvent<S: EntitySchema> {
    Completed {
        seq: u64,
        action: Action,
        outcome: Outcome,
        view: ViewState<S>,
    },
}

impl<S: EntitySchema> Clone for ControllerEvent<S> {
    fn clone(&self) -> Self {
        match self {
            ControllerEvent::Completed {
                seq,
                action,
                outcome,
                view,
            } => ControllerEvent::Completed {
                seq: *seq,
                action: action.clone(),
                outcome: outcome.clone(),
                view: view.clone(),
            },
        }
    }
}

/// What a completed request hands to the renderer.
enum Response<E> {
    One(E),
    Many(Vec<E>),
    Empty,
}

pub struct EntityController<S: EntitySchema> {
    backend: HttpBackend,
    view: Mutex<ViewState<S>>,
    next_seq: AtomicU64,
    events: broadcast::Sender<ControllerEvent<S>>,
}

impl<S: EntitySchema> EntityController<S> {
    pub fn new(backend: HttpBackend) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            backend,
            view: Mutex::new(ViewState::default()),
            next_seq: AtomicU64::new(1),
            events,
        })
    }

    pub fn label(&self) -> &'static str {
        S::LABEL
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent<S>> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ViewState<S> {
        self.view.lock().await.clone()
    }

    pub async fn form(&self) -> S::Form {
        self.view.lock().await.form.clone()
    }

    pub async fn table(&self) -> Option<ResultTable> {
        self.view.lock().await.table.clone()
    }

    pub async fn status(&self) -> Option<String> {
        self.view.lock().await.status.clone()
    }

    /// Local edit of the form, standing in for a user typing into fields.
    pub async fn edit_form<F, R>(&self, edit: F) -> R
    where
        F: FnOnce(&mut S::Form) -> R,
    {
        let mut guard = self.view.lock().await;
        edit(&mut guard.form)
    }

    pub async fn set_field(&self, name: &str, value: &str) -> ClientResult<()> {
        let mut guard = self.view.lock().await;
        guard.form.set_field(name, value)
    }

    /// Snapshots the form, then runs the action on the runtime without
    /// waiting for the response. Later form edits do not reach the request.
    pub async fn dispatch(self: &Arc<Self>, action: Action) -> JoinHandle<Outcome> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let form = self.form().await;
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.run(seq, action, form).await })
    }

    /// Runs one action to completion and applies its outcome to the view.
    pub async fn perform(&self, action: Action) -> Outcome {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let form = self.form().await;
        self.run(seq, action, form).await
    }

    async fn run(&self, seq: u64, action: Action, form: S::Form) -> Outcome {
        if action == Action::Clear {
            let view = {
                let mut guard = self.view.lock().await;
                guard.form.reset();
                guard.clone()
            };
            debug!(entity = S::LABEL, seq, "form cleared");
            self.publish(seq, action, Outcome::Local, view);
            return Outcome::Local;
        }

        let result = self.request(seq, &action, &form).await;

        let (outcome, view) = {
            let mut guard = self.view.lock().await;
            let outcome = match result {
                Ok(response) => {
                    let message = self.render_success(&mut guard, &action, response);
                    Outcome::Succeeded { message }
                }
                Err(err) => {
                    warn!(
                        entity = S::LABEL,
                        action = action.name(),
                        seq,
                        status = err.status_code().map(|s| s.as_u16()),
                        local = err.is_local(),
                        "action failed: {err}"
                    );
                    let message = self.render_failure(&mut guard, &action, &err);
                    Outcome::Failed { message }
                }
            };
            guard.status = outcome.message().map(str::to_string);
            (outcome, guard.clone())
        };

        self.publish(seq, action, outcome.clone(), view);
        outcome
    }

    async fn request(
        &self,
        seq: u64,
        action: &Action,
        form: &S::Form,
    ) -> ClientResult<Response<S::Entity>> {
        match action {
            Action::Create => {
                let path = S::collection_path(form)?;
                debug!(entity = S::LABEL, seq, method = "POST", %path, "issuing request");
                let entity = self
                    .backend
                    .send_json(Method::POST, &path, &S::payload(form))
                    .await?;
                Ok(Response::One(entity))
            }
            Action::Update => {
                let path = S::item_path(form)?;
                debug!(entity = S::LABEL, seq, method = "PUT", %path, "issuing request");
                let entity = self
                    .backend
                    .send_json(Method::PUT, &path, &S::payload(form))
                    .await?;
                Ok(Response::One(entity))
            }
            Action::Retrieve => {
                let path = S::item_path(form)?;
                debug!(entity = S::LABEL, seq, method = "GET", %path, "issuing request");
                Ok(Response::One(self.backend.get_json(&path, &[]).await?))
            }
            Action::Delete => {
                let path = S::item_path(form)?;
                debug!(entity = S::LABEL, seq, method = "DELETE", %path, "issuing request");
                self.backend.send_empty(Method::DELETE, &path).await?;
                Ok(Response::Empty)
            }
            Action::Cancel => {
                let path = S::cancel_path(form)?;
                debug!(entity = S::LABEL, seq, method = "PUT", %path, "issuing request");
                self.backend.send_empty(Method::PUT, &path).await?;
                Ok(Response::Empty)
            }
            Action::ListAll => {
                let path = S::list_path(form);
                debug!(entity = S::LABEL, seq, method = "GET", %path, "issuing request");
                Ok(Response::Many(self.backend.get_json(&path, &[]).await?))
            }
            Action::Search(query) => {
                if !S::SUPPORTS_SEARCH {
                    return Err(ClientError::Unsupported {
                        entity: S::LABEL,
                        action: "search",
                    });
                }
                let path = S::list_path(form);
                debug!(
                    entity = S::LABEL,
                    seq,
                    method = "GET",
                    %path,
                    mode = query.mode.query_key(),
                    "issuing request"
                );
                let params = [(query.mode.query_key(), query.value.as_str())];
                Ok(Response::Many(self.backend.get_json(&path, &params).await?))
            }
            Action::Clear => Ok(Response::Empty),
        }
    }

    fn render_success(
        &self,
        view: &mut ViewState<S>,
        action: &Action,
        response: Response<S::Entity>,
    ) -> String {
        match response {
            Response::One(entity) => {
                S::apply_entity(&mut view.form, &entity);
                info!(
                    entity = S::LABEL,
                    action = action.name(),
                    id = view.form.id(),
                    "form updated"
                );
                SUCCESS_MESSAGE.to_string()
            }
            Response::Many(entities) => {
                view.table = Some(ResultTable::from_entities::<S>(&entities));
                if let Some(first) = entities.first() {
                    S::apply_entity(&mut view.form, first);
                }
                info!(
                    entity = S::LABEL,
                    action = action.name(),
                    rows = entities.len(),
                    "table rebuilt"
                );
                SUCCESS_MESSAGE.to_string()
            }
            Response::Empty => {
                view.form.clear_entity_fields();
                info!(entity = S::LABEL, action = action.name(), "form cleared");
                match action {
                    Action::Cancel => S::CANCELLED_MESSAGE.unwrap_or(SUCCESS_MESSAGE).to_string(),
                    Action::Delete => S::DELETED_MESSAGE.to_string(),
                    _ => SUCCESS_MESSAGE.to_string(),
                }
            }
        }
    }

    fn render_failure(
        &self,
        view: &mut ViewState<S>,
        action: &Action,
        err: &ClientError,
    ) -> String {
        if let ClientError::Unsupported { .. } = err {
            return err.user_message();
        }
        if action.clears_form_on_failure() {
            view.form.clear_entity_fields();
        }
        if err.is_local() {
            return err.user_message();
        }
        match action {
            Action::Delete | Action::Cancel => FALLBACK_MESSAGE.to_string(),
            _ => err.user_message(),
        }
    }

    fn publish(&self, seq: u64, action: Action, outcome: Outcome, view: ViewState<S>) {
        // No subscribers is fine: the view itself is the source of truth.
        let _ = self.events.send(ControllerEvent::Completed {
            seq,
            action,
            outcome,
            view,
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
