use std::fmt::Write as _;

use client_core::{ControllerEvent, EntitySchema, FormRecord, Outcome, ViewState};

pub fn render_view<S: EntitySchema>(view: &ViewState<S>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] form", S::LABEL);
    for (name, value) in view.form.entries() {
        let _ = writeln!(out, "  {name:<12} {value}");
    }
    if let Some(table) = &view.table {
        let _ = writeln!(out, "[{}] results ({} rows)", S::LABEL, table.len());
        for line in table.render_text().lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    if let Some(status) = &view.status {
        let _ = writeln!(out, "[{}] {status}", S::LABEL);
    }
    out
}

pub fn render_event<S: EntitySchema>(event: &ControllerEvent<S>) -> String {
    let ControllerEvent::Completed {
        seq,
        action,
        outcome,
        view,
    } = event;
    let verdict = match outcome {
        Outcome::Succeeded { .. } => "ok",
        Outcome::Failed { .. } => "failed",
        Outcome::Local => "local",
    };
    format!("#{seq} {} {action} {verdict}\n{}", S::LABEL, render_view(view))
}
