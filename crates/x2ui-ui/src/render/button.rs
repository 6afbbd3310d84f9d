use log::debug;
use std::time::Duration;

use x2ui_view::{ActionRequest, ButtonDef, ExecutionMode, ViewKind, ViewNode};

use super::{one, Rendered};
use crate::binder::{Binding, UiEvent};
use crate::client::Client;
use crate::dom::ElementId;

/// Timer payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Presses a scheduled button.
    Fire(ElementId),
}

pub(super) fn button(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Button(def) = &node.kind else {
        return Rendered::new();
    };
    one(build_button(c, def))
}

/// Builds a busy-guarded button and arms its timer, if any.
pub(crate) fn build_button(c: &mut Client, def: &ButtonDef) -> ElementId {
    let class = match def.extendedclass.as_deref().filter(|e| !e.is_empty()) {
        Some(ext) => format!("btn btn-primary btn-sm {ext}"),
        None => "btn btn-primary btn-sm".to_owned(),
    };
    let btn = c.doc.create_with("button", &class);
    c.doc.set_attr(btn, "type", "button");
    c.doc.set_id(btn, &uuid::Uuid::new_v4().to_string());
    if let Some(style) = def.style.as_deref() {
        c.doc.set_style_text(btn, style);
    }
    if def.hidden {
        c.doc.set_style(btn, "display", "none");
    }
    if let Some(icon) = def.icon.as_deref().filter(|i| !i.is_empty()) {
        c.doc.append_new(btn, "i", &format!("fa {icon}"));
    }
    if let Some(title) = def.title.as_deref() {
        c.doc.append_text(btn, title);
    }

    c.bindings.add(
        btn,
        UiEvent::Click,
        Binding::Button(ActionRequest::from_button(def)),
    );

    let period = Duration::from_millis(u64::from(def.execution_interval));
    match def.execution_mode {
        ExecutionMode::Click => {}
        ExecutionMode::Timeout => {
            c.timers.once(period, TimerTask::Fire(btn));
        }
        ExecutionMode::Interval => {
            let id = c.timers.every(period, TimerTask::Fire(btn));
            debug!("render: button interval {id:?} every {period:?}");
        }
    }
    btn
}
