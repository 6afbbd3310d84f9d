//! Modal and notification controller.

use log::{debug, warn};

use x2ui_view::{NotificationKind, ResponseView};

use crate::binder::{Binding, UiEvent};
use crate::client::Client;
use crate::dispatch::RequestFailure;
use crate::dom::ElementId;

pub const NOTIFICATION_AREA: &str = "notification-area";
pub const FORM_GROUP_PREFIX: &str = "x2_form_group_";
const ERROR_MESSAGE_CLASS: &str = "x2_error_message";

impl Client {
    /// Re-enables the busy button, if any.
    pub fn enable_active_button(&mut self) {
        if let Some(button) = self.session.release_button() {
            self.doc.remove_class(button, "disabled");
            self.doc.set_disabled(button, false);
        }
    }

    /// Area notifications currently go to: the open dialog's own area, else the page area.
    fn notification_target(&mut self) -> ElementId {
        let Some(modal) = self.session.active_modal().filter(|m| self.doc.is_live(*m)) else {
            return self.shell.notification_area;
        };
        let area_id = format!(
            "{NOTIFICATION_AREA}-{}",
            self.doc.dom_id(modal).unwrap_or_default()
        );
        if let Some(area) = self.doc.find(&area_id) {
            return area;
        }

        let area = self.doc.create_with("div", "col-lg-12 m-t-sm");
        self.doc.set_id(area, &area_id);
        match self.doc.find_first(modal, |e| e.has_class("modal-body")) {
            Some(body) => self.doc.prepend(body, area),
            None => self.doc.prepend(modal, area),
        }
        area
    }

    /// Empties every notification area and removes inline field annotations.
    pub fn clear_notifications(&mut self) {
        let root = self.doc.root();
        let mut areas = vec![self.shell.notification_area];
        areas.extend(self.doc.find_all(root, |e| {
            e.dom_id()
                .is_some_and(|id| id.starts_with(&format!("{NOTIFICATION_AREA}-")))
        }));
        for area in areas {
            let freed = self.doc.clear_children(area);
            self.forget(&freed);
        }
        self.session.set_last_error(None);

        for group in self.doc.by_class(root, "form-group") {
            self.doc.remove_class(group, "has-error");
        }
        let stale = self.doc.find_all(root, |e| {
            matches!(e.tag(), "small" | "br") && e.has_class(ERROR_MESSAGE_CLASS)
        });
        for el in stale {
            if self.doc.closest(el, |e| e.tag() == "label").is_some() {
                let freed = self.doc.remove(el);
                self.forget(&freed);
            }
        }
    }

    /// Shows a failed round trip and annotates the offending form fields.
    pub fn handle_backend_error(&mut self, failure: &RequestFailure) {
        self.enable_active_button();
        self.clear_notifications();
        let area = self.notification_target();

        if let Some(errors) = failure.validation() {
            self.session.set_last_error(Some(errors.clone()));
            for fe in &errors.errors {
                let Some(key) = fe.key.as_deref() else {
                    continue;
                };
                let Some(group) = self.doc.find(&format!("{FORM_GROUP_PREFIX}{key}")) else {
                    debug!("notify: no form group for field '{key}'");
                    continue;
                };
                self.doc.add_class(group, "has-error");
                for label in self.doc.by_tag(group, "label") {
                    for old in self.doc.find_all(label, |e| e.has_class(ERROR_MESSAGE_CLASS)) {
                        self.doc.remove(old);
                    }
                    self.doc.append_new(label, "br", ERROR_MESSAGE_CLASS);
                    let small = self.doc.append_new(label, "small", ERROR_MESSAGE_CLASS);
                    self.doc
                        .append_text(small, fe.message.as_deref().unwrap_or_default());
                }
            }
        }

        let alert = self.dismissable_alert(area, "alert alert-danger alert-dismissable");
        let b = self.doc.append_new(alert, "b", "");
        self.doc.append_text(b, failure.label());
        let span = self.doc.append_new(alert, "span", "m-l-sm");
        let pre = self.doc.append_new(span, "pre", "");
        self.doc.append_text(pre, &failure.detail());
    }

    /// Replaces the current notification with the response's info or warning message.
    pub fn handle_notification(&mut self, view: &ResponseView) {
        self.clear_notifications();
        let area = self.notification_target();
        let Some(n) = view.notification() else {
            return;
        };
        let class = match n.kind {
            NotificationKind::Warn => "alert alert-warning alert-dismissable",
            NotificationKind::Info => "alert alert-info alert-dismissable",
        };
        let alert = self.dismissable_alert(area, class);
        let span = self.doc.append_new(alert, "span", "m-l-sm");
        self.doc.append_text(span, &n.text);
    }

    fn dismissable_alert(&mut self, area: ElementId, class: &str) -> ElementId {
        let alert = self.doc.append_new(area, "div", class);
        let close = self.doc.append_new(alert, "button", "close");
        self.doc.set_attr(close, "aria-hidden", "true");
        self.doc.set_attr(close, "data-dismiss", "alert");
        self.doc.set_attr(close, "type", "button");
        self.doc.append_text(close, "\u{d7}");
        self.bindings.add(close, UiEvent::Click, Binding::DismissAlert(alert));
        alert
    }

    /// Displays `dialog` as the active modal, closing any modal already open.
    pub(crate) fn show_modal(&mut self, dialog: ElementId) {
        if let Some(previous) = self.session.take_active_modal() {
            if previous != dialog {
                self.hide_modal(previous);
            }
        }
        self.open_dialog(dialog);
        self.session.set_active_modal(dialog);
    }

    /// Displays `dialog` without making it the active modal.
    pub(crate) fn open_dialog(&mut self, dialog: ElementId) {
        if self.doc.parent(dialog).is_none() {
            self.doc.append(self.shell.modal_root, dialog);
        }
        self.doc.add_class(dialog, "in");
        self.doc.set_style(dialog, "display", "block");
    }

    /// Hides a dialog; hidden dialogs are discarded.
    pub(crate) fn hide_modal(&mut self, dialog: ElementId) {
        if self.session.active_modal() == Some(dialog) {
            self.session.take_active_modal();
        }
        if !self.doc.is_live(dialog) {
            return;
        }
        let freed = self.doc.remove(dialog);
        self.forget(&freed);
    }

    /// Closes the active modal, if any.
    pub fn dismiss_modal(&mut self) {
        if let Some(modal) = self.session.take_active_modal() {
            self.hide_modal(modal);
        }
    }

    /// Closes the dialog whose DOM id is `dom_id`.
    pub fn close_dialog(&mut self, dom_id: &str) {
        match self.doc.find(dom_id) {
            Some(dialog) => self.hide_modal(dialog),
            None => warn!("notify: no dialog '{dom_id}' to close"),
        }
    }
}
