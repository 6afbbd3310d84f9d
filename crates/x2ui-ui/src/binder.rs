//! Event binder: what each element does when an interaction fires on it.

use ahash::AHashMap;
use log::{debug, warn};
use smallvec::SmallVec;

use x2ui_core::{UiError, UiResult};
use x2ui_transport::{Endpoints, RequestBody};
use x2ui_view::{ActionRequest, ApplicationFeature, LOCAL_SCRIPT_PREFIX};

use crate::capability::ScriptCall;
use crate::client::Client;
use crate::dispatch::{Completion, Region, RequestFailure};
use crate::dom::ElementId;
use crate::table::{PageControl, TableId};

/// Multipart field carrying the serialized action descriptor.
pub const VIEW_FIELD: &str = "cx2.sys.view";

/// Interaction names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UiEvent {
    Click,
    Change,
    KeyPress,
    Submit,
    Named(String),
}

impl UiEvent {
    pub fn parse(name: &str) -> Self {
        let n = name.trim().to_ascii_lowercase();
        match n.as_str() {
            "click" => UiEvent::Click,
            "change" => UiEvent::Change,
            "keypress" => UiEvent::KeyPress,
            "submit" => UiEvent::Submit,
            _ => UiEvent::Named(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Binding {
    /// Declared handler, menu entry, legend.
    Invoke(ActionRequest),
    /// Busy-guarded button.
    Button(ActionRequest),
    /// Text input submitting on Enter.
    OnEnter(ActionRequest),
    Feature(ApplicationFeature),
    TableSort { table: TableId, column: String },
    TablePage { table: TableId, control: PageControl },
    DataListPick(ElementId),
    DataListEdit { list: ElementId, item: ElementId },
    ToggleTasks(Vec<ApplicationFeature>),
    Collapse(ElementId),
    CloseWindow(ElementId),
    DismissAlert(ElementId),
    Logout,
}

#[derive(Debug, Default)]
pub(crate) struct Bindings {
    map: AHashMap<(ElementId, UiEvent), SmallVec<[Binding; 1]>>,
}

impl Bindings {
    pub fn add(&mut self, el: ElementId, event: UiEvent, binding: Binding) {
        self.map.entry((el, event)).or_default().push(binding);
    }

    pub fn get(&self, el: ElementId, event: &UiEvent) -> SmallVec<[Binding; 1]> {
        self.map
            .get(&(el, event.clone()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has(&self, el: ElementId, event: &UiEvent) -> bool {
        self.map.contains_key(&(el, event.clone()))
    }

    /// Drops bindings of removed elements.
    pub fn purge(&mut self, freed: &[ElementId]) {
        if freed.is_empty() || self.map.is_empty() {
            return;
        }
        let dead: ahash::AHashSet<ElementId> = freed.iter().copied().collect();
        self.map.retain(|(el, _), _| !dead.contains(el));
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl Client {
    /// Fires `event` on `el`, running every binding in registration order.
    pub fn trigger(&mut self, el: ElementId, event: UiEvent) -> UiResult<()> {
        self.fire(el, &event, None)
    }

    #[inline]
    pub fn click(&mut self, el: ElementId) -> UiResult<()> {
        self.trigger(el, UiEvent::Click)
    }

    #[inline]
    pub fn change(&mut self, el: ElementId) -> UiResult<()> {
        self.trigger(el, UiEvent::Change)
    }

    /// Fires a key press; Enter-bound inputs only react to `"Enter"`.
    pub fn press_key(&mut self, el: ElementId, key: &str) -> UiResult<()> {
        self.fire(el, &UiEvent::KeyPress, Some(key))
    }

    /// Whether anything reacts to `event` on `el`.
    #[inline]
    pub fn is_bound(&self, el: ElementId, event: &UiEvent) -> bool {
        self.bindings.has(el, event)
    }

    fn fire(&mut self, el: ElementId, event: &UiEvent, key: Option<&str>) -> UiResult<()> {
        if !self.doc.is_live(el) {
            debug!("binder: {event:?} on a removed element ignored");
            return Ok(());
        }
        for binding in self.bindings.get(el, event) {
            self.run_binding(el, binding, key)?;
        }
        Ok(())
    }

    fn run_binding(&mut self, el: ElementId, binding: Binding, key: Option<&str>) -> UiResult<()> {
        match binding {
            Binding::Invoke(req) => self.invoke(&req),
            Binding::Button(req) => self.press_button(el, &req),
            Binding::OnEnter(req) => {
                if key == Some("Enter") {
                    self.invoke(&req)
                } else {
                    Ok(())
                }
            }
            Binding::Feature(feature) => self.open_feature(&feature),
            Binding::TableSort { table, column } => {
                self.table_sort(table, &column);
                Ok(())
            }
            Binding::TablePage { table, control } => {
                self.table_page(table, control);
                Ok(())
            }
            Binding::DataListPick(list) => self.datalist_pick(list),
            Binding::DataListEdit { list, item } => self.datalist_edit(list, Some(item)),
            Binding::ToggleTasks(items) => self.toggle_tasks(&items),
            Binding::Collapse(ibox) => {
                self.toggle_collapse(ibox, el);
                Ok(())
            }
            Binding::CloseWindow(win) => {
                let freed = self.doc.remove(win);
                self.forget(&freed);
                Ok(())
            }
            Binding::DismissAlert(alert) => {
                let freed = self.doc.remove(alert);
                self.forget(&freed);
                Ok(())
            }
            Binding::Logout => {
                self.sign_out();
                Ok(())
            }
        }
    }

    /// Busy-guarded button press.
    pub(crate) fn press_button(&mut self, button: ElementId, req: &ActionRequest) -> UiResult<()> {
        if !self.doc.is_attached(button) {
            debug!("binder: detached button ignored");
            return Ok(());
        }
        if self.doc.disabled(button) || !self.session.claim_button(button) {
            debug!("binder: button busy, press ignored");
            return Ok(());
        }
        self.doc.set_disabled(button, true);
        self.doc.add_class(button, "disabled");
        self.invoke(req)
    }

    /// Runs an action: a local capability, a dialog dismissal or a backend post.
    pub fn invoke(&mut self, req: &ActionRequest) -> UiResult<()> {
        if let Some(script) = req.local_script() {
            self.run_local(script)?;
            self.enable_active_button();
            return Ok(());
        }

        if !req.has_target() {
            if let Some(modal) = self.session.take_active_modal() {
                self.hide_modal(modal);
                if req.action.as_deref().is_some_and(|a| !a.is_empty()) {
                    self.post_form_data(req);
                } else {
                    self.enable_active_button();
                }
                return Ok(());
            }
        }

        self.post_form_data(req);
        Ok(())
    }

    /// Runs a local capability; failures are shown like a server error and returned.
    pub(crate) fn run_local(&mut self, script: &str) -> UiResult<()> {
        let script = script.strip_prefix(LOCAL_SCRIPT_PREFIX).unwrap_or(script);
        let outcome = ScriptCall::parse(script).and_then(|call| {
            let Some(cap) = self.capabilities.get(&call.name) else {
                return Err(UiError::script(
                    format!("unknown local action '{}'", call.name),
                    format!("at {call}"),
                ));
            };
            cap(self, &call.args).map_err(|e| match e {
                e @ UiError::Script { .. } => e,
                other => UiError::script(other.to_string(), format!("at {call}")),
            })
        });

        if let Err(e) = &outcome {
            warn!("binder: local action failed: {e}");
            self.handle_backend_error(&RequestFailure::from_error(e));
        }
        outcome
    }

    fn post_form_data(&mut self, req: &ActionRequest) {
        let target = req.target.as_deref().filter(|t| !t.is_empty());

        if let (Some(t), Some(desc)) = (target, req.description.as_deref()) {
            if let Some(title) = self.doc.find(&format!("title-{t}")) {
                let freed = self.doc.set_text(title, desc);
                self.forget(&freed);
            }
        }

        let Some(action) = req.action.as_deref().filter(|a| !a.is_empty()) else {
            warn!("binder: request without an action dropped");
            self.enable_active_button();
            return;
        };

        let body = match req.form_id.as_deref().filter(|f| !f.is_empty()) {
            Some(form_id) => {
                let mut form = match self.doc.find(form_id) {
                    Some(form) => self.doc.form_data(form),
                    None => {
                        warn!("binder: form '{form_id}' not found, posting the descriptor only");
                        x2ui_transport::MultipartForm::new()
                    }
                };
                form.text(VIEW_FIELD, req.to_json());
                RequestBody::Multipart(form)
            }
            None => RequestBody::Json(req.to_json()),
        };

        let context = target.and_then(|t| self.doc.find(t));
        self.send(
            Endpoints::action(action),
            body,
            Completion::RunAction { context },
            context.map(Region::Element),
        );
    }

    /// Submits `form_dom_id` to `action`, rendering the answer into `target`.
    ///
    /// With `dialog_id`, that dialog is closed once the response has been applied.
    pub fn submit_form(
        &mut self,
        form_dom_id: &str,
        action: &str,
        target: &str,
        dialog_id: Option<&str>,
    ) -> UiResult<()> {
        if let (Some(el), Some(dialog)) = (self.doc.find(target), dialog_id) {
            self.dialog_links.insert(el, dialog.to_owned());
        }
        self.invoke(&ActionRequest {
            target: Some(target.to_owned()),
            form_id: Some(form_dom_id.to_owned()),
            action: Some(action.to_owned()),
            ..Default::default()
        })
    }

    pub(crate) fn toggle_collapse(&mut self, ibox: ElementId, link: ElementId) {
        if let Some(content) = self.doc.find_first(ibox, |e| e.has_class("ibox-content")) {
            let hidden = self.doc.style(content, "display") == Some("none");
            self.doc
                .set_style(content, "display", if hidden { "block" } else { "none" });
        }
        if let Some(icon) = self.doc.find_first(link, |e| e.tag() == "i") {
            for class in ["fa-chevron-up", "fa-chevron-down"] {
                if self.doc.has_class(icon, class) {
                    self.doc.remove_class(icon, class);
                } else {
                    self.doc.add_class(icon, class);
                }
            }
        }
        if self.doc.has_class(ibox, "border-bottom") {
            self.doc.remove_class(ibox, "border-bottom");
        } else {
            self.doc.add_class(ibox, "border-bottom");
        }
    }
}
