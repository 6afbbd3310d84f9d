//! Interpreter context.
//!
//! A [`Client`] owns the element document, the interaction session and every sub-controller
//! record. Hosts feed it interactions (`click`, `change`, `press_key`), drive the network with
//! [`Client::pump`] and the timers with [`Client::advance`], and drain [`ClientEffect`]s.

use ahash::AHashMap;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use x2ui_core::{Bus, ClientConfig, Scheduler, UiResult};
use x2ui_transport::{Endpoints, RequestBody, TransportRef};
use x2ui_view::{
    ResponseRoute, ResponseView, ServerEvent, ViewNode, ViewTag, LOCAL_SCRIPT_PREFIX,
};

use crate::binder::Bindings;
use crate::capability::LocalActions;
use crate::dispatch::{Completion, Dispatcher, Region};
use crate::dom::{Document, ElementId};
use crate::render::{dialog_frame, render_row, DataLists, RendererTable, Rendered, TimerTask};
use crate::session::{UiSession, UserIdentity};
use crate::table::TableRegistry;

pub const APPLICATION_MENU: &str = "application-menu";
pub const FEATURE_TITLE: &str = "feature-title";
pub const FEATURE_BODY: &str = "feature-body";
pub const SIDE_MENU: &str = "side-menu";

/// Work the interpreter hands back to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEffect {
    Navigate(String),
    Download(String),
    SignedOut,
}

/// Fixed regions of the page.
#[derive(Debug, Clone, Copy)]
pub struct Shell {
    pub wrapper: ElementId,
    pub side_menu: ElementId,
    pub application_menu: ElementId,
    pub feature_title: ElementId,
    pub notification_area: ElementId,
    pub feature_body: ElementId,
    pub modal_root: ElementId,
}

impl Shell {
    fn build(doc: &mut Document) -> Self {
        let root = doc.root();
        let wrapper = doc.append_new(root, "div", "");
        doc.set_id(wrapper, "wrapper");

        let nav = doc.append_new(wrapper, "nav", "navbar-default navbar-static-side");
        let side_menu = doc.append_new(nav, "ul", "nav metismenu");
        doc.set_id(side_menu, SIDE_MENU);

        let page = doc.append_new(wrapper, "div", "gray-bg");
        doc.set_id(page, "page-wrapper");
        let application_menu = doc.append_new(page, "ul", "nav navbar-top-links navbar-right");
        doc.set_id(application_menu, APPLICATION_MENU);
        let feature_title = doc.append_new(page, "div", "row wrapper border-bottom white-bg page-heading");
        doc.set_id(feature_title, FEATURE_TITLE);
        let notification_area = doc.append_new(page, "div", "col-lg-12");
        doc.set_id(notification_area, crate::notify::NOTIFICATION_AREA);
        let feature_body = doc.append_new(page, "div", "wrapper wrapper-content");
        doc.set_id(feature_body, FEATURE_BODY);

        let modal_root = doc.append_new(root, "div", "");
        doc.set_id(modal_root, "modal-root");

        Self {
            wrapper,
            side_menu,
            application_menu,
            feature_title,
            notification_area,
            feature_body,
            modal_root,
        }
    }
}

/// Host settings visible to renderers and capabilities.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub app_title: String,
    pub app_key: String,
    pub extra: HashMap<String, String>,
}

impl Settings {
    fn from_config(config: &ClientConfig) -> Self {
        Self {
            app_title: config.app_title.clone(),
            app_key: config.app_key.clone(),
            extra: config.extra.clone(),
        }
    }
}

pub struct Client {
    pub(crate) doc: Document,
    pub(crate) session: UiSession,
    pub(crate) shell: Shell,
    pub(crate) settings: Settings,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) bindings: Bindings,
    pub(crate) tables: TableRegistry,
    pub(crate) datalists: DataLists,
    /// In-place targets whose answer closes a dialog, by dialog DOM id.
    pub(crate) dialog_links: AHashMap<ElementId, String>,
    pub(crate) capabilities: LocalActions,
    pub(crate) renderers: RendererTable,
    pub(crate) timers: Scheduler<TimerTask>,
    effects: Bus<ClientEffect>,
}

impl Client {
    pub fn new(config: &ClientConfig, transport: TransportRef) -> Self {
        let mut doc = Document::new();
        let shell = Shell::build(&mut doc);
        let endpoints = Endpoints::new(config.app_root());
        info!(
            "client: {:?} deployment, events at {}/events",
            config.deployment,
            endpoints.app_root()
        );
        Self {
            doc,
            session: UiSession::default(),
            shell,
            settings: Settings::from_config(config),
            dispatcher: Dispatcher::new(transport, endpoints, config.max_requests_per_pump),
            bindings: Bindings::default(),
            tables: TableRegistry::default(),
            datalists: DataLists::default(),
            dialog_links: AHashMap::new(),
            capabilities: LocalActions::builtin(),
            renderers: RendererTable::builtin(),
            timers: Scheduler::new(),
            effects: Bus::unbounded(),
        }
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable document, for hosts simulating user input (typing, choosing files).
    #[inline]
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[inline]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    #[inline]
    pub fn session(&self) -> &UiSession {
        &self.session
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Adds or replaces a named local action.
    pub fn register_capability<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&mut Client, &[String]) -> UiResult<()> + Send + Sync + 'static,
    {
        self.capabilities.register(name, f);
    }

    /// Adds a renderer for a view class the interpreter does not know.
    pub fn register_renderer<F>(&mut self, class: &str, f: F)
    where
        F: Fn(&mut Client, &ViewNode) -> Rendered + Send + Sync + 'static,
    {
        self.renderers.register(class, f);
    }

    pub(crate) fn push_effect(&mut self, effect: ClientEffect) {
        if !self.effects.post(effect) {
            warn!("client: effect dropped, host is not draining");
        }
    }

    /// Drains pending effects in emission order.
    pub fn take_effects(&mut self) -> Vec<ClientEffect> {
        let mut out = Vec::new();
        self.effects.collect_into(&mut out);
        out
    }

    /// Drops every record keyed by a removed element.
    pub(crate) fn forget(&mut self, freed: &[ElementId]) {
        if freed.is_empty() {
            return;
        }
        self.bindings.purge(freed);
        self.tables.purge(freed);
        self.datalists.purge(freed);
        self.dialog_links.retain(|el, _| !freed.contains(el));
    }

    /// Loads the side menu and the top menu.
    pub fn start(&mut self) -> UiResult<()> {
        self.run_event(&ServerEvent {
            event: "onListFeatures".to_owned(),
            target: None,
            payload: Value::Null,
        })?;
        self.run_event(&ServerEvent {
            event: "onTopMenu".to_owned(),
            target: Some(APPLICATION_MENU.to_owned()),
            payload: Value::Null,
        })
    }

    /// Dispatches a named server event; its answer renders into `target`.
    pub fn run_event(&mut self, event: &ServerEvent) -> UiResult<()> {
        if event.event == "onListFeatures" {
            self.send(
                "onListFeatures".to_owned(),
                RequestBody::Empty,
                Completion::ApplicationMenu,
                Some(Region::Menu),
            );
            return Ok(());
        }
        if let Some(target) = event
            .target
            .as_deref()
            .filter(|t| t.starts_with(LOCAL_SCRIPT_PREFIX))
        {
            return self.run_local(target);
        }

        let context = event.target.as_deref().and_then(|t| self.doc.find(t));
        if event.target.is_some() && context.is_none() {
            debug!("client: event {} targets a missing element", event.event);
        }
        self.send(
            event.event.clone(),
            RequestBody::Json(event.payload.to_string()),
            Completion::RunAction { context },
            context.map(Region::Element),
        );
        Ok(())
    }

    /// Applies an action response: queued events first, then the panel, dialog or in-place view.
    pub fn run_action(&mut self, view: &ResponseView, context: Option<ElementId>) -> UiResult<()> {
        self.enable_active_button();
        let target = context.filter(|t| self.doc.is_live(*t));
        let route = view.route();

        if !view.node.class().is_empty() && route != ResponseRoute::Dialog {
            if let Some(t) = target {
                let freed = self.doc.clear_children(t);
                self.forget(&freed);
            }
            if let Some(modal) = self.session.active_modal() {
                let inside = target.is_some_and(|t| self.doc.is_descendant(modal, t));
                if !inside {
                    self.dismiss_modal();
                }
            }
        }

        for event in view.events() {
            self.run_event(event)?;
        }

        match route {
            ResponseRoute::Panel => self.run_feature(view)?,
            ResponseRoute::Dialog => {
                let produced = self.render(&view.node);
                let dialog = match produced.first().copied() {
                    Some(dialog) if view.node.is(ViewTag::Dialog) => Some(dialog),
                    _ => {
                        warn!("client: unreadable dialog shown as a placeholder");
                        let (frame, body) = dialog_frame(self, None);
                        if let Some(id) = view.node.meta.id.as_deref().filter(|id| !id.is_empty()) {
                            self.doc.set_id(frame, id);
                        }
                        for el in produced {
                            self.doc.append(body, el);
                        }
                        Some(frame)
                    }
                };
                if let Some(dialog) = dialog {
                    self.show_modal(dialog);
                }
                self.handle_notification(view);
            }
            ResponseRoute::InPlace => {
                self.handle_notification(view);
                match target {
                    Some(t) if !view.node.class().is_empty() => {
                        self.render_into(t, &view.node);
                    }
                    Some(_) => {}
                    None => debug!("client: in-place response without a live target"),
                }
            }
        }

        if let Some(dialog_id) = target.and_then(|t| self.dialog_links.remove(&t)) {
            self.close_dialog(&dialog_id);
        }
        Ok(())
    }

    /// Replaces the feature title and body with a panel response.
    pub fn run_feature(&mut self, view: &ResponseView) -> UiResult<()> {
        self.enable_active_button();
        self.handle_notification(view);

        let title = self.shell.feature_title;
        let freed = self.doc.clear_children(title);
        self.forget(&freed);
        let col = self.doc.append_new(title, "div", "col-lg-10");
        let h2 = self.doc.append_new(col, "h2", "");
        self.doc.append_text(h2, view.node.title());

        let body = self.shell.feature_body;
        let freed = self.doc.clear_children(body);
        self.forget(&freed);
        if !view.node.is(ViewTag::Panel) {
            self.render_into(body, &view.node);
            return Ok(());
        }
        for row in view.node.children() {
            render_row(self, body, row);
        }
        Ok(())
    }

    /// Holds `user` for every later request and announces the sign-in.
    pub fn sign_in(&mut self, user: UserIdentity, token: impl Into<String>) {
        let payload = user.to_json();
        self.session.sign_in(user, token.into());

        let title = self.shell.feature_title;
        let freed = self.doc.set_text(title, &format!("Welcome to {}", self.settings.app_title));
        self.forget(&freed);
        let body = self.shell.feature_body;
        let freed = self.doc.clear_children(body);
        self.forget(&freed);

        self.send(
            "onUserLogin".to_owned(),
            RequestBody::Json(payload),
            Completion::UserLogin,
            Some(Region::Element(body)),
        );
    }

    pub(crate) fn complete_sign_in(&mut self, view: &ResponseView) -> UiResult<()> {
        self.enable_active_button();
        if let Some(message) = view.message() {
            let body = self.shell.feature_body;
            let freed = self.doc.clear_children(body);
            self.forget(&freed);
            let h1 = self.doc.append_new(body, "h1", "");
            self.doc.append_text(h1, &message);
        }
        self.start()
    }

    pub fn sign_out(&mut self) {
        if self.session.user().is_some() {
            info!("client: signed out");
        }
        self.session.sign_out();
        let home = self.dispatcher.endpoints().app_root().to_owned();
        self.push_effect(ClientEffect::SignedOut);
        self.push_effect(ClientEffect::Navigate(home));
    }

    /// Advances the timer clock, pressing every due button. Returns the number of presses.
    pub fn advance(&mut self, dt: Duration) -> UiResult<usize> {
        let mut fired = 0usize;
        for (id, task) in self.timers.tick(dt) {
            match task {
                TimerTask::Fire(button) => {
                    if !self.doc.is_live(button) {
                        debug!("client: timer {id:?} outlived its button");
                        self.timers.cancel(id);
                        continue;
                    }
                    self.click(button)?;
                    fired += 1;
                }
            }
        }
        Ok(fired)
    }

    /// Timers still armed.
    #[inline]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Serializes the whole page.
    pub fn to_html(&self) -> String {
        self.doc.to_html(self.doc.root())
    }
}
