//! Application side menu, top menu with its task sidebar, and user menu.

use log::debug;
use serde_json::{Map, Value};

use x2ui_core::UiResult;
use x2ui_transport::{Endpoints, RequestBody};
use x2ui_view::{ActionRequest, ApplicationFeature, ServerEvent, ViewKind, ViewNode};

use super::Rendered;
use crate::binder::{Binding, UiEvent};
use crate::client::Client;
use crate::dispatch::{Completion, Region};
use crate::dom::ElementId;

const RIGHT_SIDEBAR: &str = "right-sidebar";
pub(crate) const USER_APP_MENU: &str = "user-app-menu";

/// Action request for a menu entry.
pub(crate) fn feature_request(f: &ApplicationFeature) -> ActionRequest {
    ActionRequest {
        target: f.target.clone(),
        form_id: None,
        description: f.description.clone(),
        action: f.action.clone(),
        attributes: f.attributes.clone(),
    }
}

pub(super) fn top_menu(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::TopMenu(p) = &node.kind else {
        return Rendered::new();
    };
    let mut out = Rendered::new();

    let title = c.doc.create("li");
    let a = c.doc.append_new(title, "a", "m-r-sm text-muted welcome-message");
    c.doc.append_text(a, node.title());
    out.push(title);

    if p.show_logout {
        let li = c.doc.create("li");
        let a = c.doc.append_new(li, "a", "");
        c.doc.set_attr(a, "href", "#");
        c.doc.append_new(a, "i", "fa fa-sign-out");
        c.doc.append_text(a, " Log out");
        c.bindings.add(a, UiEvent::Click, Binding::Logout);
        out.push(li);
    }

    if !p.items.is_empty() {
        let li = c.doc.create("li");
        let a = c.doc.append_new(li, "a", "right-sidebar-toggle");
        c.doc.append_new(a, "i", "fa fa-tasks");
        c.bindings
            .add(a, UiEvent::Click, Binding::ToggleTasks(p.items.clone()));
        out.push(li);
    }
    out
}

pub(super) fn user_menu(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::UserMenu(p) = &node.kind else {
        return Rendered::new();
    };
    let mut out = Rendered::new();
    for item in &p.items {
        if item.divider {
            out.push(c.doc.create_with("li", "divider"));
            continue;
        }
        let li = c.doc.create("li");
        let a = c.doc.append_new(li, "a", "");
        c.doc.append_text(a, item.title.as_deref().unwrap_or_default());
        let req = ActionRequest {
            target: item.target.clone(),
            action: item.action.clone(),
            ..Default::default()
        };
        c.bindings.add(a, UiEvent::Click, Binding::Invoke(req));
        out.push(li);
    }
    out
}

impl Client {
    /// Rebuilds the side menu from the feature list.
    pub(crate) fn application_menu(&mut self, features: &[ApplicationFeature]) -> UiResult<()> {
        let menu = self.shell.side_menu;
        let freed = self.doc.clear_children(menu);
        self.forget(&freed);

        let header = self.doc.append_new(menu, "li", "nav-header");
        let signed_in = self.session.user().cloned();
        if let Some(user) = &signed_in {
            let profile = self.doc.append_new(header, "div", "dropdown profile-element");
            let span = self.doc.append_new(profile, "span", "");
            let img = self.doc.append_new(span, "img", "img-circle");
            self.doc.set_id(img, "user_profile_image");
            self.doc.set_attr(img, "width", "48");
            self.doc.set_attr(img, "height", "48");
            self.doc.set_attr(img, "alt", "image");
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("id", &user.id)
                .finish();
            let src = format!(
                "{}/authentication/profile_picture?{query}",
                self.dispatcher.endpoints().app_root()
            );
            self.doc.set_attr(img, "src", &src);

            let toggle = self.doc.append_new(profile, "a", "dropdown-toggle");
            self.doc.set_attr(toggle, "data-toggle", "dropdown");
            self.doc.set_attr(toggle, "href", "#");
            let clear = self.doc.append_new(toggle, "span", "clear");
            let name = self.doc.append_new(clear, "span", "block m-t-xs");
            let strong = self.doc.append_new(name, "strong", "font-bold");
            self.doc.append_text(strong, &user.display_name());
            let upn = self.doc.append_new(clear, "span", "text-muted text-xs block");
            self.doc
                .append_text(upn, &format!("({})", user.user_principal_name));
            self.doc.append_new(upn, "b", "caret");

            let list = self
                .doc
                .append_new(profile, "ul", "dropdown-menu animated fadeInRight m-t-xs");
            self.doc.set_id(list, USER_APP_MENU);
            let li = self.doc.append_new(list, "li", "");
            let logout = self.doc.append_new(li, "a", "");
            self.doc.set_attr(logout, "href", "#");
            self.doc.append_text(logout, "Logout");
            self.bindings.add(logout, UiEvent::Click, Binding::Logout);
        }
        let logo = self.doc.append_new(header, "div", "logo-element");
        let key = self.settings.app_key.clone();
        self.doc.append_text(logo, &key);

        if signed_in.is_some() {
            self.run_event(&ServerEvent {
                event: "onUserMenu".to_owned(),
                target: Some(USER_APP_MENU.to_owned()),
                payload: Value::Object(Map::new()),
            })?;
        }

        self.build_menu(features, menu, 1);
        Ok(())
    }

    fn build_menu(&mut self, features: &[ApplicationFeature], parent: ElementId, level: u32) {
        for f in features {
            let li = self.doc.append_new(parent, "li", "");
            let a = self.doc.append_new(li, "a", "");
            self.doc.set_attr(a, "href", "#");
            if f.has_backend() {
                self.bindings.add(a, UiEvent::Click, Binding::Feature(f.clone()));
            }
            let icon = format!("fa {}", f.icon.as_deref().unwrap_or_default());
            self.doc.append_new(a, "i", &icon);
            if level == 1 {
                self.doc.append_text(a, " ");
                let label = self.doc.append_new(a, "span", "nav-label");
                self.doc.append_text(label, f.title());
                self.doc.append_text(a, " ");
                self.doc.append_new(a, "span", "fa arrow");
            } else {
                self.doc.append_text(a, f.title());
            }
            if !f.subfeatures.is_empty() {
                let level_class = if level == 1 {
                    "nav nav-second-level collapse"
                } else {
                    "nav nav-third-level collapse"
                };
                let sub = self.doc.append_new(li, "ul", level_class);
                self.build_menu(&f.subfeatures, sub, level + 1);
            }
        }
    }

    /// Menu click: a local script, else a feature request whose panel replaces the page.
    pub fn open_feature(&mut self, feature: &ApplicationFeature) -> UiResult<()> {
        if let Some(script) = feature.script.as_deref().filter(|s| !s.trim().is_empty()) {
            return self.run_local(script);
        }
        let Some(backend) = feature.backend.as_deref().filter(|b| !b.is_empty()) else {
            return Ok(());
        };
        self.send(
            Endpoints::feature(backend),
            RequestBody::Json(feature.to_json()),
            Completion::RunFeature,
            Some(Region::Feature),
        );
        Ok(())
    }

    /// Opens the task sidebar, or closes it when already open.
    pub(crate) fn toggle_tasks(&mut self, items: &[ApplicationFeature]) -> UiResult<()> {
        if let Some(open) = self.doc.find(RIGHT_SIDEBAR) {
            let freed = self.doc.remove(open);
            self.forget(&freed);
            return Ok(());
        }

        let bar = self.doc.create_with("div", "sidebar-open");
        self.doc.set_id(bar, RIGHT_SIDEBAR);
        let scroll = self.doc.append_new(bar, "div", "slimScrollDiv");
        self.doc.set_style_text(
            scroll,
            "position: relative; overflow-x: hidden; overflow-y: auto; width: auto; height: 100%;",
        );
        let container = self.doc.append_new(scroll, "div", "sidebar-container");
        self.doc
            .set_style_text(container, "overflow: hidden; width: auto; height: 100%;");

        let tabs = self
            .doc
            .append_new(container, "ul", &format!("nav nav-tabs navs-{}", items.len() + 1));
        for (i, item) in items.iter().enumerate() {
            let li = self
                .doc
                .append_new(tabs, "li", if i == 0 { "active" } else { "" });
            let a = self.doc.append_new(li, "a", "");
            self.doc.set_attr(a, "data-toggle", "tab");
            self.doc.set_attr(a, "href", &format!("#tab-{i}"));
            self.doc
                .set_attr(a, "aria-expanded", if i == 0 { "true" } else { "false" });
            self.doc.append_text(a, item.title());
            self.bindings
                .add(a, UiEvent::Click, Binding::Invoke(feature_request(item)));
        }
        let filler = self.doc.append_new(tabs, "li", "");
        let a = self.doc.append_new(filler, "a", "");
        self.doc.set_style(a, "color", "#2f4050");
        self.doc.append_text(a, "_");

        let content = self.doc.append_new(container, "div", "tab-content");
        for (i, item) in items.iter().enumerate() {
            let pane = self.doc.append_new(
                content,
                "div",
                if i == 0 { "tab-pane active" } else { "tab-pane" },
            );
            self.doc.set_id(pane, &format!("tab-{i}"));
            if item.subfeatures.is_empty() {
                continue;
            }
            let title = self.doc.append_new(pane, "div", "sidebar-title");
            let list = self.doc.append_new(title, "ul", "list-group");
            for sub in &item.subfeatures {
                let li = self.doc.append_new(list, "li", "list-group-item");
                let a = self.doc.append_new(li, "a", "");
                let icon = format!("fa {}", sub.icon.as_deref().unwrap_or_default());
                self.doc.append_new(a, "i", &icon);
                let span = self.doc.append_new(a, "span", "");
                self.doc.set_style(span, "margin-left", "0.3em");
                self.doc.append_text(span, sub.title());
                self.bindings
                    .add(a, UiEvent::Click, Binding::Invoke(feature_request(sub)));
            }
        }
        self.doc.append(self.shell.wrapper, bar);

        match items.first() {
            Some(first) if first.action.as_deref().is_some_and(|a| !a.is_empty()) => {
                self.invoke(&feature_request(first))
            }
            _ => {
                debug!("menu: task sidebar opened without an initial action");
                Ok(())
            }
        }
    }
}
