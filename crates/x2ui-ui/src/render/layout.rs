//! Containers: windows, rows, forms, sections, areas, tabs, panels and dialogs.

use x2ui_view::{ButtonDef, ViewKind, ViewNode, ViewTag};

use super::button::build_button;
use super::{apply_id, one, Rendered};
use crate::binder::{Binding, UiEvent};
use crate::client::Client;
use crate::dom::ElementId;
use crate::notify::FORM_GROUP_PREFIX;

pub(super) fn window(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Window(p) = &node.kind else {
        return Rendered::new();
    };
    let win = c.doc.create_with("div", &format!("col-lg-{}", p.width));
    if let Some(style) = p.style.as_deref() {
        c.doc.set_style_text(win, style);
    }
    let holder = match p.formid.as_deref().filter(|f| !f.is_empty()) {
        Some(form_id) => {
            let form = c.doc.append_new(win, "form", "");
            c.doc.set_id(form, form_id);
            form
        }
        None => win,
    };
    let ibox = c.doc.append_new(holder, "div", "ibox float-e-margins");

    let title = c.doc.append_new(ibox, "div", "ibox-title");
    let h5 = c.doc.append_new(title, "h5", "");
    if let Some(id) = node.meta.id.as_deref() {
        c.doc.set_id(h5, &format!("title-{id}"));
    }
    c.doc.append_text(h5, node.title());
    c.doc.append_text(title, " ");
    let tools = c.doc.append_new(title, "div", "ibox-tools");
    if p.collapsable {
        let link = c.doc.append_new(tools, "a", "collapse-link");
        c.doc.append_new(link, "i", "fa fa-chevron-up");
        c.bindings.add(link, UiEvent::Click, Binding::Collapse(ibox));
    }
    if p.closeable {
        let link = c.doc.append_new(tools, "a", "close-link");
        c.doc.append_new(link, "i", "fa fa-times");
        c.bindings.add(link, UiEvent::Click, Binding::CloseWindow(win));
    }
    for def in &p.buttons {
        let btn = build_button(c, def);
        c.doc.set_style(btn, "margin-left", "0.5em");
        c.doc.prepend(tools, btn);
    }

    let body = c.doc.append_new(ibox, "div", "ibox-content");
    c.doc.set_style(body, "display", "block");
    apply_id(c, body, node);
    for row in &p.rows {
        render_row(c, body, row);
    }
    one(win)
}

/// Appends `node` as a grid row: row nodes render themselves, anything else is wrapped.
pub(crate) fn render_row(c: &mut Client, parent: ElementId, node: &ViewNode) {
    if node.is(ViewTag::Row) {
        c.render_into(parent, node);
        return;
    }
    let row = c.doc.append_new(parent, "div", "row");
    c.render_into(row, node);
}

pub(super) fn row(c: &mut Client, node: &ViewNode) -> Rendered {
    let el = c.doc.create_with("div", "row");
    c.render_children(el, node.children());
    one(el)
}

pub(super) fn form(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Form(p) = &node.kind else {
        return Rendered::new();
    };
    let form = c.doc.create_with(
        "form",
        if p.inline { "form-inline" } else { "form-horizontal" },
    );
    apply_id(c, form, node);
    if let Some(desc) = node.meta.description.as_deref().filter(|d| !d.is_empty()) {
        let para = c.doc.append_new(form, "p", "");
        c.doc.append_text(para, desc);
    }

    for component in &p.components {
        let group = c.doc.append_new(form, "div", "form-group");
        c.doc.set_id(group, &format!("{FORM_GROUP_PREFIX}{}", component.name()));
        let section = component.is(ViewTag::FormSection);
        if !section {
            let label = c.doc.append_new(
                group,
                "label",
                if p.inline { "sr-only" } else { "col-lg-2 control-label" },
            );
            c.doc.append_text(label, component.title());
        }
        if p.inline || section {
            c.render_into(group, component);
        } else {
            let holder = c.doc.append_new(group, "div", "col-lg-10");
            c.render_into(holder, component);
        }
    }

    if !p.buttons.is_empty() {
        let bar = if p.inline {
            let span = c.doc.append_new(form, "span", "");
            c.doc.set_style_text(span, "position: relative; top: -5px;");
            span
        } else {
            c.doc.append_new(form, "div", "hr-line-dashed");
            let group = c.doc.append_new(form, "div", "form-group");
            c.doc.append_new(group, "div", "col-sm-10 col-sm-offset-2")
        };
        append_buttons(c, bar, &p.buttons);
    }
    one(form)
}

pub(crate) fn append_buttons(c: &mut Client, bar: ElementId, buttons: &[ButtonDef]) {
    for def in buttons {
        c.doc.append_text(bar, " ");
        let btn = build_button(c, def);
        c.doc.append(bar, btn);
    }
}

pub(super) fn form_section(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::FormSection(p) = &node.kind else {
        return Rendered::new();
    };
    let col = c.doc.create_with("div", &format!("col-lg-{}", p.size));
    let panel = c.doc.append_new(
        col,
        "div",
        &format!("panel panel-{}", p.importance.as_deref().unwrap_or("default")),
    );
    let heading = c.doc.append_new(panel, "div", "panel-heading");
    c.doc.append_text(heading, node.title());
    let body = c.doc.append_new(panel, "div", "panel-body");
    c.render_children(body, &p.components);
    one(col)
}

pub(super) fn area(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Area(p) = &node.kind else {
        return Rendered::new();
    };
    let el = sized_area(c, node, p.size, p.style.as_deref());
    c.render_children(el, &p.components);
    one(el)
}

pub(super) fn area_form(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::AreaForm(p) = &node.kind else {
        return Rendered::new();
    };
    let el = sized_area(c, node, p.size, p.style.as_deref());
    let form = c.doc.append_new(el, "form", "");
    if let Some(id) = p.form_id.as_deref() {
        c.doc.set_id(form, id);
    }
    if let Some(style) = p.form_style.as_deref() {
        c.doc.set_style_text(form, style);
    }
    c.render_children(form, &p.components);
    one(el)
}

fn sized_area(c: &mut Client, node: &ViewNode, size: u32, style: Option<&str>) -> ElementId {
    let el = c.doc.create_with("div", &format!("col-lg-{size}"));
    apply_id(c, el, node);
    if let Some(style) = style {
        c.doc.set_style_text(el, style);
    }
    el
}

pub(super) fn label(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Label(p) = &node.kind else {
        return Rendered::new();
    };
    let class = match p.extraclassdata.as_deref().filter(|e| !e.is_empty()) {
        Some(extra) => format!("col-lg-{} {extra}", p.size),
        None => format!("col-lg-{}", p.size),
    };
    let el = c.doc.create_with("div", &class);
    if let Some(style) = p.style.as_deref() {
        c.doc.set_style_text(el, style);
    }
    let b = c.doc.append_new(el, "b", "");
    c.doc.append_text(b, p.text.as_deref().unwrap_or_default());
    one(el)
}

pub(super) fn tab(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Tab(p) = &node.kind else {
        return Rendered::new();
    };
    let owner = node.meta.id.as_deref().unwrap_or_default();
    let outer = c.doc.create_with("div", "panel-body");
    let tabs = c.doc.append_new(outer, "div", "tabs-container");

    let list = c.doc.append_new(tabs, "ul", "nav nav-tabs");
    for entry in &p.tabs {
        let li = c
            .doc
            .append_new(list, "li", if entry.active { "active" } else { "" });
        let a = c.doc.append_new(li, "a", "");
        c.doc.set_attr(a, "data-toggle", "tab");
        c.doc.set_attr(
            a,
            "href",
            &format!("#{owner}_{}", entry.key.as_deref().unwrap_or_default()),
        );
        c.doc.append_text(a, entry.title.as_deref().unwrap_or_default());
    }

    let content = c.doc.append_new(tabs, "div", "tab-content");
    for entry in &p.tabs {
        let pane = c.doc.append_new(
            content,
            "div",
            if entry.active { "tab-pane active" } else { "tab-pane" },
        );
        c.doc.set_id(
            pane,
            &format!("{owner}_{}", entry.key.as_deref().unwrap_or_default()),
        );
        let inner = c.doc.append_new(pane, "div", "panel-body");
        if let Some(view) = &entry.view {
            c.render_into(inner, view);
        }
    }
    one(outer)
}

pub(super) fn embedded_web(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::EmbeddedWeb(p) = &node.kind else {
        return Rendered::new();
    };
    let frame = c.doc.create("iframe");
    if let Some(url) = p.url.as_deref() {
        c.doc.set_attr(frame, "src", url);
    }
    c.doc.set_attr(frame, "frameborder", "0");
    if let Some(style) = p.style.as_deref() {
        c.doc.set_style_text(frame, style);
    }
    c.doc.set_style(frame, "width", "100%");
    one(frame)
}

/// A panel rendered inside another container; top-level panels go through `run_feature`.
pub(super) fn panel(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Panel(p) = &node.kind else {
        return Rendered::new();
    };
    let el = c.doc.create("div");
    apply_id(c, el, node);
    let holder = match p.formid.as_deref().filter(|f| !f.is_empty()) {
        Some(form_id) => {
            let form = c.doc.append_new(el, "form", "");
            c.doc.set_id(form, form_id);
            form
        }
        None => el,
    };
    for row in &p.rows {
        render_row(c, holder, row);
    }
    if !p.buttons.is_empty() {
        let bar = c.doc.append_new(holder, "div", "row");
        append_buttons(c, bar, &p.buttons);
    }
    one(el)
}

pub(super) fn dialog(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Dialog(p) = &node.kind else {
        return Rendered::new();
    };
    let (dialog, body) = dialog_frame(c, p.width.as_deref());
    apply_id(c, dialog, node);
    if let Some(style) = p.style.as_deref() {
        c.doc.set_style_text(dialog, style);
    }
    c.render_children(body, &p.components);
    one(dialog)
}

/// Modal skeleton; returns the dialog and its body.
pub(crate) fn dialog_frame(c: &mut Client, width: Option<&str>) -> (ElementId, ElementId) {
    let dialog = c.doc.create_with("div", "modal fade");
    let inner = c.doc.append_new(dialog, "div", "modal-dialog");
    if let Some(w) = width.filter(|w| !w.is_empty()) {
        c.doc.set_style(inner, "width", w);
    }
    let content = c.doc.append_new(inner, "div", "modal-content");
    let body = c.doc.append_new(content, "div", "modal-body");
    c.doc.set_style(body, "padding", "0.5em");
    (dialog, body)
}
