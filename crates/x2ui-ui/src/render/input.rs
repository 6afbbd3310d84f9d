//! Form inputs.

use x2ui_view::{ActionRequest, KeyValue, ViewKind, ViewNode};

use super::{apply_name, one, Rendered};
use crate::binder::{Binding, UiEvent};
use crate::client::Client;
use crate::dom::ElementId;

pub(super) fn picklist(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Picklist(p) = &node.kind else {
        return Rendered::new();
    };
    let select = c.doc.create_with("select", "form-control m-b");
    apply_name(c, select, node);
    append_options(c, select, &p.values);
    if let Some(selected) = p.selected.as_deref() {
        c.doc.set_value(select, selected);
    }
    one(select)
}

pub(crate) fn append_options(c: &mut Client, select: ElementId, values: &[KeyValue]) {
    for kv in values {
        let opt = c.doc.append_new(select, "option", "");
        c.doc.set_attr(opt, "value", kv.key());
        c.doc.append_text(opt, kv.label());
    }
}

pub(super) fn text(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Text(p) = &node.kind else {
        return Rendered::new();
    };
    let input = text_input(c, node, p.value.as_deref());
    if p.action.as_deref().is_some_and(|a| !a.is_empty()) {
        let req = ActionRequest {
            target: p.target.clone(),
            form_id: p.form_id.clone(),
            description: node.meta.description.clone(),
            action: p.action.clone(),
            attributes: node.meta.attributes.clone(),
        };
        c.bindings.add(input, UiEvent::KeyPress, Binding::OnEnter(req));
    }
    one(input)
}

fn text_input(c: &mut Client, node: &ViewNode, value: Option<&str>) -> ElementId {
    typed_input(c, node, "text", value)
}

fn typed_input(c: &mut Client, node: &ViewNode, kind: &str, value: Option<&str>) -> ElementId {
    let input = c.doc.create_with("input", "form-control");
    c.doc.set_attr(input, "type", kind);
    apply_name(c, input, node);
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        c.doc.set_value(input, v);
    }
    input
}

pub(super) fn code(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Code(p) = &node.kind else {
        return Rendered::new();
    };
    let area = c.doc.create_with("textarea", "codemirror");
    apply_name(c, area, node);
    if let Some(mode) = p.mode.as_deref() {
        c.doc.set_attr(area, "data-mode", mode);
    }
    if let Some(v) = p.value.as_deref() {
        c.doc.set_value(area, v);
    }
    one(area)
}

pub(super) fn multiselect(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::MultiselectPicklist(p) = &node.kind else {
        return Rendered::new();
    };
    let select = c.doc.create("select");
    c.doc.set_attr(select, "multiple", "multiple");
    apply_name(c, select, node);
    c.doc.set_style(select, "height", &format!("{}px", p.height));
    c.doc.set_style(select, "width", "100%");
    for kv in &p.values {
        let opt = c.doc.append_new(select, "option", "");
        c.doc.set_attr(opt, "value", kv.key());
        if p.selected.iter().any(|s| s == kv.key()) {
            c.doc.set_attr(opt, "selected", "yes");
        }
        c.doc.append_text(opt, kv.label());
    }
    one(select)
}

pub(super) fn input_button(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::InputButton(p) = &node.kind else {
        return Rendered::new();
    };
    let group = c.doc.create_with("div", "input-group");
    let holder = c.doc.create_with("span", "input-group-btn");
    let btn = super::button::build_button(c, &p.button);
    c.doc.append(holder, btn);

    let input = text_input(c, node, p.value.as_deref());
    if p.button.action.as_deref().is_some_and(|a| !a.is_empty()) {
        let mut req = ActionRequest::from_button(&p.button);
        req.description = req.description.or_else(|| node.meta.description.clone());
        c.bindings.add(input, UiEvent::KeyPress, Binding::OnEnter(req));
    }

    if p.button_first() {
        c.doc.append(group, holder);
        c.doc.append(group, input);
    } else {
        c.doc.append(group, input);
        c.doc.append(group, holder);
    }
    one(group)
}

pub(super) fn data(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Data(p) = &node.kind else {
        return Rendered::new();
    };
    let input = c.doc.create("input");
    c.doc.set_attr(input, "type", "hidden");
    apply_name(c, input, node);
    if let Some(v) = p.value.as_deref().filter(|v| !v.is_empty()) {
        c.doc.set_value(input, v);
    }
    one(input)
}

pub(super) fn number(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Number(p) = &node.kind else {
        return Rendered::new();
    };
    let input = c.doc.create_with("input", "touchspin3");
    c.doc.set_attr(input, "type", "text");
    apply_name(c, input, node);
    c.doc.set_value(input, p.value.as_deref().unwrap_or_default());
    one(input)
}

pub(super) fn boolean(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Boolean(p) = &node.kind else {
        return Rendered::new();
    };
    let container = c.doc.create_with("div", "col-lg-12");
    for (value, label) in [(true, "Yes"), (false, "No")] {
        let holder = c.doc.append_new(container, "div", "");
        let lbl = c.doc.append_new(holder, "label", "");
        let radio = c.doc.append_new(lbl, "input", "");
        c.doc.set_attr(radio, "type", "radio");
        apply_name(c, radio, node);
        c.doc.set_attr(radio, "value", if value { "true" } else { "false" });
        if p.value == Some(value) {
            c.doc.set_checked(radio, true);
        }
        let span = c.doc.append_new(lbl, "span", "");
        c.doc.set_style(span, "margin-left", "0.5em");
        c.doc.append_text(span, label);
    }
    one(container)
}

pub(super) fn binary(c: &mut Client, node: &ViewNode) -> Rendered {
    one(file_input(c, node))
}

fn file_input(c: &mut Client, node: &ViewNode) -> ElementId {
    let wrap = c.doc.create_with("div", "fileinput fileinput-new input-group");
    c.doc.set_attr(wrap, "data-provides", "fileinput");

    let control = c.doc.append_new(wrap, "div", "form-control");
    c.doc.set_attr(control, "data-trigger", "fileinput");
    c.doc.append_new(control, "i", "glyphicon glyphicon-file fileinput-exists");
    c.doc.append_new(control, "span", "fileinput-filename");

    let picker = c
        .doc
        .append_new(wrap, "span", "input-group-addon btn btn-default btn-file");
    let select = c.doc.append_new(picker, "span", "fileinput-new");
    c.doc.append_text(select, "Select file");
    let change = c.doc.append_new(picker, "span", "fileinput-exists");
    c.doc.append_text(change, "Change");
    let input = c.doc.append_new(picker, "input", "");
    c.doc.set_attr(input, "type", "file");
    apply_name(c, input, node);

    let remove = c
        .doc
        .append_new(wrap, "a", "input-group-addon btn btn-default fileinput-exists");
    c.doc.set_attr(remove, "href", "#");
    c.doc.set_attr(remove, "data-dismiss", "fileinput");
    c.doc.append_text(remove, "Remove");
    wrap
}

pub(super) fn read_only(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::ReadOnly(p) = &node.kind else {
        return Rendered::new();
    };
    let para = c.doc.create_with("p", "form-control-static");
    c.doc.append_text(para, p.value.as_deref().unwrap_or_default());
    one(para)
}

pub(super) fn color_picker(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::ColorPicker(p) = &node.kind else {
        return Rendered::new();
    };
    let group = c.doc.create_with("div", "input-group colorpicker-component");
    let addon = c.doc.append_new(group, "a", "input-group-addon");
    c.doc.append_new(addon, "i", "fa fa-eyedropper");
    let input = text_input(c, node, p.value.as_deref());
    c.doc.append(group, input);
    one(group)
}

pub(super) fn html(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Html(p) = &node.kind else {
        return Rendered::new();
    };
    let area = c.doc.create_with("textarea", "ckeditor");
    c.doc.set_id(area, &uuid::Uuid::new_v4().to_string());
    apply_name(c, area, node);
    if let Some(h) = p.height.as_deref() {
        c.doc.set_attr(area, "x2_height", h);
    }
    c.doc.set_value(area, p.value.as_deref().unwrap_or_default());
    one(area)
}

pub(super) fn checkbox_group(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::CheckboxGroup(p) = &node.kind else {
        return Rendered::new();
    };
    let group = c.doc.create("div");
    for kv in &p.values {
        let item = c.doc.append_new(group, "div", "");
        let lbl = c.doc.append_new(item, "label", "");
        let cb = c.doc.append_new(lbl, "input", "");
        c.doc.set_attr(cb, "type", "checkbox");
        apply_name(c, cb, node);
        c.doc.set_attr(cb, "value", kv.key());
        if p.checked.iter().any(|k| k == kv.key()) {
            c.doc.set_checked(cb, true);
        }
        let span = c.doc.append_new(lbl, "span", "");
        c.doc.set_style(span, "margin-left", "0.5em");
        c.doc.append_text(span, kv.label());
    }
    one(group)
}

pub(super) fn date(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Date(p) = &node.kind else {
        return Rendered::new();
    };
    one(typed_input(c, node, "date", p.value.as_deref()))
}

pub(super) fn time(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Time(p) = &node.kind else {
        return Rendered::new();
    };
    one(typed_input(c, node, "time", p.value.as_deref()))
}

pub(super) fn date_time(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::DateTime(p) = &node.kind else {
        return Rendered::new();
    };
    one(typed_input(c, node, "datetime-local", p.value.as_deref()))
}

pub(super) fn image(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Image(p) = &node.kind else {
        return Rendered::new();
    };
    let wrap = c.doc.create("div");
    let img = c.doc.append_new(wrap, "img", "img-circle");
    c.doc.set_attr(img, "width", "96");
    c.doc.set_attr(img, "height", "96");
    if let Some(src) = p.src.as_deref() {
        c.doc.set_attr(img, "src", src);
    }
    if p.edit {
        let upload = file_input(c, node);
        c.doc.append(wrap, upload);
    }
    one(wrap)
}
