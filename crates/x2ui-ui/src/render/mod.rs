//! Component renderer.
//!
//! Every known view tag maps to one render function through [`RendererTable`]; hosts may add
//! renderers for extra class names. Unknown classes and unreadable nodes degrade to a visible
//! placeholder so the rest of the tree still renders.

pub(crate) mod button;
pub(crate) mod datalist;
mod input;
mod layout;
mod menu;

use ahash::AHashMap;
use log::warn;
use smallvec::{smallvec, SmallVec};
use std::sync::Arc;

use x2ui_view::{ActionRequest, ViewKind, ViewNode, ViewTag};

use crate::binder::{Binding, UiEvent};
use crate::client::Client;
use crate::dom::ElementId;

pub use button::TimerTask;
pub(crate) use datalist::DataLists;
pub(crate) use layout::{append_buttons, dialog_frame, render_row};
pub(crate) use menu::feature_request;

/// Elements produced for one node; most nodes produce exactly one.
pub type Rendered = SmallVec<[ElementId; 1]>;

pub type RenderFn = fn(&mut Client, &ViewNode) -> Rendered;

pub type ExtensionRenderer = Arc<dyn Fn(&mut Client, &ViewNode) -> Rendered + Send + Sync>;

/// Tag → render function lookup.
#[derive(Clone)]
pub struct RendererTable {
    builtin: AHashMap<ViewTag, RenderFn>,
    extensions: AHashMap<String, ExtensionRenderer>,
}

impl RendererTable {
    pub fn builtin() -> Self {
        let mut builtin: AHashMap<ViewTag, RenderFn> = AHashMap::with_capacity(ViewTag::ALL.len());
        for tag in ViewTag::ALL {
            builtin.insert(tag, builtin_for(tag));
        }
        Self {
            builtin,
            extensions: AHashMap::new(),
        }
    }

    /// Registers a renderer for an extra class name.
    pub fn register<F>(&mut self, class: &str, f: F)
    where
        F: Fn(&mut Client, &ViewNode) -> Rendered + Send + Sync + 'static,
    {
        self.extensions.insert(class.to_owned(), Arc::new(f));
    }

    #[inline]
    pub fn get(&self, tag: ViewTag) -> Option<RenderFn> {
        self.builtin.get(&tag).copied()
    }

    #[inline]
    pub fn extension(&self, class: &str) -> Option<ExtensionRenderer> {
        self.extensions.get(class).cloned()
    }

    #[inline]
    pub fn has_extension(&self, class: &str) -> bool {
        self.extensions.contains_key(class)
    }
}

impl Default for RendererTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_for(tag: ViewTag) -> RenderFn {
    match tag {
        ViewTag::Window => layout::window,
        ViewTag::Table => crate::table::render_table,
        ViewTag::Button => button::button,
        ViewTag::Form => layout::form,
        ViewTag::Picklist => input::picklist,
        ViewTag::Text => input::text,
        ViewTag::Code => input::code,
        ViewTag::Row => layout::row,
        ViewTag::FormSection => layout::form_section,
        ViewTag::Area => layout::area,
        ViewTag::Label => layout::label,
        ViewTag::MultiselectPicklist => input::multiselect,
        ViewTag::InputButton => input::input_button,
        ViewTag::Data => input::data,
        ViewTag::Number => input::number,
        ViewTag::Boolean => input::boolean,
        ViewTag::DataList => datalist::datalist,
        ViewTag::Tab => layout::tab,
        ViewTag::Binary => input::binary,
        ViewTag::ReadOnly => input::read_only,
        ViewTag::ColorPicker => input::color_picker,
        ViewTag::Html => input::html,
        ViewTag::CheckboxGroup => input::checkbox_group,
        ViewTag::Date => input::date,
        ViewTag::Time => input::time,
        ViewTag::DateTime => input::date_time,
        ViewTag::TopMenu => menu::top_menu,
        ViewTag::EmbeddedWeb => layout::embedded_web,
        ViewTag::UserMenu => menu::user_menu,
        ViewTag::Image => input::image,
        ViewTag::AreaForm => layout::area_form,
        ViewTag::Panel => layout::panel,
        ViewTag::Dialog => layout::dialog,
    }
}

impl Client {
    /// Builds the elements for `node` and binds its declared handlers. The result is detached.
    pub fn render(&mut self, node: &ViewNode) -> Rendered {
        let produced = match &node.kind {
            ViewKind::Unknown => match self.renderers.extension(node.class()) {
                Some(ext) => ext(self, node),
                None => {
                    warn!("render: no renderer for class '{}'", node.class());
                    smallvec![self.placeholder(&format!(
                        "Warning: The view [{}] has not yet been implemented",
                        node.class()
                    ))]
                }
            },
            ViewKind::Invalid { tag, reason } => {
                warn!("render: unreadable {}: {reason}", tag.class_name());
                smallvec![self.placeholder(&format!(
                    "Warning: The view [{}] could not be read: {reason}",
                    node.class()
                ))]
            }
            kind => match kind.tag().and_then(|t| self.renderers.get(t)) {
                Some(f) => f(self, node),
                None => smallvec![self.placeholder(&format!(
                    "Warning: The view [{}] has not yet been implemented",
                    node.class()
                ))],
            },
        };

        for (event, handler) in &node.meta.handlers {
            let req = ActionRequest::from_handler(handler, &node.meta);
            for el in &produced {
                self.bindings
                    .add(*el, UiEvent::parse(event), Binding::Invoke(req.clone()));
            }
        }
        produced
    }

    /// Renders `node` and appends the result to `parent`.
    pub fn render_into(&mut self, parent: ElementId, node: &ViewNode) -> Rendered {
        let produced = self.render(node);
        for el in &produced {
            self.doc.append(parent, *el);
        }
        produced
    }

    /// Renders `nodes` into `parent` in source order.
    pub(crate) fn render_children(&mut self, parent: ElementId, nodes: &[ViewNode]) {
        for node in nodes {
            self.render_into(parent, node);
        }
    }

    fn placeholder(&mut self, text: &str) -> ElementId {
        let div = self.doc.create("div");
        let b = self.doc.append_new(div, "b", "");
        self.doc.append_text(b, text);
        div
    }
}

/// Sets the DOM id of `el` when the node declares one.
pub(crate) fn apply_id(client: &mut Client, el: ElementId, node: &ViewNode) {
    if let Some(id) = node.meta.id.as_deref().filter(|id| !id.is_empty()) {
        client.doc.set_id(el, id);
    }
}

/// Sets the `name` attribute when the node declares one.
pub(crate) fn apply_name(client: &mut Client, el: ElementId, node: &ViewNode) {
    if !node.name().is_empty() {
        client.doc.set_attr(el, "name", node.name());
    }
}

#[inline]
pub(crate) fn one(el: ElementId) -> Rendered {
    smallvec![el]
}
