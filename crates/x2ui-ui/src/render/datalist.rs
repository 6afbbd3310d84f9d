//! Data list: a picker of existing items, the list of selected items and an edit dialog.
//!
//! The selected items are mirrored into a hidden input as a JSON array after every change.

use ahash::AHashMap;
use log::{debug, warn};

use x2ui_core::{UiError, UiResult};
use x2ui_transport::{Endpoints, MultipartForm, RequestBody};
use x2ui_view::{
    ButtonDef, DataListItem, DataListProps, FormProps, KeyValue, ViewKind, ViewNode,
};

use super::input::append_options;
use super::layout::{append_buttons, dialog_frame};
use super::{one, Rendered};
use crate::binder::{Binding, UiEvent, VIEW_FIELD};
use crate::client::Client;
use crate::dispatch::{Completion, Region};
use crate::dom::ElementId;

/// Picker value that opens the new-item dialog.
pub const NEW_ITEM_KEY: &str = "$$NEW$$";

#[derive(Debug, Clone)]
pub(crate) struct DataListState {
    props: DataListProps,
    picker: ElementId,
    selected: ElementId,
    value: ElementId,
    /// Items behind picker options and selected entries, by element.
    items: AHashMap<ElementId, DataListItem>,
}

#[derive(Debug, Clone, Copy)]
struct EditDialog {
    list: ElementId,
    item: Option<ElementId>,
}

#[derive(Debug, Default)]
pub(crate) struct DataLists {
    lists: AHashMap<ElementId, DataListState>,
    dialogs: AHashMap<ElementId, EditDialog>,
}

impl DataLists {
    pub fn purge(&mut self, freed: &[ElementId]) {
        if freed.is_empty() {
            return;
        }
        self.lists.retain(|el, _| !freed.contains(el));
        self.dialogs
            .retain(|el, d| !freed.contains(el) && !freed.contains(&d.list));
        for state in self.lists.values_mut() {
            state.items.retain(|el, _| !freed.contains(el));
        }
    }

    fn owner_of(&self, item: ElementId) -> Option<ElementId> {
        self.lists
            .iter()
            .find(|(_, s)| s.items.contains_key(&item))
            .map(|(list, _)| *list)
    }
}

pub(super) fn datalist(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::DataList(p) = &node.kind else {
        return Rendered::new();
    };
    let container = c.doc.create("div");

    let picker = c.doc.append_new(container, "select", "form-control m-b");
    c.doc.set_attr(picker, "name", &format!("{}_itemlist", node.name()));
    c.doc.set_id(picker, &uuid::Uuid::new_v4().to_string());
    let mut options = vec![KeyValue {
        key: Some(String::new()),
        value: Some("-- Unselected --".to_owned()),
    }];
    if p.allow_new {
        options.push(KeyValue {
            key: Some(NEW_ITEM_KEY.to_owned()),
            value: Some(format!(
                "-- New {} --",
                p.item_label.as_deref().unwrap_or_default()
            )),
        });
    }
    append_options(c, picker, &options);
    c.bindings
        .add(picker, UiEvent::Change, Binding::DataListPick(container));

    let selected_id = uuid::Uuid::new_v4().to_string();
    let selected = c.doc.append_new(container, "ul", "");
    c.doc.set_id(selected, &selected_id);
    c.doc
        .set_style_text(selected, "padding: 0px; list-style-type: none;");

    let value = c.doc.append_new(container, "input", "");
    c.doc.set_attr(value, "type", "hidden");
    c.doc.set_attr(value, "name", node.name());
    c.doc.set_id(value, &format!("value_{selected_id}"));

    c.datalists.lists.insert(
        container,
        DataListState {
            props: p.clone(),
            picker,
            selected,
            value,
            items: AHashMap::new(),
        },
    );
    for item in &p.items {
        c.add_list_item(container, item.clone());
    }
    c.sync_datalist(container);
    one(container)
}

impl Client {
    /// Picker change: adds the chosen item, or opens the new-item dialog.
    pub(crate) fn datalist_pick(&mut self, list: ElementId) -> UiResult<()> {
        let Some(state) = self.datalists.lists.get(&list) else {
            return Ok(());
        };
        let picker = state.picker;
        let choice = self.doc.value(picker).unwrap_or_default();
        match choice.as_str() {
            "" => Ok(()),
            NEW_ITEM_KEY => self.datalist_edit(list, None),
            key => {
                let option = self.doc.by_tag(picker, "option").into_iter().find(|o| {
                    self.doc.attr(*o, "value") == Some(key)
                        && self
                            .datalists
                            .lists
                            .get(&list)
                            .is_some_and(|s| s.items.contains_key(o))
                });
                let Some(option) = option else {
                    debug!("datalist: no item behind option '{key}'");
                    return Ok(());
                };
                let item = self
                    .datalists
                    .lists
                    .get_mut(&list)
                    .and_then(|s| s.items.remove(&option));
                let freed = self.doc.remove(option);
                self.forget(&freed);
                if let Some(item) = item {
                    self.add_list_item(list, item);
                }
                self.doc.set_value(picker, "");
                self.sync_datalist(list);
                Ok(())
            }
        }
    }

    /// Opens the edit dialog for a new item, or for `item` when given.
    pub(crate) fn datalist_edit(&mut self, list: ElementId, item: Option<ElementId>) -> UiResult<()> {
        let Some(state) = self.datalists.lists.get(&list) else {
            return Ok(());
        };
        let Some(view) = state.props.view.as_deref().cloned() else {
            return Err(UiError::script(
                "data list has no item form",
                "at datalist.edit",
            ));
        };

        let dialog_id = uuid::Uuid::new_v4().to_string();
        let mut buttons = vec![
            local_button("Save", format!("datalist.save('{dialog_id}')")),
            local_button("Cancel", format!("datalist.cancel('{dialog_id}')")),
        ];
        if let Some(item_el) = item {
            let item_id = self.doc.dom_id(item_el).unwrap_or_default().to_owned();
            buttons.push(local_button(
                "Remove from List",
                format!("datalist.remove('{dialog_id}','{item_id}')"),
            ));
        }

        let (dialog, body) = dialog_frame(self, None);
        self.doc.set_id(dialog, &dialog_id);
        match view.kind {
            ViewKind::Form(props) => {
                let form = ViewNode {
                    meta: view.meta,
                    kind: ViewKind::Form(FormProps { buttons, ..props }),
                };
                self.render_into(body, &form);
            }
            _ => {
                self.render_into(body, &view);
                let bar = self.doc.append_new(body, "div", "row");
                append_buttons(self, bar, &buttons);
            }
        }

        self.datalists.dialogs.insert(dialog, EditDialog { list, item });
        self.open_dialog(dialog);
        Ok(())
    }

    /// Posts the first form of the dialog to the list's `addnew` endpoint.
    pub fn datalist_save(&mut self, dialog_dom_id: &str) -> UiResult<()> {
        let (dialog, edit) = self.edit_dialog(dialog_dom_id, "datalist.save")?;
        let Some(state) = self.datalists.lists.get(&edit.list) else {
            return Err(UiError::script("data list was removed", "at datalist.save"));
        };
        let controller = state.props.controller.clone().unwrap_or_default();
        let source = state.props.source.to_string();

        let mut form = match self.doc.find_first(dialog, |e| e.tag() == "form") {
            Some(f) => self.doc.form_data(f),
            None => MultipartForm::new(),
        };
        form.text(VIEW_FIELD, source);
        self.send(
            Endpoints::add_new(&controller),
            RequestBody::Multipart(form),
            Completion::DataListSaved { dialog },
            Some(Region::DataList(edit.list)),
        );
        Ok(())
    }

    /// Applies a saved item: replaces the edited entry or appends a new one, then closes the dialog.
    pub(crate) fn datalist_saved(&mut self, dialog: ElementId, item: DataListItem) {
        let Some(edit) = self.datalists.dialogs.get(&dialog).copied() else {
            debug!("datalist: save answered after its dialog closed");
            return;
        };
        let Some(picker) = self.datalists.lists.get(&edit.list).map(|s| s.picker) else {
            return;
        };
        match edit.item.filter(|el| self.doc.is_live(*el)) {
            Some(el) => self.set_list_item(edit.list, el, item),
            None => self.add_list_item(edit.list, item),
        }
        self.doc.set_value(picker, "");
        self.hide_modal(dialog);
        self.sync_datalist(edit.list);
    }

    /// Moves a selected item back into the picker and closes the dialog.
    pub fn datalist_remove(&mut self, dialog_dom_id: &str, item_dom_id: &str) -> UiResult<()> {
        let item_el = self.doc.find(item_dom_id).ok_or_else(|| {
            UiError::script(
                format!("no data list item '{item_dom_id}'"),
                "at datalist.remove",
            )
        })?;
        let Some(list) = self.datalists.owner_of(item_el) else {
            return Err(UiError::script(
                format!("'{item_dom_id}' is not a data list item"),
                "at datalist.remove",
            ));
        };
        let Some(state) = self.datalists.lists.get_mut(&list) else {
            return Ok(());
        };
        let picker = state.picker;
        let Some(item) = state.items.remove(&item_el) else {
            return Ok(());
        };

        let option = self.doc.append_new(picker, "option", "");
        self.doc
            .set_attr(option, "value", item.key.as_deref().unwrap_or_default());
        self.doc
            .append_text(option, item.title.as_deref().unwrap_or_default());
        if let Some(state) = self.datalists.lists.get_mut(&list) {
            state.items.insert(option, item);
        }

        let freed = self.doc.remove(item_el);
        self.forget(&freed);
        if let Some(dialog) = self.doc.find(dialog_dom_id) {
            self.hide_modal(dialog);
        }
        self.sync_datalist(list);
        Ok(())
    }

    fn edit_dialog(&self, dom_id: &str, op: &str) -> UiResult<(ElementId, EditDialog)> {
        self.doc
            .find(dom_id)
            .and_then(|d| self.datalists.dialogs.get(&d).map(|e| (d, *e)))
            .ok_or_else(|| UiError::script(format!("no data list dialog '{dom_id}'"), format!("at {op}")))
    }

    fn add_list_item(&mut self, list: ElementId, item: DataListItem) {
        let Some(state) = self.datalists.lists.get(&list) else {
            return;
        };
        let (selected, allow_edit) = (state.selected, state.props.allow_edit);
        let el = self.doc.append_new(selected, "div", "well well-sm");
        self.doc.set_id(el, &uuid::Uuid::new_v4().to_string());
        if allow_edit {
            self.bindings
                .add(el, UiEvent::Click, Binding::DataListEdit { list, item: el });
        }
        self.set_list_item(list, el, item);
    }

    fn set_list_item(&mut self, list: ElementId, el: ElementId, item: DataListItem) {
        let freed = self.doc.clear_children(el);
        self.forget(&freed);
        let h3 = self.doc.append_new(el, "h3", "");
        self.doc.append_text(h3, item.key.as_deref().unwrap_or_default());
        self.doc.append_text(
            el,
            &format!(" {}", item.title.as_deref().unwrap_or_default()),
        );
        if let Some(state) = self.datalists.lists.get_mut(&list) {
            state.items.insert(el, item);
        }
    }

    /// Writes the selected items, in display order, into the hidden input.
    pub(crate) fn sync_datalist(&mut self, list: ElementId) {
        let Some(state) = self.datalists.lists.get(&list) else {
            return;
        };
        let items: Vec<&DataListItem> = self
            .doc
            .children(state.selected)
            .iter()
            .filter_map(|el| state.items.get(el))
            .collect();
        let json = match serde_json::to_string(&items) {
            Ok(json) => json,
            Err(e) => {
                warn!("datalist: items not serializable: {e}");
                return;
            }
        };
        let value = state.value;
        self.doc.set_value(value, &json);
    }

    /// Hidden-input JSON of the data list rendered as `list`.
    pub fn datalist_value(&self, list: ElementId) -> Option<String> {
        let state = self.datalists.lists.get(&list)?;
        self.doc.value(state.value)
    }
}

fn local_button(title: &str, call: String) -> ButtonDef {
    ButtonDef {
        title: Some(title.to_owned()),
        target: Some(format!("{}{call}", x2ui_view::LOCAL_SCRIPT_PREFIX)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_buttons_carry_the_script_marker() {
        let b = local_button("Save", "datalist.save('d1')".to_owned());
        assert_eq!(b.target.as_deref(), Some("javascript:datalist.save('d1')"));
        assert_eq!(b.title.as_deref(), Some("Save"));
    }
}
