//! In-memory element tree the interpreter renders into.
//!
//! Elements live in an arena addressed by [`ElementId`]. Ids are never reused: once an element
//! is removed its id stays dead, so a reference captured before the removal can always be
//! checked with [`Document::is_live`].

mod form;
mod html;

use ahash::AHashMap;
use smallvec::SmallVec;

/// Tag used for text nodes.
pub const TEXT_TAG: &str = "#text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// File chosen in a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    dom_id: Option<String>,
    classes: SmallVec<[String; 4]>,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: String,
    value: Option<String>,
    checked: bool,
    disabled: bool,
    files: Vec<FileAttachment>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            dom_id: None,
            classes: SmallVec::new(),
            attrs: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            value: None,
            checked: false,
            disabled: false,
            files: Vec::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    #[inline]
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    #[inline]
    pub fn dom_id(&self) -> Option<&str> {
        self.dom_id.as_deref()
    }

    #[inline]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[inline]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn styles(&self) -> &[(String, String)] {
        &self.style
    }

    /// Own text; only text nodes carry any.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn checked(&self) -> bool {
        self.checked
    }

    #[inline]
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    #[inline]
    pub fn files(&self) -> &[FileAttachment] {
        &self.files
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.style("display") == Some("none")
    }
}

/// Element arena with a DOM-id index.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Option<Element>>,
    index: AHashMap<String, ElementId>,
    root: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Element::new("body"))],
            index: AHashMap::new(),
            root: ElementId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> ElementId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    #[inline]
    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    #[inline]
    pub fn is_live(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Live elements, the root included.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Creates a detached element.
    pub fn create(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.slots.len() as u32);
        self.slots.push(Some(Element::new(tag)));
        id
    }

    /// Creates a detached element with a space-separated class list.
    pub fn create_with(&mut self, tag: &str, classes: &str) -> ElementId {
        let id = self.create(tag);
        self.add_classes(id, classes);
        id
    }

    pub fn create_text(&mut self, text: &str) -> ElementId {
        let id = self.create(TEXT_TAG);
        if let Some(e) = self.get_mut(id) {
            e.text = text.to_owned();
        }
        id
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_new(&mut self, parent: ElementId, tag: &str, classes: &str) -> ElementId {
        let id = self.create_with(tag, classes);
        self.append(parent, id);
        id
    }

    pub fn append_text(&mut self, parent: ElementId, text: &str) -> ElementId {
        let id = self.create_text(text);
        self.append(parent, id);
        id
    }

    pub fn append(&mut self, parent: ElementId, child: ElementId) {
        self.insert(parent, child, None);
    }

    pub fn prepend(&mut self, parent: ElementId, child: ElementId) {
        self.insert(parent, child, Some(0));
    }

    fn insert(&mut self, parent: ElementId, child: ElementId, at: Option<usize>) {
        if parent == child || !self.is_live(parent) || !self.is_live(child) {
            return;
        }
        if self.is_descendant(child, parent) {
            log::warn!("dom: refusing to move an element into its own subtree");
            return;
        }
        self.detach(child);

        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.get_mut(parent) {
            match at {
                Some(i) => p.children.insert(i.min(p.children.len()), child),
                None => p.children.push(child),
            }
        }
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.get(id).and_then(|e| e.parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(e) = self.get_mut(id) {
            e.parent = None;
        }
    }

    /// Removes `id` with its whole subtree and returns every freed id.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        if id == self.root || !self.is_live(id) {
            return Vec::new();
        }
        self.detach(id);

        let mut freed = vec![id];
        freed.extend(self.descendants(id));
        for dead in freed.iter().copied() {
            if let Some(e) = self.slots.get_mut(dead.0 as usize).and_then(Option::take) {
                if let Some(dom_id) = e.dom_id {
                    if self.index.get(&dom_id) == Some(&dead) {
                        self.index.remove(&dom_id);
                    }
                }
            }
        }
        freed
    }

    /// Removes every child of `id` and returns the freed ids.
    pub fn clear_children(&mut self, id: ElementId) -> Vec<ElementId> {
        let children = match self.get(id) {
            Some(e) => e.children.clone(),
            None => return Vec::new(),
        };
        let mut freed = Vec::new();
        for c in children {
            freed.extend(self.remove(c));
        }
        freed
    }

    /// Replaces the children of `id` with a single text node.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> Vec<ElementId> {
        let freed = self.clear_children(id);
        if self.is_live(id) {
            self.append_text(id, text);
        }
        freed
    }

    /// Text of every descendant text node, in document order.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        if let Some(e) = self.get(id) {
            if e.is_text() {
                out.push_str(&e.text);
            }
        }
        for d in self.descendants(id) {
            if let Some(e) = self.get(d) {
                if e.is_text() {
                    out.push_str(&e.text);
                }
            }
        }
        out
    }

    #[inline]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Elements below `id` in pre-order, `id` excluded.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.children(cur).iter().rev().copied());
        }
        out
    }

    /// Whether `id` lies strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    /// Whether `id` is attached to the document root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        id == self.root || self.is_descendant(self.root, id)
    }

    /// `id` itself or its nearest ancestor matching `pred`.
    pub fn closest(&self, id: ElementId, pred: impl Fn(&Element) -> bool) -> Option<ElementId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let e = self.get(c)?;
            if pred(e) {
                return Some(c);
            }
            cur = e.parent;
        }
        None
    }

    pub fn find_all(&self, root: ElementId, pred: impl Fn(&Element) -> bool) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|d| self.get(*d).is_some_and(&pred))
            .collect()
    }

    pub fn find_first(&self, root: ElementId, pred: impl Fn(&Element) -> bool) -> Option<ElementId> {
        self.descendants(root)
            .into_iter()
            .find(|d| self.get(*d).is_some_and(&pred))
    }

    #[inline]
    pub fn by_class(&self, root: ElementId, class: &str) -> Vec<ElementId> {
        self.find_all(root, |e| e.has_class(class))
    }

    #[inline]
    pub fn by_tag(&self, root: ElementId, tag: &str) -> Vec<ElementId> {
        self.find_all(root, |e| e.tag == tag)
    }

    /// Element whose DOM id is `dom_id`, if it is live.
    #[inline]
    pub fn find(&self, dom_id: &str) -> Option<ElementId> {
        self.index.get(dom_id).copied().filter(|id| self.is_live(*id))
    }

    pub fn set_id(&mut self, id: ElementId, dom_id: &str) {
        let Some(e) = self.get_mut(id) else {
            return;
        };
        let old = e.dom_id.replace(dom_id.to_owned());
        if let Some(old) = old {
            if self.index.get(&old) == Some(&id) {
                self.index.remove(&old);
            }
        }
        if !dom_id.is_empty() {
            self.index.insert(dom_id.to_owned(), id);
        }
    }

    #[inline]
    pub fn dom_id(&self, id: ElementId) -> Option<&str> {
        self.get(id).and_then(|e| e.dom_id.as_deref())
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.get_mut(id) {
            if !class.is_empty() && !e.has_class(class) {
                e.classes.push(class.to_owned());
            }
        }
    }

    pub fn add_classes(&mut self, id: ElementId, classes: &str) {
        for c in classes.split_whitespace() {
            self.add_class(id, c);
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.get_mut(id) {
            e.classes.retain(|c| c != class);
        }
    }

    #[inline]
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|e| e.has_class(class))
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        if name == "id" {
            self.set_id(id, value);
            return;
        }
        if let Some(e) = self.get_mut(id) {
            match e.attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_owned(),
                None => e.attrs.push((name.to_owned(), value.to_owned())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: ElementId, name: &str) {
        if let Some(e) = self.get_mut(id) {
            e.attrs.retain(|(k, _)| k != name);
        }
    }

    #[inline]
    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.attr(name))
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        if let Some(e) = self.get_mut(id) {
            match e.style.iter_mut().find(|(k, _)| k == property) {
                Some((_, v)) => *v = value.to_owned(),
                None => e.style.push((property.to_owned(), value.to_owned())),
            }
        }
    }

    /// Applies an inline `a: b; c: d` declaration list.
    pub fn set_style_text(&mut self, id: ElementId, css: &str) {
        for decl in css.split(';') {
            if let Some((k, v)) = decl.split_once(':') {
                let (k, v) = (k.trim(), v.trim());
                if !k.is_empty() {
                    self.set_style(id, k, v);
                }
            }
        }
    }

    #[inline]
    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.style(property))
    }

    #[inline]
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|e| e.tag.as_str())
    }

    /// Current value. For a `select` this is the first selected option's value.
    pub fn value(&self, id: ElementId) -> Option<String> {
        let e = self.get(id)?;
        if e.tag == "select" {
            return self.selected_values(id).into_iter().next();
        }
        e.value
            .clone()
            .or_else(|| e.attr("value").map(str::to_owned))
    }

    /// Sets the value. For a `select` this selects the matching option.
    pub fn set_value(&mut self, id: ElementId, value: &str) {
        if self.tag(id) == Some("select") {
            let multiple = self.attr(id, "multiple").is_some();
            for opt in self.by_tag(id, "option") {
                let is_match = self.option_value(opt) == value;
                if is_match {
                    self.set_attr(opt, "selected", "yes");
                } else if !multiple {
                    self.remove_attr(opt, "selected");
                }
            }
            return;
        }
        if let Some(e) = self.get_mut(id) {
            e.value = Some(value.to_owned());
        }
    }

    fn option_value(&self, option: ElementId) -> String {
        self.attr(option, "value")
            .map(str::to_owned)
            .unwrap_or_else(|| self.text_content(option))
    }

    /// Values of the selected options; a single select falls back to its first option.
    pub fn selected_values(&self, select: ElementId) -> Vec<String> {
        let options = self.by_tag(select, "option");
        let selected: Vec<String> = options
            .iter()
            .filter(|o| self.attr(**o, "selected").is_some())
            .map(|o| self.option_value(*o))
            .collect();
        if !selected.is_empty() || self.attr(select, "multiple").is_some() {
            return selected;
        }
        options
            .first()
            .map(|o| vec![self.option_value(*o)])
            .unwrap_or_default()
    }

    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        if let Some(e) = self.get_mut(id) {
            e.checked = checked;
        }
    }

    #[inline]
    pub fn checked(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|e| e.checked)
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(e) = self.get_mut(id) {
            e.disabled = disabled;
        }
    }

    #[inline]
    pub fn disabled(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|e| e.disabled)
    }

    pub fn set_files(&mut self, id: ElementId, files: Vec<FileAttachment>) {
        if let Some(e) = self.get_mut(id) {
            e.files = files;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_ids_stay_dead() {
        let mut doc = Document::new();
        let root = doc.root();
        let panel = doc.append_new(root, "div", "panel");
        doc.set_id(panel, "p1");
        let inner = doc.append_new(panel, "span", "");

        let freed = doc.remove(panel);
        assert_eq!(freed, vec![panel, inner]);
        assert!(!doc.is_live(inner));
        assert_eq!(doc.find("p1"), None);

        let next = doc.create("div");
        assert_ne!(next, panel);
        assert_ne!(next, inner);
    }

    #[test]
    fn descendant_checks_are_strict() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append_new(root, "div", "");
        let b = doc.append_new(a, "div", "");

        assert!(doc.is_descendant(a, b));
        assert!(!doc.is_descendant(a, a));
        assert!(!doc.is_descendant(b, a));

        doc.append(b, a);
        assert_eq!(doc.parent(a), Some(root));
    }

    #[test]
    fn select_value_follows_selected_option() {
        let mut doc = Document::new();
        let select = doc.create("select");
        for key in ["a", "b"] {
            let opt = doc.append_new(select, "option", "");
            doc.set_attr(opt, "value", key);
        }
        assert_eq!(doc.value(select).as_deref(), Some("a"));

        doc.set_value(select, "b");
        assert_eq!(doc.value(select).as_deref(), Some("b"));
        assert_eq!(doc.selected_values(select), vec!["b".to_owned()]);
    }

    #[test]
    fn text_content_concatenates_in_order() {
        let mut doc = Document::new();
        let div = doc.create("div");
        let b = doc.append_new(div, "b", "");
        doc.append_text(b, "Warning");
        doc.append_text(div, ": done");
        assert_eq!(doc.text_content(div), "Warning: done");

        doc.set_text(div, "reset");
        assert_eq!(doc.text_content(div), "reset");
        assert!(!doc.is_live(b));
    }
}
