use std::fmt::Write;

use super::{Document, ElementId};

const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

impl Document {
    /// Serializes `id` and its subtree.
    pub fn to_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serializes the children of `id`.
    pub fn inner_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        for c in self.children(id) {
            self.write_html(*c, &mut out);
        }
        out
    }

    fn write_html(&self, id: ElementId, out: &mut String) {
        let Some(e) = self.get(id) else {
            return;
        };
        if e.is_text() {
            escape_into(e.text(), false, out);
            return;
        }

        out.push('<');
        out.push_str(e.tag());
        if let Some(dom_id) = e.dom_id() {
            write_attr(out, "id", dom_id);
        }
        if !e.classes().is_empty() {
            write_attr(out, "class", &e.classes().join(" "));
        }
        for (k, v) in e.attrs() {
            write_attr(out, k, v);
        }
        if !e.styles().is_empty() {
            let css = e
                .styles()
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect::<Vec<_>>()
                .join(" ");
            write_attr(out, "style", &css);
        }
        if e.tag() != "textarea" {
            if let Some(v) = &e.value {
                write_attr(out, "value", v);
            }
        }
        if e.checked() {
            out.push_str(" checked");
        }
        if e.disabled() {
            out.push_str(" disabled");
        }
        out.push('>');

        if VOID_TAGS.contains(&e.tag()) {
            return;
        }
        if e.tag() == "textarea" {
            if let Some(v) = &e.value {
                escape_into(v, false, out);
            }
        }
        for c in e.children() {
            self.write_html(*c, out);
        }
        let _ = write!(out, "</{}>", e.tag());
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(value, true, out);
    out.push('"');
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_attributes_and_escapes_text() {
        let mut doc = Document::new();
        let div = doc.create_with("div", "alert alert-info");
        doc.set_id(div, "n1");
        doc.set_style(div, "display", "none");
        doc.append_text(div, "<b>not markup</b>");
        let input = doc.append_new(div, "input", "form-control");
        doc.set_attr(input, "name", "q\"x");
        doc.set_value(input, "a&b");

        assert_eq!(
            doc.to_html(div),
            "<div id=\"n1\" class=\"alert alert-info\" style=\"display: none;\">\
             &lt;b&gt;not markup&lt;/b&gt;\
             <input class=\"form-control\" name=\"q&quot;x\" value=\"a&amp;b\"></div>"
        );
    }
}
