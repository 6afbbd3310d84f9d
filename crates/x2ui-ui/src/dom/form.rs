use x2ui_transport::MultipartForm;

use super::{Document, ElementId};

const NON_FIELD_INPUTS: [&str; 4] = ["button", "submit", "reset", "image"];

impl Document {
    /// Successful controls below `form`, in document order, as multipart fields.
    pub fn form_data(&self, form: ElementId) -> MultipartForm {
        let mut out = MultipartForm::new();
        for id in self.descendants(form) {
            let Some(e) = self.get(id) else {
                continue;
            };
            if !matches!(e.tag(), "input" | "select" | "textarea") || e.disabled() {
                continue;
            }
            let Some(name) = e.attr("name").filter(|n| !n.is_empty()) else {
                continue;
            };

            match e.tag() {
                "select" => {
                    for v in self.selected_values(id) {
                        out.text(name, v);
                    }
                }
                "textarea" => {
                    out.text(name, self.value(id).unwrap_or_default());
                }
                _ => {
                    let kind = e.attr("type").unwrap_or("text").to_ascii_lowercase();
                    match kind.as_str() {
                        "checkbox" | "radio" => {
                            if e.checked() {
                                out.text(name, self.value(id).unwrap_or_else(|| "on".to_owned()));
                            }
                        }
                        "file" => {
                            if e.files().is_empty() {
                                out.file(name, "", "application/octet-stream", Vec::new());
                            }
                            for f in e.files() {
                                out.file(name, f.file_name.as_str(), f.content_type.as_str(), f.data.clone());
                            }
                        }
                        k if NON_FIELD_INPUTS.contains(&k) => {}
                        _ => {
                            out.text(name, self.value(id).unwrap_or_default());
                        }
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::FileAttachment;
    use x2ui_transport::Part;

    #[test]
    fn collects_successful_controls_only() {
        let mut doc = Document::new();
        let form = doc.create("form");

        let name = doc.append_new(form, "input", "");
        doc.set_attr(name, "type", "text");
        doc.set_attr(name, "name", "name");
        doc.set_value(name, "Ada");

        for (value, checked) in [("true", false), ("false", true)] {
            let radio = doc.append_new(form, "input", "");
            doc.set_attr(radio, "type", "radio");
            doc.set_attr(radio, "name", "active");
            doc.set_attr(radio, "value", value);
            doc.set_checked(radio, checked);
        }

        let off = doc.append_new(form, "input", "");
        doc.set_attr(off, "name", "ignored");
        doc.set_disabled(off, true);

        let upload = doc.append_new(form, "input", "");
        doc.set_attr(upload, "type", "file");
        doc.set_attr(upload, "name", "avatar");
        doc.set_files(
            upload,
            vec![FileAttachment {
                file_name: "a.png".to_owned(),
                content_type: "image/png".to_owned(),
                data: vec![1, 2, 3],
            }],
        );

        let data = doc.form_data(form);
        assert_eq!(data.get_text("name"), Some("Ada"));
        assert_eq!(data.text_values("active"), vec!["false"]);
        assert_eq!(data.get_text("ignored"), None);
        assert!(data.parts().iter().any(|p| matches!(
            p,
            Part::File { name, file_name, .. } if name == "avatar" && file_name == "a.png"
        )));
    }
}
