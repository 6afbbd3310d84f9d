use std::io::Write;

/// One `multipart/form-data` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        data: Vec<u8>,
    },
}

impl Part {
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Part::Text { name, .. } | Part::File { name, .. } => name,
        }
    }
}

/// Ordered form fields, encoded per RFC 7578.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("x2ui-{}", uuid::Uuid::new_v4().simple()))
    }

    #[inline]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    #[inline]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.push(Part::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> &mut Self {
        self.parts.push(Part::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        });
        self
    }

    /// First text value for `name`.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.text_values(name).into_iter().next()
    }

    pub fn text_values(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    #[inline]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            // Writes into a Vec cannot fail.
            let _ = write!(out, "--{}\r\n", self.boundary);
            match part {
                Part::Text { name, value } => {
                    let _ = write!(
                        out,
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        escape_quoted(name)
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    data,
                } => {
                    let _ = write!(
                        out,
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        escape_quoted(name),
                        escape_quoted(file_name),
                        content_type
                    );
                    out.extend_from_slice(data);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        let _ = write!(out, "--{}--\r\n", self.boundary);
        out
    }
}

fn escape_quoted(s: &str) -> String {
    s.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_text_and_file_parts() {
        let mut form = MultipartForm::with_boundary("B");
        form.text("name", "Ada")
            .file("avatar", "a\"b.png", "image/png", vec![1, 2]);

        let body = form.encode();
        let expected = [
            b"--B\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nAda\r\n".as_slice(),
            b"--B\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"a%22b.png\"\r\nContent-Type: image/png\r\n\r\n".as_slice(),
            [1u8, 2].as_slice(),
            b"\r\n--B--\r\n".as_slice(),
        ]
        .concat();
        assert_eq!(body, expected);
        assert_eq!(form.content_type(), "multipart/form-data; boundary=B");
    }

    #[test]
    fn repeated_names_keep_order() {
        let mut form = MultipartForm::new();
        form.text("tag", "a").text("tag", "b");
        assert_eq!(form.text_values("tag"), vec!["a", "b"]);
        assert_eq!(form.get_text("tag"), Some("a"));
        assert!(form.boundary().starts_with("x2ui-"));
    }
}
