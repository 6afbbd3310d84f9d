use crate::multipart::MultipartForm;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Uncached POST, the only shape the server accepts for events.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: "POST".to_owned(),
            url: url.into(),
            headers: vec![
                ("Cache-Control".to_owned(), "no-cache".to_owned()),
                ("Pragma".to_owned(), "no-cache".to_owned()),
                ("Accept".to_owned(), "application/json".to_owned()),
            ],
            body: RequestBody::Empty,
        }
    }

    #[inline]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[inline]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<String> {
        match &self.body {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json".to_owned()),
            RequestBody::Multipart(form) => Some(form.content_type()),
        }
    }

    /// Path and query relative to the `/events/` root, for logs and assertions.
    pub fn event_path(&self) -> &str {
        match self.url.find("/events/") {
            Some(i) => &self.url[i + "/events/".len()..],
            None => &self.url,
        }
    }

    #[inline]
    pub fn json_body(&self) -> Option<&str> {
        match &self.body {
            RequestBody::Json(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn multipart(&self) -> Option<&MultipartForm> {
        match &self.body {
            RequestBody::Multipart(form) => Some(form),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: canonical_reason(status).to_owned(),
            body: body.into(),
        }
    }

    #[inline]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn canonical_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_disables_caching() {
        let req = HttpRequest::post("http://h/jemo/admin/events/action/save")
            .with_body(RequestBody::Json("{}".to_owned()));
        assert_eq!(req.header("cache-control"), Some("no-cache"));
        assert_eq!(req.content_type().as_deref(), Some("application/json"));
        assert_eq!(req.event_path(), "action/save");
    }

    #[test]
    fn status_classes() {
        assert!(HttpResponse::ok("{}").is_success());
        let bad = HttpResponse::new(400, "{}");
        assert!(!bad.is_success());
        assert_eq!(bad.status_text, "Bad Request");
    }
}
