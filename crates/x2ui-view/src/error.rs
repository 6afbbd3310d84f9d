#[derive(Debug)]
pub enum ViewError {
    /// Body is not JSON at all.
    Json(String),
    /// JSON is well-formed but does not have the expected shape.
    Shape(String),
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewError::Json(e) => write!(f, "view: json parse failed: {e}"),
            ViewError::Shape(e) => write!(f, "view: unexpected shape: {e}"),
        }
    }
}

impl std::error::Error for ViewError {}

impl From<serde_json::Error> for ViewError {
    #[inline]
    fn from(value: serde_json::Error) -> Self {
        ViewError::Json(value.to_string())
    }
}
