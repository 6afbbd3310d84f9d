use std::error::Error;
use std::fmt;

/// Client-wide error.
///
/// Crates may define their own error types and map them into `UiError`.
#[derive(Debug)]
pub enum UiError {
    /// The request never produced an HTTP response.
    Transport(String),

    /// A local capability failed while handling an interaction.
    Script { message: String, stack: String },

    /// A response body could not be read as a view description.
    View(String),

    /// Configuration could not be read or parsed.
    Config(String),

    /// Error raised while handling a named action.
    Action {
        action: String,
        cause: Box<UiError>,
    },

    /// Generic error (fallback).
    Other(String),
}

impl UiError {
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    #[inline]
    pub fn script(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
            stack: stack.into(),
        }
    }

    #[inline]
    pub fn with_action(action: impl Into<String>, err: UiError) -> Self {
        UiError::Action {
            action: action.into(),
            cause: Box::new(err),
        }
    }

    /// Innermost error, skipping action attribution.
    pub fn root(&self) -> &UiError {
        match self {
            UiError::Action { cause, .. } => cause.root(),
            other => other,
        }
    }

    #[inline]
    pub fn is_script(&self) -> bool {
        matches!(self.root(), UiError::Script { .. })
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::Transport(s) => write!(f, "transport: {s}"),
            UiError::Script { message, stack } => write!(f, "{message} - {stack}"),
            UiError::View(s) => write!(f, "view: {s}"),
            UiError::Config(s) => write!(f, "config: {s}"),
            UiError::Action { action, cause } => write!(f, "action '{action}': {cause}"),
            UiError::Other(s) => write!(f, "{s}"),
        }
    }
}

impl Error for UiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UiError::Action { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<&str> for UiError {
    #[inline]
    fn from(value: &str) -> Self {
        UiError::Other(value.to_string())
    }
}

impl From<String> for UiError {
    #[inline]
    fn from(value: String) -> Self {
        UiError::Other(value)
    }
}

pub type UiResult<T> = Result<T, UiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_error_displays_message_and_stack() {
        let err = UiError::script("boom", "at datalist.save(d1)");
        assert_eq!(err.to_string(), "boom - at datalist.save(d1)");
    }

    #[test]
    fn action_wrapper_exposes_root_and_source() {
        let err = UiError::with_action("saveUser", UiError::script("bad", "at x"));
        assert!(err.is_script());
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "action 'saveUser': bad - at x");
    }
}
