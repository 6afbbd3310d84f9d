use serde::{Deserialize, Serialize};
use x2ui_view::{FieldError, ValidationErrors};

use crate::dom::ElementId;

/// Signed-in user, sent as the `x2.user` header on every request while a token is held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    pub given_name: String,
    pub surname: String,
    pub user_principal_name: String,
}

impl UserIdentity {
    #[inline]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

/// Interaction state shared by the binder, the dispatcher and the notification controller.
///
/// At most one modal is active and at most one button is busy at any time.
#[derive(Debug, Default)]
pub struct UiSession {
    active_modal: Option<ElementId>,
    active_button: Option<ElementId>,
    last_error: Option<ValidationErrors>,
    user: Option<UserIdentity>,
    token: Option<String>,
}

impl UiSession {
    #[inline]
    pub fn active_modal(&self) -> Option<ElementId> {
        self.active_modal
    }

    #[inline]
    pub(crate) fn set_active_modal(&mut self, modal: ElementId) -> Option<ElementId> {
        self.active_modal.replace(modal)
    }

    #[inline]
    pub(crate) fn take_active_modal(&mut self) -> Option<ElementId> {
        self.active_modal.take()
    }

    #[inline]
    pub fn active_button(&self) -> Option<ElementId> {
        self.active_button
    }

    /// Marks `button` busy; fails while another button is.
    pub(crate) fn claim_button(&mut self, button: ElementId) -> bool {
        if self.active_button.is_some() {
            return false;
        }
        self.active_button = Some(button);
        true
    }

    #[inline]
    pub(crate) fn release_button(&mut self) -> Option<ElementId> {
        self.active_button.take()
    }

    #[inline]
    pub fn last_error(&self) -> Option<&ValidationErrors> {
        self.last_error.as_ref()
    }

    #[inline]
    pub(crate) fn set_last_error(&mut self, errors: Option<ValidationErrors>) {
        self.last_error = errors;
    }

    /// Field error of the last rejected submission.
    pub fn field_error(&self, key: &str) -> Option<&FieldError> {
        self.last_error.as_ref().and_then(|e| e.error_for(key))
    }

    #[inline]
    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// The identity is only attached to requests while a token is held.
    pub fn auth_header(&self) -> Option<String> {
        match (&self.user, &self.token) {
            (Some(user), Some(_)) => Some(user.to_json()),
            _ => None,
        }
    }

    pub(crate) fn sign_in(&mut self, user: UserIdentity, token: String) {
        self.user = Some(user);
        self.token = Some(token);
    }

    pub(crate) fn sign_out(&mut self) {
        self.user = None;
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_button_can_be_busy() {
        let mut doc = crate::dom::Document::new();
        let (a, b) = (doc.create("button"), doc.create("button"));

        let mut s = UiSession::default();
        assert!(s.claim_button(a));
        assert!(!s.claim_button(b));
        assert_eq!(s.release_button(), Some(a));
        assert!(s.claim_button(b));
    }

    #[test]
    fn identity_header_needs_a_token() {
        let mut s = UiSession::default();
        assert_eq!(s.auth_header(), None);

        s.sign_in(
            UserIdentity {
                id: "u1".to_owned(),
                given_name: "Ada".to_owned(),
                surname: "Lovelace".to_owned(),
                user_principal_name: "ada@example.com".to_owned(),
            },
            "t0k3n".to_owned(),
        );
        let header = s.auth_header().unwrap();
        assert!(header.contains("\"givenName\":\"Ada\""));
        assert!(header.contains("\"userPrincipalName\":\"ada@example.com\""));

        s.sign_out();
        assert_eq!(s.auth_header(), None);
    }
}
