//! What a failed load shows instead of its content.

use crate::{DirectoryError, ErrorKind};

pub const DEFAULT_TITLE: &str = "Error";
pub const DEFAULT_DESCRIPTION: &str = "Something went wrong. Please try again later.";
pub const USERS_DESCRIPTION: &str = "Failed to load users. Please try again later.";
pub const USER_DETAIL_DESCRIPTION: &str = "Failed to load user details. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Navigate back to `/`.
    GoHome,
    /// Re-run the failed query.
    Retry,
}

impl ErrorAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::GoHome => "Go Home",
            Self::Retry => "Retry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub title: String,
    pub description: String,
    /// The underlying error message, if any.
    pub cause: Option<String>,
    pub actions: Vec<ErrorAction>,
}

impl Default for ErrorView {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            cause: None,
            actions: vec![ErrorAction::GoHome, ErrorAction::Retry],
        }
    }
}

impl ErrorView {
    /// Error shown in place of the directory list.
    pub fn for_users(err: &DirectoryError) -> Self {
        Self::with_description(USERS_DESCRIPTION, err)
    }

    /// Error shown in place of a user's detail page.
    pub fn for_user_detail(err: &DirectoryError) -> Self {
        Self::with_description(USER_DETAIL_DESCRIPTION, err)
    }

    fn with_description(description: &str, err: &DirectoryError) -> Self {
        let mut view = Self {
            description: description.to_owned(),
            cause: Some(err.to_string()),
            ..Self::default()
        };
        // Retrying cannot fix a bad path.
        if matches!(err.kind(), ErrorKind::InvalidId | ErrorKind::UnknownRoute) {
            view.actions.retain(|action| *action != ErrorAction::Retry);
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view() {
        let view = ErrorView::default();
        assert_eq!(view.title, "Error");
        assert_eq!(
            view.description,
            "Something went wrong. Please try again later."
        );
        assert_eq!(view.actions, vec![ErrorAction::GoHome, ErrorAction::Retry]);
        assert!(view.cause.is_none());
    }

    #[test]
    fn test_users_context() {
        let view = ErrorView::for_users(&DirectoryError::Status { status: 500 });
        assert_eq!(view.title, "Error");
        assert_eq!(view.description, USERS_DESCRIPTION);
        assert_eq!(view.cause.as_deref(), Some("API returned status: 500"));
        assert!(view.actions.contains(&ErrorAction::Retry));
    }

    #[test]
    fn test_invalid_id_offers_no_retry() {
        let view = ErrorView::for_user_detail(&DirectoryError::InvalidId("abc".to_owned()));
        assert_eq!(view.description, USER_DETAIL_DESCRIPTION);
        assert_eq!(view.actions, vec![ErrorAction::GoHome]);
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(ErrorAction::GoHome.label(), "Go Home");
        assert_eq!(ErrorAction::Retry.label(), "Retry");
    }
}
