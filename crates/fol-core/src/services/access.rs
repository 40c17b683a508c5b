//! The access gate shared by every mutating content operation.

use tracing::warn;

use crate::error::{AppError, Result};
use crate::models::EditorId;

/// Who is calling a service, as derived from the session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    editor: Option<EditorId>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self { editor: None }
    }

    pub fn editor(id: EditorId) -> Self {
        Self { editor: Some(id) }
    }

    pub fn from_session(editor: Option<EditorId>) -> Self {
        Self { editor }
    }

    /// Drives the "show create/delete controls" decision in templates.
    pub fn is_editor(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor_id(&self) -> Option<&EditorId> {
        self.editor.as_ref()
    }
}

/// Rejects anonymous callers. Every create and delete calls this first.
pub fn authorize<'a>(caller: &'a Caller, action: &str) -> Result<&'a EditorId> {
    match caller.editor_id() {
        Some(id) => Ok(id),
        None => {
            warn!(action, "rejected anonymous mutation");
            Err(AppError::Unauthorized("login required".to_string()))
        }
    }
}
