//! Session helpers to keep handlers free of framework-specific logic.
//!
//! The cookie carries only the editor id; `Caller` is rebuilt from it on
//! every request.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use fol_core::error::{AppError, Result};
use fol_core::models::EditorId;
use fol_core::services::Caller;
use futures_util::future::LocalBoxFuture;

pub(crate) const EDITOR_ID_KEY: &str = "user_id";

#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Stores the editor id and rotates the session id.
    pub fn persist_editor(&self, editor: &EditorId) -> Result<()> {
        self.0.renew();
        self.0
            .insert(EDITOR_ID_KEY, editor.as_str())
            .map_err(|e| AppError::internal(format!("failed to persist session: {e}")))
    }

    pub fn editor(&self) -> Result<Option<EditorId>> {
        let id = self
            .0
            .get::<String>(EDITOR_ID_KEY)
            .map_err(|e| AppError::internal(format!("failed to read session: {e}")))?;
        Ok(id.filter(|raw| !raw.is_empty()).map(EditorId))
    }

    /// An unreadable cookie is treated as anonymous rather than an error page.
    pub fn caller(&self) -> Caller {
        match self.editor() {
            Ok(editor) => Caller::from_session(editor),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session cookie");
                Caller::anonymous()
            }
        }
    }

    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
