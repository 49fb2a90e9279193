//! Dependencies shared by every command.

use std::sync::Arc;

use admin_portal::api::HttpAdminApi;
use admin_portal::config::ClientConfig;
use admin_portal::controllers::{CollectionController, RecordEditor, SessionController};
use admin_portal::error::ClientError;
use admin_portal::notify::QueuedNotifier;
use admin_portal::session::SessionContext;
use admin_portal::store::FileStore;
use admin_portal_core::AdminRecord;

/// Wiring for one CLI invocation.
pub struct AppState {
    pub api: Arc<HttpAdminApi>,
    pub session: SessionContext,
    pub notifier: Arc<QueuedNotifier>,
}

impl AppState {
    /// Build the API client and open the credential store.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let store = Arc::new(FileStore::new(config.store_path()));
        tracing::debug!(
            api = %config.api_url,
            store = %store.path().display(),
            "Client configured"
        );

        Ok(Self {
            api: Arc::new(HttpAdminApi::new(&config)?),
            session: SessionContext::new(store),
            notifier: Arc::new(QueuedNotifier::new()),
        })
    }

    pub fn session_controller(&self) -> SessionController {
        SessionController::new(
            self.api.clone(),
            self.session.clone(),
            self.notifier.clone(),
        )
    }

    pub fn collection(&self) -> CollectionController {
        CollectionController::new(
            self.api.clone(),
            self.session.clone(),
            self.notifier.clone(),
        )
    }

    pub fn editor(&self, existing: Option<AdminRecord>) -> RecordEditor {
        RecordEditor::new(
            self.api.clone(),
            self.session.clone(),
            self.notifier.clone(),
            existing,
        )
    }
}
