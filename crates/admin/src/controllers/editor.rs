//! Create/edit form for a single admin.
//!
//! The mode is fixed at construction: passing an existing record with an
//! identifier opens the form in edit mode, anything else opens it in create
//! mode. In edit mode the password is locked. It is never seeded from the
//! record, cannot be set, and is never sent.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, instrument, warn};

use admin_portal_core::{AdminFields, AdminId, AdminRecord, AdminRole, Route};

use crate::api::AdminApi;
use crate::error::ClientError;
use crate::notify::{Notification, Notifier};
use crate::session::SessionContext;

/// Errors from editing the form itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    /// The password cannot be changed from the edit form.
    #[error("password cannot be changed when editing an existing admin")]
    PasswordLocked,
}

/// Whether the form creates a new admin or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(AdminId),
}

/// Editable copy of an admin's fields.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub name: String,
    pub role: String,
    pub email: String,
    pub restaurant_name: String,
    pub phone: String,
    password: Option<SecretString>,
}

impl FormState {
    fn from_record(record: &AdminRecord) -> Self {
        Self {
            name: record.name.clone(),
            role: record.role.to_string(),
            email: record.email.clone(),
            restaurant_name: record.restaurant_name.clone(),
            phone: record.phone.clone(),
            password: None,
        }
    }

    /// Returns true if a non-empty password has been entered.
    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty())
    }
}

/// Controller behind the register/edit screen.
pub struct RecordEditor {
    api: Arc<dyn AdminApi>,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    mode: EditorMode,
    form: FormState,
}

impl std::fmt::Debug for RecordEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordEditor")
            .field("mode", &self.mode)
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

impl RecordEditor {
    /// Open the form. `existing` comes from the collection view's edit
    /// handoff; `None` (or a record without an id) means create mode.
    #[must_use]
    pub fn new(
        api: Arc<dyn AdminApi>,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
        existing: Option<AdminRecord>,
    ) -> Self {
        let (mode, form) = match existing {
            Some(record) if record.has_id() => {
                let form = FormState::from_record(&record);
                let id = record.id.unwrap_or_else(|| AdminId::new(""));
                (EditorMode::Edit(id), form)
            }
            _ => (EditorMode::Create, FormState::default()),
        };

        Self {
            api,
            session,
            notifier,
            mode,
            form,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    #[must_use]
    pub const fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.form.name = value.into();
    }

    pub fn set_role(&mut self, value: impl Into<String>) {
        self.form.role = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.form.email = value.into();
    }

    pub fn set_restaurant_name(&mut self, value: impl Into<String>) {
        self.form.restaurant_name = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.form.phone = value.into();
    }

    /// Set the password for a new admin.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PasswordLocked`] in edit mode.
    pub fn set_password(&mut self, value: SecretString) -> Result<(), EditorError> {
        if self.is_edit() {
            return Err(EditorError::PasswordLocked);
        }
        self.form.password = Some(value);
        Ok(())
    }

    /// Check required fields without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] naming every missing field.
    pub fn validate(&self) -> Result<(), ClientError> {
        let mut missing = Vec::new();
        if self.form.name.trim().is_empty() {
            missing.push("name");
        }
        if self.form.email.trim().is_empty() {
            missing.push("email");
        }
        if !self.is_edit() && !self.form.has_password() {
            missing.push("password");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Validation(format!(
                "Please fill in the required fields: {}.",
                missing.join(", ")
            )))
        }
    }

    /// Payload for the current mode. Edit mode never carries a password.
    #[must_use]
    pub fn fields(&self) -> AdminFields {
        let fields = AdminFields {
            name: self.form.name.trim().to_owned(),
            role: AdminRole::from(self.form.role.trim()),
            email: self.form.email.trim().to_owned(),
            restaurant_name: self.form.restaurant_name.trim().to_owned(),
            phone: self.form.phone.trim().to_owned(),
            password: self.form.password.clone(),
        };

        match self.mode {
            EditorMode::Create => fields,
            EditorMode::Edit(_) => fields.without_password(),
        }
    }

    /// Validate and send the form.
    ///
    /// On success returns [`Route::Home`]; the collection view re-fetches on
    /// its next activation.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Validation`] for missing fields; no request is sent
    /// - [`ClientError::Authorization`] if no session is stored; no request is sent
    /// - any error from the create/update call
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn submit(&mut self) -> Result<Route, ClientError> {
        match self.try_submit().await {
            Ok(notification) => {
                self.notifier.notify(notification);
                Ok(Route::Home)
            }
            Err(err) => {
                warn!(error = %err, "Admin submit failed");
                self.notifier.notify(Notification::from_error(&err));
                Err(err)
            }
        }
    }

    async fn try_submit(&self) -> Result<Notification, ClientError> {
        self.validate()?;
        let token = self.session.token().await?;
        let fields = self.fields();

        match &self.mode {
            EditorMode::Create => {
                let created = self.api.create_admin(&token, &fields).await?;
                let email = created.email.unwrap_or_else(|| fields.email.clone());
                info!(email = %email, id = ?created.id, "Admin created");
                Ok(Notification::success(
                    "Admin created",
                    format!("{email} was registered successfully."),
                ))
            }
            EditorMode::Edit(id) => {
                let ack = self.api.update_admin(&token, id, &fields).await?;
                info!(id = %id, "Admin updated");
                Ok(Notification::success(
                    "Admin updated",
                    ack.message
                        .unwrap_or_else(|| format!("{} was updated successfully.", fields.email)),
                ))
            }
        }
    }
}
