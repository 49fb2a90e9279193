//! Admin record commands: list, create and update.
//!
//! # Usage
//!
//! ```bash
//! # Everyone, as a table
//! ap-cli list
//!
//! # Filtered, as JSON
//! ap-cli list -s palace --json
//!
//! # Register a new admin
//! ap-cli create --name "Jane Smith" --email jane@example.com --password '...'
//!
//! # Change fields on an existing admin
//! ap-cli update --id 65f1c0ffee --restaurant "Food Palace"
//! ```

use clap::Args;
use secrecy::SecretString;
use thiserror::Error;

use admin_portal::controllers::{LoadOutcome, RecordEditor};
use admin_portal_core::AdminId;

use crate::output;
use crate::state::AppState;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Errors raised by the CLI itself rather than the portal client.
#[derive(Debug, Error)]
pub enum AdminCommandError {
    /// No fetched record carries the requested id.
    #[error("No admin found with id: {0}")]
    NotFound(String),

    /// The list fetch was superseded before it finished.
    #[error("Admin list was not loaded")]
    NotLoaded,
}

/// Fields for a new admin.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Initial password
    #[arg(short, long, env = "ADMIN_PORTAL_NEW_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Role tag, e.g. `super-admin`
    #[arg(short, long, default_value = "")]
    pub role: String,

    /// Restaurant the admin belongs to
    #[arg(long, default_value = "")]
    pub restaurant: String,

    /// Contact phone number
    #[arg(long, default_value = "")]
    pub phone: String,
}

/// Overrides for an existing admin. Unset flags keep the stored value.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Id of the admin to change
    #[arg(long)]
    pub id: String,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub email: Option<String>,

    #[arg(short, long)]
    pub role: Option<String>,

    #[arg(long)]
    pub restaurant: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

/// Fetch the collection once and print the records matching `search`.
pub async fn list(state: &AppState, search: &str, json: bool) -> CommandResult {
    let collection = state.collection();
    let activation = collection.activate();
    collection.set_search(search);

    match collection.load(activation).await? {
        LoadOutcome::Loaded(count) => tracing::debug!(count, "Admins fetched"),
        LoadOutcome::AlreadyLoading | LoadOutcome::Stale => {
            return Err(AdminCommandError::NotLoaded.into());
        }
    }

    let records = collection.visible();
    if json {
        output::print_records_json(&records)?;
    } else {
        output::print_records_table(&records, collection.total());
    }
    Ok(())
}

pub async fn create(state: &AppState, args: CreateArgs) -> CommandResult {
    let mut editor = state.editor(None);
    editor.set_name(args.name);
    editor.set_email(args.email);
    editor.set_role(args.role);
    editor.set_restaurant_name(args.restaurant);
    editor.set_phone(args.phone);
    editor.set_password(SecretString::from(args.password))?;

    editor.submit().await?;
    Ok(())
}

/// Look the record up in a fresh fetch, then submit it with overrides.
/// The password is never sent on update.
pub async fn update(state: &AppState, args: UpdateArgs) -> CommandResult {
    let collection = state.collection();
    let activation = collection.activate();
    if !matches!(collection.load(activation).await?, LoadOutcome::Loaded(_)) {
        return Err(AdminCommandError::NotLoaded.into());
    }

    let id = AdminId::new(args.id.trim());
    let existing = collection
        .edit(&id)
        .ok_or_else(|| AdminCommandError::NotFound(id.to_string()))?;
    collection.deactivate();

    let mut editor = state.editor(Some(existing));
    apply_overrides(&mut editor, args);

    editor.submit().await?;
    Ok(())
}

fn apply_overrides(editor: &mut RecordEditor, args: UpdateArgs) {
    if let Some(name) = args.name {
        editor.set_name(name);
    }
    if let Some(email) = args.email {
        editor.set_email(email);
    }
    if let Some(role) = args.role {
        editor.set_role(role);
    }
    if let Some(restaurant) = args.restaurant {
        editor.set_restaurant_name(restaurant);
    }
    if let Some(phone) = args.phone {
        editor.set_phone(phone);
    }
}
