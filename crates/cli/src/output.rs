//! Terminal rendering of notifications, records and profiles.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use admin_portal::ClientError;
use admin_portal::notify::{Notification, NotificationKind};
use admin_portal_core::{AdminProfile, AdminRecord, Route};

/// Print queued notifications: successes to stdout, errors to stderr.
pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        match n.kind {
            NotificationKind::Success => println!("✔ {}: {}", n.title, n.message),
            NotificationKind::Error => eprintln!("✖ {}: {}", n.title, n.message),
        }
    }
}

/// Notification for a command error that no controller has reported.
///
/// Controllers notify every [`ClientError`] they return, so those yield
/// `None`; anything raised by the CLI itself does not.
pub fn unreported_error(err: &(dyn std::error::Error + 'static)) -> Option<Notification> {
    if err.downcast_ref::<ClientError>().is_some() {
        None
    } else {
        Some(Notification::error("Command failed", err.to_string()))
    }
}

pub fn print_route(route: Route) {
    println!("{route}");
}

pub fn print_profile(profile: &AdminProfile) {
    println!("Email:     {}", profile.email);
    println!("Role:      {}", profile.role);
    println!(
        "Signed in: {}",
        profile.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

pub fn print_records_json(records: &[AdminRecord]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

/// Plain table; the password column does not exist.
pub fn print_records_table(records: &[AdminRecord], total: usize) {
    const HEADERS: [&str; 6] = ["ID", "NAME", "ROLE", "EMAIL", "RESTAURANT", "PHONE"];

    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            [
                r.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                r.name.clone(),
                r.role.to_string(),
                r.email.clone(),
                r.restaurant_name.clone(),
                r.phone.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    println!("{}", render(&HEADERS));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        println!("{}", render(&cells));
    }
    println!("\n{} of {} admins", records.len(), total);
}

#[cfg(test)]
mod tests {
    use admin_portal::controllers::EditorError;

    use super::*;
    use crate::commands::admin::AdminCommandError;

    #[test]
    fn test_cli_errors_become_notifications() {
        let err: Box<dyn std::error::Error> =
            Box::new(AdminCommandError::NotFound("999".to_string()));
        let note = unreported_error(&*err);

        assert_eq!(
            note,
            Some(Notification::error(
                "Command failed",
                "No admin found with id: 999"
            ))
        );
    }

    #[test]
    fn test_editor_errors_become_notifications() {
        let err: Box<dyn std::error::Error> = Box::new(EditorError::PasswordLocked);
        let note = unreported_error(&*err);

        assert!(note.is_some_and(|n| n.is_error()));
    }

    #[test]
    fn test_client_errors_are_already_reported() {
        let err: Box<dyn std::error::Error> =
            Box::new(ClientError::Network("connection refused".to_string()));
        assert!(unreported_error(&*err).is_none());
    }
}
