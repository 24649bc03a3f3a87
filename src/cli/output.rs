//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::access::{NavLink, Navigation, View};
use crate::auth::models::Role;
use crate::auth::token::Claims;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

fn role_color(role: Role) -> Color {
    match role {
        Role::Admin => Color::Magenta,
        Role::Doctor => Color::Green,
        Role::Staff => Color::Yellow,
    }
}

/// Print the current session
pub fn print_session(claims: &Claims) {
    let expires = chrono::DateTime::from_timestamp(claims.exp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| claims.exp.to_string());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Subject").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Expires").fg(Color::Cyan),
        ])
        .add_row(vec![
            Cell::new(&claims.sub),
            Cell::new(claims.email.as_deref().unwrap_or("-")),
            Cell::new(claims.role).fg(role_color(claims.role)),
            Cell::new(expires),
        ]);

    println!("{table}");
}

/// Print a table of navigation links
pub fn print_nav_table(links: &[&NavLink]) {
    if links.is_empty() {
        info("No navigation available. Log in with 'mediflow login'");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Path").fg(Color::Cyan),
            Cell::new("Allowed roles").fg(Color::Cyan),
        ]);

    for link in links {
        table.add_row(vec![
            Cell::new(&link.title),
            Cell::new(&link.path),
            Cell::new(link.allowed_roles),
        ]);
    }

    println!("{table}");
}

/// Report the outcome of a navigation attempt
pub fn print_navigation(path: &str, navigation: Navigation) {
    match navigation {
        Navigation::Render(View::Page(resource)) => {
            success(&format!("{} → {}", path, resource.title()))
        }
        Navigation::Render(View::Login) => info(&format!("{} → login page", path)),
        Navigation::Render(View::NotFound) => warn(&format!("{} → page not found", path)),
        Navigation::Redirect(target) => warn(&format!("{} → redirected to {}", path, target)),
        Navigation::Pending => info(&format!("{} → session still loading", path)),
    }
}
