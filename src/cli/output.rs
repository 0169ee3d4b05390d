//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::dashboard::{ApprovalOutcome, UserBadge};
use crate::driver::{Driver, VerificationStatus};
use crate::verification::VerificationResult;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn status_color(driver: &Driver) -> Color {
    if driver.is_pending {
        Color::Yellow
    } else if driver.is_verified {
        Color::Green
    } else {
        Color::Red
    }
}

/// Format a driver status as a colored string
pub fn format_status(driver: &Driver) -> String {
    let label = driver.status_label();
    match driver.verification_status {
        VerificationStatus::Verified => label.green().to_string(),
        VerificationStatus::Pending => label.yellow().to_string(),
        _ => label.red().to_string(),
    }
}

fn submitted(driver: &Driver) -> String {
    driver
        .submitted_on()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Print a table of drivers
pub fn print_driver_table(drivers: &[Driver]) {
    if drivers.is_empty() {
        info("No drivers found matching your criteria");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Driver").fg(Color::Cyan),
            Cell::new("Address").fg(Color::Cyan),
            Cell::new("Phone").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
            Cell::new("Submitted").fg(Color::Cyan),
        ]);

    for driver in drivers {
        table.add_row(vec![
            Cell::new(driver.id.to_string()),
            Cell::new(driver.full_name.as_deref().unwrap_or("-")),
            Cell::new(driver.address.as_deref().unwrap_or("-")),
            Cell::new(driver.phone_num.as_deref().unwrap_or("-")),
            Cell::new(driver.status_label()).fg(status_color(driver)),
            Cell::new(submitted(driver)),
        ]);
    }

    println!("{table}");
}

/// Print driver details
pub fn print_driver_detail(driver: &Driver) {
    println!("{}", "Driver Details".bold().underline());
    println!();
    println!("  {} {}", "ID:".bold(), driver.id);
    println!(
        "  {} {}",
        "Name:".bold(),
        driver.full_name.as_deref().unwrap_or("-")
    );
    println!("  {} {}", "Status:".bold(), format_status(driver));
    println!(
        "  {} {}",
        "Address:".bold(),
        driver.address.as_deref().unwrap_or("-")
    );
    println!(
        "  {} {}",
        "Phone:".bold(),
        driver.phone_num.as_deref().unwrap_or("-")
    );
    println!(
        "  {} {}",
        "License:".bold(),
        driver.license_number.as_deref().unwrap_or("-")
    );
    println!(
        "  {} {}",
        "NIC:".bold(),
        driver.nic_number.as_deref().unwrap_or("-")
    );
    println!("  {} {}", "Submitted:".bold(), submitted(driver));
}

fn check(ok: bool) -> colored::ColoredString {
    if ok {
        "●".green()
    } else {
        "○".red()
    }
}

/// Print a document verification result
pub fn print_verification(result: &VerificationResult) {
    println!();
    println!("{}", "Verification Result".bold().underline());
    println!();
    println!("  {} Face match", check(result.face_match));
    println!(
        "  {} Licence: {} ({}), expires {}",
        check(result.ocr_license.success),
        result.ocr_license.number.as_deref().unwrap_or("-"),
        result.ocr_license.name.as_deref().unwrap_or("-"),
        result.ocr_license.expiry.as_deref().unwrap_or("-")
    );
    println!(
        "  {} NIC: {} ({})",
        check(result.ocr_nic.success),
        result.ocr_nic.number.as_deref().unwrap_or("-"),
        result.ocr_nic.name.as_deref().unwrap_or("-")
    );
    println!(
        "  {} {}%",
        "Overall score:".bold(),
        result.overall_score.to_string().cyan()
    );
}

/// Print the result of an approval
pub fn print_approval(outcome: &ApprovalOutcome) {
    match &outcome.error {
        None => success(&format!("Driver {} verified", outcome.driver_id)),
        Some(e) => error(&format!(
            "Verification request for driver {} failed: {}",
            outcome.driver_id, e
        )),
    }

    if outcome.refreshed {
        info("Driver list refreshed");
    } else {
        warn("Driver list was not refreshed");
    }
}

/// Print the header badge of the logged in user
pub fn print_badge(badge: &UserBadge) {
    println!(
        "{} {} {}",
        format!(" {} ", badge.initial).on_blue().white().bold(),
        badge.name.bold(),
        "Administrator".dimmed()
    );
}
