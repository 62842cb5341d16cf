use std::{future::Future, time::Duration};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local, Utc};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Confirm, Password};
use owo_colors::OwoColorize;
use smm::{
    AppError,
    models::{PostStatus, SubmissionStatus},
    ratelimit,
};

pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Shows a spinner while `future` is in flight.
pub async fn busy<F, T>(message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = spinner(message);
    let output = future.await;
    spinner.finish_and_clear();
    output
}

pub fn confirm(assume_yes: bool, prompt: &str) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::new(prompt)
        .with_default(false)
        .prompt()
        .context("Failed to get confirmation")
}

pub fn prompt_password(prompt: &str, confirm: bool) -> Result<String> {
    let password = Password::new(prompt);
    let password = if confirm {
        password
    } else {
        password.without_confirmation()
    };
    password.prompt().context("Failed to read password")
}

pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    table
}

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_optional_time(time: Option<&DateTime<Utc>>) -> String {
    time.map(format_time).unwrap_or_else(|| "-".to_string())
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut truncated: String = single_line.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

pub fn post_status_label(status: PostStatus) -> String {
    match status {
        PostStatus::Scheduled => status.as_str().bright_cyan().to_string(),
        PostStatus::Completed => status.as_str().bright_green().to_string(),
        PostStatus::Failed => status.as_str().bright_red().to_string(),
    }
}

pub fn submission_status_label(status: SubmissionStatus) -> String {
    match status {
        SubmissionStatus::Pending => status.as_str().yellow().to_string(),
        SubmissionStatus::Approved => status.as_str().bright_green().to_string(),
        SubmissionStatus::Rejected => status.as_str().bright_red().to_string(),
    }
}

pub fn success(message: &str) {
    println!("{} {}", "✓".bright_green(), message);
}

pub fn failure(message: &str) {
    println!("{} {}", "✗".bright_red(), message);
}

pub fn notice(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Adds the cooldown to rate limit errors before they reach the user.
pub fn explain(error: AppError) -> anyhow::Error {
    match ratelimit::cooldown_for(&error, Utc::now()) {
        Some(cooldown) => {
            anyhow::anyhow!(
                "{} (retry in {}, at {})",
                error,
                ratelimit::format_remaining(cooldown.remaining(Utc::now())),
                cooldown.until.with_timezone(&Local).format("%H:%M:%S")
            )
        }
        _ => anyhow::Error::new(error),
    }
}
