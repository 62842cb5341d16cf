use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::error::AppError;

/// Cooldown applied to a bare 429 that says nothing about when to retry.
pub const DEFAULT_COOLDOWN_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub until: DateTime<Utc>,
}

impl Cooldown {
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.until - now).max(Duration::zero())
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.until
    }
}

fn legacy_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)try again in (\d+) minutes?").expect("rate limit pattern is valid")
    })
}

/// Works out how long to wait before retrying after `error`.
pub fn cooldown_for(error: &AppError, now: DateTime<Utc>) -> Option<Cooldown> {
    let AppError::Api {
        status,
        message,
        retry_after_seconds,
    } = error
    else {
        return None;
    };

    if let Some(secs) = retry_after_seconds {
        let wait = i64::try_from(*secs).ok().and_then(Duration::try_seconds);
        return Some(Cooldown {
            until: saturating_after(now, wait),
        });
    }

    if let Some(minutes) = legacy_pattern()
        .captures(message)
        .and_then(|caps| caps[1].parse::<i64>().ok())
    {
        return Some(Cooldown {
            until: saturating_after(now, Duration::try_minutes(minutes)),
        });
    }

    (*status == 429).then(|| Cooldown {
        until: saturating_after(now, Duration::try_minutes(DEFAULT_COOLDOWN_MINUTES)),
    })
}

// Server supplied waits can be arbitrarily large.
fn saturating_after(now: DateTime<Utc>, wait: Option<Duration>) -> DateTime<Utc> {
    wait.and_then(|wait| now.checked_add_signed(wait))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{}:{:02}", total / 60, total % 60)
}
