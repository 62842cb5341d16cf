use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::Platform;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Scheduled,
    Completed,
    Failed,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Scheduled => "scheduled",
            PostStatus::Completed => "completed",
            PostStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPost {
    pub id: i64,
    pub platform: Platform,
    pub platform_account_id: i64,
    /// Channel or chat id. Empty for Twitter.
    #[serde(default)]
    pub target_id: String,
    pub content: String,
    pub scheduled_time: DateTime<Utc>,
    pub status: PostStatus,
    #[serde(default)]
    pub posted_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ScheduledPost {
    /// Only posts still waiting for the scheduler can be edited or deleted.
    pub fn is_editable(&self) -> bool {
        self.status == PostStatus::Scheduled
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduledPost {
    pub platform: Platform,
    pub platform_account_id: i64,
    pub target_id: String,
    pub content: String,
    pub scheduled_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPostChangeset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl ScheduledPostChangeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_target(mut self, target_id: String) -> Self {
        self.target_id = Some(target_id);
        self
    }

    pub fn with_scheduled_time(mut self, scheduled_time: DateTime<Utc>) -> Self {
        self.scheduled_time = Some(scheduled_time);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.target_id.is_none() && self.scheduled_time.is_none()
    }
}
