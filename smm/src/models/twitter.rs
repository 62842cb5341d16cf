use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(alias = "public_metrics")]
    pub public_metrics: Option<TweetMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct TweetMetrics {
    #[serde(alias = "likeCount")]
    pub like_count: u64,
    #[serde(alias = "retweetCount")]
    pub retweet_count: u64,
    #[serde(alias = "replyCount")]
    pub reply_count: u64,
    #[serde(alias = "impressionCount")]
    pub impression_count: u64,
}

#[derive(Debug, Serialize)]
pub struct PostTweetRequest {
    pub content: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum TimeRange {
    #[value(name = "7d")]
    Week,
    #[value(name = "30d")]
    Month,
    #[value(name = "90d")]
    Quarter,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TwitterAnalytics {
    pub time_range: Option<String>,
    pub followers: u64,
    pub impressions: u64,
    pub engagements: u64,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub top_tweets: Vec<Tweet>,
}

impl TwitterAnalytics {
    /// Engagements per impression, as a percentage.
    pub fn engagement_rate(&self) -> f64 {
        if self.impressions == 0 {
            0.0
        } else {
            self.engagements as f64 * 100.0 / self.impressions as f64
        }
    }
}
