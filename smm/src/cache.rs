use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    api::twitter::TwitterApi,
    error::AppResult,
    models::Tweet,
    store::{KeyValueStore, TWITTER_TIMELINE_CACHE_KEY},
};

pub const TIMELINE_TTL_MINUTES: i64 = 15;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedTimeline {
    data: Vec<Tweet>,
    /// Milliseconds since the epoch.
    timestamp: i64,
    #[serde(default)]
    account_id: Option<i64>,
}

#[derive(Debug)]
pub struct Timeline {
    pub tweets: Vec<Tweet>,
    pub fetched_at: DateTime<Utc>,
    pub from_cache: bool,
}

pub struct TimelineCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl TimelineCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            ttl: Duration::minutes(TIMELINE_TTL_MINUTES),
        }
    }

    // A corrupt entry counts as a miss.
    pub fn read(&self, account_id: i64, now: DateTime<Utc>) -> Option<(Vec<Tweet>, DateTime<Utc>)> {
        let raw = match self.store.get(TWITTER_TIMELINE_CACHE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("cannot read timeline cache: {}", e);
                return None;
            }
        };

        let cached: CachedTimeline = match serde_json::from_str(&raw) {
            Ok(cached) => cached,
            Err(e) => {
                warn!("ignoring unreadable timeline cache: {}", e);
                return None;
            }
        };

        if cached.account_id.is_some_and(|id| id != account_id) {
            debug!("timeline cache belongs to another account");
            return None;
        }

        let written_at = Utc.timestamp_millis_opt(cached.timestamp).single()?;
        if now - written_at >= self.ttl {
            debug!("timeline cache expired at {}", written_at + self.ttl);
            return None;
        }

        Some((cached.data, written_at))
    }

    pub fn write(&self, account_id: i64, tweets: &[Tweet], now: DateTime<Utc>) -> AppResult<()> {
        let entry = CachedTimeline {
            data: tweets.to_vec(),
            timestamp: now.timestamp_millis(),
            account_id: Some(account_id),
        };
        self.store
            .set(TWITTER_TIMELINE_CACHE_KEY, &serde_json::to_string(&entry)?)
    }

    pub fn clear(&self) -> AppResult<()> {
        self.store.remove(TWITTER_TIMELINE_CACHE_KEY)
    }
}

pub async fn load_timeline<T>(
    api: &T,
    cache: &TimelineCache,
    account_id: i64,
    count: u32,
    refresh: bool,
    now: DateTime<Utc>,
) -> AppResult<Timeline>
where
    T: TwitterApi + ?Sized,
{
    if !refresh {
        if let Some((tweets, fetched_at)) = cache.read(account_id, now) {
            debug!("serving {} tweets from cache", tweets.len());
            return Ok(Timeline {
                tweets,
                fetched_at,
                from_cache: true,
            });
        }
    }

    let tweets = api.get_timeline(account_id, count).await?;
    if let Err(e) = cache.write(account_id, &tweets, now) {
        warn!("cannot write timeline cache: {}", e);
    }

    Ok(Timeline {
        tweets,
        fetched_at: now,
        from_cache: false,
    })
}
