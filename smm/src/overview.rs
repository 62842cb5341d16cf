use chrono::{DateTime, Days, TimeZone};

use crate::models::{PostStatus, ScheduledPost};

#[derive(Debug, Default)]
pub struct Overview {
    pub todays_schedule: Vec<ScheduledPost>,
    pub yesterdays_completed: Vec<ScheduledPost>,
    pub upcoming_count: usize,
    pub failed_count: usize,
}

/// Buckets posts by calendar day in the timezone of `now`.
pub fn build_overview<Tz: TimeZone>(
    scheduled: &[ScheduledPost],
    completed: &[ScheduledPost],
    failed_count: usize,
    now: &DateTime<Tz>,
) -> Overview {
    let tz = now.timezone();
    let today = now.date_naive();
    let yesterday = today.checked_sub_days(Days::new(1));

    let mut todays_schedule: Vec<ScheduledPost> = scheduled
        .iter()
        .filter(|post| post.status == PostStatus::Scheduled)
        .filter(|post| post.scheduled_time.with_timezone(&tz).date_naive() == today)
        .cloned()
        .collect();
    todays_schedule.sort_by_key(|post| post.scheduled_time);

    let mut yesterdays_completed: Vec<ScheduledPost> = completed
        .iter()
        .filter(|post| post.status == PostStatus::Completed)
        .filter(|post| {
            let posted = post.posted_time.unwrap_or(post.scheduled_time);
            Some(posted.with_timezone(&tz).date_naive()) == yesterday
        })
        .cloned()
        .collect();
    yesterdays_completed.sort_by_key(|post| post.posted_time.unwrap_or(post.scheduled_time));

    let upcoming_count = scheduled
        .iter()
        .filter(|post| post.status == PostStatus::Scheduled)
        .count();

    Overview {
        todays_schedule,
        yesterdays_completed,
        upcoming_count,
        failed_count,
    }
}
