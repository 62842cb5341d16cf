use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use log::{debug, info};

use crate::{
    api::schedule::ScheduleApi,
    error::{AppError, AppResult},
    models::{NewScheduledPost, PostStatus, ScheduledPost, ScheduledPostChangeset},
};

/// Refuses times that are not strictly in the future.
pub fn validate_schedule_time(scheduled_time: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<()> {
    if scheduled_time <= now {
        return Err(AppError::Validation(
            "Scheduled time must be in the future".to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_editable(post: &ScheduledPost) -> AppResult<()> {
    if !post.is_editable() {
        return Err(AppError::Immutable(format!(
            "Post {} is {} and can no longer be changed",
            post.id, post.status
        )));
    }
    Ok(())
}

/// Accepts RFC 3339 (`2026-10-17T10:00:00Z`) or a local `YYYY-MM-DD HH:MM`.
pub fn parse_schedule_time(input: &str) -> AppResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Ok(time.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|time| time.with_timezone(&Utc))
                .ok_or_else(|| {
                    AppError::Validation(format!("'{input}' does not exist in the local timezone"))
                });
        }
    }

    Err(AppError::Validation(format!(
        "cannot parse '{input}', expected YYYY-MM-DD HH:MM or RFC 3339"
    )))
}

// Every mutation is followed by a full reload.
pub struct ScheduleBoard<'a, A> {
    api: &'a A,
    status: PostStatus,
    posts: Vec<ScheduledPost>,
}

impl<'a, A: ScheduleApi> ScheduleBoard<'a, A> {
    pub fn new(api: &'a A, status: PostStatus) -> Self {
        Self {
            api,
            status,
            posts: Vec::new(),
        }
    }

    pub async fn load(api: &'a A, status: PostStatus) -> AppResult<Self> {
        let mut board = Self::new(api, status);
        board.reload().await?;
        Ok(board)
    }

    pub fn status(&self) -> PostStatus {
        self.status
    }

    pub fn posts(&self) -> &[ScheduledPost] {
        &self.posts
    }

    pub async fn reload(&mut self) -> AppResult<()> {
        let mut posts = self.api.get_scheduled_posts(Some(self.status)).await?;
        posts.sort_by_key(|post| post.scheduled_time);
        debug!("loaded {} {} posts", posts.len(), self.status);
        self.posts = posts;
        Ok(())
    }

    pub async fn switch_to(&mut self, status: PostStatus) -> AppResult<()> {
        self.status = status;
        self.reload().await
    }

    pub async fn create(
        &mut self,
        post: &NewScheduledPost,
        now: DateTime<Utc>,
    ) -> AppResult<ScheduledPost> {
        validate_schedule_time(post.scheduled_time, now)?;
        if post.content.trim().is_empty() {
            return Err(AppError::Validation("Post content cannot be empty".to_string()));
        }

        let created = self.api.create_scheduled_post(post).await?;
        info!("scheduled post {} for {}", created.id, created.scheduled_time);
        self.reload().await?;
        Ok(created)
    }

    pub async fn update(
        &mut self,
        id: i64,
        changeset: &ScheduledPostChangeset,
        now: DateTime<Utc>,
    ) -> AppResult<ScheduledPost> {
        let current = self.find_or_fetch(id).await?;
        ensure_editable(&current)?;
        if let Some(scheduled_time) = changeset.scheduled_time {
            validate_schedule_time(scheduled_time, now)?;
        }
        if changeset.is_empty() {
            return Ok(current);
        }

        let updated = self.api.update_scheduled_post(id, changeset).await?;
        info!("updated scheduled post {}", id);
        self.reload().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        let current = self.find_or_fetch(id).await?;
        ensure_editable(&current)?;

        self.api.delete_scheduled_post(id).await?;
        info!("deleted scheduled post {}", id);
        self.reload().await
    }

    async fn find_or_fetch(&self, id: i64) -> AppResult<ScheduledPost> {
        match self.posts.iter().find(|post| post.id == id) {
            Some(post) => Ok(post.clone()),
            None => self.api.get_scheduled_post(id).await,
        }
    }
}
