use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{ListEnvelope, NewScheduledPost, PostStatus, ScheduledPost, ScheduledPostChangeset},
};

/// CRUD over the backend scheduler. Execution and status transitions happen
/// server-side.
#[async_trait]
pub trait ScheduleApi {
    async fn get_scheduled_posts(&self, status: Option<PostStatus>) -> AppResult<Vec<ScheduledPost>>;
    async fn get_scheduled_post(&self, id: i64) -> AppResult<ScheduledPost>;
    async fn create_scheduled_post(&self, post: &NewScheduledPost) -> AppResult<ScheduledPost>;
    async fn update_scheduled_post(
        &self,
        id: i64,
        changeset: &ScheduledPostChangeset,
    ) -> AppResult<ScheduledPost>;
    async fn delete_scheduled_post(&self, id: i64) -> AppResult<()>;
}

#[async_trait]
impl ScheduleApi for ApiClient {
    async fn get_scheduled_posts(&self, status: Option<PostStatus>) -> AppResult<Vec<ScheduledPost>> {
        let query: Vec<(&str, String)> = status
            .map(|status| vec![("status", status.as_str().to_string())])
            .unwrap_or_default();
        let posts: ListEnvelope<ScheduledPost> = self.get("/schedule", &query).await?;
        Ok(posts.into_vec())
    }

    async fn get_scheduled_post(&self, id: i64) -> AppResult<ScheduledPost> {
        self.get(&format!("/schedule/{id}"), &[]).await
    }

    async fn create_scheduled_post(&self, post: &NewScheduledPost) -> AppResult<ScheduledPost> {
        self.send_json(Method::POST, "/schedule", post).await
    }

    async fn update_scheduled_post(
        &self,
        id: i64,
        changeset: &ScheduledPostChangeset,
    ) -> AppResult<ScheduledPost> {
        self.send_json(Method::PUT, &format!("/schedule/{id}"), changeset)
            .await
    }

    async fn delete_scheduled_post(&self, id: i64) -> AppResult<()> {
        self.delete(&format!("/schedule/{id}")).await
    }
}
