use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{
        ListEnvelope, NewSubmission, ReviewRequest, Submission, SubmissionChangeset,
        SubmissionStatus,
    },
};

#[async_trait]
pub trait SubmissionApi {
    async fn get_submissions(&self, status: Option<SubmissionStatus>) -> AppResult<Vec<Submission>>;
    async fn get_submission(&self, id: i64) -> AppResult<Submission>;
    async fn create_submission(&self, submission: &NewSubmission) -> AppResult<Submission>;
    async fn update_submission(
        &self,
        id: i64,
        changeset: &SubmissionChangeset,
    ) -> AppResult<Submission>;
    async fn review_submission(&self, id: i64, review: &ReviewRequest) -> AppResult<Submission>;
}

#[async_trait]
impl SubmissionApi for ApiClient {
    async fn get_submissions(&self, status: Option<SubmissionStatus>) -> AppResult<Vec<Submission>> {
        let query: Vec<(&str, String)> = status
            .map(|status| vec![("status", status.as_str().to_string())])
            .unwrap_or_default();
        let submissions: ListEnvelope<Submission> = self.get("/submissions", &query).await?;
        Ok(submissions.into_vec())
    }

    async fn get_submission(&self, id: i64) -> AppResult<Submission> {
        self.get(&format!("/submissions/{id}"), &[]).await
    }

    async fn create_submission(&self, submission: &NewSubmission) -> AppResult<Submission> {
        self.send_json(Method::POST, "/submissions", submission).await
    }

    async fn update_submission(
        &self,
        id: i64,
        changeset: &SubmissionChangeset,
    ) -> AppResult<Submission> {
        self.send_json(Method::PUT, &format!("/submissions/{id}"), changeset)
            .await
    }

    async fn review_submission(&self, id: i64, review: &ReviewRequest) -> AppResult<Submission> {
        self.send_json(Method::POST, &format!("/submissions/{id}/review"), review)
            .await
    }
}
