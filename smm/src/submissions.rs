use log::{info, warn};

use crate::{
    api::{submissions::SubmissionApi, twitter::TwitterApi},
    error::{AppError, AppResult},
    models::{Platform, ReviewRequest, Submission, SubmissionChangeset, Tweet},
};

#[derive(Debug)]
pub struct ApprovalOutcome {
    pub review: AppResult<Submission>,
    /// `None` when the platform has no immediate post step.
    pub post: Option<AppResult<Tweet>>,
}

impl ApprovalOutcome {
    pub fn reviewed(&self) -> bool {
        self.review.is_ok()
    }

    pub fn posted(&self) -> bool {
        matches!(self.post, Some(Ok(_)))
    }

    /// Exactly one of the two steps went through.
    pub fn is_partial(&self) -> bool {
        match &self.post {
            Some(post) => self.review.is_ok() != post.is_ok(),
            None => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.review.is_ok() && self.post.as_ref().is_none_or(|post| post.is_ok())
    }
}

pub fn ensure_pending(submission: &Submission) -> AppResult<()> {
    if !submission.is_pending() {
        return Err(AppError::Immutable(format!(
            "Submission {} was already {}",
            submission.id, submission.status
        )));
    }
    Ok(())
}

/// Approves `submission` and, for Twitter, posts it from `twitter_account_id`.
pub async fn approve_submission<S, T>(
    submissions: &S,
    twitter: &T,
    submission: &Submission,
    twitter_account_id: Option<i64>,
) -> AppResult<ApprovalOutcome>
where
    S: SubmissionApi + ?Sized,
    T: TwitterApi + ?Sized,
{
    ensure_pending(submission)?;

    let review = submissions
        .review_submission(submission.id, &ReviewRequest::approve())
        .await;
    match &review {
        Ok(_) => info!("approved submission {}", submission.id),
        Err(e) => warn!("recording approval of submission {} failed: {}", submission.id, e),
    }

    if submission.platform != Platform::Twitter {
        return Ok(ApprovalOutcome { review, post: None });
    }

    let post = match twitter_account_id {
        Some(account_id) => twitter.post_tweet(account_id, &submission.content).await,
        None => Err(AppError::Validation(
            "No Twitter account connected to post the approved submission".to_string(),
        )),
    };
    match &post {
        Ok(_) => info!("posted submission {} to Twitter", submission.id),
        Err(e) => warn!("posting submission {} to Twitter failed: {}", submission.id, e),
    }

    Ok(ApprovalOutcome {
        review,
        post: Some(post),
    })
}

pub async fn reject_submission<S>(
    submissions: &S,
    submission: &Submission,
    reason: Option<String>,
) -> AppResult<Submission>
where
    S: SubmissionApi + ?Sized,
{
    ensure_pending(submission)?;

    let rejected = submissions
        .review_submission(submission.id, &ReviewRequest::reject(reason))
        .await?;
    info!("rejected submission {}", submission.id);
    Ok(rejected)
}

pub async fn update_submission<S>(
    submissions: &S,
    submission: &Submission,
    changeset: &SubmissionChangeset,
) -> AppResult<Submission>
where
    S: SubmissionApi + ?Sized,
{
    ensure_pending(submission)?;

    let updated = submissions
        .update_submission(submission.id, changeset)
        .await?;
    info!("updated submission {}", submission.id);
    Ok(updated)
}
