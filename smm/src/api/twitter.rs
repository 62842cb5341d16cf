use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{
        ListEnvelope, PlatformAccount, PostTweetRequest, TimeRange, Tweet, TwitterAnalytics,
        TwitterConnectRequest,
    },
};

#[async_trait]
pub trait TwitterApi {
    async fn get_accounts(&self) -> AppResult<Vec<PlatformAccount>>;
    async fn connect(&self, request: &TwitterConnectRequest) -> AppResult<PlatformAccount>;
    async fn delete_account(&self, account_id: i64) -> AppResult<()>;
    async fn post_tweet(&self, account_id: i64, content: &str) -> AppResult<Tweet>;
    async fn get_timeline(&self, account_id: i64, count: u32) -> AppResult<Vec<Tweet>>;
    async fn get_analytics(&self, account_id: i64, time_range: TimeRange)
        -> AppResult<TwitterAnalytics>;
}

#[async_trait]
impl TwitterApi for ApiClient {
    async fn get_accounts(&self) -> AppResult<Vec<PlatformAccount>> {
        let accounts: ListEnvelope<PlatformAccount> = self.get("/twitter/accounts", &[]).await?;
        Ok(accounts.into_vec())
    }

    async fn connect(&self, request: &TwitterConnectRequest) -> AppResult<PlatformAccount> {
        self.send_json(Method::POST, "/twitter/accounts", request).await
    }

    async fn delete_account(&self, account_id: i64) -> AppResult<()> {
        self.delete(&format!("/twitter/accounts/{account_id}")).await
    }

    async fn post_tweet(&self, account_id: i64, content: &str) -> AppResult<Tweet> {
        let request = PostTweetRequest {
            content: content.to_string(),
        };
        let tweet: Option<Tweet> = self
            .send_json(
                Method::POST,
                &format!("/twitter/accounts/{account_id}/tweets"),
                &request,
            )
            .await?;
        Ok(tweet.unwrap_or_default())
    }

    async fn get_timeline(&self, account_id: i64, count: u32) -> AppResult<Vec<Tweet>> {
        let tweets: ListEnvelope<Tweet> = self
            .get(
                &format!("/twitter/accounts/{account_id}/timeline"),
                &[("count", count.to_string())],
            )
            .await?;
        Ok(tweets.into_vec())
    }

    async fn get_analytics(
        &self,
        account_id: i64,
        time_range: TimeRange,
    ) -> AppResult<TwitterAnalytics> {
        self.get(
            &format!("/twitter/accounts/{account_id}/analytics"),
            &[("timeRange", time_range.as_str().to_string())],
        )
        .await
    }
}
