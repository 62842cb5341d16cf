use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{ListEnvelope, PlatformAccount, TelegramConnectRequest, TelegramSendRequest},
};

#[async_trait]
pub trait TelegramApi {
    async fn get_accounts(&self) -> AppResult<Vec<PlatformAccount>>;
    async fn connect(&self, request: &TelegramConnectRequest) -> AppResult<PlatformAccount>;
    async fn delete_account(&self, account_id: i64) -> AppResult<()>;
    async fn send_message(&self, account_id: i64, chat_id: &str, message: &str) -> AppResult<()>;
}

#[async_trait]
impl TelegramApi for ApiClient {
    async fn get_accounts(&self) -> AppResult<Vec<PlatformAccount>> {
        let accounts: ListEnvelope<PlatformAccount> = self.get("/telegram/accounts", &[]).await?;
        Ok(accounts.into_vec())
    }

    async fn connect(&self, request: &TelegramConnectRequest) -> AppResult<PlatformAccount> {
        self.send_json(Method::POST, "/telegram/accounts", request).await
    }

    async fn delete_account(&self, account_id: i64) -> AppResult<()> {
        self.delete(&format!("/telegram/accounts/{account_id}")).await
    }

    async fn send_message(&self, account_id: i64, chat_id: &str, message: &str) -> AppResult<()> {
        let request = TelegramSendRequest {
            chat_id: chat_id.to_string(),
            message: message.to_string(),
        };
        self.send_json_unit(
            Method::POST,
            &format!("/telegram/accounts/{account_id}/send"),
            &request,
        )
        .await
    }
}
