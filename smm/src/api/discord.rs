use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{
        DiscordChannel, DiscordConnectRequest, DiscordMessage, DiscordSendRequest, DiscordServer,
        ListEnvelope, PlatformAccount,
    },
};

#[async_trait]
pub trait DiscordApi {
    async fn get_accounts(&self) -> AppResult<Vec<PlatformAccount>>;
    async fn connect(&self, request: &DiscordConnectRequest) -> AppResult<PlatformAccount>;
    async fn delete_account(&self, account_id: i64) -> AppResult<()>;
    async fn get_servers(&self) -> AppResult<Vec<DiscordServer>>;
    async fn get_channels(&self, server_id: &str) -> AppResult<Vec<DiscordChannel>>;
    async fn get_messages(&self, channel_id: &str, limit: Option<u32>)
        -> AppResult<Vec<DiscordMessage>>;
    async fn send_message(&self, channel_id: &str, content: &str) -> AppResult<DiscordMessage>;
}

#[async_trait]
impl DiscordApi for ApiClient {
    async fn get_accounts(&self) -> AppResult<Vec<PlatformAccount>> {
        let accounts: ListEnvelope<PlatformAccount> = self.get("/discord/accounts", &[]).await?;
        Ok(accounts.into_vec())
    }

    async fn connect(&self, request: &DiscordConnectRequest) -> AppResult<PlatformAccount> {
        self.send_json(Method::POST, "/discord/accounts", request).await
    }

    async fn delete_account(&self, account_id: i64) -> AppResult<()> {
        self.delete(&format!("/discord/accounts/{account_id}")).await
    }

    async fn get_servers(&self) -> AppResult<Vec<DiscordServer>> {
        let servers: ListEnvelope<DiscordServer> = self.get("/discord/servers", &[]).await?;
        Ok(servers.into_vec())
    }

    async fn get_channels(&self, server_id: &str) -> AppResult<Vec<DiscordChannel>> {
        let channels: ListEnvelope<DiscordChannel> = self
            .get(&format!("/discord/servers/{server_id}/channels"), &[])
            .await?;
        Ok(channels.into_vec())
    }

    async fn get_messages(
        &self,
        channel_id: &str,
        limit: Option<u32>,
    ) -> AppResult<Vec<DiscordMessage>> {
        let query: Vec<(&str, String)> = limit
            .map(|limit| vec![("limit", limit.to_string())])
            .unwrap_or_default();
        let messages: ListEnvelope<DiscordMessage> = self
            .get(&format!("/discord/channels/{channel_id}/messages"), &query)
            .await?;
        Ok(messages.into_vec())
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> AppResult<DiscordMessage> {
        let request = DiscordSendRequest {
            content: content.to_string(),
        };
        let message: Option<DiscordMessage> = self
            .send_json(
                Method::POST,
                &format!("/discord/channels/{channel_id}/messages"),
                &request,
            )
            .await?;
        Ok(message.unwrap_or_default())
    }
}
