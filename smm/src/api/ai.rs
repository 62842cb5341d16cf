use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{GenerateRequest, GeneratedContent},
};

#[async_trait]
pub trait AiApi {
    async fn generate(&self, request: &GenerateRequest) -> AppResult<GeneratedContent>;
}

#[async_trait]
impl AiApi for ApiClient {
    async fn generate(&self, request: &GenerateRequest) -> AppResult<GeneratedContent> {
        self.send_json(Method::POST, "/ai/generate", request).await
    }
}
