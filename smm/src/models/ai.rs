use serde::{Deserialize, Serialize};

use super::Platform;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    pub platform: Platform,
    pub max_length: u32,
}

impl GenerateRequest {
    pub fn new(prompt: String, platform: Platform) -> Self {
        Self {
            prompt,
            platform,
            max_length: default_max_length(platform),
        }
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }
}

/// Longest message each platform accepts.
pub fn default_max_length(platform: Platform) -> u32 {
    match platform {
        Platform::Twitter => 280,
        Platform::Discord => 2000,
        Platform::Telegram => 4096,
    }
}

#[derive(Debug, Deserialize)]
pub struct GeneratedContent {
    #[serde(alias = "text", alias = "generatedText")]
    pub content: String,
}
