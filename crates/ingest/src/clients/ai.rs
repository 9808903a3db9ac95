use reqwest::Client;

use kifu_core::ai::{self, GameIdEntry};
use kifu_core::Jkf;

use crate::config::UpstreamConfig;
use crate::error::IngestError;

/// Client for the AI auto-transcription feed (CloudFront, basic auth).
pub struct AiClient {
    client: Client,
    config: UpstreamConfig,
}

impl AiClient {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        Self { client, config }
    }

    /// Fetch and parse the newline-delimited game-id list.
    pub async fn fetch_game_list(&self) -> Result<Vec<GameIdEntry>, IngestError> {
        let url = format!("{}/ai/ai_game_list.txt", self.config.base_url);
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(IngestError::Status {
                status: resp.status(),
                url,
            });
        }
        let text = resp.text().await?;
        Ok(ai::parse_game_id_list(&text))
    }

    /// Fetch one game's JSON payload and decode it to JKF.
    pub async fn fetch_game(&self, game_id: i64) -> Result<Jkf, IngestError> {
        let url = format!("{}/ai/{}.json", self.config.base_url, game_id);
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(IngestError::Status {
                status: resp.status(),
                url,
            });
        }
        let text = resp.text().await?;
        Ok(ai::decode_game_json(&text)?)
    }
}
