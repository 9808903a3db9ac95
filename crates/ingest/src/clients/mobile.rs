use reqwest::Client;

use crate::config::UpstreamConfig;
use crate::error::IngestError;

/// Client for the mobile-live API. Game payloads are the proprietary JSA
/// binary format; decoding them is the JSA-decoder collaborator's job, so
/// this client hands back raw bytes.
pub struct MobileClient {
    client: Client,
    config: UpstreamConfig,
}

impl MobileClient {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        Self { client, config }
    }

    /// Fetch a page of the game-list search (binary list payload).
    pub async fn fetch_search_list(
        &self,
        offset: u32,
        limit: u32,
        finished: u32,
    ) -> Result<Vec<u8>, IngestError> {
        self.fetch("search", offset.into(), limit, finished).await
    }

    /// Fetch one game's binary record.
    pub async fn fetch_game_binary(&self, game_id: i64) -> Result<Vec<u8>, IngestError> {
        self.fetch("shogi", game_id, 0, 0).await
    }

    async fn fetch(
        &self,
        action: &str,
        p1: i64,
        p2: u32,
        p3: u32,
    ) -> Result<Vec<u8>, IngestError> {
        let url = format!("{}/api/index.php", self.config.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("action", action.to_string()),
                ("p1", p1.to_string()),
                ("p2", p2.to_string()),
                ("p3", p3.to_string()),
            ])
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Accept-Language", "ja")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(IngestError::Status {
                status: resp.status(),
                url,
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
