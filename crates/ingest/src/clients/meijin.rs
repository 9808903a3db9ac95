use chrono::{Datelike, NaiveDate};
use encoding_rs::SHIFT_JIS;
use reqwest::Client;

use kifu_core::meijin::{self, MeijinGame};

use crate::config::UpstreamConfig;
use crate::error::IngestError;

/// Meijin league class segment in the paid KIF path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueRank {
    /// Title match (七番勝負).
    Match7,
    A,
    B1,
    B2,
    C1,
    C2,
}

impl LeagueRank {
    pub fn as_str(self) -> &'static str {
        match self {
            LeagueRank::Match7 => "M7",
            LeagueRank::A => "A",
            LeagueRank::B1 => "B1",
            LeagueRank::B2 => "B2",
            LeagueRank::C1 => "C1",
            LeagueRank::C2 => "C2",
        }
    }
}

/// Client for the Meijin paid feed. Both endpoints serve Shift-JIS; the
/// bytes are transcoded to UTF-8 here so the decoding core only ever
/// sees Unicode text.
pub struct MeijinClient {
    client: Client,
    list: UpstreamConfig,
    kif_base_url: String,
    session: String,
}

impl MeijinClient {
    pub fn new(list: UpstreamConfig, kif_base_url: String, session: String) -> Self {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        Self {
            client,
            list,
            kif_base_url,
            session,
        }
    }

    /// Fetch and parse the full game list.
    pub async fn fetch_game_list(&self) -> Result<Vec<MeijinGame>, IngestError> {
        let url = format!("{}/list/meijin_all_game_list.txt", self.list.base_url);
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.list.username, Some(&self.list.password))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(IngestError::Status {
                status: resp.status(),
                url,
            });
        }
        let bytes = resp.bytes().await?;
        Ok(meijin::parse_blocks(&decode_shift_jis(&bytes))?)
    }

    /// Fetch one game's KIF text, addressed by date, league rank and
    /// meijin id. Feeding the text to the KIF parser and refreshing its
    /// header (`kifu_core::meijin::apply_header`) is the caller's step.
    pub async fn fetch_kif(
        &self,
        meijin_id: i64,
        date: NaiveDate,
        rank: LeagueRank,
    ) -> Result<String, IngestError> {
        let url = format!(
            "{}/pay/kif/meijinsen/{:04}/{:02}/{:02}/{}/{}.txt",
            self.kif_base_url,
            date.year(),
            date.month(),
            date.day(),
            rank.as_str(),
            meijin_id,
        );
        let resp = self
            .client
            .get(&url)
            .header("Cookie", format!("kisen_session={}", self.session))
            .header("Accept-Language", "ja")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(IngestError::Status {
                status: resp.status(),
                url,
            });
        }
        let bytes = resp.bytes().await?;
        Ok(decode_shift_jis(&bytes))
    }
}

fn decode_shift_jis(bytes: &[u8]) -> String {
    let (text, _, _) = SHIFT_JIS.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_shift_jis_bytes() {
        // "名人戦" in Shift-JIS.
        let bytes = [0x96, 0xBC, 0x90, 0x6C, 0x90, 0xED];
        assert_eq!(decode_shift_jis(&bytes), "名人戦");
    }

    #[test]
    fn rank_path_segments() {
        assert_eq!(LeagueRank::Match7.as_str(), "M7");
        assert_eq!(LeagueRank::B1.as_str(), "B1");
    }
}
