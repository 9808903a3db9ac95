use std::env;

/// Explicit per-upstream configuration: base URL plus basic-auth
/// credentials. Passed to a client at construction, never ambient.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mobile: UpstreamConfig,
    pub ai: UpstreamConfig,
    pub meijin_list: UpstreamConfig,
    /// Host serving the paid per-game KIF downloads.
    pub meijin_kif_base_url: String,
    /// Session cookie for the paid KIF host.
    pub meijin_session: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mobile: UpstreamConfig {
                base_url: env::var("JSA_MOBILE_BASE_URL")
                    .unwrap_or_else(|_| "https://ip.jsamobile.jp".to_string()),
                username: env::var("JSA_MOBILE_USERNAME").expect("JSA_MOBILE_USERNAME must be set"),
                password: env::var("JSA_MOBILE_PASSWORD").expect("JSA_MOBILE_PASSWORD must be set"),
            },
            ai: UpstreamConfig {
                base_url: env::var("JSA_AI_BASE_URL")
                    .unwrap_or_else(|_| "https://d2pngvm764jm.cloudfront.net".to_string()),
                username: env::var("JSA_AI_USERNAME").expect("JSA_AI_USERNAME must be set"),
                password: env::var("JSA_AI_PASSWORD").expect("JSA_AI_PASSWORD must be set"),
            },
            meijin_list: UpstreamConfig {
                base_url: env::var("JSA_MEIJIN_BASE_URL")
                    .unwrap_or_else(|_| "https://d31j6ipzjd5eeo.cloudfront.net".to_string()),
                username: env::var("JSA_MEIJIN_USERNAME").expect("JSA_MEIJIN_USERNAME must be set"),
                password: env::var("JSA_MEIJIN_PASSWORD").expect("JSA_MEIJIN_PASSWORD must be set"),
            },
            meijin_kif_base_url: env::var("MEIJIN_KIF_BASE_URL")
                .unwrap_or_else(|_| "https://member.meijinsen.jp".to_string()),
            meijin_session: env::var("MEIJIN_SESSION").expect("MEIJIN_SESSION must be set"),
        }
    }
}
