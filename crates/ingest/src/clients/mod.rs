pub mod ai;
pub mod meijin;
pub mod mobile;

/// All upstreams expect the mobile app's user agent.
pub(crate) const USER_AGENT: &str = "JsaLive/2 CFNetwork/3826.600.41 Darwin/24.6.0";
