#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Decode(#[from] kifu_core::DecodeError),
}
