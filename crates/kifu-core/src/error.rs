use shogi::error::MoveError;

/// Failure taxonomy for a single-game decode.
///
/// Every variant except a classifier miss (which is not an error) is fatal
/// for the enclosing game: no partial record is ever produced. The batch
/// layer decides whether to skip-and-continue or abort.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unrecognized special move {0:?}")]
    UnknownSpecialMove(String),

    #[error("unknown piece type code {0:?}")]
    UnknownPieceCode(String),

    #[error("square out of range: file {file}, rank {rank}")]
    SquareOutOfRange { file: i64, rank: i64 },

    #[error("no move could be constructed from {from} to {to}")]
    MoveConstruction { from: String, to: String },

    #[error("illegal move at ply {ply} ({from} -> {to}): {source}")]
    IllegalMove {
        ply: usize,
        from: String,
        to: String,
        source: MoveError,
    },

    #[error("move descriptor after terminal special move")]
    MoveAfterTerminal,

    #[error("invalid date format: {0:?}")]
    InvalidDate(String),

    #[error("missing required field {0:?}")]
    MissingField(&'static str),

    #[error("invalid integer in field {field:?}: {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("unsupported handicap {0:?}: only the standard layout is supported")]
    UnsupportedHandicap(String),

    #[error("invalid SFEN: {0}")]
    Sfen(String),

    #[error("empty upstream payload")]
    EmptyPayload,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
