//! Decoders for the AI auto-transcription feed: the newline-delimited
//! game-id list and the per-game JSON payload.

use serde::{Deserialize, Serialize};
use shogi::{PieceType, Square};

use crate::error::DecodeError;
use crate::jkf::Jkf;
use crate::metadata::{assemble, parse_datetime, SourceHeader};
use crate::record::{MoveDescriptor, Origin, Record};

/// The only supported starting layout.
pub const HANDICAP_STANDARD: &str = "平手";

/// Entry in the AI game-id list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameIdEntry {
    pub game_id: i64,
}

/// Parse the newline-delimited game-id list. Blank lines and `#` comment
/// lines are dropped, as is anything that is not a base-10 integer.
/// Order-preserving, no dedup.
pub fn parse_game_id_list(raw: &str) -> Vec<GameIdEntry> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.parse().ok())
        .map(|game_id| GameIdEntry { game_id })
        .collect()
}

/// One entry of the upstream `kif` array, verbatim. Null destination
/// coordinates signal a special move (disambiguated through `move_text`);
/// a null or out-of-range origin rank signals a drop from hand, with the
/// dropped piece named by `piece_code`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawKifEntry {
    pub num: i64,
    pub time: i64,
    #[serde(rename = "toX")]
    pub to_x: Option<i64>,
    #[serde(rename = "toY")]
    pub to_y: Option<i64>,
    #[serde(rename = "type")]
    pub piece_code: String,
    #[serde(rename = "frX")]
    pub fr_x: Option<i64>,
    #[serde(rename = "frY")]
    pub fr_y: Option<i64>,
    pub prmt: Option<i64>,
    pub spend: i64,
    #[serde(rename = "move")]
    pub move_text: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl RawKifEntry {
    /// Lift the sparse wire encoding into a typed descriptor. Fails on an
    /// unknown piece-type code or out-of-range coordinates; whether the
    /// described move is legal is decided later by the rules engine.
    pub fn to_descriptor(&self) -> Result<MoveDescriptor, DecodeError> {
        // Seconds to milliseconds, exact.
        let elapsed_ms = u64::try_from(self.spend.max(0)).unwrap_or(0) * 1000;
        let (to_x, to_y) = match (self.to_x, self.to_y) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Ok(MoveDescriptor::Special {
                    text: self.move_text.clone(),
                    elapsed_ms,
                })
            }
        };
        let to = square(to_x, to_y)?;
        let origin = match (self.fr_x, self.fr_y) {
            (Some(x), Some(y)) if (1..=9).contains(&y) => Origin::Square(square(x, y)?),
            _ => Origin::Hand(piece_from_code(&self.piece_code)?),
        };
        Ok(MoveDescriptor::Board {
            origin,
            to,
            promote: self.prmt == Some(1),
            elapsed_ms,
        })
    }
}

fn square(x: i64, y: i64) -> Result<Square, DecodeError> {
    if !(1..=9).contains(&x) || !(1..=9).contains(&y) {
        return Err(DecodeError::SquareOutOfRange { file: x, rank: y });
    }
    Square::new(x as u8 - 1, y as u8 - 1).ok_or(DecodeError::SquareOutOfRange { file: x, rank: y })
}

/// Captured-piece vocabulary of the AI feed.
fn piece_from_code(code: &str) -> Result<PieceType, DecodeError> {
    match code {
        "KYO" => Ok(PieceType::Lance),
        "KEI" => Ok(PieceType::Knight),
        "GIN" => Ok(PieceType::Silver),
        "KIN" => Ok(PieceType::Gold),
        "KAKU" => Ok(PieceType::Bishop),
        "HI" => Ok(PieceType::Rook),
        "FU" => Ok(PieceType::Pawn),
        other => Err(DecodeError::UnknownPieceCode(other.to_string())),
    }
}

/// One upstream AI game object, verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct AiGame {
    #[serde(rename = "_id")]
    pub id: String,
    pub modified_at: String,
    pub gametype: String,
    pub key: String,
    pub fname: String,
    pub event: String,
    pub player1: String,
    pub player2: String,
    pub side: String,
    pub place: String,
    pub starttime: String,
    pub realstarttime: f64,
    pub endtime: String,
    pub timelimit: String,
    pub countdown: String,
    pub spendtime_p1: String,
    pub spendtime_p2: String,
    pub delaytimes_p1: String,
    pub delaytimes_p2: String,
    pub delatetime_p1: String,
    pub delatetime_p2: String,
    pub lunchtime_start: String,
    pub lunchtime_end: String,
    pub dinnertime_start: String,
    pub dinnertime_end: String,
    pub stoptime_start: String,
    pub stoptime_end: String,
    pub recordman: String,
    pub judgeside: String,
    pub note: String,
    pub end_tesu: i64,
    pub end_mark: String,
    pub end_reason: String,
    pub end_side: String,
    #[serde(rename = "__v")]
    pub version: i64,
    #[serde(default)]
    pub dinnertime_end_2: String,
    #[serde(default)]
    pub dinnertime_start_2: String,
    pub handicap: String,
    #[serde(default)]
    pub lunchtime_end_2: String,
    #[serde(default)]
    pub lunchtime_start_2: String,
    #[serde(default)]
    pub modified_by: String,
    #[serde(default)]
    pub enddate: String,
    pub kif: Vec<RawKifEntry>,
}

/// Decode the array-wrapped upstream payload. The upstream always wraps
/// the game object in a single-element array.
pub fn decode_game_json(raw: &str) -> Result<Jkf, DecodeError> {
    let games: Vec<AiGame> = serde_json::from_str(raw)?;
    let game = games.first().ok_or(DecodeError::EmptyPayload)?;
    decode_game(game)
}

/// Decode one AI game into a canonical JKF record. All-or-nothing: a
/// malformed or illegal move anywhere fails the whole game.
///
/// The upstream labels player1/player2 opposite to some of its sibling
/// sources; here player1 is white (後手) and player2 is black (先手),
/// which is what the mobile-live decoder emits for the same games.
pub fn decode_game(game: &AiGame) -> Result<Jkf, DecodeError> {
    if game.handicap != HANDICAP_STANDARD {
        return Err(DecodeError::UnsupportedHandicap(game.handicap.clone()));
    }
    let mut record = Record::standard()?;
    for entry in &game.kif {
        record.apply(&entry.to_descriptor()?)?;
        if record.is_finished() {
            break;
        }
    }
    let start = parse_datetime(&game.starttime)?;
    let end = parse_datetime(&game.endtime)?;
    assemble(
        &mut record,
        &SourceHeader {
            event: &game.event,
            black_name: &game.player2,
            white_name: &game.player1,
            place: &game.place,
            start,
            end: Some(end),
            time_limit: &game.timelimit,
        },
    );
    Ok(record.to_jkf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_game_id_list() {
        let raw = "# updated 2025/08/28\n18440\n18441\n\n  18442  \nnot-a-number\n# trailing comment\n17361\n";
        let entries = parse_game_id_list(raw);
        assert_eq!(
            entries.iter().map(|e| e.game_id).collect::<Vec<_>>(),
            vec![18440, 18441, 18442, 17361]
        );
    }

    #[test]
    fn list_parse_keeps_order_and_duplicates() {
        let entries = parse_game_id_list("5\n3\n5\n");
        assert_eq!(
            entries.iter().map(|e| e.game_id).collect::<Vec<_>>(),
            vec![5, 3, 5]
        );
    }

    fn entry(json: serde_json::Value) -> RawKifEntry {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn null_destination_is_a_special_move() {
        let e = entry(serde_json::json!({
            "num": 135, "time": 0, "toX": null, "toY": null, "type": "",
            "frX": null, "frY": null, "prmt": null, "spend": 12,
            "move": "投了", "_id": "abc"
        }));
        match e.to_descriptor().unwrap() {
            MoveDescriptor::Special { text, elapsed_ms } => {
                assert_eq!(text, "投了");
                assert_eq!(elapsed_ms, 12_000);
            }
            other => panic!("unexpected descriptor: {other:?}"),
        }
    }

    #[test]
    fn sentinel_origin_rank_is_a_drop() {
        for fr_y in [serde_json::json!(0), serde_json::json!(10), serde_json::Value::Null] {
            let e = entry(serde_json::json!({
                "num": 11, "time": 0, "toX": 4, "toY": 5, "type": "KAKU",
                "frX": 0, "frY": fr_y, "prmt": 0, "spend": 3,
                "move": "４五角打", "_id": "abc"
            }));
            match e.to_descriptor().unwrap() {
                MoveDescriptor::Board { origin, .. } => {
                    assert_eq!(origin, Origin::Hand(PieceType::Bishop));
                }
                other => panic!("unexpected descriptor: {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_piece_code_fails() {
        let e = entry(serde_json::json!({
            "num": 11, "time": 0, "toX": 4, "toY": 5, "type": "XYZ",
            "frX": null, "frY": null, "prmt": 0, "spend": 3,
            "move": "?", "_id": "abc"
        }));
        assert!(matches!(
            e.to_descriptor().unwrap_err(),
            DecodeError::UnknownPieceCode(code) if code == "XYZ"
        ));
    }

    #[test]
    fn promotion_flag_comes_from_prmt() {
        let e = entry(serde_json::json!({
            "num": 5, "time": 0, "toX": 2, "toY": 2, "type": "KAKU",
            "frX": 8, "frY": 8, "prmt": 1, "spend": 40,
            "move": "２二角成", "_id": "abc"
        }));
        match e.to_descriptor().unwrap() {
            MoveDescriptor::Board { promote, .. } => assert!(promote),
            other => panic!("unexpected descriptor: {other:?}"),
        }
    }
}
