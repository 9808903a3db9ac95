//! JKF interchange structures: the canonical output contract shared by
//! all three upstream sources.
//!
//! The shape is `{ header, initial: { preset }, moves }` where `moves[0]`
//! is the initial position and each later element carries either a board
//! move or a terminal special marker, plus optional per-move clock data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shogi::PieceType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jkf {
    pub header: BTreeMap<String, String>,
    pub initial: Initial,
    pub moves: Vec<MoveElement>,
}

impl Jkf {
    /// Number of board-move elements (initial element and any terminal
    /// special marker excluded).
    pub fn move_count(&self) -> usize {
        self.moves.iter().filter(|m| m.mv.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initial {
    pub preset: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<MoveTime>,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub mv: Option<JkfMove>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

/// Elapsed time for one move (`now`) and the mover's cumulative total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTime {
    pub now: TimeSpan,
    pub total: TimeSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    pub m: u32,
    pub s: u32,
}

/// One board move. `color` is 0 for black (先手), 1 for white (後手);
/// pieces use the CSA two-letter vocabulary; a missing `from` means a
/// drop from hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JkfMove {
    pub color: u8,
    pub piece: String,
    pub to: Coord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promote: Option<bool>,
}

/// Board coordinate, file and rank both 1-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

/// CSA piece code for the JKF `piece`/`capture` fields.
pub fn csa_piece(pt: PieceType) -> &'static str {
    match pt {
        PieceType::Pawn => "FU",
        PieceType::Lance => "KY",
        PieceType::Knight => "KE",
        PieceType::Silver => "GI",
        PieceType::Gold => "KI",
        PieceType::Bishop => "KA",
        PieceType::Rook => "HI",
        PieceType::King => "OU",
        PieceType::ProPawn => "TO",
        PieceType::ProLance => "NY",
        PieceType::ProKnight => "NK",
        PieceType::ProSilver => "NG",
        PieceType::ProBishop => "UM",
        PieceType::ProRook => "RY",
    }
}
