//! Game record assembly on top of the external rules engine.
//!
//! A `Record` owns one evolving `shogi::Position` for the duration of a
//! decode. Move descriptors are applied one at a time in source order;
//! legality is the engine's call (`make_move` re-validates every move),
//! this module only rejects structurally malformed descriptors. Any
//! failure aborts the whole decode: move N's legality depends on moves
//! 1..N-1 having been applied correctly, so there is no partial output.

use std::collections::BTreeMap;
use std::sync::Once;

use shogi::bitboard::Factory;
use shogi::{Color, Move, PieceType, Position, Square};

use crate::error::DecodeError;
use crate::jkf::{csa_piece, Coord, Initial, Jkf, JkfMove, MoveElement, MoveTime, TimeSpan};

/// SFEN for the standard (hirate) starting layout. Handicap layouts are
/// rejected before a `Record` is ever constructed.
pub const STANDARD_SFEN: &str =
    "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// JKF preset identifier for the standard layout.
pub const PRESET_HIRATE: &str = "HIRATE";

/// The canonical resignation literal used by every upstream source.
pub const RESIGN_LITERAL: &str = "投了";

/// JKF special-move marker for resignation (CSA vocabulary).
pub const SPECIAL_TORYO: &str = "TORYO";

static ENGINE_INIT: Once = Once::new();

fn init_engine() {
    ENGINE_INIT.call_once(Factory::init);
}

/// Standard metadata fields, keyed by their Japanese JKF header names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetadataKey {
    Title,
    Date,
    StartDatetime,
    EndDatetime,
    TimeLimit,
    BlackTimeLimit,
    WhiteTimeLimit,
    Tournament,
    Strategy,
    Place,
    Length,
    BlackName,
    WhiteName,
}

impl MetadataKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataKey::Title => "表題",
            MetadataKey::Date => "対局日",
            MetadataKey::StartDatetime => "開始日時",
            MetadataKey::EndDatetime => "終了日時",
            MetadataKey::TimeLimit => "持ち時間",
            MetadataKey::BlackTimeLimit => "先手の持時間",
            MetadataKey::WhiteTimeLimit => "後手の持時間",
            MetadataKey::Tournament => "棋戦",
            MetadataKey::Strategy => "戦型",
            MetadataKey::Place => "場所",
            MetadataKey::Length => "手数",
            MetadataKey::BlackName => "先手",
            MetadataKey::WhiteName => "後手",
        }
    }
}

/// Where a move starts: a board square, or a piece dropped from hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Square(Square),
    Hand(PieceType),
}

/// One sparse upstream move, already lifted out of its source encoding.
/// The two variants make the null-coordinate sentinels of the wire
/// formats explicit: an absent destination is a special move, an absent
/// or out-of-range origin is a drop.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveDescriptor {
    Board {
        origin: Origin,
        to: Square,
        /// Explicit post-hoc flag from the source; never inferred.
        promote: bool,
        elapsed_ms: u64,
    },
    Special { text: String, elapsed_ms: u64 },
}

/// A move as applied to the running position.
#[derive(Debug, Clone)]
pub struct AppliedMove {
    pub color: Color,
    pub piece: PieceType,
    pub from: Option<Square>,
    pub to: Square,
    pub capture: Option<PieceType>,
    pub promote: bool,
    pub elapsed_ms: u64,
}

/// Terminal marker closing a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMove {
    Resign { elapsed_ms: u64 },
}

/// An append-only move sequence plus header metadata, owned by one
/// decoding session. Never mutated after serialization.
pub struct Record {
    position: Position,
    moves: Vec<AppliedMove>,
    special: Option<SpecialMove>,
    metadata: BTreeMap<MetadataKey, String>,
}

impl Record {
    /// Start a record from the standard layout.
    pub fn standard() -> Result<Self, DecodeError> {
        init_engine();
        let mut position = Position::new();
        position
            .set_sfen(STANDARD_SFEN)
            .map_err(|e| DecodeError::Sfen(e.to_string()))?;
        Ok(Record {
            position,
            moves: Vec::new(),
            special: None,
            metadata: BTreeMap::new(),
        })
    }

    /// Number of applied board moves. The terminal marker does not count:
    /// a 134-move game that ends in resignation has length 134.
    pub fn length(&self) -> usize {
        self.moves.len()
    }

    /// True once a terminal special move has been appended; no further
    /// descriptors may be applied.
    pub fn is_finished(&self) -> bool {
        self.special.is_some()
    }

    pub fn moves(&self) -> &[AppliedMove] {
        &self.moves
    }

    pub fn set_metadata(&mut self, key: MetadataKey, value: impl Into<String>) {
        self.metadata.insert(key, value.into());
    }

    pub fn metadata(&self, key: MetadataKey) -> Option<&str> {
        self.metadata.get(&key).map(String::as_str)
    }

    /// Apply one descriptor to the running position.
    ///
    /// Special moves other than resignation, unknown piece codes and
    /// engine-rejected moves are all hard failures carrying the attempted
    /// origin/destination for diagnostics.
    pub fn apply(&mut self, descriptor: &MoveDescriptor) -> Result<(), DecodeError> {
        if self.is_finished() {
            return Err(DecodeError::MoveAfterTerminal);
        }
        match descriptor {
            MoveDescriptor::Special { text, elapsed_ms } => {
                if text != RESIGN_LITERAL {
                    return Err(DecodeError::UnknownSpecialMove(text.clone()));
                }
                self.special = Some(SpecialMove::Resign {
                    elapsed_ms: *elapsed_ms,
                });
                Ok(())
            }
            MoveDescriptor::Board {
                origin,
                to,
                promote,
                elapsed_ms,
            } => {
                let color = self.position.side_to_move();
                let (mv, piece, from, capture) = match *origin {
                    Origin::Square(from) => {
                        let piece = self
                            .position
                            .piece_at(from)
                            .as_ref()
                            .copied()
                            .filter(|p| p.color == color)
                            .ok_or_else(|| DecodeError::MoveConstruction {
                                from: from.to_string(),
                                to: to.to_string(),
                            })?;
                        let capture = self
                            .position
                            .piece_at(*to)
                            .as_ref()
                            .map(|p| p.piece_type);
                        let mv = Move::Normal {
                            from,
                            to: *to,
                            promote: *promote,
                        };
                        (mv, piece.piece_type, Some(from), capture)
                    }
                    Origin::Hand(piece_type) => {
                        let mv = Move::Drop {
                            to: *to,
                            piece_type,
                        };
                        (mv, piece_type, None, None)
                    }
                };
                let ply = self.moves.len() + 1;
                self.position
                    .make_move(mv)
                    .map_err(|source| DecodeError::IllegalMove {
                        ply,
                        from: from
                            .map(|sq| sq.to_string())
                            .unwrap_or_else(|| csa_piece(piece).to_string()),
                        to: to.to_string(),
                        source,
                    })?;
                self.moves.push(AppliedMove {
                    color,
                    piece,
                    from,
                    to: *to,
                    capture,
                    promote: *promote,
                    elapsed_ms: *elapsed_ms,
                });
                Ok(())
            }
        }
    }

    /// Serialize to the canonical interchange structure. `moves[0]` is the
    /// initial position; cumulative clock totals are tracked per side.
    pub fn to_jkf(&self) -> Jkf {
        let mut moves = Vec::with_capacity(self.moves.len() + 2);
        moves.push(MoveElement::default());
        let mut totals_ms = [0u64; 2];
        for m in &self.moves {
            let side = color_code(m.color) as usize;
            totals_ms[side] += m.elapsed_ms;
            moves.push(MoveElement {
                time: Some(move_time(m.elapsed_ms, totals_ms[side])),
                mv: Some(JkfMove {
                    color: color_code(m.color),
                    piece: csa_piece(m.piece).to_string(),
                    to: coord(m.to),
                    from: m.from.map(coord),
                    capture: m.capture.map(|p| csa_piece(p).to_string()),
                    promote: m.promote.then_some(true),
                }),
                special: None,
            });
        }
        if let Some(SpecialMove::Resign { elapsed_ms }) = self.special {
            let side = color_code(self.position.side_to_move()) as usize;
            totals_ms[side] += elapsed_ms;
            moves.push(MoveElement {
                time: Some(move_time(elapsed_ms, totals_ms[side])),
                mv: None,
                special: Some(SPECIAL_TORYO.to_string()),
            });
        }
        Jkf {
            header: self
                .metadata
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.clone()))
                .collect(),
            initial: Initial {
                preset: PRESET_HIRATE.to_string(),
            },
            moves,
        }
    }
}

fn color_code(color: Color) -> u8 {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

fn coord(sq: Square) -> Coord {
    Coord {
        x: sq.file() + 1,
        y: sq.rank() + 1,
    }
}

fn move_time(elapsed_ms: u64, total_ms: u64) -> MoveTime {
    MoveTime {
        now: span(elapsed_ms, false),
        total: span(total_ms, true),
    }
}

fn span(ms: u64, always_hours: bool) -> TimeSpan {
    let secs = ms / 1000;
    let h = (secs / 3600) as u32;
    TimeSpan {
        h: (always_hours || h > 0).then_some(h),
        m: ((secs % 3600) / 60) as u32,
        s: (secs % 60) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file - 1, rank - 1).unwrap()
    }

    fn board(origin: Origin, to: Square, promote: bool) -> MoveDescriptor {
        MoveDescriptor::Board {
            origin,
            to,
            promote,
            elapsed_ms: 1000,
        }
    }

    #[test]
    fn applies_opening_moves() {
        let mut record = Record::standard().unwrap();
        record
            .apply(&board(Origin::Square(sq(7, 7)), sq(7, 6), false))
            .unwrap();
        record
            .apply(&board(Origin::Square(sq(3, 3)), sq(3, 4), false))
            .unwrap();
        assert_eq!(record.length(), 2);
        let jkf = record.to_jkf();
        assert_eq!(jkf.moves.len(), 3);
        let first = jkf.moves[1].mv.as_ref().unwrap();
        assert_eq!(first.color, 0);
        assert_eq!(first.piece, "FU");
        assert_eq!(first.to, Coord { x: 7, y: 6 });
        assert_eq!(first.from, Some(Coord { x: 7, y: 7 }));
    }

    #[test]
    fn records_capture_and_promotion() {
        let mut record = Record::standard().unwrap();
        record
            .apply(&board(Origin::Square(sq(7, 7)), sq(7, 6), false))
            .unwrap();
        record
            .apply(&board(Origin::Square(sq(3, 3)), sq(3, 4), false))
            .unwrap();
        // Bishop takes bishop on 2二, promoting.
        record
            .apply(&board(Origin::Square(sq(8, 8)), sq(2, 2), true))
            .unwrap();
        let jkf = record.to_jkf();
        let mv = jkf.moves[3].mv.as_ref().unwrap();
        assert_eq!(mv.piece, "KA");
        assert_eq!(mv.capture.as_deref(), Some("KA"));
        assert_eq!(mv.promote, Some(true));
    }

    #[test]
    fn applies_drop_from_hand() {
        let mut record = Record::standard().unwrap();
        record
            .apply(&board(Origin::Square(sq(7, 7)), sq(7, 6), false))
            .unwrap();
        record
            .apply(&board(Origin::Square(sq(3, 3)), sq(3, 4), false))
            .unwrap();
        record
            .apply(&board(Origin::Square(sq(8, 8)), sq(2, 2), true))
            .unwrap();
        record
            .apply(&board(Origin::Square(sq(3, 1)), sq(2, 2), false))
            .unwrap();
        // Black captured a bishop on move 3; drop it back.
        record
            .apply(&board(Origin::Hand(PieceType::Bishop), sq(4, 5), false))
            .unwrap();
        let jkf = record.to_jkf();
        let drop = jkf.moves[5].mv.as_ref().unwrap();
        assert_eq!(drop.piece, "KA");
        assert_eq!(drop.from, None);
        assert_eq!(drop.to, Coord { x: 4, y: 5 });
    }

    #[test]
    fn rejects_move_without_piece_at_origin() {
        let mut record = Record::standard().unwrap();
        let err = record
            .apply(&board(Origin::Square(sq(5, 5)), sq(5, 4), false))
            .unwrap_err();
        assert!(matches!(err, DecodeError::MoveConstruction { .. }));
    }

    #[test]
    fn rejects_illegal_move() {
        let mut record = Record::standard().unwrap();
        // A pawn cannot jump two squares.
        let err = record
            .apply(&board(Origin::Square(sq(7, 7)), sq(7, 4), false))
            .unwrap_err();
        assert!(matches!(err, DecodeError::IllegalMove { ply: 1, .. }));
        assert_eq!(record.length(), 0);
    }

    #[test]
    fn rejects_unknown_special_literal() {
        let mut record = Record::standard().unwrap();
        let err = record
            .apply(&MoveDescriptor::Special {
                text: "中断".to_string(),
                elapsed_ms: 0,
            })
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnknownSpecialMove(_)));
    }

    #[test]
    fn resignation_closes_the_record() {
        let mut record = Record::standard().unwrap();
        record
            .apply(&board(Origin::Square(sq(7, 7)), sq(7, 6), false))
            .unwrap();
        record
            .apply(&MoveDescriptor::Special {
                text: RESIGN_LITERAL.to_string(),
                elapsed_ms: 3000,
            })
            .unwrap();
        assert!(record.is_finished());
        let err = record
            .apply(&board(Origin::Square(sq(2, 7)), sq(2, 6), false))
            .unwrap_err();
        assert!(matches!(err, DecodeError::MoveAfterTerminal));

        let jkf = record.to_jkf();
        assert_eq!(jkf.moves.last().unwrap().special.as_deref(), Some("TORYO"));
        // Length counts board moves only.
        assert_eq!(record.length(), 1);
        assert_eq!(jkf.move_count(), 1);
    }

    #[test]
    fn clock_totals_accumulate_per_side() {
        let mut record = Record::standard().unwrap();
        record
            .apply(&MoveDescriptor::Board {
                origin: Origin::Square(sq(7, 7)),
                to: sq(7, 6),
                promote: false,
                elapsed_ms: 61_000,
            })
            .unwrap();
        record
            .apply(&MoveDescriptor::Board {
                origin: Origin::Square(sq(3, 3)),
                to: sq(3, 4),
                promote: false,
                elapsed_ms: 5_000,
            })
            .unwrap();
        record
            .apply(&MoveDescriptor::Board {
                origin: Origin::Square(sq(2, 7)),
                to: sq(2, 6),
                promote: false,
                elapsed_ms: 60_000,
            })
            .unwrap();
        let jkf = record.to_jkf();
        let t1 = jkf.moves[1].time.as_ref().unwrap();
        assert_eq!((t1.now.m, t1.now.s), (1, 1));
        assert_eq!(t1.now.h, None);
        let t3 = jkf.moves[3].time.as_ref().unwrap();
        assert_eq!(t3.total, TimeSpan { h: Some(0), m: 2, s: 1 });
    }
}
