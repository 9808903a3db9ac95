//! Parser for the Meijin paid feed: a flat `key=value` text blob split
//! into per-game blocks by a fixed delimiter line, plus the header
//! refresh applied to KIF downloads from the same feed.
//!
//! The transport layer hands this module UTF-8 text (the feed itself is
//! Shift-JIS on the wire).

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::DecodeError;
use crate::jkf::Jkf;
use crate::metadata::{parse_datetime, DATETIME_FORMAT, DATE_FORMAT};
use crate::normalize::normalize;
use crate::record::MetadataKey;
use crate::tournament::classify;

/// Line that separates game blocks in the list download.
pub const BLOCK_DELIMITER: &str = "/-----";

/// End-of-line comment marker inside a block.
const COMMENT_MARKER: &str = "//";

/// One game block from the Meijin list, fields coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct MeijinGame {
    pub game_id: i64,
    pub meijin_id: i64,
    pub tablet_id: Option<String>,
    pub kif_key: String,
    pub modified: i64,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub kisen: String,
    pub side: i64,
    pub sente: String,
    pub gote: String,
    pub family1: String,
    pub name1: String,
    pub title1: Option<String>,
    pub family2: String,
    pub name2: Option<String>,
    pub title2: Option<String>,
    pub senkei: Option<String>,
    pub result: i64,
    pub winner: i64,
    pub tesuu: i64,
    pub sente_score: Option<String>,
    pub gote_score: Option<String>,
}

/// Split the raw list text into blocks and coerce each into a
/// `MeijinGame`. The segment before the first delimiter is preamble and
/// is discarded, as is an empty trailing segment after the last
/// delimiter. Any malformed block fails the whole parse.
pub fn parse_blocks(raw: &str) -> Result<Vec<MeijinGame>, DecodeError> {
    let normalized = normalize(raw);
    let mut blocks: Vec<&str> = normalized.split(BLOCK_DELIMITER).map(str::trim).collect();
    blocks.remove(0);
    if blocks.last().is_some_and(|b| b.is_empty()) {
        blocks.pop();
    }
    blocks.into_iter().map(parse_block).collect()
}

fn parse_block(block: &str) -> Result<MeijinGame, DecodeError> {
    let fields = block_fields(block);
    Ok(MeijinGame {
        game_id: int_field(&fields, "game_id")?,
        meijin_id: int_field(&fields, "meijin_id")?,
        tablet_id: optional_field(&fields, "tablet_id"),
        kif_key: required_field(&fields, "kif_key")?.to_string(),
        modified: int_field(&fields, "modified")?,
        start_date: optional_date_field(&fields, "start_date")?,
        end_date: optional_date_field(&fields, "end_date")?,
        kisen: required_field(&fields, "kisen")?.to_string(),
        side: int_field(&fields, "side")?,
        sente: required_field(&fields, "sente")?.to_string(),
        gote: required_field(&fields, "gote")?.to_string(),
        family1: required_field(&fields, "family1")?.to_string(),
        name1: required_field(&fields, "name1")?.to_string(),
        title1: optional_field(&fields, "title1"),
        family2: required_field(&fields, "family2")?.to_string(),
        name2: optional_field(&fields, "name2"),
        title2: optional_field(&fields, "title2"),
        senkei: optional_field(&fields, "senkei"),
        result: int_field(&fields, "result")?,
        winner: int_field(&fields, "winner")?,
        tesuu: int_field(&fields, "tesuu")?,
        sente_score: optional_field(&fields, "sente_score"),
        gote_score: optional_field(&fields, "gote_score"),
    })
}

/// Key/value lines of one block. Comments run from the first `//` to end
/// of line; only the first `=` delimits, so values may themselves
/// contain `=`.
fn block_fields(block: &str) -> HashMap<String, String> {
    block
        .lines()
        .filter_map(|line| {
            let line = match line.find(COMMENT_MARKER) {
                Some(i) => &line[..i],
                None => line,
            };
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn required_field<'a>(
    fields: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, DecodeError> {
    fields
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(DecodeError::MissingField(key))
}

/// Empty-string values coerce to absent.
fn optional_field(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields.get(key).filter(|v| !v.is_empty()).cloned()
}

fn int_field(fields: &HashMap<String, String>, key: &'static str) -> Result<i64, DecodeError> {
    let raw = required_field(fields, key)?;
    raw.parse().map_err(|_| DecodeError::InvalidInteger {
        field: key,
        value: raw.to_string(),
    })
}

fn optional_date_field(
    fields: &HashMap<String, String>,
    key: &str,
) -> Result<Option<NaiveDateTime>, DecodeError> {
    match fields.get(key).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_datetime(raw).map(Some),
    }
}

/// Refresh the header of a JKF record produced by the external KIF
/// parser so it matches the other sources: every header value is
/// normalized, and the tournament/date/datetime/length fields are
/// overwritten from the list block. Length is recomputed from the move
/// list itself.
pub fn apply_header(jkf: &mut Jkf, game: &MeijinGame) {
    for value in jkf.header.values_mut() {
        *value = normalize(value);
    }
    let kisen = normalize(&game.kisen);
    if let Some(tournament) = classify(&kisen) {
        jkf.header
            .insert(MetadataKey::Tournament.as_str().to_string(), tournament.as_str().to_string());
    }
    if let Some(start) = game.start_date {
        jkf.header.insert(
            MetadataKey::Date.as_str().to_string(),
            start.format(DATE_FORMAT).to_string(),
        );
        jkf.header.insert(
            MetadataKey::StartDatetime.as_str().to_string(),
            start.format(DATETIME_FORMAT).to_string(),
        );
    }
    if let Some(end) = game.end_date {
        jkf.header.insert(
            MetadataKey::EndDatetime.as_str().to_string(),
            end.format(DATETIME_FORMAT).to_string(),
        );
    }
    jkf.header.insert(
        MetadataKey::Length.as_str().to_string(),
        jkf.move_count().to_string(),
    );
}
