//! Canonical header assembly: the one place where per-source header
//! fields become standard metadata, so that all three upstreams produce
//! comparable records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::DecodeError;
use crate::normalize::normalize;
use crate::record::{MetadataKey, Record};
use crate::tournament::classify;

pub const DATE_FORMAT: &str = "%Y/%m/%d";
pub const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Candidate patterns for upstream date strings, tried in order. chrono
/// accepts unpadded month/day/hour digits, so this table also covers the
/// `YYYY/M/DD` and `H:mm` shapes the Meijin feed emits.
const DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d/%H:%M",
];

/// Parse an upstream date string. RFC 3339 timestamps are accepted first
/// (the AI feed's `endtime`), then the slash-delimited candidates, then a
/// bare date at midnight. Exhausting all patterns is a hard failure
/// naming the offending value.
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, DecodeError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::default()));
    }
    Err(DecodeError::InvalidDate(raw.to_string()))
}

/// Source header fields shared by every upstream. Black/white assignment
/// is the caller's responsibility: the sources disagree on which of
/// player1/player2 is which color, so the mapping must be resolved per
/// source before this point.
#[derive(Debug, Clone)]
pub struct SourceHeader<'a> {
    pub event: &'a str,
    pub black_name: &'a str,
    pub white_name: &'a str,
    pub place: &'a str,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub time_limit: &'a str,
}

/// Set the standard metadata block on a finalized record. The tournament
/// field is omitted entirely on a classifier miss, never a placeholder.
pub fn assemble(record: &mut Record, header: &SourceHeader<'_>) {
    let title = normalize(header.event);
    if let Some(tournament) = classify(&title) {
        record.set_metadata(MetadataKey::Tournament, tournament.as_str());
    }
    record.set_metadata(MetadataKey::Title, title);
    record.set_metadata(MetadataKey::Date, header.start.format(DATE_FORMAT).to_string());
    record.set_metadata(
        MetadataKey::StartDatetime,
        header.start.format(DATETIME_FORMAT).to_string(),
    );
    if let Some(end) = header.end {
        record.set_metadata(MetadataKey::EndDatetime, end.format(DATETIME_FORMAT).to_string());
    }
    record.set_metadata(MetadataKey::TimeLimit, header.time_limit);
    record.set_metadata(MetadataKey::BlackTimeLimit, header.time_limit);
    record.set_metadata(MetadataKey::WhiteTimeLimit, header.time_limit);
    record.set_metadata(MetadataKey::Length, record.length().to_string());
    record.set_metadata(MetadataKey::Strategy, "");
    record.set_metadata(MetadataKey::Place, normalize(header.place));
    record.set_metadata(MetadataKey::BlackName, header.black_name);
    record.set_metadata(MetadataKey::WhiteName, header.white_name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_upstream_date_shape() {
        for raw in [
            "2025/09/24 10:00",
            "2025/09/24 9:05",
            "2025/9/24 10:00",
            "2025/9/24/9:05",
            "2025/09/24",
        ] {
            let parsed = parse_datetime(raw);
            assert!(parsed.is_ok(), "failed to parse {raw:?}: {parsed:?}");
            assert_eq!(
                parsed.unwrap().format(DATE_FORMAT).to_string(),
                "2025/09/24"
            );
        }
    }

    #[test]
    fn parses_rfc3339() {
        let dt = parse_datetime("2025-04-09T21:04:00.000Z").unwrap();
        assert_eq!(dt.format(DATETIME_FORMAT).to_string(), "2025/04/09 21:04:00");
    }

    #[test]
    fn rejects_garbage_dates_with_the_raw_value() {
        let err = parse_datetime("24-09-2025").unwrap_err();
        match err {
            DecodeError::InvalidDate(raw) => assert_eq!(raw, "24-09-2025"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn assembles_standard_header() {
        let mut record = Record::standard().unwrap();
        let header = SourceHeader {
            event: "第８３期名人戦七番勝負第1局",
            black_name: "永瀬拓矢九段",
            white_name: "藤井聡太名人",
            place: "ホテル椿山荘東京",
            start: parse_datetime("2025/04/09 09:00:00").unwrap(),
            end: Some(parse_datetime("2025/04/10 21:04:00").unwrap()),
            time_limit: "各8時間",
        };
        assemble(&mut record, &header);
        // Full-width digits in the event are normalized before storage.
        assert_eq!(
            record.metadata(MetadataKey::Title),
            Some("第83期名人戦七番勝負第1局")
        );
        assert_eq!(record.metadata(MetadataKey::Tournament), Some("名人戦"));
        assert_eq!(record.metadata(MetadataKey::Date), Some("2025/04/09"));
        assert_eq!(
            record.metadata(MetadataKey::StartDatetime),
            Some("2025/04/09 09:00:00")
        );
        assert_eq!(
            record.metadata(MetadataKey::EndDatetime),
            Some("2025/04/10 21:04:00")
        );
        assert_eq!(record.metadata(MetadataKey::Length), Some("0"));
        assert_eq!(record.metadata(MetadataKey::BlackName), Some("永瀬拓矢九段"));
    }

    #[test]
    fn tournament_miss_leaves_the_field_out() {
        let mut record = Record::standard().unwrap();
        let header = SourceHeader {
            event: "非公式対局",
            black_name: "a",
            white_name: "b",
            place: "",
            start: parse_datetime("2025/01/01").unwrap(),
            end: None,
            time_limit: "",
        };
        assemble(&mut record, &header);
        assert_eq!(record.metadata(MetadataKey::Tournament), None);
        assert_eq!(record.metadata(MetadataKey::EndDatetime), None);
    }
}
