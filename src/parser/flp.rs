//! FL Studio `.flp` project parser.
//!
//! An `.flp` file is two chunks: a fixed `FLhd` header followed by an `FLdt`
//! chunk holding a flat stream of events. Each event is a one-byte id whose
//! range determines the payload size:
//!
//! | id range   | payload                          |
//! |------------|----------------------------------|
//! | `0..64`    | 1 byte                           |
//! | `64..128`  | 2 bytes                          |
//! | `128..192` | 4 bytes                          |
//! | `192..=255`| varint length, then that many    |
//!
//! Only two events are interpreted here: `FLVersion` and `Timestamp`. The
//! rest of the stream is walked for framing errors and otherwise ignored.

use std::{fs, path::Path};

use chrono::TimeDelta;

use super::{ParseError, ParsedProject, ProjectParser};

const HEADER_MAGIC: &[u8; 4] = b"FLhd";
const DATA_MAGIC: &[u8; 4] = b"FLdt";
const HEADER_LENGTH: u32 = 6;
const PROJECT_FORMAT: i16 = 0;

const WORD: u8 = 64;
const DWORD: u8 = 128;
const TEXT: u8 = 192;
const DATA: u8 = 208;

const FL_VERSION: u8 = TEXT + 7;
const TIMESTAMP: u8 = DATA + 29;

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

#[allow(clippy::cast_precision_loss)]
const MAX_MICROS: f64 = i64::MAX as f64;

/// Parser for FL Studio project files.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlpParser;

impl FlpParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse an in-memory `.flp` image.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if either chunk is malformed, the event stream
    /// is truncated, or the project carries no valid `Timestamp` event.
    pub fn parse_bytes(bytes: &[u8]) -> Result<ParsedProject, ParseError> {
        let mut reader = Reader::new(bytes);

        reader.expect_magic(HEADER_MAGIC, "FLhd")?;
        let header_len = reader.u32("header length")?;
        if header_len != HEADER_LENGTH {
            return Err(ParseError::BadHeaderLength(header_len));
        }
        let format = reader.i16("file format")?;
        if format != PROJECT_FORMAT {
            return Err(ParseError::UnsupportedFormat(format));
        }
        let _channel_count = reader.u16("channel count")?;
        let _ppq = reader.u16("ppq")?;

        reader.expect_magic(DATA_MAGIC, "FLdt")?;
        let data_len = reader.u32("data length")?;
        let data = reader.take(data_len as usize, "data chunk")?;

        let mut events = Reader::new(data);
        let mut time_spent = None;
        let mut version = None;

        while !events.is_empty() {
            let id = events.u8("event id")?;
            let payload = events.payload(id)?;

            match id {
                TIMESTAMP if time_spent.is_none() => {
                    time_spent = Some(timestamp_time_spent(payload)?);
                }
                FL_VERSION if version.is_none() => {
                    version = Some(decode_ascii(payload));
                }
                _ => {}
            }
        }

        let time_spent = time_spent.ok_or(ParseError::MissingTimestamp)?;

        Ok(ParsedProject {
            time_spent,
            version,
        })
    }
}

impl ProjectParser for FlpParser {
    fn parse(&self, path: &Path) -> Result<ParsedProject, ParseError> {
        let bytes = fs::read(path)?;
        Self::parse_bytes(&bytes)
    }
}

/// Extract the time spent field from a `Timestamp` event payload.
///
/// The payload is two little-endian `f64` day counts: the creation date
/// (days since 1899-12-30) and the accumulated working time.
fn timestamp_time_spent(payload: &[u8]) -> Result<TimeDelta, ParseError> {
    let mut reader = Reader::new(payload);
    let _created_on = reader.f64("timestamp")?;
    let days = reader.f64("timestamp")?;

    days_to_time_delta(days)
}

/// Convert a fractional day count to a duration rounded to the microsecond.
fn days_to_time_delta(days: f64) -> Result<TimeDelta, ParseError> {
    if !days.is_finite() || days < 0.0 {
        return Err(ParseError::InvalidTimeSpent(days));
    }

    let micros = (days * MICROS_PER_DAY).round();

    if micros >= MAX_MICROS {
        return Err(ParseError::DurationOverflow);
    }

    #[allow(clippy::cast_possible_truncation)]
    let micros = micros as i64;

    Ok(TimeDelta::microseconds(micros))
}

fn decode_ascii(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .trim_end_matches('\0')
        .to_string()
}

/// Little-endian cursor over a byte slice.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    const fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], ParseError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(ParseError::Truncated(what))?;

        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], ParseError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn expect_magic(&mut self, magic: &[u8; 4], expected: &'static str) -> Result<(), ParseError> {
        let found = self.array::<4>(expected)?;
        if &found != magic {
            return Err(ParseError::BadMagic { expected, found });
        }
        Ok(())
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, ParseError> {
        Ok(self.array::<1>(what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> Result<u16, ParseError> {
        self.array(what).map(u16::from_le_bytes)
    }

    fn i16(&mut self, what: &'static str) -> Result<i16, ParseError> {
        self.array(what).map(i16::from_le_bytes)
    }

    fn u32(&mut self, what: &'static str) -> Result<u32, ParseError> {
        self.array(what).map(u32::from_le_bytes)
    }

    fn f64(&mut self, what: &'static str) -> Result<f64, ParseError> {
        self.array(what).map(f64::from_le_bytes)
    }

    /// Read a base-128 length prefix, least significant group first.
    fn varint(&mut self) -> Result<usize, ParseError> {
        let start = self.pos;
        let mut value = 0usize;
        let mut shift = 0u32;

        loop {
            let byte = self.u8("event length")?;
            value |= usize::from(byte & 0x7f) << shift;

            if byte & 0x80 == 0 {
                return Ok(value);
            }

            shift += 7;
            if shift >= 32 {
                return Err(ParseError::BadEventLength(start));
            }
        }
    }

    /// Read the payload belonging to an event with the given id.
    fn payload(&mut self, id: u8) -> Result<&'a [u8], ParseError> {
        let len = match id {
            0..WORD => 1,
            WORD..DWORD => 2,
            DWORD..TEXT => 4,
            TEXT..=255 => self.varint()?,
        };

        self.take(len, "event payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a length prefix the way FL Studio does.
    fn varint(mut value: usize) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            #[allow(clippy::cast_possible_truncation)]
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            out.push(byte);
            if value == 0 {
                return out;
            }
        }
    }

    fn variable_event(id: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![id];
        out.extend(varint(payload.len()));
        out.extend_from_slice(payload);
        out
    }

    fn timestamp_event(time_spent_days: f64) -> Vec<u8> {
        let mut payload = 45_000.5f64.to_le_bytes().to_vec();
        payload.extend(time_spent_days.to_le_bytes());
        variable_event(TIMESTAMP, &payload)
    }

    fn flp(events: &[u8]) -> Vec<u8> {
        let mut out = HEADER_MAGIC.to_vec();
        out.extend(HEADER_LENGTH.to_le_bytes());
        out.extend(PROJECT_FORMAT.to_le_bytes());
        out.extend(3u16.to_le_bytes());
        out.extend(96u16.to_le_bytes());
        out.extend_from_slice(DATA_MAGIC);
        out.extend(u32::try_from(events.len()).unwrap().to_le_bytes());
        out.extend_from_slice(events);
        out
    }

    /// A small but realistic event stream around the timestamp.
    fn project_events(time_spent_days: f64) -> Vec<u8> {
        let mut events = vec![
            // byte event (loop active), word event, dword event
            9, 1, //
            WORD + 3, 0x10, 0x27, //
            DWORD + 28, 0x8c, 0x00, 0x00, 0x00,
        ];
        events.extend(variable_event(FL_VERSION, b"20.8.4.2576\0"));
        events.extend(timestamp_event(time_spent_days));
        events.extend(variable_event(TEXT + 2, &[0u8; 300]));
        events
    }

    #[test]
    fn test_parse_time_spent_and_version() {
        let bytes = flp(&project_events(0.0625));
        let project = FlpParser::parse_bytes(&bytes).unwrap();

        assert_eq!(project.time_spent, TimeDelta::minutes(90));
        assert_eq!(project.version.as_deref(), Some("20.8.4.2576"));
    }

    #[test]
    fn test_parse_rounds_to_microseconds() {
        // One third of a second is not representable exactly in days.
        let days = 1.0 / 3.0 / 86_400.0;
        let project = FlpParser::parse_bytes(&flp(&timestamp_event(days))).unwrap();

        assert_eq!(project.time_spent, TimeDelta::microseconds(333_333));
        assert!(project.version.is_none());
    }

    #[test]
    fn test_first_timestamp_wins() {
        let mut events = timestamp_event(1.0);
        events.extend(timestamp_event(2.0));

        let project = FlpParser::parse_bytes(&flp(&events)).unwrap();
        assert_eq!(project.time_spent, TimeDelta::days(1));
    }

    #[test]
    fn test_zero_time_spent_is_valid() {
        let project = FlpParser::parse_bytes(&flp(&timestamp_event(0.0))).unwrap();
        assert_eq!(project.time_spent, TimeDelta::zero());
    }

    #[test]
    fn test_bad_header_magic() {
        let mut bytes = flp(&timestamp_event(1.0));
        bytes[..4].copy_from_slice(b"RIFF");

        let err = FlpParser::parse_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ParseError::BadMagic {
                expected: "FLhd",
                found: [b'R', b'I', b'F', b'F']
            }
        ));
    }

    #[test]
    fn test_bad_data_magic() {
        let mut bytes = flp(&timestamp_event(1.0));
        bytes[14..18].copy_from_slice(b"FLxx");

        let err = FlpParser::parse_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ParseError::BadMagic { expected: "FLdt", .. }));
    }

    #[test]
    fn test_bad_header_length() {
        let mut bytes = flp(&timestamp_event(1.0));
        bytes[4..8].copy_from_slice(&8u32.to_le_bytes());

        let err = FlpParser::parse_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ParseError::BadHeaderLength(8)));
    }

    #[test]
    fn test_non_project_format_rejected() {
        let mut bytes = flp(&timestamp_event(1.0));
        bytes[8..10].copy_from_slice(&0x10i16.to_le_bytes());

        let err = FlpParser::parse_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(0x10)));
    }

    #[test]
    fn test_empty_input_is_truncated() {
        let err = FlpParser::parse_bytes(&[]).unwrap_err();
        assert!(matches!(err, ParseError::Truncated("FLhd")));
    }

    #[test]
    fn test_data_chunk_longer_than_file() {
        let mut bytes = flp(&timestamp_event(1.0));
        bytes.truncate(bytes.len() - 4);

        let err = FlpParser::parse_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ParseError::Truncated("data chunk")));
    }

    #[test]
    fn test_event_payload_past_chunk_end() {
        // Declares 16 bytes of payload but only carries 3.
        let events = [TIMESTAMP, 16, 1, 2, 3];

        let err = FlpParser::parse_bytes(&flp(&events)).unwrap_err();
        assert!(matches!(err, ParseError::Truncated("event payload")));
    }

    #[test]
    fn test_runaway_varint() {
        let events = [TEXT, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];

        let err = FlpParser::parse_bytes(&flp(&events)).unwrap_err();
        assert!(matches!(err, ParseError::BadEventLength(1)));
    }

    #[test]
    fn test_missing_timestamp() {
        let events = variable_event(FL_VERSION, b"9.1.0\0");

        let err = FlpParser::parse_bytes(&flp(&events)).unwrap_err();
        assert!(matches!(err, ParseError::MissingTimestamp));
    }

    #[test]
    fn test_short_timestamp_payload() {
        let events = variable_event(TIMESTAMP, &[0u8; 8]);

        let err = FlpParser::parse_bytes(&flp(&events)).unwrap_err();
        assert!(matches!(err, ParseError::Truncated("timestamp")));
    }

    #[test]
    fn test_invalid_time_spent_values() {
        for days in [f64::NAN, f64::INFINITY, -1.0] {
            let err = FlpParser::parse_bytes(&flp(&timestamp_event(days))).unwrap_err();
            assert!(matches!(err, ParseError::InvalidTimeSpent(_)));
        }
    }

    #[test]
    fn test_time_spent_overflow() {
        let err = FlpParser::parse_bytes(&flp(&timestamp_event(1e300))).unwrap_err();
        assert!(matches!(err, ParseError::DurationOverflow));
    }

    #[test]
    fn test_varint_lengths_over_127() {
        let mut events = variable_event(TEXT + 1, &[b'a'; 200]);
        events.extend(timestamp_event(0.5));

        let project = FlpParser::parse_bytes(&flp(&events)).unwrap();
        assert_eq!(project.time_spent, TimeDelta::hours(12));
    }

    #[test]
    fn test_parse_reads_from_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("song.flp");
        fs::write(&path, flp(&timestamp_event(0.25))).unwrap();

        let project = FlpParser::new().parse(&path).unwrap();
        assert_eq!(project.time_spent, TimeDelta::hours(6));
    }

    #[test]
    fn test_parse_missing_file_is_io_error() {
        let err = FlpParser::new()
            .parse(Path::new("/nonexistent/song.flp"))
            .unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
