// src/query/decoder.rs
use std::fmt;
use crate::models::server::ServerStatus;

pub const SIGNATURE: &[u8; 4] = b"EYE1";
const HEADER_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    MalformedCount { field: &'static str, raw: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedCount { field, raw } => {
                write!(f, "Malformed {} count: {:?}", field, raw)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Cursor over an ASE reply.
///
/// Reads past the end of the buffer never fail: a missing byte reads as 0 and
/// a missing string reads as empty. Clipped datagrams still yield whatever
/// fields made it through.
pub struct AseReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> AseReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn skip(&mut self, count: usize) {
        self.offset = self.offset.saturating_add(count);
    }

    pub fn read_byte(&mut self) -> u8 {
        match self.buffer.get(self.offset) {
            Some(&byte) => {
                self.offset += 1;
                byte
            }
            None => 0,
        }
    }

    pub fn read_string(&mut self) -> String {
        String::from_utf8_lossy(self.take_field()).into_owned()
    }

    pub fn skip_string(&mut self) {
        self.take_field();
    }

    // The length byte counts a trailing terminator that is never sent,
    // so a length of n carries n - 1 content bytes.
    fn take_field(&mut self) -> &'a [u8] {
        let len = self.read_byte() as usize;
        if len <= 1 {
            return &[];
        }

        let buffer = self.buffer;
        let content_len = len - 1;
        let start = self.offset.min(buffer.len());
        let end = self.offset.saturating_add(content_len).min(buffer.len());
        self.offset = self.offset.saturating_add(content_len);

        &buffer[start..end]
    }

    fn read_player(&mut self) -> String {
        self.read_byte(); // flags
        let nickname = self.read_string();
        self.skip_string(); // team
        self.skip_string(); // skin
        self.skip_string(); // score
        self.skip_string(); // ping
        self.skip_string(); // time
        nickname
    }
}

pub fn has_signature(buffer: &[u8]) -> bool {
    buffer.starts_with(SIGNATURE)
}

/// Decodes an ASE status reply.
///
/// The only hard failure is a player count that does not parse, since the
/// player loop depends on it. Everything else missing from a short buffer
/// decodes as empty.
pub fn decode(buffer: &[u8]) -> Result<ServerStatus, DecodeError> {
    let mut reader = AseReader::new(buffer);

    reader.skip(HEADER_LEN);
    reader.skip_string(); // game
    reader.skip_string(); // port

    let server_name = reader.read_string();
    let game_mode = reader.read_string();
    let map_name = reader.read_string();
    let version = reader.read_string();
    let passworded = !reader.read_string().is_empty();
    let current_players = parse_count("current players", &reader.read_string())?;
    let max_players = parse_count("max players", &reader.read_string())?;

    reader.skip_string(); // http port

    let players = (0..current_players).map(|_| reader.read_player()).collect();

    Ok(ServerStatus {
        server_name: Some(server_name),
        game_mode: Some(game_mode),
        map_name: Some(map_name),
        version: Some(version),
        passworded: Some(passworded),
        current_players,
        max_players,
        players,
    })
}

fn parse_count(field: &'static str, raw: &str) -> Result<u16, DecodeError> {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::MalformedCount { field, raw: raw.to_string() });
    }

    trimmed
        .parse()
        .map_err(|_| DecodeError::MalformedCount { field, raw: raw.to_string() })
}
