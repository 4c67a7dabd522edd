//! Methods for parsing the newline-framed events emitted by the event source.
//!
//! Every frame is a pipe-delimited record: a sequence number, a one-letter
//! kind, and zero, one, or two user ids depending on the kind:
//!
//! ```text
//! 666|F|60|50\n   user 60 follows user 50
//! 1|U|12|9\n      user 12 unfollows user 9
//! 542532|B\n      broadcast to every connected client
//! 43|P|32|56\n    private message from user 32 to user 56
//! 634|S|32\n      status update from user 32 to its followers
//! ```
//!
//! All numeric fields are unsigned ASCII-decimal runs fitting in an `i64`.
//! The parser keeps the raw frame alongside the parsed fields: the raw text is
//! what gets forwarded to clients, byte for byte, so no re-serialization pass
//! is needed.  The framing codec strips the trailing newline before the text
//! reaches this module and restores it on the way out.

mod err;
pub use err::EventErr;

use std::convert::TryFrom;

/// A user id from the wire.  Ids are assigned by the producer and are not
/// required to belong to a connected client.
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    raw: String,
    sequence: i64,
    kind: Kind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Follow { from: UserId, to: UserId },
    Unfollow { from: UserId, to: UserId },
    Broadcast,
    PrivateMsg { from: UserId, to: UserId },
    StatusUpdate { from: UserId },
}

impl Event {
    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The frame as received, without its trailing newline.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl TryFrom<String> for Event {
    type Error = EventErr;

    fn try_from(line: String) -> Result<Event, Self::Error> {
        let (sequence, kind) = parse_fields(&line)?;
        Ok(Event {
            raw: line,
            sequence,
            kind,
        })
    }
}

type Fields<'a> = std::str::Split<'a, char>;

fn parse_fields(line: &str) -> Result<(i64, Kind), EventErr> {
    use Kind::*;
    let mut fields = line.split('|');

    let sequence = decimal(next_field(&mut fields)?)?;
    let kind = match next_field(&mut fields)? {
        "F" => Follow {
            from: decimal(next_field(&mut fields)?)?,
            to: decimal(next_field(&mut fields)?)?,
        },
        "U" => Unfollow {
            from: decimal(next_field(&mut fields)?)?,
            to: decimal(next_field(&mut fields)?)?,
        },
        "B" => Broadcast,
        "P" => PrivateMsg {
            from: decimal(next_field(&mut fields)?)?,
            to: decimal(next_field(&mut fields)?)?,
        },
        "S" => StatusUpdate {
            from: decimal(next_field(&mut fields)?)?,
        },
        unknown => return Err(EventErr::UnknownKind(unknown.to_string())),
    };
    if let Some(extra) = fields.next() {
        return Err(EventErr::TrailingField(extra.to_string()));
    }

    Ok((sequence, kind))
}

fn next_field<'a>(fields: &mut Fields<'a>) -> Result<&'a str, EventErr> {
    fields.next().ok_or(EventErr::MissingField)
}

/// Parse one unsigned decimal field.  Sign characters would get through a bare
/// `str::parse`, so the digits are checked first.
fn decimal(field: &str) -> Result<i64, EventErr> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EventErr::NonNumericField(field.to_string()));
    }
    Ok(field.parse()?)
}
