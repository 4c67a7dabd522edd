use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EventErr {
    MissingField,
    TrailingField(String),
    NonNumericField(String),
    InvalidNumber(std::num::ParseIntError),
    UnknownKind(String),
}

impl std::error::Error for EventErr {}

impl fmt::Display for EventErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use EventErr::*;
        let msg = match self {
            MissingField => "the frame ended before all fields for its kind were read".to_string(),
            TrailingField(extra) => format!("unexpected trailing field `{}`", extra),
            NonNumericField(field) => format!("`{}` is not an unsigned decimal number", field),
            InvalidNumber(inner) => format!("numeric field does not fit in an i64: {}", inner),
            UnknownKind(kind) => format!("`{}` is not a known event kind", kind),
        };
        write!(f, "{}", msg)
    }
}

impl From<std::num::ParseIntError> for EventErr {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::InvalidNumber(error)
    }
}
