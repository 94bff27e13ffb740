use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ConvertError {
    /// The input file extension maps to no known reader.
    UnsupportedFormat(String),
    /// A timestamp matched none of the known encodings.
    MalformedTimestamp(String),
    /// The input could not be parsed as a document at all.
    MalformedDocument(String),
    ParseError(String),
}

impl Error for ConvertError {}

impl fmt::Display for ConvertError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConvertError::UnsupportedFormat(ext) => {
                write!(fmt, "Unsupported file format: '{}'", ext)
            }
            ConvertError::MalformedTimestamp(text) => {
                write!(fmt, "Unrecognised timestamp: '{}'", text)
            }
            ConvertError::MalformedDocument(msg) => write!(fmt, "{}", msg),
            ConvertError::ParseError(msg) => write!(fmt, "{}", msg),
        }
    }
}
