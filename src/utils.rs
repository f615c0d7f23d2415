use std::{
    io::{self, Read},
    fmt,
    fs
};
use flate2::read::GzDecoder;

use crate::capture::ParseError;

#[derive(Debug)]
pub enum JcapError {
    IOError(String),
    ParseError(ParseError),
    ConfigError(String),
    PatternError(String),
    UndefinedError(String)
}

impl From<io::Error> for JcapError {
    fn from(e: io::Error) -> Self { Self::IOError(e.to_string()) }
}

impl From<ParseError> for JcapError {
    fn from(e: ParseError) -> Self { Self::ParseError(e) }
}

impl From<serde_yaml::Error> for JcapError {
    fn from(e: serde_yaml::Error) -> Self { Self::ConfigError(e.to_string()) }
}

impl From<regex::Error> for JcapError {
    fn from(e: regex::Error) -> Self { Self::PatternError(e.to_string()) }
}

impl From<String> for JcapError {
    fn from(s: String) -> Self { Self::UndefinedError(s) }
}

impl fmt::Display for JcapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JcapError::IOError(s) => write!(f, "I/O error: {}", s),
            JcapError::ParseError(e) => write!(f, "{}", e),
            JcapError::ConfigError(s) => write!(f, "Config error: {}", s),
            JcapError::PatternError(s) => write!(f, "Pattern error: {}", s),
            JcapError::UndefinedError(s) => write!(f, "{}", s)
        }
    }
}

impl std::error::Error for JcapError {}

// ---------------------------------------------------------------------------------------------- //

/// Best-effort integer parse with `atoi` semantics: leading whitespace is skipped, an optional
/// sign is accepted, then the longest run of ASCII digits is taken. Anything without digits
/// gives `0`. Values outside of `i64` saturate.
///
/// Capture exporters write numbers as strings, and a malformed one must still yield something,
/// so this is intentionally permissive.
pub fn lenient_atoi(s: &str) -> i64 {
    let mut chars = s.trim_start().chars().peekable();
    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        },
        Some('+') => {
            chars.next();
            false
        },
        _ => false
    };

    let mut result: i64 = 0;
    while let Some(digit) = chars.next().and_then(|c| c.to_digit(10)) {
        result = if negative {
            result.saturating_mul(10).saturating_sub(digit as i64)
        }
        else {
            result.saturating_mul(10).saturating_add(digit as i64)
        };
    }

    return result;
}

/// Reads a capture file from disk, transparently inflating it when the name ends with `.gz`.
pub fn read_capture_file(path: &str) -> Result<Vec<u8>, JcapError> {
    let mut buffer: Vec<u8> = Vec::new();
    let f = fs::File::open(path);
    match f {
        Ok(file) => {
            let res = if path.ends_with(".gz") {
                GzDecoder::new(file).read_to_end(&mut buffer)
            }
            else {
                let mut file = file;
                file.read_to_end(&mut buffer)
            };

            if let Err(e) = res {
                return Err(
                    JcapError::IOError(
                        format!("Could not read from capture file '{}', info: {}", path, e.to_string())
                    )
                )
            }
        },
        Err(e) => return Err(
            JcapError::IOError(
                format!("Could not find or open capture file '{}', info: {}", path, e.to_string())
            )
        )
    }

    Ok(buffer)
}
