use std::fmt;

use log::debug;
use serde_json as json;
use serde_json::{Map, Value};

/// Diagnostic produced when a buffer is not valid JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    // 1-based, `None` when the parser could not tell
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "Could not parse capture at line {}, column {}: {}", line, column, &self.message)
            },
            _ => {
                write!(f, "Could not parse capture: {}", &self.message)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<json::Error> for ParseError {
    fn from(e: json::Error) -> Self {
        let mut message = e.to_string();

        // serde_json reports line 0 for errors that are not tied to a position,
        // otherwise its message already ends with the position
        let (line, column) = if e.line() > 0 {
            let suffix = format!(" at line {} column {}", e.line(), e.column());
            if let Some(stripped) = message.strip_suffix(&suffix) {
                message = stripped.to_string();
            }

            (Some(e.line()), Some(e.column()))
        }
        else {
            (None, None)
        };

        ParseError {
            message,
            line,
            column
        }
    }
}

/// One parsed capture document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCapture {
    document: Value,
}

pub struct PacketIterator<'a> {
    object: &'a ParsedCapture,
    counter: usize
}

impl<'a> Iterator for PacketIterator<'a> {
    type Item = &'a Value;
    fn next(&mut self) -> Option<Self::Item> {
        let tmp = self.object.packets().get(self.counter);
        self.counter += 1;
        tmp
    }
}

impl<'a> IntoIterator for &'a ParsedCapture {
    type Item = &'a Value;
    type IntoIter = PacketIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        PacketIterator {
            object: self,
            counter: 0
        }
    }
}

impl ParsedCapture {
    /// Packet records in capture order. A top-level value that is not an array has no packets.
    pub fn packets(&self) -> &[Value] {
        match self.document.as_array() {
            Some(packets) => packets.as_slice(),
            None => &[]
        }
    }

    pub fn len(&self) -> usize {
        return self.packets().len();
    }

    pub fn is_empty(&self) -> bool {
        return self.packets().is_empty();
    }
}

/// Parses one buffer into a [`ParsedCapture`].
///
/// The whole buffer is parsed, so an escaped NUL inside a string does not cut the document
/// short. Nothing is returned for a malformed buffer.
pub fn load(buffer: &[u8]) -> Result<ParsedCapture, ParseError> {
    let document: Value = match json::from_slice(buffer) {
        Ok(document) => {
            document
        },
        Err(e) => {
            let err = ParseError::from(e);
            debug!("{}", err);
            return Err(err);
        }
    };

    if !document.is_array() {
        debug!("Capture top-level value is not an array, it will be treated as empty");
    }

    let capture = ParsedCapture { document };
    debug!("Loaded capture with {} packets", capture.len());
    Ok(capture)
}

/// Resolves the protocol layers map of a packet record.
///
/// Exporters nest layers under `_source.layers`; flat records without `_source` are their own
/// layers map. A record that has `_source` but no resolvable map there has no layers.
pub(crate) fn packet_layers(record: &Value) -> Option<&Map<String, Value>> {
    let record = record.as_object()?;
    match record.get("_source") {
        Some(source) => {
            source
                .as_object()?
                .get("layers")?
                .as_object()
        },
        None => {
            Some(record)
        }
    }
}

/// Value of the first entry of an HTTP layer map, whatever its key is.
///
/// Exporters key per-request details by a generated name (usually the request line), so only
/// the position is reliable.
pub(crate) fn first_http_entry(http: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let (_key, value) = http.iter().next()?;
    value.as_object()
}

pub(crate) fn get_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)?.as_str()
}
