use std::{fmt, ops::BitOr, str::FromStr};

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::capture::{first_http_entry, get_str, packet_layers, ParsedCapture};

/// Set of HTTP methods a request may have to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HttpMethodFilter(u8);

impl HttpMethodFilter {
    pub const GET: HttpMethodFilter = HttpMethodFilter(0x01);
    pub const POST: HttpMethodFilter = HttpMethodFilter(0x02);
    pub const ANY: HttpMethodFilter = HttpMethodFilter(0x01 | 0x02);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: HttpMethodFilter) -> bool {
        return self.0 & other.0 == other.0;
    }

    /// Whether a method as written in a capture passes the filter. Case does not matter,
    /// and anything besides GET and POST never passes.
    pub fn allows(&self, method: &str) -> bool {
        return (self.contains(Self::GET) && method.eq_ignore_ascii_case("get"))
            || (self.contains(Self::POST) && method.eq_ignore_ascii_case("post"));
    }
}

impl Default for HttpMethodFilter {
    fn default() -> Self {
        Self::ANY
    }
}

impl BitOr for HttpMethodFilter {
    type Output = HttpMethodFilter;
    fn bitor(self, rhs: Self) -> Self::Output {
        HttpMethodFilter(self.0 | rhs.0)
    }
}

impl fmt::Display for HttpMethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::GET => "get",
            Self::POST => "post",
            Self::ANY => "any",
            _ => "none"
        };

        write!(f, "{}", name)
    }
}

impl FromStr for HttpMethodFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(Self::GET),
            "post" => Ok(Self::POST),
            "any" | "request" => Ok(Self::ANY),
            _ => Err(format!("Unknown HTTP method filter '{}', expected one of [get,post,any]", s))
        }
    }
}

impl TryFrom<String> for HttpMethodFilter {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Returns `true` if any HTTP request in the capture has a method allowed by `methods` and a
/// full URI in which `pattern` matches somewhere.
///
/// The method is read from the first sub-record of the packet's HTTP layer. A request without
/// one is taken as GET. Packets without a full URI never match. Scanning stops at the first
/// match.
pub fn match_request(doc: &ParsedCapture, pattern: &Regex, methods: HttpMethodFilter) -> bool {
    debug!("Pattern: {:?}, methods: {}", pattern, methods);

    for (idx, record) in doc.into_iter().enumerate() {
        let Some(http) = packet_layers(record)
            .and_then(|layers| layers.get("http"))
            .and_then(|http| http.as_object()) else {
            continue;
        };

        let method = first_http_entry(http)
            .and_then(|entry| get_str(entry, "http.request.method"))
            .unwrap_or("get");

        let Some(full_uri) = get_str(http, "http.request.full_uri") else {
            continue;
        };

        if methods.allows(method) && pattern.is_match(full_uri) {
            debug!("Packet {} matched: {} {}", idx, method, full_uri);
            return true;
        }
    }

    debug!("No matching request");
    return false;
}

pub fn check_http_request(doc: &ParsedCapture, pattern: &Regex) -> bool {
    match_request(doc, pattern, HttpMethodFilter::ANY)
}

pub fn check_http_get(doc: &ParsedCapture, pattern: &Regex) -> bool {
    match_request(doc, pattern, HttpMethodFilter::GET)
}

pub fn check_http_post(doc: &ParsedCapture, pattern: &Regex) -> bool {
    match_request(doc, pattern, HttpMethodFilter::POST)
}
