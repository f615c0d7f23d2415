use std::{fmt, sync::OnceLock};

use regex::Regex;

use super::{ProjectedCapture, ProjectedPacket};

/// Every field path a packet exposes, in the order they are listed.
pub const PACKET_FIELDS: [&str; 8] = [
    "tcp.srcport",
    "tcp.dstport",
    "ip.src",
    "ip.dst",
    "http.request.method",
    "http.request.uri",
    "http.request.host",
    "http.request.full_uri",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i64),
    String(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::String(s) => write!(f, "{:?}", s)
        }
    }
}

fn packet_path_re() -> &'static Regex {
    static PACKET_PATH_RE: OnceLock<Regex> = OnceLock::new();
    PACKET_PATH_RE.get_or_init(|| {
        Regex::new(r"^packets\[(\d+)\]\.(.+)$").expect("Cannot compile packet path regex")
    })
}

impl ProjectedPacket {
    /// Looks up a field by its path relative to the packet, e.g. `tcp.srcport`.
    /// Unset fields and unknown paths both give `None`.
    pub fn field(&self, path: &str) -> Option<FieldValue> {
        let integer = |v: &Option<i64>| v.map(FieldValue::Integer);
        let string = |v: &Option<String>| v.clone().map(FieldValue::String);

        match path {
            "tcp.srcport" => integer(&self.tcp.srcport),
            "tcp.dstport" => integer(&self.tcp.dstport),
            "ip.src" => integer(&self.ip.src),
            "ip.dst" => integer(&self.ip.dst),
            "http.request.method" => string(&self.http.request.method),
            "http.request.uri" => string(&self.http.request.uri),
            "http.request.host" => string(&self.http.request.host),
            "http.request.full_uri" => string(&self.http.request.full_uri),
            _ => None
        }
    }

    /// Set fields only, as `(path, value)` pairs.
    pub fn set_fields(&self) -> Vec<(&'static str, FieldValue)> {
        PACKET_FIELDS
            .iter()
            .filter_map(|path| {
                self.field(path).map(|value| (*path, value))
            })
            .collect()
    }
}

impl ProjectedCapture {
    /// Resolves `number_of_packets` or `packets[i].<field>`.
    pub fn field(&self, path: &str) -> Option<FieldValue> {
        if path == "number_of_packets" {
            return Some(FieldValue::Integer(self.len() as i64));
        }

        let captures = packet_path_re().captures(path)?;
        let idx: usize = captures.get(1)?.as_str().parse().ok()?;
        let packet = self.get(idx)?;
        packet.field(captures.get(2)?.as_str())
    }
}
