pub mod fields;

use log::debug;
use serde_json::{Map, Value};

use crate::capture::{first_http_entry, get_str, packet_layers, ParsedCapture};
use crate::utils::lenient_atoi;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TcpFields {
    pub srcport: Option<i64>,
    pub dstport: Option<i64>,
}

/// Declared for every packet, but nothing fills it in yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpFields {
    pub src: Option<i64>,
    pub dst: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequestFields {
    pub method: Option<String>,
    pub uri: Option<String>,
    pub host: Option<String>,
    pub full_uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpFields {
    pub request: HttpRequestFields,
}

/// Fixed-shape view of one packet. Every field is optional: a missing source key leaves the
/// field unset instead of defaulting it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedPacket {
    pub tcp: TcpFields,
    pub ip: IpFields,
    pub http: HttpFields,
}

/// Projected packets, index-aligned with the [`ParsedCapture`] they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedCapture {
    packets: Vec<ProjectedPacket>,
}

impl ProjectedCapture {
    pub fn get(&self, idx: usize) -> Option<&ProjectedPacket> {
        self.packets.get(idx)
    }

    pub fn len(&self) -> usize {
        return self.packets.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.packets.is_empty();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectedPacket> {
        self.packets.iter()
    }
}

impl<'a> IntoIterator for &'a ProjectedCapture {
    type Item = &'a ProjectedPacket;
    type IntoIter = std::slice::Iter<'a, ProjectedPacket>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.iter()
    }
}

// JSON strings go through the lenient parser, JSON numbers are taken as they are
fn port_value(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => {
            Some(lenient_atoi(s))
        },
        Value::Number(n) => {
            match n.as_i64() {
                Some(i) => Some(i),
                None => n.as_f64().map(|f| f as i64)
            }
        },
        _ => {
            None
        }
    }
}

fn project_tcp(layers: &Map<String, Value>) -> TcpFields {
    let Some(tcp) = layers.get("tcp").and_then(|t| t.as_object()) else {
        return TcpFields::default();
    };

    let srcport = tcp.get("tcp.srcport").and_then(port_value);
    let dstport = tcp.get("tcp.dstport").and_then(port_value);

    // Ports are only meaningful together
    return match (srcport, dstport) {
        (Some(srcport), Some(dstport)) => {
            TcpFields {
                srcport: Some(srcport),
                dstport: Some(dstport)
            }
        },
        _ => {
            TcpFields::default()
        }
    };
}

fn project_http(layers: &Map<String, Value>) -> HttpFields {
    let Some(http) = layers.get("http").and_then(|h| h.as_object()) else {
        return HttpFields::default();
    };

    let mut request = HttpRequestFields {
        host: get_str(http, "http.host").map(str::to_string),
        full_uri: get_str(http, "http.request.full_uri").map(str::to_string),
        ..Default::default()
    };

    // Only the first keyed sub-record is inspected
    if let Some(entry) = first_http_entry(http) {
        request.method = get_str(entry, "http.request.method").map(str::to_string);
        request.uri = get_str(entry, "http.request.uri").map(str::to_string);
    }

    HttpFields { request }
}

pub fn project_packet(record: &Value) -> ProjectedPacket {
    match packet_layers(record) {
        Some(layers) => {
            ProjectedPacket {
                tcp: project_tcp(layers),
                ip: IpFields::default(),
                http: project_http(layers)
            }
        },
        None => {
            ProjectedPacket::default()
        }
    }
}

/// Derives the fixed-shape view of every packet. Never fails; absent keys become unset fields.
pub fn project(doc: &ParsedCapture) -> ProjectedCapture {
    let packets: Vec<ProjectedPacket> = doc
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let packet = project_packet(record);
            debug!("Packet {}: {:?}", idx, &packet);
            packet
        })
        .collect();

    ProjectedCapture { packets }
}
