//! Loads JSON packet captures (as exported by `tshark -T json`), projects every packet into a
//! fixed set of typed fields and answers "is there an HTTP request whose URI matches" checks.

pub mod capture;
pub mod projection;
pub mod matcher;
pub mod module;
pub mod config;
pub mod cli;
pub mod utils;

pub use capture::{load, ParseError, ParsedCapture};
pub use matcher::{match_request, HttpMethodFilter};
pub use module::CaptureModule;
pub use projection::{fields::FieldValue, project, ProjectedCapture, ProjectedPacket};
