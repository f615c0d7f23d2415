use log::debug;
use regex::Regex;

use crate::{
    capture::{self, ParseError, ParsedCapture},
    matcher::{match_request, HttpMethodFilter},
    projection::{fields::FieldValue, project, ProjectedCapture}
};

/// A loaded block: the parse tree and its projection.
#[derive(Debug, Clone)]
pub struct LoadedCapture {
    pub parsed: ParsedCapture,
    pub projected: ProjectedCapture,
}

/// Scan-unit adapter around the loader, projector and matcher. Fields and predicates always
/// refer to the most recently loaded block.
#[derive(Debug, Default)]
pub struct CaptureModule {
    loaded: Vec<LoadedCapture>,
}

impl CaptureModule {
    pub fn initialize() -> Result<(), ParseError> {
        Ok(())
    }

    pub fn finalize() -> Result<(), ParseError> {
        Ok(())
    }

    /// Loads and projects every block in order. Each block must be a complete JSON document.
    /// Stops at the first malformed block; blocks loaded before it stay loaded.
    pub fn load<I, B>(&mut self, buffers: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>
    {
        for (block, buffer) in buffers.into_iter().enumerate() {
            let parsed = match capture::load(buffer.as_ref()) {
                Ok(parsed) => {
                    parsed
                },
                Err(err) => {
                    debug!("Block {} was not loaded", block);
                    return Err(err);
                }
            };

            let projected = project(&parsed);
            debug!("Block {}: {} packets", block, projected.len());
            self.loaded.push(LoadedCapture { parsed, projected });
        }

        Ok(())
    }

    pub fn unload(&mut self) {
        debug!("Unloading {} captures", self.loaded.len());
        self.loaded.clear();
    }

    pub fn current(&self) -> Option<&LoadedCapture> {
        self.loaded.last()
    }

    pub fn loaded(&self) -> &[LoadedCapture] {
        &self.loaded
    }

    /// `None` until a block has been loaded.
    pub fn number_of_packets(&self) -> Option<i64> {
        self.current().map(|c| c.projected.len() as i64)
    }

    /// Field lookup by path, e.g. `packets[0].tcp.srcport`. Unset fields give `None`.
    pub fn field(&self, path: &str) -> Option<FieldValue> {
        self.current()?.projected.field(path)
    }

    pub fn http_request(&self, pattern: &Regex) -> i64 {
        self.check(pattern, HttpMethodFilter::ANY)
    }

    pub fn http_get(&self, pattern: &Regex) -> i64 {
        self.check(pattern, HttpMethodFilter::GET)
    }

    pub fn http_post(&self, pattern: &Regex) -> i64 {
        self.check(pattern, HttpMethodFilter::POST)
    }

    /// Predicate result as an integer, `0` when nothing is loaded.
    pub fn check(&self, pattern: &Regex, methods: HttpMethodFilter) -> i64 {
        let matched = match self.current() {
            Some(current) => {
                match_request(&current.parsed, pattern, methods)
            },
            None => {
                false
            }
        };

        return matched as i64;
    }
}
