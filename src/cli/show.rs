use clap::ArgMatches;
use colored::Colorize;
use log::debug;

use crate::{module::{CaptureModule, LoadedCapture}, projection::ProjectedPacket};
use super::JcapCLIError;

#[derive(Debug, Default)]
pub(crate) struct ShowSettings {
    pub(crate) print_urls: bool,
    pub(crate) index: Option<usize>
}

impl From<&ArgMatches> for ShowSettings {
    fn from(args: &ArgMatches) -> Self {
        ShowSettings {
            print_urls: args.get_flag("urls"),
            index: args.get_one::<usize>("index").copied()
        }
    }
}

fn packet_lines(idx: usize, packet: &ProjectedPacket, settings: &ShowSettings) -> Vec<String> {
    if settings.print_urls {
        let full_uri = packet.http.request.full_uri.as_deref().unwrap_or("<NONE>");
        return vec![format!("{:>6} {}", idx, full_uri)];
    }

    packet
        .set_fields()
        .into_iter()
        .map(|(path, value)| {
            let path = format!("packets[{}].{}", idx, path);
            format!("{} = {}", path.bright_blue(), value)
        })
        .collect()
}

pub(crate) fn render(capture: &LoadedCapture, settings: &ShowSettings) -> Result<Vec<String>, JcapCLIError> {
    let projected = &capture.projected;
    let mut lines: Vec<String> = Vec::with_capacity(projected.len() + 1);

    if let Some(index) = settings.index {
        let Some(packet) = projected.get(index) else {
            return Err(
                JcapCLIError::from(format!("no packet with index {}, capture has {} packets", index, projected.len()))
            );
        };

        lines.extend(packet_lines(index, packet, settings));
        return Ok(lines);
    }

    if !settings.print_urls {
        lines.push(format!("{} = {}", "number_of_packets".bright_blue(), projected.len()));
    }

    for (idx, packet) in projected.iter().enumerate() {
        lines.extend(packet_lines(idx, packet, settings));
    }

    return Ok(lines);
}

/// Lines for every loaded block. With an index, blocks too short for it are skipped, and it is an
/// error only when no block has such a packet.
pub(crate) fn render_module(module: &CaptureModule, settings: &ShowSettings) -> Result<Vec<String>, JcapCLIError> {
    let loaded = module.loaded();
    let mut lines: Vec<String> = Vec::new();
    let mut rendered = 0;

    for (block, capture) in loaded.iter().enumerate() {
        if let Some(index) = settings.index {
            if capture.projected.get(index).is_none() {
                debug!("Block {} has no packet with index {}", block, index);
                continue;
            }
        }

        if loaded.len() > 1 {
            lines.push(format!("{}", format!("--- block {} ---", block).bold()));
        }

        lines.extend(render(capture, settings)?);
        rendered += 1;
    }

    if let Some(index) = settings.index {
        if rendered == 0 {
            return Err(JcapCLIError::from(format!("no block has a packet with index {}", index)));
        }
    }

    return Ok(lines);
}

pub(crate) fn execute(module: &CaptureModule, settings: &ShowSettings) -> Result<(), JcapCLIError> {
    for line in render_module(module, settings)? {
        println!("{}", line);
    }

    Ok(())
}

/// Prints the value at `path` in the current capture, or `unset`. Returns whether it was set.
pub(crate) fn print_field(module: &CaptureModule, path: &str) -> bool {
    match module.field(path) {
        Some(value) => {
            println!("{}", value);
            true
        },
        None => {
            println!("unset");
            false
        }
    }
}
