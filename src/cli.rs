pub(crate) mod show;
pub(crate) mod check;

use clap::{self, ArgMatches};
use log::debug;

use crate::{config::{self, Config}, module::CaptureModule, utils};

#[derive(Debug)]
pub struct JcapCLIError {
    error: String
}

impl<T> From<T> for JcapCLIError where T: ToString {
    fn from(e: T) -> Self {
        Self { error: e.to_string() }
    }
}

impl Into<String> for JcapCLIError {
    fn into(self) -> String {
        self.error
    }
}

fn files_arg() -> clap::Arg {
    clap::Arg::new("FILES")
        .help("JSON capture files, each one is loaded as a separate block (.gz files are inflated)")
        .required(true)
        .num_args(1..)
}

pub fn build() -> clap::Command {
    clap::Command::new("jcap")
        .about("Inspect JSON packet captures: typed fields and HTTP request checks")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            clap::Command::new("show")
                .about("Print number of packets and every set field")
                .alias("s")
                .arg(
                    clap::Arg::new("urls")
                        .short('u')
                        .long("urls")
                        .action(clap::ArgAction::SetTrue)
                        .help("Print only indexes and full request URIs")
                )
                .arg(
                    clap::Arg::new("index")
                        .short('i')
                        .long("index")
                        .value_parser(clap::value_parser!(usize))
                        .help("Print only the packet with this index")
                )
                .arg(files_arg())
        )
        .subcommand(
            clap::Command::new("field")
                .about("Print one field by path, e.g. 'packets[0].tcp.srcport' or 'number_of_packets'")
                .alias("f")
                .arg(clap::arg!(<PATH> "Field path").required(true))
                .arg(files_arg())
        )
        .subcommand(
            clap::Command::new("check")
                .about("Check whether any HTTP request full URI matches a regex, exits with 1 if none does")
                .alias("c")
                .arg(clap::arg!(<REGEX> "Pattern searched for in full request URIs").required(true))
                .arg(
                    clap::Arg::new("methods")
                        .short('m')
                        .long("methods")
                        .value_parser(["get", "post", "any"])
                        .help("HTTP methods to accept (default is taken from config)")
                )
                .arg(files_arg())
        )
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .default_value(config::DEFAULT_CONFIG_PATH)
                .value_name("YAML_CONFIG")
                .help("Path to config with YAML format")
        )
        .arg(
            clap::Arg::new("debug-file")
                .long("debug-file")
                .global(true)
                .value_name("FILE-TO-WRITE")
                .help("A file to write debug messages")
        )
}

/// Reads every file and loads it as one block, in the given order.
pub(crate) fn load_files(args: &ArgMatches) -> Result<CaptureModule, JcapCLIError> {
    let mut buffers: Vec<Vec<u8>> = Vec::new();
    if let Some(files) = args.get_many::<String>("FILES") {
        for file_name in files {
            debug!("Reading {}", file_name);
            buffers.push(utils::read_capture_file(file_name)?);
        }
    }

    let mut module = CaptureModule::default();
    module.load(buffers)?;
    Ok(module)
}

/// Runs the selected subcommand. `Ok(false)` means the command ran, but found nothing.
pub fn launch(command: &ArgMatches, config: &Config) -> Result<bool, JcapCLIError> {
    CaptureModule::initialize()?;

    let result = match command.subcommand() {
        Some(("show", args)) => {
            let settings = show::ShowSettings::from(args);
            let module = load_files(args)?;
            show::execute(&module, &settings)?;
            true
        },
        Some(("field", args)) => {
            let Some(path) = args.get_one::<String>("PATH") else {
                return Err(JcapCLIError::from("argument 'PATH' is required"));
            };
            let module = load_files(args)?;
            show::print_field(&module, path)
        },
        Some(("check", args)) => {
            let settings = check::CheckSettings::try_from((args, config))?;
            let module = load_files(args)?;
            check::execute(&module, &settings)
        },
        _ => {
            return Err(JcapCLIError::from("unknown subcommand, see 'jcap help'"));
        }
    };

    CaptureModule::finalize()?;
    Ok(result)
}
