use std::process::exit;

use jcap::{cli, config};
use log::debug;

fn main() {
    let command = cli::build().get_matches();

    let config_name = command
        .get_one::<String>("config")
        .map(|s| s.as_str())
        .unwrap_or(config::DEFAULT_CONFIG_PATH);

    let mut config = match config::Config::from_file(config_name) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Could not load config '{}': {}", config_name, err);
            exit(2);
        }
    };

    if let Some(dfile) = command.get_one::<String>("debug-file") {
        config.debug_file = Some(dfile.to_string());
    }

    if let Err(err) = config::init_logging(&config) {
        eprintln!("{}", err);
        exit(2);
    }

    if let Some(color) = config.color_override() {
        colored::control::set_override(color);
    }
    debug!("Config: {:?}", &config);

    match cli::launch(&command, &config) {
        Ok(true) => {},
        Ok(false) => {
            exit(1);
        },
        Err(err) => {
            let err_str: String = err.into();
            eprintln!("Error: {}", err_str);
            exit(2);
        }
    }
}
