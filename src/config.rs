use shellexpand::tilde;
use crate::{matcher::HttpMethodFilter, utils::JcapError};
use serde_yaml as yml;
use std::{fs, path};
use serde::Deserialize;
use log::{LevelFilter, debug};
use log4rs::{
    self,
    append::{console::{ConsoleAppender, Target}, file::FileAppender},
    config::{Appender, Root},
    encode::pattern::PatternEncoder
};

pub const DEFAULT_CONFIG_PATH: &str = "~/.jcap/config.yaml";

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub debug_file: Option<String>,
    pub methods: HttpMethodFilter,
    pub color: bool
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "warn".to_string(),
            debug_file: None,
            methods: HttpMethodFilter::ANY,
            color: true
        }
    }
}

impl Config {
    /// Reads a YAML config. A missing file means defaults; the file is never created.
    pub fn from_file(config_name: &str) -> Result<Config, JcapError> {
        let config_name = tilde(config_name).to_string();
        let config_path = path::Path::new(&config_name);
        if !config_path.exists() {
            debug!("Config '{}' does not exist, using defaults", &config_name);
            return Ok(Config::default());
        }

        let file = fs::File::open(config_path)?;
        let config: Config = yml::from_reader(file)?;
        Ok(config)
    }

    /// Forced colouring, if any. Enabled colour is left to terminal detection.
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            None
        }
        else {
            Some(false)
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter, JcapError> {
        match self.log_level.parse::<LevelFilter>() {
            Ok(level) => Ok(level),
            Err(_) => Err(
                JcapError::ConfigError(
                    format!("Unknown log level '{}', expected one of [off,error,warn,info,debug,trace]", &self.log_level)
                )
            )
        }
    }
}

// -----------------------------------------------------------------------------------------------//

/// Console logging to stderr at the configured level. With `debug_file` set, everything down to
/// debug also goes to that file.
pub fn init_logging(config: &Config) -> Result<(), JcapError> {
    let console_level = config.level_filter()?;
    let appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {m}{n}")))
        .build();

    let mut builder = log4rs::Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(log4rs::filter::threshold::ThresholdFilter::new(console_level)))
                .build("console", Box::new(appender))
        );
    let mut root = Root::builder().appender("console");
    let mut root_level = console_level;

    if let Some(debug_file) = config.debug_file.as_ref() {
        let file_appender = match FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d} {l} {t} - {m}{n}")))
            .build(tilde(debug_file).to_string())
        {
            Ok(file_appender) => {
                file_appender
            },
            Err(e) => {
                return Err(
                    JcapError::IOError(
                        format!("Cannot configure debug logger to file '{}': {}", debug_file, e)
                    )
                );
            }
        };

        builder = builder.appender(Appender::builder().build("debug_file", Box::new(file_appender)));
        root = root.appender("debug_file");
        root_level = LevelFilter::Debug.max(console_level);
    }

    let log_config = match builder.build(root.build(root_level)) {
        Ok(log_config) => log_config,
        Err(e) => return Err(JcapError::ConfigError(e.to_string()))
    };

    if let Err(e) = log4rs::init_config(log_config) {
        return Err(JcapError::ConfigError(e.to_string()));
    }

    debug!("Logging initialized");
    Ok(())
}
