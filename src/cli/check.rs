use clap::ArgMatches;
use colored::Colorize;
use regex::Regex;

use crate::{config::Config, matcher::HttpMethodFilter, module::CaptureModule};
use super::JcapCLIError;

#[derive(Debug)]
pub(crate) struct CheckSettings {
    pub(crate) pattern: Regex,
    pub(crate) methods: HttpMethodFilter
}

impl TryFrom<(&ArgMatches, &Config)> for CheckSettings {
    type Error = JcapCLIError;
    fn try_from(value: (&ArgMatches, &Config)) -> Result<Self, Self::Error> {
        let (args, config) = value;
        let Some(re_str) = args.get_one::<String>("REGEX") else {
            return Err(JcapCLIError::from("argument 'REGEX' is required"));
        };

        let pattern = Regex::new(re_str)?;
        let methods = match args.get_one::<String>("methods") {
            Some(methods) => methods.parse::<HttpMethodFilter>()?,
            None => config.methods
        };

        Ok(CheckSettings { pattern, methods })
    }
}

pub(crate) fn execute(module: &CaptureModule, settings: &CheckSettings) -> bool {
    let matched = module.check(&settings.pattern, settings.methods) == 1;
    let verdict = if matched {
        "match".green()
    }
    else {
        "no match".red()
    };

    println!("check.http_{}(/{}/) = {}", settings.methods.to_string().replace("any", "request"), settings.pattern, verdict);
    return matched;
}
