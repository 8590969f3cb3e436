//! Scenario (configuration) file parsing.
//!
//! The format is line-oriented, one directive per line:
//!
//! ```text
//! description Two honest miners, one slow link
//! miner 0.5 honest
//! miner 0.5 malicious
//! biconnect 0 1 5
//! ```
//!
//! Blank lines and `#` comments are skipped; a leading `--` on a directive
//! is tolerated for older files. Semantic validation (power sum, link
//! indexes) is [`Scenario::validate`]'s job and runs as part of loading.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use sim_engine::{LinkSpec, MinerBehavior, MinerSpec, Scenario, ScenarioError};

/// Configuration-file loading failures; all fatal before simulation state
/// is created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Directive {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Invalid(#[from] ScenarioError),
}

/// Reads and fully validates a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let scenario = parse_scenario(&text, path)?;
    scenario.validate()?;
    Ok(scenario)
}

fn parse_scenario(text: &str, path: &Path) -> Result<Scenario, ConfigError> {
    let mut scenario = Scenario::default();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };

        match directive.trim_start_matches('-') {
            "description" => {
                let rest = tokens.collect::<Vec<_>>().join(" ");
                scenario.description = Some(rest);
            }
            "miner" => {
                let power = parse_token(path, line, tokens.next(), "relative mining power")?;
                let behavior = match tokens.next() {
                    Some("honest") => MinerBehavior::Honest,
                    Some("malicious") => MinerBehavior::Malicious,
                    Some(other) => {
                        return Err(directive_error(
                            path,
                            line,
                            format!("unknown miner behavior \"{other}\""),
                        ))
                    }
                    None => {
                        return Err(directive_error(path, line, "missing miner behavior".into()))
                    }
                };
                expect_end(path, line, tokens.next())?;
                scenario.miners.push(MinerSpec { power, behavior });
            }
            "biconnect" => {
                let a = parse_token(path, line, tokens.next(), "first miner index")?;
                let b = parse_token(path, line, tokens.next(), "second miner index")?;
                let latency = parse_token(path, line, tokens.next(), "link latency")?;
                expect_end(path, line, tokens.next())?;
                scenario.links.push(LinkSpec { a, b, latency });
            }
            other => {
                return Err(directive_error(
                    path,
                    line,
                    format!("unknown directive \"{other}\""),
                ))
            }
        }
    }

    Ok(scenario)
}

fn parse_token<T: std::str::FromStr>(
    path: &Path,
    line: usize,
    token: Option<&str>,
    what: &str,
) -> Result<T, ConfigError> {
    let token = token.ok_or_else(|| directive_error(path, line, format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| directive_error(path, line, format!("invalid {what} \"{token}\"")))
}

fn expect_end(path: &Path, line: usize, token: Option<&str>) -> Result<(), ConfigError> {
    match token {
        Some(extra) => Err(directive_error(
            path,
            line,
            format!("unexpected trailing token \"{extra}\""),
        )),
        None => Ok(()),
    }
}

fn directive_error(path: &Path, line: usize, message: String) -> ConfigError {
    ConfigError::Directive {
        path: path.to_path_buf(),
        line,
        message,
    }
}
