use std::fmt::{self, Debug};
use std::path::PathBuf;

use eyre::{WrapErr, eyre};
use serde::Deserialize;
use tokio::fs;

// [FIXME] Serde does not support literals as default values yet: https://github.com/serde-rs/serde/issues/368
#[rustfmt::skip] const fn bool<const X: bool>() -> bool { X }

// Internal struct for command-line flags. Credentials may come from here, from the environment, or from a TOML file;
// the merged result is `Config`.
#[derive(Debug, clap::Parser)]
#[command(version, about, max_term_width = 100)]
pub struct Args {
    /// Path to a TOML file containing credentials and settings.
    #[arg(short, long, env = "INWX_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// INWX account username. Overrides the config file.
    #[arg(short, long, env = "INWX_USERNAME")]
    pub username: Option<String>,

    /// INWX account password. Overrides the config file.
    #[arg(long, env = "INWX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Two-factor TAN, for accounts that require one to unlock a session.
    #[arg(long, env = "INWX_TAN", hide_env_values = true)]
    pub tan: Option<String>,

    /// Use the INWX test environment (OT&E) instead of production.
    ///
    /// This command-line option force-enables the sandbox, regardless of what the 'sandbox' setting in the config file
    /// says.
    #[arg(long)]
    pub sandbox: bool,

    /// Controls the verbosity of logs.
    ///
    /// Possible log levels are 'error', 'warn', 'info', 'debug', and 'trace' (in that order).
    #[arg(long, env = "INWX_LOG_LEVEL", value_name = "LEVEL", default_value = "info")]
    pub log_level: log::LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Command {
    /// Show details of the logged-in account.
    Account,

    /// Check whether domains are available for registration.
    Check {
        #[arg(required = true, value_name = "DOMAIN")]
        domains: Vec<String>,
    },

    /// Inspect and change DNS records.
    #[command(subcommand)]
    Records(RecordsCommand),

    /// Inspect DNSSEC state.
    #[command(subcommand)]
    Dnssec(DnssecCommand),
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum RecordsCommand {
    /// List zones hosted on INWX nameservers.
    List {
        /// Only list zones matching this domain (wildcards allowed).
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Show the records of one or more zones.
    Show {
        #[arg(required = true, value_name = "DOMAIN")]
        domains: Vec<String>,
    },

    /// Find a record by its id, searching every zone.
    Find { id: i64 },

    /// Create a record.
    Add {
        domain: String,
        #[arg(value_name = "TYPE")]
        record_type: String,
        content: String,

        /// Record name; defaults to the zone apex.
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value_t = 3600)]
        ttl: u32,

        /// Priority, for MX and SRV records.
        #[arg(long)]
        prio: Option<u32>,
    },

    /// Delete a record by its id.
    Delete { id: i64 },
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum DnssecCommand {
    /// Show the DNSSEC status of domains.
    Info {
        #[arg(required = true, value_name = "DOMAIN")]
        domains: Vec<String>,
    },
}

/// The part of the configuration that can be stored in a file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    username: Option<String>,
    password: Option<String>,
    #[serde(default = "bool::<false>")]
    sandbox: bool,
}

/// Final program configuration: the config file with command-line and environment settings laid over it.
pub struct Config {
    pub username: String,
    pub password: String,
    pub tan: Option<String>,
    pub sandbox: bool,
}

impl Config {
    /// Loads runtime configuration from command line arguments and, if one was given, the configuration file.
    pub async fn from_args(args: &Args) -> eyre::Result<Self> {
        let file = match &args.config {
            Some(path) => {
                log::trace!("Reading configuration from {}", path.to_string_lossy());
                let text = fs::read_to_string(path).await.wrap_err("Failed to read config file")?;
                toml::from_str(&text).wrap_err("Failed to parse config file")?
            },
            None => ConfigFile::default(),
        };

        Self::merge(file, args).wrap_err("Invalid configuration")
    }

    /// Lays command-line settings over the ones from the config file.
    fn merge(file: ConfigFile, args: &Args) -> eyre::Result<Self> {
        let username = args
            .username
            .clone()
            .or(file.username)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| eyre!("No username given (use --username, INWX_USERNAME, or the config file)"))?;

        if username.chars().any(char::is_whitespace) {
            return Err(eyre!("Username may not contain whitespace"));
        }

        let password = args
            .password
            .clone()
            .or(file.password)
            .filter(|pass| !pass.is_empty())
            .ok_or_else(|| eyre!("No password given (use --password, INWX_PASSWORD, or the config file)"))?;

        Ok(Self {
            username,
            password,
            tan: args.tan.clone().filter(|tan| !tan.is_empty()),
            sandbox: args.sandbox || file.sandbox,
        })
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("sandbox", &self.sandbox)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["inwx"];
        argv.extend_from_slice(extra);
        argv.push("account");
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn file_settings_apply() {
        let file: ConfigFile = toml::from_str("username = \"alice\"\npassword = \"pw\"\nsandbox = true\n").unwrap();
        let config = Config::merge(file, &args(&[])).unwrap();
        assert_eq!(config.username, "alice");
        assert_eq!(config.password, "pw");
        assert!(config.sandbox);
        assert_eq!(config.tan, None);
    }

    #[test]
    fn command_line_overrides_file() {
        let file: ConfigFile = toml::from_str("username = \"alice\"\npassword = \"pw\"\n").unwrap();
        let config = Config::merge(file, &args(&["--username", "bob", "--sandbox", "--tan", "123456"])).unwrap();
        assert_eq!(config.username, "bob");
        assert_eq!(config.password, "pw");
        assert!(config.sandbox);
        assert_eq!(config.tan.as_deref(), Some("123456"));
    }

    #[test]
    fn missing_credentials_are_errors() {
        let err = Config::merge(ConfigFile::default(), &args(&["--password", "pw"])).unwrap_err();
        assert!(err.to_string().contains("No username"));

        let err = Config::merge(ConfigFile::default(), &args(&["--username", "alice"])).unwrap_err();
        assert!(err.to_string().contains("No password"));

        let err = Config::merge(ConfigFile::default(), &args(&["--username", "a b", "--password", "pw"])).unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        assert!(toml::from_str::<ConfigFile>("user = \"alice\"\n").is_err());
    }

    #[test]
    fn debug_hides_the_password() {
        let file: ConfigFile = toml::from_str("username = \"alice\"\npassword = \"hunter2\"\n").unwrap();
        let config = Config::merge(file, &args(&[])).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn parses_record_subcommands() {
        let args = Args::try_parse_from(["inwx", "records", "add", "example.com", "MX", "mail.example.com", "--prio", "10"])
            .unwrap();
        match args.command {
            Command::Records(RecordsCommand::Add {
                domain,
                record_type,
                ttl,
                prio,
                name,
                ..
            }) => {
                assert_eq!(domain, "example.com");
                assert_eq!(record_type, "MX");
                assert_eq!(ttl, 3600);
                assert_eq!(prio, Some(10));
                assert_eq!(name, None);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }
}
