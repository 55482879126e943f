//! Command-line interface for linkboard.

use clap::{Parser, Subcommand};

/// linkboard - a small link-sharing board with a JSON API
#[derive(Parser)]
#[command(name = "linkboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "s")]
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// The command to run, falling back to `serve`.
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::parse_from(["linkboard"]);
        assert_eq!(cli.command(), &Commands::Serve);
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::parse_from(["linkboard", "migrate"]);
        assert_eq!(cli.command(), &Commands::Migrate);

        let cli = Cli::parse_from(["linkboard", "config"]);
        assert_eq!(cli.command(), &Commands::Config);
    }
}
