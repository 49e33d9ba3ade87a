// CLI module for serving and administrative operations

pub mod create_admin;
pub mod migrate;

use clap::{Parser, Subcommand};

/// visitdesk visitor management backend
#[derive(Parser, Debug)]
#[command(name = "visitdesk")]
#[command(about = "Visitor management backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create an admin account with a generated password
    CreateAdmin {
        /// Username for the new admin
        #[arg(long)]
        username: String,

        /// Display name for the new admin
        #[arg(long)]
        full_name: String,
    },
}

impl Cli {
    /// Subcommand to run; `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["visitdesk"]).unwrap();
        assert_eq!(cli.command(), Commands::Serve);
    }

    #[test]
    fn test_parses_create_admin() {
        let cli = Cli::try_parse_from([
            "visitdesk",
            "create-admin",
            "--username",
            "root",
            "--full-name",
            "Site Admin",
        ])
        .unwrap();

        assert_eq!(
            cli.command(),
            Commands::CreateAdmin {
                username: "root".to_string(),
                full_name: "Site Admin".to_string(),
            }
        );
    }

    #[test]
    fn test_create_admin_requires_username() {
        assert!(Cli::try_parse_from(["visitdesk", "create-admin", "--full-name", "x"]).is_err());
    }
}
