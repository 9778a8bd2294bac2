//! CLI for authprobe.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{run_completions, run_get, run_interactive, GetArgs};

/// Exit code when the request itself failed (alerts already shown).
pub const EXIT_REQUEST_FAILED: i32 = 2;

/// Top-level CLI for authprobe.
#[derive(Debug, Parser)]
#[command(name = "authprobe")]
#[command(about = "authprobe: one Basic-auth GET, raw response printed", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Issue one authenticated GET and print the raw response body.
    Get {
        /// Server URL (falls back to `default_url` in config).
        #[arg(long)]
        url: Option<String>,
        /// Username (falls back to `default_username` in config).
        #[arg(long, short = 'u')]
        username: Option<String>,
        /// Password.
        #[arg(long, short = 'p', env = "AUTHPROBE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Render into this file instead of stdout (truncated on each run).
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
        /// Connect timeout in seconds (overrides config).
        #[arg(long, value_name = "SECS")]
        connect_timeout: Option<u64>,
        /// Whole-transfer timeout in seconds (overrides config).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Prompt for URL, username and password repeatedly; each round is a new request.
    ///
    /// The password echoes as it is typed.
    Interactive {
        /// Render into this file instead of stdout.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    /// Parses arguments and runs the command. Returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(0);
        }

        let cfg = authprobe_core::config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let ok = match cli.command {
            CliCommand::Get {
                url,
                username,
                password,
                output,
                connect_timeout,
                timeout,
            } => {
                let args = GetArgs {
                    url,
                    username,
                    password,
                    output,
                    connect_timeout,
                    timeout,
                };
                run_get(&cfg, args).await?
            }
            CliCommand::Interactive { output } => run_interactive(&cfg, output).await?,
            CliCommand::Completions { .. } => true,
        };

        Ok(if ok { 0 } else { EXIT_REQUEST_FAILED })
    }
}
