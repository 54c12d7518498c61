//! Command-line front end for the agent switchboard.
//!
//! ```text
//! switchyard register --name Echo --kind shell_command \
//!     --detail description="echo service" --detail command=echo
//! switchyard route "echo this back"
//! switchyard list
//! ```
//!
//! Records are printed as JSON with secret details redacted. Configuration
//! comes from `--config`, then `SWITCHYARD__*` environment variables.

use std::io::{self, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use switchyard::{
    config::ConfigLoader,
    registry::domain::{AgentDetails, AgentId, AgentRecord},
    routing::{AnalyzedRequest, StopwordTokenizer, Tokenizer},
    switchboard::{self, FileSwitchboard, RegisterAgentRequest, SwitchboardError},
    telemetry,
};
use tokio::runtime::Builder;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Register agents and route requests to them.
#[derive(Parser, Debug)]
#[command(name = "switchyard", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new agent and print its identifier
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Kind: remote_api, script_bot, shell_command, custom_handler
        /// (legacy labels such as "Local AI" are accepted)
        #[arg(long)]
        kind: String,

        /// Detail as key=value; repeat for several
        #[arg(long = "detail", value_name = "KEY=VALUE", value_parser = parse_detail)]
        details: Vec<(String, String)>,
    },

    /// Merge details into an existing agent
    Modify {
        /// Agent identifier
        id: String,

        /// Detail as key=value; repeat for several
        #[arg(long = "detail", value_name = "KEY=VALUE", value_parser = parse_detail, required = true)]
        details: Vec<(String, String)>,
    },

    /// Remove an agent
    Unregister {
        /// Agent identifier
        id: String,
    },

    /// Print one agent
    Fetch {
        /// Agent identifier
        id: String,
    },

    /// Print every agent
    List,

    /// Select an agent for the text and print its result
    Route {
        /// Request text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Selection token; replaces the built-in tokenizer when given
        #[arg(long = "token", value_name = "TOKEN")]
        tokens: Vec<String>,
    },
}

fn parse_detail(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

fn parse_id(raw: &str) -> Result<AgentId, SwitchboardError> {
    Ok(AgentId::parse(raw)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), BoxError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn print_line(line: &str) -> Result<(), BoxError> {
    writeln!(io::stdout().lock(), "{line}")?;
    Ok(())
}

async fn run(board: &FileSwitchboard, command: Command) -> Result<(), BoxError> {
    match command {
        Command::Register {
            name,
            kind,
            details,
        } => {
            let request = RegisterAgentRequest::new(name, kind, details.into_iter().collect());
            let id = board.register(request).await?;
            print_line(&id.to_string())
        }
        Command::Modify { id, details } => {
            let agent_id = parse_id(&id)?;
            let patch: AgentDetails = details.into_iter().collect();
            board.modify_required(agent_id, patch).await?;
            print_line("updated")
        }
        Command::Unregister { id } => {
            board.unregister_required(parse_id(&id)?).await?;
            print_line("removed")
        }
        Command::Fetch { id } => {
            let record = board.fetch_required(parse_id(&id)?).await?;
            print_json(&record.redacted())
        }
        Command::List => {
            let records: Vec<AgentRecord> = board
                .enumerate()
                .await?
                .iter()
                .map(AgentRecord::redacted)
                .collect();
            print_json(&records)
        }
        Command::Route { text, tokens } => {
            let joined = text.join(" ");
            let request = if tokens.is_empty() {
                StopwordTokenizer::new().analyze(&joined)
            } else {
                AnalyzedRequest::new(joined, tokens)
            };
            let output = board.route(&request).await?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if !output.ends_with('\n') {
                writeln!(stdout)?;
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Nothing useful remains to be done if stderr is gone.
            let _ignored = writeln!(io::stderr().lock(), "switchyard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<(), BoxError> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let config = loader.load()?;
    telemetry::init_tracing(&config.logging)?;

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async {
        let board = switchboard::open(&config)?;
        run(&board, cli.command).await
    })
}
