//! nlterm - interactive terminal that accepts shell commands or plain English
//!
//! Without `-c` this runs a read-eval-print loop until `exit` or end of input.

use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use nlterm::command::{Dispatcher, Response};
use nlterm::core::config::{NlpMode, TerminalConfig};
use nlterm::core::error::Result;
use nlterm::core::types::Control;
use nlterm::host::SystemHost;
use nlterm::session::Session;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Simulated command terminal with natural language commands
#[derive(Parser, Debug)]
#[command(name = "nlterm")]
#[command(about = "Run shell-style commands or describe them in plain English")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Natural language routing: off, optional or only
    #[arg(long)]
    nlp_mode: Option<NlpMode>,

    /// Run a single line and exit with its status
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Print each response as JSON
    #[arg(long)]
    json: bool,
}

/// `--json` output: the response plus the prompt to show next
#[derive(Serialize)]
struct JsonReply<'a> {
    #[serde(flatten)]
    response: &'a Response,
    prompt: String,
}

fn load_config(args: &Args) -> Result<TerminalConfig> {
    let mut config = match &args.config {
        Some(path) => TerminalConfig::load(path)?,
        None => TerminalConfig::default(),
    };
    config.apply_env()?;
    if let Some(mode) = args.nlp_mode {
        config.nlp.mode = mode;
    }
    config.validate()?;
    Ok(config)
}

fn print_response(
    response: &Response,
    session: &Session,
    host_name: &str,
    json: bool,
) -> Result<()> {
    if json {
        let reply = JsonReply {
            response,
            prompt: session.prompt(host_name),
        };
        println!("{}", serde_json::to_string(&reply)?);
        return Ok(());
    }
    if !response.output.is_empty() {
        println!("{}", response.output);
    }
    if let Some(error) = &response.error {
        eprintln!("{}", error);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .with_writer(io::stderr)
        .init();

    let json = args.json;
    let dispatcher = Dispatcher::standard(config);
    let mut session = Session::from_env()?;
    let host_name = SystemHost::host_name();

    tracing::info!(session = %session.id, mode = ?dispatcher.config().nlp.mode, "session started");

    if let Some(line) = args.command {
        let response = dispatcher.dispatch(&mut session, &line);
        print_response(&response, &session, &host_name, json)?;
        std::process::exit(response.status);
    }

    if !json {
        println!("Natural language terminal. Type 'help' for commands or 'nlp help' for examples.");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock();
    loop {
        if !json {
            print!("{}", session.prompt(&host_name));
            stdout.flush()?;
        }

        let mut line = String::new();
        if lines.read_line(&mut line)? == 0 {
            break;
        }

        let response = dispatcher.dispatch(&mut session, line.trim_end_matches(['\n', '\r']));
        match response.control {
            Some(Control::Clear) if !json => {
                crossterm::execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
            }
            Some(Control::Exit) => {
                print_response(&response, &session, &host_name, json)?;
                break;
            }
            _ => print_response(&response, &session, &host_name, json)?,
        }
    }

    if !json {
        println!("Goodbye!");
    }
    tracing::info!(session = %session.id, commands = session.history.len(), "session ended");
    Ok(())
}
