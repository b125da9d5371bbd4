use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use askdocs::config;
use askdocs::gateway::BackendGateway;
use askdocs::orchestrator::{AssistantError, QueryOrchestrator};
use askdocs::session::ConversationSession;

/// CLI helper for rustyline that completes and hints slash commands.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/ingest".to_string(),
                "/history".to_string(),
                "/reset".to_string(),
                "/help".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_help() {
    println!("{}", "Ask a question by typing it directly.".bright_black());
    println!(
        "{}",
        "  /ingest <url>   index a new documentation source".bright_black()
    );
    println!(
        "{}",
        "  /history        show this session's exchanges".bright_black()
    );
    println!(
        "{}",
        "  /reset          start a fresh session".bright_black()
    );
    println!("{}", "  /help           show this message".bright_black());
    println!("{}", "  quit | exit     leave".bright_black());
}

fn print_answer(answer: &str) {
    for line in answer.lines() {
        println!("{}", line.bright_blue());
    }
    println!();
}

fn print_history(session: &ConversationSession) {
    if session.is_empty() {
        println!("{}", "No exchanges yet.".bright_black());
        return;
    }
    println!(
        "{}",
        format!(
            "Session started {}, {} exchange(s):",
            session.started_at().format("%H:%M:%S"),
            session.exchange_count()
        )
        .bright_black()
    );
    for exchange in session.exchanges() {
        println!("{}", format!("> {}", exchange.prompt).green());
        print_answer(&exchange.answer);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    askdocs::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let gateway = BackendGateway::from_env();
    let orchestrator = QueryOrchestrator::new(&gateway);
    let mut session = ConversationSession::new();

    println!(
        "{}",
        format!("=== {} v{} ===", config::APP_NAME, config::APP_VERSION)
            .bright_magenta()
            .bold()
    );
    println!(
        "{}",
        "Ask about your documentation. '/help' lists commands, 'quit' exits.".bright_black()
    );

    // One probe at startup; the operator may bring the backend up later.
    match gateway.health().await {
        Ok(health) => {
            tracing::info!(status = %health.status, "Backend reachable");
            let service = health.service.as_deref().unwrap_or("backend");
            println!(
                "{}",
                format!("Connected to {} at {}", service, gateway.base_url()).bright_black()
            );
        }
        Err(e) => {
            println!(
                "{}",
                format!(
                    "Warning: backend not reachable at {} ({e}). Queries will fail until it is up.",
                    gateway.base_url()
                )
                .yellow()
            );
        }
    }
    println!();

    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                let _ = rl.add_history_entry(&line);

                if trimmed.starts_with('/') {
                    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
                        Some((command, rest)) => (command, rest.trim()),
                        None => (trimmed, ""),
                    };

                    match command {
                        "/help" => print_help(),
                        "/history" => print_history(&session),
                        "/reset" => {
                            session.reset();
                            println!("{}", "Session cleared.".bright_green());
                        }
                        "/ingest" => {
                            if !rest.is_empty() {
                                println!("{}", "Starting ingestion process...".bright_black());
                            }
                            match orchestrator.ingest(rest).await {
                                Ok(ack) => {
                                    println!("{}", ack.ack_message().bright_green());
                                    println!(
                                        "{}",
                                        "The ingestion runs in the background and may take \
                                         several minutes depending on the documentation size."
                                            .bright_black()
                                    );
                                }
                                Err(AssistantError::EmptyUrl) => {
                                    println!("{}", "Usage: /ingest <url>".yellow());
                                }
                                Err(e) => eprintln!("{}", format!("Error: {e}").red()),
                            }
                        }
                        _ => println!(
                            "{}",
                            "Unknown command. Type /help for commands.".bright_black()
                        ),
                    }
                    continue;
                }

                // The exchange blocks the prompt until the backend answers;
                // there is never more than one request in flight.
                println!("{}", "Generating response...".bright_black());
                match orchestrator.submit(&mut session, trimmed).await {
                    Ok(answer) => print_answer(&answer),
                    Err(e) => eprintln!("{}", format!("Error: {e}").red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Input error: {err}").red());
                break;
            }
        }
    }

    Ok(())
}
