use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use backstage_store::ChatSession;

mod commands;
mod config;
mod render;

use commands::Command;
use config::ChatConfig;

/// Demo entry point. One session per process: the store is provided here,
/// before any consumer reads it, and torn down when the loop exits.
fn main() {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(ChatConfig::default_config_path);
    let config = ChatConfig::load(&config_path);

    let session = match ChatSession::new(config.into_initial_state()) {
        Ok(session) => session,
        Err(error) => {
            tracing::error!("failed to start chat session: {error}");
            return;
        }
    };
    let handle = session.handle();

    if let Ok(store) = handle.store() {
        let _ = store.subscribe(|event, snapshot| {
            tracing::debug!(?event, messages = snapshot.messages.len(), "state changed");
        });
        println!("{}", render::render(&store.snapshot()));
    }
    println!("\ntype 'help' for commands");

    prompt();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            prompt();
            continue;
        }

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => match commands::apply(&command, &handle) {
                Ok(output) => println!("{output}"),
                // Rejected mutations have no visible effect beyond this line.
                Err(error) => println!("! {error}"),
            },
            Err(error) => println!("! {error}"),
        }
        prompt();
    }
}

fn prompt() {
    print!("> ");
    io::stdout().flush().ok();
}
