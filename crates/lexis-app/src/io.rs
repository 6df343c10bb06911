use std::io::BufRead;

use kanal::Sender;
use lexis_types::{AppEvent, EntryRef};

/// Turn one input line into an intent.
///
/// Plain text is a lookup; lines starting with `:` are commands. Blank lines
/// are forwarded as lookups so the controller can reject them.
pub fn parse_command(line: &str) -> Result<AppEvent, String> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Ok(AppEvent::Submit(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "list" | "ls" => Ok(AppEvent::ShowList),
        "show" | "s" => entry_ref(arg).map(AppEvent::Select),
        "rm" | "del" | "delete" => entry_ref(arg).map(AppEvent::Delete),
        "refresh" | "r" => Ok(AppEvent::Refresh),
        "help" | "h" | "?" => Ok(AppEvent::Help),
        "quit" | "q" | "exit" => Ok(AppEvent::Quit),
        other => Err(format!("Unknown command ':{other}'")),
    }
}

fn entry_ref(arg: &str) -> Result<EntryRef, String> {
    if arg.is_empty() {
        return Err("Expected a list number or a word".to_string());
    }
    Ok(match arg.parse::<usize>() {
        Ok(n) => EntryRef::Index(n),
        Err(_) => EntryRef::Word(arg.to_string()),
    })
}

/// Forward input lines until EOF, then ask the app to quit.
///
/// Runs on its own thread; a blocking stdin read must not hold up runtime
/// shutdown.
pub fn read_input<R: BufRead>(reader: R, tx: Sender<AppEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };

        let event = match parse_command(&line) {
            Ok(event) => event,
            Err(message) => {
                tracing::warn!("{}", message);
                AppEvent::Help
            }
        };

        let quit = event == AppEvent::Quit;
        if tx.send(event).is_err() {
            tracing::debug!("Input channel closed");
            return;
        }
        if quit {
            return;
        }
    }

    tracing::info!("Input closed");
    if tx.send(AppEvent::Quit).is_err() {
        tracing::debug!("Input channel closed before quit");
    }
}
