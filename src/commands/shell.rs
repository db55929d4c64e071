//! Interactive editing shell.
//!
//! Keeps one session open so several transformations, imports and direct
//! edits can be combined before a single save. Whitelist changes made here
//! are written to the config file when the shell exits.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::cmd_abstraction::RealCommandExecutor;
use crate::document::Document;
use crate::flush::flush_dns;
use crate::operator::{ask_yes_no, ReviewMode};
use crate::privilege::warn_if_unprivileged;
use crate::validation::validate_hostname;

use super::import::{fetcher_for, resolve_source};
use super::status::print_status;
use super::{open_session, restore_and_record, save_and_record, ConsoleSession};

const HELP: &str = "\
Commands:
  show                    print the document with line numbers
  add <line>              append a line
  del <n>                 delete line n
  clean                   canonicalize, sort and dedup entries
  dedup                   remove repeated entries, keeping order
  filter                  remove whitelisted entries
  remove <keyword>        pick and remove lines containing keyword
  import-url <name|url>   append a remote list
  import-log <path>       append hostnames from a DNSBL log
  save                    clean and write the hosts file (with backup)
  restore                 revert the hosts file to its backup
  reload                  re-read the hosts file
  status                  show counts and applied state
  flush-dns               flush the OS DNS cache
  whitelist               list whitelisted hostnames
  whitelist add <host>    add a hostname to the whitelist
  whitelist del <host>    remove a hostname from the whitelist
  help                    show this help
  quit                    leave the shell";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Show,
    Add(String),
    Delete(usize),
    Clean,
    Dedup,
    Filter,
    Remove(String),
    ImportUrl(String),
    ImportLog(PathBuf),
    Save,
    Restore,
    Reload,
    Status,
    FlushDns,
    WhitelistList,
    WhitelistAdd(String),
    WhitelistDel(String),
    Help,
    Quit,
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse_command(input: &str) -> Result<Option<ShellCommand>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };

    let required = |usage: &str| {
        if rest.is_empty() {
            Err(format!("Usage: {}", usage))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_lowercase().as_str() {
        "show" | "list" => ShellCommand::Show,
        "add" => ShellCommand::Add(required("add <line>")?),
        "del" | "delete" => {
            let number = required("del <n>")?;
            let number = number
                .parse::<usize>()
                .map_err(|_| format!("Not a line number: {}", number))?;
            ShellCommand::Delete(number)
        }
        "clean" => ShellCommand::Clean,
        "dedup" => ShellCommand::Dedup,
        "filter" => ShellCommand::Filter,
        "remove" => ShellCommand::Remove(required("remove <keyword>")?),
        "import-url" => ShellCommand::ImportUrl(required("import-url <name|url>")?),
        "import-log" => ShellCommand::ImportLog(PathBuf::from(required("import-log <path>")?)),
        "save" => ShellCommand::Save,
        "restore" => ShellCommand::Restore,
        "reload" => ShellCommand::Reload,
        "status" => ShellCommand::Status,
        "flush-dns" => ShellCommand::FlushDns,
        "whitelist" => match rest.split_once(char::is_whitespace) {
            None if rest.is_empty() || rest == "list" => ShellCommand::WhitelistList,
            Some(("add", host)) => ShellCommand::WhitelistAdd(host.trim().to_string()),
            Some(("del", host)) => ShellCommand::WhitelistDel(host.trim().to_string()),
            _ => return Err("Usage: whitelist [list | add <host> | del <host>]".to_string()),
        },
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(Some(command))
}

/// Run the interactive shell
pub async fn run(config_path: &Path) -> Result<()> {
    warn_if_unprivileged();
    let mut session = open_session(config_path, ReviewMode::Interactive)?;
    let initial_config = session.config().clone();
    println!("Type 'help' for commands.");

    loop {
        print!("hostscrub> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let command = match parse_command(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        if command == ShellCommand::Quit {
            let unsaved = !session.is_applied() && !session.document().is_empty();
            if unsaved && !ask_yes_no("You have unsaved changes. Quit anyway?") {
                continue;
            }
            break;
        }

        if let Err(e) = execute(&mut session, command).await {
            error!("{:#}", e);
        }
    }

    if session.config() != &initial_config {
        session.config().save(config_path)?;
        info!("Saved configuration to {}", config_path.display());
    }
    Ok(())
}

async fn execute(session: &mut ConsoleSession, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Show => print_document(session.document()),
        ShellCommand::Add(line) => {
            session.append_line(&line);
            println!("Added line {}", session.document().len());
        }
        ShellCommand::Delete(number) => {
            let removed = session.delete_line(number)?;
            println!("Deleted line {}: {}", number, removed);
        }
        ShellCommand::Clean => {
            session.clean()?;
        }
        ShellCommand::Dedup => {
            session.deduplicate()?;
        }
        ShellCommand::Filter => {
            session.filter_whitelist()?;
        }
        ShellCommand::Remove(keyword) => {
            session.remove_keyword(&keyword)?;
        }
        ShellCommand::ImportUrl(source) => {
            let (origin, url) = resolve_source(session.config(), &source)?;
            let fetcher = fetcher_for(session.config())?;
            session.import_remote(&fetcher, &origin, &url).await?;
        }
        ShellCommand::ImportLog(path) => {
            session.import_log(&path)?;
        }
        ShellCommand::Save => {
            save_and_record(session)?;
        }
        ShellCommand::Restore => {
            restore_and_record(session)?;
        }
        ShellCommand::Reload => {
            session.reload()?;
        }
        ShellCommand::Status => print_status(session),
        ShellCommand::FlushDns => {
            flush_dns(&RealCommandExecutor::new())?;
            println!("[OK] DNS cache flushed");
        }
        ShellCommand::WhitelistList => {
            let whitelist = session.config().whitelist_set();
            println!("Whitelist ({} entries):", whitelist.len());
            for host in whitelist.sorted() {
                println!("  {}", host);
            }
        }
        ShellCommand::WhitelistAdd(host) => {
            validate_hostname(&host)?;
            if session.config_mut().add_whitelist_host(&host) {
                println!("[OK] Added {} to whitelist", host);
            } else {
                println!("{} is already in the whitelist", host);
            }
        }
        ShellCommand::WhitelistDel(host) => {
            if session.config_mut().remove_whitelist_host(&host) {
                println!("[OK] Removed {} from whitelist", host);
            } else {
                println!("{} was not in the whitelist", host);
            }
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn print_document(document: &Document) {
    if document.is_empty() {
        println!("  (empty)");
        return;
    }
    for (number, line) in document.lines().iter().enumerate() {
        println!("{:>6}  {}", number + 1, line);
    }
}
