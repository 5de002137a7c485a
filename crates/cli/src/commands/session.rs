//! Interactive cart session.
//!
//! Plays the purchase and cart pages against one [`CartStore`]: commands are
//! read one per line, and every committed mutation re-renders the cart via a
//! store subscription, the same way the cart page re-renders on change.
//!
//! # Usage
//!
//! ```bash
//! # Type commands interactively
//! shieldsync session
//!
//! # Replay a script and print JSON snapshots
//! shieldsync session --input demo.cart --json
//! ```
//!
//! # Commands
//!
//! - `add <id>` - Add one unit of a catalog plan
//! - `remove <id>` - Remove a plan from the cart
//! - `set <id> <qty>` - Set the quantity of a plan already in the cart
//! - `clear` - Empty the cart
//! - `show` / `total` - Print the cart or its total
//! - `catalog` - List the plans on sale
//! - `history` - Print the most recent notifications (up to 100)
//! - `help`, `quit`
//!
//! Blank lines and lines starting with `#` are ignored.

use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use std::sync::{Arc, Mutex, PoisonError};

use shieldsync_core::{CartSnapshot, CartStore, Catalog, ProductId, RecordingNotifier};
use thiserror::Error;
use tracing::{debug, warn};

use crate::render;

const HELP: &str = "\
Commands:
  add <id>          add one unit of a plan
  remove <id>       remove a plan from the cart
  set <id> <qty>    set the quantity of a plan in the cart (0 removes it)
  clear             empty the cart
  show              print the cart
  total             print the cart total
  catalog           list the plans on sale
  history           print the notifications shown so far
  help              print this help
  quit              end the session";

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// A line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{value}' is not a whole number: {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// One session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(ProductId),
    Remove(ProductId),
    Set(ProductId, i64),
    Clear,
    Show,
    Total,
    Catalog,
    History,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines and comments yield `None`.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the line is not a valid command.
    pub fn parse_line(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" => Self::Add(product_arg(&mut words, "add")?),
            "remove" | "rm" => Self::Remove(product_arg(&mut words, "remove")?),
            "set" => {
                let id = product_arg(&mut words, "set")?;
                let value = words.next().ok_or(CommandError::MissingArgument {
                    command: "set",
                    argument: "quantity",
                })?;
                let quantity = value
                    .parse::<i64>()
                    .map_err(|source| CommandError::InvalidNumber {
                        value: value.to_string(),
                        source,
                    })?;
                Self::Set(id, quantity)
            }
            "clear" => Self::Clear,
            "show" | "cart" => Self::Show,
            "total" => Self::Total,
            "catalog" | "plans" => Self::Catalog,
            "history" => Self::History,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }
        Ok(Some(command))
    }

    const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Add(_) | Self::Remove(_) | Self::Set(..) | Self::Clear
        )
    }
}

fn product_arg<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<ProductId, CommandError> {
    words
        .next()
        .map(ProductId::from)
        .ok_or(CommandError::MissingArgument {
            command,
            argument: "product id",
        })
}

/// What a session works against.
pub struct SessionContext<'a> {
    pub store: &'a CartStore,
    pub catalog: &'a Catalog,
    pub history: &'a RecordingNotifier,
    /// Render snapshots as JSON lines instead of tables
    pub json: bool,
}

/// Outcome of a finished session.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Commands executed, including ones that failed
    pub commands: usize,
    /// Lines that could not be parsed or executed
    pub errors: usize,
    pub snapshot: CartSnapshot,
}

/// Run commands from `input` until it ends or `quit` is read.
///
/// # Errors
///
/// Returns `SessionError` if reading input or writing output fails. Invalid
/// commands are reported on `output` and do not end the session.
pub fn run<R, W>(
    ctx: &SessionContext<'_>,
    input: R,
    output: Arc<Mutex<W>>,
) -> Result<SessionSummary, SessionError>
where
    R: BufRead,
    W: Write + Send + 'static,
{
    let renderer = Arc::clone(&output);
    let json = ctx.json;
    let subscription = ctx.store.subscribe(move |snapshot| {
        if let Err(e) = with_output(&renderer, |out| render::snapshot(out, snapshot, json)) {
            warn!(error = %e, "Failed to render cart");
        }
    });

    let mut commands = 0;
    let mut errors = 0;

    for line in input.lines() {
        let line = line?;
        let command = match Command::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                errors += 1;
                report(&output, &e)?;
                continue;
            }
        };

        commands += 1;
        debug!(?command, mutation = command.is_mutation(), "Running session command");

        match command {
            Command::Add(id) => match ctx.catalog.get(&id) {
                Ok(product) => ctx.store.add_item(product.to_cart_item()),
                Err(e) => {
                    errors += 1;
                    report(&output, &e)?;
                }
            },
            Command::Remove(id) => ctx.store.remove_item(&id),
            Command::Set(id, quantity) => {
                if let Err(e) = ctx.store.update_quantity(&id, quantity) {
                    errors += 1;
                    report(&output, &e)?;
                }
            }
            Command::Clear => ctx.store.clear_cart(),
            Command::Show => {
                let snapshot = ctx.store.snapshot();
                with_output(&output, |out| render::snapshot(out, &snapshot, ctx.json))?;
            }
            Command::Total => {
                let line = render::total_line(&ctx.store.snapshot());
                with_output(&output, |out| writeln!(out, "{line}"))?;
            }
            Command::Catalog => with_output(&output, |out| render::catalog(out, ctx.catalog))?,
            Command::History => {
                let entries = ctx.history.entries();
                with_output(&output, |out| {
                    if entries.is_empty() {
                        return writeln!(out, "No notifications yet");
                    }
                    for entry in &entries {
                        writeln!(out, "[{}] {}", entry.severity, entry.message)?;
                    }
                    Ok(())
                })?;
            }
            Command::Help => with_output(&output, |out| writeln!(out, "{HELP}"))?,
            Command::Quit => break,
        }
    }

    subscription.unsubscribe();

    Ok(SessionSummary {
        commands,
        errors,
        snapshot: ctx.store.snapshot(),
    })
}

fn report<W: Write>(output: &Mutex<W>, error: &dyn std::error::Error) -> io::Result<()> {
    warn!(error = %error, "Session command failed");
    with_output(output, |out| writeln!(out, "error: {error}"))
}

fn with_output<W: Write>(
    output: &Mutex<W>,
    f: impl FnOnce(&mut W) -> io::Result<()>,
) -> io::Result<()> {
    let mut out = output.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut out)?;
    out.flush()
}
