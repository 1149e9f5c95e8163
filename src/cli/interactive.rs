//! Line-driven converter session over any async reader.
//!
//! Conversions run in spawned tasks so `from`, `to` and `swap` can be issued
//! while rates are still loading, the same way taps keep arriving on a screen.

use super::ui;
use crate::core::{ConversionController, ConversionError};
use anyhow::{Result, anyhow, bail};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  amount <value>   set the amount (a bare number works too)
  from <code>      select the source currency
  to <code>        select the target currency
  swap             exchange source and target, clearing the result
  convert          fetch the rate and convert
  wait             wait for a running conversion to finish
  show             print the current state
  list             list supported currencies
  help             print this help
  quit             leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Amount(String),
    From(String),
    To(String),
    Swap,
    Convert,
    Wait,
    Show,
    List,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match (word.to_lowercase().as_str(), rest) {
        ("amount" | "a", value) => SessionCommand::Amount(value.to_string()),
        ("from" | "f", "") | ("to" | "t", "") => bail!("Missing currency code for '{word}'"),
        ("from" | "f", code) => SessionCommand::From(code.to_string()),
        ("to" | "t", code) => SessionCommand::To(code.to_string()),
        ("swap" | "s", "") => SessionCommand::Swap,
        ("convert" | "c", "") => SessionCommand::Convert,
        ("wait" | "w", "") => SessionCommand::Wait,
        ("show", "") => SessionCommand::Show,
        ("list" | "l", "") => SessionCommand::List,
        ("help" | "h" | "?", "") => SessionCommand::Help,
        ("quit" | "q" | "exit", "") => SessionCommand::Quit,
        _ if rest.is_empty() && Decimal::from_str(word).is_ok() => {
            SessionCommand::Amount(word.to_string())
        }
        _ => return Err(anyhow!("Unknown command: {line}. Type 'help' for usage.")),
    };
    Ok(Some(command))
}

/// Runs the session until `quit` or end of input. Pending conversions are
/// awaited before returning.
pub async fn run<R>(controller: &ConversionController, reader: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    if let Some(warning) = controller.start().await {
        println!("{}", ui::style_text(&warning, ui::StyleType::Warning));
    }
    println!(
        "{}",
        ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle)
    );
    println!(
        "{}",
        ui::render_view(&controller.snapshot().await, controller.currencies())
    );

    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };
        debug!(?command, "Session command");

        match command {
            SessionCommand::Amount(value) => controller.set_amount(&value).await,
            SessionCommand::From(code) => report(controller.select_from(&code).await),
            SessionCommand::To(code) => report(controller.select_to(&code).await),
            SessionCommand::Swap => controller.swap().await,
            SessionCommand::Convert => {
                pending.retain(|handle| !handle.is_finished());
                if let Some(handle) = start_conversion(controller).await {
                    pending.push(handle);
                }
                continue;
            }
            SessionCommand::Wait => {
                finish_pending(&mut pending).await;
            }
            SessionCommand::Show => {}
            SessionCommand::List => {
                let view = controller.snapshot().await;
                println!(
                    "{}",
                    ui::currency_list(
                        controller.currencies(),
                        Some(view.from.as_str()),
                        Some(view.to.as_str())
                    )
                );
                continue;
            }
            SessionCommand::Help => {
                println!("{HELP}");
                continue;
            }
            SessionCommand::Quit => break,
        }

        println!(
            "{}",
            ui::render_view(&controller.snapshot().await, controller.currencies())
        );
    }

    finish_pending(&mut pending).await;
    Ok(())
}

fn report(result: std::result::Result<(), ConversionError>) {
    if let Err(e) = result {
        println!("{}", ui::style_text(&e.alert_message(), ui::StyleType::Error));
    }
}

async fn start_conversion(controller: &ConversionController) -> Option<JoinHandle<()>> {
    let view = controller.snapshot().await;
    if view.busy {
        report(Err(ConversionError::Busy));
        return None;
    }
    if !view.can_convert {
        report(Err(ConversionError::EmptyAmount));
        return None;
    }

    println!(
        "{}",
        ui::style_text(
            &format!("Fetching {} rates...", view.from),
            ui::StyleType::Subtle
        )
    );

    let controller = controller.clone();
    Some(tokio::spawn(async move {
        match controller.convert().await {
            Ok(Some(result)) => {
                println!("{}", ui::result_card(&result, controller.currencies()));
            }
            Ok(None) => println!(
                "{}",
                ui::style_text(
                    "Currencies changed while loading; the late rate was discarded.",
                    ui::StyleType::Subtle
                )
            ),
            Err(e) => report(Err(e)),
        }
    }))
}

async fn finish_pending(pending: &mut Vec<JoinHandle<()>>) {
    for outcome in join_all(pending.drain(..)).await {
        if let Err(e) = outcome {
            warn!(error = %e, "Conversion task failed");
            println!(
                "{}",
                ui::style_text("Conversion failed, please try again.", ui::StyleType::Error)
            );
        }
    }
}
