//! Non-interactive `ask` and `refresh` commands.
//!
//! These print the same bot messages the chat view shows, typed out with the
//! same reveal timings unless animation is turned off.

use std::io::Write;

use anyhow::Result;
use colored::*;
use statchat_core::reveal::{Reveal, RevealStep};
use statchat_core::state::current_time_label;
use statchat_core::{
    StatsClient, ASK_FAILED_MESSAGE, REFRESH_DONE_MESSAGE, REFRESH_FAILED_MESSAGE,
    REFRESH_STARTED_MESSAGE,
};
use tokio::time::Instant;

pub async fn ask(out: &mut impl Write, client: &StatsClient, question: &str, animate: bool) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        return Ok(());
    }

    writeln!(out, "{}", "You:".bold().cyan())?;
    writeln!(out, "{}", question)?;
    writeln!(out, "{}", current_time_label().dimmed())?;
    writeln!(out)?;

    let answer = match client.ask(question).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!(error = %e, "question failed");
            ASK_FAILED_MESSAGE.to_string()
        }
    };
    print_bot_message(out, &answer, animate).await
}

pub async fn refresh(out: &mut impl Write, client: &StatsClient, animate: bool) -> Result<()> {
    // The request goes out while the notice is still being typed
    let (printed, refreshed) = tokio::join!(
        print_bot_message(out, REFRESH_STARTED_MESSAGE, animate),
        client.refresh_data(),
    );
    printed?;

    let message = match refreshed {
        Ok(()) => REFRESH_DONE_MESSAGE,
        Err(e) => {
            tracing::error!(error = %e, "data refresh failed");
            REFRESH_FAILED_MESSAGE
        }
    };
    print_bot_message(out, message, animate).await
}

async fn print_bot_message(out: &mut impl Write, text: &str, animate: bool) -> Result<()> {
    writeln!(out, "{}", "Bot:".bold().yellow())?;

    let mut reveal = Reveal::new(text, Instant::now());
    loop {
        let now = if animate {
            Instant::now()
        } else {
            // Everything is due at once
            reveal.next_due().unwrap_or_else(Instant::now)
        };
        for step in reveal.poll_all(now) {
            match step {
                RevealStep::LineStart { .. } => {}
                RevealStep::Char { ch, .. } => write!(out, "{}", ch)?,
                RevealStep::LineEnd { .. } | RevealStep::Spacer { .. } => writeln!(out)?,
                RevealStep::Complete => writeln!(out, "{}", current_time_label().dimmed())?,
            }
        }
        out.flush()?;

        match reveal.next_due() {
            Some(due) if animate => tokio::time::sleep_until(due).await,
            Some(_) => {}
            None => break,
        }
    }

    writeln!(out)?;
    Ok(())
}
