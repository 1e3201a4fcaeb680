// UI layer: prompts, spinners and status lines for the terminal.
// The functions are small and synchronous to make the flow easy to follow.

use crate::api::format_status;
use crate::model::Monitor;
use anyhow::Result;
use crossterm::style::{Color, Stylize};
use dialoguer::{Confirm, Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Outcome of reading a monitor number from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the candidate list.
    Chosen(usize),
    Exit,
    Invalid,
}

/// Interpret the answer to the numbered monitor list. `0` exits, `1..=count`
/// picks a monitor, anything else is invalid.
pub fn parse_selection(input: &str, count: usize) -> Selection {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Selection::Invalid;
    }
    match input.parse::<usize>() {
        Ok(0) => Selection::Exit,
        Ok(n) if n <= count => Selection::Chosen(n - 1),
        _ => Selection::Invalid,
    }
}

/// Let the user pick one of `monitors`. A single candidate is returned
/// without asking.
pub fn select_monitor(term: &str, monitors: Vec<Monitor>) -> Result<Option<Monitor>> {
    if monitors.is_empty() {
        println!("No such monitor could be found {}", term);
        return Ok(None);
    }
    if monitors.len() == 1 {
        return Ok(monitors.into_iter().next());
    }

    println!("Ambiguous url {} could mean:", term);
    for (idx, monitor) in monitors.iter().enumerate() {
        println!("{} {} {}", idx + 1, monitor.label(), monitor.url_or_empty());
    }
    println!("0 Exit");

    let answer: String = Input::new()
        .with_prompt("Which monitor would you like to select?")
        .allow_empty(true)
        .interact_text()?;

    Ok(match parse_selection(&answer, monitors.len()) {
        Selection::Chosen(idx) => monitors.into_iter().nth(idx),
        Selection::Exit => None,
        Selection::Invalid => {
            println!("Invalid selection {}!", answer.trim());
            None
        }
    })
}

pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Ask for an API key. Only called when stdin is a terminal.
pub fn prompt_api_key() -> Result<String> {
    println!("The API key used to manage UptimeRobot monitors.");
    let key: String = Password::new()
        .with_prompt("UPTIMEROBOT_APIKEY")
        .allow_empty_password(true)
        .interact()?;
    Ok(key.trim().to_string())
}

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Run `f` while a spinner with `msg` is shown on stderr.
pub fn with_spinner<T>(msg: &str, f: impl FnOnce() -> T) -> T {
    if !std::io::stderr().is_terminal() {
        return f();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}

pub fn status_color(status_code: i64) -> Color {
    match status_code {
        2 => Color::Green,
        8 | 9 => Color::Red,
        _ => Color::Grey,
    }
}

/// `- <url>: <status>`, coloured when stdout is a terminal.
pub fn status_line(monitor: &Monitor) -> String {
    let code = monitor.status.unwrap_or(-1);
    let status = format_status(code);
    let status = if std::io::stdout().is_terminal() {
        status.with(status_color(code)).to_string()
    } else {
        status
    };
    format!("- {}: {}", monitor.url_or_empty(), status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_picks_one_based_index() {
        assert_eq!(parse_selection("1", 3), Selection::Chosen(0));
        assert_eq!(parse_selection(" 3\n", 3), Selection::Chosen(2));
    }

    #[test]
    fn selection_zero_exits() {
        assert_eq!(parse_selection("0", 3), Selection::Exit);
    }

    #[test]
    fn selection_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_selection("4", 3), Selection::Invalid);
        assert_eq!(parse_selection("-1", 3), Selection::Invalid);
        assert_eq!(parse_selection("two", 3), Selection::Invalid);
        assert_eq!(parse_selection("", 3), Selection::Invalid);
    }

    #[test]
    fn single_candidate_needs_no_prompt() {
        let monitor = Monitor {
            id: 9,
            ..Default::default()
        };
        let picked = select_monitor("example", vec![monitor.clone()]).unwrap();
        assert_eq!(picked, Some(monitor));
        assert_eq!(select_monitor("example", vec![]).unwrap(), None);
    }

    #[test]
    fn colors_follow_status() {
        assert_eq!(status_color(2), Color::Green);
        assert_eq!(status_color(8), Color::Red);
        assert_eq!(status_color(9), Color::Red);
        assert_eq!(status_color(0), Color::Grey);
        assert_eq!(status_color(77), Color::Grey);
    }
}
