//! Terminal prompter built on rustyline.
//!
//! Ctrl-C and Ctrl-D cancel a prompt. Rustyline blocks, so every prompt runs
//! on the blocking pool with its own editor.

use std::borrow::Cow::{self, Borrowed, Owned};

use async_trait::async_trait;
use colored::Colorize;
use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{ColorMode, DefaultEditor, Editor, Helper};
use vscls_core::ui::{NotificationLevel, PickItem, Prompter};

/// Hides typed characters behind `*`.
struct MaskingHelper;

impl Helper for MaskingHelper {}

impl Completer for MaskingHelper {
    type Candidate = String;
}

impl Hinter for MaskingHelper {
    type Hint = String;
}

impl Validator for MaskingHelper {}

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            Borrowed(line)
        } else {
            Owned("*".repeat(line.chars().count()))
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn read_line(prompt: String, initial: Option<String>) -> Option<String> {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            tracing::error!("[Terminal] Cannot open the terminal: {}", err);
            return None;
        }
    };
    let result = match &initial {
        Some(initial) => editor.readline_with_initial(&prompt, (initial.as_str(), "")),
        None => editor.readline(&prompt),
    };
    finish(result)
}

fn read_secret(prompt: String) -> Option<String> {
    let mut editor: Editor<MaskingHelper, DefaultHistory> = match Editor::new() {
        Ok(editor) => editor,
        Err(err) => {
            tracing::error!("[Terminal] Cannot open the terminal: {}", err);
            return None;
        }
    };
    editor.set_helper(Some(MaskingHelper));
    editor.set_color_mode(ColorMode::Forced);
    editor.set_auto_add_history(false);
    finish(editor.readline(&prompt))
}

fn finish(result: rustyline::Result<String>) -> Option<String> {
    match result {
        Ok(line) => Some(line),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
        Err(err) => {
            tracing::error!("[Terminal] Reading input failed: {}", err);
            None
        }
    }
}

async fn blocking<F>(f: F) -> Option<String>
where
    F: FnOnce() -> Option<String> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.ok().flatten()
}

/// Parses a 1-based choice.
fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    let number: usize = answer.trim().parse().ok()?;
    (1..=count).contains(&number).then(|| number - 1)
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn input(&self, prompt: &str, default: Option<&str>) -> Option<String> {
        let prompt = format!("{}: ", prompt);
        let initial = default.map(str::to_string);
        blocking(move || read_line(prompt, initial)).await
    }

    async fn password(&self, prompt: &str) -> Option<String> {
        let prompt = format!("{}: ", prompt);
        blocking(move || read_secret(prompt)).await
    }

    async fn pick(&self, title: &str, items: &[PickItem]) -> Option<usize> {
        println!("{}", title.bold());
        for (number, item) in items.iter().enumerate() {
            println!("  {} {}", format!("{:>2})", number + 1).cyan(), item.label);
            if !item.description.is_empty() {
                println!("      {}", item.description.dimmed());
            }
        }

        let count = items.len();
        loop {
            let prompt = format!("Select 1-{} (empty to cancel): ", count);
            let answer = blocking(move || read_line(prompt, None)).await?;
            if answer.trim().is_empty() {
                return None;
            }
            match parse_choice(&answer, count) {
                Some(index) => return Some(index),
                None => eprintln!(
                    "{}",
                    format!("'{}' is not a valid choice", answer.trim()).yellow()
                ),
            }
        }
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Info => println!("{}", message.green()),
            NotificationLevel::Warning => eprintln!("{} {}", "warning:".yellow().bold(), message),
            NotificationLevel::Error => eprintln!("{} {}", "error:".red().bold(), message),
        }
    }
}
