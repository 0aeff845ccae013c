//! Interactive command parsing and the text the REPL prints.

use muse_core::{preview, Record};

/// How many records `memory` shows.
pub const MEMORY_PREVIEW_COUNT: usize = 5;
pub const NO_IDEAS_YET: &str = "no ideas yet.";
pub const FAREWELL: &str = "Goodbye! Your ideas are saved.";

pub const HELP: &str = "\
Commands:
  <any text>       brainstorm a new idea with the four voices
  memory           show the last 5 ideas
  search <words>   find earlier ideas sharing those words
  share            turn the latest idea into a post
  help             show this list
  exit             leave (Ctrl-C and Ctrl-D work too)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Memory,
    Share,
    Search(String),
    Help,
    Empty,
    Prompt(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }

        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };
        let keyword = head.to_ascii_lowercase();

        match (keyword.as_str(), rest.is_empty()) {
            ("exit" | "quit", true) => Command::Exit,
            ("memory", true) => Command::Memory,
            ("share", true) => Command::Share,
            ("help", true) => Command::Help,
            ("search", _) => Command::Search(rest.to_string()),
            _ => Command::Prompt(trimmed.to_string()),
        }
    }
}

/// One preview line per record, oldest first. Empty string for no records.
pub fn format_memory(records: &[Record]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "[{}] {} -> {}",
                r.timestamp,
                preview(&r.prompt, 40),
                preview(headline(&r.output), 80)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A canned social post built from the latest idea.
pub fn format_share(latest: Option<&Record>, hashtags: &[String]) -> String {
    let Some(record) = latest else {
        return NO_IDEAS_YET.to_string();
    };
    let mut post = format!(
        "Just dreamed up \"{}\" with my AI studio: {}",
        preview(&record.prompt, 60),
        preview(headline(&record.output), 140)
    );
    if !hashtags.is_empty() {
        post.push(' ');
        post.push_str(&hashtags.join(" "));
    }
    post
}

pub fn format_search(results: &[String]) -> String {
    if results.is_empty() {
        return "No matching ideas.".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, out)| format!("{}. {}", i + 1, preview(headline(out), 100)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First line of real content in a blended output: skips the `Idea:` title and
/// `[Section]` headers. Falls back to the whole text.
fn headline(output: &str) -> &str {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("Idea:") && !(l.starts_with('[') && l.ends_with(']')))
        .unwrap_or(output)
}
