//! Session transcript: the ordered record a completion session keeps of
//! everything sent to and received from the backend.
//!
//! Entries are tagged by kind. Each kind renders to one labelled line,
//! which is what survives a session rebuild.

use chatset_core::message::{Message, MessageToolCall};

/// Longest summary an entry contributes to a rebuilt session.
pub const MAX_SUMMARY_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    /// The session's instruction text
    Instructions(String),

    /// A user prompt
    Prompt(String),

    /// The backend asked for tools to run
    ToolCalls {
        content: String,
        calls: Vec<MessageToolCall>,
    },

    /// Output of one tool call
    ToolOutput { call_id: String, output: String },

    /// A final text reply
    Response(String),
}

impl TranscriptEntry {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Instructions(_) => "Instructions",
            Self::Prompt(_) => "User",
            Self::ToolCalls { .. } => "Tool_call",
            Self::ToolOutput { .. } => "Tool_output",
            Self::Response(_) => "Assistant",
        }
    }

    /// The entry's content as carried into a rebuilt session: a single line
    /// of at most [`MAX_SUMMARY_CHARS`] characters. Instructions are reduced
    /// to their first line, since a rebuilt session restates them anyway.
    pub fn summary(&self) -> String {
        let text = match self {
            Self::Instructions(text) => text
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default()
                .to_string(),
            Self::Prompt(text) | Self::Response(text) => text.clone(),
            Self::ToolCalls { calls, .. } => {
                let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
                format!("Called tools: {}", names.join(", "))
            }
            Self::ToolOutput { output, .. } => format!("Tool result: {output}"),
        };
        one_line(&text, MAX_SUMMARY_CHARS)
    }

    /// `Label: summary`
    pub fn render(&self) -> String {
        format!("{}: {}", self.label(), self.summary())
    }

    /// The backend message this entry stands for.
    pub fn to_message(&self) -> Message {
        match self {
            Self::Instructions(text) => Message::system(text),
            Self::Prompt(text) => Message::user(text),
            Self::ToolCalls { content, calls } => {
                let mut message = Message::assistant(content);
                message.tool_calls = calls.clone();
                message
            }
            Self::ToolOutput { call_id, output } => Message::tool_result(call_id, output),
            Self::Response(text) => Message::assistant(text),
        }
    }
}

/// Collapse all whitespace runs, newlines included, to single spaces and cut
/// the result to `max_chars`.
fn one_line(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

/// Append-only list of entries, starting with the instructions.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            entries: vec![TranscriptEntry::Instructions(instructions.into())],
        }
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, of any kind.
    pub fn recent(&self, n: usize) -> &[TranscriptEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn instructions(&self) -> &str {
        match self.entries.first() {
            Some(TranscriptEntry::Instructions(text)) => text,
            _ => "",
        }
    }

    pub fn to_messages(&self) -> Vec<Message> {
        self.entries.iter().map(TranscriptEntry::to_message).collect()
    }
}
