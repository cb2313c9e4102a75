//! Markdown stripping for terminal output.
//!
//! The interpretation model is asked for plain prose, but some models emit
//! markdown anyway. Rather than pattern-match the syntax away, the text is
//! run through a real parser and the events are flattened back to plain
//! text: emphasis and heading markers vanish, code spans keep their
//! content, block boundaries become blank lines.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Flatten markdown to plain text.
#[must_use]
pub fn strip_markdown(content: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(content, options);

    let mut out = String::new();
    let mut ordered_index: Vec<Option<u64>> = Vec::new();

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::List(start) => ordered_index.push(start),
                Tag::Item => {
                    let indent = "  ".repeat(ordered_index.len().saturating_sub(1));
                    match ordered_index.last_mut() {
                        Some(Some(index)) => {
                            out.push_str(&format!("{indent}{index}. "));
                            *index += 1;
                        }
                        _ => out.push_str(&format!("{indent}- ")),
                    }
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock => {
                    push_block_break(&mut out);
                }
                TagEnd::Item => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                TagEnd::List(_) => {
                    ordered_index.pop();
                    push_block_break(&mut out);
                }
                _ => {}
            },
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => push_block_break(&mut out),
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn push_block_break(out: &mut String) {
    while out.ends_with('\n') {
        out.pop();
    }
    if !out.is_empty() {
        out.push_str("\n\n");
    }
}

/// Accumulates streamed text and releases it line by line, each line
/// stripped of markdown.
///
/// Stripping whole lines instead of raw deltas keeps inline markers that
/// straddle chunk boundaries intact.
#[derive(Debug, Default)]
pub struct StreamPrinter {
    pending: String,
}

impl StreamPrinter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a delta; returns the cleaned lines that are now complete.
    pub fn push(&mut self, delta: &str) -> Vec<String> {
        self.pending.push_str(delta);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let rest = self.pending.split_off(pos + 1);
            let line = std::mem::replace(&mut self.pending, rest);
            lines.push(strip_markdown(line.trim_end_matches(['\n', '\r'])));
        }
        lines
    }

    /// Release whatever is buffered, cleaned.
    pub fn finish(mut self) -> Option<String> {
        if self.pending.trim().is_empty() {
            return None;
        }
        Some(strip_markdown(&std::mem::take(&mut self.pending)))
    }
}
