//! Filename patterns
//!
//! A [`Renamer`] is a parsed filename pattern applied to every exported
//! layer. Patterns mix literal text with bracketed fields:
//!
//! - `[name]`: the layer name
//! - `[000]`: an ascending counter, zero-padded to the field width
//! - `[date]` / `[date:FMT]`: the current date, `strftime`-style format
//! - `[path]` / `[path:SEP]`: the parent group chain joined by `SEP`
//! - `[tags]` / `[tags:SEP]`: the layer tags joined by `SEP`
//! - `[document]`: the source document name
//!
//! `[[` produces a literal `[`. Unknown fields are kept verbatim so a typo
//! shows up in the output name instead of silently disappearing.

use crate::core::tree::ItemTree;
use crate::domain::{Item, Result};
use chrono::Local;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_SEPARATOR: &str = "-";

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Name,
    Counter { digits: usize },
    Date { format: String },
    Path { separator: String },
    Tags { separator: String },
    Document,
}

/// A parsed filename pattern with a run-wide counter
#[derive(Debug, Clone)]
pub struct Renamer {
    tokens: Vec<Token>,
    counter: u64,
}

impl Renamer {
    /// Parses a pattern. Parsing never fails; malformed input degrades to
    /// literal text.
    pub fn parse(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '[' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'[') {
                chars.next();
                literal.push('[');
                continue;
            }

            let mut field = String::new();
            let mut closed = false;
            for f in chars.by_ref() {
                if f == ']' {
                    closed = true;
                    break;
                }
                field.push(f);
            }
            if !closed {
                // Unterminated field, keep it as written.
                literal.push('[');
                literal.push_str(&field);
                continue;
            }

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(Self::parse_field(&field));
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self { tokens, counter: 0 }
    }

    fn parse_field(field: &str) -> Token {
        let (name, arg) = match field.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (field, None),
        };

        match name {
            "name" if arg.is_none() => Token::Name,
            "document" if arg.is_none() => Token::Document,
            "date" => Token::Date {
                format: arg.unwrap_or(DEFAULT_DATE_FORMAT).to_string(),
            },
            "path" => Token::Path {
                separator: arg.unwrap_or(DEFAULT_SEPARATOR).to_string(),
            },
            "tags" => Token::Tags {
                separator: arg.unwrap_or(DEFAULT_SEPARATOR).to_string(),
            },
            _ if !name.is_empty() && name.chars().all(|c| c == '0') && arg.is_none() => {
                Token::Counter { digits: name.len() }
            }
            _ => Token::Literal(format!("[{field}]")),
        }
    }

    /// Produces the output name for one item, advancing the counter
    pub fn rename(&mut self, tree: &ItemTree, item: &Item, document_name: &str) -> Result<String> {
        self.counter += 1;

        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Name => out.push_str(item.name()),
                Token::Document => out.push_str(document_name),
                Token::Counter { digits } => {
                    out.push_str(&format!("{:0width$}", self.counter, width = digits));
                }
                Token::Date { format } => {
                    out.push_str(&Local::now().format(format).to_string());
                }
                Token::Path { separator } => {
                    let mut names = Vec::with_capacity(item.parents().len());
                    for parent in item.parents() {
                        names.push(tree.item(*parent)?.name().to_string());
                    }
                    out.push_str(&names.join(separator));
                }
                Token::Tags { separator } => {
                    out.push_str(&item.tags().join(separator));
                }
            }
        }
        Ok(out)
    }
}
