// ABOUTME: Lenient JSON parsing for generator output with an ordered list of repair transforms
// ABOUTME: Strips code fences, isolates the first balanced object, and removes comments and trailing commas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! JSON Repair
//!
//! Language models often wrap JSON in prose or markdown fences, or emit small
//! syntax slips such as trailing commas. [`JsonRepair::parse`] tries the text
//! as-is and then applies each [`RepairStep`] cumulatively, re-parsing after
//! every step. When every step has been applied and the text still does not
//! parse, a [`RepairError::Exhausted`] lists what was attempted.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// One transform in the repair sequence, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStep {
    /// Parse the trimmed input unchanged
    Raw,
    /// Remove surrounding markdown code fences
    StripFences,
    /// Keep only the first balanced `{...}` object
    ExtractObject,
    /// Normalise smart quotes, drop comments, trailing commas and control characters
    Sanitize,
}

impl RepairStep {
    /// Every step, in the order they are applied
    pub const ALL: [Self; 4] = [
        Self::Raw,
        Self::StripFences,
        Self::ExtractObject,
        Self::Sanitize,
    ];

    fn apply(self, text: &str) -> Option<String> {
        match self {
            Self::Raw => Some(text.trim().to_owned()),
            Self::StripFences => Some(strip_markdown_fences(text).to_owned()),
            Self::ExtractObject => extract_first_object(text).map(str::to_owned),
            Self::Sanitize => Some(sanitize(text)),
        }
    }
}

impl fmt::Display for RepairStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raw => "raw",
            Self::StripFences => "strip_fences",
            Self::ExtractObject => "extract_object",
            Self::Sanitize => "sanitize",
        };
        f.write_str(name)
    }
}

/// Failure after all repair steps
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepairError {
    /// Input was empty or whitespace
    #[error("empty generator output")]
    Empty,
    /// Every transform was applied and parsing still failed
    #[error("unparseable JSON after [{}]: {last_error}", display_steps(.attempted))]
    Exhausted {
        /// Steps that were tried, in order
        attempted: Vec<RepairStep>,
        /// Parser message from the final attempt
        last_error: String,
    },
    /// Parsed JSON did not match the expected shape
    #[error("JSON does not match expected shape: {0}")]
    Shape(String),
}

fn display_steps(steps: &[RepairStep]) -> String {
    steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lenient JSON parser for generator output
pub struct JsonRepair;

impl JsonRepair {
    /// Parse `text` into a JSON value, repairing it as needed
    ///
    /// # Errors
    ///
    /// Returns [`RepairError::Empty`] for blank input and
    /// [`RepairError::Exhausted`] when no transform yields valid JSON.
    pub fn parse(text: &str) -> Result<Value, RepairError> {
        if text.trim().is_empty() {
            return Err(RepairError::Empty);
        }

        let mut current = text.to_owned();
        let mut attempted = Vec::with_capacity(RepairStep::ALL.len());
        let mut last_error = String::new();

        for step in RepairStep::ALL {
            attempted.push(step);
            let Some(next) = step.apply(&current) else {
                continue;
            };
            current = next;
            match serde_json::from_str::<Value>(&current) {
                Ok(value) => return Ok(value),
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(RepairError::Exhausted {
            attempted,
            last_error,
        })
    }

    /// Parse and deserialize into `T`
    ///
    /// # Errors
    ///
    /// Returns any [`JsonRepair::parse`] error, or [`RepairError::Shape`]
    /// when the value does not deserialize into `T`.
    pub fn parse_as<T: DeserializeOwned>(text: &str) -> Result<T, RepairError> {
        let value = Self::parse(text)?;
        serde_json::from_value(value).map_err(|e| RepairError::Shape(e.to_string()))
    }
}

/// Strip markdown code fences from a response
fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after_fence = &trimmed[start + 3..];
    // Skip the language tag on the opening fence line
    let body = after_fence
        .find('\n')
        .map_or(after_fence, |newline| &after_fence[newline + 1..]);
    body.rfind("```").map_or(body, |end| &body[..end]).trim()
}

/// Extract the first balanced `{...}` object, ignoring braces inside strings
fn extract_first_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    let mut start_idx = None;

    for (i, c) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if start_idx.is_some() => in_string = true,
            '{' => {
                if depth == 0 {
                    start_idx = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start_idx.map(|start| &text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Normalise quotes, drop comments, trailing commas and stray control characters
fn sanitize(text: &str) -> String {
    let normalized: String = text
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            _ => c,
        })
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect();

    remove_trailing_commas(&strip_comments(&normalized))
}

/// Remove `//` and `/* */` comments that appear outside string literals
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escape_next {
                escape_next = false;
            } else if c == '\\' {
                escape_next = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Drop commas that are followed only by whitespace and a closing bracket
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if c == '\\' {
                escape_next = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}
