use std::io::{self, Write};

use crate::{EngineError, ErrorKind};

/// Pretty-print an [`EngineError`] with caret positioning.
/// If `program` is `Some("bf")`, prefix messages with "bf: ...".
pub fn print_engine_error(program: Option<&str>, code: &str, err: &EngineError) {
    let msg = format_engine_error(err);
    let msg = match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg,
    };
    print_error_with_context(&msg, code, err.ip());
}

/// One-line, user-facing description of `err` (without position).
pub fn format_engine_error(err: &EngineError) -> String {
    let class = match err.kind() {
        ErrorKind::Syntax => "Syntax error",
        ErrorKind::ResourceLimit => "Runtime error",
        ErrorKind::Input => "Input error",
        ErrorKind::Output => "Output error",
    };

    match err {
        EngineError::UnmatchedBracket { kind, .. } => format!("{class}: unmatched bracket {kind}"),
        EngineError::CellLimitExceeded {
            limit,
            lowest,
            greatest,
            ..
        } => format!("{class}: cell limit reached (limit={limit}, cells {lowest} : {greatest})"),
        EngineError::InputExhausted { .. } => format!("{class}: no input available"),
        EngineError::Input { source, .. } | EngineError::Output { source, .. } => {
            format!("{class}: {source}")
        }
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    let mut stderr = io::stderr().lock();
    let _ = write!(stderr, "{}", render_error_with_context(prefix, code, pos));
    let _ = stderr.flush();
}

pub fn render_error_with_context(prefix: &str, code: &str, pos: usize) -> String {
    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    // Newlines and tabs would break the caret alignment
    let slice: String = code
        .chars()
        .skip(start_char)
        .take(end_char.saturating_sub(start_char))
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}^", " ".repeat(caret_offset_chars));

    format!("{prefix} at instruction {pos}\n  {slice}\n  {underline}\n")
}
