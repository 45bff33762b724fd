//! A small interpreter for the eight-operator tape language.
//!
//! Programs manipulate a tape of 8-bit cells through a single pointer:
//! `+`/`-` change the current cell, `>`/`<` move the pointer, `.`/`,` do
//! I/O and `[`/`]` loop while the current cell is non-zero. Every other
//! character is ignored.
//!
//! Features and behaviors:
//! - The tape is sparse and extends in both directions; cells start at 0.
//! - Cell arithmetic wraps at 8 bits.
//! - A cell limit bounds how far the pointer may stray from the origin;
//!   crossing it aborts the run.
//! - `.` prints printable ASCII as-is and anything else as `?`.
//! - `,` reads one character; an exhausted input source is an error.
//! - Unbalanced brackets are reported when execution reaches them.
//!
//! Quick start:
//!
//! ```no_run
//! use std::io;
//! use tapebf::{run, ByteInput, FlushingOutput, DEFAULT_CELL_LIMIT};
//!
//! // Classic "Hello World!"
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let mut input = ByteInput::new(io::stdin());
//! let mut output = FlushingOutput::new(io::stdout());
//! let (counters, result) = run(code, DEFAULT_CELL_LIMIT, &mut input, &mut output);
//! result.expect("program should run");
//! println!(); // ensure a trailing newline for readability
//! println!("{} operations", counters.operations);
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod engine;
pub mod io;
pub mod stats;
pub mod tape;

pub use engine::{
    run, Engine, EngineConfig, EngineError, ErrorKind, UnmatchedBracketKind, DEFAULT_CELL_LIMIT,
};
pub use io::{ByteInput, FlushingOutput, InputSource, LineInput, OutputSink};
pub use stats::{count_operators, Counters, Report};
pub use tape::Tape;
