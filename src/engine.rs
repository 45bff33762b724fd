//! The execution engine.
//!
//! The engine walks the instruction sequence one character at a time over a
//! sparse 8-bit tape with a single pointer. Features and behaviors:
//! - The tape is unbounded in both directions; cells start at 0 and wrap.
//! - Before every instruction the pointer's excursion from the origin
//!   (`|lowest| + |greatest|`) is checked against the cell limit.
//! - `.` writes the current cell if it is printable ASCII, otherwise `?`.
//! - `,` reads one character from the input source; running dry is an error.
//! - Loops are resolved while running: `[` on a zero cell scans forward for
//!   its partner, `]` on a non-zero cell jumps back to the innermost open `[`.
//! - Any other character is a no-op, so comments and whitespace are free.
//!
//! ```
//! use std::collections::VecDeque;
//! use tapebf::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new("++++++++[>++++++++<-]>+.", EngineConfig::default());
//! let mut out: Vec<u8> = Vec::new();
//! engine.run(&mut VecDeque::<u8>::new(), &mut out).expect("program should run");
//! assert_eq!(out, b"A");
//! ```

use std::fmt;
use std::io;
use std::num::NonZeroUsize;

use log::{debug, trace, warn};

use crate::io::{InputSource, OutputSink};
use crate::stats::{count_operators, Counters};
use crate::tape::Tape;

/// Cell limit used when nobody asks for another one.
pub const DEFAULT_CELL_LIMIT: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// Errors that stop a run. None of them are recoverable.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A `]` with a non-zero cell had no open loop, or a `[` was never closed.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: UnmatchedBracketKind },

    /// The pointer wandered further from the origin than the cell limit allows.
    #[error("Cell limit {limit} exceeded at instruction {ip} (cells {lowest} : {greatest})")]
    CellLimitExceeded {
        ip: usize,
        limit: usize,
        lowest: i64,
        greatest: i64,
    },

    /// `,` needed a character but the input source had none left.
    #[error("Input exhausted at instruction {ip}")]
    InputExhausted { ip: usize },

    /// Reading from the input source failed.
    #[error("Input error at instruction {ip}: {source}")]
    Input {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// Writing to the output sink failed.
    #[error("Output error at instruction {ip}: {source}")]
    Output {
        ip: usize,
        #[source]
        source: io::Error,
    },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    ResourceLimit,
    Input,
    Output,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UnmatchedBracket { .. } => ErrorKind::Syntax,
            EngineError::CellLimitExceeded { .. } => ErrorKind::ResourceLimit,
            EngineError::InputExhausted { .. } | EngineError::Input { .. } => ErrorKind::Input,
            EngineError::Output { .. } => ErrorKind::Output,
        }
    }

    /// Index of the instruction the error is attributed to.
    pub fn ip(&self) -> usize {
        match self {
            EngineError::UnmatchedBracket { ip, .. }
            | EngineError::CellLimitExceeded { ip, .. }
            | EngineError::InputExhausted { ip }
            | EngineError::Input { ip, .. }
            | EngineError::Output { ip, .. } => *ip,
        }
    }
}

/// Settings handed to the engine by its caller.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub cell_limit: NonZeroUsize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_limit: DEFAULT_CELL_LIMIT,
        }
    }
}

/// A single program run: tape, pointer, loop stack and scan cursor.
pub struct Engine {
    code: Vec<char>,
    cell_limit: NonZeroUsize,
    tape: Tape,
    pointer: i64,
    cursor: usize,
    loop_stack: Vec<usize>,
    counters: Counters,
}

impl Engine {
    pub fn new(code: &str, config: EngineConfig) -> Self {
        Self {
            code: code.chars().collect(),
            cell_limit: config.cell_limit,
            tape: Tape::new(),
            pointer: 0,
            cursor: 0,
            loop_stack: Vec::new(),
            counters: Counters {
                operator_count: count_operators(code),
                ..Counters::default()
            },
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn pointer(&self) -> i64 {
        self.pointer
    }

    /// Current value of the cell at `index`.
    pub fn cell(&self, index: i64) -> u8 {
        self.tape.get(index)
    }

    /// Number of loops currently open.
    pub fn loop_depth(&self) -> usize {
        self.loop_stack.len()
    }

    /// Execute the program until it falls off the end or fails.
    ///
    /// Output produced before an error stays written.
    pub fn run<I, O>(&mut self, input: &mut I, output: &mut O) -> Result<(), EngineError>
    where
        I: InputSource + ?Sized,
        O: OutputSink + ?Sized,
    {
        debug!(
            "starting run: {} chars, {} operators, cell limit {}",
            self.code.len(),
            self.counters.operator_count,
            self.cell_limit
        );

        while self.cursor < self.code.len() {
            self.counters.operations += 1;
            self.check_extent()?;

            let instr = self.code[self.cursor];
            trace!(
                "ip={} ptr={} cell={} instr={:?}",
                self.cursor,
                self.pointer,
                self.tape.get(self.pointer),
                instr
            );

            match instr {
                '+' => {
                    self.tape.increment(self.pointer);
                }
                '-' => {
                    self.tape.decrement(self.pointer);
                }
                '>' => {
                    self.pointer += 1;
                    self.counters.right_shifts += 1;
                    self.counters.greatest_cell = self.counters.greatest_cell.max(self.pointer);
                }
                '<' => {
                    self.pointer -= 1;
                    self.counters.left_shifts += 1;
                    self.counters.lowest_cell = self.counters.lowest_cell.min(self.pointer);
                }
                '.' => {
                    let value = self.tape.get(self.pointer);
                    let byte = if (0x20..=0x7e).contains(&value) { value } else { b'?' };
                    output
                        .write_char(byte)
                        .map_err(|source| EngineError::Output { ip: self.cursor, source })?;
                }
                ',' => {
                    let byte = input
                        .read_char()
                        .map_err(|source| EngineError::Input { ip: self.cursor, source })?
                        .ok_or(EngineError::InputExhausted { ip: self.cursor })?;
                    self.tape.set(self.pointer, byte);
                }
                '[' => {
                    if self.tape.get(self.pointer) == 0 {
                        self.skip_loop()?;
                    } else if self.loop_stack.last() != Some(&self.cursor) {
                        self.loop_stack.push(self.cursor);
                    }
                }
                ']' => {
                    if self.tape.get(self.pointer) != 0 {
                        let Some(&open) = self.loop_stack.last() else {
                            return Err(EngineError::UnmatchedBracket {
                                ip: self.cursor,
                                kind: UnmatchedBracketKind::Close,
                            });
                        };
                        // Resume right after the `[`; the cell is already known to be non-zero.
                        self.cursor = open;
                    } else if self.loop_stack.pop().is_none() {
                        warn!("stray ']' at instruction {} ignored (cell is 0)", self.cursor);
                    }
                }
                _ => {}
            }

            self.cursor += 1;
        }

        if let Some(&open) = self.loop_stack.last() {
            return Err(EngineError::UnmatchedBracket {
                ip: open,
                kind: UnmatchedBracketKind::Open,
            });
        }

        debug!(
            "run finished: {} operations, cells {} : {}",
            self.counters.operations, self.counters.lowest_cell, self.counters.greatest_cell
        );
        Ok(())
    }

    fn check_extent(&self) -> Result<(), EngineError> {
        let limit = self.cell_limit.get();
        if self.counters.extent() > limit as u64 {
            return Err(EngineError::CellLimitExceeded {
                ip: self.cursor,
                limit,
                lowest: self.counters.lowest_cell,
                greatest: self.counters.greatest_cell,
            });
        }
        Ok(())
    }

    /// Move the cursor from a `[` onto its matching `]`, honouring nesting.
    fn skip_loop(&mut self) -> Result<(), EngineError> {
        let open = self.cursor;
        let mut depth = 1usize;
        while depth > 0 {
            self.cursor += 1;
            match self.code.get(self.cursor) {
                Some('[') => depth += 1,
                Some(']') => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(EngineError::UnmatchedBracket {
                        ip: open,
                        kind: UnmatchedBracketKind::Open,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Run `code` on a fresh engine and hand back its counters alongside the result.
pub fn run<I, O>(
    code: &str,
    cell_limit: NonZeroUsize,
    input: &mut I,
    output: &mut O,
) -> (Counters, Result<(), EngineError>)
where
    I: InputSource + ?Sized,
    O: OutputSink + ?Sized,
{
    let mut engine = Engine::new(code, EngineConfig { cell_limit });
    let result = engine.run(input, output);
    (engine.counters(), result)
}
