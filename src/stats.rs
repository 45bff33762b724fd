//! Execution counters and the verbose report printed after a run.

use std::fmt;
use std::time::Duration;

/// The eight characters that mean something to the engine.
pub const OPERATORS: [char; 8] = ['+', '-', '<', '>', '.', ',', '[', ']'];

/// Count operator characters in `code`.
///
/// This is a static count over the source text: a loop body that runs a
/// thousand times still contributes its operators once.
pub fn count_operators(code: &str) -> usize {
    code.chars().filter(|c| OPERATORS.contains(c)).count()
}

/// Counters collected while the engine runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    /// Operator characters in the source (static).
    pub operator_count: usize,
    /// Instructions dispatched, no-ops included.
    pub operations: u64,
    pub left_shifts: u64,
    pub right_shifts: u64,
    /// Leftmost pointer position reached (never positive).
    pub lowest_cell: i64,
    /// Rightmost pointer position reached (never negative).
    pub greatest_cell: i64,
}

impl Counters {
    /// Pointer excursion from the origin, as checked against the cell limit.
    pub fn extent(&self) -> u64 {
        self.lowest_cell.unsigned_abs() + self.greatest_cell.unsigned_abs()
    }
}

/// Counters plus the wall-clock time the caller measured around the run.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub counters: Counters,
    pub elapsed: Duration,
}

impl Report {
    pub fn new(counters: Counters, elapsed: Duration) -> Self {
        Self { counters, elapsed }
    }

    pub fn cells_used(&self) -> u64 {
        self.counters.extent() + 1
    }

    pub fn shift_operations(&self) -> u64 {
        self.counters.left_shifts + self.counters.right_shifts
    }

    pub fn operations_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.counters.operations as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counters;
        writeln!(f, "Operator count:        {}", c.operator_count)?;
        writeln!(f, "Operations performed:  {}", c.operations)?;
        writeln!(
            f,
            "Cells used:            {} ({} : {})",
            self.cells_used(),
            c.lowest_cell,
            c.greatest_cell
        )?;
        writeln!(
            f,
            "Shift operations:      {} ({} left, {} right)",
            self.shift_operations(),
            c.left_shifts,
            c.right_shifts
        )?;
        writeln!(f, "Time taken:            {:.3}s", self.elapsed.as_secs_f64())?;
        write!(f, "Operations per second: {:.0}", self.operations_per_second())
    }
}
