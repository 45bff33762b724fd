//! Sparse memory tape.
//!
//! Cells are addressed by a signed index, so the pointer may wander to the
//! left of the origin without any pre-allocation. Cells are 8 bits wide and
//! wrap on overflow in both directions. Unvisited cells read as 0.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct Tape {
    cells: HashMap<i64, u8>,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the cell at `index`; 0 if it was never written.
    pub fn get(&self, index: i64) -> u8 {
        self.cells.get(&index).copied().unwrap_or(0)
    }

    pub fn set(&mut self, index: i64, value: u8) {
        self.cells.insert(index, value);
    }

    /// Add one to the cell at `index`, wrapping 255 to 0. Returns the new value.
    pub fn increment(&mut self, index: i64) -> u8 {
        let cell = self.cells.entry(index).or_insert(0);
        *cell = cell.wrapping_add(1);
        *cell
    }

    /// Subtract one from the cell at `index`, wrapping 0 to 255. Returns the new value.
    pub fn decrement(&mut self, index: i64) -> u8 {
        let cell = self.cells.entry(index).or_insert(0);
        *cell = cell.wrapping_sub(1);
        *cell
    }

    /// Number of cells that have been touched at least once.
    #[cfg(test)]
    pub fn touched(&self) -> usize {
        self.cells.len()
    }
}
