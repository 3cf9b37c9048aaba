use shared::{
    domain::{Grid, GRID_SIZE},
    protocol::NotesPayload,
};

const MAX_DIGIT: u8 = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesGrid {
    cells: [[Vec<u8>; GRID_SIZE]; GRID_SIZE],
}

impl NotesGrid {
    pub fn get(&self, row: usize, col: usize) -> &[u8] {
        &self.cells[row][col]
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Vec::is_empty)
    }

    fn toggle(&mut self, row: usize, col: usize, digit: u8) {
        let cell = &mut self.cells[row][col];
        if let Some(index) = cell.iter().position(|d| *d == digit) {
            cell.remove(index);
        } else {
            cell.push(digit);
        }
    }

    fn pop_latest(&mut self, row: usize, col: usize) -> bool {
        self.cells[row][col].pop().is_some()
    }

    fn clear(&mut self, row: usize, col: usize) -> bool {
        let cell = &mut self.cells[row][col];
        let had_notes = !cell.is_empty();
        cell.clear();
        had_notes
    }

    pub fn from_payload(payload: &NotesPayload) -> Self {
        let mut notes = Self::default();
        for (row, row_notes) in payload.iter().take(GRID_SIZE).enumerate() {
            for (col, digits) in row_notes.iter().take(GRID_SIZE).enumerate() {
                let cell = &mut notes.cells[row][col];
                for digit in digits {
                    if (1..=MAX_DIGIT).contains(digit) && !cell.contains(digit) {
                        cell.push(*digit);
                    }
                }
            }
        }
        notes
    }

    pub fn to_payload(&self) -> NotesPayload {
        self.cells
            .iter()
            .map(|row| row.iter().cloned().collect())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    seed: Grid,
    cells: Grid,
    notes: NotesGrid,
}

impl Board {
    pub fn new(seed: Grid) -> Self {
        Self {
            seed,
            cells: seed,
            notes: NotesGrid::default(),
        }
    }

    /// Rebuilds a board from saved progress. Fixed cells are re-forced to the seed value and
    /// notes on cells that already hold a value are discarded.
    pub fn restore(seed: Grid, saved: Option<Grid>, notes: Option<&NotesPayload>) -> Self {
        let mut board = Self::new(seed);
        if let Some(saved) = saved {
            for row in 0..GRID_SIZE {
                for col in 0..GRID_SIZE {
                    if board.is_editable(row, col) && saved[row][col] <= MAX_DIGIT {
                        board.cells[row][col] = saved[row][col];
                    }
                }
            }
        }
        if let Some(payload) = notes {
            board.notes = NotesGrid::from_payload(payload);
            for row in 0..GRID_SIZE {
                for col in 0..GRID_SIZE {
                    if board.cells[row][col] != 0 {
                        board.notes.clear(row, col);
                    }
                }
            }
        }
        board
    }

    pub fn seed(&self) -> &Grid {
        &self.seed
    }

    pub fn cells(&self) -> &Grid {
        &self.cells
    }

    pub fn notes(&self) -> &NotesGrid {
        &self.notes
    }

    pub fn value(&self, row: usize, col: usize) -> Option<u8> {
        in_bounds(row, col).then(|| self.cells[row][col])
    }

    pub fn is_editable(&self, row: usize, col: usize) -> bool {
        in_bounds(row, col) && self.seed[row][col] == 0
    }

    pub fn set_cell(&mut self, row: usize, col: usize, digit: u8, note_mode: bool) -> bool {
        if !self.is_editable(row, col) || digit > MAX_DIGIT {
            return false;
        }

        if note_mode {
            if digit == 0 {
                return false;
            }
            self.notes.toggle(row, col, digit);
            return true;
        }

        let previous = self.cells[row][col];
        self.cells[row][col] = digit;
        let cleared_notes = digit != 0 && self.notes.clear(row, col);
        previous != digit || cleared_notes
    }

    pub fn delete_cell(&mut self, row: usize, col: usize, note_mode: bool) -> bool {
        if !self.is_editable(row, col) {
            return false;
        }

        if note_mode {
            return self.notes.pop_latest(row, col);
        }

        let previous = self.cells[row][col];
        self.cells[row][col] = 0;
        previous != 0
    }

    /// Number of cells showing `digit`, fixed or user-filled. Saturates at nine so that
    /// duplicate placements never push the count out of range.
    pub fn count_digit_usage(&self, digit: u8) -> usize {
        if digit == 0 || digit > MAX_DIGIT {
            return 0;
        }
        let count = self
            .cells
            .iter()
            .flatten()
            .filter(|value| **value == digit)
            .count();
        count.min(GRID_SIZE)
    }

    pub fn first_blank(&self) -> Option<(usize, usize)> {
        (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col)))
            .find(|(row, col)| self.cells[*row][*col] == 0)
    }

    pub fn is_full(&self) -> bool {
        self.first_blank().is_none()
    }
}

fn in_bounds(row: usize, col: usize) -> bool {
    row < GRID_SIZE && col < GRID_SIZE
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
