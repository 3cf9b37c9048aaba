use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use shared::domain::Grid;

use crate::clock::Clock;

/// Hand-driven clock.
pub(crate) struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.offset.lock().expect("clock offset") += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().expect("clock offset")
    }
}

pub(crate) const SOLUTION: Grid = [
    [5, 3, 4, 6, 7, 8, 9, 1, 2],
    [6, 7, 2, 1, 9, 5, 3, 4, 8],
    [1, 9, 8, 3, 4, 2, 5, 6, 7],
    [8, 5, 9, 7, 6, 1, 4, 2, 3],
    [4, 2, 6, 8, 5, 3, 7, 9, 1],
    [7, 1, 3, 9, 2, 4, 8, 5, 6],
    [9, 6, 1, 5, 3, 7, 2, 8, 4],
    [2, 8, 7, 4, 1, 9, 6, 3, 5],
    [3, 4, 5, 2, 8, 6, 1, 7, 9],
];

/// Solution with every cell where `(row + col) % 3 == 0` blanked out.
pub(crate) fn seed() -> Grid {
    let mut grid = SOLUTION;
    for (row, cells) in grid.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            if (row + col) % 3 == 0 {
                *cell = 0;
            }
        }
    }
    grid
}

pub(crate) fn blanks() -> Vec<(usize, usize)> {
    let seed = seed();
    (0..9)
        .flat_map(|row| (0..9).map(move |col| (row, col)))
        .filter(|(row, col)| seed[*row][*col] == 0)
        .collect()
}

pub(crate) fn fixed() -> Vec<(usize, usize)> {
    let seed = seed();
    (0..9)
        .flat_map(|row| (0..9).map(move |col| (row, col)))
        .filter(|(row, col)| seed[*row][*col] != 0)
        .collect()
}
