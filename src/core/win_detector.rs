use crate::core::{board_size::BoardSize, mark::Mark, snapshot::Snapshot};
use itertools::{Itertools, iproduct};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CLASSIC_WIN_LENGTH: usize = 3;
pub const GENERAL_WIN_LENGTH: usize = 5;

/// Fixed lines of the 3x3 board: rows, columns, then the two diagonals.
pub const CLASSIC_LINES: [[usize; CLASSIC_WIN_LENGTH]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[readonly::make]
pub struct WinningLine {
    pub mark: Mark,
    pub cells: Vec<usize>,
}

impl WinningLine {
    pub fn new(mark: Mark, cells: impl IntoIterator<Item = usize>) -> Self {
        Self {
            mark,
            cells: cells.into_iter().collect(),
        }
    }

    pub fn contains(&self, cell_index: usize) -> bool {
        self.cells.contains(&cell_index)
    }
}

impl fmt::Display for WinningLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{}]", self.mark, self.cells.iter().join(","))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

impl Direction {
    /// Order in which runs are generated from each origin.
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    fn run_from(
        self,
        board_size: BoardSize,
        row: usize,
        col: usize,
        run_length: usize,
    ) -> Option<Vec<usize>> {
        let n = board_size.get();
        let reach = run_length.checked_sub(1)?;
        let fits_down = row + reach < n;
        let fits_right = col + reach < n;
        let fits_left = col >= reach;

        let fits = match self {
            Direction::Horizontal => fits_right,
            Direction::Vertical => fits_down,
            Direction::Diagonal => fits_down && fits_right,
            Direction::AntiDiagonal => fits_down && fits_left,
        };

        fits.then(|| {
            (0..run_length)
                .map(|k| match self {
                    Direction::Horizontal => row * n + col + k,
                    Direction::Vertical => (row + k) * n + col,
                    Direction::Diagonal => (row + k) * n + col + k,
                    Direction::AntiDiagonal => (row + k) * n + col - k,
                })
                .collect()
        })
    }
}

/// All contiguous runs of `run_length` cells, by row-major origin and then
/// [`Direction::ALL`] order.
pub fn candidate_lines(board_size: BoardSize, run_length: usize) -> Vec<Vec<usize>> {
    let n = board_size.get();
    iproduct!(0..n, 0..n, Direction::ALL)
        .filter_map(|(row, col, direction)| direction.run_from(board_size, row, col, run_length))
        .collect()
}

/// The single mark filling every cell of `line`, if there is one.
pub fn uniform_mark(snapshot: &Snapshot, line: &[usize]) -> Option<Mark> {
    let first = snapshot.cell(*line.first()?)?;
    line.iter()
        .all(|&cell_index| snapshot.cell(cell_index) == Some(first))
        .then_some(first)
}

fn detect_classic(snapshot: &Snapshot) -> Option<WinningLine> {
    CLASSIC_LINES.iter().find_map(|line| {
        uniform_mark(snapshot, line).map(|mark| WinningLine::new(mark, line.iter().copied()))
    })
}

fn detect_general(snapshot: &Snapshot, board_size: BoardSize) -> Option<WinningLine> {
    candidate_lines(board_size, GENERAL_WIN_LENGTH)
        .into_iter()
        .find_map(|line| {
            let x_count = line.iter().filter(|&&idx| snapshot.cell(idx) == Some(Mark::X)).count();
            let o_count = line.iter().filter(|&&idx| snapshot.cell(idx) == Some(Mark::O)).count();
            if x_count == GENERAL_WIN_LENGTH {
                Some(WinningLine::new(Mark::X, line))
            } else if o_count == GENERAL_WIN_LENGTH {
                Some(WinningLine::new(Mark::O, line))
            } else {
                None
            }
        })
}

/// First completed line on `snapshot`, or `None`.
///
/// A 3x3 board checks its eight fixed lines first. Every size then falls
/// through to the five-in-a-row scan, which finds nothing on boards narrower
/// than five. A 4x4 board therefore never has a winner.
pub fn detect_winner(snapshot: &Snapshot, board_size: BoardSize) -> Option<WinningLine> {
    if snapshot.cells.len() != board_size.cell_count() {
        tracing::warn!(
            cells = snapshot.cells.len(),
            %board_size,
            "snapshot length does not match board size"
        );
    }

    if board_size == BoardSize::CLASSIC {
        if let Some(line) = detect_classic(snapshot) {
            return Some(line);
        }
    }

    detect_general(snapshot, board_size)
}
