use crate::core::{
    board_size::{BoardSize, BoardSizeError},
    mark::Mark,
    win_detector::{self, WinningLine},
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EMPTY_CELL_CHAR: char = '.';

/// Full board state at one point in a game's history.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[readonly::make]
pub struct Snapshot {
    pub board_size: BoardSize,
    pub cells: Vec<Option<Mark>>, // row-major, board_size² long
}

#[derive(Debug, PartialEq, Eq, Display, Error, From)]
pub enum SnapshotParseError {
    #[display("{_0}")]
    #[from]
    BoardSize(BoardSizeError),
    #[display("row {row} has {len} cells but the board is {expected} wide")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("unrecognized cell character '{ch}' in row {row}")]
    BadCell { row: usize, ch: char },
}

impl Snapshot {
    pub fn empty(board_size: BoardSize) -> Self {
        Self {
            board_size,
            cells: vec![None; board_size.cell_count()],
        }
    }

    /// Builds a snapshot from text rows such as `"XO."`; `.`, `-` and `_` are empty.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, SnapshotParseError> {
        let board_size = BoardSize::new(rows.len())?;
        let mut cells = Vec::with_capacity(board_size.cell_count());

        for (row, text) in rows.iter().enumerate() {
            let chars = text
                .as_ref()
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .collect::<Vec<_>>();
            if chars.len() != board_size.get() {
                return Err(SnapshotParseError::RaggedRow {
                    row,
                    len: chars.len(),
                    expected: board_size.get(),
                });
            }

            for ch in chars {
                let cell = match ch {
                    EMPTY_CELL_CHAR | '-' | '_' => None,
                    _ => Some(Mark::from_char(ch).ok_or(SnapshotParseError::BadCell { row, ch })?),
                };
                cells.push(cell);
            }
        }

        Ok(Self { board_size, cells })
    }

    pub fn cell(&self, cell_index: usize) -> Option<Mark> {
        self.cells.get(cell_index).copied().flatten()
    }

    pub fn contains_cell(&self, cell_index: usize) -> bool {
        cell_index < self.cells.len()
    }

    pub fn is_occupied(&self, cell_index: usize) -> bool {
        self.cell(cell_index).is_some()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn num_marks(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Copy of this snapshot with one more mark; the caller checks the cell is empty.
    pub fn with_mark(&self, cell_index: usize, mark: Mark) -> Self {
        let mut cells = self.cells.clone();
        cells[cell_index] = Some(mark);
        Self {
            board_size: self.board_size,
            cells,
        }
    }

    /// Indices of cells that hold a mark in `self` but are empty in `prev`.
    pub fn added_cells_since(&self, prev: &Snapshot) -> Vec<usize> {
        self.cells
            .iter()
            .zip(&prev.cells)
            .enumerate()
            .filter(|(_, (now, before))| now.is_some() && before.is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        win_detector::detect_winner(self, self.board_size)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Mark>]> + '_ {
        self.cells.chunks(self.board_size.get())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(Mark::as_char).unwrap_or(EMPTY_CELL_CHAR))
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        write!(f, "{}", lines.join("\n"))
    }
}
