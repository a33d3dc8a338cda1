use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub const FIRST: Mark = Mark::X;

    /// X moves on even move indices, O on odd ones.
    pub fn for_move_index(move_index: usize) -> Self {
        if move_index % 2 == 0 { Mark::X } else { Mark::O }
    }

    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn cell_text(cell: Option<Mark>) -> &'static str {
    cell.map(Mark::as_str).unwrap_or("")
}
