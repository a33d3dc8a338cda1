use derive_more::{Display, Error};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of a square board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BoardSize(usize);

#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum BoardSizeError {
    #[display("board size must be at least 1")]
    TooSmall,
    #[display("board size {size} exceeds maximum of 32")]
    TooLarge { size: usize },
    #[display("could not parse board size from '{text}'")]
    Unparsable { text: String },
}

impl BoardSize {
    pub const MIN: usize = 1;
    pub const MAX: usize = 32;

    /// Sizes offered by the board size selector.
    pub const RECOGNIZED: [BoardSize; 4] = [BoardSize(3), BoardSize(5), BoardSize(10), BoardSize(15)];

    pub const CLASSIC: BoardSize = BoardSize(3);

    pub fn new(size: usize) -> Result<Self, BoardSizeError> {
        if size < Self::MIN {
            Err(BoardSizeError::TooSmall)
        } else if size > Self::MAX {
            Err(BoardSizeError::TooLarge { size })
        } else {
            Ok(BoardSize(size))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn cell_count(self) -> usize {
        self.0 * self.0
    }

    pub fn is_recognized(self) -> bool {
        Self::RECOGNIZED.contains(&self)
    }

    pub fn row_col(self, cell_index: usize) -> (usize, usize) {
        (cell_index / self.0, cell_index % self.0)
    }

    pub fn cell_index(self, row: usize, col: usize) -> Option<usize> {
        (row < self.0 && col < self.0).then(|| row * self.0 + col)
    }

    /// Selector label, e.g. `5x5`.
    pub fn label(self) -> String {
        format!("{0}x{0}", self.0)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BoardSize {
    type Err = BoardSizeError;

    /// Accepts `5` as well as the selector label form `5x5`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let unparsable = || BoardSizeError::Unparsable {
            text: text.to_string(),
        };
        let trimmed = text.trim().to_ascii_lowercase();
        let size = match trimmed.split_once('x') {
            Some((rows, cols)) => {
                let rows = rows.trim().parse::<usize>().map_err(|_| unparsable())?;
                let cols = cols.trim().parse::<usize>().map_err(|_| unparsable())?;
                if rows != cols {
                    return Err(unparsable());
                }
                rows
            }
            None => trimmed.parse::<usize>().map_err(|_| unparsable())?,
        };
        BoardSize::new(size)
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = BoardSizeError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        BoardSize::new(size)
    }
}

impl<'de> Deserialize<'de> for BoardSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BoardSizeVisitor;

        impl<'de> Visitor<'de> for BoardSizeVisitor {
            type Value = BoardSize;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a board size as a number, numeric string, or NxN label")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let size = usize::try_from(value)
                    .map_err(|_| E::custom("board size out of range for usize"))?;
                BoardSize::new(size).map_err(E::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value < 0 {
                    return Err(E::custom("board size must be non-negative"));
                }

                self.visit_u64(value as u64)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.parse::<BoardSize>().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(BoardSizeVisitor)
    }
}
