pub mod board_size;
pub mod game;
pub mod mark;
pub mod snapshot;
pub mod win_detector;
