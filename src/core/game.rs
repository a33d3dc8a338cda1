use crate::core::{
    board_size::BoardSize,
    mark::Mark,
    snapshot::Snapshot,
    win_detector::{self, WinningLine},
};
use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum IgnoreReason {
    GameWon,
    CellOccupied,
    CellOutOfRange,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::GameWon => "game already has a winner",
            IgnoreReason::CellOccupied => "cell is already occupied",
            IgnoreReason::CellOutOfRange => "cell is not on the board",
        };
        f.write_str(text)
    }
}

/// What `commit_move` did. `Ignored` leaves the game exactly as it was.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    Placed { cell_index: usize, mark: Mark },
    Ignored(IgnoreReason),
}

impl MoveOutcome {
    pub fn is_placed(self) -> bool {
        matches!(self, MoveOutcome::Placed { .. })
    }
}

/// History of snapshots plus the move currently being viewed.
///
/// `history[0]` is the empty board and every later snapshot adds exactly one
/// mark to the one before it. The winning line of the viewed snapshot is
/// recomputed after every transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board_size: BoardSize,
    history: Vec<Snapshot>,
    current_move: usize,
    winning_line: Option<WinningLine>,
}

impl GameState {
    pub fn at_start(board_size: BoardSize) -> Self {
        GameState {
            board_size,
            history: vec![Snapshot::empty(board_size)],
            current_move: 0,
            winning_line: None,
        }
    }

    /// Replays `cell_indices` from an empty board; ignored moves are skipped.
    pub fn from_moves(board_size: BoardSize, cell_indices: impl IntoIterator<Item = usize>) -> Self {
        let mut state = Self::at_start(board_size);
        for cell_index in cell_indices {
            state.commit_move(cell_index);
        }
        state
    }

    pub fn board_size(&self) -> BoardSize {
        self.board_size
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn current_move(&self) -> usize {
        self.current_move
    }

    pub fn current_snapshot(&self) -> &Snapshot {
        &self.history[self.current_move]
    }

    pub fn x_is_next(&self) -> bool {
        self.current_move % 2 == 0
    }

    pub fn next_mark(&self) -> Mark {
        Mark::for_move_index(self.current_move)
    }

    pub fn winning_line(&self) -> Option<&WinningLine> {
        self.winning_line.as_ref()
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winning_line.as_ref().map(|line| line.mark)
    }

    pub fn has_winner(&self) -> bool {
        self.winning_line.is_some()
    }

    pub fn is_winning_cell(&self, cell_index: usize) -> bool {
        self.winning_line
            .as_ref()
            .is_some_and(|line| line.contains(cell_index))
    }

    /// Full board with no winner. Informational only; nothing blocks on it.
    pub fn is_draw(&self) -> bool {
        !self.has_winner() && self.current_snapshot().is_full()
    }

    pub fn check_move(&self, cell_index: usize) -> Result<(), IgnoreReason> {
        let snapshot = self.current_snapshot();
        if self.has_winner() {
            Err(IgnoreReason::GameWon)
        } else if !snapshot.contains_cell(cell_index) {
            Err(IgnoreReason::CellOutOfRange)
        } else if snapshot.is_occupied(cell_index) {
            Err(IgnoreReason::CellOccupied)
        } else {
            Ok(())
        }
    }

    /// Places the next mark on `cell_index`, dropping any history after the
    /// viewed move first.
    pub fn commit_move(&mut self, cell_index: usize) -> MoveOutcome {
        if let Err(reason) = self.check_move(cell_index) {
            tracing::trace!(cell_index, %reason, "move ignored");
            return MoveOutcome::Ignored(reason);
        }

        let mark = self.next_mark();
        let next_snapshot = self.current_snapshot().with_mark(cell_index, mark);
        let num_discarded = self.history.len() - (self.current_move + 1);
        self.history.truncate(self.current_move + 1);
        self.history.push(next_snapshot);
        self.current_move = self.history.len() - 1;

        tracing::debug!(
            cell_index,
            %mark,
            move_index = self.current_move,
            num_discarded,
            "move committed"
        );
        self.refresh_winner();

        MoveOutcome::Placed { cell_index, mark }
    }

    /// Views an earlier (or later) snapshot without touching history. Returns
    /// false and changes nothing if `move_index` is past the end of history.
    pub fn jump_to_move(&mut self, move_index: usize) -> bool {
        if move_index >= self.history.len() {
            tracing::trace!(move_index, history_len = self.history.len(), "jump ignored");
            return false;
        }

        self.current_move = move_index;
        tracing::debug!(move_index, "jumped to move");
        self.refresh_winner();
        true
    }

    /// Hard reset to an empty board of `new_size`.
    pub fn change_board_size(&mut self, new_size: BoardSize) {
        tracing::debug!(
            old_size = %self.board_size,
            %new_size,
            "board size changed"
        );
        *self = Self::at_start(new_size);
    }

    pub fn reset(&mut self) {
        self.change_board_size(self.board_size);
    }

    pub fn after_move(&self, cell_index: usize) -> Self {
        let mut next = self.clone();
        next.commit_move(cell_index);
        next
    }

    pub fn after_jump(&self, move_index: usize) -> Self {
        let mut next = self.clone();
        next.jump_to_move(move_index);
        next
    }

    pub fn after_board_size_change(&self, new_size: BoardSize) -> Self {
        Self::at_start(new_size)
    }

    /// Cell index played to reach each snapshot after the first.
    pub fn moves_played(&self) -> Vec<usize> {
        self.history
            .windows(2)
            .filter_map(|pair| pair[1].added_cells_since(&pair[0]).first().copied())
            .collect()
    }

    pub fn status_text(&self) -> String {
        match self.winner() {
            Some(mark) => format!("Winner: {mark}"),
            None => format!("You are at move #{}", self.current_move),
        }
    }

    pub fn move_description(move_index: usize) -> String {
        if move_index > 0 {
            format!("Go to move #{move_index}")
        } else {
            "Go to game start".to_string()
        }
    }

    pub fn move_descriptions(&self) -> Vec<String> {
        (0..self.history.len()).map(Self::move_description).collect()
    }

    pub fn summary(&self, indentation_level: usize) -> String {
        let indent = "  ".repeat(indentation_level);
        let mut lines = vec![format!(
            "{indent}Board {} | move {}/{} | {}",
            self.board_size.label(),
            self.current_move,
            self.history.len() - 1,
            self.status_text()
        )];
        if !self.has_winner() {
            lines.push(format!("{indent}Next: {}", self.next_mark()));
        }
        lines.extend(
            self.current_snapshot()
                .to_string()
                .lines()
                .map(|line| format!("{indent}  {line}")),
        );
        lines.join("\n")
    }

    fn refresh_winner(&mut self) {
        let had_winner = self.has_winner();
        self.winning_line = win_detector::detect_winner(self.current_snapshot(), self.board_size);
        if let Some(line) = self.winning_line.as_ref() {
            if !had_winner {
                tracing::info!(winner = %line.mark, line = %line, "winner found");
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::at_start(BoardSize::default())
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> BoardSize {
        BoardSize::new(n).unwrap()
    }

    fn classic_x_row_win() -> GameState {
        GameState::from_moves(BoardSize::CLASSIC, [0, 4, 1, 5, 2])
    }

    #[test]
    fn at_start_has_single_empty_snapshot() {
        let game = GameState::at_start(BoardSize::CLASSIC);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.current_move(), 0);
        assert_eq!(game.current_snapshot().num_marks(), 0);
        assert!(game.x_is_next());
        assert_eq!(game.next_mark(), Mark::X);
        assert!(!game.has_winner());
    }

    #[test]
    fn marks_alternate_starting_with_x() {
        let game = GameState::from_moves(BoardSize::CLASSIC, [0, 4]);
        assert_eq!(game.current_snapshot().cell(0), Some(Mark::X));
        assert_eq!(game.current_snapshot().cell(4), Some(Mark::O));
        assert_eq!(game.next_mark(), Mark::X);
    }

    #[test]
    fn classic_row_win_is_detected() {
        let game = classic_x_row_win();
        assert_eq!(game.winner(), Some(Mark::X));
        assert_eq!(game.winning_line().map(|line| line.cells.clone()), Some(vec![0, 1, 2]));
        assert!(game.is_winning_cell(1));
        assert!(!game.is_winning_cell(4));
        assert_eq!(game.status_text(), "Winner: X");
    }

    #[test]
    fn occupied_cell_is_ignored() {
        let mut game = GameState::from_moves(BoardSize::CLASSIC, [4]);
        let before = game.clone();
        assert_eq!(
            game.commit_move(4),
            MoveOutcome::Ignored(IgnoreReason::CellOccupied)
        );
        assert_eq!(game, before);
    }

    #[test]
    fn move_after_win_is_ignored() {
        let mut game = classic_x_row_win();
        let before = game.clone();
        assert_eq!(game.commit_move(8), MoveOutcome::Ignored(IgnoreReason::GameWon));
        assert_eq!(game, before);
    }

    #[test]
    fn out_of_range_cell_is_ignored() {
        let mut game = GameState::at_start(BoardSize::CLASSIC);
        assert_eq!(
            game.commit_move(9),
            MoveOutcome::Ignored(IgnoreReason::CellOutOfRange)
        );
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn jump_keeps_history_and_switches_turn() {
        let mut game = GameState::from_moves(BoardSize::CLASSIC, [0, 4, 1]);
        assert!(game.jump_to_move(1));
        assert_eq!(game.history().len(), 4);
        assert_eq!(game.current_move(), 1);
        assert_eq!(game.next_mark(), Mark::O);
        assert_eq!(game.current_snapshot().num_marks(), 1);
        assert_eq!(game.status_text(), "You are at move #1");
    }

    #[test]
    fn jump_past_end_is_ignored() {
        let mut game = GameState::from_moves(BoardSize::CLASSIC, [0]);
        assert!(!game.jump_to_move(2));
        assert_eq!(game.current_move(), 1);
    }

    #[test]
    fn commit_after_jump_truncates_future() {
        let mut game = GameState::from_moves(BoardSize::CLASSIC, [0, 4, 1, 5]);
        game.jump_to_move(2);
        let outcome = game.commit_move(8);
        assert_eq!(
            outcome,
            MoveOutcome::Placed {
                cell_index: 8,
                mark: Mark::X
            }
        );
        assert_eq!(game.history().len(), 4);
        assert_eq!(game.current_move(), 3);
        assert_eq!(game.moves_played(), vec![0, 4, 8]);
    }

    #[test]
    fn jumping_back_from_win_clears_and_restores_winner() {
        let mut game = classic_x_row_win();
        game.jump_to_move(4);
        assert!(!game.has_winner());
        assert!(game.commit_move(8).is_placed());
        assert!(!game.has_winner());

        let mut replay = classic_x_row_win();
        replay.jump_to_move(3);
        replay.jump_to_move(5);
        assert_eq!(replay.winner(), Some(Mark::X));
    }

    #[test]
    fn change_board_size_is_hard_reset() {
        let mut game = GameState::from_moves(BoardSize::CLASSIC, [0, 4, 1]);
        game.change_board_size(size(5));
        assert_eq!(game.board_size(), size(5));
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.current_snapshot().cells.len(), 25);
        assert_eq!(game.current_move(), 0);
        assert_eq!(game.next_mark(), Mark::X);
    }

    #[test]
    fn pure_transitions_leave_original_untouched() {
        let start = GameState::at_start(BoardSize::CLASSIC);
        let after = start.after_move(4);
        assert_eq!(start.history().len(), 1);
        assert_eq!(after.history().len(), 2);

        let back = after.after_jump(0);
        assert_eq!(after.current_move(), 1);
        assert_eq!(back.current_move(), 0);

        let resized = back.after_board_size_change(size(10));
        assert_eq!(resized.current_snapshot().cells.len(), 100);
        assert_eq!(back.board_size(), BoardSize::CLASSIC);
    }

    #[test]
    fn history_snapshots_differ_by_one_new_mark() {
        let game = GameState::from_moves(size(5), [12, 0, 13, 24, 6, 7]);
        for pair in game.history().windows(2) {
            assert_eq!(pair[1].added_cells_since(&pair[0]).len(), 1);
            assert_eq!(pair[1].num_marks(), pair[0].num_marks() + 1);
        }
    }

    #[test]
    fn five_by_five_diagonal_win() {
        // X on the main diagonal, O along the top row's right side
        let game = GameState::from_moves(size(5), [0, 1, 6, 2, 12, 3, 18, 9, 24]);
        assert_eq!(game.winner(), Some(Mark::X));
        assert_eq!(
            game.winning_line().map(|line| line.cells.clone()),
            Some(vec![0, 6, 12, 18, 24])
        );
    }

    #[test]
    fn four_by_four_fills_without_winner() {
        let game = GameState::from_moves(size(4), 0..16);
        assert_eq!(game.history().len(), 17);
        assert!(!game.has_winner());
        assert!(game.is_draw());
    }

    #[test]
    fn move_descriptions_match_history_length() {
        let game = GameState::from_moves(BoardSize::CLASSIC, [0, 4]);
        assert_eq!(
            game.move_descriptions(),
            vec!["Go to game start", "Go to move #1", "Go to move #2"]
        );
    }

    #[test]
    fn reset_keeps_board_size() {
        let mut game = GameState::from_moves(size(10), [0, 1, 2]);
        game.reset();
        assert_eq!(game, GameState::at_start(size(10)));
    }
}
