use serde::Serialize;
use tsify::Tsify;
use wasm_bindgen::prelude::*;

pub mod core;

use crate::core::{board_size::BoardSize, game::GameState, mark};

/// Everything the board component needs for one render.
#[derive(Clone, Debug, PartialEq, Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub board_size: usize,
    pub squares: Vec<String>,
    pub winning_squares: Option<Vec<usize>>,
    pub x_is_next: bool,
    pub current_move: usize,
    pub status: String,
    pub moves: Vec<MoveEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct MoveEntry {
    pub move_index: usize,
    pub description: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardSizeOption {
    value: usize,
    label: String,
}

fn squares_text(state: &GameState) -> Vec<String> {
    state
        .current_snapshot()
        .cells
        .iter()
        .map(|cell| mark::cell_text(*cell).to_string())
        .collect()
}

fn game_view(state: &GameState) -> GameView {
    GameView {
        board_size: state.board_size().get(),
        squares: squares_text(state),
        winning_squares: state.winning_line().map(|line| line.cells.clone()),
        x_is_next: state.x_is_next(),
        current_move: state.current_move(),
        status: state.status_text(),
        moves: state
            .move_descriptions()
            .into_iter()
            .enumerate()
            .map(|(move_index, description)| MoveEntry {
                move_index,
                description,
            })
            .collect(),
    }
}

#[wasm_bindgen(js_name = "boardSizeOptionsJson")]
pub fn board_size_options_json() -> String {
    let options = BoardSize::RECOGNIZED
        .iter()
        .map(|size| BoardSizeOption {
            value: size.get(),
            label: size.label(),
        })
        .collect::<Vec<_>>();

    serde_json::to_string(&options).unwrap_or_else(|_| "[]".to_string())
}

fn parse_board_size(board_size: usize) -> Result<BoardSize, JsValue> {
    BoardSize::new(board_size).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub struct GameHandle {
    state: GameState,
}

#[wasm_bindgen]
impl GameHandle {
    pub fn summary(&self, indentation_level: usize) -> String {
        self.state.summary(indentation_level)
    }

    /// Returns false when the click is a no-op (occupied cell, game already won).
    #[wasm_bindgen(js_name = "commitMove")]
    pub fn commit_move(&mut self, cell_index: usize) -> bool {
        self.state.commit_move(cell_index).is_placed()
    }

    #[wasm_bindgen(js_name = "jumpToMove")]
    pub fn jump_to_move(&mut self, move_index: usize) -> bool {
        self.state.jump_to_move(move_index)
    }

    #[wasm_bindgen(js_name = "changeBoardSize")]
    pub fn change_board_size(&mut self, board_size: usize) -> Result<(), JsValue> {
        let board_size = parse_board_size(board_size)?;
        self.state.change_board_size(board_size);
        Ok(())
    }

    #[wasm_bindgen(js_name = "resetGame")]
    pub fn reset_game(&mut self) {
        self.state.reset();
    }

    #[wasm_bindgen(js_name = "boardSize")]
    pub fn board_size(&self) -> usize {
        self.state.board_size().get()
    }

    #[wasm_bindgen(js_name = "currentMove")]
    pub fn current_move(&self) -> usize {
        self.state.current_move()
    }

    #[wasm_bindgen(js_name = "historyLength")]
    pub fn history_length(&self) -> usize {
        self.state.history().len()
    }

    #[wasm_bindgen(js_name = "xIsNext")]
    pub fn x_is_next(&self) -> bool {
        self.state.x_is_next()
    }

    /// `""`, `"X"` or `"O"` per cell, row-major.
    pub fn squares(&self) -> Vec<String> {
        squares_text(&self.state)
    }

    #[wasm_bindgen(js_name = "winningSquares")]
    pub fn winning_squares(&self) -> Vec<u32> {
        self.state
            .winning_line()
            .map(|line| line.cells.iter().map(|&idx| idx as u32).collect())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "hasWinner")]
    pub fn has_winner(&self) -> bool {
        self.state.has_winner()
    }

    #[wasm_bindgen(js_name = "winnerMark")]
    pub fn winner_mark(&self) -> String {
        self.state
            .winner()
            .map(|mark| mark.to_string())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "statusText")]
    pub fn status_text(&self) -> String {
        self.state.status_text()
    }

    #[wasm_bindgen(js_name = "moveDescriptionsJson")]
    pub fn move_descriptions_json(&self) -> String {
        serde_json::to_string(&self.state.move_descriptions()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&game_view(&self.state)).map_err(JsValue::from)
    }
}

#[wasm_bindgen(js_name = "newGame")]
pub fn new_game(board_size: usize) -> Result<GameHandle, JsValue> {
    let board_size = parse_board_size(board_size)?;
    Ok(GameHandle {
        state: GameState::at_start(board_size),
    })
}

#[wasm_bindgen(js_name = "newDefaultGame")]
pub fn new_default_game() -> GameHandle {
    GameHandle {
        state: GameState::default(),
    }
}

#[wasm_bindgen(js_name = "boardSizeOptions")]
pub fn board_size_options() -> Vec<u32> {
    BoardSize::RECOGNIZED
        .iter()
        .map(|size| size.get() as u32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_of_new_game_is_blank() {
        let view = game_view(&GameState::at_start(BoardSize::CLASSIC));
        assert_eq!(view.board_size, 3);
        assert_eq!(view.squares, vec![String::new(); 9]);
        assert_eq!(view.winning_squares, None);
        assert!(view.x_is_next);
        assert_eq!(view.status, "You are at move #0");
        assert_eq!(
            view.moves,
            vec![MoveEntry {
                move_index: 0,
                description: "Go to game start".to_string()
            }]
        );
    }

    #[test]
    fn view_serializes_with_camel_case_keys() {
        let state = GameState::from_moves(BoardSize::CLASSIC, [0, 4, 1, 5, 2]);
        let json = serde_json::to_value(game_view(&state)).unwrap();
        assert_eq!(json["winningSquares"], serde_json::json!([0, 1, 2]));
        assert_eq!(json["squares"][4], "O");
        assert_eq!(json["status"], "Winner: X");
        assert_eq!(json["moves"][5]["description"], "Go to move #5");
    }

    #[test]
    fn handle_drives_state_without_js_values() {
        let mut handle = new_default_game();
        assert!(handle.commit_move(4));
        assert!(!handle.commit_move(4));
        assert_eq!(handle.squares()[4], "X");
        assert!(handle.jump_to_move(0));
        assert_eq!(handle.history_length(), 2);
        assert!(handle.commit_move(0));
        assert_eq!(handle.history_length(), 2);
        assert_eq!(handle.winning_squares(), Vec::<u32>::new());
        assert_eq!(handle.winner_mark(), "");
    }

    #[test]
    fn board_size_options_match_selector() {
        assert_eq!(board_size_options(), vec![3, 5, 10, 15]);
        assert_eq!(
            board_size_options_json(),
            r#"[{"value":3,"label":"3x3"},{"value":5,"label":"5x5"},{"value":10,"label":"10x10"},{"value":15,"label":"15x15"}]"#
        );
    }
}
