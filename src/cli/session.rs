use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};
use tic_tac_toe_rust::core::{
    board_size::BoardSize,
    game::{GameState, MoveOutcome},
    snapshot::EMPTY_CELL_CHAR,
};

pub struct Session {
    game: GameState,
    use_color: bool,
    should_quit: bool,
}

impl Session {
    pub fn new(board_size: BoardSize, use_color: bool) -> Self {
        Self {
            game: GameState::at_start(board_size),
            use_color,
            should_quit: false,
        }
    }

    pub fn start(&mut self, script: Option<&str>, interactive: bool) {
        self.print_game();

        if let Some(script) = script {
            self.interpret_line(script);
        }

        if interactive && !self.should_quit {
            self.interpretation_loop();
        }
    }

    fn interpretation_loop(&mut self) {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            print!("{}", self.user_prompt_text());
            let _ = io::stdout().flush();

            match lines.next() {
                Some(Ok(line)) => {
                    self.interpret_line(&line);
                    if self.should_quit {
                        return;
                    }
                }
                Some(Err(err)) => {
                    tracing::warn!(%err, "failed to read stdin");
                    return;
                }
                None => return,
            }
        }
    }

    fn interpret_line(&mut self, line: &str) {
        for subline in line.trim_end_matches(['\r', '\n']).split(';') {
            self.interpret_directive(subline);
            if self.should_quit {
                return;
            }
        }
    }

    fn interpret_directive(&mut self, directive: &str) {
        const TAG_QUIT: &str = "q";
        const TAG_DISPLAY: &str = "d";
        const TAG_RESET: &str = "r";
        const TAG_REPEAT: &str = "x";
        const TAG_HISTORY: &str = "h";
        const TAG_UNDO: &str = "u";
        const TAG_JUMP: &str = "j";
        const TAG_JUMP_LONG: &str = "jump";
        const TAG_SIZE: &str = "s";
        const TAG_SIZE_LONG: &str = "size";

        let directive = without_comments(directive);
        let tokens = directive.split_whitespace().collect::<Vec<_>>();
        let Some(directive_tag) = tokens.first().map(|token| token.to_lowercase()) else {
            return;
        };

        if directive_tag == TAG_QUIT {
            self.should_quit = true;
        } else if directive_tag == TAG_DISPLAY {
            self.print_game();
        } else if directive_tag == TAG_RESET {
            println!("(RESET)");
            self.game.reset();
            self.print_game();
        } else if directive_tag == TAG_UNDO {
            println!("(UNDO)");
            match self.game.current_move().checked_sub(1) {
                Some(prev_move) => {
                    self.game.jump_to_move(prev_move);
                    self.print_game();
                }
                None => println!("  already at game start"),
            }
        } else if directive_tag == TAG_JUMP || directive_tag == TAG_JUMP_LONG {
            match tokens.get(1).and_then(|token| token.parse::<usize>().ok()) {
                Some(move_index) if self.game.jump_to_move(move_index) => self.print_game(),
                Some(move_index) => println!(
                    "  no move #{move_index}; history has moves 0..={}",
                    self.game.history().len() - 1
                ),
                None => println!("  {TAG_JUMP_LONG} directive needs one integer token"),
            }
        } else if directive_tag == TAG_SIZE || directive_tag == TAG_SIZE_LONG {
            if tokens.len() != 2 {
                println!("  {TAG_SIZE_LONG} directive needs one board size token");
            } else {
                match tokens[1].parse::<BoardSize>() {
                    Ok(board_size) => {
                        if !board_size.is_recognized() {
                            println!("  note: {} is not one of the standard sizes", board_size.label());
                        }
                        self.game.change_board_size(board_size);
                        self.print_game();
                    }
                    Err(err) => println!("  {err}"),
                }
            }
        } else if directive_tag == TAG_REPEAT {
            match tokens.get(1).and_then(|token| token.parse::<usize>().ok()) {
                Some(num_repeats) if tokens.len() > 2 => {
                    let directive_text = tokens[2..].join(" ");
                    println!("(REPEAT {num_repeats}: {directive_text})");
                    for _ in 0..num_repeats {
                        self.interpret_directive(&directive_text);
                    }
                }
                _ => println!("directive {directive_tag} needs repetition count and directive to repeat"),
            }
        } else if directive_tag == TAG_HISTORY {
            println!("{TAG_SIZE} {}; {TAG_RESET};", self.game.board_size());
            let moves = self
                .game
                .moves_played()
                .iter()
                .map(|cell_index| cell_index.to_string())
                .collect::<Vec<_>>();
            println!("{}", moves.join(" "));
            for (move_index, description) in self.game.move_descriptions().iter().enumerate() {
                let marker = if move_index == self.game.current_move() { ">" } else { " " };
                println!(" {marker} {move_index:>3}: {description}");
            }
        } else if directive_tag
            .chars()
            .next()
            .is_some_and(|ch| ch.is_ascii_digit())
        {
            self.do_moves_tokens(&tokens);
        } else {
            let mut explanations = vec![
                "d       | display board",
                "h       | display move history",
                "j/jump [int] | view move [int] without changing history",
                "q       | quit",
                "r       | reset game at current size",
                "s/size [int|NxN] | change board size (resets game)",
                "u       | step back one move",
                "x [n] [cmd] | repeat [cmd] n times",
                "[cell] or [row,col] ... | place marks for the players to move",
            ];
            explanations.sort();
            println!("  unrecognized directive '{directive}'");
            for explanation in explanations {
                println!("  {explanation}");
            }
        }
    }

    fn do_moves_tokens(&mut self, tokens: &[&str]) {
        let board_size = self.game.board_size();
        let mut cell_indices = Vec::with_capacity(tokens.len());

        for token in tokens {
            match parse_cell_token(token, board_size) {
                Some(cell_index) => cell_indices.push(cell_index),
                None => {
                    println!("  failed parse for cell from '{token}'");
                    return;
                }
            }
        }

        for cell_index in cell_indices {
            if let MoveOutcome::Ignored(reason) = self.game.commit_move(cell_index) {
                println!("  move at {cell_index} ignored: {reason}");
            }
        }

        self.print_game();
    }

    fn print_game(&self) {
        println!("{}", self.render_board());
        println!("  {}", self.game.status_text());
    }

    fn render_board(&self) -> String {
        let board_size = self.game.board_size().get();
        let cell_width = (board_size * board_size - 1).to_string().len().max(1);
        let header = (0..board_size)
            .map(|col| format!("{col:>cell_width$}"))
            .collect::<Vec<_>>()
            .join(" ");
        let mut lines = vec![format!("  {:>3} {header}", "")];

        for (row, cells) in self.game.current_snapshot().rows().enumerate() {
            let rendered = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let text = cell
                        .map(|mark| mark.as_char())
                        .unwrap_or(EMPTY_CELL_CHAR)
                        .to_string();
                    let padded = format!("{text:>cell_width$}");
                    let cell_index = row * board_size + col;
                    if self.use_color && self.game.is_winning_cell(cell_index) {
                        padded.bold().green().to_string()
                    } else {
                        padded
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(format!("  {row:>3} {rendered}"));
        }

        lines.join("\n")
    }

    fn user_prompt_text(&self) -> String {
        match self.game.winner() {
            Some(mark) => format!("{mark} WON> "),
            None => format!("{}> ", self.game.next_mark()),
        }
    }
}

/// Strips parenthesized comments; an unclosed `(` comments out the rest.
fn without_comments(directive: &str) -> String {
    let mut working = directive.to_string();
    while let Some(start_idx) = working.find('(') {
        if let Some(end_rel) = working[start_idx..].find(')') {
            let end_idx = start_idx + end_rel;
            working.replace_range(start_idx..=end_idx, "");
        } else {
            working.truncate(start_idx);
            break;
        }
    }
    working
}

/// `7` is a cell index; `2,1` or `2@1` is row 2, column 1.
fn parse_cell_token(token: &str, board_size: BoardSize) -> Option<usize> {
    let subtokens = token.split([',', '@']).collect::<Vec<_>>();
    match subtokens.as_slice() {
        [cell] => cell.parse::<usize>().ok(),
        [row, col] => {
            let row = row.parse::<usize>().ok()?;
            let col = col.parse::<usize>().ok()?;
            board_size.cell_index(row, col)
        }
        _ => None,
    }
}
