use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::perft::perft;
use crate::position::{GameState, Position};
use crate::search::{Search, SearchConfig};

/// Line-oriented driving loop around one game.
///
/// Commands: `new`, `fen <fen>`, `go [depth N] [movetime MS]`, `perft N`,
/// `state`, `quit`; anything else is read as a move in long-form
/// coordinates (`e2e4`, `e7e8q`).
pub struct Driver {
    position: Position,
    search: Search,
    defaults: SearchConfig,
    auto_reply: bool,
}

impl Driver {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            position: Position::new(),
            search: Search::with_config(config.clone()),
            defaults: config,
            auto_reply: false,
        }
    }

    /// Answer every accepted human move with an engine move.
    pub fn with_auto_reply(mut self, auto_reply: bool) -> Self {
        self.auto_reply = auto_reply;
        self
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let command = line.trim();
            if command == "quit" {
                break;
            }
            match self.handle_command(command) {
                Ok(response) if response.is_empty() => {}
                Ok(response) => writeln!(output, "{}", response)?,
                Err(e) => {
                    warn!(command, error = %e, "command rejected");
                    writeln!(output, "error: {:#}", e)?;
                }
            }
            output.flush()?;
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(String::new());
        }

        match parts[0] {
            "new" => Ok(self.handle_new()),
            "fen" => self.handle_fen(&parts[1..]),
            "go" => self.handle_go(&parts[1..]),
            "perft" => self.handle_perft(&parts[1..]),
            "state" => Ok(self.handle_state()),
            "quit" => Ok(String::new()),
            text => self.handle_move(text),
        }
    }

    fn handle_new(&mut self) -> String {
        self.position = Position::new();
        self.search.clear();
        "ok".to_string()
    }

    fn handle_fen(&mut self, parts: &[&str]) -> Result<String> {
        let fen = parts.join(" ");
        let position = Position::from_fen(&fen).with_context(|| format!("cannot load '{}'", fen))?;
        self.position = position;
        self.search.clear();
        Ok("ok".to_string())
    }

    fn handle_go(&mut self, parts: &[&str]) -> Result<String> {
        let mut max_depth = self.defaults.max_depth;
        let mut max_time = self.defaults.max_time;

        let mut iter = parts.iter();
        while let Some(&key) = iter.next() {
            let value = iter
                .next()
                .with_context(|| format!("'{}' needs a value", key))?;
            match key {
                "depth" => {
                    max_depth = value
                        .parse()
                        .with_context(|| format!("invalid depth '{}'", value))?;
                }
                "movetime" => {
                    let millis: u64 = value
                        .parse()
                        .with_context(|| format!("invalid movetime '{}'", value))?;
                    max_time = Duration::from_millis(millis);
                }
                other => bail!("unknown go option '{}'", other),
            }
        }

        self.search.set_max_depth(max_depth);
        self.search.set_max_time(max_time);
        Ok(self.engine_move())
    }

    fn engine_move(&mut self) -> String {
        let Some(result) = self.search.select_move(&mut self.position) else {
            return format!("bestmove (none)\n{}", self.handle_state());
        };
        info!(
            best = %result.best_move,
            score = result.score,
            depth = result.depth,
            nodes = result.stats.total_nodes(),
            "engine move"
        );
        let line = format!(
            "bestmove {} score {} depth {} nodes {}",
            result.best_move,
            result.score,
            result.depth,
            result.stats.total_nodes()
        );
        self.position.make(&result.best_move);
        match self.position.game_state() {
            GameState::Ongoing => line,
            _ => format!("{}\n{}", line, self.handle_state()),
        }
    }

    fn handle_perft(&mut self, parts: &[&str]) -> Result<String> {
        let depth: u32 = parts
            .first()
            .context("perft needs a depth")?
            .parse()
            .context("invalid perft depth")?;
        let nodes = perft(&mut self.position, depth);
        Ok(format!("nodes {}", nodes))
    }

    fn handle_state(&mut self) -> String {
        let state = match self.position.game_state() {
            GameState::Ongoing => "ongoing".to_string(),
            GameState::Checkmate(winner) => format!("checkmate, {:?} wins", winner),
            GameState::Stalemate => "stalemate".to_string(),
            GameState::FiftyMoveRule => "draw by fifty-move rule".to_string(),
            GameState::InsufficientMaterial => "draw by insufficient material".to_string(),
        };
        format!("{} ({})", self.position.to_fen(), state)
    }

    fn handle_move(&mut self, text: &str) -> Result<String> {
        let next = self.position.apply_human_move(text)?;
        self.position = next;

        if self.auto_reply && self.position.game_state() == GameState::Ongoing {
            return Ok(self.engine_move());
        }
        Ok(self.handle_state())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;
    use crate::notation::START_FEN;

    fn quick() -> Driver {
        Driver::new(SearchConfig {
            max_depth: 2,
            ..SearchConfig::default()
        })
    }

    #[test]
    fn test_moves_and_state() {
        let mut driver = quick();
        let response = driver.handle_command("e2e4").unwrap();
        assert!(response.starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"));
        assert!(response.ends_with("(ongoing)"));

        assert_eq!(driver.handle_command("new").unwrap(), "ok");
        assert_eq!(driver.position().to_fen(), START_FEN);
    }

    #[test]
    fn test_rejected_move_keeps_position() {
        let mut driver = quick();
        let err = driver.handle_command("e2e5").unwrap_err();
        assert_eq!(
            err.downcast_ref::<MoveError>(),
            Some(&MoveError::IllegalPattern("e2e5".to_string()))
        );
        assert_eq!(driver.position(), &Position::new());
    }

    #[test]
    fn test_go_plays_a_move() {
        let mut driver = quick();
        driver
            .handle_command("fen 6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1")
            .unwrap();
        let response = driver.handle_command("go depth 2").unwrap();
        assert!(response.starts_with("bestmove a1a8"));
        assert!(response.contains("checkmate, White wins"));
        assert_eq!(driver.position().side_to_move(), crate::board::Color::Black);
    }

    #[test]
    fn test_bad_commands() {
        let mut driver = quick();
        assert!(driver.handle_command("fen not a position").is_err());
        assert!(driver.handle_command("go depth").is_err());
        assert!(driver.handle_command("go speed 3").is_err());
        assert!(driver.handle_command("perft x").is_err());
        assert_eq!(driver.handle_command("perft 2").unwrap(), "nodes 400");
        assert_eq!(driver.handle_command("").unwrap(), "");
    }

    #[test]
    fn test_run_with_script() {
        let mut driver = quick().with_auto_reply(true);
        let script = b"e2e4\nbogus\nquit\ne7e5\n";
        let mut out = Vec::new();
        driver.run_with(&script[..], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("bestmove "));
        assert!(lines[1].starts_with("error: "));
        assert_eq!(lines.len(), 2);
        assert_eq!(driver.position().side_to_move(), crate::board::Color::White);
    }
}
