use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::evaluation::Evaluator;
use crate::moves::Move;
use crate::ordering::{HistoryTable, KillerTable, OrderHints};
use crate::position::Position;
use crate::transposition::{
    score_to_table, NodeType, TranspositionEntry, TranspositionTable, MATE, MATE_THRESHOLD,
};

/// Wider than any reachable score, and safe to negate.
pub const INFINITY: i32 = MATE + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub max_time: Duration,
    pub tt_size: usize,
    pub use_quiescence: bool,
    pub use_transposition: bool,
    /// Order captures by static exchange instead of MVV/LVA.
    pub exact_see: bool,
    pub max_quiescence_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            max_time: Duration::from_secs(5),
            tt_size: 1_000_000, // 1 million entries
            use_quiescence: true,
            use_transposition: true,
            exact_see: true,
            max_quiescence_depth: 8,
        }
    }
}

impl SearchConfig {
    pub fn set_max_depth(&mut self, depth: u32) {
        self.max_depth = depth.max(1);
    }

    pub fn set_max_time(&mut self, max_time: Duration) {
        self.max_time = max_time;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub tt_hits: u64,
    pub cutoffs: u64,
}

impl SearchStats {
    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.quiescence_nodes
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    /// Deepest iteration the result comes from.
    pub depth: u32,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

impl SearchResult {
    /// Plies to mate when the score is a forced mate, negative when the
    /// side to move is the one getting mated.
    pub fn mate_in(&self) -> Option<i32> {
        if self.score >= MATE_THRESHOLD {
            Some(MATE - self.score)
        } else if self.score <= -MATE_THRESHOLD {
            Some(-(MATE + self.score))
        } else {
            None
        }
    }
}

/// One search session. Owns every cache the search consults; they persist
/// across `select_move` calls until `clear`.
pub struct Search {
    config: SearchConfig,
    evaluator: Evaluator,
    transposition_table: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    stats: SearchStats,
    start_time: Instant,
}

impl Search {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self::with_evaluator(config, Evaluator::new())
    }

    pub fn with_evaluator(config: SearchConfig, evaluator: Evaluator) -> Self {
        Self {
            transposition_table: TranspositionTable::new(config.tt_size),
            config,
            evaluator,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            stats: SearchStats::default(),
            start_time: Instant::now(),
        }
    }

    /// Forgets everything learned so far (new game).
    pub fn clear(&mut self) {
        self.transposition_table.clear();
        self.killers.clear();
        self.history.clear();
        self.stats = SearchStats::default();
    }

    /// Iterative deepening up to the configured depth. The time budget is
    /// only checked between root moves; an iteration cut short is used only
    /// if no earlier one completed. `None` when there is no legal move.
    #[instrument(level = "debug", skip_all, fields(max_depth = self.config.max_depth))]
    pub fn select_move(&mut self, position: &mut Position) -> Option<SearchResult> {
        self.stats = SearchStats::default();
        self.start_time = Instant::now();

        let mut result: Option<SearchResult> = None;
        for depth in 1..=self.config.max_depth.max(1) {
            let (best_move, score, complete) = self.search_root(position, depth)?;

            debug!(
                depth,
                score,
                nodes = self.stats.total_nodes(),
                elapsed_ms = self.start_time.elapsed().as_millis() as u64,
                best = %best_move,
                complete,
                "iteration finished"
            );

            if complete || result.is_none() {
                result = Some(SearchResult {
                    best_move,
                    score,
                    depth,
                    stats: self.stats,
                    elapsed: self.start_time.elapsed(),
                });
            }

            if !complete || self.out_of_time() || score.abs() >= MATE_THRESHOLD {
                break;
            }
        }
        result
    }

    fn search_root(&mut self, position: &mut Position, depth: u32) -> Option<(Move, i32, bool)> {
        self.stats.nodes += 1;
        let hash = position.hash();
        let moves = self.ordered_moves(position, hash, 0);
        let count = moves.len();

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(Move, i32)> = None;
        let mut complete = true;

        for (i, mv) in moves.into_iter().enumerate() {
            let score = {
                let mut child = position.apply(&mv);
                -self.negamax(&mut child, depth - 1, 1, -beta, -alpha)
            };

            if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);

            // Check if we've exceeded the time limit
            if i + 1 < count && self.out_of_time() {
                complete = false;
                break;
            }
        }

        let (best_move, score) = best?;
        if complete && self.config.use_transposition {
            self.transposition_table.store(
                hash,
                TranspositionEntry {
                    hash,
                    depth,
                    score: score_to_table(score, 0),
                    node_type: NodeType::Exact,
                    best_move: Some(best_move.clone()),
                },
            );
        }
        Some((best_move, score, complete))
    }

    fn negamax(&mut self, position: &mut Position, depth: u32, ply: u32, mut alpha: i32, beta: i32) -> i32 {
        self.stats.nodes += 1;
        let hash = position.hash();
        let original_alpha = alpha;

        if self.config.use_transposition {
            if let Some(score) = self.transposition_table.probe(hash, depth, alpha, beta, ply) {
                self.stats.tt_hits += 1;
                return score;
            }
        }

        if depth == 0 {
            return self.leaf(position, ply, alpha, beta);
        }

        let moves = self.ordered_moves(position, hash, ply);
        if moves.is_empty() {
            return terminal_score(position, ply);
        }

        let mut best_score = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            let visited_before = self.stats.total_nodes();
            let score = {
                let mut child = position.apply(&mv);
                -self.negamax(&mut child, depth - 1, ply + 1, -beta, -alpha)
            };

            if score > best_score {
                best_score = score;
                best_move = Some(mv.clone());
            }
            alpha = alpha.max(score);

            // Alpha-beta pruning
            if beta <= alpha {
                self.stats.cutoffs += 1;
                if mv.is_quiet() {
                    let subtree = self.stats.total_nodes() - visited_before;
                    self.history.store(&mv, subtree);
                    self.killers.store(position, mv, ply as usize);
                }
                break;
            }
        }

        if self.config.use_transposition {
            let entry = TranspositionEntry {
                hash,
                depth,
                score: score_to_table(best_score, ply),
                node_type: NodeType::classify(best_score, original_alpha, beta),
                best_move,
            };
            self.transposition_table.store(hash, entry);
        }

        best_score
    }

    fn leaf(&mut self, position: &mut Position, ply: u32, alpha: i32, beta: i32) -> i32 {
        if self.config.use_quiescence {
            self.quiescence(position, ply, 0, alpha, beta)
        } else {
            self.evaluator.evaluate(position)
        }
    }

    /// Captures-only extension past the horizon. The static score is a
    /// lower bound (the mover may decline every capture), and the walk
    /// stops when no capture raises alpha, when a capture fails high, or
    /// after `max_quiescence_depth` plies of captures.
    fn quiescence(&mut self, position: &mut Position, ply: u32, qdepth: u32, mut alpha: i32, beta: i32) -> i32 {
        self.stats.quiescence_nodes += 1;

        let stand_pat = self.evaluator.evaluate(position);
        if stand_pat >= beta {
            return beta;
        }
        if alpha < stand_pat {
            alpha = stand_pat;
        }
        if qdepth >= self.config.max_quiescence_depth {
            return alpha;
        }

        for mv in position.legal_captures(self.config.exact_see) {
            let score = {
                let mut child = position.apply(&mv);
                -self.quiescence(&mut child, ply + 1, qdepth + 1, -beta, -alpha)
            };

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    fn ordered_moves(&mut self, position: &mut Position, hash: u64, ply: u32) -> Vec<Move> {
        let hash_move = if self.config.use_transposition {
            self.transposition_table.best_move(hash).cloned()
        } else {
            None
        };
        let hints = OrderHints {
            hash_move: hash_move.as_ref(),
            killers: self.killers.killers(ply as usize),
            history: Some(&self.history),
            exact_see: self.config.exact_see,
        };
        position.legal_moves(&hints)
    }

    /// Full-window alpha-beta value of `position` searched to `depth`.
    pub fn alpha_beta(&mut self, position: &mut Position, depth: u32) -> i32 {
        self.negamax(position, depth, 0, -INFINITY, INFINITY)
    }

    /// Unpruned negamax with the same leaf and terminal scoring as the
    /// alpha-beta search. Exponentially slower; meant for verification.
    pub fn minimax(&mut self, position: &mut Position, depth: u32) -> i32 {
        self.minimax_at(position, depth, 0)
    }

    fn minimax_at(&mut self, position: &mut Position, depth: u32, ply: u32) -> i32 {
        self.stats.nodes += 1;
        if depth == 0 {
            return self.leaf(position, ply, -INFINITY, INFINITY);
        }

        let moves = position.legal_moves(&OrderHints::none());
        if moves.is_empty() {
            return terminal_score(position, ply);
        }

        let mut best_score = -INFINITY;
        for mv in moves {
            let mut child = position.apply(&mv);
            best_score = best_score.max(-self.minimax_at(&mut child, depth - 1, ply + 1));
        }
        best_score
    }

    fn out_of_time(&self) -> bool {
        self.start_time.elapsed() > self.config.max_time
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.config.set_max_depth(depth);
    }

    pub fn set_max_time(&mut self, max_time: Duration) {
        self.config.set_max_time(max_time);
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.transposition_table
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

/// Score of a node without legal moves: mated (the sooner the worse) or
/// stalemate.
fn terminal_score(position: &Position, ply: u32) -> i32 {
    if position.in_check() {
        -(MATE - ply as i32)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_config(depth: u32) -> SearchConfig {
        SearchConfig {
            max_depth: depth,
            use_quiescence: false,
            use_transposition: false,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_pruning_matches_minimax() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4k3/8/8/3q4/8/2N5/3R4/4K3 w - - 0 1",
            "6k1/5ppp/8/8/8/8/5PPP/R5K1 b - - 0 1",
        ];
        for (fen, depth) in fens.into_iter().zip([2, 3, 3]) {
            let mut position = Position::from_fen(fen).unwrap();
            let mut pruned = Search::with_config(plain_config(depth));
            let mut full = Search::with_config(plain_config(depth));
            let a = pruned.alpha_beta(&mut position, depth);
            let pruned_nodes = pruned.stats().nodes;
            let b = full.minimax(&mut position, depth);
            assert_eq!(a, b, "{fen}");
            assert!(pruned_nodes <= full.stats().nodes, "{fen}");
            assert_eq!(position, Position::from_fen(fen).unwrap());
        }
    }

    #[test]
    fn test_finds_back_rank_mate() {
        let mut position = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
        let mut search = Search::with_config(SearchConfig {
            max_depth: 3,
            ..SearchConfig::default()
        });
        let result = search.select_move(&mut position).unwrap();
        assert_eq!(result.best_move.long_algebraic(), "a1a8");
        assert_eq!(result.score, MATE - 1);
        assert_eq!(result.mate_in(), Some(1));
    }

    #[test]
    fn test_terminal_positions() {
        let mut search = Search::with_config(plain_config(2));

        let mut mated = Position::from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
        assert!(search.select_move(&mut mated).is_none());
        assert_eq!(search.alpha_beta(&mut mated, 2), -MATE);

        let mut stalemate = Position::from_fen("k7/8/1Q6/8/8/8/8/2K5 b - - 0 1").unwrap();
        assert_eq!(search.alpha_beta(&mut stalemate, 3), 0);
    }

    #[test]
    fn test_wins_hanging_queen() {
        let mut position = Position::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();
        let mut search = Search::with_config(SearchConfig {
            max_depth: 2,
            ..SearchConfig::default()
        });
        let result = search.select_move(&mut position).unwrap();
        assert_eq!(result.best_move.long_algebraic(), "d2d5");
        assert!(result.score > 300);
    }

    #[test]
    fn test_quiescence_sees_recapture() {
        // Rxd5 loses the rook to the pawn on e6 once quiescence looks past
        // the horizon.
        let fen = "4k3/8/4p3/3p4/8/8/3R4/4K3 w - - 0 1";
        let mut shallow = Search::with_config(SearchConfig {
            use_quiescence: false,
            use_transposition: false,
            ..SearchConfig::default()
        });
        let mut position = Position::from_fen(fen).unwrap();
        let blind = shallow.alpha_beta(&mut position, 1);

        let mut deep = Search::with_config(SearchConfig {
            use_transposition: false,
            ..SearchConfig::default()
        });
        let seen = deep.alpha_beta(&mut position, 1);
        assert!(blind > seen);
        assert!(deep.stats().quiescence_nodes > 0);
    }

    #[test]
    fn test_time_budget_still_returns_a_move() {
        let mut position = Position::new();
        let mut search = Search::with_config(SearchConfig {
            max_depth: 6,
            max_time: Duration::ZERO,
            ..SearchConfig::default()
        });
        let result = search.select_move(&mut position).unwrap();
        assert_eq!(result.depth, 1);
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_caches_persist_until_clear() {
        let mut position = Position::new();
        let mut search = Search::with_config(SearchConfig {
            max_depth: 3,
            max_time: Duration::from_secs(60),
            ..SearchConfig::default()
        });
        search.select_move(&mut position).unwrap();
        assert!(!search.transposition_table().is_empty());
        assert!(search
            .transposition_table()
            .best_move(position.hash())
            .is_some());
        search.clear();
        assert!(search.transposition_table().is_empty());
    }
}
