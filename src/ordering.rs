use crate::coord::GRID_CELLS;
use crate::moves::Move;
use crate::position::Position;

pub const KILLER_SLOTS: usize = 3;

/// Quiet moves that caused a cutoff, per search ply. Slot 0 is the most
/// recent hit.
#[derive(Debug, Clone, Default)]
pub struct KillerTable {
    slots: Vec<Vec<Move>>,
}

impl KillerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cutoff move at `ply`. Captures, promotions and moves that
    /// would leave the mover in check are ignored. A move already present
    /// moves to the front instead of taking a second slot.
    pub fn store(&mut self, position: &mut Position, mv: Move, ply: usize) {
        if !mv.is_quiet() || !position.avoids_check(&mv) {
            return;
        }
        if self.slots.len() <= ply {
            self.slots.resize_with(ply + 1, Vec::new);
        }
        let slots = &mut self.slots[ply];
        if let Some(existing) = slots.iter().position(|k| *k == mv) {
            slots.remove(existing);
        } else if slots.len() == KILLER_SLOTS {
            slots.pop();
        }
        slots.insert(0, mv);
    }

    pub fn killers(&self, ply: usize) -> &[Move] {
        self.slots.get(ply).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Accumulated subtree sizes per (piece, destination).
#[derive(Debug, Clone)]
pub struct HistoryTable {
    scores: Box<[[[u64; GRID_CELLS]; 6]; 2]>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            scores: Box::new([[[0; GRID_CELLS]; 6]; 2]),
        }
    }

    pub fn store(&mut self, mv: &Move, subtree_nodes: u64) {
        let cell = &mut self.scores[mv.piece.color.index()][mv.piece.kind.index()][mv.to.index()];
        *cell = cell.saturating_add(subtree_nodes);
    }

    pub fn score(&self, mv: &Move) -> u64 {
        self.scores[mv.piece.color.index()][mv.piece.kind.index()][mv.to.index()]
    }

    pub fn clear(&mut self) {
        for color in self.scores.iter_mut() {
            for kind in color.iter_mut() {
                kind.fill(0);
            }
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// What `Position::legal_moves` may use to order a node's moves.
#[derive(Debug, Clone, Copy)]
pub struct OrderHints<'a> {
    pub hash_move: Option<&'a Move>,
    pub killers: &'a [Move],
    pub history: Option<&'a HistoryTable>,
    pub exact_see: bool,
}

impl<'a> OrderHints<'a> {
    /// Static ordering only: MVV/LVA captures, quiet moves in generation
    /// order.
    pub fn none() -> Self {
        Self {
            hash_move: None,
            killers: &[],
            history: None,
            exact_see: false,
        }
    }

    /// Sort key for a quiet move, larger first: killer slot, then history.
    pub fn quiet_score(&self, mv: &Move) -> (usize, u64) {
        let killer = self
            .killers
            .iter()
            .position(|k| k == mv)
            .map_or(0, |slot| KILLER_SLOTS - slot);
        let history = self.history.map_or(0, |h| h.score(mv));
        (killer, history)
    }
}
