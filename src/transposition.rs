use std::collections::HashMap;

use tracing::trace;

use crate::moves::Move;

/// Scores at least this far from zero encode a forced mate.
pub const MATE: i32 = 100_000;
pub const MATE_THRESHOLD: i32 = MATE - 1_000;

/// How many resident entries are compared when one has to make room.
const EVICTION_SAMPLE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Exact,
    LowerBound,
    UpperBound,
}

impl NodeType {
    /// Classifies a node's final score against the window it was searched
    /// with.
    pub fn classify(score: i32, original_alpha: i32, beta: i32) -> Self {
        if score <= original_alpha {
            NodeType::UpperBound
        } else if score >= beta {
            NodeType::LowerBound
        } else {
            NodeType::Exact
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspositionEntry {
    pub hash: u64,
    pub depth: u32,
    pub score: i32,
    pub node_type: NodeType,
    pub best_move: Option<Move>,
}

pub struct TranspositionTable {
    table: HashMap<u64, TranspositionEntry>,
    size: usize,
}

impl TranspositionTable {
    pub fn new(size: usize) -> Self {
        Self {
            table: HashMap::with_capacity(size.min(1 << 20)),
            size,
        }
    }

    /// Depth-preferred insert: an existing entry for the same hash is only
    /// replaced by one searched at least as deep. Returns whether the entry
    /// was kept.
    pub fn store(&mut self, hash: u64, entry: TranspositionEntry) -> bool {
        if self.size == 0 {
            return false;
        }
        match self.table.get(&hash) {
            Some(existing) if existing.depth > entry.depth => {
                trace!(hash, kept = existing.depth, offered = entry.depth, "tt store refused");
                return false;
            }
            Some(_) => {}
            None => {
                if self.table.len() >= self.size {
                    self.evict_shallowest();
                }
            }
        }
        self.table.insert(hash, entry);
        true
    }

    fn evict_shallowest(&mut self) {
        let victim = self
            .table
            .values()
            .take(EVICTION_SAMPLE)
            .min_by_key(|e| e.depth)
            .map(|e| e.hash);
        if let Some(hash) = victim {
            self.table.remove(&hash);
        }
    }

    pub fn retrieve(&self, hash: u64) -> Option<&TranspositionEntry> {
        self.table.get(&hash)
    }

    /// A cached score usable at this node, if any: the entry must come
    /// from at least `depth` and its bound must agree with the window.
    /// Mate scores are re-anchored to `ply`.
    pub fn probe(&self, hash: u64, depth: u32, alpha: i32, beta: i32, ply: u32) -> Option<i32> {
        let entry = self.table.get(&hash)?;
        if entry.depth < depth {
            return None;
        }
        let score = score_from_table(entry.score, ply);
        match entry.node_type {
            NodeType::Exact => Some(score),
            NodeType::LowerBound if score >= beta => Some(score),
            NodeType::UpperBound if score <= alpha => Some(score),
            _ => None,
        }
    }

    pub fn best_move(&self, hash: u64) -> Option<&Move> {
        self.table.get(&hash).and_then(|entry| entry.best_move.as_ref())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

/// Mate scores are kept as distance from the stored node, not from the root.
pub fn score_to_table(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

pub fn score_from_table(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}
