use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Color, Piece};
use crate::coord::{Location, GRID_CELLS};

const SEED: u64 = 0x5A1D_0F15_4A11_3D5E;

/// Random keys for the incremental position hash.
pub struct ZobristKeys {
    /// Indexed by [color][kind][grid index].
    pieces: Vec<[[u64; GRID_CELLS]; 6]>,
    black_to_move: u64,
    en_passant: [u64; 8],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut pieces = vec![[[0u64; GRID_CELLS]; 6]; 2];
        for color in pieces.iter_mut() {
            for kind in color.iter_mut() {
                for key in kind.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let black_to_move = rng.gen();
        let mut en_passant = [0u64; 8];
        for key in en_passant.iter_mut() {
            *key = rng.gen();
        }
        Self {
            pieces,
            black_to_move,
            en_passant,
        }
    }

    pub fn piece(&self, piece: Piece, loc: Location) -> u64 {
        self.pieces[piece.color.index()][piece.kind.index()][loc.index()]
    }

    pub fn side(&self) -> u64 {
        self.black_to_move
    }

    /// Key for the en-passant target's file.
    pub fn en_passant(&self, target: Location) -> u64 {
        self.en_passant[target.file() as usize]
    }

    pub fn side_to_move(&self, color: Color) -> u64 {
        match color {
            Color::White => 0,
            Color::Black => self.black_to_move,
        }
    }
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

/// Process-wide keys, generated once from a fixed seed.
pub fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(ZobristKeys::generate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;
    use std::collections::HashSet;

    #[test]
    fn test_keys_unique_on_playing_squares() {
        let keys = keys();
        let mut seen = HashSet::new();
        for color in [Color::White, Color::Black] {
            for kind in PieceKind::ALL {
                for loc in Location::all() {
                    assert!(seen.insert(keys.piece(Piece::new(color, kind), loc)));
                }
            }
        }
        assert!(seen.insert(keys.side()));
        for file in 0..8 {
            let loc = Location::from_file_rank(file, 2).unwrap();
            assert!(seen.insert(keys.en_passant(loc)));
        }
    }

    #[test]
    fn test_keys_are_stable() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn);
        let e4 = Location::from_algebraic("e4").unwrap();
        assert_eq!(keys().piece(pawn, e4), ZobristKeys::generate().piece(pawn, e4));
        assert_eq!(keys().side_to_move(Color::White), 0);
    }
}
