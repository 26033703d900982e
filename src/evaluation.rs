use crate::board::{Color, PieceKind};
use crate::position::Position;

pub struct Evaluator {
    // Bonus for a piece standing at a given Chebyshev distance (index) from
    // the enemy king. Distance 0 never occurs.
    pub tropism_bonus: [i32; 8],

    // Multiplier per piece kind, indexed by `PieceKind::index`
    pub tropism_weight: [i32; 6],

    pub use_tropism: bool,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            tropism_bonus: [0, 12, 9, 6, 3, 1, 0, 0],
            // Pawns and the king take no part in tropism
            tropism_weight: [0, 2, 1, 1, 3, 0],
            use_tropism: true,
        }
    }

    /// Plain material balance, nothing positional.
    pub fn material_only() -> Self {
        Self {
            use_tropism: false,
            ..Self::new()
        }
    }

    /// Score from the point of view of the side to move.
    pub fn evaluate(&self, position: &Position) -> i32 {
        let us = position.side_to_move();
        let them = us.opposite();

        let mut score = position.material(us) - position.material(them);

        if self.use_tropism {
            score += self.king_tropism(position, us) - self.king_tropism(position, them);
        }

        score
    }

    fn king_tropism(&self, position: &Position, color: Color) -> i32 {
        let enemy_king = position.king(color.opposite());
        position
            .pieces(color)
            .map(|(loc, piece)| {
                let weight = self.tropism_weight[piece.kind.index()];
                if weight == 0 {
                    return 0;
                }
                let distance = loc.distance(enemy_king) as usize;
                weight * self.tropism_bonus[distance.min(7)]
            })
            .sum()
    }

    pub fn piece_value(&self, kind: PieceKind) -> i32 {
        kind.value()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position_is_balanced() {
        let position = Position::new();
        assert_eq!(Evaluator::new().evaluate(&position), 0);
        assert_eq!(Evaluator::material_only().evaluate(&position), 0);
    }

    #[test]
    fn test_material_is_side_relative() {
        let white = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        let evaluator = Evaluator::material_only();
        assert_eq!(evaluator.evaluate(&white), evaluator.piece_value(PieceKind::Rook));
        assert_eq!(evaluator.evaluate(&black), -evaluator.piece_value(PieceKind::Rook));
    }

    #[test]
    fn test_tropism_rewards_pieces_near_the_enemy_king() {
        let near = Position::from_fen("4k3/8/3N4/8/8/8/8/4K3 w - - 0 1").unwrap();
        let far = Position::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();
        let evaluator = Evaluator::new();
        assert!(evaluator.evaluate(&near) > evaluator.evaluate(&far));
        assert_eq!(
            Evaluator::material_only().evaluate(&near),
            Evaluator::material_only().evaluate(&far)
        );
    }
}
