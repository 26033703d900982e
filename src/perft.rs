use crate::moves::Move;
use crate::ordering::OrderHints;
use crate::position::Position;

/// Counts the leaf positions reachable from `position` in exactly `depth`
/// legal plies. The position is restored before returning.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves(&OrderHints::none());
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        let mut child = position.apply(&mv);
        nodes += perft(&mut child, depth - 1);
    }
    nodes
}

/// Per-root-move leaf counts, in move generation order.
pub fn divide(position: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = position.legal_moves(&OrderHints::none());
    moves
        .into_iter()
        .map(|mv| {
            let count = {
                let mut child = position.apply(&mv);
                perft(&mut child, depth - 1)
            };
            (mv, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shallow_initial_counts() {
        let mut position = Position::new();
        assert_eq!(perft(&mut position, 0), 1);
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 2), 400);
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut position = Position::new();
        let split = divide(&mut position, 3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 8_902);
        let e2e4 = split.iter().find(|(m, _)| m.long_algebraic() == "e2e4").unwrap();
        assert_eq!(e2e4.1, 600);
    }
}
