use crate::attack::{DIAGONAL, KING, KNIGHT, ORTHOGONAL};
use crate::board::{Cell, Piece, PieceKind};
use crate::coord::Location;
use crate::moves::Move;
use crate::position::Position;

/// Pseudo-legal moves of `piece` on `from` that capture nothing.
/// Castling is produced by `Position::castle_candidates`.
pub fn non_captures(position: &Position, from: Location, piece: Piece, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => pawn_pushes(position, from, piece, out),
        PieceKind::Knight => step_moves(position, from, piece, &KNIGHT, false, out),
        PieceKind::King => step_moves(position, from, piece, &KING, false, out),
        PieceKind::Bishop => slide_moves(position, from, piece, &DIAGONAL, false, out),
        PieceKind::Rook => slide_moves(position, from, piece, &ORTHOGONAL, false, out),
        PieceKind::Queen => slide_moves(position, from, piece, &KING, false, out),
    }
}

/// Pseudo-legal captures of `piece` on `from`, promotion-captures and en
/// passant included.
pub fn captures(position: &Position, from: Location, piece: Piece, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => pawn_captures(position, from, piece, out),
        PieceKind::Knight => step_moves(position, from, piece, &KNIGHT, true, out),
        PieceKind::King => step_moves(position, from, piece, &KING, true, out),
        PieceKind::Bishop => slide_moves(position, from, piece, &DIAGONAL, true, out),
        PieceKind::Rook => slide_moves(position, from, piece, &ORTHOGONAL, true, out),
        PieceKind::Queen => slide_moves(position, from, piece, &KING, true, out),
    }
}

fn step_moves(
    position: &Position,
    from: Location,
    piece: Piece,
    offsets: &[isize],
    capturing: bool,
    out: &mut Vec<Move>,
) {
    let board = position.board();
    for &d in offsets {
        let Some(to) = from.offset(d) else {
            continue;
        };
        match board.get(to) {
            None if !capturing => out.push(Move::new(from, to, piece, None)),
            Some(target) if capturing && target.color != piece.color => {
                out.push(Move::new(from, to, piece, Some(target)))
            }
            _ => {}
        }
    }
}

fn slide_moves(
    position: &Position,
    from: Location,
    piece: Piece,
    dirs: &[isize],
    capturing: bool,
    out: &mut Vec<Move>,
) {
    let board = position.board();
    for &d in dirs {
        let mut current = from;
        while let Some(to) = current.offset(d) {
            match board.get(to) {
                None => {
                    if !capturing {
                        out.push(Move::new(from, to, piece, None));
                    }
                    current = to;
                }
                Some(target) => {
                    if capturing && target.color != piece.color {
                        out.push(Move::new(from, to, piece, Some(target)));
                    }
                    break;
                }
            }
        }
    }
}

fn push_promotions(from: Location, to: Location, piece: Piece, captured: Option<Piece>, out: &mut Vec<Move>) {
    for kind in PieceKind::PROMOTIONS {
        out.push(Move::new_promotion(from, to, piece, captured, kind));
    }
}

fn pawn_pushes(position: &Position, from: Location, piece: Piece, out: &mut Vec<Move>) {
    let board = position.board();
    let forward = piece.color.forward();
    let Some(one) = from.offset(forward) else {
        return;
    };
    if !board.is_empty(one) {
        return;
    }
    if one.rank() == piece.color.promotion_rank() {
        push_promotions(from, one, piece, None, out);
        return;
    }
    out.push(Move::new(from, one, piece, None));

    if from.rank() == piece.color.pawn_rank() {
        if let Some(two) = one.offset(forward) {
            if board.is_empty(two) {
                out.push(Move::new_double_push(from, two, piece));
            }
        }
    }
}

fn pawn_captures(position: &Position, from: Location, piece: Piece, out: &mut Vec<Move>) {
    let board = position.board();
    let forward = piece.color.forward();
    for side in [1, -1] {
        let index = from.index() as isize + forward + side;
        let Some(to) = Location::from_index(index as usize) else {
            continue;
        };
        match board.cell(to.index()) {
            Cell::Piece(target) if target.color != piece.color => {
                if to.rank() == piece.color.promotion_rank() {
                    push_promotions(from, to, piece, Some(target), out);
                } else {
                    out.push(Move::new(from, to, piece, Some(target)));
                }
            }
            Cell::Empty if position.en_passant() == Some(to) => {
                out.push(Move::new_en_passant(from, to, piece));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    fn loc(s: &str) -> Location {
        Location::from_algebraic(s).unwrap()
    }

    fn generate(fen: &str, square: &str) -> (Vec<Move>, Vec<Move>) {
        let position = Position::from_fen(fen).unwrap();
        let from = loc(square);
        let piece = position.board().get(from).unwrap();
        let mut quiet = Vec::new();
        let mut loud = Vec::new();
        non_captures(&position, from, piece, &mut quiet);
        captures(&position, from, piece, &mut loud);
        (quiet, loud)
    }

    #[test]
    fn test_pawn_pushes_from_start() {
        let (quiet, loud) = generate("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", "e2");
        assert_eq!(quiet.len(), 2);
        assert!(loud.is_empty());
        assert!(quiet.iter().any(|m| m.en_passant_target() == Some(loc("e3"))));
    }

    #[test]
    fn test_blocked_pawn() {
        let (quiet, _) = generate("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", "e2");
        assert!(quiet.is_empty());
        let (quiet, loud) = generate("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1", "e2");
        assert_eq!(quiet.len(), 1);
        assert!(loud.is_empty());
    }

    #[test]
    fn test_pawn_captures_and_en_passant() {
        let (_, loud) = generate("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5");
        assert_eq!(loud.len(), 1);
        assert_eq!(loud[0].capture_square(), loc("d5"));

        let (_, loud) = generate("4k3/8/8/8/8/3r1b2/4P3/4K3 w - - 0 1", "e2");
        assert_eq!(loud.len(), 2);
    }

    #[test]
    fn test_promotions() {
        let (quiet, loud) = generate("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", "a7");
        assert_eq!(quiet.len(), 4);
        assert_eq!(loud.len(), 4);
        assert!(loud.iter().all(|m| m.is_promotion() && m.is_capture()));
        assert_eq!(quiet[0].promotion(), Some(PieceKind::Queen));
    }

    #[test]
    fn test_sliders_stop_at_first_piece() {
        let (quiet, loud) = generate("4k3/8/8/8/R2p4/8/8/4K3 w - - 0 1", "a4");
        // a5..a8, a1..a3, b4, c4
        assert_eq!(quiet.len(), 9);
        assert_eq!(loud.len(), 1);
        assert_eq!(loud[0].to, loc("d4"));
    }

    #[test]
    fn test_no_capture_of_own_piece() {
        let (quiet, loud) = generate("4k3/8/8/8/8/8/8/4K1NR w - - 0 1", "g1");
        assert!(loud.is_empty());
        assert_eq!(quiet.len(), 3);
        assert!(quiet.iter().all(|m| m.piece == Piece::new(Color::White, PieceKind::Knight)));
    }
}
