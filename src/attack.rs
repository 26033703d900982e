use crate::board::{Board, Cell, Color, Piece, PieceKind};
use crate::coord::Location;
use crate::moves::Move;

pub const ORTHOGONAL: [isize; 4] = [12, -12, 1, -1];
pub const DIAGONAL: [isize; 4] = [13, 11, -11, -13];
pub const KNIGHT: [isize; 8] = [25, 23, 14, 10, -10, -14, -23, -25];
pub const KING: [isize; 8] = [12, -12, 1, -1, 13, 11, -11, -13];

fn cell_at(board: &Board, base: Location, delta: isize) -> (isize, Cell) {
    let index = base.index() as isize + delta;
    (index, board.cell(index as usize))
}

fn holds(board: &Board, base: Location, delta: isize, piece: Piece) -> bool {
    cell_at(board, base, delta).1 == Cell::Piece(piece)
}

/// True if any piece of `by` could capture on `target`.
pub fn is_attacked(board: &Board, target: Location, by: Color) -> bool {
    attacked_by_pieces(board, target, by) || attacked_by_king(board, target, by)
}

/// Every attacker except the king. Kept apart from the king probe so that
/// king-versus-king never needs a recursive check.
pub fn attacked_by_pieces(board: &Board, target: Location, by: Color) -> bool {
    let pawn = Piece::new(by, PieceKind::Pawn);
    let behind = -by.forward();
    if holds(board, target, behind + 1, pawn) || holds(board, target, behind - 1, pawn) {
        return true;
    }

    let knight = Piece::new(by, PieceKind::Knight);
    if KNIGHT.iter().any(|&d| holds(board, target, d, knight)) {
        return true;
    }

    slider_hits(board, target, by, &ORTHOGONAL, PieceKind::Rook)
        || slider_hits(board, target, by, &DIAGONAL, PieceKind::Bishop)
}

fn slider_hits(board: &Board, target: Location, by: Color, dirs: &[isize], kind: PieceKind) -> bool {
    for &d in dirs {
        let mut delta = d;
        loop {
            match cell_at(board, target, delta).1 {
                Cell::Empty => delta += d,
                Cell::OffBoard => break,
                Cell::Piece(p) => {
                    if p.color == by && (p.kind == kind || p.kind == PieceKind::Queen) {
                        return true;
                    }
                    break;
                }
            }
        }
    }
    false
}

/// Single-step reach of the king of `by`.
pub fn attacked_by_king(board: &Board, target: Location, by: Color) -> bool {
    let king = Piece::new(by, PieceKind::King);
    KING.iter().any(|&d| holds(board, target, d, king))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attacker {
    pub location: Location,
    pub piece: Piece,
}

/// Attackers of one square, per color, in the order they would join an
/// exchange on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attackers {
    white: Vec<Attacker>,
    black: Vec<Attacker>,
}

impl Attackers {
    pub fn of(&self, color: Color) -> &[Attacker] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn of_mut(&mut self, color: Color) -> &mut Vec<Attacker> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

/// Whether `piece`, found `step` cells from the target along `d`, bears on
/// the target through everything in between.
fn bears_along(piece: Piece, d: isize, step: usize, diagonal: bool) -> bool {
    match piece.kind {
        PieceKind::Queen => true,
        PieceKind::Rook => !diagonal,
        PieceKind::Bishop => diagonal,
        PieceKind::King => step == 1,
        PieceKind::Pawn => {
            let back = -piece.color.forward();
            step == 1 && (d == back + 1 || d == back - 1)
        }
        PieceKind::Knight => false,
    }
}

/// Attackers of `target` for both colors, cheapest first. A slider hidden
/// behind another attacker on the same line is only released after that
/// attacker; among released attackers the cheaper one goes first. A slider
/// hidden behind an enemy piece goes last.
pub fn attackers(board: &Board, target: Location) -> Attackers {
    // Chains per color: each chain must be consumed front to back.
    let mut chains: [Vec<Vec<Attacker>>; 2] = [Vec::new(), Vec::new()];
    let mut late: [Vec<Attacker>; 2] = [Vec::new(), Vec::new()];

    for &d in &KNIGHT {
        let (index, cell) = cell_at(board, target, d);
        if let Cell::Piece(piece) = cell {
            if piece.kind == PieceKind::Knight {
                if let Some(location) = Location::from_index(index as usize) {
                    chains[piece.color.index()].push(vec![Attacker { location, piece }]);
                }
            }
        }
    }

    for (dirs, diagonal) in [(&ORTHOGONAL, false), (&DIAGONAL, true)] {
        for &d in dirs.iter() {
            let mut ray: Vec<Attacker> = Vec::new();
            let mut delta = d;
            let mut step = 1;
            loop {
                let (index, cell) = cell_at(board, target, delta);
                match cell {
                    Cell::OffBoard => break,
                    Cell::Empty => {}
                    Cell::Piece(piece) => {
                        if !bears_along(piece, d, step, diagonal) {
                            break;
                        }
                        if let Some(location) = Location::from_index(index as usize) {
                            ray.push(Attacker { location, piece });
                        }
                    }
                }
                delta += d;
                step += 1;
            }

            let Some(first) = ray.first().map(|a| a.piece.color) else {
                continue;
            };
            let mut chain = Vec::new();
            let mut mixed = false;
            for attacker in ray {
                if attacker.piece.color != first {
                    mixed = true;
                }
                if mixed {
                    late[attacker.piece.color.index()].push(attacker);
                } else {
                    chain.push(attacker);
                }
            }
            chains[first.index()].push(chain);
        }
    }

    let mut result = Attackers::default();
    for color in [Color::White, Color::Black] {
        let list = result.of_mut(color);
        merge_chains(std::mem::take(&mut chains[color.index()]), list);
        let mut tail = std::mem::take(&mut late[color.index()]);
        tail.sort_by_key(|a| a.piece.value());
        list.extend(tail);
    }
    result
}

fn merge_chains(chains: Vec<Vec<Attacker>>, out: &mut Vec<Attacker>) {
    let mut heads = vec![0usize; chains.len()];
    loop {
        let mut pick: Option<(usize, i32)> = None;
        for (i, chain) in chains.iter().enumerate() {
            if let Some(a) = chain.get(heads[i]) {
                let value = a.piece.value();
                if pick.map_or(true, |(_, best)| value < best) {
                    pick = Some((i, value));
                }
            }
        }
        match pick {
            Some((i, _)) => {
                out.push(chains[i][heads[i]]);
                heads[i] += 1;
            }
            None => break,
        }
    }
}

/// Static exchange evaluation: material the mover expects to net from the
/// capture sequence `mv` starts on its destination square.
pub fn static_exchange(board: &Board, mv: &Move) -> i32 {
    let us = mv.piece.color;
    let all = attackers(board, mv.to);
    let mut lists = [all.of(Color::White).to_vec(), all.of(Color::Black).to_vec()];
    lists[us.index()].retain(|a| a.location != mv.from);

    let promotion_gain = mv.placed_piece().value() - mv.piece.value();
    let mut gain = vec![mv.captured.map_or(0, |p| p.value()) + promotion_gain];
    let mut on_square = mv.placed_piece().value();
    let mut side = us.opposite();
    let mut cursor = [0usize; 2];

    while let Some(next) = lists[side.index()].get(cursor[side.index()]) {
        cursor[side.index()] += 1;
        let previous = gain[gain.len() - 1];
        gain.push(on_square - previous);
        on_square = next.piece.value();
        side = side.opposite();
    }

    while gain.len() > 1 {
        let last = gain.pop().unwrap_or(0);
        let len = gain.len();
        gain[len - 1] = -(-gain[len - 1]).max(last);
    }
    gain[0]
}
