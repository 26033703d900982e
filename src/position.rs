use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use crate::attack;
use crate::board::{Board, Color, Piece, PieceKind};
use crate::coord::{Location, GRID_CELLS};
use crate::error::NotationError;
use crate::movegen;
use crate::moves::{CastleSide, Move, MoveKind};
use crate::ordering::OrderHints;
use crate::zobrist;

pub const WHITE_KINGSIDE: u8 = 0b0001;
pub const WHITE_QUEENSIDE: u8 = 0b0010;
pub const BLACK_KINGSIDE: u8 = 0b0100;
pub const BLACK_QUEENSIDE: u8 = 0b1000;
pub const ALL_CASTLING: u8 = 0b1111;

/// Rights forfeited when a move starts or ends on a square.
const CASTLE_REVOKE: [u8; GRID_CELLS] = {
    let mut table = [0u8; GRID_CELLS];
    table[2 * 12 + 2] = WHITE_QUEENSIDE;
    table[2 * 12 + 6] = WHITE_KINGSIDE | WHITE_QUEENSIDE;
    table[2 * 12 + 9] = WHITE_KINGSIDE;
    table[9 * 12 + 2] = BLACK_QUEENSIDE;
    table[9 * 12 + 6] = BLACK_KINGSIDE | BLACK_QUEENSIDE;
    table[9 * 12 + 9] = BLACK_KINGSIDE;
    table
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Checkmate(Color), // Color is the winner
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
}

/// State `make` destroys and `unmake` needs back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    castling_rights: u8,
    en_passant: Option<Location>,
    halfmove_clock: u32,
    hash: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    pieces: [BTreeMap<Location, Piece>; 2],
    side_to_move: Color,
    castling_rights: u8,
    en_passant: Option<Location>,
    hash: u64,
    kings: [Location; 2],
    material: [i32; 2],
    halfmove_clock: u32,
    ply: u32,
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Self {
        // The starting layout always has both kings.
        match Self::from_parts(Board::new(), Color::White, ALL_CASTLING, None, 0, 0) {
            Ok(position) => position,
            Err(err) => unreachable!("starting layout rejected: {err}"),
        }
    }

    /// Builds a position from raw state, deriving the piece index, king
    /// locations, material and hash.
    pub fn from_parts(
        board: Board,
        side_to_move: Color,
        castling_rights: u8,
        en_passant: Option<Location>,
        halfmove_clock: u32,
        ply: u32,
    ) -> Result<Self, NotationError> {
        let mut pieces = [BTreeMap::new(), BTreeMap::new()];
        let mut kings: [Vec<Location>; 2] = [Vec::new(), Vec::new()];
        let mut material = [0i32; 2];
        for (loc, piece) in board.pieces() {
            pieces[piece.color.index()].insert(loc, piece);
            material[piece.color.index()] += piece.value();
            if piece.kind == PieceKind::King {
                kings[piece.color.index()].push(loc);
            }
        }

        let white_king = single_king(&kings[0], Color::White)?;
        let black_king = single_king(&kings[1], Color::Black)?;

        let mut position = Self {
            board,
            pieces,
            side_to_move,
            castling_rights: castling_rights & ALL_CASTLING,
            en_passant,
            hash: 0,
            kings: [white_king, black_king],
            material,
            halfmove_clock,
            ply,
        };
        position.hash = position.compute_hash();
        Ok(position)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> u8 {
        self.castling_rights
    }

    pub fn en_passant(&self) -> Option<Location> {
        self.en_passant
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn king(&self, color: Color) -> Location {
        self.kings[color.index()]
    }

    /// Sum of piece values for `color`, king included.
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Half-moves played since the game started.
    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn fullmove_number(&self) -> u32 {
        self.ply / 2 + 1
    }

    /// Occupied squares of one color, in grid order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Location, Piece)> + '_ {
        self.pieces[color.index()].iter().map(|(&loc, &piece)| (loc, piece))
    }

    /// Zobrist hash rebuilt from scratch. Search never calls this; it exists
    /// to check the incremental value.
    pub fn compute_hash(&self) -> u64 {
        let keys = zobrist::keys();
        let mut hash = keys.side_to_move(self.side_to_move);
        for (loc, piece) in self.board.pieces() {
            hash ^= keys.piece(piece, loc);
        }
        if let Some(target) = self.en_passant {
            hash ^= keys.en_passant(target);
        }
        hash
    }

    /// Piece index and board agree square for square.
    pub fn index_matches_board(&self) -> bool {
        let indexed = self.pieces[0].len() + self.pieces[1].len();
        indexed == self.board.pieces().count()
            && self
                .board
                .pieces()
                .all(|(loc, piece)| self.pieces[piece.color.index()].get(&loc) == Some(&piece))
    }

    fn lift(&mut self, loc: Location) -> Option<Piece> {
        let piece = self.board.get(loc)?;
        self.board.set(loc, None);
        self.pieces[piece.color.index()].remove(&loc);
        Some(piece)
    }

    fn place(&mut self, loc: Location, piece: Piece) {
        self.board.set(loc, Some(piece));
        self.pieces[piece.color.index()].insert(loc, piece);
    }

    /// Applies `mv` in place. The returned `Undo` must be handed back to
    /// `unmake` together with the same move.
    pub fn make(&mut self, mv: &Move) -> Undo {
        let undo = Undo {
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        };
        let us = self.side_to_move;
        let them = us.opposite();
        let keys = zobrist::keys();

        if let Some(captured) = mv.captured {
            self.lift(mv.capture_square());
            self.material[them.index()] -= captured.value();
        }
        self.lift(mv.from);
        let placed = mv.placed_piece();
        self.place(mv.to, placed);
        self.material[us.index()] += placed.value() - mv.piece.value();

        if mv.piece.kind == PieceKind::King {
            self.kings[us.index()] = mv.to;
        }
        if let Some((rook_from, rook_to)) = mv.rook_squares() {
            if let Some(rook) = self.lift(rook_from) {
                self.place(rook_to, rook);
            }
        }

        self.castling_rights &= !(CASTLE_REVOKE[mv.from.index()] | CASTLE_REVOKE[mv.to.index()]);

        if let Some(old) = self.en_passant {
            self.hash ^= keys.en_passant(old);
        }
        self.en_passant = mv.en_passant_target();
        self.hash ^= mv.hash_delta() ^ keys.side();

        if mv.piece.kind == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.ply += 1;
        self.side_to_move = them;
        undo
    }

    /// Exact inverse of `make`.
    pub fn unmake(&mut self, mv: &Move, undo: Undo) {
        let keys = zobrist::keys();
        let them = self.side_to_move;
        let us = them.opposite();
        self.side_to_move = us;
        self.ply -= 1;

        if let Some((rook_from, rook_to)) = mv.rook_squares() {
            if let Some(rook) = self.lift(rook_to) {
                self.place(rook_from, rook);
            }
        }
        let placed = mv.placed_piece();
        self.lift(mv.to);
        self.place(mv.from, mv.piece);
        self.material[us.index()] -= placed.value() - mv.piece.value();
        if let Some(captured) = mv.captured {
            self.place(mv.capture_square(), captured);
            self.material[them.index()] += captured.value();
        }
        if mv.piece.kind == PieceKind::King {
            self.kings[us.index()] = mv.from;
        }

        self.hash ^= mv.hash_delta() ^ keys.side();
        if let Some(old) = undo.en_passant {
            self.hash ^= keys.en_passant(old);
        }
        self.en_passant = undo.en_passant;
        self.castling_rights = undo.castling_rights;
        self.halfmove_clock = undo.halfmove_clock;

        debug_assert_eq!(self.hash, undo.hash, "hash diverged unmaking {mv}");
        debug_assert!(self.index_matches_board(), "piece index diverged unmaking {mv}");
    }

    /// Applies `mv` for the lifetime of the returned guard, which derefs to
    /// the position and unmakes the move when dropped.
    pub fn apply<'a>(&'a mut self, mv: &'a Move) -> MoveGuard<'a> {
        let undo = self.make(mv);
        MoveGuard {
            position: self,
            mv,
            undo,
        }
    }

    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        attack::is_attacked(&self.board, self.king(us), us.opposite())
    }

    pub fn enemy_in_check(&self) -> bool {
        let them = self.side_to_move.opposite();
        attack::is_attacked(&self.board, self.king(them), self.side_to_move)
    }

    /// Whether playing `mv` keeps the mover's king out of check. Touches
    /// only the board and restores it before returning.
    pub fn avoids_check(&mut self, mv: &Move) -> bool {
        let us = mv.piece.color;
        let capture_square = mv.capture_square();
        let rooks = mv.rook_squares();

        let saved_from = self.board.get(mv.from);
        let saved_to = self.board.get(mv.to);
        let saved_capture = self.board.get(capture_square);
        let saved_rooks = rooks.map(|(a, b)| (self.board.get(a), self.board.get(b)));

        self.board.set(mv.from, None);
        self.board.set(capture_square, None);
        self.board.set(mv.to, Some(mv.placed_piece()));
        if let Some((rook_from, rook_to)) = rooks {
            self.board.set(rook_from, None);
            self.board.set(rook_to, Some(Piece::new(us, PieceKind::Rook)));
        }

        let king = if mv.piece.kind == PieceKind::King {
            mv.to
        } else {
            self.king(us)
        };
        let safe = !attack::is_attacked(&self.board, king, us.opposite());

        if let (Some((rook_from, rook_to)), Some((at_from, at_to))) = (rooks, saved_rooks) {
            self.board.set(rook_to, at_to);
            self.board.set(rook_from, at_from);
        }
        self.board.set(capture_square, saved_capture);
        self.board.set(mv.to, saved_to);
        self.board.set(mv.from, saved_from);
        safe
    }

    /// Castles available to the side to move: right still held, squares
    /// between king and rook empty, and the king neither starts on, crosses
    /// nor lands on an attacked square.
    pub fn castle_candidates(&self) -> Vec<Move> {
        let us = self.side_to_move;
        let them = us.opposite();
        let (row, rights) = match us {
            Color::White => (2, (WHITE_KINGSIDE, WHITE_QUEENSIDE)),
            Color::Black => (9, (BLACK_KINGSIDE, BLACK_QUEENSIDE)),
        };
        let mut moves = Vec::new();
        let Some(home) = Location::new(row, 6) else {
            return moves;
        };
        let king = Piece::new(us, PieceKind::King);
        if self.king(us) != home || self.castling_rights & (rights.0 | rights.1) == 0 {
            return moves;
        }
        if attack::is_attacked(&self.board, home, them) {
            return moves;
        }

        let sides = [
            (CastleSide::King, rights.0, &[7u8, 8][..], &[7u8, 8][..], 8u8),
            (CastleSide::Queen, rights.1, &[3u8, 4, 5][..], &[5u8, 4][..], 4u8),
        ];
        for (side, right, between, crossed, king_col) in sides {
            if self.castling_rights & right == 0 {
                continue;
            }
            let (rook_col, _) = side.rook_columns();
            let rook_home = Location::new(row, rook_col).and_then(|loc| self.board.get(loc));
            if rook_home != Some(Piece::new(us, PieceKind::Rook)) {
                continue;
            }
            let clear = between
                .iter()
                .filter_map(|&col| Location::new(row, col))
                .all(|loc| self.board.is_empty(loc));
            if !clear {
                continue;
            }
            let safe = crossed
                .iter()
                .filter_map(|&col| Location::new(row, col))
                .all(|loc| !attack::is_attacked(&self.board, loc, them));
            if !safe {
                continue;
            }
            if let Some(to) = Location::new(row, king_col) {
                moves.push(Move::new_castling(home, to, king, side));
            }
        }
        moves
    }

    /// Every pseudo-legal move for the side to move, castles included.
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (from, piece) in self.pieces(self.side_to_move) {
            movegen::captures(self, from, piece, &mut moves);
            movegen::non_captures(self, from, piece, &mut moves);
        }
        moves.extend(self.castle_candidates());
        moves
    }

    /// Legal moves in search order: hash move, promotion-captures, captures,
    /// promotions, castles, quiet moves.
    pub fn legal_moves(&mut self, hints: &OrderHints) -> Vec<Move> {
        let candidates = self.pseudo_legal_moves();

        let mut first = None;
        let mut promotion_captures = Vec::new();
        let mut captures = Vec::new();
        let mut promotions = Vec::new();
        let mut castles = Vec::new();
        let mut quiet = Vec::new();

        for mv in candidates {
            if !self.avoids_check(&mv) {
                continue;
            }
            if hints.hash_move == Some(&mv) {
                first = Some(mv);
                continue;
            }
            match (mv.is_capture(), mv.kind) {
                (true, MoveKind::Promotion(_)) => promotion_captures.push(mv),
                (true, _) => captures.push(mv),
                (false, MoveKind::Promotion(_)) => promotions.push(mv),
                (false, MoveKind::Castle(_)) => castles.push(mv),
                (false, _) => quiet.push(mv),
            }
        }

        promotion_captures.sort_by_key(|mv| {
            std::cmp::Reverse((mv.placed_piece().value(), mv.captured.map_or(0, |p| p.value())))
        });
        if hints.exact_see {
            let board = &self.board;
            captures.sort_by_cached_key(|mv| {
                std::cmp::Reverse((attack::static_exchange(board, mv), mvv_lva(mv)))
            });
        } else {
            captures.sort_by_key(|mv| std::cmp::Reverse(mvv_lva(mv)));
        }
        quiet.sort_by_cached_key(|mv| std::cmp::Reverse(hints.quiet_score(mv)));

        let mut moves = Vec::with_capacity(
            1 + promotion_captures.len() + captures.len() + promotions.len() + castles.len() + quiet.len(),
        );
        moves.extend(first);
        moves.extend(promotion_captures);
        moves.extend(captures);
        moves.extend(promotions);
        moves.extend(castles);
        moves.extend(quiet);
        moves
    }

    /// Legal captures only (promotion-captures and en passant included),
    /// best first. Used by quiescence.
    pub fn legal_captures(&mut self, exact_see: bool) -> Vec<Move> {
        let mut moves = Vec::new();
        let side = self.side_to_move;
        let origins: Vec<(Location, Piece)> = self.pieces(side).collect();
        for (from, piece) in origins {
            movegen::captures(self, from, piece, &mut moves);
        }
        moves.retain(|mv| mv.promotion().map_or(true, |kind| kind == PieceKind::Queen));
        let mut legal: Vec<Move> = Vec::with_capacity(moves.len());
        for mv in moves {
            if self.avoids_check(&mv) {
                legal.push(mv);
            }
        }
        if exact_see {
            let board = &self.board;
            legal.sort_by_cached_key(|mv| std::cmp::Reverse((attack::static_exchange(board, mv), mvv_lva(mv))));
        } else {
            legal.sort_by_key(|mv| std::cmp::Reverse(mvv_lva(mv)));
        }
        legal
    }

    pub fn has_legal_move(&mut self) -> bool {
        let candidates = self.pseudo_legal_moves();
        candidates.iter().any(|mv| self.avoids_check(mv))
    }

    /// Mate and stalemate take precedence over the draw rules, so a mate
    /// delivered on the hundredth half-move still counts.
    pub fn game_state(&mut self) -> GameState {
        if !self.has_legal_move() {
            return if self.in_check() {
                // The side to move is in check and has no legal moves
                GameState::Checkmate(self.side_to_move.opposite())
            } else {
                GameState::Stalemate
            };
        }
        if self.is_insufficient_material() {
            return GameState::InsufficientMaterial;
        }
        if self.halfmove_clock >= 100 {
            return GameState::FiftyMoveRule;
        }
        GameState::Ongoing
    }

    fn is_insufficient_material(&self) -> bool {
        let mut minors = Vec::new();
        for color in [Color::White, Color::Black] {
            for (loc, piece) in self.pieces(color) {
                match piece.kind {
                    PieceKind::King => {}
                    PieceKind::Knight | PieceKind::Bishop => minors.push((loc, piece)),
                    _ => return false,
                }
            }
        }
        match minors.as_slice() {
            // King vs King, or a single minor piece
            [] | [_] => true,
            // King and Bishop vs King and Bishop (same colored squares)
            [(a, pa), (b, pb)] => {
                pa.kind == PieceKind::Bishop
                    && pb.kind == PieceKind::Bishop
                    && pa.color != pb.color
                    && (a.file() + a.rank()) % 2 == (b.file() + b.rank()) % 2
            }
            _ => false,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

fn single_king(found: &[Location], color: Color) -> Result<Location, NotationError> {
    match found {
        [only] => Ok(*only),
        _ => Err(NotationError::KingCount {
            color,
            count: found.len(),
        }),
    }
}

/// Most-valuable-victim / least-valuable-attacker key.
pub fn mvv_lva(mv: &Move) -> i32 {
    mv.captured.map_or(0, |p| p.value()) * 8 - mv.piece.kind.index() as i32
}

/// A move held applied on a position; unmade when the guard drops.
pub struct MoveGuard<'a> {
    position: &'a mut Position,
    mv: &'a Move,
    undo: Undo,
}

impl MoveGuard<'_> {
    pub fn applied(&self) -> &Move {
        self.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.position.unmake(self.mv, self.undo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::from_algebraic(s).unwrap()
    }

    fn find(position: &mut Position, text: &str) -> Move {
        position
            .legal_moves(&OrderHints::none())
            .into_iter()
            .find(|m| m.long_algebraic() == text)
            .unwrap()
    }

    #[test]
    fn test_initial_position() {
        let mut position = Position::new();
        assert_eq!(position.legal_moves(&OrderHints::none()).len(), 20);
        assert_eq!(position.hash(), position.compute_hash());
        assert_eq!(position.material(Color::White), position.material(Color::Black));
        assert_eq!(position.king(Color::Black), loc("e8"));
    }

    #[test]
    fn test_make_unmake_restores_everything() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        ];
        for fen in fens {
            let mut position = Position::from_fen(fen).unwrap();
            let snapshot = position.clone();
            for mv in position.legal_moves(&OrderHints::none()) {
                let undo = position.make(&mv);
                assert_eq!(position.hash(), position.compute_hash(), "{fen} {mv}");
                assert!(position.index_matches_board());
                position.unmake(&mv, undo);
                assert_eq!(position, snapshot, "{fen} {mv}");
            }
        }
    }

    #[test]
    fn test_guard_unmakes_on_drop() {
        let mut position = Position::new();
        let snapshot = position.clone();
        let mv = find(&mut position, "e2e4");
        assert!(!mv.has_cached_delta());
        {
            let child = position.apply(&mv);
            assert_eq!(child.side_to_move(), Color::Black);
            assert_eq!(child.en_passant(), Some(loc("e3")));
            assert_eq!(child.applied().long_algebraic(), "e2e4");
        }
        assert_eq!(position, snapshot);

        // The caller's move keeps the delta computed while it was applied.
        assert!(mv.has_cached_delta());
        let reapplied = position.apply(&mv);
        assert_eq!(reapplied.hash(), reapplied.compute_hash());
    }

    #[test]
    fn test_castling_rights_revoked() {
        let mut position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = find(&mut position, "h1h8");
        position.make(&mv);
        assert_eq!(position.castling_rights(), WHITE_QUEENSIDE | BLACK_QUEENSIDE);

        let mut position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = find(&mut position, "e1g1");
        position.make(&mv);
        assert_eq!(position.castling_rights(), BLACK_KINGSIDE | BLACK_QUEENSIDE);
        assert_eq!(position.board().get(loc("f1")).map(|p| p.kind), Some(PieceKind::Rook));
        assert_eq!(position.king(Color::White), loc("g1"));
    }

    #[test]
    fn test_castle_candidates() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(position.castle_candidates().len(), 2);

        // Bishop on a6 covers f1: king-side crossing square attacked.
        let position = Position::from_fen("r3k2r/8/b7/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castles = position.castle_candidates();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].to, loc("c1"));

        // b1 occupied blocks queen-side even though the king never crosses it.
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        let castles = position.castle_candidates();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].to, loc("g1"));

        // In check: no castling at all.
        let position = Position::from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1").unwrap();
        assert!(position.castle_candidates().is_empty());
    }

    #[test]
    fn test_check_detection_with_queen() {
        let mut position = Position::from_fen("4k3/8/8/8/8/8/8/4K2q w - - 0 1").unwrap();
        assert!(position.in_check());
        let queen = position.lift(loc("h1"));
        assert!(queen.is_some());
        assert!(!position.in_check());

        let position = Position::from_fen("4k3/8/8/8/8/8/8/4KN1q w - - 0 1").unwrap();
        assert!(!position.in_check());
        let mut position = Position::from_fen("4k3/8/8/q7/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(position.in_check());
        position.place(loc("c3"), Piece::new(Color::White, PieceKind::Pawn));
        assert!(!position.in_check());
        position.lift(loc("c3"));
        assert!(position.in_check());
    }

    #[test]
    fn test_avoids_check_filters_pinned_piece() {
        let mut position = Position::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = position.legal_moves(&OrderHints::none());
        assert!(moves.iter().all(|m| m.piece.kind != PieceKind::Knight));
        assert!(!position.enemy_in_check());
    }

    #[test]
    fn test_ordering_puts_captures_first() {
        let mut position =
            Position::from_fen("4k3/1P6/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let moves = position.legal_moves(&OrderHints::none());
        assert_eq!(moves[0].long_algebraic(), "e4d5");
        assert_eq!(moves[1].promotion(), Some(PieceKind::Queen));
        let last_promotion = moves.iter().rposition(|m| m.is_promotion()).unwrap();
        let first_quiet = moves.iter().position(|m| m.is_quiet()).unwrap();
        assert!(last_promotion < first_quiet);
    }

    #[test]
    fn test_game_states() {
        let mut mate = Position::from_fen("k7/7Q/1K6/8/8/8/8/8 w - - 0 1").unwrap();
        let mv = find(&mut mate, "h7b7");
        mate.make(&mv);
        assert_eq!(mate.game_state(), GameState::Checkmate(Color::White));

        let mut stalemate = Position::from_fen("k7/8/1Q6/8/8/8/8/2K5 b - - 0 1").unwrap();
        assert_eq!(stalemate.game_state(), GameState::Stalemate);

        let mut bare = Position::from_fen("4k3/8/8/8/8/8/8/3BK3 w - - 0 1").unwrap();
        assert_eq!(bare.game_state(), GameState::InsufficientMaterial);

        let mut fifty = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
        assert_eq!(fifty.game_state(), GameState::FiftyMoveRule);

        // Mate on the hundredth half-move is still mate.
        let mut late_mate = Position::from_fen("k7/7Q/1K6/8/8/8/8/8 w - - 99 80").unwrap();
        let mv = find(&mut late_mate, "h7b7");
        late_mate.make(&mv);
        assert_eq!(late_mate.halfmove_clock(), 100);
        assert_eq!(late_mate.game_state(), GameState::Checkmate(Color::White));

        let mut late_stalemate =
            Position::from_fen("k7/8/1Q6/8/8/8/8/2K5 b - - 100 80").unwrap();
        assert_eq!(late_stalemate.game_state(), GameState::Stalemate);

        assert_eq!(Position::new().game_state(), GameState::Ongoing);
    }
}
