use std::cell::OnceCell;
use std::fmt;

use crate::board::{Piece, PieceKind};
use crate::coord::Location;
use crate::zobrist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// Grid column the rook starts on and the one it lands on.
    pub fn rook_columns(self) -> (u8, u8) {
        match self {
            CastleSide::King => (9, 7),
            CastleSide::Queen => (2, 5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Plain,
    /// Two-square pawn advance; sets the en-passant target.
    DoublePush,
    Promotion(PieceKind),
    EnPassant,
    Castle(CastleSide),
}

/// A transition from the position that generated it.
#[derive(Debug, Clone)]
pub struct Move {
    pub from: Location,
    pub to: Location,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
    delta: OnceCell<u64>,
}

impl Move {
    fn build(from: Location, to: Location, piece: Piece, captured: Option<Piece>, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            kind,
            delta: OnceCell::new(),
        }
    }

    pub fn new(from: Location, to: Location, piece: Piece, captured: Option<Piece>) -> Self {
        Self::build(from, to, piece, captured, MoveKind::Plain)
    }

    pub fn new_double_push(from: Location, to: Location, piece: Piece) -> Self {
        Self::build(from, to, piece, None, MoveKind::DoublePush)
    }

    pub fn new_promotion(
        from: Location,
        to: Location,
        piece: Piece,
        captured: Option<Piece>,
        promotion: PieceKind,
    ) -> Self {
        Self::build(from, to, piece, captured, MoveKind::Promotion(promotion))
    }

    pub fn new_en_passant(from: Location, to: Location, piece: Piece) -> Self {
        let captured = Piece::new(piece.color.opposite(), PieceKind::Pawn);
        Self::build(from, to, piece, Some(captured), MoveKind::EnPassant)
    }

    pub fn new_castling(from: Location, to: Location, piece: Piece, side: CastleSide) -> Self {
        Self::build(from, to, piece, None, MoveKind::Castle(side))
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_promotion(&self) -> bool {
        self.promotion().is_some()
    }

    pub fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::Castle(_))
    }

    /// Neither a capture nor a promotion.
    pub fn is_quiet(&self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// The piece that ends up on the destination square.
    pub fn placed_piece(&self) -> Piece {
        match self.kind {
            MoveKind::Promotion(kind) => Piece::new(self.piece.color, kind),
            _ => self.piece,
        }
    }

    /// Square the captured piece stands on; differs from `to` for en passant.
    pub fn capture_square(&self) -> Location {
        match self.kind {
            MoveKind::EnPassant => self
                .to
                .offset(-self.piece.color.forward())
                .unwrap_or(self.to),
            _ => self.to,
        }
    }

    /// Rook origin and destination for a castle.
    pub fn rook_squares(&self) -> Option<(Location, Location)> {
        match self.kind {
            MoveKind::Castle(side) => {
                let (from_col, to_col) = side.rook_columns();
                let row = self.from.row();
                Some((Location::new(row, from_col)?, Location::new(row, to_col)?))
            }
            _ => None,
        }
    }

    /// Square a double push passes over.
    pub fn en_passant_target(&self) -> Option<Location> {
        match self.kind {
            MoveKind::DoublePush => self.from.offset(self.piece.color.forward()),
            _ => None,
        }
    }

    /// XOR delta of the piece placement (and any new en-passant file) this
    /// move causes. Side-to-move and the previous en-passant key are the
    /// position's business.
    pub fn hash_delta(&self) -> u64 {
        *self.delta.get_or_init(|| self.compute_delta())
    }

    pub(crate) fn has_cached_delta(&self) -> bool {
        self.delta.get().is_some()
    }

    fn compute_delta(&self) -> u64 {
        let keys = zobrist::keys();
        let mut delta = keys.piece(self.piece, self.from) ^ keys.piece(self.placed_piece(), self.to);
        if let Some(captured) = self.captured {
            delta ^= keys.piece(captured, self.capture_square());
        }
        if let Some((rook_from, rook_to)) = self.rook_squares() {
            let rook = Piece::new(self.piece.color, PieceKind::Rook);
            delta ^= keys.piece(rook, rook_from) ^ keys.piece(rook, rook_to);
        }
        if let Some(target) = self.en_passant_target() {
            delta ^= keys.en_passant(target);
        }
        delta
    }

    /// Long-form coordinate text, e.g. `e2e4` or `e7e8q`.
    pub fn long_algebraic(&self) -> String {
        let mut s = format!("{}{}", self.from, self.to);
        if let Some(kind) = self.promotion() {
            s.push(kind.symbol());
        }
        s
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.piece == other.piece
            && self.captured == other.captured
            && self.kind == other.kind
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.long_algebraic())
    }
}
