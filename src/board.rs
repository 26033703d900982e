use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::coord::{Location, GRID, GRID_CELLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices, best first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20000,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase symbol, as used for black pieces and promotion suffixes.
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Row step a pawn of this color advances by.
    pub fn forward(self) -> isize {
        match self {
            Color::White => GRID as isize,
            Color::Black => -(GRID as isize),
        }
    }

    /// 0-based rank pawns of this color start on.
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// 0-based rank pawns of this color promote on.
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    pub fn value(self) -> i32 {
        self.kind.value()
    }

    /// Interchange symbol: uppercase for white.
    pub fn symbol(self) -> char {
        let c = self.kind.symbol();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        let kind = PieceKind::from_symbol(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self { color, kind })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    OffBoard,
    Piece(Piece),
}

impl Cell {
    pub fn piece(self) -> Option<Piece> {
        match self {
            Cell::Piece(piece) => Some(piece),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// The raw padded grid. Owned by a `Position`; it knows nothing about
/// side to move or move history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; GRID_CELLS],
}

impl Board {
    /// An empty board: interior empty, border ring off-board.
    pub fn empty() -> Self {
        let mut cells = [Cell::OffBoard; GRID_CELLS];
        for loc in Location::all() {
            cells[loc.index()] = Cell::Empty;
        }
        Self { cells }
    }

    /// The standard starting layout.
    pub fn new() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, &kind) in back_rank.iter().enumerate() {
            let file = file as u8;
            board.put(Location::from_file_rank(file, 0), Piece::new(Color::White, kind));
            board.put(Location::from_file_rank(file, 1), Piece::new(Color::White, PieceKind::Pawn));
            board.put(Location::from_file_rank(file, 6), Piece::new(Color::Black, PieceKind::Pawn));
            board.put(Location::from_file_rank(file, 7), Piece::new(Color::Black, kind));
        }
        board
    }

    fn put(&mut self, loc: Option<Location>, piece: Piece) {
        if let Some(loc) = loc {
            self.set(loc, Some(piece));
        }
    }

    /// Raw cell at a grid index, sentinels included.
    pub fn cell(&self, index: usize) -> Cell {
        self.cells.get(index).copied().unwrap_or(Cell::OffBoard)
    }

    pub fn get(&self, loc: Location) -> Option<Piece> {
        self.cells[loc.index()].piece()
    }

    pub fn set(&mut self, loc: Location, piece: Option<Piece>) {
        self.cells[loc.index()] = match piece {
            Some(piece) => Cell::Piece(piece),
            None => Cell::Empty,
        };
    }

    pub fn is_empty(&self, loc: Location) -> bool {
        self.cells[loc.index()].is_empty()
    }

    /// Occupied squares with their pieces, a1..h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Location, Piece)> + '_ {
        Location::all().filter_map(move |loc| self.get(loc).map(|piece| (loc, piece)))
    }

    /// Hash of the raw grid contents, independent of the Zobrist scheme.
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.cells.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_is_off_board() {
        let board = Board::empty();
        let off = (0..GRID_CELLS)
            .filter(|&i| board.cell(i) == Cell::OffBoard)
            .count();
        assert_eq!(off, GRID_CELLS - 64);
        assert_eq!(board.cell(0), Cell::OffBoard);
        assert_eq!(board.cell(GRID_CELLS + 5), Cell::OffBoard);
    }

    #[test]
    fn test_initial_layout() {
        let board = Board::new();
        assert_eq!(board.pieces().count(), 32);
        let e1 = Location::from_algebraic("e1").unwrap();
        assert_eq!(board.get(e1), Some(Piece::new(Color::White, PieceKind::King)));
        let d8 = Location::from_algebraic("d8").unwrap();
        assert_eq!(board.get(d8), Some(Piece::new(Color::Black, PieceKind::Queen)));
    }

    #[test]
    fn test_structural_hash_tracks_contents() {
        let mut board = Board::new();
        let before = board.structural_hash();
        let e2 = Location::from_algebraic("e2").unwrap();
        let pawn = board.get(e2);
        board.set(e2, None);
        assert_ne!(board.structural_hash(), before);
        board.set(e2, pawn);
        assert_eq!(board.structural_hash(), before);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Piece::from_symbol('N'), Some(Piece::new(Color::White, PieceKind::Knight)));
        assert_eq!(Piece::from_symbol('q').map(|p| p.symbol()), Some('q'));
        assert_eq!(Piece::from_symbol('x'), None);
    }
}
