use crate::board::{Board, Color, Piece, PieceKind};
use crate::coord::Location;
use crate::error::{MoveError, NotationError};
use crate::movegen;
use crate::moves::Move;
use crate::position::{
    Position, BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE, WHITE_QUEENSIDE,
};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const CASTLING_SYMBOLS: [(char, u8); 4] = [
    ('K', WHITE_KINGSIDE),
    ('Q', WHITE_QUEENSIDE),
    ('k', BLACK_KINGSIDE),
    ('q', BLACK_QUEENSIDE),
];

impl Position {
    pub fn from_fen(fen: &str) -> Result<Self, NotationError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(NotationError::FieldCount(fields.len()));
        }

        let board = parse_placement(fields[0])?;

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(NotationError::SideToMove(other.to_string())),
        };

        let castling = parse_castling(fields[2])?;
        if !castling_matches_board(&board, castling) {
            return Err(NotationError::Castling(fields[2].to_string()));
        }

        let en_passant = match fields[3] {
            "-" => None,
            text => {
                let target = Location::from_algebraic(text)
                    .filter(|&target| en_passant_matches_board(&board, side, target))
                    .ok_or_else(|| NotationError::EnPassant(text.to_string()))?;
                Some(target)
            }
        };

        let halfmove_clock: u32 = fields[4]
            .parse()
            .map_err(|_| NotationError::Counter(fields[4].to_string()))?;
        let fullmove: u32 = fields[5]
            .parse()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| NotationError::Counter(fields[5].to_string()))?;
        let ply = (fullmove - 1)
            .checked_mul(2)
            .and_then(|n| n.checked_add(u32::from(side == Color::Black)))
            .ok_or_else(|| NotationError::Counter(fields[5].to_string()))?;

        Position::from_parts(board, side, castling, en_passant, halfmove_clock, ply)
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let piece = Location::from_file_rank(file, rank).and_then(|loc| self.board().get(loc));
                match piece {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move() {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling: String = CASTLING_SYMBOLS
            .iter()
            .filter(|(_, bit)| self.castling_rights() & bit != 0)
            .map(|(c, _)| *c)
            .collect();
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .en_passant()
            .map_or_else(|| "-".to_string(), |loc| loc.algebraic());

        format!(
            "{} {} {} {} {} {}",
            placement,
            side,
            castling,
            en_passant,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }

    /// Resolves long-form coordinate text (`e2e4`, `e7e8q`) to a legal move.
    /// A missing promotion letter promotes to a queen.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, MoveError> {
        let text = text.trim();
        let malformed = || MoveError::Malformed(text.to_string());
        if !text.is_ascii() || !(text.len() == 4 || text.len() == 5) {
            return Err(malformed());
        }
        let from = Location::from_algebraic(&text[0..2]).ok_or_else(malformed)?;
        let to = Location::from_algebraic(&text[2..4]).ok_or_else(malformed)?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_symbol(c) {
                Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
                _ => return Err(malformed()),
            },
        };

        let piece = self
            .board()
            .get(from)
            .ok_or_else(|| MoveError::EmptyOrigin(from.algebraic()))?;
        if piece.color != self.side_to_move() {
            return Err(MoveError::EnemyOrigin(from.algebraic()));
        }
        if self.board().get(to).map(|p| p.color) == Some(piece.color) {
            return Err(MoveError::FriendlyDestination(to.algebraic()));
        }

        let mv = if is_castle_attempt(piece, from, to) {
            self.castle_candidates()
                .into_iter()
                .find(|m| m.to == to)
                .ok_or_else(|| MoveError::CastleNotAllowed(text.to_string()))?
        } else {
            find_pattern(self, from, to, piece, promotion)
                .ok_or_else(|| MoveError::IllegalPattern(text.to_string()))?
        };

        if !self.avoids_check(&mv) {
            return Err(MoveError::LeavesKingInCheck(text.to_string()));
        }
        Ok(mv)
    }

    /// Validates `text` fully and returns the position after it; `self` is
    /// never modified.
    pub fn apply_human_move(&self, text: &str) -> Result<Position, MoveError> {
        let mut next = self.clone();
        let mv = next.parse_move(text)?;
        next.make(&mv);
        Ok(next)
    }
}

fn parse_placement(field: &str) -> Result<Board, NotationError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(NotationError::RankCount(ranks.len()));
    }
    let mut board = Board::empty();
    for (i, text) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in text.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(NotationError::RankLength { rank: rank as usize + 1 });
                }
                file += run as u8;
            } else {
                let piece = Piece::from_symbol(c).ok_or(NotationError::PieceSymbol(c))?;
                let loc = Location::from_file_rank(file, rank)
                    .ok_or(NotationError::RankLength { rank: rank as usize + 1 })?;
                board.set(loc, Some(piece));
                file += 1;
            }
            if file > 8 {
                return Err(NotationError::RankLength { rank: rank as usize + 1 });
            }
        }
        if file != 8 {
            return Err(NotationError::RankLength { rank: rank as usize + 1 });
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> Result<u8, NotationError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0;
    for c in field.chars() {
        let bit = CASTLING_SYMBOLS
            .iter()
            .find(|(symbol, _)| *symbol == c)
            .map(|(_, bit)| *bit)
            .ok_or_else(|| NotationError::Castling(field.to_string()))?;
        if rights & bit != 0 {
            return Err(NotationError::Castling(field.to_string()));
        }
        rights |= bit;
    }
    Ok(rights)
}

/// Every claimed right needs its king and rook still on their home squares.
fn castling_matches_board(board: &Board, rights: u8) -> bool {
    let homes = [
        (WHITE_KINGSIDE, Color::White, 7),
        (WHITE_QUEENSIDE, Color::White, 0),
        (BLACK_KINGSIDE, Color::Black, 7),
        (BLACK_QUEENSIDE, Color::Black, 0),
    ];
    homes
        .iter()
        .filter(|(bit, _, _)| rights & bit != 0)
        .all(|&(_, color, rook_file)| {
            let rank = color.opposite().promotion_rank();
            let holds = |file: u8, kind: PieceKind| {
                Location::from_file_rank(file, rank)
                    .and_then(|loc| board.get(loc))
                    == Some(Piece::new(color, kind))
            };
            holds(4, PieceKind::King) && holds(rook_file, PieceKind::Rook)
        })
}

/// The target must be the square an opposing pawn just skipped: the pawn
/// stands one step past it, and both the target and the pawn's start
/// square are empty.
fn en_passant_matches_board(board: &Board, side: Color, target: Location) -> bool {
    let mover = side.opposite();
    let start = target.offset(-mover.forward());
    let landed = target.offset(mover.forward());
    match (start, landed) {
        (Some(start), Some(landed)) => {
            start.rank() == mover.pawn_rank()
                && board.is_empty(start)
                && board.is_empty(target)
                && board.get(landed) == Some(Piece::new(mover, PieceKind::Pawn))
        }
        _ => false,
    }
}

fn is_castle_attempt(piece: Piece, from: Location, to: Location) -> bool {
    // The home rank is where the opponent promotes.
    piece.kind == PieceKind::King
        && from.rank() == piece.color.opposite().promotion_rank()
        && from.row() == to.row()
        && from.col() == 6
        && (from.col() as i8 - to.col() as i8).abs() == 2
}

fn find_pattern(
    position: &Position,
    from: Location,
    to: Location,
    piece: Piece,
    promotion: Option<PieceKind>,
) -> Option<Move> {
    let mut candidates = Vec::new();
    movegen::captures(position, from, piece, &mut candidates);
    movegen::non_captures(position, from, piece, &mut candidates);
    candidates.into_iter().find(|m| {
        m.to == to
            && match (m.promotion(), promotion) {
                (None, None) => true,
                (Some(kind), Some(wanted)) => kind == wanted,
                (Some(kind), None) => kind == PieceKind::Queen,
                (None, Some(_)) => false,
            }
    })
}
