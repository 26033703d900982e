use crate::board::Color;

/// Interchange string (FEN) could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected 6 space-separated fields, found {0}")]
    FieldCount(usize),

    #[error("expected 8 ranks in piece placement, found {0}")]
    RankCount(usize),

    #[error("rank {rank} does not describe exactly 8 squares")]
    RankLength { rank: usize },

    #[error("invalid piece symbol '{0}'")]
    PieceSymbol(char),

    #[error("invalid side to move '{0}'")]
    SideToMove(String),

    #[error("invalid castling field '{0}'")]
    Castling(String),

    #[error("invalid en-passant square '{0}'")]
    EnPassant(String),

    #[error("invalid move counter '{0}'")]
    Counter(String),

    #[error("{color:?} must have exactly one king, found {count}")]
    KingCount { color: Color, count: usize },
}

/// Move text was rejected, either as malformed or as illegal here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("malformed move text '{0}'")]
    Malformed(String),

    #[error("no piece on {0}")]
    EmptyOrigin(String),

    #[error("the piece on {0} belongs to the opponent")]
    EnemyOrigin(String),

    #[error("{0} is occupied by a friendly piece")]
    FriendlyDestination(String),

    #[error("{0} does not move like that")]
    IllegalPattern(String),

    #[error("castling {0} is not allowed here")]
    CastleNotAllowed(String),

    #[error("{0} would leave the king in check")]
    LeavesKingInCheck(String),
}
