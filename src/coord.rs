use std::fmt;

/// Width of the padded grid. Two sentinel rows/columns on every side keep
/// knight jumps from leaving the array.
pub const GRID: usize = 12;
pub const GRID_CELLS: usize = GRID * GRID;

const FIRST: u8 = 2;
const LAST: u8 = 9;

/// A playing square on the 12x12 grid. Row 2 is rank 1, column 2 is file a.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    row: u8,
    col: u8,
}

impl Location {
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (FIRST..=LAST).contains(&row) && (FIRST..=LAST).contains(&col) {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Builds a location from 0-based file and rank (a1 = (0, 0)).
    pub fn from_file_rank(file: u8, rank: u8) -> Option<Self> {
        Self::new(rank.checked_add(FIRST)?, file.checked_add(FIRST)?)
    }

    /// Inverse of [`Location::index`]; `None` for sentinel cells.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= GRID_CELLS {
            return None;
        }
        Self::new((index / GRID) as u8, (index % GRID) as u8)
    }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].checked_sub(b'a')?;
        let rank = bytes[1].checked_sub(b'1')?;
        if file > 7 || rank > 7 {
            return None;
        }
        Self::from_file_rank(file, rank)
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// 0-based file, a = 0.
    pub fn file(self) -> u8 {
        self.col - FIRST
    }

    /// 0-based rank, rank 1 = 0.
    pub fn rank(self) -> u8 {
        self.row - FIRST
    }

    pub fn index(self) -> usize {
        self.row as usize * GRID + self.col as usize
    }

    /// Steps by a grid offset, returning `None` when the target is a sentinel.
    pub fn offset(self, delta: isize) -> Option<Self> {
        let target = self.index() as isize + delta;
        if target < 0 {
            return None;
        }
        Self::from_index(target as usize)
    }

    /// Chebyshev distance, used by the king tropism table.
    pub fn distance(self, other: Location) -> u8 {
        let dr = (self.row as i16 - other.row as i16).unsigned_abs() as u8;
        let dc = (self.col as i16 - other.col as i16).unsigned_abs() as u8;
        dr.max(dc)
    }

    pub fn algebraic(self) -> String {
        let mut s = String::with_capacity(2);
        s.push((b'a' + self.file()) as char);
        s.push((b'1' + self.rank()) as char);
        s
    }

    /// All 64 playing squares, a1..h1, a2..h8.
    pub fn all() -> impl Iterator<Item = Location> {
        (FIRST..=LAST).flat_map(|row| (FIRST..=LAST).map(move |col| Location { row, col }))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.algebraic())
    }
}
