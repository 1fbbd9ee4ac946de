use serde::{Deserialize, Serialize};

use crate::{MergeError, OutOfBoundsError};

use super::piece::{ColorId, Position};

/// A single settled cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Occupied(ColorId),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(color) => color.as_char(),
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            c => ColorId::from_char(c).map(Cell::Occupied),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BoardRow {
    cells: Box<[Cell]>,
}

impl BoardRow {
    fn empty(columns: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; columns].into_boxed_slice(),
        }
    }

    fn is_filled(&self) -> bool {
        self.cells.iter().all(|c| c.is_occupied())
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

/// Grid of settled cells.
///
/// Row 0 is the top of the board and rows grow downward. Every row has the
/// same number of columns, and the dimensions never change after creation.
/// Cells outside the grid are never addressed: every coordinate-taking method
/// either reports [`OutOfBoundsError`] or treats the cell as outside.
///
/// # Example
///
/// ```
/// use rustris_engine::{Board, PieceKind, Piece, Position};
///
/// let mut board = Board::new(10, 20);
/// let piece = Piece::new(PieceKind::O, Position::new(0, 18));
/// board.merge(&piece.cells(), piece.color()).unwrap();
///
/// assert_eq!(board.is_occupied(0, 19), Ok(true));
/// assert_eq!(board.clear_full_rows(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: usize,
    rows: Vec<BoardRow>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or does not fit in an `i32`.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        assert!(columns > 0 && rows > 0, "board must not be empty");
        assert!(i32::try_from(columns).is_ok() && i32::try_from(rows).is_ok());
        Self {
            columns,
            rows: vec![BoardRow::empty(columns); rows],
        }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_inside(&self, col: i32, row: i32) -> bool {
        self.index(col, row).is_some()
    }

    fn index(&self, col: i32, row: i32) -> Option<(usize, usize)> {
        let col = usize::try_from(col).ok().filter(|&c| c < self.columns)?;
        let row = usize::try_from(row).ok().filter(|&r| r < self.rows.len())?;
        Some((col, row))
    }

    fn checked_index(&self, col: i32, row: i32) -> Result<(usize, usize), OutOfBoundsError> {
        self.index(col, row).ok_or(OutOfBoundsError { col, row })
    }

    pub fn cell(&self, col: i32, row: i32) -> Result<Cell, OutOfBoundsError> {
        let (x, y) = self.checked_index(col, row)?;
        Ok(self.rows[y].cells[x])
    }

    pub fn is_occupied(&self, col: i32, row: i32) -> Result<bool, OutOfBoundsError> {
        self.cell(col, row).map(Cell::is_occupied)
    }

    /// Overwrites a single cell. Intended for setting up boards; gameplay
    /// goes through [`Self::merge`].
    pub fn set_cell(&mut self, col: i32, row: i32, cell: Cell) -> Result<(), OutOfBoundsError> {
        let (x, y) = self.checked_index(col, row)?;
        self.rows[y].cells[x] = cell;
        Ok(())
    }

    /// Writes `color` into every given cell.
    ///
    /// All cells are validated before anything is written, so on error the
    /// board is left unchanged.
    pub fn merge(&mut self, cells: &[Position], color: ColorId) -> Result<(), MergeError> {
        for &Position { col, row } in cells {
            if self.cell(col, row)?.is_occupied() {
                return Err(MergeError::Overlap { col, row });
            }
        }
        for &Position { col, row } in cells {
            self.set_cell(col, row, Cell::Occupied(color))?;
        }
        Ok(())
    }

    /// Returns the cells of one row, or `None` if the row is out of range.
    #[must_use]
    pub fn row_cells(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(|r| &*r.cells)
    }

    /// Iterates rows from top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| &*r.cells)
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(BoardRow::is_filled)
    }

    /// Indices of the rows that are completely occupied, top to bottom.
    pub fn full_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(y, r)| r.is_filled().then_some(y))
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.iter_rows()
            .map(|r| r.iter().filter(|c| c.is_occupied()).count())
            .sum()
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows above a removed row move down by the number of removed rows below
    /// them, and the vacated rows at the top are emptied. Simultaneous clears
    /// are counted together.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..self.rows.len()).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows.swap(y, y + count);
            }
        }
        for row in &mut self.rows[..count] {
            row.clear();
        }
        count
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: one string per row, top to bottom: "..33......"
        serializer.collect_seq(
            self.iter_rows()
                .map(|r| r.iter().map(|c| c.as_char()).collect::<String>()),
        )
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let lines = Vec::<String>::deserialize(deserializer)?;
        let Some(first) = lines.first() else {
            return Err(serde::de::Error::custom("board must have at least one row"));
        };
        let columns = first.chars().count();
        if columns == 0 {
            return Err(serde::de::Error::custom(
                "board must have at least one column",
            ));
        }

        let mut rows = Vec::with_capacity(lines.len());
        for (y, line) in lines.iter().enumerate() {
            let cells = line
                .chars()
                .map(|c| {
                    Cell::from_char(c).ok_or_else(|| {
                        serde::de::Error::custom(format!("invalid cell '{c}' at row {y}"))
                    })
                })
                .collect::<Result<Box<[Cell]>, D::Error>>()?;
            if cells.len() != columns {
                return Err(serde::de::Error::custom(format!(
                    "row {y} has {} columns, expected {columns}",
                    cells.len()
                )));
            }
            rows.push(BoardRow { cells });
        }
        Ok(Board { columns, rows })
    }
}
