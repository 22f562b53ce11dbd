//! Fixed-size occupancy board for grid games
//!
//! Cells hold 0 for empty, otherwise a piece/owner id.

use glam::IVec2;
use serde::{Deserialize, Serialize};

pub const EMPTY: u8 = 0;

/// Largest side length; bigger requests are clamped so the cell count
/// always fits
pub const MAX_SIDE: i32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major, `height` rows of `width` cells
    cells: Vec<u8>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(1, MAX_SIDE);
        let height = height.clamp(1, MAX_SIDE);
        Self {
            width,
            height,
            cells: vec![EMPTY; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bounds(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    #[inline]
    fn index(&self, cell: IVec2) -> Option<usize> {
        self.contains(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    /// Cell value, `None` outside the board
    pub fn get(&self, cell: IVec2) -> Option<u8> {
        self.index(cell).map(|i| self.cells[i])
    }

    pub fn is_empty_at(&self, cell: IVec2) -> bool {
        self.get(cell) == Some(EMPTY)
    }

    /// Write a cell; writes outside the board are ignored
    pub fn set(&mut self, cell: IVec2, value: u8) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = value;
        }
    }

    /// Wrap a cell onto the board (leaving one edge re-enters the opposite)
    pub fn wrap(&self, cell: IVec2) -> IVec2 {
        IVec2::new(cell.x.rem_euclid(self.width), cell.y.rem_euclid(self.height))
    }

    /// Clamp a cell onto the board
    pub fn clamp(&self, cell: IVec2) -> IVec2 {
        IVec2::new(
            cell.x.clamp(0, self.width - 1),
            cell.y.clamp(0, self.height - 1),
        )
    }

    pub fn row(&self, y: i32) -> &[u8] {
        let start = (y.clamp(0, self.height - 1) * self.width) as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// A row is full iff every cell is non-zero
    pub fn row_full(&self, y: i32) -> bool {
        self.row(y).iter().all(|&v| v != EMPTY)
    }

    /// Remove every full row, shifting rows above down and inserting empty
    /// rows at the top. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let width = self.width as usize;
        let mut cleared = 0;
        let mut y = self.height - 1;
        while y >= 0 {
            if self.row_full(y) {
                let start = y as usize * width;
                self.cells.drain(start..start + width);
                self.cells.splice(0..0, std::iter::repeat_n(EMPTY, width));
                cleared += 1;
                // Rows above shifted into this index: scan it again
                continue;
            }
            y -= 1;
        }
        cleared
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&v| v != EMPTY).count()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Board as rows, top row first
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Build a board from rows (top row first). Rows are truncated/padded to
    /// the first row's width.
    pub fn from_rows(rows: &[Vec<u8>]) -> Self {
        let width = rows.first().map_or(1, |r| r.len().max(1)) as i32;
        let mut grid = Self::new(width, rows.len().max(1) as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().take(width as usize).enumerate() {
                grid.set(IVec2::new(x as i32, y as i32), v);
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_bounds() {
        let mut grid = Grid::new(4, 3);
        grid.set(IVec2::new(3, 2), 5);
        assert_eq!(grid.get(IVec2::new(3, 2)), Some(5));
        assert_eq!(grid.get(IVec2::new(4, 2)), None);
        assert_eq!(grid.get(IVec2::new(-1, 0)), None);
        // Out-of-range write is ignored
        grid.set(IVec2::new(9, 9), 1);
        assert_eq!(grid.occupied(), 1);
    }

    #[test]
    fn test_oversized_board_is_clamped() {
        let grid = Grid::new(i32::MAX, 100_000);
        assert_eq!(grid.bounds(), IVec2::new(MAX_SIDE, MAX_SIDE));
        assert_eq!(grid.cells().len(), (MAX_SIDE * MAX_SIDE) as usize);
        assert!(grid.is_empty_at(IVec2::new(MAX_SIDE - 1, MAX_SIDE - 1)));

        let tiny = Grid::new(-5, 0);
        assert_eq!(tiny.bounds(), IVec2::ONE);
    }

    #[test]
    fn test_wrap() {
        let grid = Grid::new(30, 30);
        assert_eq!(grid.wrap(IVec2::new(-1, 5)), IVec2::new(29, 5));
        assert_eq!(grid.wrap(IVec2::new(30, 5)), IVec2::new(0, 5));
        assert_eq!(grid.wrap(IVec2::new(5, -1)), IVec2::new(5, 29));
        assert_eq!(grid.wrap(IVec2::new(5, 30)), IVec2::new(5, 0));
    }

    #[test]
    fn test_clamp() {
        let grid = Grid::new(10, 20);
        assert_eq!(grid.clamp(IVec2::new(-3, 25)), IVec2::new(0, 19));
    }

    #[test]
    fn test_clear_single_row() {
        let mut grid = Grid::from_rows(&[
            vec![0, 0, 0],
            vec![2, 0, 0],
            vec![1, 1, 1],
        ]);
        assert_eq!(grid.clear_full_rows(), 1);
        assert_eq!(
            grid.to_rows(),
            vec![vec![0, 0, 0], vec![0, 0, 0], vec![2, 0, 0]]
        );
    }

    #[test]
    fn test_clear_adjacent_rows_rescans_index() {
        let mut grid = Grid::from_rows(&[
            vec![0, 3, 0],
            vec![1, 1, 1],
            vec![2, 2, 2],
            vec![4, 0, 4],
        ]);
        assert_eq!(grid.clear_full_rows(), 2);
        assert_eq!(
            grid.to_rows(),
            vec![vec![0, 0, 0], vec![0, 0, 0], vec![0, 3, 0], vec![4, 0, 4]]
        );
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut grid = Grid::from_rows(&[
            vec![1, 1],
            vec![0, 5],
            vec![2, 2],
        ]);
        assert_eq!(grid.clear_full_rows(), 2);
        assert_eq!(grid.to_rows(), vec![vec![0, 0], vec![0, 0], vec![0, 5]]);
    }
}
