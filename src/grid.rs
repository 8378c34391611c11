//! Grid workspace addressing.
//!
//! The [`Grid`] lays a fixed number of workspaces out as a `rows × cols`
//! grid, row-major and 0-based: index `i` sits at row `i / cols`, column
//! `i % cols`.  It answers "which index is to my left/right/above/below",
//! applying the configured wraparound and overflow policies.
//!
//! The grid holds no workspaces itself; it is pure geometry owned by the
//! [`WorkspaceSet`](crate::workspaces::WorkspaceSet).

use crate::command::Direction;
use crate::config::{GridConfig, OverflowPolicy};

/// Errors that refuse to build a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("max_workspaces is not set")]
    MaxWorkspacesUnset,

    #[error("workspace count greater than max_workspaces: {count} > {max}")]
    TooManyWorkspaces { count: usize, max: usize },

    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },
}

/// Immutable grid geometry and navigation policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    max_workspaces: usize,
    wraparound: bool,
    wraparound_same_row: bool,
    overflow: OverflowPolicy,
}

impl Grid {
    /// Build a grid from `config` after checking it with
    /// [`size_check`](Self::size_check).
    pub fn new(config: &GridConfig) -> Result<Self, GridError> {
        let max_workspaces = Self::size_check(config)?;
        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            max_workspaces,
            wraparound: config.wraparound,
            wraparound_same_row: config.wraparound_same_row,
            overflow: config.overflow,
        })
    }

    /// Verify that `rows * cols` fits under `max_workspaces`.
    ///
    /// Returns the bound on success.
    pub fn size_check(config: &GridConfig) -> Result<usize, GridError> {
        if config.rows == 0 || config.cols == 0 {
            return Err(GridError::EmptyGrid {
                rows: config.rows,
                cols: config.cols,
            });
        }
        let max = config.max_workspaces.ok_or(GridError::MaxWorkspacesUnset)?;
        let count = config
            .rows
            .checked_mul(config.cols)
            .ok_or(GridError::TooManyWorkspaces {
                count: usize::MAX,
                max,
            })?;
        if count > max {
            return Err(GridError::TooManyWorkspaces { count, max });
        }
        Ok(max)
    }

    //  Accessors

    /// Grid dimensions as `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of cells, i.e. workspaces.  Never zero.
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    //  Addressing

    /// `(row, col)` of `index`.
    pub fn index_to_row_col(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Index of `(row, col)`, or `None` when it reaches `max_workspaces`.
    pub fn row_col_to_index(&self, row: usize, col: usize) -> Option<usize> {
        let index = row.checked_mul(self.cols)?.checked_add(col)?;
        (index < self.max_workspaces).then_some(index)
    }

    //  Navigation

    /// Index of the cell one step in `direction` from `from`.
    ///
    /// At an edge without wraparound the step does not move.  With
    /// wraparound the step re-enters from the opposite edge and, unless
    /// `wraparound_same_row` is set, shifts one row (or column) along, so
    /// walking right through the grid reads it like text.  A shift that
    /// lands above or left of the grid is clamped to row/column 0; one that
    /// lands past the last row or column follows the [`OverflowPolicy`].
    pub fn neighbour(&self, from: usize, direction: Direction) -> usize {
        let (row, col) = self.index_to_row_col(from);
        let (mut row, mut col) = (row as isize, col as isize);
        let (rows, cols) = (self.rows as isize, self.cols as isize);
        let shift = !self.wraparound_same_row;

        match direction {
            Direction::Left => {
                if col == 0 {
                    if self.wraparound {
                        col = cols - 1;
                        if shift {
                            row -= 1;
                        }
                    }
                } else {
                    col -= 1;
                }
            }
            Direction::Right => {
                if col == cols - 1 {
                    if self.wraparound {
                        col = 0;
                        if shift {
                            row += 1;
                        }
                    }
                } else {
                    col += 1;
                }
            }
            Direction::Up => {
                if row == 0 {
                    if self.wraparound {
                        row = rows - 1;
                        if shift {
                            col -= 1;
                        }
                    }
                } else {
                    row -= 1;
                }
            }
            Direction::Down => {
                if row == rows - 1 {
                    if self.wraparound {
                        row = 0;
                        if shift {
                            col += 1;
                        }
                    }
                } else {
                    row += 1;
                }
            }
        }

        if row < 0 || col < 0 {
            self.row_col_to_index(row.max(0) as usize, col.max(0) as usize)
                .unwrap_or(0)
        } else if row >= rows || col >= cols {
            match self.overflow {
                OverflowPolicy::Origin => 0,
                OverflowPolicy::Clamp => self
                    .row_col_to_index(row.min(rows - 1) as usize, col.min(cols - 1) as usize)
                    .unwrap_or(0),
            }
        } else {
            self.row_col_to_index(row as usize, col as usize).unwrap_or(0)
        }
    }
}

//  Tests
