// ---------------------------------------------------------------------------
// Cell cursor movement, independent of egui
// ---------------------------------------------------------------------------

/// Position of an editable cell: trial row and operator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Move one cell in `dir`, clamped to a `rows × cols` grid.
pub fn step(pos: CellPos, dir: Direction, rows: usize, cols: usize) -> CellPos {
    let last_row = rows.saturating_sub(1);
    let last_col = cols.saturating_sub(1);
    let (row, col) = match dir {
        Direction::Up => (pos.row.saturating_sub(1), pos.col),
        Direction::Down => ((pos.row + 1).min(last_row), pos.col),
        Direction::Left => (pos.row, pos.col.saturating_sub(1)),
        Direction::Right => (pos.row, (pos.col + 1).min(last_col)),
    };
    CellPos::new(row.min(last_row), col.min(last_col))
}

/// What the commit key does in a given cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    /// Focus this cell.
    MoveTo(CellPos),
    /// Last cell of the last row: append a trial and focus its first cell.
    AppendRow,
}

/// Commit advances row-major; past the final cell a row is appended.
pub fn on_commit(pos: CellPos, rows: usize, cols: usize) -> CommitAction {
    if pos.col + 1 < cols {
        CommitAction::MoveTo(CellPos::new(pos.row, pos.col + 1))
    } else if pos.row + 1 < rows {
        CommitAction::MoveTo(CellPos::new(pos.row + 1, 0))
    } else {
        CommitAction::AppendRow
    }
}
