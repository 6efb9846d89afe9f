use eframe::egui::{Id, Key, Modifiers, TextEdit, Ui};
use egui_extras::{Column, TableBuilder};

use super::navigation::{CellPos, CommitAction, Direction, on_commit, step};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 24.0;

// ---------------------------------------------------------------------------
// Editable measurement grid
// ---------------------------------------------------------------------------

fn cell_id(pos: CellPos) -> Id {
    Id::new(("measurement_cell", pos.row, pos.col))
}

/// The cell holding keyboard focus, if any.
fn focused_cell(ui: &Ui, rows: usize, cols: usize) -> Option<CellPos> {
    let focused = ui.memory(|m| m.focused())?;
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| CellPos::new(row, col)))
        .find(|&pos| cell_id(pos) == focused)
}

/// Consume one arrow key press so the text edit does not also see it.
fn take_arrow(ui: &mut Ui) -> Option<Direction> {
    const KEYS: [(Key, Direction); 4] = [
        (Key::ArrowUp, Direction::Up),
        (Key::ArrowDown, Direction::Down),
        (Key::ArrowLeft, Direction::Left),
        (Key::ArrowRight, Direction::Right),
    ];
    ui.input_mut(|i| {
        KEYS.iter()
            .find(|(key, _)| i.consume_key(Modifiers::NONE, *key))
            .map(|&(_, dir)| dir)
    })
}

/// Render the trials × operators grid and handle cell navigation.
pub fn measurement_table(ui: &mut Ui, state: &mut AppState) {
    let rows = state.table.n_rows();
    let cols = state.table.n_cols();

    // Arrow keys are handled before the text edits run.
    if let Some(pos) = focused_cell(ui, rows, cols) {
        if let Some(dir) = take_arrow(ui) {
            state.pending_focus = Some(step(pos, dir, rows, cols));
        }
    }
    if let Some(pos) = state.pending_focus.take() {
        ui.memory_mut(|m| m.request_focus(cell_id(pos)));
    }

    let operators = state.table.operators().to_vec();
    let mut committed: Option<CellPos> = None;

    ui.push_id("measurement_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(320.0)
            .column(Column::exact(48.0))
            .columns(Column::initial(96.0).at_least(60.0), cols)
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("Trial");
                });
                for name in &operators {
                    header.col(|ui: &mut Ui| {
                        ui.strong(if name.is_empty() { "(operator)" } else { name.as_str() });
                    });
                }
            })
            .body(|mut body| {
                for row in 0..rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui: &mut Ui| {
                            ui.label((row + 1).to_string());
                        });
                        for col in 0..cols {
                            table_row.col(|ui: &mut Ui| {
                                let pos = CellPos::new(row, col);
                                let Some(text) = state.table.cell_mut(row, col) else {
                                    return;
                                };
                                let response = ui.add(
                                    TextEdit::singleline(text)
                                        .id(cell_id(pos))
                                        .desired_width(f32::INFINITY),
                                );
                                if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter))
                                {
                                    committed = Some(pos);
                                }
                            });
                        }
                    });
                }
            });
    });

    if let Some(pos) = committed {
        match on_commit(pos, rows, cols) {
            CommitAction::MoveTo(next) => state.pending_focus = Some(next),
            CommitAction::AppendRow => state.append_row_and_focus(),
        }
        ui.ctx().request_repaint();
    }
}
