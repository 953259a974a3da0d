use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Column;
use crate::data::report::AggregateReport;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Paginated, sortable app grid
// ---------------------------------------------------------------------------

/// Render the current page of the filtered view plus the page selector.
pub fn app_grid(ui: &mut Ui, state: &mut AppState) {
    let mut clicked: Option<Column> = None;
    let sort = state.sort;
    let dataset = state.dataset.clone();
    let rows = &state.snapshot.page_rows;

    ui.push_id("app_grid", |ui: &mut Ui| {
        let mut table = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
        for column in Column::ALL {
            table = match column {
                Column::App | Column::Genres => table.column(TableColumn::initial(220.0).clip(true)),
                _ => table.column(TableColumn::auto()),
            };
        }

        table
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for column in Column::ALL {
                    header.col(|ui| {
                        let arrow = match sort {
                            Some(key) if key.column == column && key.descending => " ▼",
                            Some(key) if key.column == column => " ▲",
                            _ => "",
                        };
                        let label = RichText::new(format!("{}{arrow}", column.name())).strong();
                        if ui.button(label).clicked() {
                            clicked = Some(column);
                        }
                    });
                }
            })
            .body(|mut body| {
                for &idx in rows {
                    let record = &dataset.records[idx];
                    body.row(ROW_HEIGHT, |mut row| {
                        for column in Column::ALL {
                            row.col(|ui| {
                                ui.label(record.cell_text(column));
                            });
                        }
                    });
                }
            });
    });

    if let Some(column) = clicked {
        state.sort_by(column);
    }

    ui.add_space(6.0);
    let total = state.snapshot.total_pages;
    let mut page = state.snapshot.page_number;
    ui.horizontal(|ui: &mut Ui| {
        let slider = ui.add_enabled(total > 1, egui::Slider::new(&mut page, 1..=total).text("Page"));
        if slider.changed() {
            state.set_page(page);
        }
    });
    ui.label(format!("Page {} of {}", state.snapshot.page_number, state.snapshot.total_pages));
}

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

/// Highest-rated apps as (App, Rating, Genres).
pub fn top_rated_table(ui: &mut Ui, report: &AggregateReport) {
    egui::Grid::new("top_rated")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui: &mut Ui| {
            ui.strong("App");
            ui.strong("Rating");
            ui.strong("Genres");
            ui.end_row();
            for row in &report.top_rated {
                ui.label(&row.app);
                ui.label(format!("{:.1}", row.rating));
                ui.label(&row.genres);
                ui.end_row();
            }
        });
}

/// Summed installs per category, largest first.
pub fn installs_table(ui: &mut Ui, report: &AggregateReport) {
    egui::Grid::new("installs_sum")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Category");
            ui.strong("Installs");
            ui.end_row();
            for c in &report.installs_sum {
                ui.label(&c.category);
                ui.label(c.value.to_string());
                ui.end_row();
            }
        });
}
