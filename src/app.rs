use eframe::egui::{self, ScrollArea, Ui};

use crate::data::report::ReportOutcome;
use crate::state::AppState;
use crate::ui::{grid, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: reports and grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    analysis_section(ui, &self.state);
                    ui.separator();
                    ui.heading("Apps");
                    grid::app_grid(ui, &mut self.state);
                });
        });
    }
}

/// Prompts and, when a category is selected, the four reports.
fn analysis_section(ui: &mut Ui, state: &AppState) {
    for empty in &state.snapshot.empty_selections {
        ui.heading(empty.prompt());
    }

    let report = match &state.snapshot.report {
        ReportOutcome::Hidden | ReportOutcome::SelectCategory => return,
        ReportOutcome::Ready(report) => report,
    };

    ui.heading("App Data Analysis");
    ui.label(format!("Selected Categories: {}", report.selected.join(", ")));

    ui.add_space(8.0);
    ui.strong("Mean Rating by Category");
    plot::mean_rating_chart(ui, report, &state.color_map);

    ui.add_space(8.0);
    ui.strong("Percentage of Free Apps by Category");
    plot::percent_free_chart(ui, report, &state.color_map);

    ui.add_space(8.0);
    ui.strong(format!("Top {} Highest-Rated Apps", state.settings.top_n));
    grid::top_rated_table(ui, report);

    ui.add_space(8.0);
    ui.strong("Top Categories");
    grid::installs_table(ui, report);
}
