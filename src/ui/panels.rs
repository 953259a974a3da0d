use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{FilterKind, Range, RATING_BOUNDS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// A control change collected while drawing; applied once the panel is done
/// so widgets never hold a borrow of the state they change.
enum Change {
    Active(FilterKind, bool),
    Rating(Range<f64>),
    Installs(Range<u64>),
    Reviews(Range<u64>),
    Category(String),
    Genre(String),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let mut changes = Vec::new();

    let current: &AppState = state;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Which filters are on ----
            ui.strong("Select Filters");
            for kind in FilterKind::ALL {
                let mut on = current.selection.is_active(kind);
                if ui.checkbox(&mut on, kind.label()).changed() {
                    changes.push(Change::Active(kind, on));
                }
            }
            ui.separator();

            // Same order as the filter stages, so each control reflects the
            // rows left by the ones above it.
            if current.selection.is_active(FilterKind::Rating) {
                rating_controls(ui, current, &mut changes);
            }
            if current.selection.is_active(FilterKind::Installs) {
                if let (Some(range), Some(max)) = (current.selection.installs, current.selection.installs_bound) {
                    count_range_controls(ui, "Select Installs", range, max, &mut changes, Change::Installs);
                }
            }
            if current.selection.is_active(FilterKind::Reviews) {
                if let (Some(range), Some(max)) = (current.selection.reviews, current.selection.reviews_bound) {
                    count_range_controls(ui, "Select Reviews Range", range, max, &mut changes, Change::Reviews);
                }
            }
            if current.selection.is_active(FilterKind::Genres) {
                genre_controls(ui, current, &mut changes);
            }
            if current.selection.is_active(FilterKind::Category) {
                category_controls(ui, current, &mut changes);
            }
        });

    for change in changes {
        match change {
            Change::Active(kind, on) => state.set_filter_active(kind, on),
            Change::Rating(range) => state.set_rating(range),
            Change::Installs(range) => state.set_installs(range),
            Change::Reviews(range) => state.set_reviews(range),
            Change::Category(category) => state.toggle_category(&category),
            Change::Genre(tag) => state.toggle_genre(&tag),
        }
    }
}

fn rating_controls(ui: &mut Ui, state: &AppState, changes: &mut Vec<Change>) {
    ui.strong("Select Rating");
    let mut range = state.selection.rating;
    let bounds = RATING_BOUNDS.low..=RATING_BOUNDS.high;
    let low = ui.add(egui::Slider::new(&mut range.low, bounds.clone()).text("min"));
    let high = ui.add(egui::Slider::new(&mut range.high, bounds).text("max"));
    if low.changed() || high.changed() {
        changes.push(Change::Rating(range));
    }
    ui.separator();
}

fn count_range_controls(
    ui: &mut Ui,
    title: &str,
    mut range: Range<u64>,
    max: u64,
    changes: &mut Vec<Change>,
    wrap: fn(Range<u64>) -> Change,
) {
    ui.strong(title);
    let low = ui.add(egui::Slider::new(&mut range.low, 0..=max).text("min"));
    let high = ui.add(egui::Slider::new(&mut range.high, 0..=max).text("max"));
    if low.changed() || high.changed() {
        changes.push(wrap(range));
    }
    ui.separator();
}

fn genre_controls(ui: &mut Ui, state: &AppState, changes: &mut Vec<Change>) {
    let Some(tags) = &state.snapshot.genre_tags else {
        return;
    };
    let header = format!("Select Genres  ({}/{})", state.selection.genres.len(), tags.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("genres")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            for tag in tags {
                let mut checked = state.selection.genres.contains(tag);
                if ui.checkbox(&mut checked, tag.as_str()).changed() {
                    changes.push(Change::Genre(tag.clone()));
                }
            }
        });
    ui.separator();
}

fn category_controls(ui: &mut Ui, state: &AppState, changes: &mut Vec<Change>) {
    let all = &state.dataset.categories;
    let header = format!("Select Categories  ({}/{})", state.selection.categories.len(), all.len());
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("categories")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            for category in all {
                let mut checked = state.selection.categories.contains(category);
                let text = RichText::new(category).color(state.color_map.color_for(category));
                if ui.checkbox(&mut checked, text).changed() {
                    changes.push(Change::Category(category.clone()));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export filtered view…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        ui.label(format!(
            "{} apps loaded, {} visible",
            state.dataset.len(),
            state.snapshot.visible.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered apps")
        .set_file_name("filtered_apps.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_view(&path);
    }
}
