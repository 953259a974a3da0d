use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::report::AggregateReport;

const CHART_HEIGHT: f32 = 220.0;

// ---------------------------------------------------------------------------
// Category charts (central panel)
// ---------------------------------------------------------------------------

/// Axis formatter that labels integer ticks with category names.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

/// Bar chart of mean rating per category.
pub fn mean_rating_chart(ui: &mut Ui, report: &AggregateReport, colors: &ColorMap) {
    let labels: Vec<String> = report.mean_rating.iter().map(|c| c.category.clone()).collect();
    let bars: Vec<Bar> = report
        .mean_rating
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let mean = c.value?;
            Some(
                Bar::new(i as f64, mean)
                    .name(&c.category)
                    .fill(colors.color_for(&c.category))
                    .width(0.6),
            )
        })
        .collect();

    Plot::new("mean_rating_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Category")
        .y_axis_label("Mean Rating")
        .x_axis_formatter(category_axis(labels))
        .include_y(0.0)
        .include_y(5.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Mean Rating"));
        });
}

/// Line chart of the share of free apps per category.
pub fn percent_free_chart(ui: &mut Ui, report: &AggregateReport, colors: &ColorMap) {
    let labels: Vec<String> = report.percent_free.iter().map(|c| c.category.clone()).collect();
    let points: PlotPoints = report
        .percent_free
        .iter()
        .enumerate()
        .map(|(i, c)| [i as f64, c.value])
        .collect();

    Plot::new("percent_free_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Category")
        .y_axis_label("Percentage of Free Apps (%)")
        .x_axis_formatter(category_axis(labels))
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Free apps")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            for (i, c) in report.percent_free.iter().enumerate() {
                plot_ui.points(
                    Points::new(vec![[i as f64, c.value]])
                        .name(&c.category)
                        .color(colors.color_for(&c.category))
                        .radius(4.0),
                );
            }
        });
}
