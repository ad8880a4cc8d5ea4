//! Plot rendering for the rolling window.
//!
//! Three stacked plots share one x axis (the point index):
//! - "Sensor Data": raw values, line plus circle markers
//! - "Computed Value": smoothed values with the threshold drawn in
//! - "Classification": 0/1 step trace on a fixed `[-1, 2]` range

use egui::Color32;
use egui_plot::{HLine, Legend, Line, Plot, Points};

use crate::derive::DerivedPoint;

const RAW_COLOR: Color32 = Color32::from_rgb(178, 34, 34);
const SMOOTHED_COLOR: Color32 = Color32::from_rgb(75, 0, 130);
const CLASS_COLOR: Color32 = Color32::from_rgb(0, 128, 0);
const LINE_WIDTH: f32 = 2.0;
const MARKER_RADIUS: f32 = 4.0;
const AXIS_GROUP: &str = "sensorstream_x";

/// Turn `(x, y)` samples into a step trace that holds each value until the next x.
pub(super) fn step_points(pts: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let mut out = Vec::with_capacity(pts.len() * 2);
    for (i, p) in pts.iter().enumerate() {
        if i > 0 {
            out.push([p[0], pts[i - 1][1]]);
        }
        out.push(*p);
    }
    out
}

fn series(points: &[DerivedPoint], f: impl Fn(&DerivedPoint) -> f64) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.index as f64, f(p)]).collect()
}

pub(super) fn render_plots(ui: &mut egui::Ui, points: &[DerivedPoint], threshold: f64) {
    let raw = series(points, |p| p.raw);
    let smoothed = series(points, |p| p.smoothed);
    let class = series(points, |p| if p.classified { 1.0 } else { 0.0 });

    let spacing = ui.spacing().item_spacing.y;
    let plot_height = ((ui.available_height() - 2.0 * spacing) / 3.0).max(80.0);
    let link = egui::Vec2b::new(true, false);

    ui.label("Sensor Data");
    Plot::new("sensorstream_raw")
        .height(plot_height)
        .legend(Legend::default())
        .link_axis(AXIS_GROUP, link)
        .link_cursor(AXIS_GROUP, link)
        .y_axis_label("Sensor Value")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Sensor Data", raw.clone())
                    .color(RAW_COLOR)
                    .width(LINE_WIDTH),
            );
            plot_ui.points(
                Points::new("Sensor Data", raw)
                    .color(RAW_COLOR)
                    .radius(MARKER_RADIUS)
                    .filled(false),
            );
        });

    ui.label("Computed Value");
    Plot::new("sensorstream_computed")
        .height(plot_height)
        .legend(Legend::default())
        .link_axis(AXIS_GROUP, link)
        .link_cursor(AXIS_GROUP, link)
        .y_axis_label("Computed Value")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Computed Value", smoothed.clone())
                    .color(SMOOTHED_COLOR)
                    .width(LINE_WIDTH),
            );
            plot_ui.points(
                Points::new("Computed Value", smoothed)
                    .color(SMOOTHED_COLOR)
                    .radius(MARKER_RADIUS)
                    .filled(false),
            );
            plot_ui.hline(
                HLine::new("Threshold", threshold)
                    .color(Color32::GRAY)
                    .style(egui_plot::LineStyle::dashed_loose()),
            );
        });

    ui.label("Classification");
    Plot::new("sensorstream_class")
        .height(plot_height)
        .legend(Legend::default())
        .link_axis(AXIS_GROUP, link)
        .link_cursor(AXIS_GROUP, link)
        .auto_bounds(egui::Vec2b::new(true, false))
        .default_y_bounds(-1.0, 2.0)
        .x_axis_label("Time (Discrete)")
        .y_axis_label("Classification")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Classification", step_points(&class))
                    .color(CLASS_COLOR)
                    .width(LINE_WIDTH),
            );
        });
}
