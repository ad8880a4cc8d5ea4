//! Standalone application wrapper.
//!
//! [`SensorStreamApp`] owns a [`Pipeline`] and implements [`eframe::App`].
//! The pipeline is drained on the UI thread at the start of every frame,
//! so the UI thread is the consumer context.

use std::time::Duration;

use eframe::egui;

use crate::config::StreamConfig;
use crate::pipeline::Pipeline;
use crate::present::SharedSnapshot;

use super::plot;

pub struct SensorStreamApp {
    pipeline: Pipeline,
    snapshot: SharedSnapshot,

    /// Checkbox state: "Start/Stop Sensor Thread".
    sampling: bool,
    /// Checkbox state: "Start/Stop Plotting".
    forwarding: bool,

    headline: Option<String>,
    /// Fallback repaint cadence when no notifier wakes the UI.
    repaint_after: Duration,
    /// Last control-surface error, shown in the side panel.
    last_error: Option<String>,
}

impl SensorStreamApp {
    /// Wrap a pipeline whose presenter is `snapshot` (or publishes into it).
    pub fn new(pipeline: Pipeline, snapshot: SharedSnapshot, cfg: &StreamConfig) -> Self {
        Self {
            sampling: pipeline.is_sampling(),
            forwarding: pipeline.is_forwarding(),
            pipeline,
            snapshot,
            headline: cfg.headline.clone(),
            repaint_after: cfg.sample_interval(),
            last_error: None,
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        // A unit that gave up on its own leaves the switch idle.
        self.sampling = self.pipeline.is_sampling();

        if ui
            .checkbox(&mut self.sampling, "Start/Stop Sensor Thread")
            .changed()
        {
            match self.pipeline.set_sampling(self.sampling) {
                Ok(()) => self.last_error = None,
                Err(e) => {
                    log::error!("failed to switch sampling: {e}");
                    self.last_error = Some(e.to_string());
                    self.sampling = self.pipeline.is_sampling();
                }
            }
        }
        if ui
            .checkbox(&mut self.forwarding, "Start/Stop Plotting")
            .changed()
        {
            self.pipeline.set_forwarding(self.forwarding);
        }

        ui.separator();
        let stats = self.pipeline.stats();
        ui.label(format!("Accepted: {}", stats.accepted));
        ui.label(format!("Dropped: {}", stats.dropped));
        ui.label(format!("Producer launches: {}", self.pipeline.launches()));
        if let Some(reason) = self.pipeline.last_stop() {
            ui.label(format!("Last producer: {reason}"));
        }
        if let Some(err) = &self.last_error {
            ui.colored_label(egui::Color32::LIGHT_RED, err);
        }
    }
}

impl eframe::App for SensorStreamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pipeline.pump();

        if let Some(h) = &self.headline {
            egui::TopBottomPanel::top("sensorstream_headline").show(ctx, |ui| {
                ui.heading(egui::RichText::new(h).color(egui::Color32::from_rgb(70, 110, 230)));
            });
        }

        egui::SidePanel::left("sensorstream_controls")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| self.render_controls(ui));

        let threshold = self.pipeline.threshold();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.snapshot
                .with_points(|points| plot::render_plots(ui, points, threshold));
        });

        ctx.request_repaint_after(self.repaint_after);
    }
}

impl Drop for SensorStreamApp {
    fn drop(&mut self) {
        if let Some(reason) = self.pipeline.shutdown() {
            log::info!("window closed, producer {reason}");
        }
    }
}
