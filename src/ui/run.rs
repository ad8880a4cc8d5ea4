//! Top-level entry point for running the stream in a native window.

use std::sync::Arc;

use eframe::egui;

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::pipeline::Pipeline;
use crate::present::SharedSnapshot;
use crate::source::SampleSource;

use super::app::SensorStreamApp;

/// Launch the viewer in a native window, sampling from `source`.
///
/// This:
///
/// 1. Builds a [`Pipeline`] publishing into a [`SharedSnapshot`], with a
///    notifier that wakes the egui event loop on every delivered sample.
/// 2. Applies the initial sampling / forwarding state from `cfg`.
/// 3. Opens a native window and enters the eframe event loop.
///
/// The call blocks until the window is closed. Configuration errors surface
/// as [`eframe::Error::AppCreation`].
pub fn run_sensorstream<S>(cfg: StreamConfig, source: S) -> eframe::Result<()>
where
    S: SampleSource + 'static,
{
    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(cfg.title.clone())
            .with_inner_size(egui::vec2(1100.0, 760.0)),
        ..Default::default()
    };

    let title = cfg.title.clone();
    eframe::run_native(
        &title,
        opts,
        Box::new(move |cc| {
            let app = build_app(cc, &cfg, source)?;
            Ok(Box::new(app))
        }),
    )
}

fn build_app<S>(
    cc: &eframe::CreationContext<'_>,
    cfg: &StreamConfig,
    source: S,
) -> Result<SensorStreamApp, StreamError>
where
    S: SampleSource + 'static,
{
    let ctx = cc.egui_ctx.clone();
    let snapshot = SharedSnapshot::new();
    let mut pipeline = Pipeline::new(cfg, source, snapshot.clone())?
        .with_notifier(Arc::new(move || ctx.request_repaint()));
    pipeline.set_forwarding(cfg.start_forwarding);
    pipeline.set_sampling(cfg.start_sampling)?;
    Ok(SensorStreamApp::new(pipeline, snapshot, cfg))
}
