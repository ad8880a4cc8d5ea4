//! egui/eframe front end for the stream.
//!
//! | Sub-module | Responsibility |
//! | ---------- | -------------- |
//! | [`app`]    | [`SensorStreamApp`]: per-frame draining, controls, layout |
//! | [`plot`]   | The linked raw / computed / classification plots |
//! | [`run`]    | [`run_sensorstream()`] entry point for a native window |

mod app;
mod plot;
mod run;

pub use app::SensorStreamApp;
pub use run::run_sensorstream;
