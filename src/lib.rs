//! Library exports for reuse in the binaries, benchmarks and tests.
/// App directory resolution.
pub mod app_dirs;
/// Chart descriptions built from metric tables.
pub mod chart;
/// Persisted user preferences.
pub mod config;
/// Request handling: ingest, union, selection and chart assembly.
pub mod dashboard;
/// Shared egui UI modules.
pub mod egui_app;
/// SVG export of rendered charts.
pub mod export;
/// Tracing setup.
pub mod logging;
/// Metric log parsing and tabular reshaping.
pub mod metrics;
