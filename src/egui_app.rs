//! Desktop front end: controller, view state and the egui renderer.

pub mod controller;
pub mod state;
pub mod ui;
