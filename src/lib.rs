//! Interactive explorer over a mobile-app catalog: load once, filter,
//! aggregate per category, and page through the matching rows.

pub mod app;
pub mod color;
pub mod data;
pub mod settings;
pub mod state;
pub mod ui;
