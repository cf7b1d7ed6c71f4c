//! Pulse Explorer: slice the Household Pulse vaccine-attitude survey by
//! demographics and compare the slice with everyone else.
//!
//! The [`data`] layer is UI-free: load a [`data::model::Table`], build
//! [`data::slice::Criteria`], compute a [`data::slice::Membership`], reshape
//! reason indicators with [`data::reshape::to_long`]. The egui front end in
//! [`app`] and [`ui`] only renders what [`state::AppState`] derives.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
