//! Pixel art window for Elendor.
//!
//! A macroquad front end that owns the render loop and keyboard, and drives
//! an [`elendor_core::Session`] with real frame timings.

pub mod app;
pub mod input;
pub mod screen;
pub mod theme;
pub mod widget;
