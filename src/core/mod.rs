// StableBuddy - core/mod.rs
//
// Core types and the generation capability trait.
// Dependencies: util, image.
// Must NOT depend on: ui, platform, app.

pub mod generator;
pub mod model;
