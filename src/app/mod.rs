// StableBuddy - app/mod.rs
//
// Application layer: startup checks, view-model state, and the generation
// worker.
// Dependencies: core, platform (output file writes).
// Must NOT depend on: ui.

pub mod generation;
pub mod startup;
pub mod state;
