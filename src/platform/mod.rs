// StableBuddy - platform/mod.rs
//
// Platform layer: config files, environment, filesystem, and the network
// backend for image generation.
// Dependencies: core, util, directories, reqwest.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
pub mod hub;
