// StableBuddy - ui/panels/mod.rs

pub mod about;
pub mod canvas;
pub mod prompt;
