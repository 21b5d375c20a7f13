/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures from the API (data.rs)
/// - The user's city/district selection (selection.rs)
/// - The render-ready snapshot recomputed on every tick (display.rs)

pub mod data;
pub mod display;
pub mod selection;
