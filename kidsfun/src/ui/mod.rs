//! UI module for the kidsfun TUI

pub mod render;
pub mod theme;
