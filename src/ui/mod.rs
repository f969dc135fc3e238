//! Interactive terminal UI.

pub mod viewer;
