//! Reusable widgets shared by the panels.

pub mod cell_grid;
