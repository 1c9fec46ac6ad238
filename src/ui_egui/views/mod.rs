pub mod grid_model;
mod palette;
pub mod week_grid;
