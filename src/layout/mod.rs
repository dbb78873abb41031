pub mod engine;
pub mod navigate;

pub use engine::{Bounds, LayoutParams, bounds, layout, subtree_height};
pub use navigate::{Direction, nearest_in_direction};
