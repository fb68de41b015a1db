pub mod grid;
pub mod market;
mod option;
pub mod surface;

pub use grid::*;
pub use market::*;
pub use option::*;
pub use surface::PriceSurface;
