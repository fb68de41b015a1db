mod black_scholes;
mod plotting;

pub use black_scholes::*;
pub use plotting::*;
