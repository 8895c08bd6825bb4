pub mod augment;
pub mod indicators;


pub use augment::*;
pub use indicators::*;
