pub mod bus;
pub mod decode;
pub mod geometry;
pub mod present;
pub mod regs;
pub mod vif;

pub use vif::{ViController, ViError};
