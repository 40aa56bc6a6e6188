pub mod generation;
pub mod opcode;

pub use generation::{Generation, UnknownGeneration};
pub use opcode::{Opcode, UnknownOpcode};
