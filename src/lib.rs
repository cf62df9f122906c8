pub mod chip8;

pub use crate::chip8::{Chip8, Chip8Error, FixedRandom, RandSource, ThreadRandom};
