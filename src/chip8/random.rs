use rand::Rng;

/// Source of the bytes used by CXNN.
pub trait RandSource {
    fn byte(&mut self) -> u8;
}

/// Uniform bytes from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn byte(&mut self) -> u8 {
        rand::thread_rng().gen()
    }
}

/// Always returns the same byte, for deterministic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRandom(pub u8);

impl RandSource for FixedRandom {
    fn byte(&mut self) -> u8 {
        self.0
    }
}
