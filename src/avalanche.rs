use crate::ionization::Seed;
use anyhow::Result;

/// Interface to the avalanche transport engine.
///
/// The engine takes one [`Seed`] electron, simulates the full multiplication
/// avalanche it triggers, and reports the number of electron endpoints. A
/// completed avalanche may legitimately report `0` when the seed electron is
/// absorbed or leaves the sensitive region without multiplying.
///
/// The engine is queried once per seed; an error is fatal to the run it
/// occurs in.
pub trait Avalanche {
    /// Simulates one avalanche and returns its electron-endpoint count.
    fn simulate(&mut self, seed: &Seed) -> Result<u32>;
}
