/// This is a general example of how you would typically set up a gain scan.
use anyhow::Result;
use gain::avalanche::Avalanche;
use gain::ionization::{primary_ionizations, Seed};
use gain::statistics::{Cell, SeedSampler};
use gain::{Observer, Positive, Simulation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use std::fs::File;
use std::io::BufWriter;
use uom::si::energy::electronvolt;
use uom::si::f64::{Energy, Length};
use uom::si::length::centimeter;

/// A stand-in for the external avalanche transport engine.
///
/// A real engine tracks the seed electron microscopically through the gas and
/// field map of the amplification stage. Here the electron-endpoint count is
/// drawn from an exponential distribution, which is what a single GEM-like
/// stage produces to first order.
struct ExponentialEngine {
    exp: Exp<f64>,
    rng: StdRng,
}

impl Avalanche for ExponentialEngine {
    fn simulate(&mut self, _seed: &Seed) -> Result<u32> {
        Ok(self.exp.sample(&mut self.rng).round() as u32)
    }
}

struct Progress;

impl Observer for Progress {
    fn on_event(&mut self, event: u32, average_gain: f64) {
        println!("event {event}: average gain {average_gain:.2}");
    }
}

fn main() -> Result<()> {
    // ===========================================
    // These are most likely your free parameters:
    let events = 1000;
    let mean_engine_gain = 20.0;
    // ===========================================

    // ===========================================
    // Then, these are properties of the source and the gas. The effective
    // cost per ion pair is the ionization energy plus the mean kinetic
    // energy carried away by the freed electron:
    let deposit = Energy::new::<electronvolt>(5900.0);
    let ionization_energy = Energy::new::<electronvolt>(26.0);
    let excess = Energy::new::<electronvolt>(1.0);
    // ===========================================

    // ===========================================
    // Then, this is the amplification cell. Seed electrons start on the top
    // plane, anywhere within one pitch of the cell center:
    let cell = Cell {
        half_width: Positive::new(Length::new::<centimeter>(0.04)).unwrap(),
        top: Length::new::<centimeter>(0.48),
    };
    // ===========================================

    let primaries = primary_ionizations(deposit, ionization_energy, excess)?;

    let sampler = SeedSampler::builder()
        .cell(cell)
        .mean_energy(Positive::new(Energy::new::<electronvolt>(1.0)).unwrap())
        .rng(StdRng::seed_from_u64(0xACE1))
        .build();
    let engine = ExponentialEngine {
        exp: Exp::new(1.0 / mean_engine_gain)?,
        rng: StdRng::seed_from_u64(0xACE2),
    };

    let report = Simulation::builder()
        .sampler(sampler)
        .engine(engine)
        .events(events)
        .primaries(primaries)
        .sink(BufWriter::new(File::create("gain.txt")?))
        .observer(Progress)
        .build()
        .run()?;

    println!("{}", report.histogram);

    let mean = report.series.iter().sum::<f64>() / report.series.len() as f64;
    let summary = serde_json::json!({
        "events": report.series.len(),
        "primaries_per_event": primaries,
        "mean_gain": mean,
        "max_gain": report.series.max_gain(),
        "histogram_upper": report.histogram.upper(),
    });
    println!("{summary:#}");

    Ok(())
}
