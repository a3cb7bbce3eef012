use crate::avalanche::Avalanche;
use crate::gain::{GainSeries, Histogram};
use crate::ionization::Seed;
use crate::statistics::SeedSampler;
use anyhow::{ensure, Context, Result};
use bon::bon;
use num_traits::Zero;
use rand::Rng;
use std::io::Write;

/// The avalanche transport engine seam.
pub mod avalanche;
/// Gain series persistence and histogram summaries.
pub mod gain;
/// Primary ionizations and seed electrons.
pub mod ionization;
/// Randomized seed electron sampling.
pub mod statistics;

/// A value guaranteed to be strictly positive.
///
/// # Examples
///
/// ```
/// use gain::Positive;
///
/// assert!(Positive::new(0.04).is_some());
/// assert!(Positive::new(0.0).is_none());
/// assert!(Positive::new(-1.0).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Positive<T>(T);

impl<T> Positive<T>
where
    T: Zero + PartialOrd,
{
    /// Creates a new `Positive` value. Returns `None` unless `value > 0`.
    pub fn new(value: T) -> Option<Self> {
        if value > T::zero() {
            Some(Self(value))
        } else {
            None
        }
    }
}

impl<T> Positive<T> {
    /// Returns a reference to the inner value.
    pub fn inner(&self) -> &T {
        &self.0
    }
}

/// A trait that defines the interface for an observer of the gain scan.
///
/// The default implementation of all methods is a no-op. Users are expected to
/// override the methods they are interested in.
#[allow(unused_variables)]
pub trait Observer {
    /// Called when a seed electron has been drawn for an event.
    fn on_seed(&mut self, event: u32, seed: &Seed) {}
    /// Called when the avalanche engine reports a gain sample.
    fn on_avalanche(&mut self, event: u32, seed: &Seed, gain: u32) {}
    /// Called when an event's average gain has been persisted to the sink.
    fn on_event(&mut self, event: u32, average_gain: f64) {}
}

/// The upper bound policy of the event loop.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EventBound {
    /// Run exactly `events` events, with indices `0..events`.
    #[default]
    Exclusive,
    /// Run `events + 1` events, with indices `0..=events`.
    Inclusive,
}

/// The finalized result of a [`Simulation`] run.
#[derive(Debug)]
pub struct Report<O> {
    /// Per-event average gains, in event order.
    pub series: GainSeries,
    /// The series binned over `[0, max + 1)`.
    pub histogram: Histogram,
    /// The observer, handed back after the last event.
    pub observer: O,
}

pub struct Simulation<A, O, R, W> {
    sampler: SeedSampler<R>,
    engine: A,
    events: u32,
    primaries: u32,
    bound: EventBound,
    bins: u32,
    sink: W,
    observer: O,
}

#[bon]
impl<A, O, R, W> Simulation<A, O, R, W> {
    #[builder]
    pub fn new(
        sampler: SeedSampler<R>,
        engine: A,
        events: u32,
        primaries: u32,
        #[builder(default)] bound: EventBound,
        #[builder(default = 40)] bins: u32,
        sink: W,
        observer: O,
    ) -> Self {
        Self {
            sampler,
            engine,
            events,
            primaries,
            bound,
            bins,
            sink,
            observer,
        }
    }
}

impl<A, O, R, W> Simulation<A, O, R, W>
where
    A: Avalanche,
    O: Observer,
    R: Rng,
    W: Write,
{
    /// Runs the configured number of events and returns the finalized
    /// [`Report`].
    ///
    /// Each event draws `primaries` seed electrons, queries the avalanche
    /// engine once per seed, and reduces the gain samples to the event's
    /// average gain, which is appended to the in-memory series and persisted
    /// to the sink before the next event starts.
    ///
    /// Configuration errors are detected before the first event. An engine or
    /// sink failure aborts the run; entries persisted before the failure are
    /// kept, and the sink is released on every exit path.
    pub fn run(mut self) -> Result<Report<O>> {
        ensure!(self.events > 0, "event count must be positive");
        ensure!(
            self.primaries > 0,
            "primary ionization count must be positive"
        );
        ensure!(self.bins > 0, "histogram bin count must be positive");

        let events = match self.bound {
            EventBound::Exclusive => self.events,
            EventBound::Inclusive => self.events + 1,
        };

        let mut series = GainSeries::with_capacity(events as usize);
        let mut sink = self.sink;
        for event in 0..events {
            let mut sum = 0.0;
            for seed in (&mut self.sampler).take(self.primaries as usize) {
                self.observer.on_seed(event, &seed);
                let gain = self
                    .engine
                    .simulate(&seed)
                    .with_context(|| format!("avalanche failed during event {event}"))?;
                self.observer.on_avalanche(event, &seed, gain);
                sum += f64::from(gain);
            }
            // The seed electron itself is counted on top of its descendants.
            let average_gain = 1.0 + sum / f64::from(self.primaries);

            series.push(average_gain);
            writeln!(sink, "{average_gain}")
                .with_context(|| format!("failed to persist event {event}"))?;
            sink.flush()
                .with_context(|| format!("failed to persist event {event}"))?;
            self.observer.on_event(event, average_gain);
        }
        // The sink is released before any summary work.
        drop(sink);

        let histogram =
            Histogram::over(&series, self.bins).context("cannot summarize an empty gain series")?;

        Ok(Report {
            series,
            histogram,
            observer: self.observer,
        })
    }
}
