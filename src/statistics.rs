use crate::ionization::{Direction, Seed};
use crate::Positive;
use bon::bon;
use rand::Rng;
use uom::si::f64::{Energy, Length, Time};
use uom::si::time::second;

/// The footprint of one amplification cell.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    /// Half width of the cell in both x and y.
    pub half_width: Positive<Length>,
    /// The z plane seed electrons start from.
    pub top: Length,
}

#[derive(Debug)]
/// An iterator over randomized seed electrons.
///
/// The iterator yields [`Seed`]s with x and y drawn uniformly over the cell
/// footprint, z fixed at the cell top plane, start time fixed at zero, and a
/// kinetic energy drawn uniformly from `[0, 2 * mean_energy)` (i.e. averaging
/// to `mean_energy` with uniform spread).
pub struct SeedSampler<R> {
    cell: Cell,
    mean_energy: Positive<Energy>,
    direction: Direction,
    // [`Length`] and [`Energy`] don't implement the `rand` distribution
    // traits, so we can't sample them directly. Instead, we'll draw plain
    // `f64`s in `[0, 1)` and scale the configured quantities with them.
    rng: R,
}

#[bon]
impl<R> SeedSampler<R> {
    /// Create a new sampler over the given cell.
    #[builder]
    pub fn new(
        cell: Cell,
        mean_energy: Positive<Energy>,
        #[builder(default)] direction: Direction,
        rng: R,
    ) -> Self {
        Self {
            cell,
            mean_energy,
            direction,
            rng,
        }
    }
}

impl<R> Iterator for SeedSampler<R>
where
    R: Rng,
{
    type Item = Seed;

    fn next(&mut self) -> Option<Self::Item> {
        let x: f64 = self.rng.random();
        let y: f64 = self.rng.random();
        let e: f64 = self.rng.random();

        let half_width = *self.cell.half_width.inner();
        Some(Seed {
            x: half_width * (2.0 * x - 1.0),
            y: half_width * (2.0 * y - 1.0),
            z: self.cell.top,
            time: Time::new::<second>(0.0),
            energy: *self.mean_energy.inner() * (2.0 * e),
            direction: self.direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uom::si::energy::electronvolt;
    use uom::si::length::centimeter;

    fn cell() -> Cell {
        Cell {
            half_width: Positive::new(Length::new::<centimeter>(0.04)).unwrap(),
            top: Length::new::<centimeter>(0.48),
        }
    }

    fn sampler(seed: u64) -> SeedSampler<StdRng> {
        SeedSampler::builder()
            .cell(cell())
            .mean_energy(Positive::new(Energy::new::<electronvolt>(1.0)).unwrap())
            .rng(StdRng::seed_from_u64(seed))
            .build()
    }

    #[test]
    fn seeds_stay_within_the_cell() {
        let cell = cell();
        let half_width = *cell.half_width.inner();

        for seed in sampler(7).take(1000) {
            assert!(-half_width <= seed.x && seed.x < half_width);
            assert!(-half_width <= seed.y && seed.y < half_width);
            assert_eq!(seed.z, cell.top);
            assert_eq!(seed.time, Time::zero());
        }
    }

    #[test]
    fn seed_energy_averages_to_the_mean() {
        let limit = Energy::new::<electronvolt>(2.0);

        for seed in sampler(7).take(1000) {
            assert!(Energy::zero() <= seed.energy && seed.energy < limit);
        }
    }

    #[test]
    fn seeds_vary() {
        let seeds = sampler(7).take(100).collect::<Vec<_>>();

        let first = seeds[0];
        assert!(seeds.iter().any(|s| s.x != first.x));
        assert!(seeds.iter().any(|s| s.y != first.y));
        assert!(seeds.iter().any(|s| s.energy != first.energy));
    }

    #[test]
    fn equal_rng_seeds_replay_the_same_sequence() {
        let a = sampler(55).take(10).collect::<Vec<_>>();
        let b = sampler(55).take(10).collect::<Vec<_>>();

        assert_eq!(a, b);
    }

    #[test]
    fn direction_policy_is_attached_verbatim() {
        let direction = Direction::along(0.0, 0.0, -1.0).unwrap();
        let sampler = SeedSampler::builder()
            .cell(cell())
            .mean_energy(Positive::new(Energy::new::<electronvolt>(1.0)).unwrap())
            .direction(direction)
            .rng(StdRng::seed_from_u64(1))
            .build();

        for seed in sampler.take(10) {
            assert_eq!(seed.direction, direction);
        }
    }
}
