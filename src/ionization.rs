use anyhow::{ensure, Result};
use num_traits::Zero;
use uom::si::f64::{Energy, Length, Time};
use uom::si::ratio::ratio;

/// The starting direction of a seed electron.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Direction {
    /// Let the transport engine draw the direction itself.
    #[default]
    Isotropic,
    /// Start along a fixed unit vector.
    Along([f64; 3]),
}

impl Direction {
    /// Creates a fixed direction along `(u, v, w)`, normalized to unit
    /// length. Returns `None` for the zero vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use gain::ionization::Direction;
    ///
    /// let up = Direction::along(0.0, 0.0, 2.0).unwrap();
    /// assert_eq!(up.vector(), [0.0, 0.0, 1.0]);
    /// assert_eq!(Direction::along(0.0, 0.0, 0.0), None);
    /// ```
    pub fn along(u: f64, v: f64, w: f64) -> Option<Self> {
        let magnitude = (u * u + v * v + w * w).sqrt();
        if magnitude == 0.0 {
            return None;
        }

        Some(Self::Along([u / magnitude, v / magnitude, w / magnitude]))
    }

    /// Returns the vector handed to the transport engine.
    ///
    /// [`Direction::Isotropic`] is encoded as the zero vector, which
    /// transport engines interpret as "draw a random direction".
    pub fn vector(&self) -> [f64; 3] {
        match self {
            Self::Isotropic => [0.0; 3],
            Self::Along(v) => *v,
        }
    }
}

/// A seed electron.
///
/// This is the complete starting state handed to the avalanche engine for one
/// primary ionization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seed {
    pub x: Length,
    pub y: Length,
    pub z: Length,
    pub time: Time,
    pub energy: Energy,
    pub direction: Direction,
}

/// Returns the number of primary ionizations produced by depositing
/// `deposited` energy at a cost of `ionization_energy` plus `excess` kinetic
/// energy per ion pair.
///
/// The count is the deposited energy over the per-pair cost, rounded down;
/// remainder energy does not produce a partial ionization. The per-pair cost
/// must be strictly positive.
///
/// # Examples
///
/// ```
/// use gain::ionization::primary_ionizations;
/// use uom::si::energy::electronvolt;
/// use uom::si::f64::Energy;
///
/// let n = primary_ionizations(
///     Energy::new::<electronvolt>(5900.0),
///     Energy::new::<electronvolt>(26.0),
///     Energy::new::<electronvolt>(1.0),
/// )?;
/// assert_eq!(n, 218);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn primary_ionizations(
    deposited: Energy,
    ionization_energy: Energy,
    excess: Energy,
) -> Result<u32> {
    let per_pair = ionization_energy + excess;
    ensure!(
        per_pair > Energy::zero(),
        "energy cost per ion pair must be positive"
    );

    Ok((deposited / per_pair).get::<ratio>() as u32)
}
