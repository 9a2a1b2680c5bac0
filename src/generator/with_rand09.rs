//! Integration with `rand` (v0.9) crate.

#![cfg(feature = "rand09")]

use super::{RandSource, RandomError, StdSystemTime, UlidGenerator};
use crate::RANDOMNESS_SIZE;
use rand_core09::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn random_bytes(&mut self) -> Result<[u8; RANDOMNESS_SIZE], RandomError> {
        let mut bytes = [0u8; RANDOMNESS_SIZE];
        self.0.fill_bytes(&mut bytes);
        Ok(bytes)
    }
}

impl<T: RngCore> UlidGenerator<Adapter<T>> {
    /// Creates a monotonic generator with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.9) crate. The specified random number generator should be
    /// cryptographically strong and securely seeded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rand09 as rand;
    /// use rand::SeedableRng as _;
    /// use ulid128::UlidGenerator;
    ///
    /// let mut g = UlidGenerator::with_rand09(rand::rngs::StdRng::from_os_rng());
    /// println!("{}", g.generate()?);
    /// # Ok::<(), ulid128::GenerateError>(())
    /// ```
    pub const fn with_rand09(rng: T) -> Self {
        Self::with_rand_and_time_sources(Adapter(rng), StdSystemTime)
    }
}
