use std::error;

use rand09::{rngs::OsRng, rngs::ReseedingRng, RngCore as _};
use rand_chacha::ChaCha12Core;

use super::{RandSource, RandomError};
use crate::RANDOMNESS_SIZE;

/// The default cryptographically strong random number generator: a ChaCha12 PRNG reseeded from
/// [`OsRng`] after every 64 KiB of output.
#[derive(Clone, Debug)]
pub struct DefaultRng {
    _private: (),
    inner: ReseedingRng<ChaCha12Core, OsRng>,
}

impl RandSource for DefaultRng {
    fn random_bytes(&mut self) -> Result<[u8; RANDOMNESS_SIZE], RandomError> {
        let mut bytes = [0u8; RANDOMNESS_SIZE];
        self.inner.fill_bytes(&mut bytes);
        Ok(bytes)
    }
}

impl Default for DefaultRng {
    /// Creates an instance of the default random number generator.
    ///
    /// # Panics
    ///
    /// Panics in the highly unlikely event where the operating system's random number generator
    /// failed to provide secure entropy.
    fn default() -> Self {
        Self::try_new().expect("could not initialize DefaultRng")
    }
}

impl DefaultRng {
    pub(crate) fn try_new() -> Result<Self, impl error::Error> {
        ReseedingRng::new(1024 * 64, OsRng).map(|inner| Self {
            _private: (),
            inner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DefaultRng, RandSource};

    /// Generates unbiased random bits
    ///
    /// This test may fail at a very low probability.
    #[test]
    fn generates_unbiased_random_bits() {
        let mut rng = DefaultRng::default();

        // test if random bits are set to 1 at ~50% probability
        let mut counts = [0u32; 80];

        // test if XOR of two consecutive outputs is also random
        let mut prev = rng.random_bytes().unwrap();
        let mut counts_xor = [0u32; 80];

        const N_LOOPS: usize = 100_000;
        for _ in 0..N_LOOPS {
            let bytes = rng.random_bytes().unwrap();

            for (i, e) in counts.iter_mut().enumerate() {
                *e += (bytes[i / 8] >> (7 - i % 8)) as u32 & 1;
            }
            for (i, e) in counts_xor.iter_mut().enumerate() {
                *e += ((bytes[i / 8] ^ prev[i / 8]) >> (7 - i % 8)) as u32 & 1;
            }
            prev = bytes;
        }

        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_LOOPS as f64).sqrt();
        assert!(counts
            .iter()
            .all(|e| (*e as f64 / N_LOOPS as f64 - 0.5).abs() < margin));
        assert!(counts_xor
            .iter()
            .all(|e| (*e as f64 / N_LOOPS as f64 - 0.5).abs() < margin));
    }
}
