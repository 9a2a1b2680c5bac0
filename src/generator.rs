//! ULID generator and the time and randomness source traits it depends on.

use crate::{MAX_RANDOMNESS, MAX_TIMESTAMP, RANDOMNESS_SIZE, Ulid};
use std::{error, fmt};

#[cfg(feature = "default_rng")]
mod default_rng;
#[cfg(feature = "default_rng")]
pub use default_rng::DefaultRng;

pub mod with_rand09;


/// A trait that defines the interface of the wall clock consulted by [`UlidGenerator`].
pub trait TimeSource {
    /// Returns the current Unix time in milliseconds, or `Err` if the clock could not be read.
    fn unix_ts_ms(&mut self) -> Result<u64, ClockError>;
}

/// A trait that defines the interface of the randomness source drawn on by [`UlidGenerator`].
///
/// An implementation must fill all ten bytes or fail; a partial fill has to be reported as
/// [`RandomError`], never as success.
pub trait RandSource {
    /// Returns ten fresh random bytes, or `Err` if the source could not produce them.
    fn random_bytes(&mut self) -> Result<[u8; RANDOMNESS_SIZE], RandomError>;
}

/// An opaque error reported by a [`TimeSource`] that failed to read the current time.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ClockError;

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not read the current time")
    }
}

impl error::Error for ClockError {}

/// An opaque error reported by a [`RandSource`] that failed to produce random bytes.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct RandomError;

impl fmt::Display for RandomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not obtain random bytes")
    }
}

impl error::Error for RandomError {}

/// An error while generating a ULID.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum GenerateError {
    /// The time source failed to report the current time.
    ClockUnavailable,

    /// The randomness source failed to produce ten random bytes.
    RandomnessUnavailable,

    /// The 80-bit randomness field cannot be incremented any further within the current
    /// millisecond without wrapping around and breaking the monotonic order.
    RandomnessExhausted,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockUnavailable => write!(f, "time source failed to report the current time"),
            Self::RandomnessUnavailable => {
                write!(f, "randomness source failed to produce random bytes")
            }
            Self::RandomnessExhausted => write!(
                f,
                "randomness field exhausted within the current millisecond"
            ),
        }
    }
}

impl error::Error for GenerateError {}

/// A [`TimeSource`] that reads the system clock through [`std::time::SystemTime`].
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> Result<u64, ClockError> {
        use std::time::{SystemTime, UNIX_EPOCH};
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => Ok(duration.as_millis() as u64),
            Err(_) => Err(ClockError),
        }
    }
}

/// Represents a ULID generator that produces one identifier per call from a time source and a
/// randomness source.
///
/// A generator runs in one of two modes selected at construction. A *stateless* generator packs
/// every identifier from a wall-clock reading and a fresh random draw. A *monotonic* generator
/// additionally remembers the last timestamp and randomness it emitted: while the clock reports
/// the same (or an earlier) millisecond, the randomness field is incremented by one instead of
/// redrawn, so identifiers produced by one generator compare strictly increasing in call order.
///
/// The state is not synchronized; to share one monotonic generator across threads, wrap it in a
/// mutex that serializes the whole `generate` call:
///
/// ```rust
/// use std::{sync, thread};
/// use ulid128::UlidGenerator;
///
/// let g = sync::Arc::new(sync::Mutex::new(UlidGenerator::new()));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct UlidGenerator<R, T = StdSystemTime> {
    last_timestamp: u64,
    last_random: u128,
    monotonic: bool,

    rand_source: R,
    time_source: T,
}

#[cfg(feature = "default_rng")]
#[cfg_attr(docsrs, doc(cfg(feature = "default_rng")))]
impl UlidGenerator<DefaultRng> {
    /// Creates a monotonic generator backed by [`DefaultRng`] and [`StdSystemTime`].
    ///
    /// # Panics
    ///
    /// Panics if the default random number generator fails to initialize from the operating
    /// system's entropy source.
    pub fn new() -> Self {
        Self::with_rand_and_time_sources(Default::default(), StdSystemTime)
    }

    /// Creates a stateless generator backed by [`DefaultRng`] and [`StdSystemTime`].
    ///
    /// # Panics
    ///
    /// Panics if the default random number generator fails to initialize from the operating
    /// system's entropy source.
    pub fn new_stateless() -> Self {
        Self::stateless_with_rand_and_time_sources(Default::default(), StdSystemTime)
    }
}

#[cfg(feature = "default_rng")]
#[cfg_attr(docsrs, doc(cfg(feature = "default_rng")))]
impl Default for UlidGenerator<DefaultRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandSource, T: TimeSource> UlidGenerator<R, T> {
    /// Creates a monotonic generator with the specified randomness and time sources.
    pub const fn with_rand_and_time_sources(rand_source: R, time_source: T) -> Self {
        Self {
            last_timestamp: 0,
            last_random: 0,
            monotonic: true,
            rand_source,
            time_source,
        }
    }

    /// Creates a stateless generator with the specified randomness and time sources.
    ///
    /// A stateless generator draws fresh randomness on every call and retains nothing between
    /// calls; identifiers generated within one millisecond are unordered relative to each other.
    pub const fn stateless_with_rand_and_time_sources(rand_source: R, time_source: T) -> Self {
        Self {
            last_timestamp: 0,
            last_random: 0,
            monotonic: false,
            rand_source,
            time_source,
        }
    }

    /// Generates a new ULID object from the current time.
    ///
    /// Failures of the time or randomness source are reported as
    /// [`GenerateError::ClockUnavailable`] and [`GenerateError::RandomnessUnavailable`]; this
    /// method does not retry on behalf of the caller.
    pub fn generate(&mut self) -> Result<Ulid, GenerateError> {
        let unix_ts_ms = self
            .time_source
            .unix_ts_ms()
            .map_err(|_| GenerateError::ClockUnavailable)?;
        self.generate_with_ts(unix_ts_ms & MAX_TIMESTAMP)
    }

    /// Generates a new ULID object from the `unix_ts_ms` passed.
    ///
    /// In monotonic mode, if `unix_ts_ms` does not exceed the timestamp of the preceding call,
    /// the new identifier reuses the preceding timestamp and carries the preceding randomness
    /// incremented by one; [`GenerateError::RandomnessExhausted`] is returned without touching
    /// the state if the increment would wrap the 80-bit field. The emitted timestamp therefore
    /// stays pinned to the first reading of a same-millisecond run while the randomness counts
    /// upward, and a clock rollback is absorbed by the same path.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit integer.
    pub fn generate_with_ts(&mut self, unix_ts_ms: u64) -> Result<Ulid, GenerateError> {
        assert!(
            unix_ts_ms <= MAX_TIMESTAMP,
            "`unix_ts_ms` must be a 48-bit integer"
        );

        if self.monotonic && self.last_random != 0 && unix_ts_ms <= self.last_timestamp {
            if self.last_random == MAX_RANDOMNESS {
                return Err(GenerateError::RandomnessExhausted);
            }
            self.last_random += 1;
            Ok(Ulid::from_parts(self.last_timestamp, self.last_random))
        } else {
            let bytes = self
                .rand_source
                .random_bytes()
                .map_err(|_| GenerateError::RandomnessUnavailable)?;
            let mut word = [0u8; 16];
            word[16 - RANDOMNESS_SIZE..].copy_from_slice(&bytes);
            let randomness = u128::from_be_bytes(word);

            if self.monotonic {
                self.last_timestamp = unix_ts_ms;
                self.last_random = randomness;
            }
            Ok(Ulid::from_parts(unix_ts_ms, randomness))
        }
    }

    /// Generates a new ULID encoded in the 26-digit canonical string representation.
    pub fn generate_string(&mut self) -> Result<String, GenerateError> {
        self.generate().map(|e| e.encode().into())
    }
}
