//! ULID: Universally Unique Lexicographically Sortable Identifier
//!
//! ```rust
//! let x = ulid128::new()?;
//! println!("{}", x); // e.g., "01HF7YAT00TCGJPVNDWSQJZB3J"
//! println!("{:?}", x.as_bytes()); // as a 16-byte big-endian array
//! # Ok::<(), ulid128::GenerateError>(())
//! ```
//!
//! # Field and bit layout
//!
//! A ULID is a 128-bit value with the following layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           timestamp           |           randomness          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           randomness                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           randomness                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `timestamp` field is dedicated to the Unix timestamp in milliseconds.
//! - The 80-bit `randomness` field is filled with a cryptographically strong random number; a
//!   monotonic generator increments it by one for each new ID generated within the same
//!   millisecond instead of redrawing it, which keeps the IDs of one generator strictly
//!   increasing in sort order.
//!
//! Both fields are big-endian, so the byte-wise order of the raw representation, the numeric
//! order of the 128-bit value, and the lexicographic order of the 26-digit Crockford base32
//! string representation all agree.
//!
//! The text representation uses Crockford's base32 alphabet (`0-9A-HJKMNP-TV-Z`; I, L, O, and U
//! are excluded), is matched case-insensitively when parsed, and is uppercase when encoded.
//!
//! # Time and randomness sources
//!
//! A [`UlidGenerator`] depends only on the [`generator::TimeSource`] and
//! [`generator::RandSource`] traits, so the wall clock and the entropy source can be replaced,
//! e.g., to run on a platform without `std` clock support or to script them in tests. The stock
//! implementations are [`generator::StdSystemTime`] and [`generator::DefaultRng`].
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen` (implies `default_rng`): enables the primary [`new()`] and [`new_string()`]
//!   functions backed by a process-wide global generator.
//! - `default_rng` (implies `rand09`): enables [`generator::DefaultRng`] and the
//!   [`UlidGenerator::new()`] and [`UlidGenerator::new_stateless()`] constructors.
//!
//! Optional features:
//!
//! - `rand09`: integration with `rand_core` v0.9 types through
//!   [`UlidGenerator::with_rand09()`].
//! - `serde`: serialization and deserialization of [`Ulid`] objects.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{ParseError, Ulid};

pub mod generator;
pub use generator::{GenerateError, UlidGenerator};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{new, new_string};

/// The maximum valid value of the `timestamp` field.
pub const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

/// The maximum valid value of the `randomness` field.
pub const MAX_RANDOMNESS: u128 = (1 << 80) - 1;

/// The number of bytes in the `randomness` field.
pub const RANDOMNESS_SIZE: usize = 10;

#[cfg(test)]
#[cfg(feature = "global_gen")]
mod tests {
    use crate::Ulid;
    use std::sync::OnceLock;

    fn samples() -> &'static [String] {
        static SAMPLES: OnceLock<Vec<String>> = OnceLock::new();
        SAMPLES.get_or_init(|| (0..100_000).map(|_| crate::new_string().unwrap()).collect())
    }

    /// Generates 26-digit canonical string
    #[test]
    fn generates_26_digit_canonical_string() {
        use regex::Regex;
        let re = Regex::new(r"^[0-7][0-9A-HJKMNP-TV-Z]{25}$").unwrap();
        for e in samples() {
            assert!(re.is_match(e));
        }
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        let s: HashSet<&String> = samples().iter().collect();
        assert_eq!(s.len(), samples().len());
    }

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        let samples = samples();
        for i in 1..samples.len() {
            assert!(samples[i - 1] < samples[i]);
        }
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time::{SystemTime, UNIX_EPOCH};
        for _ in 0..10_000 {
            let ts_now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis() as i64;
            let timestamp = crate::new().unwrap().timestamp() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Encodes unique sortable pair of timestamp and randomness
    #[test]
    fn encodes_unique_sortable_pair_of_timestamp_and_randomness() {
        let samples = samples();
        let mut prev = samples[0].parse::<Ulid>().unwrap();

        for e in &samples[1..] {
            let curr = e.parse::<Ulid>().unwrap();
            assert!(
                prev.timestamp() < curr.timestamp()
                    || (prev.timestamp() == curr.timestamp()
                        && prev.randomness() < curr.randomness())
            );
            prev = curr;
        }
    }
}
