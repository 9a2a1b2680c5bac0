#![cfg(feature = "global_gen")]

use crate::{GenerateError, Ulid, UlidGenerator};
use std::sync::{Mutex, OnceLock};

#[cfg(unix)]
type GlobalGenInner = unix_fork_safety::ProcessLocalGenerator;

#[cfg(not(unix))]
type GlobalGenInner = UlidGenerator<crate::generator::DefaultRng>;

/// Generates a new ULID object using the global monotonic generator.
///
/// This function is thread-safe; multiple threads in a process can call it concurrently without
/// breaking the monotonic order of generated IDs. On Unix, this function resets the generator
/// state when the process ID changes (i.e., upon forks) to avoid collisions across processes.
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn new() -> Result<Ulid, GenerateError> {
    static G: OnceLock<Mutex<GlobalGenInner>> = OnceLock::new();

    G.get_or_init(Default::default)
        .lock()
        .expect("ulid128: could not lock global generator")
        .generate()
}

/// Generates a new ULID encoded in the 26-digit canonical string representation using the global
/// monotonic generator.
///
/// Use this to quickly get a new ULID as a string.
///
/// This function is thread-safe; multiple threads in a process can call it concurrently without
/// breaking the monotonic order of generated IDs. On Unix, this function resets the generator
/// state when the process ID changes (i.e., upon forks) to avoid collisions across processes.
///
/// # Examples
///
/// ```rust
/// let x = ulid128::new_string()?; // e.g., "01HF7YAT00TCGJPVNDWSQJZB3J"
///
/// assert!(regex::Regex::new(r"^[0-7][0-9A-HJKMNP-TV-Z]{25}$").unwrap().is_match(&x));
/// # Ok::<(), ulid128::GenerateError>(())
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub fn new_string() -> Result<String, GenerateError> {
    new().map(|e| e.encode().into())
}

#[cfg(unix)]
mod unix_fork_safety {
    use super::{GenerateError, Ulid, UlidGenerator};
    use crate::generator::DefaultRng;
    use std::process;

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon process forks).
    #[derive(Debug)]
    pub struct ProcessLocalGenerator {
        gen: UlidGenerator<DefaultRng>,
        pid: u32,
    }

    impl Default for ProcessLocalGenerator {
        fn default() -> Self {
            Self {
                gen: Default::default(),
                pid: process::id(),
            }
        }
    }

    impl ProcessLocalGenerator {
        pub fn generate(&mut self) -> Result<Ulid, GenerateError> {
            let pid = process::id();
            if pid != self.pid {
                self.gen = Default::default();
                self.pid = pid;
            }
            self.gen.generate()
        }
    }
}
