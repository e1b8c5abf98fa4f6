// Randomness source - pluggable uniform index generator
// Shuffle and draw only ever ask for "an index below n", so that is the seam.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Uniform random index generator
pub trait IndexSource {
    /// Uniform index in `0..bound`. Callers never pass `bound == 0`.
    fn index_below(&mut self, bound: usize) -> usize;
}

/// Any `rand` generator as an index source
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<ThreadRng> {
    /// Thread-local OS-seeded generator (the default outside tests)
    pub fn thread() -> Self {
        RngSource::new(rand::thread_rng())
    }
}

impl RngSource<StdRng> {
    /// Reproducible generator for `--seed` and tests
    pub fn seeded(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> IndexSource for RngSource<R> {
    fn index_below(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// Replays a fixed list of indices, cycling when exhausted.
///
/// Each value is reduced modulo the requested bound so a script never
/// produces an out-of-range index.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<usize>,
    position: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<usize>) -> Self {
        ScriptedSource { script, position: 0 }
    }

    /// Always returns the first index
    pub fn always_first() -> Self {
        ScriptedSource::new(vec![0])
    }
}

impl IndexSource for ScriptedSource {
    fn index_below(&mut self, bound: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.position % self.script.len()];
        self.position += 1;
        value % bound
    }
}

/// Source picked from the CLI: seeded when a seed is given, thread RNG otherwise
pub fn source_for(seed: Option<u64>) -> Box<dyn IndexSource> {
    match seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::thread()),
    }
}
