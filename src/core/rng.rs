// Randomness for spin lengths.
//
// Not cryptographically secure. Only used to pick how far a wheel turns; tests and
// the CLI seed it for reproducible spins.

/// Source of uniform samples in `[0, 1)`.
pub trait SpinRandom {
    fn next_unit(&mut self) -> f64;
}

impl<F: FnMut() -> f64> SpinRandom for F {
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    #[inline]
    pub fn next_f64_01(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl SpinRandom for Prng {
    fn next_unit(&mut self) -> f64 {
        self.next_f64_01()
    }
}
