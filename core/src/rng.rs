use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator used for every synthetic sample. ChaCha8 keeps the stream stable
/// across platforms and `rand` releases, unlike `StdRng`.
pub type SampleRng = ChaCha8Rng;

/// Construct a deterministic RNG from a fixed seed.
pub fn seeded_rng(seed: u64) -> SampleRng {
    SampleRng::seed_from_u64(seed)
}
