//! Random seeding of the participant pool.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `pool` in place (Fisher-Yates).
///
/// The result depends only on `rng`, so a seeded generator gives a reproducible order.
pub fn shuffle_pool<T, R: Rng + ?Sized>(pool: &mut [T], rng: &mut R) {
    pool.shuffle(rng);
}
