//! # Message ID source
//!
//! Every query needs a fresh 16-bit message ID and, when it travels inside a
//! raw packet, an ephemeral UDP source port. Both come from one process-wide
//! [`SmallRng`] that is seeded **once**, on first use, from the OS-backed
//! thread RNG. It is never reseeded per call, so two queries issued within
//! the same clock tick cannot end up with the same seed.
//!
//! The generator lives behind a [`parking_lot::Mutex`]; holding the lock only
//! covers a single draw, so contention stays negligible even when many worker
//! threads build queries at once.

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::LazyLock;

/// Lowest port of the IANA dynamic/private range (RFC 6335).
pub const EPHEMERAL_PORT_MIN: u16 = 49152;

static SHARED_RNG: LazyLock<Mutex<SmallRng>> = LazyLock::new(|| {
    let mut thread_rng = rand::rng();
    Mutex::new(SmallRng::from_rng(&mut thread_rng))
});

/// Generates a random message ID, uniform over `1..=65535`.
///
/// `0` is never returned.
pub fn generate_id() -> u16 {
    SHARED_RNG.lock().random_range(1..=u16::MAX)
}

/// Picks a random UDP source port from the ephemeral range `49152..=65535`.
pub fn ephemeral_port() -> u16 {
    SHARED_RNG.lock().random_range(EPHEMERAL_PORT_MIN..=u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_generate_id_never_zero() {
        for _ in 0..10_000 {
            assert_ne!(generate_id(), 0);
        }
    }

    #[test]
    fn test_ephemeral_port_in_range() {
        for _ in 0..1_000 {
            assert!(ephemeral_port() >= EPHEMERAL_PORT_MIN);
        }
    }

    #[test]
    fn test_concurrent_ids_are_not_degenerate() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..1_250).map(|_| generate_id()).collect::<Vec<u16>>()))
            .collect();

        let mut all = Vec::with_capacity(10_000);
        for handle in handles {
            let ids = handle.join().unwrap();

            // No long runs of the same value inside one caller's stream
            let longest_run = ids
                .windows(2)
                .fold((1usize, 1usize), |(best, cur), w| {
                    if w[0] == w[1] {
                        (best.max(cur + 1), cur + 1)
                    } else {
                        (best, 1)
                    }
                })
                .0;
            assert!(longest_run < 4, "run of {} identical ids", longest_run);

            all.extend(ids);
        }

        assert_eq!(all.len(), 10_000);
        assert!(all.iter().all(|&id| id != 0));

        // 10k draws over 65535 values: expected ~9300 distinct
        let distinct: HashSet<u16> = all.iter().copied().collect();
        assert!(distinct.len() > 8_500, "only {} distinct ids", distinct.len());
    }
}
