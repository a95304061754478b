//! Exalted dice pools: d10s, 7 or higher succeeds, a 10 counts twice.
use rand::Rng;

pub const SUCCESS_THRESHOLD: u8 = 7;
pub const DOUBLE_SUCCESS: u8 = 10;

/// Largest pool a single roll accepts. Real join battle pools stay far below this.
pub const MAX_POOL: u32 = 100;

fn successes_on(face: u8) -> u32 {
    match face {
        DOUBLE_SUCCESS => 2,
        f if f >= SUCCESS_THRESHOLD => 1,
        _ => 0,
    }
}

/// Counts successes in a set of d10 faces.
pub fn count_successes(faces: &[u8]) -> u32 {
    faces.iter().map(|&face| successes_on(face)).sum()
}

/// Rolls a pool and counts its successes. Callers bound `dice` by [`MAX_POOL`].
pub fn roll_pool<R: Rng + ?Sized>(rng: &mut R, dice: u32) -> u32 {
    (0..dice).map(|_| successes_on(rng.gen_range(1..=10))).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn tens_count_double() {
        assert_eq!(count_successes(&[1, 6, 7, 8, 9, 10]), 5);
        assert_eq!(count_successes(&[]), 0);
        assert_eq!(count_successes(&[10, 10]), 4);
    }

    #[test]
    fn pool_successes_are_bounded_by_twice_the_dice() {
        let mut rng = StdRng::seed_from_u64(42);
        for dice in 0..12 {
            assert!(roll_pool(&mut rng, dice) <= dice * 2);
        }
        assert_eq!(roll_pool(&mut rng, 0), 0);
    }

    #[test]
    fn full_pool_averages_near_expectation() {
        // 0.3 single + 0.1 double successes per die.
        let mut rng = StdRng::seed_from_u64(7);
        let total: u32 = (0..50).map(|_| roll_pool(&mut rng, MAX_POOL)).sum();
        let mean = f64::from(total) / 50.0;
        assert!((35.0..=45.0).contains(&mean), "mean {mean}");
    }
}
