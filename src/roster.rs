//! Character roster selection

use rand::Rng;

use crate::error::RosterError;

/// Pick `count` distinct entries from `pool`, uniformly, without replacement.
///
/// Results come back in the order they were drawn. The pool itself is left
/// untouched; draws are made from a working copy.
pub fn choose_chars<T: Clone, R: Rng>(
    pool: &[T],
    count: usize,
    rng: &mut R,
) -> Result<Vec<T>, RosterError> {
    if count > pool.len() {
        return Err(RosterError::NotEnoughCharacters {
            requested: count,
            available: pool.len(),
        });
    }

    let mut remaining = pool.to_vec();
    let mut chosen = Vec::with_capacity(count);
    for _ in 0..count {
        let pick = rng.random_range(0..remaining.len());
        chosen.push(remaining.remove(pick));
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_choose_all_is_permutation() {
        let pool = vec!["a", "b", "c", "d"];
        let mut rng = Pcg32::seed_from_u64(7);
        let mut chosen = choose_chars(&pool, 4, &mut rng).unwrap();
        chosen.sort();
        assert_eq!(chosen, pool);
    }

    #[test]
    fn test_choose_zero() {
        let mut rng = Pcg32::seed_from_u64(7);
        let chosen = choose_chars::<u8, _>(&[], 0, &mut rng).unwrap();
        assert!(chosen.is_empty());
    }

    #[test]
    fn test_too_many_fails() {
        let mut rng = Pcg32::seed_from_u64(7);
        let err = choose_chars(&[1, 2, 3], 4, &mut rng).unwrap_err();
        assert_eq!(
            err,
            RosterError::NotEnoughCharacters {
                requested: 4,
                available: 3
            }
        );
    }

    proptest! {
        #[test]
        fn prop_distinct_members_of_pool(seed in any::<u64>(), len in 0usize..20, frac in 0.0f64..=1.0) {
            let pool: Vec<usize> = (0..len).collect();
            let count = (len as f64 * frac).floor() as usize;
            let mut rng = Pcg32::seed_from_u64(seed);
            let chosen = choose_chars(&pool, count, &mut rng).unwrap();
            prop_assert_eq!(chosen.len(), count);
            let mut dedup = chosen.clone();
            dedup.sort();
            dedup.dedup();
            prop_assert_eq!(dedup.len(), count);
            prop_assert!(chosen.iter().all(|c| pool.contains(c)));
        }
    }
}
