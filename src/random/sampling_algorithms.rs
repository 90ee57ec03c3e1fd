//! Algorithms for uniform random sampling from containers of known length. These are written to be
//! generic over the container type so they work on id ranges and person iterators alike.

use crate::rand::seq::index::sample as choose_range;
use crate::rand::Rng;

/// Sample a random element uniformly from a container of known length.
///
/// We do not assume the container is randomly indexable, only that it can be iterated over.
pub fn sample_single_from_known_length<I, R, T>(rng: &mut R, mut iter: I) -> Option<T>
where
    R: Rng,
    I: ExactSizeIterator<Item = T>,
{
    let len = iter.len();
    if len == 0 {
        return None;
    }
    // The set need not be randomly indexable, so we have to use the `nth` method.
    let index = rng.random_range(0..len);
    iter.nth(index)
}

/// Sample multiple random elements uniformly without replacement from a container of known length.
/// Selected items are returned in iteration order. If `requested` is at least the container's
/// length, every item is returned and no randomness is consumed.
pub fn sample_multiple_from_known_length<I, R, T>(rng: &mut R, iter: I, requested: usize) -> Vec<T>
where
    R: Rng,
    I: ExactSizeIterator<Item = T>,
{
    let len = iter.len();
    if requested >= len {
        return iter.collect();
    }
    if requested == 0 {
        return Vec::new();
    }

    let mut indexes = choose_range(rng, len, requested).into_vec();
    indexes.sort_unstable();
    let mut index_iterator = indexes.into_iter();
    let mut next_idx = index_iterator.next();
    let mut selected = Vec::with_capacity(requested);

    for (idx, item) in iter.enumerate() {
        if Some(idx) == next_idx {
            selected.push(item);
            next_idx = index_iterator.next();
            if next_idx.is_none() {
                break;
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::HashSet;

    #[test]
    fn single_from_empty_is_none() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert_eq!(sample_single_from_known_length(&mut rng, 0..0), None::<usize>);
    }

    #[test]
    fn single_is_roughly_uniform() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let index = sample_single_from_known_length(&mut rng, 0..4usize).unwrap();
            counts[index] += 1;
        }
        // Each bin expects 1000; 150 is well beyond five standard deviations.
        assert!(counts.iter().all(|&count| count.abs_diff(1000) < 150), "{counts:?}");
    }

    #[test]
    fn multiple_basic() {
        let data: Vec<u32> = (0..1000).collect();
        let requested = 100;
        let mut rng = SmallRng::seed_from_u64(42);
        let sample = sample_multiple_from_known_length(&mut rng, data.iter(), requested);

        assert_eq!(sample.len(), requested);
        assert!(sample.iter().all(|v| **v < 1000));
        let unique: HashSet<_> = sample.iter().collect();
        assert_eq!(unique.len(), sample.len());
    }

    #[test]
    fn multiple_edge_cases() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(sample_multiple_from_known_length(&mut rng, 0..10usize, 0).is_empty());
        assert_eq!(
            sample_multiple_from_known_length(&mut rng, 0..3usize, 3),
            vec![0, 1, 2]
        );
        assert_eq!(
            sample_multiple_from_known_length(&mut rng, 0..3usize, 10),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn multiple_is_deterministic_for_a_seed() {
        let mut first = SmallRng::seed_from_u64(9);
        let mut second = SmallRng::seed_from_u64(9);
        assert_eq!(
            sample_multiple_from_known_length(&mut first, 0..500usize, 37),
            sample_multiple_from_known_length(&mut second, 0..500usize, 37)
        );
    }
}
