use crate::random::IndexSource;

/// Uniformly random permutation of `items`, returned as a new vector.
///
/// Fisher-Yates over a copy: walk `i` from the last index down to 1, pick
/// `j` uniformly in `[0, i]` and swap. The input slice is left untouched.
pub fn shuffle<T, R>(items: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: IndexSource + ?Sized,
{
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.index_below(i + 1);
        shuffled.swap(i, j);
    }
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, ScriptedSource};

    #[test]
    fn test_shuffle_empty() {
        let mut rng = RngSource::seeded(1);
        let out: Vec<u32> = shuffle(&[], &mut rng);
        assert!(out.is_empty());
    }

    #[test]
    fn test_shuffle_single_element() {
        let mut rng = RngSource::seeded(1);
        assert_eq!(shuffle(&[42], &mut rng), vec![42]);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = RngSource::seeded(99);
        let input: Vec<u32> = (0..100).collect();

        for _ in 0..20 {
            let mut out = shuffle(&input, &mut rng);
            assert_eq!(out.len(), input.len());
            out.sort();
            assert_eq!(out, input);
        }
    }

    #[test]
    fn test_shuffle_keeps_duplicates() {
        let mut rng = RngSource::seeded(3);
        let input = vec!["a", "b", "a", "c", "a"];

        let mut out = shuffle(&input, &mut rng);
        out.sort();
        assert_eq!(out, vec!["a", "a", "a", "b", "c"]);
    }

    #[test]
    fn test_shuffle_leaves_input_untouched() {
        let mut rng = RngSource::seeded(5);
        let input = vec![1, 2, 3, 4, 5];
        let _ = shuffle(&input, &mut rng);
        assert_eq!(input, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_shuffle_follows_index_source() {
        // j = 0 at every step rotates the head to the back:
        // [1,2,3,4] -> swap(3,0) [4,2,3,1] -> swap(2,0) [3,2,4,1] -> swap(1,0) [2,3,4,1]
        let mut rng = ScriptedSource::always_first();
        assert_eq!(shuffle(&[1, 2, 3, 4], &mut rng), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_shuffle_identity_when_j_equals_i() {
        // j == i at every step swaps each element with itself
        let mut rng = ScriptedSource::new(vec![3, 2, 1]);
        assert_eq!(shuffle(&[1, 2, 3, 4], &mut rng), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_every_position_reachable() {
        // Element 0 should land in each slot at least once over many runs
        let mut rng = RngSource::seeded(2024);
        let input: Vec<usize> = (0..5).collect();
        let mut seen = [false; 5];

        for _ in 0..500 {
            let out = shuffle(&input, &mut rng);
            let pos = out.iter().position(|&x| x == 0).unwrap();
            seen[pos] = true;
        }

        assert!(seen.iter().all(|&s| s));
    }
}
