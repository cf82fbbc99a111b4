//! Random train / validation / evaluation partitioning.

use crate::dataset::{MultiLabelledDataset, Subset};
use crate::error::{Result, SelectionError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Checks a subset fraction list.
///
/// One fraction selects train/eval mode, two select train/val/eval mode.
/// Every fraction must be finite and in `(0, 1]`, and the sum must not exceed 1.
pub fn validate_fractions(fracs: &[f64]) -> Result<()> {
    if fracs.len() != 1 && fracs.len() != 2 {
        return Err(SelectionError::InvalidFractionCount(fracs.len()));
    }
    if let Some(&bad) = fracs
        .iter()
        .find(|f| !(f.is_finite() && **f > 0.0 && **f <= 1.0))
    {
        return Err(SelectionError::InvalidFraction(bad));
    }
    let sum: f64 = fracs.iter().sum();
    if sum > 1.0 {
        return Err(SelectionError::FractionSumExceeded { sum });
    }
    Ok(())
}

/// Integer subset sizes for a dataset of `n` samples.
///
/// Each fraction yields `floor(n * f)`; the remainder becomes the trailing
/// evaluation subset, so the returned sizes always sum to `n`.
pub fn subset_sizes(n: usize, fracs: &[f64]) -> Result<Vec<usize>> {
    validate_fractions(fracs)?;
    let mut sizes: Vec<usize> = fracs
        .iter()
        .map(|f| (n as f64 * f).floor() as usize)
        .collect();
    let taken: usize = sizes.iter().sum();
    let rest = n
        .checked_sub(taken)
        .ok_or(SelectionError::FractionSumExceeded {
            sum: fracs.iter().sum(),
        })?;
    sizes.push(rest);
    Ok(sizes)
}

/// Splits `dataset` into disjoint random subsets with the given sizes.
///
/// A permutation of `0..len` is drawn from `rng` and cut into consecutive
/// chunks, so the subsets are pairwise disjoint and cover every index.
///
/// # Errors
/// [`SelectionError::Dataset`] if `sizes` does not sum to the dataset length.
pub fn random_split<'a, D, R>(
    dataset: &'a D,
    sizes: &[usize],
    rng: &mut R,
) -> Result<Vec<Subset<'a, D>>>
where
    D: MultiLabelledDataset + ?Sized,
    R: Rng + ?Sized,
{
    let total: usize = sizes.iter().sum();
    if total != dataset.len() {
        return Err(SelectionError::Dataset(format!(
            "sum of input lengths ({}) does not equal the length of the dataset ({})",
            total,
            dataset.len()
        )));
    }

    let mut permutation: Vec<usize> = (0..dataset.len()).collect();
    permutation.shuffle(rng);

    let mut offset = 0;
    Ok(sizes
        .iter()
        .map(|&size| {
            let chunk = permutation[offset..offset + size].to_vec();
            offset += size;
            Subset::new(dataset, chunk)
        })
        .collect())
}

/// The train, optional validation and evaluation subsets of one dataset.
#[derive(Debug)]
pub struct Splits<'a, D: ?Sized> {
    pub train: Subset<'a, D>,
    pub val: Option<Subset<'a, D>>,
    pub eval: Subset<'a, D>,
}

impl<'a, D: MultiLabelledDataset + ?Sized> Splits<'a, D> {
    /// Partitions `dataset` according to `fracs`.
    ///
    /// # Errors
    /// - configuration errors from [`validate_fractions`]
    /// - [`SelectionError::EmptySubset`] when any requested subset rounds to zero samples
    pub fn new<R: Rng + ?Sized>(dataset: &'a D, fracs: &[f64], rng: &mut R) -> Result<Self> {
        let sizes = subset_sizes(dataset.len(), fracs)?;
        let names: &[&'static str] = if sizes.len() == 2 {
            &["train", "evaluation"]
        } else {
            &["train", "validation", "evaluation"]
        };
        for (&size, &name) in sizes.iter().zip(names) {
            if size == 0 {
                return Err(SelectionError::EmptySubset {
                    name,
                    dataset_len: dataset.len(),
                });
            }
        }

        let mut subsets = random_split(dataset, &sizes, rng)?.into_iter();
        let (train, val, eval) = match (subsets.next(), subsets.next(), subsets.next()) {
            (Some(train), Some(eval), None) => (train, None, eval),
            (Some(train), Some(val), Some(eval)) => (train, Some(val), eval),
            _ => return Err(SelectionError::InvalidFractionCount(fracs.len())),
        };
        Ok(Self { train, val, eval })
    }

    /// `(train, validation, evaluation)` sample counts.
    pub fn sizes(&self) -> (usize, Option<usize>, usize) {
        (
            self.train.len(),
            self.val.as_ref().map(|v| v.len()),
            self.eval.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemoryDataset;
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn dataset(n: usize) -> InMemoryDataset {
        let labels = Array2::from_shape_fn((n, 2), |(i, j)| ((i + j) % 2) as f64);
        let features = Array2::from_shape_fn((n, 3), |(i, j)| (i * 3 + j) as f64);
        InMemoryDataset::new(labels, features).unwrap()
    }

    #[test]
    fn test_validate_fraction_count() {
        assert!(matches!(
            validate_fractions(&[]),
            Err(SelectionError::InvalidFractionCount(0))
        ));
        assert!(matches!(
            validate_fractions(&[0.1, 0.1, 0.1]),
            Err(SelectionError::InvalidFractionCount(3))
        ));
        assert!(validate_fractions(&[0.5]).is_ok());
        assert!(validate_fractions(&[0.5, 0.5]).is_ok());
    }

    #[test]
    fn test_validate_fraction_sum() {
        for fracs in [vec![0.7, 0.5], vec![0.9, 0.2], vec![1.0, 0.01]] {
            assert!(matches!(
                validate_fractions(&fracs),
                Err(SelectionError::FractionSumExceeded { .. })
            ));
        }
        assert!(validate_fractions(&[0.7, 0.3]).is_ok());
        assert!(validate_fractions(&[0.6, 0.4]).is_ok());
        assert!(validate_fractions(&[0.8, 0.2]).is_ok());
    }

    #[test]
    fn test_validate_fraction_sum_just_above_one() {
        let err = validate_fractions(&[0.5, 0.5 + 5e-10]).unwrap_err();
        assert!(matches!(err, SelectionError::FractionSumExceeded { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_fraction_range() {
        for bad in [0.0, -0.2, 1.5, f64::NAN] {
            assert!(matches!(
                validate_fractions(&[bad]),
                Err(SelectionError::InvalidFraction(_))
            ));
        }
    }

    #[test]
    fn test_subset_sizes_floor_and_remainder() {
        assert_eq!(subset_sizes(100, &[0.6, 0.2]).unwrap(), vec![60, 20, 20]);
        assert_eq!(subset_sizes(10, &[0.75]).unwrap(), vec![7, 3]);
        assert_eq!(subset_sizes(7, &[0.5, 0.3]).unwrap(), vec![3, 2, 2]);
    }

    #[test]
    fn test_subset_sizes_sum_to_n() {
        for n in [1usize, 3, 17, 100, 1001] {
            for fracs in [vec![0.8], vec![0.6, 0.2], vec![0.33, 0.33], vec![1.0]] {
                let sizes = subset_sizes(n, &fracs).unwrap();
                assert_eq!(sizes.iter().sum::<usize>(), n, "n={} fracs={:?}", n, fracs);
            }
        }
    }

    #[test]
    fn test_random_split_disjoint_and_complete() {
        let ds = dataset(50);
        let mut rng = StdRng::seed_from_u64(3);
        let subsets = random_split(&ds, &[30, 10, 10], &mut rng).unwrap();

        let mut seen = HashSet::new();
        for subset in &subsets {
            for &i in subset.indices() {
                assert!(seen.insert(i), "index {} appears twice", i);
            }
        }
        assert_eq!(seen.len(), 50);
        assert_eq!(
            subsets.iter().map(|s| s.len()).collect::<Vec<_>>(),
            vec![30, 10, 10]
        );
    }

    #[test]
    fn test_random_split_wrong_total() {
        let ds = dataset(10);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_split(&ds, &[5, 4], &mut rng).is_err());
    }

    #[test]
    fn test_random_split_seeded_is_reproducible() {
        let ds = dataset(40);
        let a = random_split(&ds, &[20, 20], &mut StdRng::seed_from_u64(11)).unwrap();
        let b = random_split(&ds, &[20, 20], &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a[0].indices(), b[0].indices());
        assert_eq!(a[1].indices(), b[1].indices());
    }

    #[test]
    fn test_splits_with_validation() {
        let ds = dataset(100);
        let splits = Splits::new(&ds, &[0.6, 0.2], &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(splits.sizes(), (60, Some(20), 20));
    }

    #[test]
    fn test_splits_without_validation() {
        let ds = dataset(100);
        let splits = Splits::new(&ds, &[0.8], &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(splits.sizes(), (80, None, 20));
        assert!(splits.val.is_none());
    }

    #[test]
    fn test_splits_reject_empty_subset() {
        let ds = dataset(4);
        let err = Splits::new(&ds, &[0.6, 0.2], &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::EmptySubset {
                name: "validation",
                ..
            }
        ));

        let err = Splits::new(&ds, &[1.0], &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::EmptySubset {
                name: "evaluation",
                ..
            }
        ));
    }
}
