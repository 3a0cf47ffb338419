//! Quantum number labels and axis directions.
//!
//! Every logical position along a tensor axis carries an integer label (a
//! conserved quantum number). Together with a per-axis sign convention,
//! these labels determine which dense blocks of a block-sparse tensor can
//! be nonzero: a block survives only if its direction-weighted label sum
//! vanishes.

use std::collections::BTreeMap;

/// Integer quantum number attached to a logical axis position.
pub type QNum = i32;

/// Sign convention for an axis's contribution to the conservation sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    /// The axis's labels enter the conservation sum with sign -1.
    In,
    /// The axis's labels enter the conservation sum with sign +1.
    Out,
}

impl AxisDirection {
    /// Signed unit (+1 or -1) for the conservation sum.
    #[inline]
    pub fn sign(self) -> QNum {
        match self {
            AxisDirection::In => -1,
            AxisDirection::Out => 1,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            AxisDirection::In => AxisDirection::Out,
            AxisDirection::Out => AxisDirection::In,
        }
    }
}

/// Partition an axis's logical labels into distinct values with
/// multiplicities.
///
/// Returns the distinct labels sorted ascending, and the multiplicity of
/// each. The result depends only on the multiset of labels, not their
/// order, so two axes with the same labels in different orders partition
/// identically.
///
/// # Example
///
/// ```
/// use qntensors::partition_axis;
///
/// let (qnums, counts) = partition_axis(&[1, -1, 0, 1, 1]);
/// assert_eq!(qnums, vec![-1, 0, 1]);
/// assert_eq!(counts, vec![1, 1, 3]);
/// ```
pub fn partition_axis(qnums: &[QNum]) -> (Vec<QNum>, Vec<usize>) {
    let mut counts: BTreeMap<QNum, usize> = BTreeMap::new();
    for &q in qnums {
        *counts.entry(q).or_insert(0) += 1;
    }
    let values = counts.keys().copied().collect();
    let multiplicities = counts.values().copied().collect();
    (values, multiplicities)
}

/// Ordered logical positions along an axis carrying a given label.
///
/// This is the fan-out map between block-local coordinates and logical
/// coordinates: the j-th position in the returned list is where the j-th
/// block-local entry of the label's block lives in the dense view.
///
/// # Example
///
/// ```
/// use qntensors::positions_with_qnum;
///
/// assert_eq!(positions_with_qnum(&[1, -1, 0, 1, 1], 1), vec![0, 3, 4]);
/// assert_eq!(positions_with_qnum(&[1, -1, 0, 1, 1], 2), Vec::<usize>::new());
/// ```
pub fn positions_with_qnum(qnums: &[QNum], q: QNum) -> Vec<usize> {
    qnums
        .iter()
        .enumerate()
        .filter_map(|(j, &qj)| (qj == q).then_some(j))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_direction_sign() {
        assert_eq!(AxisDirection::In.sign(), -1);
        assert_eq!(AxisDirection::Out.sign(), 1);
    }

    #[test]
    fn test_axis_direction_reverse() {
        assert_eq!(AxisDirection::In.reverse(), AxisDirection::Out);
        assert_eq!(AxisDirection::Out.reverse(), AxisDirection::In);
    }

    #[test]
    fn test_partition_axis_sorted_unique() {
        let (qnums, counts) = partition_axis(&[2, 0, -3, 2, 0, 2]);
        assert_eq!(qnums, vec![-3, 0, 2]);
        assert_eq!(counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_partition_axis_order_independent() {
        let a = partition_axis(&[1, -1, 0, 1, 1]);
        let b = partition_axis(&[1, 1, 1, 0, -1]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_partition_axis_single_value() {
        let (qnums, counts) = partition_axis(&[5, 5, 5]);
        assert_eq!(qnums, vec![5]);
        assert_eq!(counts, vec![3]);
    }

    #[test]
    fn test_partition_counts_cover_extent() {
        let labels = [3, -2, 3, 0, -2, -2, 7];
        let (_, counts) = partition_axis(&labels);
        assert_eq!(counts.iter().sum::<usize>(), labels.len());
    }

    #[test]
    fn test_positions_with_qnum() {
        let labels = [0, 1, 0, -1, 1];
        assert_eq!(positions_with_qnum(&labels, 0), vec![0, 2]);
        assert_eq!(positions_with_qnum(&labels, 1), vec![1, 4]);
        assert_eq!(positions_with_qnum(&labels, -1), vec![3]);
        assert!(positions_with_qnum(&labels, 9).is_empty());
    }

    #[test]
    fn test_positions_consistent_with_partition() {
        let labels = [1, -1, 0, 1, 1, -1];
        let (qnums, counts) = partition_axis(&labels);
        for (q, count) in qnums.iter().zip(counts.iter()) {
            assert_eq!(positions_with_qnum(&labels, *q).len(), *count);
        }
    }
}
