//! Even, contiguous split of a global index space across ranks.
//!
//! `LinearMap` assigns `num_global` rows to `num_ranks` ranks the way a
//! uniform contiguous map does: with `q = N / P` and `r = N % P`, rank `k`
//! owns `q + 1` rows if `k < r` and `q` rows otherwise, starting at
//! `k * q + min(k, r)`. Ranges are disjoint, ordered by rank and together
//! cover `[0, N)`. Ranks beyond `N` own an empty range.

use std::fmt;
use std::ops::Range;

use crate::algs::communicator::Communicator;
use crate::stage_error::StageError;

/// Half-open range `[start, end)` of global rows owned by one rank.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OwnedRange {
    pub start: usize,
    pub end: usize,
}

impl OwnedRange {
    /// `end < start` is normalized to an empty range at `start`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Lowest owned global index, inclusive.
    pub fn low(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.start)
    }

    /// Highest owned global index, inclusive.
    pub fn high(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    #[inline]
    pub fn contains(&self, global: usize) -> bool {
        (self.start..self.end).contains(&global)
    }

    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for OwnedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.low(), self.high()) {
            (Some(lo), Some(hi)) => write!(f, "[{lo}, {hi}]"),
            _ => write!(f, "[]"),
        }
    }
}

/// Contiguous uniform map of `num_global` rows over `num_ranks` ranks, seen
/// from `rank`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinearMap {
    num_global: usize,
    num_ranks: usize,
    rank: usize,
}

impl LinearMap {
    /// Build the map for the calling rank of `comm`.
    pub fn new<C: Communicator>(num_global: usize, comm: &C) -> Result<Self, StageError> {
        Self::for_rank(num_global, comm.size(), comm.rank())
    }

    /// Build the map for an explicit `rank` of `num_ranks`.
    pub fn for_rank(num_global: usize, num_ranks: usize, rank: usize) -> Result<Self, StageError> {
        if num_ranks == 0 {
            return Err(StageError::EmptyGroup);
        }
        if rank >= num_ranks {
            return Err(StageError::InvalidRank {
                rank,
                size: num_ranks,
            });
        }
        Ok(Self {
            num_global,
            num_ranks,
            rank,
        })
    }

    #[inline]
    pub fn num_global(&self) -> usize {
        self.num_global
    }

    #[inline]
    pub fn num_ranks(&self) -> usize {
        self.num_ranks
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Range owned by `rank`; empty for ranks outside the group.
    pub fn range_of(&self, rank: usize) -> OwnedRange {
        if rank >= self.num_ranks {
            return OwnedRange::new(self.num_global, self.num_global);
        }
        let q = self.num_global / self.num_ranks;
        let r = self.num_global % self.num_ranks;
        let start = rank * q + rank.min(r);
        let len = q + usize::from(rank < r);
        OwnedRange::new(start, start + len)
    }

    /// Range owned by this map's rank.
    pub fn my_range(&self) -> OwnedRange {
        self.range_of(self.rank)
    }

    /// Every rank's range, in rank order.
    pub fn ranges(&self) -> impl Iterator<Item = OwnedRange> + '_ {
        (0..self.num_ranks).map(|k| self.range_of(k))
    }

    pub fn num_local(&self) -> usize {
        self.my_range().len()
    }

    pub fn min_global(&self) -> Option<usize> {
        self.my_range().low()
    }

    pub fn max_global(&self) -> Option<usize> {
        self.my_range().high()
    }

    pub fn is_owned(&self, global: usize) -> bool {
        self.my_range().contains(global)
    }

    /// Rank that owns `global`, or `None` past the end of the index space.
    pub fn owner_of(&self, global: usize) -> Option<usize> {
        if global >= self.num_global {
            return None;
        }
        let q = self.num_global / self.num_ranks;
        let r = self.num_global % self.num_ranks;
        // The first `r` ranks hold `q + 1` rows each.
        let big = r * (q + 1);
        if global < big {
            Some(global / (q + 1))
        } else {
            Some(r + (global - big) / q)
        }
    }

    pub fn global_to_local(&self, global: usize) -> Option<usize> {
        let range = self.my_range();
        range.contains(global).then(|| global - range.start)
    }

    pub fn local_to_global(&self, local: usize) -> Option<usize> {
        let range = self.my_range();
        (local < range.len()).then(|| range.start + local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::communicator::NoComm;

    #[test]
    fn single_rank_owns_everything() {
        let map = LinearMap::new(10, &NoComm).unwrap();
        assert_eq!(map.my_range(), OwnedRange::new(0, 10));
        assert_eq!(map.min_global(), Some(0));
        assert_eq!(map.max_global(), Some(9));
        assert_eq!(map.num_local(), 10);
    }

    #[test]
    fn remainder_goes_to_low_ranks() {
        let map = LinearMap::for_rank(10, 3, 0).unwrap();
        let ranges: Vec<_> = map.ranges().collect();
        assert_eq!(
            ranges,
            vec![
                OwnedRange::new(0, 4),
                OwnedRange::new(4, 7),
                OwnedRange::new(7, 10)
            ]
        );
    }

    #[test]
    fn more_ranks_than_rows_leaves_empty_ranges() {
        let map = LinearMap::for_rank(10, 12, 11).unwrap();
        assert!(map.my_range().is_empty());
        assert_eq!(map.min_global(), None);
        assert_eq!(map.max_global(), None);
        assert_eq!(map.range_of(9), OwnedRange::new(9, 10));
        assert_eq!(map.range_of(10).len(), 0);
    }

    #[test]
    fn owner_matches_ranges() {
        for ranks in 1..=13 {
            let map = LinearMap::for_rank(10, ranks, 0).unwrap();
            for g in 0..10 {
                let owner = map.owner_of(g).unwrap();
                assert!(map.range_of(owner).contains(g), "ranks={ranks} g={g}");
            }
            assert_eq!(map.owner_of(10), None);
        }
    }

    #[test]
    fn local_global_conversions() {
        let map = LinearMap::for_rank(10, 3, 1).unwrap();
        assert_eq!(map.global_to_local(4), Some(0));
        assert_eq!(map.global_to_local(6), Some(2));
        assert_eq!(map.global_to_local(7), None);
        assert_eq!(map.local_to_global(2), Some(6));
        assert_eq!(map.local_to_global(3), None);
        assert!(map.is_owned(5));
        assert!(!map.is_owned(3));
    }

    #[test]
    fn rejects_empty_group_and_bad_rank() {
        assert_eq!(LinearMap::for_rank(10, 0, 0), Err(StageError::EmptyGroup));
        assert!(LinearMap::for_rank(10, 2, 2).is_err());
    }

    #[test]
    fn range_display() {
        assert_eq!(OwnedRange::new(4, 7).to_string(), "[4, 6]");
        assert_eq!(OwnedRange::new(5, 5).to_string(), "[]");
    }
}
