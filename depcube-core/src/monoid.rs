//! Monoid structure of aggregation state
//!
//! Aggregating a record stream is a fold whose state forms a monoid: the
//! empty state is the identity and combining two states is associative. That
//! is what lets records be split into contiguous shards, aggregated
//! independently and combined afterwards.

use smallvec::SmallVec;

/// An associative combine with an identity element
///
/// Implementations must satisfy `a.combine(identity()) == a`,
/// `identity().combine(a) == a` and
/// `a.combine(b).combine(c) == a.combine(b.combine(c))`. Combination need not
/// be commutative: `a.combine(b)` places `a` before `b`.
pub trait Monoid: Sized + Send {
    /// Returns the identity element
    fn identity() -> Self;

    /// Combines two elements, `self` first
    fn combine(self, other: Self) -> Self;
}

/// Extension trait for reducing collections of monoid elements
pub trait MonoidReduce: Monoid {
    /// Reduces elements in order to a single result
    ///
    /// Uses pairwise tree reduction so that combining many shard states keeps
    /// the depth logarithmic. Order is preserved.
    fn reduce<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut items: SmallVec<[Self; 16]> = iter.into_iter().collect();

        if items.is_empty() {
            return Self::identity();
        }

        while items.len() > 1 {
            let mut next_level = SmallVec::<[Self; 16]>::new();
            let mut level = items.into_iter();

            while let Some(left) = level.next() {
                match level.next() {
                    Some(right) => next_level.push(left.combine(right)),
                    None => next_level.push(left),
                }
            }

            items = next_level;
        }

        items.into_iter().next().unwrap_or_else(Self::identity)
    }
}

impl<T: Monoid> MonoidReduce for T {}
