//! Position views over the slice being sorted.
//!
//! Every algorithm in this crate works on logical positions through a view
//! instead of touching the slice directly. The forward view is a transparent
//! wrapper; the backward view mirrors positions around the end of the slice
//! and swaps the comparator operands. That way a backward merge level runs
//! the exact same merge code as a forward one, and both orientations
//! monomorphize to straight-line slice accesses.

/// Random access to the slice being sorted, restricted to the operations the
/// sort is allowed to perform: compare two positions and swap two positions.
///
/// `less_eq(a, b)` must equal `!less(b, a)`; equivalence of keys is only ever
/// inferred that way, the user ordering is never asked about equality.
pub(crate) trait View {
    fn less(&mut self, a: usize, b: usize) -> bool;
    fn less_eq(&mut self, a: usize, b: usize) -> bool;
    fn swap(&mut self, a: usize, b: usize);
}

pub(crate) struct Forward<'a, T, F> {
    pub v: &'a mut [T],
    pub is_less: &'a mut F,
}

impl<T, F: FnMut(&T, &T) -> bool> View for Forward<'_, T, F> {
    #[inline]
    fn less(&mut self, a: usize, b: usize) -> bool {
        (self.is_less)(&self.v[a], &self.v[b])
    }

    #[inline]
    fn less_eq(&mut self, a: usize, b: usize) -> bool {
        !(self.is_less)(&self.v[b], &self.v[a])
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.v.swap(a, b);
    }
}

/// Logical position `i` addresses the physical element `len - 1 - i`, and the
/// ordering is operand-swapped, so the slice reads as reversed-and-reversed:
/// code that merges "ascending, left to right" through this view merges the
/// underlying slice ascending, right to left.
pub(crate) struct Backward<'a, T, F> {
    pub v: &'a mut [T],
    pub is_less: &'a mut F,
}

impl<T, F> Backward<'_, T, F> {
    #[inline]
    fn mirror(&self, i: usize) -> usize {
        self.v.len() - 1 - i
    }
}

impl<T, F: FnMut(&T, &T) -> bool> View for Backward<'_, T, F> {
    #[inline]
    fn less(&mut self, a: usize, b: usize) -> bool {
        let (pa, pb) = (self.mirror(a), self.mirror(b));
        (self.is_less)(&self.v[pb], &self.v[pa])
    }

    #[inline]
    fn less_eq(&mut self, a: usize, b: usize) -> bool {
        let (pa, pb) = (self.mirror(a), self.mirror(b));
        !(self.is_less)(&self.v[pa], &self.v[pb])
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        let (pa, pb) = (self.mirror(a), self.mirror(b));
        self.v.swap(pa, pb);
    }
}
