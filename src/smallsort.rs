//! Leaf sorting and the shell sort used on the retired merge buffer.

use crate::control::SequenceDivider;
use crate::view::View;

/// Stable odd-even sort of `LEN` elements starting at `data`. `LEN` passes of
/// alternating-parity compare-and-swaps; meant for `LEN` in `4..=8`, where
/// the fully unrolled networks pay off.
pub(crate) fn odd_even_sort<V: View, const LEN: usize>(view: &mut V, data: usize) {
    for pass in 0..LEN {
        let mut j = pass % 2;
        while j + 1 < LEN {
            if view.less(data + j + 1, data + j) {
                view.swap(data + j, data + j + 1);
            }
            j += 2;
        }
    }
}

/// Sorts every leaf run produced by `seq_div`.
///
/// Requires `5 <= seq_len <= 8`, or `seq_len == 4` when the divider never
/// shortens a run. One dispatch loop walks the five specializations so each
/// network is instantiated exactly once.
pub(crate) fn sort_leaves<V: View>(
    view: &mut V,
    mut data: usize,
    seq_len: usize,
    mut seq_div: SequenceDivider<true>,
) {
    let mut len = seq_len - seq_div.next() as usize;
    loop {
        debug_assert!((4..=8).contains(&len));
        match len {
            4 => odd_even_sort::<V, 4>(view, data),
            5 => odd_even_sort::<V, 5>(view, data),
            6 => odd_even_sort::<V, 6>(view, data),
            7 => odd_even_sort::<V, 7>(view, data),
            _ => odd_even_sort::<V, 8>(view, data),
        }
        data += len;
        if seq_div.is_end() {
            return;
        }
        len = seq_len - seq_div.next() as usize;
    }
}

/// Stable sort of up to 8 elements: hand-unrolled for lengths <= 3, the leaf
/// networks otherwise.
pub(crate) fn sort_small<V: View>(view: &mut V, data: usize, len: usize) {
    if len <= 1 {
        return;
    }
    if len <= 3 {
        if view.less(data + 1, data) {
            view.swap(data, data + 1);
        }
        if len == 2 {
            return;
        }
        if view.less(data + 2, data + 1) {
            view.swap(data + 1, data + 2);
        }
        if view.less(data + 1, data) {
            view.swap(data, data + 1);
        }
        return;
    }
    sort_leaves(view, data, len, SequenceDivider::new(len, 0));
}

const CIURA_GAPS: [usize; 9] = [1, 4, 10, 23, 57, 132, 301, 701, 1577];

/// Ciura's gap sequence, extended past the table by `gap -> 2*gap + gap/4`
/// (i.e. `floor(2.25 * gap)`).
pub(crate) fn nth_shell_gap(n: usize) -> usize {
    if n < CIURA_GAPS.len() {
        return CIURA_GAPS[n];
    }
    let mut gap = CIURA_GAPS[CIURA_GAPS.len() - 1];
    for _ in CIURA_GAPS.len()..=n {
        gap = 2 * gap + gap / 4;
    }
    gap
}

/// Returns `(gap, n)` for the largest gap strictly below `len`.
/// Requires `len >= 2`.
pub(crate) fn first_shell_gap(len: usize) -> (usize, usize) {
    let mut n = 0;
    let mut gap = CIURA_GAPS[0];
    loop {
        let next = nth_shell_gap(n + 1);
        if next >= len {
            return (gap, n);
        }
        n += 1;
        gap = next;
    }
}

/// Shell sort of `len` elements at `data`, by gapped insertion descending
/// through the gap sequence. Used to re-sort the retired merge buffer; its
/// keys are pairwise distinct, so the gapped swaps cannot disturb stability.
pub(crate) fn shell_sort<V: View>(view: &mut V, data: usize, len: usize) {
    let (_, mut n) = first_shell_gap(len);
    loop {
        let gap = nth_shell_gap(n);
        let mut i = data + gap;
        while i < data + len {
            let mut j = i;
            while j >= data + gap && view.less(j, j - gap) {
                view.swap(j, j - gap);
                j -= gap;
            }
            i += 1;
        }
        if n == 0 {
            return;
        }
        n -= 1;
    }
}
