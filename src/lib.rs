//! imsort: a stable, fully in-place block merge sort.
//!
//! The slice is sorted with O(1) auxiliary memory (no scratch allocation,
//! not even a recursion stack) in O(n log n) worst case, while preserving
//! the order of equal elements. Elements are only ever *swapped*; they are
//! never copied, moved out, or default-constructed, so the comparator can
//! observe every element in place at all times.
//!
//! The algorithm is a bottom-up block merge sort in the grailsort/wikisort
//! family: a prefix of pairwise-distinct elements is collected and serves as
//! two in-array scratch regions: an *imitation buffer* recording block
//! permutations and an *internal buffer* acting as a sliding merge window.
//! Merge levels alternate direction so the buffer never needs repositioning,
//! and once runs outgrow the buffer the merge falls back to a rotation-based
//! in-place strategy guided by the imitation keys.

use core::cmp::Ordering;
use core::mem;

mod blocks;
mod control;
mod merge;
mod smallsort;
mod util;
mod view;

use control::{collect_keys, determine_blocking, merge_one_level, MergeSortControl, SequenceDivider};
use merge::merge_without_buf;
use smallsort::{shell_sort, sort_leaves, sort_small};
use util::over_approx_sqrt;
use view::Forward;

/// Sorts the slice, preserving the order of equal elements.
///
/// This sort is stable, in-place (it does not allocate), and
/// *O*(*n* \* log(*n*)) worst-case. Elements are rearranged exclusively by
/// swaps.
///
/// # Examples
///
/// ```
/// let mut v = [-5, 4, 1, -3, 2];
///
/// imsort::sort(&mut v);
/// assert_eq!(v, [-5, -3, 1, 2, 4]);
/// ```
#[inline(always)]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    stable_sort(v, |a, b| a.lt(b));
}

/// Sorts the slice with a comparator function, preserving the order of
/// elements the comparator reports as equal.
///
/// The comparator must define a strict weak ordering; equality is inferred
/// from two comparisons, it is never asked for directly. If the ordering is
/// violated the result is an unspecified permutation of the input.
///
/// # Examples
///
/// ```
/// let mut v = [5, 4, 1, 3, 2];
/// imsort::sort_by(&mut v, |a, b| a.cmp(b));
/// assert_eq!(v, [1, 2, 3, 4, 5]);
///
/// // reverse sorting
/// imsort::sort_by(&mut v, |a, b| b.cmp(a));
/// assert_eq!(v, [5, 4, 3, 2, 1]);
/// ```
#[inline(always)]
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    stable_sort(v, |a, b| compare(a, b) == Ordering::Less);
}

/// Sorts the slice by the keys a projection extracts, preserving the order
/// of elements with equal keys.
///
/// The key function is called on both operands of every comparison; it is
/// not cached, which is what keeps the sort allocation-free.
///
/// # Examples
///
/// ```
/// let mut v = [-5i32, 4, 1, -3, 2];
///
/// imsort::sort_by_key(&mut v, |k| k.abs());
/// assert_eq!(v, [1, 2, -3, 4, -5]);
/// ```
#[inline(always)]
pub fn sort_by_key<T, K, F>(v: &mut [T], mut key: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    stable_sort(v, |a, b| key(a).lt(&key(b)));
}

// --- IMPL ---

fn stable_sort<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    // Sorting has no meaningful behavior on zero-sized types.
    if mem::size_of::<T>() == 0 {
        return;
    }

    let n = v.len();
    if n <= 8 {
        let mut view = Forward {
            v,
            is_less: &mut is_less,
        };
        sort_small(&mut view, 0, n);
        return;
    }

    let mut imit = 0usize;
    let mut num_keys = 0usize;
    let mut len = n;
    if n > 16 {
        // `over_approx_sqrt(n) < 1.25 * sqrt(n)` for n > 16, which leaves the
        // payload longer than 8 even when every desired key is found.
        let num_desired_keys = 2 * over_approx_sqrt(n) - 2;
        let mut view = Forward {
            v: &mut *v,
            is_less: &mut is_less,
        };
        num_keys = collect_keys(&mut view, 0, n, num_desired_keys);
        if num_keys < 8 {
            // Too few distinct values to host the buffers. The collected
            // prefix stays sorted and rejoins the payload in the final
            // residual merge.
            imit += num_keys;
            len -= num_keys;
            num_keys = 0;
        }
    }

    let data_len = len - num_keys;
    let mut ctrl = MergeSortControl::new(num_keys, data_len);
    let data = imit + num_keys;

    {
        let mut view = Forward {
            v: &mut *v,
            is_less: &mut is_less,
        };
        sort_leaves(
            &mut view,
            data,
            ctrl.seq_len,
            SequenceDivider::new(ctrl.data_len, ctrl.log2_num_seqs),
        );
    }

    loop {
        let p = determine_blocking(&ctrl);

        if ctrl.buf_len == 0 {
            merge_one_level::<_, _, false, true>(
                v,
                &mut is_less,
                imit,
                imit + ctrl.imit_len,
                data,
                ctrl.seq_len,
                SequenceDivider::new(ctrl.data_len, ctrl.log2_num_seqs),
                p,
            );
        } else if ctrl.forward {
            merge_one_level::<_, _, true, true>(
                v,
                &mut is_less,
                imit,
                imit + ctrl.imit_len,
                data,
                ctrl.seq_len,
                SequenceDivider::new(ctrl.data_len, ctrl.log2_num_seqs),
                p,
            );
        } else {
            merge_one_level::<_, _, true, false>(
                v,
                &mut is_less,
                imit,
                n,
                n - ctrl.buf_len,
                ctrl.seq_len,
                SequenceDivider::new(ctrl.data_len, ctrl.log2_num_seqs),
                p,
            );
        }

        let old_buf_len = ctrl.next();
        if old_buf_len != 0 {
            // The buffer was just retired. Its keys go back in front of the
            // payload, get re-sorted, and extend the imitation from now on.
            let buf = data - old_buf_len;
            if !ctrl.forward {
                let mut back_buf = n;
                let mut back_data = n - old_buf_len;
                while back_data != buf {
                    back_data -= 1;
                    back_buf -= 1;
                    v.swap(back_data, back_buf);
                }
                ctrl.forward = true;
            }
            let mut view = Forward {
                v: &mut *v,
                is_less: &mut is_less,
            };
            shell_sort(&mut view, buf, old_buf_len);
        }

        if ctrl.log2_num_seqs == 0 {
            break;
        }
    }

    if data != 0 {
        // Fold the sorted key prefix back into the payload.
        let mut view = Forward {
            v,
            is_less: &mut is_less,
        };
        merge_without_buf::<_, false>(&mut view, 0, data, n);
    }
}
