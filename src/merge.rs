//! The two basic merge routines: buffered merge into a sliding scratch
//! window, and buffer-less merge by binary search + rotation.

use crate::util::{binary_search, rotate};
use crate::view::View;

pub(crate) struct MergeResult {
    /// Whether `rest` holds elements from `ys` (the `xs` side ran out first).
    pub xs_consumed: bool,
    /// Start of the input that was not fully merged.
    pub rest: usize,
}

/// Tie policy of a merge step: `xs` is emitted first iff it compares strictly
/// less when it originates from the right run, non-strictly otherwise. This
/// is what keeps the overall sort stable once blocks have been permuted.
#[inline]
fn xs_wins<V: View, const XS_FROM_RIGHT: bool>(view: &mut V, a: usize, b: usize) -> bool {
    if XS_FROM_RIGHT {
        view.less(a, b)
    } else {
        view.less_eq(a, b)
    }
}

/// Merges the adjacent sorted runs `[xs, ys)` and `[ys, ys_last)` into the
/// buffer that starts at `*buf` and ends at `xs`. The buffer slides forward
/// as output is emitted; on return `*buf` has advanced by the number of
/// merged elements and `[*buf, rest)` holds the pre-merge buffer contents in
/// some order, with `rest - *buf` equal to the original buffer length.
///
/// Requires `*buf < xs < ys < ys_last` and `ys_last - ys <= xs - *buf`
/// (the right run must fit in the buffer; overrun is not checked).
pub(crate) fn merge_with_buf<V: View, const XS_FROM_RIGHT: bool>(
    view: &mut V,
    buf: &mut usize,
    mut xs: usize,
    mut ys: usize,
    ys_last: usize,
) -> MergeResult {
    let mut xs_last = ys;
    let mut b = *buf;

    // Cross merge: when one side can emit two elements at once, do so with a
    // single comparison. See https://github.com/scandum/quadsort#cross-merge
    while xs + 1 < xs_last && ys + 1 < ys_last {
        if xs_wins::<V, XS_FROM_RIGHT>(view, xs + 1, ys) {
            view.swap(b, xs);
            view.swap(b + 1, xs + 1);
            b += 2;
            xs += 2;
        } else if !xs_wins::<V, XS_FROM_RIGHT>(view, xs, ys + 1) {
            view.swap(b, ys);
            view.swap(b + 1, ys + 1);
            b += 2;
            ys += 2;
        } else {
            if xs_wins::<V, XS_FROM_RIGHT>(view, xs, ys) {
                view.swap(b, xs);
                view.swap(b + 1, ys);
            } else {
                view.swap(b, ys);
                view.swap(b + 1, xs);
            }
            b += 2;
            xs += 1;
            ys += 1;
        }
    }

    let mut xs_consumed = xs == xs_last;

    if xs + 1 == xs_last {
        // One element left in xs; emit from ys until it slots in.
        xs_consumed = false;
        loop {
            if xs_wins::<V, XS_FROM_RIGHT>(view, xs, ys) {
                view.swap(b, xs);
                b += 1;
                xs += 1;
                xs_consumed = true;
                break;
            }
            view.swap(b, ys);
            b += 1;
            ys += 1;
            if ys >= ys_last {
                break;
            }
        }
    } else if ys + 1 == ys_last {
        xs_consumed = true;
        loop {
            if !xs_wins::<V, XS_FROM_RIGHT>(view, xs, ys) {
                view.swap(b, ys);
                b += 1;
                ys += 1;
                xs_consumed = false;
                break;
            }
            view.swap(b, xs);
            b += 1;
            xs += 1;
            if xs >= xs_last {
                break;
            }
        }
    }

    if xs_consumed {
        // [ merged | buffer | buffer | right ]
        //         b        xs       ys     ys_last
        *buf = b;
        return MergeResult {
            xs_consumed: true,
            rest: ys,
        };
    }

    // [ merged | buffer | left | buffer ]  ->  [ merged | buffer | buffer | left ]
    // by swapping the unconsumed tail of xs with the trailing buffer cells.
    while xs_last != xs {
        ys -= 1;
        xs_last -= 1;
        view.swap(ys, xs_last);
    }
    *buf = b;
    MergeResult {
        xs_consumed: false,
        rest: ys,
    }
}

/// Merges the adjacent sorted runs `[xs, ys)` and `[ys, ys_last)` in place.
///
/// Repeatedly locates the prefix of `xs` that already sits correctly, the
/// insertion span of `ys`, and rotates the two into order. Runs in
/// `O((m + log n) * min(m, n, j, k) + n)` where `m`, `n` are the run lengths
/// and `j`, `k` their distinct-key counts; callers keep `m <= n` where the
/// linear-amortized bound matters.
pub(crate) fn merge_without_buf<V: View, const XS_FROM_RIGHT: bool>(
    view: &mut V,
    mut xs: usize,
    mut ys: usize,
    ys_last: usize,
) -> MergeResult {
    loop {
        // Seek xs so that xs[0] must come after ys[0].
        xs = binary_search::<V, XS_FROM_RIGHT>(view, xs, ys, ys);
        if xs == ys {
            return MergeResult {
                xs_consumed: true,
                rest: ys,
            };
        }
        // The span of ys that precedes the new xs[0].
        let mut ys_upper = ys + 1;
        if ys_upper != ys_last {
            ys_upper = if XS_FROM_RIGHT {
                binary_search::<V, false>(view, ys_upper, ys_last, xs)
            } else {
                binary_search::<V, true>(view, ys_upper, ys_last, xs)
            };
        }
        rotate(view, xs, ys, ys_upper);
        xs += ys_upper - ys;
        ys = ys_upper;
        if ys_upper == ys_last {
            return MergeResult {
                xs_consumed: false,
                rest: xs,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Forward;

    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn lt(a: &i32, b: &i32) -> bool {
        a < b
    }

    // Reference merge on copies: returns (merged, rest, xs_consumed).
    fn naive_merge(xs: &[i32], ys: &[i32]) -> (Vec<i32>, Vec<i32>, bool) {
        let mut merged = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < xs.len() && j < ys.len() {
            if ys[j] < xs[i] {
                merged.push(ys[j]);
                j += 1;
            } else {
                merged.push(xs[i]);
                i += 1;
            }
        }
        let xs_consumed = i == xs.len();
        let mut rest: Vec<i32> = xs[i..].to_vec();
        rest.extend_from_slice(&ys[j..]);
        (merged, rest, xs_consumed)
    }

    #[test]
    fn merge_with_buf_matches_reference() {
        let ary_len = 32usize;
        let buf_len = 8usize;
        let mut rng = XorShiftRng::seed_from_u64(0xb0f);

        for ys_len in 1..=buf_len {
            for xs_len in 1..=(ary_len - buf_len - ys_len) {
                let xs_at = buf_len;
                let ys_at = xs_at + xs_len;
                let ys_last = ys_at + ys_len;

                let mut ary = vec![0i32; ary_len];
                let mut vals: Vec<i32> = (100..100 + (xs_len + ys_len) as i32).collect();
                vals.shuffle(&mut rng);
                ary[xs_at..ys_last].copy_from_slice(&vals);
                for x in &mut ary[ys_last..] {
                    *x = 42;
                }
                ary[xs_at..ys_at].sort_unstable();
                ary[ys_at..ys_last].sort_unstable();

                let (merged, rest, xs_consumed) =
                    naive_merge(&ary[xs_at..ys_at], &ary[ys_at..ys_last]);

                let mut expected = vec![0i32; ary_len];
                expected[..merged.len()].copy_from_slice(&merged);
                let rest_at = ys_last - rest.len();
                expected[rest_at..rest_at + rest.len()].copy_from_slice(&rest);
                for x in &mut expected[ys_last..] {
                    *x = 42;
                }

                let mut is_less = lt;
                let mut view = Forward {
                    v: &mut ary,
                    is_less: &mut is_less,
                };
                let mut buf = 0usize;
                let mr = merge_with_buf::<_, false>(&mut view, &mut buf, xs_at, ys_at, ys_last);
                drop(view);

                assert_eq!(ary, expected, "xs_len={xs_len} ys_len={ys_len}");
                assert_eq!(buf, merged.len(), "xs_len={xs_len} ys_len={ys_len}");
                assert_eq!(mr.rest, rest_at, "xs_len={xs_len} ys_len={ys_len}");
                assert_eq!(mr.rest - buf, buf_len);
                assert_eq!(mr.xs_consumed, xs_consumed);
            }
        }
    }

    #[test]
    fn merge_with_buf_right_tie_policy() {
        // xs plays the right run of the outer merge: on equal keys (compared
        // by tens digit) the ys side must be emitted first. The ones digit
        // tags each element so the emission order is observable.
        let mut ary = vec![0, 0, 0, 101, 201, 102, 202, 302];
        let mut is_less = |a: &i32, b: &i32| a / 10 < b / 10;
        let mut view = Forward {
            v: &mut ary,
            is_less: &mut is_less,
        };
        let mut buf = 0usize;
        let mr = merge_with_buf::<_, true>(&mut view, &mut buf, 3, 5, 8);
        drop(view);

        assert_eq!(&ary[..4], &[102, 101, 202, 201]);
        assert_eq!(ary[7], 302);
        assert!(mr.xs_consumed);
        assert_eq!(buf, 4);
        assert_eq!(mr.rest, 7);
    }

    #[test]
    fn merge_without_buf_matches_reference() {
        let ary_len = 24usize;
        let mut rng = XorShiftRng::seed_from_u64(0x10b);

        for ys_len in 1..ary_len {
            for xs_len in 1..=(ary_len - ys_len) {
                let ys_at = xs_len;
                let ys_last = ys_at + ys_len;

                let mut ary: Vec<i32> = (100..100 + (xs_len + ys_len) as i32).collect();
                ary.shuffle(&mut rng);
                ary.resize(ary_len, 42);
                ary[..ys_at].sort_unstable();
                ary[ys_at..ys_last].sort_unstable();

                let (merged, rest, xs_consumed) = naive_merge(&ary[..ys_at], &ary[ys_at..ys_last]);

                let mut expected = merged.clone();
                expected.extend_from_slice(&rest);
                expected.resize(ary_len, 42);

                let mut is_less = lt;
                let mut view = Forward {
                    v: &mut ary,
                    is_less: &mut is_less,
                };
                let mr = merge_without_buf::<_, false>(&mut view, 0, ys_at, ys_last);
                drop(view);

                assert_eq!(ary, expected, "xs_len={xs_len} ys_len={ys_len}");
                assert_eq!(mr.rest, merged.len(), "xs_len={xs_len} ys_len={ys_len}");
                assert_eq!(mr.xs_consumed, xs_consumed);
            }
        }
    }
}
