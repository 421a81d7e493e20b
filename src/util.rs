//! Integer square root over-approximation, in-place rotation and monobound
//! binary search. These are the only primitives the merge machinery is built
//! from; none of them allocates and all element access goes through a view.

use crate::view::View;

/// Computes an over-approximation of `sqrt(x)`.
///
/// Requires `x >= 8`. The result `r` satisfies `sqrt(x) <= r < x / 2`, with
/// `r == 3` for `x == 8`, `r == 4` for `9 <= x <= 16` and
/// `r < 1.25 * sqrt(x)` for `x > 16`.
pub(crate) fn over_approx_sqrt(x: usize) -> usize {
    // Find `n` so that `x = a * 2^(2n)` with `a` in [0.5, 2.0).
    let mut n = 1usize;
    let mut p = x;
    while p >= 8 {
        n += 1;
        p /= 4;
    }

    // Binary estimate `r0 = 2^(n-1) + ceil(x * 2^-(n+1))`, an over-approx of
    // `sqrt(x)` bounded by `(1.5 / sqrt(2)) * sqrt(x) + 1`.
    let r0 = (1usize << (n - 1)) + ((x - 1) >> (n + 1)) + 1;

    // One Heron step, taking the ceiling so the result stays an over-approx.
    (r0 + (x - 1) / r0) / 2 + 1
}

/// Rotates `[first, last)` so that `middle` becomes the new start.
///
/// Uses helix rotation while the span is longer than 64 elements and triple
/// reversal below that, to avoid the modulo on short spans.
pub(crate) fn rotate<V: View>(view: &mut V, mut first: usize, mut middle: usize, mut last: usize) {
    if middle == first || middle == last {
        return;
    }

    let mut l_len = middle - first;
    let mut r_len = last - middle;
    let mut len = l_len + r_len;

    // Helix rotation: swap the shorter side across the longer, which leaves
    // a smaller rotation whose offset is `longer mod shorter`.
    // https://github.com/scandum/rotate#helix-rotation
    while len > 64 {
        if l_len <= r_len {
            let rem = r_len % l_len;
            loop {
                view.swap(first, middle);
                first += 1;
                middle += 1;
                if middle == last {
                    break;
                }
            }
            if rem == 0 {
                return;
            }
            middle = last - rem;
            len = l_len;
            l_len -= rem;
            r_len = rem;
        } else {
            let rem = l_len % r_len;
            loop {
                last -= 1;
                middle -= 1;
                view.swap(last, middle);
                if middle == first {
                    break;
                }
            }
            if rem == 0 {
                return;
            }
            middle = first + rem;
            len = r_len;
            r_len -= rem;
            l_len = rem;
        }
    }

    // Triple reversal for short spans.
    let (mut f, mut m) = (first, middle);
    while f + 1 < m {
        m -= 1;
        view.swap(f, m);
        f += 1;
    }
    let mut l = last;
    while middle + 1 < l {
        l -= 1;
        view.swap(middle, l);
        middle += 1;
    }
    while first + 1 < last {
        last -= 1;
        view.swap(first, last);
        first += 1;
    }
}

/// Monobound binary search over the sorted range `[first, last)`.
///
/// The loop runs a fixed number of times determined by the range length, so
/// the only data-dependent work is a conditional base update.
///
/// With `STRICT = true` returns the first position `p` such that the element
/// before `p` is not less than `key` (end of the strictly-less prefix); with
/// `STRICT = false` the first `p` whose predecessor is greater than `key`
/// (start of the strictly-greater suffix).
pub(crate) fn binary_search<V: View, const STRICT: bool>(
    view: &mut V,
    first: usize,
    last: usize,
    key: usize,
) -> usize {
    let mut base = first;
    let mut len = last - first + 1;

    loop {
        let mid = len / 2;
        if mid == 0 {
            return base;
        }
        let pivot = base + mid;
        let advance = if STRICT {
            view.less(pivot - 1, key)
        } else {
            view.less_eq(pivot - 1, key)
        };
        if advance {
            base = pivot;
        }
        len -= mid;
    }
}
