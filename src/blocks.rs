//! Block-level machinery of the merge: interleaving the blocks of two runs
//! while mirroring the permutation into the imitation keys, merging the
//! interleaved blocks with origin tracking, and restoring the imitation keys
//! to sorted order afterwards.

use crate::merge::{merge_with_buf, merge_without_buf};
use crate::util::rotate;
use crate::view::View;

#[derive(Copy, Clone)]
pub(crate) struct BlockingParam {
    pub num_blocks: usize,
    pub block_len: usize,
    pub first_block_len: usize,
    pub last_block_len: usize,
}

#[inline]
fn swap_block<V: View>(view: &mut V, mut a: usize, mut b: usize, block_len: usize) {
    if a == b {
        return;
    }
    for _ in 0..block_len {
        view.swap(a, b);
        a += 1;
        b += 1;
    }
}

/// Interleaves the `imit_len` interior blocks of two adjacent sorted runs so
/// that blocks are globally non-decreasing by their first element. Every
/// block move is mirrored as a swap of two imitation keys at `imit`, which is
/// how the permutation can later be undone without extra storage.
///
/// `imit_len` must be an even non-negative count; each run contributes
/// `imit_len / 2` blocks of `block_len` elements starting at `blocks`.
///
/// Returns the position of the key that started as the first right-run key;
/// relative to it, every key records whether its block came from the left or
/// the right run.
pub(crate) fn interleave_blocks<V: View>(
    view: &mut V,
    imit: usize,
    blocks: usize,
    imit_len: usize,
    block_len: usize,
) -> usize {
    if imit_len == 0 {
        return imit;
    }

    // Selection walk similar to wikisort's block movement:
    //   [ interleaved | left_permuted | right ]
    // The least block of `left_permuted` is found by linear scan (the block
    // count is O(sqrt(seq_len)), so the scans stay linear overall), then the
    // front of `right` competes against it. Ties go to the left block.
    let mut left_keys = imit;
    let mut right_keys = imit + imit_len / 2;
    let mut left_blocks = blocks;
    let mut right_blocks = blocks + imit_len / 2 * block_len;

    let mut least_left_key = left_keys;
    let mut least_left_block = left_blocks;
    let mut least_right_key = right_keys;
    let orig_right_key = right_keys;
    let last_right_key = right_keys + imit_len / 2;

    loop {
        if right_keys == last_right_key || !view.less(right_blocks, least_left_block) {
            view.swap(left_keys, least_left_key);
            swap_block(view, left_blocks, least_left_block, block_len);

            left_keys += 1;
            left_blocks += block_len;
            if left_keys == right_keys {
                break;
            }

            least_left_key = left_keys;
            least_left_block = left_blocks;
            let mut key = if left_keys < orig_right_key {
                orig_right_key
            } else {
                left_keys + 1
            };
            while key < right_keys {
                if view.less(key, least_left_key) {
                    least_left_key = key;
                }
                key += 1;
            }
            least_left_block += (least_left_key - left_keys) * block_len;
        } else {
            view.swap(left_keys, right_keys);
            swap_block(view, left_blocks, right_blocks, block_len);

            if left_keys == least_left_key {
                least_left_key = right_keys;
                least_left_block = right_blocks;
            }
            if right_keys == least_right_key {
                least_right_key = left_keys;
            }

            left_keys += 1;
            right_keys += 1;
            left_blocks += block_len;
            right_blocks += block_len;
        }
    }

    least_right_key
}

/// Restores the interleaved imitation keys to sorted order, using `buf`
/// (at least `imit_len / 2` scratch positions) to partition left-origin from
/// right-origin keys in one pass.
pub(crate) fn deinterleave_imitation_with_buf<V: View>(
    view: &mut V,
    imit: usize,
    imit_len: usize,
    buf: usize,
    mid_key: usize,
) {
    // Partition-based bin sort, as found in HolyGrailsort's key restoration.
    if imit_len == 0 {
        return;
    }

    view.swap(mid_key, buf);
    let mut left_cur = mid_key;
    let mut right_cur = buf + 1;
    let mut cur = mid_key + 1;
    let mid_key = buf;

    while cur != imit + imit_len {
        if view.less(cur, mid_key) {
            view.swap(left_cur, cur);
            left_cur += 1;
        } else {
            view.swap(right_cur, cur);
            right_cur += 1;
        }
        cur += 1;
    }

    // Append the right keys parked in the buffer.
    let mut b = buf;
    loop {
        view.swap(left_cur, b);
        left_cur += 1;
        b += 1;
        if b == right_cur {
            break;
        }
    }
}

/// Restores the interleaved imitation keys to sorted order in place.
///
/// The keys form runs of alternating origin. Each pass rotates every other
/// (right-run, left-run) pair, halving the number of such pairs, so the whole
/// thing is O(K log K) for K keys.
pub(crate) fn deinterleave_imitation_in_place<V: View>(
    view: &mut V,
    imit: usize,
    imit_len: usize,
    mut mid_key: usize,
) {
    if imit_len == 0 {
        return;
    }

    let imit_last = imit + imit_len;

    loop {
        let mut l_runlength = 0usize;
        let mut r_runlength = 0usize;
        let mut num_rl_pairs = 0usize;

        let mut cur = imit;
        loop {
            if cur == imit_last || !view.less(cur, mid_key) {
                if l_runlength != 0 {
                    num_rl_pairs += 1;
                    if num_rl_pairs % 2 == 1 {
                        let l_run = cur - l_runlength;
                        let r_run = l_run - r_runlength;
                        rotate(view, r_run, l_run, cur);
                        if num_rl_pairs == 1 {
                            mid_key = cur - r_runlength;
                        }
                    }
                    l_runlength = 0;
                    r_runlength = 0;
                }
                if cur == imit_last {
                    break;
                }
                r_runlength += 1;
            } else if r_runlength != 0 {
                // Left keys before the first right run are already placed.
                l_runlength += 1;
            }
            cur += 1;
        }

        if num_rl_pairs <= 1 {
            return;
        }
    }
}

/// Walks the interleaved blocks left to right and merges across every
/// origin boundary. Runs of same-origin blocks are coalesced; with a buffer
/// the coalesced prefix is swapped into it, without one the walk fast-forwards
/// and, for the final short block, rotates so the buffer-less merge sees the
/// shorter side on the left.
pub(crate) fn merge_adjacent_blocks<V: View, const HAS_BUF: bool>(
    view: &mut V,
    imit: usize,
    buf: &mut usize,
    blocks: usize,
    p: BlockingParam,
    mid_key: usize,
) {
    let mut imit = imit;
    let mut num_remained_blocks = p.num_blocks;

    let mut xs = blocks;
    let mut last_block_before_ys = xs;
    let mut xs_origin_left = true;
    num_remained_blocks -= 1;

    let mut ys = xs + p.first_block_len;

    loop {
        num_remained_blocks -= 1;
        let ys_last = ys + if num_remained_blocks != 0 {
            p.block_len
        } else {
            p.last_block_len
        };
        let ys_origin_left = if num_remained_blocks != 0 {
            let from_left = view.less(imit, mid_key);
            imit += 1;
            from_left
        } else {
            false
        };

        if ys_origin_left == xs_origin_left {
            last_block_before_ys = ys;
            ys = ys_last;
        } else {
            if xs != last_block_before_ys {
                if HAS_BUF {
                    if num_remained_blocks != 0 {
                        // Blocks are sorted by first element, so the blocks up
                        // to `last_block_before_ys` are already in order; move
                        // them straight into the buffer. The remaining xs is
                        // never empty since block_len >= 2.
                        loop {
                            view.swap(*buf, xs);
                            *buf += 1;
                            xs += 1;
                            if xs == last_block_before_ys + 1 {
                                break;
                            }
                        }
                    }
                } else if num_remained_blocks != 0 {
                    xs = last_block_before_ys + 1;
                } else if ys - xs > p.last_block_len {
                    // Keep xs no longer than ys; the buffer-less merge is only
                    // linear-amortized under that arrangement.
                    rotate(view, xs, ys, ys_last);
                    ys = xs + p.last_block_len;
                    xs_origin_left = false;
                }
            }

            let mr = if HAS_BUF {
                if xs_origin_left {
                    merge_with_buf::<V, false>(view, buf, xs, ys, ys_last)
                } else {
                    merge_with_buf::<V, true>(view, buf, xs, ys, ys_last)
                }
            } else if xs_origin_left {
                merge_without_buf::<V, false>(view, xs, ys, ys_last)
            } else {
                merge_without_buf::<V, true>(view, xs, ys, ys_last)
            };

            xs = mr.rest;
            last_block_before_ys = xs;
            if mr.xs_consumed {
                xs_origin_left = !xs_origin_left;
            }
            ys = ys_last;
        }

        if num_remained_blocks == 0 {
            break;
        }
    }

    if HAS_BUF {
        // Park the residue behind the buffer so the buffer ends up
        // immediately after the merged output.
        while xs != ys {
            view.swap(*buf, xs);
            *buf += 1;
            xs += 1;
        }
    }
}

/// One full pairwise block merge of two adjacent sorted runs: interleave the
/// interior blocks, merge them, then restore the imitation keys.
///
/// The first and last block may be shorter than `block_len` and are excluded
/// from interleaving.
pub(crate) fn merge_blocking<V: View, const HAS_BUF: bool>(
    view: &mut V,
    imit: usize,
    buf: &mut usize,
    blocks: usize,
    p: BlockingParam,
) {
    let imit_len = p.num_blocks - 2;
    let mid_key = interleave_blocks(view, imit, blocks + p.first_block_len, imit_len, p.block_len);

    merge_adjacent_blocks::<V, HAS_BUF>(view, imit, buf, blocks, p, mid_key);

    if HAS_BUF {
        deinterleave_imitation_with_buf(view, imit, imit_len, *buf, mid_key);
    } else {
        deinterleave_imitation_in_place(view, imit, imit_len, mid_key);
    }
}
