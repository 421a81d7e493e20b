//! Bottom-up merge level control: how long the runs of each level are, how
//! the key prefix is split between imitation and merge buffer, how a level's
//! runs are chopped into blocks, and the walk over all run pairs of a level.

use crate::blocks::{merge_blocking, BlockingParam};
use crate::util::{binary_search, over_approx_sqrt, rotate};
use crate::view::{Backward, Forward, View};

/// Produces the exact length of every run of a level when the payload length
/// is not a power of two, by simulating the rational division
/// `data_len / 2^log2_num_seqs` with an integer fraction counter.
///
/// All runs differ in length by at most one; `next()` reports whether the
/// upcoming run is one element short of the level's nominal `seq_len`. The
/// backward flavor yields the same physical layout traversed right to left.
pub(crate) struct SequenceDivider<const FORWARD: bool> {
    log2_num_seqs: u32,
    num_seqs: usize,
    remainder: usize,
    frac_counter: usize,
}

impl<const FORWARD: bool> SequenceDivider<FORWARD> {
    pub fn new(data_len: usize, log2_num_seqs: u32) -> Self {
        let num_seqs = 1usize << log2_num_seqs;
        let mut remainder = (data_len - 1) % num_seqs + 1;
        if !FORWARD {
            remainder = num_seqs - remainder;
        }
        Self {
            log2_num_seqs,
            num_seqs,
            remainder,
            frac_counter: 0,
        }
    }

    pub fn next(&mut self) -> bool {
        self.frac_counter += self.remainder;
        let mut no_carry = self.frac_counter & (1 << self.log2_num_seqs) == 0;
        if !FORWARD {
            no_carry = !no_carry;
        }
        self.frac_counter &= !(1 << self.log2_num_seqs);
        self.num_seqs -= 1;
        no_carry
    }

    pub fn is_end(&self) -> bool {
        self.num_seqs == 0
    }
}

/// Per-level state of the whole sort.
///
/// The collected keys are split into the imitation buffer and the merge
/// buffer: `imit_len + buf_len == num_keys`, `imit_len` is even and, while
/// the buffer exists, `buf_len >= imit_len + 2`. `bufferable_len` is the
/// longest run a buffered merge can still handle: the imitation must record
/// the block permutation of two runs while every block fits in the buffer,
/// giving `(imit_len + 2) / 2 * buf_len`.
pub(crate) struct MergeSortControl {
    /// Even, non-negative.
    pub imit_len: usize,
    /// Zero once the buffer is retired.
    pub buf_len: usize,
    pub bufferable_len: usize,
    /// Always > 8.
    pub data_len: usize,
    pub log2_num_seqs: u32,
    /// Nominal run length of the current level, `5..=8` at the leaves.
    pub seq_len: usize,
    pub forward: bool,
}

impl MergeSortControl {
    /// `num_keys` must be 0 or >= 8, `data_len > 8`.
    ///
    /// With `num_keys >= 8` the split guarantees `imit_len >= 2`,
    /// `buf_len >= imit_len + 2` and `bufferable_len >= 8`, so the first
    /// level (`seq_len <= 8`) is always bufferable.
    pub fn new(num_keys: usize, data_len: usize) -> Self {
        let mut imit_len = 0;
        let mut buf_len = 0;
        let mut bufferable_len = 0;
        if num_keys != 0 {
            imit_len = (num_keys + 2) / 4 * 2 - 2;
            buf_len = num_keys - imit_len;
            bufferable_len = (imit_len + 2) / 2 * buf_len;
        }

        let mut log2_num_seqs = 1u32;
        while (data_len - 1) >> (log2_num_seqs + 3) != 0 {
            log2_num_seqs += 1;
        }
        let seq_len = ((data_len - 1) >> log2_num_seqs) + 1;

        Self {
            imit_len,
            buf_len,
            bufferable_len,
            data_len,
            log2_num_seqs,
            seq_len,
            forward: true,
        }
    }

    /// Advances to the next level and flips the merge direction while the
    /// buffer is live. When the next level can no longer use the buffer
    /// (last level, or runs outgrew `bufferable_len`), the buffer is absorbed
    /// into the imitation, keeping `imit_len` even, and its old length is
    /// returned so the caller can re-sort that key slice.
    pub fn next(&mut self) -> usize {
        self.log2_num_seqs -= 1;
        self.seq_len = ((self.data_len - 1) >> self.log2_num_seqs) + 1;

        if self.buf_len == 0 {
            return 0;
        }
        self.forward = !self.forward;

        if self.log2_num_seqs == 0 || self.seq_len > self.bufferable_len {
            let old_buf_len = self.buf_len;
            self.imit_len += self.buf_len / 2 * 2;
            self.buf_len = 0;
            self.bufferable_len = 0;
            return old_buf_len;
        }
        0
    }
}

/// Picks the block count and lengths for the current level.
///
/// Buffered: enough blocks that each fits in the buffer. Unbuffered: at most
/// `imit_len + 2` blocks, further limited by an even under-approximation of
/// `sqrt(2 * seq_len)` so the interleave's linear key scans stay O(seq_len).
///
/// The resulting `block_len` is always >= 3 and `first_block_len` >= 2 even
/// after the sequence divider shortens a run by one.
pub(crate) fn determine_blocking(ctrl: &MergeSortControl) -> BlockingParam {
    let seq_len = ctrl.seq_len;

    let max_num_blocks = ctrl.imit_len + 2;
    let num_blocks = if ctrl.buf_len != 0 {
        // `seq_len <= bufferable_len` keeps this within `max_num_blocks`.
        ((seq_len - 1) / ctrl.buf_len + 1) * 2
    } else {
        let limit_num_blocks = seq_len / over_approx_sqrt(seq_len * 2) * 2;
        max_num_blocks.min(limit_num_blocks)
    };

    let block_len = (seq_len - 1) / (num_blocks / 2) + 1;
    let residual_len = seq_len - block_len * (num_blocks / 2 - 1);

    BlockingParam {
        num_blocks,
        block_len,
        first_block_len: residual_len,
        last_block_len: residual_len,
    }
}

/// Merges every pair of adjacent runs of the current level.
///
/// Forward levels walk left to right with the buffer leading the data;
/// backward levels run the identical walk through the reversed view, which
/// leaves the buffer back at the front for the level after.
pub(crate) fn merge_one_level<T, F, const HAS_BUF: bool, const FORWARD: bool>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    buf: usize,
    data: usize,
    seq_len: usize,
    seq_div: SequenceDivider<FORWARD>,
    p: BlockingParam,
) where
    F: FnMut(&T, &T) -> bool,
{
    if FORWARD {
        let mut view = Forward { v, is_less };
        merge_level_runs::<_, HAS_BUF, FORWARD>(&mut view, imit, buf, data, seq_len, seq_div, p);
    } else {
        let n = v.len();
        let mut view = Backward { v, is_less };
        merge_level_runs::<_, HAS_BUF, FORWARD>(
            &mut view,
            n - (imit + p.num_blocks - 2),
            n - buf,
            n - data,
            seq_len,
            seq_div,
            p,
        );
    }
}

fn merge_level_runs<V: View, const HAS_BUF: bool, const FORWARD: bool>(
    view: &mut V,
    imit: usize,
    mut buf: usize,
    mut data: usize,
    seq_len: usize,
    mut seq_div: SequenceDivider<FORWARD>,
    mut p: BlockingParam,
) {
    let residual_len = p.first_block_len;
    loop {
        let lseq_decr = seq_div.next() as usize;
        let rseq_decr = seq_div.next() as usize;
        let merging_len = (seq_len - lseq_decr) + (seq_len - rseq_decr);
        p.first_block_len = residual_len - lseq_decr;
        p.last_block_len = residual_len - rseq_decr;

        merge_blocking::<V, HAS_BUF>(view, imit, &mut buf, data, p);
        data += merging_len;

        if seq_div.is_end() {
            break;
        }
    }
}

/// Searches the prefix of `[first, last)` for up to `num_desired_keys`
/// pairwise-distinct elements and gathers them, sorted, at `first`.
///
/// A sorted window of found keys is kept adjacent to the scan position by
/// rotating it forward past examined duplicates, so inserting a new key costs
/// O(num_keys) amortized. Returns the number of keys found.
pub(crate) fn collect_keys<V: View>(
    view: &mut V,
    first: usize,
    last: usize,
    mut num_desired_keys: usize,
) -> usize {
    let mut keys = first;
    let mut keys_last = first + 1;
    let mut cur = first + 1;
    num_desired_keys -= 1;

    while num_desired_keys != 0 && cur < last {
        let mut inspos = binary_search::<V, true>(view, keys, keys_last, cur);
        if inspos == keys_last || view.less(cur, inspos) {
            // Rotate the key window forward so insertion is O(num_keys).
            if cur != keys_last {
                rotate(view, keys, keys_last, cur);
                let shift = cur - keys_last;
                keys += shift;
                inspos += shift;
            }
            let mut tmp = cur;
            while tmp > inspos {
                view.swap(tmp, tmp - 1);
                tmp -= 1;
            }
            keys_last = cur + 1;
            num_desired_keys -= 1;
        }
        cur += 1;
    }

    if keys != first {
        rotate(view, first, keys, keys_last);
    }
    keys_last - keys
}
