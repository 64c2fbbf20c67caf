//! Direct repeat search
//!
//! Finds CRISPR-like arrays inside a single read by seed and extend: an exact
//! seed is paired with a later copy of itself one repeat-plus-spacer away, the
//! pair is extended in both directions while the two copies agree, and the
//! resulting repeat is then chained left and right to collect further copies.
//! The result is written into the read's [`RepeatArray`] as half-open spans.

use crate::builder::BuildConfiguration;
use crate::read::RawRead;
use crate::repeat_array::RepeatArray;
use tracing::trace;

/// Search `seq` for a run of direct repeats separated by spacers
///
/// Returns an empty array when no run of at least
/// `config.min_repeat_copies` copies exists. Only the first array found,
/// scanning from the left, is reported.
pub fn find_direct_repeats(seq: &str, config: &BuildConfiguration) -> RepeatArray {
    let bytes = seq.as_bytes();
    let n = bytes.len();
    let seed_len = config.seed_len;
    let min_gap = config.min_repeat_len + config.min_spacer_len;
    let max_gap = config.max_repeat_len + config.max_spacer_len;

    let mut array = RepeatArray::new();
    if seed_len == 0 || n < seed_len || n < min_gap + config.min_repeat_len {
        return array;
    }

    for i in 0..=(n - seed_len) {
        let seed = &bytes[i..i + seed_len];
        if seed.contains(&b'N') {
            continue;
        }

        let last_j = (i + max_gap).min(n - seed_len);
        for j in (i + min_gap)..=last_j {
            if &bytes[j..j + seed_len] != seed {
                continue;
            }

            let Some((start, second, len)) = extend_pair(bytes, i, j, seed_len, config) else {
                continue;
            };

            let copies = collect_copies(bytes, start, second, len, config);
            if copies.len() >= config.min_repeat_copies {
                trace!(
                    "direct repeat of length {} with {} copies at {}",
                    len,
                    copies.len(),
                    start
                );
                for c in copies {
                    array.add(c, c + len);
                }
                return array;
            }
        }
    }

    array
}

/// Scan a read and store the repeats found in its annotation
///
/// Any previous annotation is replaced. Returns the number of repeats found.
pub fn annotate_read(read: &mut RawRead, config: &BuildConfiguration) -> usize {
    let found = find_direct_repeats(read.seq(), config);
    let count = found.number_of_repeats();
    *read.repeats_mut() = found;
    count
}

/// Grow a seed hit at `(a, b)` into the longest shared repeat
///
/// Returns the starts of both copies and the repeat length, or `None` if the
/// repeat or the spacer between the two copies falls outside the configured
/// windows.
fn extend_pair(
    bytes: &[u8],
    a: usize,
    b: usize,
    seed_len: usize,
    config: &BuildConfiguration,
) -> Option<(usize, usize, usize)> {
    let mut start_a = a;
    let mut start_b = b;
    let mut len = seed_len;

    // copies may not run into each other
    while start_b + len < bytes.len()
        && start_a + len < start_b
        && len < config.max_repeat_len
        && bytes[start_a + len] == bytes[start_b + len]
        && bytes[start_a + len] != b'N'
    {
        len += 1;
    }

    while start_a > 0
        && len < config.max_repeat_len
        && bytes[start_a - 1] == bytes[start_b - 1]
        && bytes[start_a - 1] != b'N'
    {
        start_a -= 1;
        start_b -= 1;
        len += 1;
    }

    if len < config.min_repeat_len {
        return None;
    }
    let spacer = start_b.checked_sub(start_a + len)?;
    if spacer < config.min_spacer_len || spacer > config.max_spacer_len {
        return None;
    }
    Some((start_a, start_b, len))
}

/// Chain exact copies of the repeat at `first` and `second` in both directions
fn collect_copies(
    bytes: &[u8],
    first: usize,
    second: usize,
    len: usize,
    config: &BuildConfiguration,
) -> Vec<usize> {
    let repeat = &bytes[first..first + len];
    let matches = |p: usize| p + len <= bytes.len() && &bytes[p..p + len] == repeat;

    let mut copies = vec![first, second];

    let mut last = second;
    loop {
        let from = last + len + config.min_spacer_len;
        let to = last + len + config.max_spacer_len;
        match (from..=to).find(|&p| matches(p)) {
            Some(p) => {
                copies.push(p);
                last = p;
            }
            None => break,
        }
    }

    let mut head = first;
    let mut before = Vec::new();
    loop {
        // the window may run off the start of the read
        let Some(to) = head.checked_sub(len + config.min_spacer_len) else {
            break;
        };
        let from = head.saturating_sub(len + config.max_spacer_len);
        // closest copy first
        match (from..=to).rev().find(|&p| matches(p)) {
            Some(p) => {
                before.push(p);
                head = p;
            }
            None => break,
        }
    }

    before.reverse();
    before.extend(copies);
    before
}
