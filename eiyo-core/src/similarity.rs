//! Ratcliff/Obershelp block-matching similarity.
//!
//! Finds the longest common contiguous run, then recurses into the unmatched
//! pieces on either side, summing matched lengths. The ratio is
//! `2 * matched / (len(a) + len(b))`, counted in chars.
//!
//! The longest-run search breaks ties toward the earliest position in the first
//! argument, then the earliest in the second, so the matched total can depend
//! on argument order ("tide" vs "diet"). [`ratio`] scores both orientations and
//! keeps the larger, which makes it symmetric.

/// Similarity ratio in `[0, 1]`. Two empty strings score 1.0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matching_chars(&a, &b).max(matching_chars(&b, &a));
    2.0 * matched as f64 / total as f64
}

/// Total length of the matching blocks of `a` against `b`, in that orientation.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
///
/// Earliest `i` wins among equal sizes, then earliest `j`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

    // run[k + 1] = length of the common run ending at a[i], b[blo + k]
    let width = bhi - blo + 1;
    let mut prev = vec![0usize; width];
    let mut curr = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo + 1;
            curr[k] = if a[i] == b[j] { prev[k - 1] + 1 } else { 0 };
            if curr[k] > best_size {
                best_size = curr[k];
                best_i = i + 1 - best_size;
                best_j = j + 1 - best_size;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_size)
}
