//! Majority-vote smoothing for discrete label sequences.

/// Replace each label with the most frequent label in a centered window.
///
/// The window spans `window / 2` labels on each side of position `i` and is
/// clipped at the sequence boundaries, so edges vote over fewer labels. Ties
/// go to the label encountered first in the window. A window of 0 or 1
/// leaves the sequence unchanged.
pub fn majority_smooth<T: Copy + PartialEq>(labels: &[T], window: usize) -> Vec<T> {
    let half = window / 2;
    let mut result = Vec::with_capacity(labels.len());

    for i in 0..labels.len() {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(labels.len());
        result.push(window_majority(&labels[start..end]));
    }

    result
}

/// Most frequent label of a non-empty slice; first-encountered wins ties.
fn window_majority<T: Copy + PartialEq>(window: &[T]) -> T {
    let mut counts: Vec<(T, usize)> = Vec::with_capacity(3);
    for &label in window {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best = counts[0];
    for &candidate in &counts[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }
    best.0
}
