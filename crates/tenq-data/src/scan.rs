//! Bounded linear scan with a default on miss.
//!
//! The index preamble skip, both resolver passes and the section bounds are
//! all "walk forward from here, stop at the first item that matches, otherwise
//! use a default". They share this one primitive so the first-match-wins
//! ordering is defined in a single place.

/// Index of the first item at or after `from` satisfying `predicate`.
///
/// Items are visited strictly in order. `from` past the end yields `None`.
pub fn find_from<T>(items: &[T], from: usize, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
    items
        .get(from..)?
        .iter()
        .position(|item| predicate(item))
        .map(|offset| from + offset)
}

/// Like [`find_from`], but returns `default` when nothing matches.
pub fn scan_or<T>(
    items: &[T],
    from: usize,
    default: usize,
    predicate: impl FnMut(&T) -> bool,
) -> usize {
    find_from(items, from, predicate).unwrap_or(default)
}
