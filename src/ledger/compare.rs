//! Default orderings for ids that have no stored position yet

use crate::model::Item;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Plain string order, used for sibling groups
#[must_use]
pub fn lexicographic(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Newest first, then by name in natural order, then by id
#[must_use]
pub fn newest_first(a: &Item, b: &Item) -> Ordering {
    b.last_modified
        .cmp(&a.last_modified)
        .then_with(|| natural_cmp(&a.name, &b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Human-friendly string comparison
///
/// Case-insensitive, and runs of ASCII digits compare by numeric value so
/// `"Mod 2"` sorts before `"Mod 10"`. Strings that are equal under those rules
/// fall back to a plain comparison so the order stays total.
///
/// # Examples
/// ```
/// # use modshelf::ledger::natural_cmp;
/// use std::cmp::Ordering;
/// assert_eq!(natural_cmp("Mod 2", "Mod 10"), Ordering::Less);
/// assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
/// ```
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}
