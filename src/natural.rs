//! Natural ordering for data-point identifiers.
//!
//! Identifiers are compared the way a person reads them: maximal runs of
//! digits compare by integer value, everything else compares by code point.
//! So `"g2" < "g10"` and `"fig1.2" < "fig1.10"`, where plain string order
//! would reverse both.

use core::cmp::Ordering;

/// Compare two identifiers in natural order.
///
/// Digit runs are compared numerically without ever being parsed into a
/// fixed-width integer, so leading zeros are insignificant and runs of any
/// length are fine. When the natural keys are identical (`"g01"` vs
/// `"g1"`), plain string order breaks the tie, keeping the ordering total
/// and consistent with string equality.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ab = a.as_bytes();
    let mut bb = b.as_bytes();
    loop {
        match (ab.first(), bb.first()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&ca), Some(&cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let (na, rest_a) = split_digits(ab);
                    let (nb, rest_b) = split_digits(bb);
                    match cmp_digit_runs(na, nb) {
                        Ordering::Equal => {
                            ab = rest_a;
                            bb = rest_b;
                        }
                        other => return other,
                    }
                } else {
                    match ca.cmp(&cb) {
                        Ordering::Equal => {
                            ab = &ab[1..];
                            bb = &bb[1..];
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

/// Split a byte slice into its leading digit run and the remainder.
fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let end = s.iter().position(|c| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Compare two digit runs by integer value.
fn cmp_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let a = trim_zeros(a);
    let b = trim_zeros(b);
    // With leading zeros gone, a longer run is a larger number; equal
    // lengths compare digit by digit.
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn trim_zeros(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|&c| c != b'0').unwrap_or(s.len());
    &s[start..]
}

/// A `String` ordered by [`natural_cmp`].
///
/// Used for cluster member sets so iteration yields members in natural
/// order. Equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Natural(pub String);

impl Natural {
    /// Borrow the underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Natural {
    fn from(s: &str) -> Self {
        Natural(s.to_owned())
    }
}

impl From<String> for Natural {
    fn from(s: String) -> Self {
        Natural(s)
    }
}

impl Ord for Natural {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for Natural {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
