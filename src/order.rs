//! Stock comparators and average functions
//!
//! [`natural`] and [`inverted`] are the two orientations the [`MedianTracker`](crate::MedianTracker) builds its heaps with.
//! [`float_midpoint`] and [`integer_midpoint`] are ready-made average functions for numeric streams.

use std::cmp::Ordering;

use num::{integer::Average, Float};

/// Natural order of `T`
///
/// Values that cannot be compared (such as `NaN`) are treated as equal.
pub fn natural<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    match a.partial_cmp(b) {
        Some(ord) => ord,
        None => {
            #[cfg(feature = "log")]
            log::debug!("Got incomparable values. Treating them as equal.");

            Ordering::Equal
        }
    }
}

/// Reverse of [`natural`]
///
/// A [`Heap`](crate::Heap) built with this keeps its largest element on top.
pub fn inverted<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    natural(b, a)
}

/// Midpoint of two floats, `a / 2 + b / 2`
///
/// Stays finite for any finite inputs, even at the ends of the type's range.
pub fn float_midpoint<F: Float>(a: &F, b: &F) -> F {
    let two = F::one() + F::one();
    *a / two + *b / two
}

/// Midpoint of two integers, rounded towards negative infinity
///
/// Never overflows, even for values at the ends of the type's range.
pub fn integer_midpoint<I: Average>(a: &I, b: &I) -> I {
    a.average_floor(b)
}
