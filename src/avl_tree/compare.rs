use std::cmp::Ordering;
use std::fmt;

/// An ordering function used by `AvlSet<T, C>` to arrange its elements.
///
/// Returning `None` means the two values cannot be ordered. A value that cannot be compared
/// against itself or against a stored element is not a valid element of the set.
pub trait Compare<T> {
    fn compare(&self, a: &T, b: &T) -> Option<Ordering>;
}

/// Orders elements by their `PartialOrd` implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<T> Compare<T> for Natural
where
    T: PartialOrd,
{
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        a.partial_cmp(b)
    }
}

/// Orders elements by a user-supplied total order.
#[derive(Clone, Copy)]
pub struct TotalOrder<F>(pub F);

impl<T, F> Compare<T> for TotalOrder<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        Some((self.0)(a, b))
    }
}

impl<F> fmt::Debug for TotalOrder<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("TotalOrder")
    }
}

/// Orders elements by a user-supplied function that may refuse to order some values.
#[derive(Clone, Copy)]
pub struct PartialOrder<F>(pub F);

impl<T, F> Compare<T> for PartialOrder<F>
where
    F: Fn(&T, &T) -> Option<Ordering>,
{
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for PartialOrder<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PartialOrder")
    }
}
