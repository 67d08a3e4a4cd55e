//! Ordering for coordinates.

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more principled wrappers in the `ordered_float` crate, this
/// one doesn't guard against NaNs on construction: a NaN compares equal to
/// everything. Callers that need a total order (for example, to key a
/// `BTreeMap` by point coordinates) must filter out non-finite values first.
///
/// Negative zero compares equal to positive zero, matching `f64`'s own
/// equality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheapOrderedFloat(f64);

// Now comes the fishy stuff.
impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

impl From<f64> for CheapOrderedFloat {
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    // Kind of like Arbitrary, but
    // - it's a local trait, so we can impl it for whatever we want, and
    // - it only returns "reasonable" values.
    pub trait Reasonable {
        type Strategy: Strategy<Value = Self>;
        fn reasonable() -> Self::Strategy;
    }

    impl<S: Reasonable, T: Reasonable> Reasonable for (S, T) {
        type Strategy = (S::Strategy, T::Strategy);

        fn reasonable() -> Self::Strategy {
            (S::reasonable(), T::reasonable())
        }
    }

    impl Reasonable for f64 {
        type Strategy = BoxedStrategy<f64>;

        fn reasonable() -> Self::Strategy {
            (-1e4..1e4).boxed()
        }
    }

    #[test]
    fn signed_zeros_are_equal() {
        assert_eq!(
            CheapOrderedFloat::from(-0.0).cmp(&CheapOrderedFloat::from(0.0)),
            std::cmp::Ordering::Equal
        );
    }

    proptest! {
        #[test]
        fn agrees_with_partial_cmp(a in f64::reasonable(), b in f64::reasonable()) {
            let cheap = CheapOrderedFloat::from(a).cmp(&CheapOrderedFloat::from(b));
            prop_assert_eq!(Some(cheap), a.partial_cmp(&b));
        }
    }
}
