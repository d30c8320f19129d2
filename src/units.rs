//! Unit conversion helpers for tick durations.
//!
//! The controller keeps its clocks in seconds, while hosts may report tick
//! lengths in milliseconds, seconds or any other time unit.

use qtty::{Millisecond, Quantity, Second, Unit};

/// Marker trait for units that share the same physical dimension.
///
/// Implemented automatically for any pair of units where
/// `From::Dim == To::Dim`, so mixing time with length fails to compile.
///
/// # Example
///
/// ```ignore
/// use qtty::{Millisecond, Second};
/// use ventrl::units::SameDim;
///
/// fn accepts_same_dim<From, To>()
/// where
///     From: SameDim<To>,
/// {}
///
/// accepts_same_dim::<Millisecond, Second>(); // OK
/// ```
pub trait SameDim<To: Unit>: Unit<Dim = To::Dim> {}

impl<From, To> SameDim<To> for From
where
    From: Unit,
    To: Unit<Dim = From::Dim>,
{
}

/// Converts a quantity to another unit of the same dimension.
#[inline]
pub const fn convert<From, To>(q: Quantity<From>) -> Quantity<To>
where
    From: SameDim<To>,
    To: Unit,
{
    q.to_const::<To>()
}

/// Length of a time quantity in seconds.
#[inline]
pub fn seconds<U>(q: Quantity<U>) -> f64
where
    U: SameDim<Second>,
{
    convert::<U, Second>(q).value()
}

/// A tick length given in raw milliseconds.
#[inline]
pub fn millis(ms: f64) -> Quantity<Millisecond> {
    Quantity::<Millisecond>::new(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Minute;

    #[test]
    fn millis_to_seconds() {
        assert!((seconds(millis(800.0)) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn seconds_are_unchanged() {
        assert_eq!(seconds(Quantity::<Second>::new(2.5)), 2.5);
    }

    #[test]
    fn minutes_to_seconds() {
        let m = Quantity::<Minute>::new(1.5);
        assert!((seconds(m) - 90.0).abs() < 1e-9);
        let s: Quantity<Second> = convert(m);
        assert!((s.value() - 90.0).abs() < 1e-9);
    }
}
