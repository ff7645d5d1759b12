pub trait FloatAsExt {
    /// Returns `Some(self)` when the value is usefully far from zero.
    ///
    /// NaN maps to `None`; infinities map to `Some`.
    fn into_non_zero(self, eps: Self) -> Option<f32>;

    /// Returns `Some(self)` only for finite values.
    fn into_finite(self) -> Option<f32>;
}

impl FloatAsExt for f32 {
    fn into_non_zero(self, eps: Self) -> Option<f32> {
        (self.abs() > eps).then_some(self)
    }

    fn into_finite(self) -> Option<f32> {
        self.is_finite().then_some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::FloatAsExt;

    #[test]
    fn non_zero() {
        assert_eq!(0.0.into_non_zero(0.1), None);
        assert_eq!((-0.01).into_non_zero(0.1), None);
        assert_eq!(1.0.into_non_zero(0.1), Some(1.0));
        assert_eq!(f32::NAN.into_non_zero(0.1), None);
        assert_eq!(f32::INFINITY.into_non_zero(0.1), Some(f32::INFINITY));
    }

    #[test]
    fn finite() {
        assert_eq!(0.0.into_finite(), Some(0.0));
        assert_eq!((-1.0).into_finite(), Some(-1.0));
        assert_eq!(f32::NAN.into_finite(), None);
        assert_eq!(f32::NEG_INFINITY.into_finite(), None);
    }
}
