//! Error tolerances for device-vs-reference comparison
//!
//! An [`ErrorSpec`] states how far a device result may stray from the
//! reference before it counts as a mismatch. A [`TolerancePolicy`] produces
//! one `ErrorSpec` per input pair; policies are resolved once per suite from
//! the operation, platform and dtype.

mod distance;
mod policy;

pub use distance::distance;
pub use policy::TolerancePolicy;

/// Tolerance for one comparison
///
/// A result passes if it is within `abs_err` absolute error, within
/// `rel_err` relative error, or within `distance_err` representable values of
/// the expected value. The default is an exact comparison.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ErrorSpec {
    /// Allowed absolute error
    pub abs_err: f64,
    /// Allowed relative error
    pub rel_err: f64,
    /// Allowed distance, in representable values of the native type
    pub distance_err: u64,
    /// Treat +0 and -0 as different results
    pub strict_signed_zeros: bool,
    /// Do not compare this element at all
    pub skip_comparison: bool,
}

impl ErrorSpec {
    /// Exact comparison, signed zeros not strict
    pub const EXACT: Self = Self {
        abs_err: 0.0,
        rel_err: 0.0,
        distance_err: 0,
        strict_signed_zeros: false,
        skip_comparison: false,
    };

    /// Start building from [`ErrorSpec::EXACT`]
    pub fn builder() -> ErrorSpecBuilder {
        ErrorSpecBuilder { spec: Self::EXACT }
    }
}

impl Default for ErrorSpec {
    fn default() -> Self {
        Self::EXACT
    }
}

/// Builder for [`ErrorSpec`]
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct ErrorSpecBuilder {
    spec: ErrorSpec,
}

impl ErrorSpecBuilder {
    /// Set allowed absolute error
    pub fn abs_err(mut self, abs_err: f64) -> Self {
        self.spec.abs_err = abs_err;
        self
    }

    /// Set allowed relative error
    pub fn rel_err(mut self, rel_err: f64) -> Self {
        self.spec.rel_err = rel_err;
        self
    }

    /// Set allowed distance in representable values
    pub fn distance_err(mut self, distance_err: u64) -> Self {
        self.spec.distance_err = distance_err;
        self
    }

    /// Require matching zero signs
    pub fn strict_signed_zeros(mut self, strict: bool) -> Self {
        self.spec.strict_signed_zeros = strict;
        self
    }

    /// Skip the comparison entirely
    pub fn skip_comparison(mut self, skip: bool) -> Self {
        self.spec.skip_comparison = skip;
        self
    }

    /// Finish
    pub fn build(self) -> ErrorSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_exact() {
        let spec = ErrorSpec::default();
        assert_eq!(spec.abs_err, 0.0);
        assert_eq!(spec.rel_err, 0.0);
        assert_eq!(spec.distance_err, 0);
        assert!(!spec.strict_signed_zeros);
        assert!(!spec.skip_comparison);
    }

    #[test]
    fn test_builder() {
        let spec = ErrorSpec::builder()
            .abs_err(1e-30)
            .distance_err(2)
            .strict_signed_zeros(true)
            .build();
        assert_eq!(spec.abs_err, 1e-30);
        assert_eq!(spec.rel_err, 0.0);
        assert_eq!(spec.distance_err, 2);
        assert!(spec.strict_signed_zeros);
        assert!(!spec.skip_comparison);
    }
}
