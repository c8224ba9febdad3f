use crate::error::{DashError, DashResult};

/// Linear map from a bounded domain onto `[0, span]`.
///
/// Values outside the domain are clamped to its edges before mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    span: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64, span: f64) -> DashResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start >= domain_end {
            return Err(DashError::InvalidData(
                "scale domain must be finite and increasing".to_owned(),
            ));
        }
        if !span.is_finite() || span <= 0.0 {
            return Err(DashError::InvalidData(
                "scale span must be finite and > 0".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            span,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.span
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.domain_start, self.domain_end)
    }

    /// Maps `value` into `[0, span]`. Non-finite input maps to the lower edge.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let normalized =
            (self.clamp(value) - self.domain_start) / (self.domain_end - self.domain_start);
        normalized * self.span
    }
}

#[cfg(test)]
mod tests {
    use super::LinearScale;

    #[test]
    fn maps_and_clamps() {
        let scale = LinearScale::new(-0.81, 1.48, 10.0).expect("scale");
        assert!((scale.map(-0.81) - 0.0).abs() <= 1e-12);
        assert!((scale.map(1.48) - 10.0).abs() <= 1e-12);
        assert!((scale.map(5.0) - 10.0).abs() <= 1e-12);
        assert!((scale.map(-3.0) - 0.0).abs() <= 1e-12);
    }

    #[test]
    fn rejects_degenerate_domain() {
        assert!(LinearScale::new(1.0, 1.0, 10.0).is_err());
        assert!(LinearScale::new(0.0, 1.0, 0.0).is_err());
    }
}
