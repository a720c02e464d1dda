use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single empirically-derived point on a dose-response curve.
///
/// `ci` is the confidence width around `value` at this dose; wider means the
/// underlying evidence is thinner (extrapolated tiers carry larger widths).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    pub dose: f64,
    pub value: f64,
    #[serde(default)]
    pub ci: f64,
}

/// An interpolated curve reading: the response value and its confidence width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub value: f64,
    pub ci: f64,
}

/// Which of a compound's two response curves is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    Benefit,
    Risk,
}

impl CurveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Benefit => "benefit",
            CurveKind::Risk => "risk",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurveError {
    #[error("curve has no samples")]
    Empty,
    #[error("curve doses must be strictly increasing (violated at sample {index})")]
    NonMonotonic { index: usize },
    #[error("curve contains a non-finite number at sample {index}")]
    NonFinite { index: usize },
    #[error("curve contains a negative dose at sample {index}")]
    NegativeDose { index: usize },
}

/// A validated, sampled dose-response curve.
///
/// Construction enforces the invariants the evaluator relies on: at least one
/// sample, strictly increasing doses, finite non-negative numbers. An empty or
/// malformed curve is a configuration error surfaced at catalog-load time, so
/// evaluation itself is infallible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResponseCurve {
    samples: Vec<CurveSample>,
}

impl ResponseCurve {
    pub fn new(samples: Vec<CurveSample>) -> Result<Self, CurveError> {
        if samples.is_empty() {
            return Err(CurveError::Empty);
        }
        for (index, sample) in samples.iter().enumerate() {
            if !(sample.dose.is_finite() && sample.value.is_finite() && sample.ci.is_finite()) {
                return Err(CurveError::NonFinite { index });
            }
            if sample.dose < 0.0 {
                return Err(CurveError::NegativeDose { index });
            }
            if index > 0 && sample.dose <= samples[index - 1].dose {
                return Err(CurveError::NonMonotonic { index });
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[CurveSample] {
        &self.samples
    }

    /// Dose of the highest evidenced sample.
    pub fn max_dose(&self) -> f64 {
        self.samples[self.samples.len() - 1].dose
    }

    /// Proxy for where diminishing returns set in: the penultimate sample dose.
    ///
    /// The final sample is often an extrapolated asymptote, so treating it as
    /// the plateau would understate how early the curve flattens.
    pub fn plateau_dose(&self) -> f64 {
        if self.samples.len() == 1 {
            return self.samples[0].dose;
        }
        self.samples[self.samples.len() - 2].dose
    }

    /// Interpolates the curve at `dose`.
    ///
    /// Exact sample hits return the sample. Between samples, `value` and `ci`
    /// are linearly interpolated by the same ratio. Doses below the first
    /// sample return the first sample; doses above the last return the last
    /// (flat extrapolation, which downstream code flags as beyond evidence).
    pub fn value_at(&self, dose: f64) -> CurvePoint {
        let first = self.samples[0];
        if dose <= first.dose {
            return CurvePoint {
                value: first.value,
                ci: first.ci,
            };
        }
        let last = self.samples[self.samples.len() - 1];
        if dose >= last.dose {
            return CurvePoint {
                value: last.value,
                ci: last.ci,
            };
        }

        for window in self.samples.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            if dose >= lo.dose && dose <= hi.dose {
                let ratio = (dose - lo.dose) / (hi.dose - lo.dose);
                return CurvePoint {
                    value: lo.value + ratio * (hi.value - lo.value),
                    ci: lo.ci + ratio * (hi.ci - lo.ci),
                };
            }
        }

        CurvePoint {
            value: last.value,
            ci: last.ci,
        }
    }
}

impl TryFrom<Vec<CurveSample>> for ResponseCurve {
    type Error = CurveError;

    fn try_from(samples: Vec<CurveSample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}
