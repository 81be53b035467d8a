//! Explicit suite registry
//!
//! [`Registry::init`] registers every (operation x dtype x category instance)
//! suite up front. Tolerance policies are resolved at registration, so running
//! a suite never consults the configuration again.

use tracing::{debug, info};

use super::runner::{SuiteOutcome, run_suite};
use super::{SuiteCategory, SuiteId};
use crate::backend::Backend;
use crate::config::HarnessConfig;
use crate::error::{Error, Result};
use crate::ops::BinaryOp;
use crate::platform::Platform;
use crate::tolerance::TolerancePolicy;
use crate::values::{Substitution, ValueSetPair};

/// One registered suite
#[derive(Clone, Debug)]
pub struct Suite {
    id: SuiteId,
    pair: ValueSetPair,
    policy: TolerancePolicy,
}

impl Suite {
    /// Identity
    pub fn id(&self) -> SuiteId {
        self.id
    }

    /// Operand value sets
    pub fn pair(&self) -> &ValueSetPair {
        &self.pair
    }

    /// Tolerance policy resolved at registration
    pub fn policy(&self) -> &TolerancePolicy {
        &self.policy
    }
}

/// Outcome of one suite in a run
#[derive(Clone, Debug, PartialEq)]
pub struct SuiteResult {
    /// Which suite
    pub id: SuiteId,
    /// What happened
    pub outcome: SuiteOutcome,
}

/// Aggregate of a registry run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Per-suite results, in registration order
    pub results: Vec<SuiteResult>,
    /// Suites that ran with no mismatch
    pub passed: usize,
    /// Suites with at least one mismatch
    pub failed: usize,
    /// Suites disabled on the platform
    pub disabled: usize,
    /// Suites left out because the backend lacks their dtype
    pub unsupported: usize,
}

impl RunSummary {
    /// True if no suite failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total mismatching elements across all suites
    pub fn mismatch_count(&self) -> u64 {
        self.results
            .iter()
            .map(|r| match &r.outcome {
                SuiteOutcome::Completed(report) => report.failed(),
                SuiteOutcome::Disabled { .. } => 0,
            })
            .sum()
    }

    /// Total elements skipped by the tolerance policy across all suites
    pub fn skipped(&self) -> u64 {
        self.results
            .iter()
            .map(|r| match &r.outcome {
                SuiteOutcome::Completed(report) => report.skipped,
                SuiteOutcome::Disabled { .. } => 0,
            })
            .sum()
    }
}

/// Registered suites plus the settings needed to run them
#[derive(Clone, Debug)]
pub struct Registry {
    platform: Platform,
    suites: Vec<Suite>,
    substitution: Substitution,
    max_logged_mismatches: usize,
}

impl Registry {
    /// Register every suite described by `config`
    ///
    /// # Errors
    ///
    /// Fails if a dtype's plan does not fit its value range or exceeds its
    /// input budget.
    pub fn init(config: &HarnessConfig) -> Result<Self> {
        let mut instances = Vec::new();
        for dtype in config.enabled_dtypes() {
            let plan = config.plan_for(dtype);
            instances.push((dtype, plan.instantiate(dtype, config.seed)?));
        }

        let mut suites = Vec::new();
        for op in BinaryOp::ALL {
            for (dtype, pairs) in &instances {
                let policy =
                    TolerancePolicy::resolve(op, config.platform, *dtype, config.default_error_spec);
                let mut next_index = [0usize; SuiteCategory::ALL.len()];
                for (category, pair) in pairs {
                    let slot = &mut next_index[*category as usize];
                    suites.push(Suite {
                        id: SuiteId {
                            op,
                            dtype: *dtype,
                            category: *category,
                            index: *slot,
                        },
                        pair: pair.clone(),
                        policy,
                    });
                    *slot += 1;
                }
            }
        }
        debug!(suites = suites.len(), platform = %config.platform, "registered suites");

        Ok(Self {
            platform: config.platform,
            suites,
            substitution: config.substitution.clone(),
            max_logged_mismatches: config.max_logged_mismatches,
        })
    }

    /// Platform the suites were registered for
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Every registered suite
    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    /// Suites whose name contains `filter`
    pub fn select<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = &'a Suite> + 'a {
        self.suites.iter().filter(move |s| s.id.matches(filter))
    }

    /// Run the suites selected by `filter` on `backend`
    ///
    /// Numerical mismatches are recorded and the run continues. A harness
    /// fault stops the run and is returned as the error.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidConfig`] before running anything if the
    /// backend's platform is not the one the suites were registered for, since
    /// tolerances and disabled suites are resolved per platform.
    pub fn run(&self, backend: &dyn Backend, filter: &str) -> Result<RunSummary> {
        if backend.platform() != self.platform {
            return Err(Error::invalid_config(
                "platform",
                self.platform.to_string(),
                format!(
                    "backend {} runs on {}, suites were registered for {}",
                    backend.name(),
                    backend.platform(),
                    self.platform
                ),
            ));
        }

        let mut summary = RunSummary::default();
        for suite in self.select(filter) {
            let id = suite.id();
            if !backend.supports_dtype(id.dtype) {
                debug!(suite = %id, backend = backend.name(), "dtype unsupported, omitted");
                summary.unsupported += 1;
                continue;
            }
            let outcome = run_suite(
                suite,
                backend,
                self.platform,
                &self.substitution,
                self.max_logged_mismatches,
            )?;
            match &outcome {
                SuiteOutcome::Disabled { .. } => summary.disabled += 1,
                o if o.is_pass() => summary.passed += 1,
                _ => summary.failed += 1,
            }
            summary.results.push(SuiteResult { id, outcome });
        }

        info!(
            passed = summary.passed,
            failed = summary.failed,
            disabled = summary.disabled,
            unsupported = summary.unsupported,
            skipped = summary.skipped(),
            "run complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::{DType, DTypeSet};

    fn small_config() -> HarnessConfig {
        HarnessConfig::default()
            .with_dtypes(DTypeSet::WIDE)
            .with_normals(8)
            .with_extremes(16, 4)
    }

    #[test]
    fn test_registration_counts() {
        let registry = Registry::init(&small_config()).unwrap();
        // 4 single-instance categories + 4 extreme groups, per op and dtype
        assert_eq!(registry.suites().len(), 7 * 2 * 8);
        let ids: Vec<String> = registry.select("Max_f64").map(|s| s.id().to_string()).collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(ids[0], "SpecialValues/Max_f64/0");
        assert_eq!(ids[7], "LargeAndSmallMagnitudeNormalValues/Max_f64/3");
    }

    #[test]
    fn test_no_f64_drops_suites() {
        let registry = Registry::init(&small_config().with_f64(false)).unwrap();
        assert!(registry.suites().iter().all(|s| s.id().dtype != DType::F64));
        assert_eq!(registry.suites().len(), 7 * 8);
    }

    #[test]
    fn test_policy_resolved_at_registration() {
        let registry = Registry::init(&small_config().with_platform(Platform::Gpu)).unwrap();
        let suite = registry.select("AbsComplex_f32").next().unwrap();
        assert_eq!(
            *suite.policy(),
            TolerancePolicy::AbsComplexGpu { distance_err: 3 }
        );
        let suite = registry.select("Add_f64").next().unwrap();
        assert!(matches!(suite.policy(), TolerancePolicy::Uniform(_)));
    }
}
