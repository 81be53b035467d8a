//! Running a single suite: materialize, execute, compare

use tracing::{info, warn};

use super::Suite;
use crate::backend::Backend;
use crate::compare::{ComparisonReport, compare};
use crate::dispatch_float;
use crate::error::{Error, Result};
use crate::materialize::materialize;
use crate::platform::Platform;
use crate::values::Substitution;

/// What happened to one suite
#[derive(Clone, Debug, PartialEq)]
pub enum SuiteOutcome {
    /// Every element was checked
    Completed(ComparisonReport),
    /// The operation is disabled on this platform; nothing ran
    Disabled {
        /// Platform the suite is disabled on
        platform: Platform,
    },
}

impl SuiteOutcome {
    /// True if the suite ran and every element passed or was skipped
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Completed(report) if report.is_pass())
    }
}

/// Run `suite` on `backend`
///
/// Suites whose operation is disabled on `platform` return
/// [`SuiteOutcome::Disabled`] without touching the backend. At most
/// `max_logged_mismatches` mismatches are logged; all are kept in the report.
pub fn run_suite(
    suite: &Suite,
    backend: &dyn Backend,
    platform: Platform,
    substitution: &Substitution,
    max_logged_mismatches: usize,
) -> Result<SuiteOutcome> {
    let id = suite.id();
    if id.op.is_disabled_on(platform) {
        info!(suite = %id, %platform, "disabled");
        return Ok(SuiteOutcome::Disabled { platform });
    }

    let dtype = id.dtype;
    let report = dispatch_float!(dtype, T => {
        let [lhs, rhs] = materialize::<T>(suite.pair(), substitution)?;
        let actual = backend.execute(id.op, &lhs, &rhs)?;
        if actual.dtype() != dtype {
            return Err(Error::dtype_mismatch(dtype, actual.dtype()));
        }
        compare::<T>(id.op, suite.policy(), &lhs, &rhs, &actual)
    })?;

    for mismatch in report.mismatches.iter().take(max_logged_mismatches) {
        warn!(suite = %id, "{mismatch}");
    }
    info!(
        suite = %id,
        total = report.total,
        passed = report.passed,
        skipped = report.skipped,
        failed = report.failed(),
        "{}",
        if report.is_pass() { "ok" } else { "FAILED" }
    );
    Ok(SuiteOutcome::Completed(report))
}
