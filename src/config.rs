//! Harness configuration
//!
//! [`HarnessConfig`] gathers everything the registry needs to build suites:
//! which platform's tolerances apply, which dtypes run, how value sets are
//! sized and seeded, and which inputs to substitute.
//!
//! Environment variables read by [`HarnessConfig::from_env`]:
//!
//! | Variable             | Effect                                    |
//! |----------------------|-------------------------------------------|
//! | `FPEXHAUST_PLATFORM` | `cpu`, `gpu` or `other`                   |
//! | `FPEXHAUST_SEED`     | seed for sampled normals                  |
//! | `FPEXHAUST_NO_F64`   | `1`/`true`: backend lacks F64             |
//! | `FPEXHAUST_NORMALS`  | normal sample count for every dtype       |

use std::collections::BTreeMap;

use crate::dtype::{DType, DTypeSet};
use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::suite::SuitePlan;
use crate::tolerance::ErrorSpec;
use crate::values::Substitution;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Mismatches logged per suite by default
pub const DEFAULT_MAX_LOGGED_MISMATCHES: usize = 10;

/// Harness configuration
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Platform whose tolerances and disabled suites apply
    pub platform: Platform,
    /// False drops every F64 suite at registration
    pub backend_supports_f64: bool,
    /// Dtypes to register
    pub dtypes: DTypeSet,
    /// Seed for sampled normals
    pub seed: u64,
    /// Tolerance for operations without a dedicated policy
    pub default_error_spec: ErrorSpec,
    /// Per-dtype plan overrides
    pub plans: BTreeMap<DType, SuitePlan>,
    /// Known-incorrect input substitution
    pub substitution: Substitution,
    /// Mismatches logged per failing suite
    pub max_logged_mismatches: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let dtypes = if DType::F16.is_enabled() {
            DTypeSet::WIDE.union(DTypeSet::HALF)
        } else {
            DTypeSet::WIDE
        };
        Self {
            platform: Platform::Cpu,
            backend_supports_f64: true,
            dtypes,
            seed: DEFAULT_SEED,
            default_error_spec: ErrorSpec::default(),
            plans: BTreeMap::new(),
            substitution: Substitution::none(),
            max_logged_mismatches: DEFAULT_MAX_LOGGED_MISMATCHES,
        }
    }
}

impl HarnessConfig {
    /// Defaults overridden by `FPEXHAUST_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = lookup("FPEXHAUST_PLATFORM") {
            config.platform = v.parse()?;
        }
        if let Some(v) = lookup("FPEXHAUST_SEED") {
            config.seed = parse_u64("FPEXHAUST_SEED", &v)?;
        }
        if let Some(v) = lookup("FPEXHAUST_NO_F64") {
            config.backend_supports_f64 = !parse_bool("FPEXHAUST_NO_F64", &v)?;
        }
        if let Some(v) = lookup("FPEXHAUST_NORMALS") {
            let n = parse_u64("FPEXHAUST_NORMALS", &v)?;
            config = config.with_normals(n);
        }
        Ok(config)
    }

    /// Set the platform
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Declare whether the backend supports F64
    pub fn with_f64(mut self, supported: bool) -> Self {
        self.backend_supports_f64 = supported;
        self
    }

    /// Restrict registered dtypes
    pub fn with_dtypes(mut self, dtypes: DTypeSet) -> Self {
        self.dtypes = dtypes;
        self
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the tolerance for operations without a dedicated policy
    pub fn with_default_error_spec(mut self, spec: ErrorSpec) -> Self {
        self.default_error_spec = spec;
        self
    }

    /// Replace the plan for `dtype`
    pub fn with_plan(mut self, dtype: DType, plan: SuitePlan) -> Self {
        self.plans.insert(dtype, plan);
        self
    }

    /// Set the normal sample count for every dtype
    pub fn with_normals(mut self, normals: u64) -> Self {
        for dtype in DType::ALL {
            let plan = self.plan_for(dtype).with_normals(normals);
            self.plans.insert(dtype, plan);
        }
        self
    }

    /// Set the extreme-magnitude sizes for every dtype
    pub fn with_extremes(mut self, total: u64, group: u64) -> Self {
        for dtype in DType::ALL {
            let plan = self.plan_for(dtype).with_extremes(total, group);
            self.plans.insert(dtype, plan);
        }
        self
    }

    /// Set the known-incorrect substitution
    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    /// Set how many mismatches each failing suite logs
    pub fn with_max_logged_mismatches(mut self, n: usize) -> Self {
        self.max_logged_mismatches = n;
        self
    }

    /// Effective plan for `dtype`
    pub fn plan_for(&self, dtype: DType) -> SuitePlan {
        self.plans
            .get(&dtype)
            .copied()
            .unwrap_or_else(|| SuitePlan::for_dtype(dtype))
    }

    /// Dtypes that will actually be registered
    pub fn enabled_dtypes(&self) -> impl Iterator<Item = DType> + '_ {
        DType::ALL.into_iter().filter(move |&dtype| {
            self.dtypes.contains(dtype)
                && dtype.is_enabled()
                && (dtype != DType::F64 || self.backend_supports_f64)
        })
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    let v = value.trim();
    let parsed = match v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => v.parse(),
    };
    parsed.map_err(|e| Error::invalid_config(key, value, e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::invalid_config(key, value, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.platform, Platform::Cpu);
        assert!(config.backend_supports_f64);
        assert_eq!(config.default_error_spec, ErrorSpec::default());
        assert_eq!(config.plan_for(DType::F64), SuitePlan::for_dtype(DType::F64));
        let dtypes: Vec<_> = config.enabled_dtypes().collect();
        assert!(dtypes.contains(&DType::F32) && dtypes.contains(&DType::F64));
    }

    #[test]
    fn test_from_lookup() {
        let config = HarnessConfig::from_lookup(lookup(&[
            ("FPEXHAUST_PLATFORM", "gpu"),
            ("FPEXHAUST_SEED", "0x10"),
            ("FPEXHAUST_NO_F64", "1"),
            ("FPEXHAUST_NORMALS", "64"),
        ]))
        .unwrap();
        assert_eq!(config.platform, Platform::Gpu);
        assert_eq!(config.seed, 16);
        assert!(!config.backend_supports_f64);
        assert_eq!(config.plan_for(DType::F32).normals, 64);
        assert_eq!(config.plan_for(DType::F64).normals, 64);
        assert!(!config.enabled_dtypes().any(|d| d == DType::F64));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = HarnessConfig::from_lookup(lookup(&[("FPEXHAUST_SEED", "abc")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(HarnessConfig::from_lookup(lookup(&[("FPEXHAUST_NO_F64", "maybe")])).is_err());
        assert!(HarnessConfig::from_lookup(lookup(&[("FPEXHAUST_PLATFORM", "tpu")])).is_err());
    }

    #[test]
    fn test_builders() {
        let config = HarnessConfig::default()
            .with_extremes(40, 8)
            .with_plan(DType::F32, SuitePlan::for_dtype(DType::F32).with_normals(3))
            .with_dtypes(DTypeSet::single(DType::F32));
        assert_eq!(config.plan_for(DType::F32).normals, 3);
        assert_eq!(config.plan_for(DType::F64).extreme_total, 40);
        assert_eq!(config.enabled_dtypes().collect::<Vec<_>>(), vec![DType::F32]);
    }
}
