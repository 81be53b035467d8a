//! Target platform tags
//!
//! The platform only selects among tolerance-policy variants and decides which
//! suites are disabled. It never changes reference mathematics.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Coarse class of the device executing the operation under test
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    /// Host CPU backend
    #[default]
    Cpu,
    /// GPU backends (CUDA, ROCm, ...)
    Gpu,
    /// Anything else (accelerators, interpreters)
    Other,
}

impl Platform {
    /// Classify a backend platform name
    ///
    /// `"cpu"` and `"host"` are CPU; `"gpu"`, `"cuda"` and `"rocm"` are GPU;
    /// every other name is [`Platform::Other`]. Matching is case-insensitive.
    pub fn from_backend_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "cpu" | "host" => Self::Cpu,
            "gpu" | "cuda" | "rocm" => Self::Gpu,
            _ => Self::Other,
        }
    }

    /// Short lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = Error;

    /// Strict parse: accepts only backend names known to [`Platform::from_backend_name`]
    /// or the literal `"other"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_backend_name(s) {
            Self::Other if !s.eq_ignore_ascii_case("other") => Err(Error::invalid_config(
                "platform",
                s,
                "expected one of cpu, host, gpu, cuda, rocm, other",
            )),
            platform => Ok(platform),
        }
    }
}
