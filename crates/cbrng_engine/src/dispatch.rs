//! Backend detection and selection.
//!
//! CPU capabilities are detected once, on first use, and frozen for the life
//! of the process. Every engine asks [`capabilities`] for its backend, so
//! a given machine always runs the same kernels and callers never branch
//! on instruction set themselves.
//!
//! # Preference Order
//!
//! | Rank | Backend | Serves | Vector width |
//! |------|---------|--------|--------------|
//! | 1 | AES-NI | AES, ARS | 8 interleaved blocks |
//! | 2 | AVX-512F | Philox, Threefry | 512 bits |
//! | 3 | AVX2 | Philox, Threefry | 256 bits |
//! | 4 | SSE2 | Philox, Threefry | 128 bits |
//! | 5 | Generic | all | scalar |
//!
//! Selection depends on hardware support only, never on request size.
//!
//! # Environment Override
//!
//! `CBRNG_BACKEND` (`generic`, `sse2`, `avx2`, `avx512`, `aesni`) names the
//! backend to use for every algorithm it can serve. It is read once at
//! detection; names the CPU cannot run are ignored with a warning.

use cbrng_core::kernels::Family;
use cbrng_core::CbrngError;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Environment variable naming a backend to prefer.
pub const BACKEND_ENV: &str = "CBRNG_BACKEND";

/// Instruction-set backend of a kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BackendKind {
    /// Portable word-at-a-time kernels.
    Generic,
    /// 128-bit SSE2 lanes.
    Sse2,
    /// 256-bit AVX2 lanes.
    Avx2,
    /// 512-bit AVX-512F lanes.
    Avx512,
    /// AES-NI round instructions.
    AesNi,
}

impl BackendKind {
    /// Every backend, most specialised first.
    pub const PREFERENCE: [BackendKind; 5] = [
        BackendKind::AesNi,
        BackendKind::Avx512,
        BackendKind::Avx2,
        BackendKind::Sse2,
        BackendKind::Generic,
    ];

    /// Lower-case name, as accepted by [`BACKEND_ENV`].
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Sse2 => "sse2",
            Self::Avx2 => "avx2",
            Self::Avx512 => "avx512",
            Self::AesNi => "aesni",
        }
    }

    /// Returns `true` if this backend has kernels for `family`.
    #[inline]
    pub const fn serves(self, family: Family) -> bool {
        match self {
            Self::Generic => true,
            Self::Sse2 | Self::Avx2 | Self::Avx512 => {
                matches!(family, Family::Philox | Family::Threefry)
            }
            Self::AesNi => matches!(family, Family::Aes | Family::Ars),
        }
    }

    /// Register width in bytes, `None` for the scalar and AES-NI paths.
    #[inline]
    pub const fn vector_bytes(self) -> Option<usize> {
        match self {
            Self::Sse2 => Some(16),
            Self::Avx2 => Some(32),
            Self::Avx512 => Some(64),
            Self::Generic | Self::AesNi => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = CbrngError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "scalar" => Ok(Self::Generic),
            "sse2" => Ok(Self::Sse2),
            "avx2" => Ok(Self::Avx2),
            "avx512" | "avx512f" => Ok(Self::Avx512),
            "aesni" | "aes-ni" | "aes" => Ok(Self::AesNi),
            other => Err(CbrngError::InvalidConfig(format!(
                "unknown backend '{}'",
                other
            ))),
        }
    }
}

/// CPU features relevant to the kernels, detected once per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    sse2: bool,
    avx2: bool,
    avx512f: bool,
    aes: bool,
    preferred: Option<BackendKind>,
}

impl Capabilities {
    /// Capabilities of a machine with no vector support.
    pub const fn scalar_only() -> Self {
        Self {
            sse2: false,
            avx2: false,
            avx512f: false,
            aes: false,
            preferred: None,
        }
    }

    /// Queries the running CPU, ignoring any environment override.
    #[cold]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Self {
                sse2: is_x86_feature_detected!("sse2"),
                avx2: is_x86_feature_detected!("avx2"),
                avx512f: is_x86_feature_detected!("avx512f"),
                aes: is_x86_feature_detected!("aes") && is_x86_feature_detected!("sse2"),
                preferred: None,
            }
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            Self::scalar_only()
        }
    }

    /// Applies a backend preference; unsupported backends are ignored.
    pub fn with_preference(mut self, preferred: Option<BackendKind>) -> Self {
        self.preferred = preferred.filter(|&kind| self.supports(kind));
        self
    }

    /// Returns `true` if the CPU can execute `kind`.
    #[inline]
    pub fn supports(&self, kind: BackendKind) -> bool {
        match kind {
            BackendKind::Generic => true,
            BackendKind::Sse2 => self.sse2,
            BackendKind::Avx2 => self.avx2,
            BackendKind::Avx512 => self.avx512f,
            BackendKind::AesNi => self.aes,
        }
    }

    /// The preferred backend, if one was requested and is supported.
    #[inline]
    pub fn preferred(&self) -> Option<BackendKind> {
        self.preferred
    }

    /// Backends this CPU can run for `family`, most specialised first.
    pub fn available(&self, family: Family) -> Vec<BackendKind> {
        BackendKind::PREFERENCE
            .into_iter()
            .filter(|&kind| kind.serves(family) && self.supports(kind))
            .collect()
    }

    /// The backend engines for `family` use by default.
    pub fn select(&self, family: Family) -> BackendKind {
        if let Some(kind) = self.preferred.filter(|kind| kind.serves(family)) {
            return kind;
        }
        BackendKind::PREFERENCE
            .into_iter()
            .find(|&kind| kind.serves(family) && self.supports(kind))
            .unwrap_or(BackendKind::Generic)
    }
}

static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

/// Process-wide capabilities.
///
/// The first call inspects the CPU and reads [`BACKEND_ENV`]; later calls
/// return the cached result. Racing first calls compute the same value.
#[inline]
pub fn capabilities() -> &'static Capabilities {
    CAPABILITIES.get_or_init(detect_uncached)
}

/// Shorthand for `capabilities().select(family)`.
#[inline]
pub fn select_backend(family: Family) -> BackendKind {
    capabilities().select(family)
}

#[cold]
fn detect_uncached() -> Capabilities {
    let requested = std::env::var(BACKEND_ENV).ok();
    let caps = resolve_override(Capabilities::detect(), requested.as_deref());
    tracing::info!(
        sse2 = caps.sse2,
        avx2 = caps.avx2,
        avx512f = caps.avx512f,
        aes = caps.aes,
        preferred = ?caps.preferred,
        "detected CPU capabilities"
    );
    caps
}

/// Applies a [`BACKEND_ENV`] value to detected capabilities. Values that do
/// not parse, or name a backend the CPU lacks, are logged and ignored.
fn resolve_override(detected: Capabilities, requested: Option<&str>) -> Capabilities {
    let preferred = match requested.map(str::parse::<BackendKind>) {
        None => None,
        Some(Ok(kind)) if detected.supports(kind) => Some(kind),
        Some(Ok(kind)) => {
            tracing::warn!(backend = %kind, "requested backend not supported by this CPU, ignoring");
            None
        }
        Some(Err(err)) => {
            tracing::warn!(error = %err, "ignoring {}", BACKEND_ENV);
            None
        }
    };
    detected.with_preference(preferred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Capabilities {
        Capabilities {
            sse2: true,
            avx2: true,
            avx512f: true,
            aes: true,
            preferred: None,
        }
    }

    #[test]
    fn test_capabilities_are_cached() {
        let first = capabilities() as *const Capabilities;
        let second = capabilities() as *const Capabilities;
        assert_eq!(first, second);
    }

    #[test]
    fn test_preference_order_full_cpu() {
        let caps = full();
        assert_eq!(caps.select(Family::Aes), BackendKind::AesNi);
        assert_eq!(caps.select(Family::Ars), BackendKind::AesNi);
        assert_eq!(caps.select(Family::Philox), BackendKind::Avx512);
        assert_eq!(caps.select(Family::Threefry), BackendKind::Avx512);
    }

    #[test]
    fn test_scalar_only_selects_generic() {
        let caps = Capabilities::scalar_only();
        for family in [Family::Philox, Family::Threefry, Family::Aes, Family::Ars] {
            assert_eq!(caps.select(family), BackendKind::Generic);
            assert_eq!(caps.available(family), vec![BackendKind::Generic]);
        }
    }

    #[test]
    fn test_partial_cpu_falls_back() {
        let caps = Capabilities {
            avx512f: false,
            aes: false,
            ..full()
        };
        assert_eq!(caps.select(Family::Philox), BackendKind::Avx2);
        assert_eq!(caps.select(Family::Aes), BackendKind::Generic);
        assert_eq!(
            caps.available(Family::Threefry),
            vec![BackendKind::Avx2, BackendKind::Sse2, BackendKind::Generic]
        );
    }

    #[test]
    fn test_preference_applies_only_where_it_serves() {
        let caps = full().with_preference(Some(BackendKind::Sse2));
        assert_eq!(caps.select(Family::Philox), BackendKind::Sse2);
        assert_eq!(caps.select(Family::Aes), BackendKind::AesNi);

        let caps = full().with_preference(Some(BackendKind::Generic));
        assert_eq!(caps.select(Family::Aes), BackendKind::Generic);
    }

    #[test]
    fn test_unsupported_preference_is_dropped() {
        let caps = Capabilities::scalar_only().with_preference(Some(BackendKind::Avx2));
        assert_eq!(caps.preferred(), None);
    }

    #[test]
    fn test_override_absent_keeps_default_order() {
        let caps = resolve_override(full(), None);
        assert_eq!(caps.preferred(), None);
        assert_eq!(caps.select(Family::Philox), BackendKind::Avx512);
    }

    #[test]
    fn test_override_valid_value() {
        let caps = resolve_override(full(), Some("avx2"));
        assert_eq!(caps.preferred(), Some(BackendKind::Avx2));
        assert_eq!(caps.select(Family::Threefry), BackendKind::Avx2);
        // AES families are not served by AVX2 and keep AES-NI.
        assert_eq!(caps.select(Family::Ars), BackendKind::AesNi);

        let caps = resolve_override(full(), Some("aesni"));
        assert_eq!(caps.select(Family::Aes), BackendKind::AesNi);
        assert_eq!(caps.select(Family::Philox), BackendKind::Avx512);
    }

    #[test]
    fn test_override_unknown_value_is_ignored() {
        let caps = resolve_override(full(), Some("neon"));
        assert_eq!(caps, full());
        let caps = resolve_override(full(), Some(""));
        assert_eq!(caps.preferred(), None);
    }

    #[test]
    fn test_override_unsupported_value_is_ignored() {
        let detected = Capabilities {
            avx512f: false,
            ..full()
        };
        let caps = resolve_override(detected, Some("avx512"));
        assert_eq!(caps.preferred(), None);
        assert_eq!(caps.select(Family::Philox), BackendKind::Avx2);

        let caps = resolve_override(Capabilities::scalar_only(), Some("aesni"));
        assert_eq!(caps.select(Family::Aes), BackendKind::Generic);
    }

    #[test]
    fn test_backend_parse_and_display() {
        for kind in BackendKind::PREFERENCE {
            assert_eq!(kind.as_str().parse::<BackendKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert!("neon".parse::<BackendKind>().is_err());
        assert_eq!(" AVX2 ".parse::<BackendKind>().unwrap(), BackendKind::Avx2);
    }

    #[test]
    fn test_serves() {
        assert!(BackendKind::Generic.serves(Family::Ars));
        assert!(!BackendKind::AesNi.serves(Family::Philox));
        assert!(!BackendKind::Avx2.serves(Family::Aes));
        assert_eq!(BackendKind::Avx512.vector_bytes(), Some(64));
    }
}
