//! Compiler version pin.
//!
//! The toolchain must invoke one exact compiler release so compiled output is
//! identical across environments. Anything that reads like a requirement
//! (`^0.8.0`, `>=0.8`, `0.8.x`) is refused.

use crate::error::ConfigError;
use semver::Version;

pub(crate) const FIELD: &str = "compilerVersion";

/// Characters that only appear in version requirements, never in an exact version.
const RANGE_MARKERS: &[char] = &['^', '~', '>', '<', '=', '*', '|', ','];

/// Parse an exact `MAJOR.MINOR.PATCH` compiler version.
pub fn parse_compiler_version(raw: &str) -> Result<Version, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::schema(FIELD, "version string is empty"));
    }

    if raw.contains(RANGE_MARKERS) || is_wildcard(raw) {
        return Err(ConfigError::schema(
            FIELD,
            format!("`{raw}` is a version range; pin an exact version such as 0.8.18"),
        ));
    }

    Version::parse(raw).map_err(|e| {
        ConfigError::schema(FIELD, format!("`{raw}` is not an exact semantic version: {e}"))
    })
}

/// `x`/`X` components in `MAJOR.MINOR.PATCH`. Pre-release and build
/// identifiers may legitimately be `x`.
fn is_wildcard(raw: &str) -> bool {
    let core = raw.split(['-', '+']).next().unwrap_or(raw);
    core.split('.').any(|part| part.eq_ignore_ascii_case("x"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_version() {
        assert_eq!(
            parse_compiler_version("0.8.18").unwrap(),
            Version::new(0, 8, 18)
        );
    }

    #[test]
    fn test_prerelease_is_exact() {
        let v = parse_compiler_version("0.8.25-nightly.2024.3.1").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (0, 8, 25));
        assert!(!v.pre.is_empty());
    }

    #[test]
    fn test_ranges_rejected() {
        for raw in ["^0.8.18", "~0.8.18", ">=0.8.0", "0.8.x", "*", "0.8.0 || 0.7.6", "=0.8.18"] {
            let err = parse_compiler_version(raw).unwrap_err();
            assert!(err.is_schema(), "{raw} should be rejected");
            assert_eq!(err.field(), Some("compilerVersion"));
        }
    }

    #[test]
    fn test_x_in_prerelease_is_exact() {
        let v = parse_compiler_version("1.0.0-alpha.x").unwrap();
        assert_eq!(v.pre.as_str(), "alpha.x");
        assert!(parse_compiler_version("1.0.0+build.X").is_ok());
    }

    #[test]
    fn test_whitespace_rejected() {
        for raw in ["\t0.8.18\n", " 0.8.18", "0.8.18 "] {
            let err = parse_compiler_version(raw).unwrap_err();
            assert_eq!(err.field(), Some("compilerVersion"), "{raw:?}");
        }
    }

    #[test]
    fn test_partial_and_garbage_rejected() {
        assert!(parse_compiler_version("0.8").is_err());
        assert!(parse_compiler_version("v0.8.18").is_err());
        assert!(parse_compiler_version("latest").is_err());
        assert!(parse_compiler_version("").is_err());
    }
}
