use nix::sys::utsname::uname;
use tracing::{trace, warn};

/// Emitted verbatim when a platform property cannot be determined.
pub const UNKNOWN_PROPERTY: &str = "unknown";

/// Descriptive properties of the host, queried once at start up.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformInfo {
    /// Version of the compiler that built this binary.
    pub runtime_version: String,
    /// System name as reported by `uname(2)`, e.g. `Linux`.
    pub os_name: String,
}

impl PlatformInfo {
    pub fn query() -> PlatformInfo {
        let info = PlatformInfo {
            runtime_version: property_or_unknown(option_env!("HELLO_CICD_RUSTC_VERSION")),
            os_name: os_name(),
        };
        trace!(?info, "platform properties");
        info
    }
}

fn os_name() -> String {
    match uname() {
        Ok(uts) => property_or_unknown(uts.sysname().to_str()),
        Err(e) => {
            warn!("uname failed: {e}");
            UNKNOWN_PROPERTY.to_string()
        }
    }
}

fn property_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => UNKNOWN_PROPERTY.to_string(),
    }
}
