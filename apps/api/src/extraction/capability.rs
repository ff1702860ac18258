//! Process-wide backend availability, resolved once at startup.

use once_cell::sync::OnceCell;
use tracing::info;

static CAPABILITIES: OnceCell<Capabilities> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// pdf-extract is compiled in and not switched off by configuration.
    pub primary_pdf: bool,
}

impl Capabilities {
    fn detect(disable_primary_pdf: bool) -> Self {
        Self {
            primary_pdf: cfg!(feature = "pdf-extract") && !disable_primary_pdf,
        }
    }
}

/// Resolves the capability flags. The first call wins; later calls return the
/// already-resolved value.
pub fn init(disable_primary_pdf: bool) -> Capabilities {
    let caps = *CAPABILITIES.get_or_init(|| Capabilities::detect(disable_primary_pdf));
    info!("Primary PDF backend available: {}", caps.primary_pdf);
    caps
}

/// Current capability flags, detecting with defaults if `init` never ran.
pub fn get() -> Capabilities {
    *CAPABILITIES.get_or_init(|| Capabilities::detect(false))
}
