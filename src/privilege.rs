//! Privilege-lowering eligibility.
//!
//! Lowering privileges needs a spawner running as root. This module only
//! answers whether lowering would be attempted; switching users is up to the
//! spawner.

use crate::error::Violation;
use crate::options::SpawnOptions;

/// True if the current process runs with effective uid 0.
pub fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

impl SpawnOptions {
    /// Whether a spawner in this process would lower the application's privileges.
    ///
    /// False if lowering is disabled, or if the process is not root and so
    /// cannot switch users anyway.
    pub fn will_lower_privilege(&self) -> bool {
        self.lower_privilege && running_as_root()
    }

    /// Strict check of the fallback identity used when lowering privilege.
    ///
    /// Not part of [`SpawnOptions::validate`]: a spawner that refuses to fall
    /// back to an empty or `root` identity calls this itself.
    ///
    /// # Errors
    ///
    /// - `LowestUserEmpty` if lowering is enabled and no fallback is set
    /// - `LowestUserIsRoot` if lowering is enabled and the fallback is `root`
    pub fn check_lowering_fallback(&self) -> Result<(), Violation> {
        if !self.lower_privilege {
            return Ok(());
        }
        match self.lowest_user.as_str() {
            "" => Err(Violation::LowestUserEmpty),
            "root" => Err(Violation::LowestUserIsRoot),
            _ => Ok(()),
        }
    }
}
