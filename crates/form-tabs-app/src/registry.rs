//! Page-wide capability flags
//!
//! Some listeners must be installed once per page load no matter how many
//! tab panels mount. The registry is owned by the page: flags are set by the
//! first panel that needs the capability and cleared on page teardown (or
//! when the capability consumes itself).

use std::collections::BTreeMap;

/// Capabilities guarded by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Before-navigate / navigate-start listeners that retain tab position
    NavigationListener,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::NavigationListener => "tabsListenerRegistered",
        }
    }
}

#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    flags: BTreeMap<Capability, bool>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag if unset; returns `true` only for the caller that set it
    pub fn try_register(&mut self, capability: Capability) -> bool {
        let flag = self.flags.entry(capability).or_insert(false);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    pub fn is_registered(&self, capability: Capability) -> bool {
        self.flags.get(&capability).copied().unwrap_or(false)
    }

    pub fn clear(&mut self, capability: Capability) {
        self.flags.remove(&capability);
    }

    /// Clear every flag (full page teardown)
    pub fn teardown(&mut self) {
        self.flags.clear();
    }
}
