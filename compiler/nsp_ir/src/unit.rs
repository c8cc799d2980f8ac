//! Compilation unit identity.

use std::fmt;

/// Opaque identity of one load of a compilation unit.
///
/// The host hands out a fresh id every time it starts loading a unit. The
/// engine records the id of the unit that opened a namespace so that forms
/// and closing declarations coming from some other, unrelated load never
/// touch that namespace.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct UnitId(u32);

impl UnitId {
    /// Create from a raw counter value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        UnitId(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}
