use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask of the checkpoints an edit attempt failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditErrorFlags(u8);

impl EditErrorFlags {
    pub const TOKEN: Self = Self(1);
    pub const PERMISSION: Self = Self(1 << 1);
    pub const RATE_LIMIT: Self = Self(1 << 2);
    pub const EDIT_CONFLICT: Self = Self(1 << 3);
    pub const PRECONDITION: Self = Self(1 << 4);
    pub const FILTERED: Self = Self(1 << 5);
    pub const SAVE: Self = Self(1 << 6);
    pub const ANY: Self = Self(0x7f);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::TOKEN, "token"),
        (Self::PERMISSION, "permission"),
        (Self::RATE_LIMIT, "rate-limit"),
        (Self::EDIT_CONFLICT, "edit-conflict"),
        (Self::PRECONDITION, "precondition"),
        (Self::FILTERED, "filtered"),
        (Self::SAVE, "save"),
    ];

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for EditErrorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EditErrorFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Display for EditErrorFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}
