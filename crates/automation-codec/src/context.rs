//! Configuration tables the codec consults
//!
//! Both tables belong to the surrounding configuration, not to the codec.
//! An empty table disables the checks that depend on it.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};

/// Fingerprint user and the fingers enrolled for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessUserEntry {
    pub id: u8,
    /// Bit `i` set means finger `i + 1` is enrolled
    #[serde(default)]
    pub fingers: u16,
}

impl AccessUserEntry {
    #[must_use]
    pub fn new(id: u8, fingers: u16) -> Self {
        Self { id, fingers }
    }

    /// Whether finger (1-based) is enrolled
    #[must_use]
    pub fn has_finger(&self, finger: u8) -> bool {
        matches!(finger, 1..=16) && self.fingers & (1 << (finger - 1)) != 0
    }

    /// Enrolled fingers, ascending
    pub fn enrolled_fingers(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=16).filter(|&finger| self.has_finger(finger))
    }
}

/// Lookup tables passed explicitly to decode and validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecContext {
    /// Maximum value per counter, indexed by zero-based counter slot
    #[serde(default)]
    pub counter_limits: Vec<u8>,
    #[serde(default)]
    pub access_users: Vec<AccessUserEntry>,
}

impl CodecContext {
    /// User id meaning "any enrolled user"
    pub const ANY_USER: u8 = 255;

    #[must_use]
    pub fn new(counter_limits: Vec<u8>, access_users: Vec<AccessUserEntry>) -> Self {
        Self {
            counter_limits,
            access_users,
        }
    }

    /// Configured maximum of a counter (1-based)
    #[must_use]
    pub fn counter_limit(&self, counter: u8) -> Option<u8> {
        let slot = usize::from(counter.checked_sub(1)?);
        self.counter_limits.get(slot).copied()
    }

    #[must_use]
    pub fn access_user(&self, id: u8) -> Option<&AccessUserEntry> {
        self.access_users.iter().find(|user| user.id == id)
    }

    /// Reject a counter value above the configured maximum
    pub fn check_counter(&self, counter: u8, value: u8) -> Result<(), CodecError> {
        match self.counter_limit(counter) {
            Some(max) if value > max => Err(CodecError::CounterLimit {
                counter,
                value,
                max,
            }),
            _ => Ok(()),
        }
    }

    /// Reject a finger that is not enrolled for the user.
    ///
    /// Passes when no user table is configured. The "any user" sentinel
    /// carries no finger selection.
    pub fn check_finger(&self, user: u8, finger: u8) -> Result<(), CodecError> {
        if user == Self::ANY_USER {
            return Err(CodecError::out_of_range("finger", finger, 0, 0));
        }
        if self.access_users.is_empty() {
            return Ok(());
        }
        match self.access_user(user) {
            Some(entry) if entry.has_finger(finger) => Ok(()),
            _ => Err(CodecError::FingerNotEnrolled { user, finger }),
        }
    }
}
