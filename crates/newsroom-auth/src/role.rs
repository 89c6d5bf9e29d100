//! Role tiers and the authorization policy

use serde::{Deserialize, Serialize};

/// Profile id a registration falls back to when none is given
pub const DEFAULT_PROFILE_ID: i64 = 2;
/// Name used when the default profile row has to be provisioned lazily
pub const DEFAULT_PROFILE_NAME: &str = "Contribuidor";

/// Authorization tier, keyed by profile id in the database
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoleTier {
    Admin,
    Contributor,
}

/// An operation a caller may attempt against a protected resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read a protected listing
    Read,
    /// Create or edit content owned by the caller
    Contribute,
    /// Manage users, categories, states and profiles
    Administer,
}

impl RoleTier {
    /// Profile id this tier is stored under
    pub const fn id(self) -> i64 {
        match self {
            RoleTier::Admin => 1,
            RoleTier::Contributor => 2,
        }
    }

    /// Resolve a profile id to a known tier
    pub fn from_id(id: i64) -> Option<RoleTier> {
        match id {
            1 => Some(RoleTier::Admin),
            2 => Some(RoleTier::Contributor),
            _ => None,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, RoleTier::Admin)
    }

    /// Authorization policy: may this tier perform the given action?
    pub fn allows(self, action: Action) -> bool {
        match action {
            Action::Read | Action::Contribute => true,
            Action::Administer => self.is_admin(),
        }
    }
}
