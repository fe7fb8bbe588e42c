use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Attendant,
}

/// Operations guarded by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageProducts,
    RecordSale,
    ViewAllSales,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Attendant => "attendant",
        }
    }

    pub fn permits(self, action: Action) -> bool {
        match (self, action) {
            (Role::Admin, Action::ManageProducts) => true,
            (Role::Admin, Action::ViewAllSales) => true,
            (Role::Admin, Action::RecordSale) => false,
            (Role::Attendant, Action::RecordSale) => true,
            (Role::Attendant, Action::ManageProducts) => false,
            (Role::Attendant, Action::ViewAllSales) => false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "attendant" => Ok(Role::Attendant),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
