//! Account roles and the permission predicates derived from them.
//!
//! Role names must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_SUPERADMIN: &str = "superadmin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TRAINER: &str = "trainer";
pub const ROLE_LEARNER: &str = "learner";

/// All valid role names, most privileged first.
pub const VALID_ROLES: &[&str] = &[ROLE_SUPERADMIN, ROLE_ADMIN, ROLE_TRAINER, ROLE_LEARNER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Trainer,
    Learner,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => ROLE_SUPERADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Trainer => ROLE_TRAINER,
            Role::Learner => ROLE_LEARNER,
        }
    }

    /// Admins and superadmins manage accounts and may edit any course.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Superadmin | Role::Admin)
    }

    /// Trainers and above may author courses.
    pub fn can_author_courses(self) -> bool {
        self != Role::Learner
    }

    /// Whether a user with this role may hand out `target`.
    ///
    /// Only superadmins create other admins or superadmins.
    pub fn can_grant(self, target: Role) -> bool {
        match target {
            Role::Superadmin | Role::Admin => self == Role::Superadmin,
            Role::Trainer | Role::Learner => self.is_admin(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_SUPERADMIN => Ok(Role::Superadmin),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_TRAINER => Ok(Role::Trainer),
            ROLE_LEARNER => Ok(Role::Learner),
            other => Err(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            )),
        }
    }
}

/// Whether `actor` may edit a course owned by `owner_id`.
pub fn can_edit_course(actor_id: i64, actor_role: Role, owner_id: i64) -> bool {
    actor_role.is_admin() || (actor_role == Role::Trainer && actor_id == owner_id)
}
