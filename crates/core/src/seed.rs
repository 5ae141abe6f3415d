//! Fixed demo accounts for local development.
//!
//! The `lms-seed` binary wipes the `users` table and inserts exactly these
//! four accounts, one per role, all sharing [`DEMO_PASSWORD`].

use crate::roles::Role;

/// Placeholder password shared by every demo account. Development only.
pub const DEMO_PASSWORD: &str = "password123";

/// A demo account definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub name: &'static str,
    pub email: &'static str,
    pub role: Role,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 4] = [
    DemoAccount {
        name: "Super Admin",
        email: "superadmin@lms.local",
        role: Role::Superadmin,
    },
    DemoAccount {
        name: "Admin User",
        email: "admin@lms.local",
        role: Role::Admin,
    },
    DemoAccount {
        name: "Trainer User",
        email: "trainer@lms.local",
        role: Role::Trainer,
    },
    DemoAccount {
        name: "Learner User",
        email: "learner@lms.local",
        role: Role::Learner,
    },
];
