//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, national_id::SealedNationalId, user_id::UserId, user_name::UserName,
    user_password::UserPassword,
};

/// A registered user as persisted. The national id is only ever held here
/// in sealed (encrypted) form.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, case-sensitive login handle
    pub user_name: UserName,
    pub email: Email,
    pub password_hash: UserPassword,
    pub national_id: SealedNationalId,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_name: UserName,
        email: Email,
        password_hash: UserPassword,
        national_id: SealedNationalId,
    ) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password_hash,
            national_id,
            created_at: Utc::now(),
        }
    }

    /// The (id, email) pair a token must match to identify this user.
    pub fn is_identified_by(&self, user_id: &UserId, email: &Email) -> bool {
        self.user_id == *user_id && self.email == *email
    }
}
