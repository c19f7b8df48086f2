//! User account. The password arrives in plaintext on create/update, is stored only as an
//! Argon2 hash, and is never serialized back to clients.

use crate::entity::{merge_field, Column, PgQueryAs, Resource};
use crate::error::AppError;
use crate::password::hash_password;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

/// `password` is plaintext from the client; [`Resource::prepare`] moves it into
/// `password_hash` so nothing downstream sees the plaintext.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
}

impl fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPatch")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Resource for User {
    type Patch = UserPatch;

    const NAME: &'static str = "User";
    const PATH: &'static str = "users";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "TEXT"),
        Column::new("email", "TEXT"),
        Column::new("role", "TEXT"),
        Column::new("password_hash", "TEXT"),
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    /// Argon2 is slow on purpose; it runs here, outside any row or table lock.
    fn prepare(mut patch: UserPatch) -> Result<UserPatch, AppError> {
        if let Some(password) = patch.password.take() {
            patch.password_hash = Some(hash_password(&password)?);
        }
        Ok(patch)
    }

    fn from_patch(patch: UserPatch) -> Self {
        User {
            id: 0,
            name: patch.name,
            email: patch.email,
            role: patch.role,
            password_hash: patch.password_hash,
        }
    }

    fn merge(&mut self, patch: UserPatch) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.email, patch.email);
        merge_field(&mut self.role, patch.role);
        merge_field(&mut self.password_hash, patch.password_hash);
    }

    fn bind_columns<'q, O>(&self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(self.name.clone())
            .bind(self.email.clone())
            .bind(self.role.clone())
            .bind(self.password_hash.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;

    fn patch(json: &str) -> UserPatch {
        serde_json::from_str(json).unwrap()
    }

    fn prepared(json: &str) -> UserPatch {
        User::prepare(patch(json)).unwrap()
    }

    #[test]
    fn password_is_hashed_and_hidden() {
        let user = User::from_patch(prepared(
            r#"{"name":"Ana","email":"ana@example.com","role":"ADMIN","password":"hunter2"}"#,
        ));
        let hash = user.password_hash.clone().unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));

        let body = serde_json::to_string(&user).unwrap();
        assert!(!body.contains("password"));
        assert!(!body.contains("hunter2"));
    }

    #[test]
    fn merge_without_password_keeps_hash() {
        let mut user = User::from_patch(prepared(r#"{"name":"Ana","password":"hunter2"}"#));
        let before = user.password_hash.clone();
        user.merge(prepared(r#"{"role":"HR","password":null}"#));
        assert_eq!(user.role.as_deref(), Some("HR"));
        assert_eq!(user.password_hash, before);
    }

    #[test]
    fn merge_with_password_rehashes() {
        let mut user = User::from_patch(prepared(r#"{"password":"old"}"#));
        user.merge(prepared(r#"{"password":"new"}"#));
        let hash = user.password_hash.unwrap();
        assert!(verify_password("new", &hash));
        assert!(!verify_password("old", &hash));
    }

    #[test]
    fn prepare_replaces_plaintext_with_hash() {
        let p = prepared(r#"{"password":"hunter2"}"#);
        assert!(p.password.is_none());
        assert!(verify_password("hunter2", p.password_hash.as_deref().unwrap()));

        let untouched = prepared(r#"{"name":"Ana"}"#);
        assert_eq!(untouched, patch(r#"{"name":"Ana"}"#));
    }

    #[test]
    fn merge_copies_the_prepared_hash_without_rehashing() {
        let p = prepared(r#"{"password":"hunter2"}"#);
        let mut a = User::default();
        let mut b = User::default();
        a.merge(p.clone());
        b.merge(p.clone());
        assert_eq!(a.password_hash, p.password_hash);
        assert_eq!(b.password_hash, p.password_hash);
    }

    #[test]
    fn unprepared_plaintext_never_reaches_the_row() {
        let mut user = User::default();
        user.merge(patch(r#"{"password":"hunter2"}"#));
        assert!(user.password_hash.is_none());
    }

    #[test]
    fn debug_redacts_password() {
        let p = patch(r#"{"name":"Ana","password":"hunter2"}"#);
        let out = format!("{:?}", p);
        assert!(!out.contains("hunter2"));
        assert!(out.contains("<redacted>"));
    }
}
