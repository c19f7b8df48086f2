//! Entities served by the resource services and the merge-patch contract they share.
//!
//! Every entity has a store-assigned `id` and nullable value fields. Requests carry a
//! `Patch`: the same fields, all optional. On create the patch becomes the new row; on
//! update only the fields the patch carries overwrite the stored row. A field that is
//! omitted and a field sent as `null` both leave the stored value unchanged.

pub mod attendance;
pub mod employee;
pub mod payroll;
pub mod user;

pub use attendance::{Attendance, AttendancePatch};
pub use employee::{Employee, EmployeePatch};
pub use payroll::{Payroll, PayrollPatch};
pub use user::{User, UserPatch};

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use std::fmt::Debug;

/// Typed query whose placeholders are filled by [`Resource::bind_columns`].
pub type PgQueryAs<'q, O> = QueryAs<'q, Postgres, O, PgArguments>;

/// One non-identity column of an entity table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Column { name, sql_type }
    }
}

/// A record type exposed as a CRUD resource.
pub trait Resource:
    Clone + Debug + Serialize + Send + Sync + Unpin + 'static + for<'r> FromRow<'r, PgRow>
{
    /// Request body for create and update.
    type Patch: DeserializeOwned + Debug + Send + 'static;

    /// Display name used in messages, e.g. "Employee".
    const NAME: &'static str;
    /// URL segment, e.g. "employees".
    const PATH: &'static str;
    /// Table name inside the configured schema.
    const TABLE: &'static str;
    /// Non-identity columns, in bind order.
    const COLUMNS: &'static [Column];

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Fallible or expensive work on a request body (e.g. password hashing), done before
    /// any store lock is taken.
    fn prepare(patch: Self::Patch) -> Result<Self::Patch, AppError> {
        Ok(patch)
    }

    /// New unsaved row from a prepared body. The id is left at 0 until the store assigns one.
    fn from_patch(patch: Self::Patch) -> Self;

    /// Overwrite each field the prepared patch carries; leave the rest untouched.
    fn merge(&mut self, patch: Self::Patch);

    /// Bind every column of [`Resource::COLUMNS`] in order.
    fn bind_columns<'q, O>(&self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O>;
}

/// Null-guarded field merge: a present value replaces the target, an absent one is a no-op.
pub fn merge_field<T>(target: &mut Option<T>, incoming: Option<T>) {
    if let Some(value) = incoming {
        *target = Some(value);
    }
}
