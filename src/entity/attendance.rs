//! Attendance record: one check-in/check-out pair for an employee on a calendar date.

use crate::entity::{merge_field, Column, PgQueryAs, Resource};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub employee_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePatch {
    pub employee_id: Option<i64>,
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_wall_clock")]
    pub check_in_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "deserialize_wall_clock")]
    pub check_out_time: Option<NaiveTime>,
}

/// Parse a wall-clock time without timezone: `HH:MM:SS`, `HH:MM:SS.fff` or `HH:MM`.
pub fn parse_wall_clock(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("invalid time '{}': expected HH:MM or HH:MM:SS", s))
}

fn deserialize_wall_clock<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse_wall_clock(&s).map_err(serde::de::Error::custom))
        .transpose()
}

impl Resource for Attendance {
    type Patch = AttendancePatch;

    const NAME: &'static str = "Attendance";
    const PATH: &'static str = "attendance";
    const TABLE: &'static str = "attendances";
    const COLUMNS: &'static [Column] = &[
        Column::new("employee_id", "BIGINT"),
        Column::new("date", "DATE"),
        Column::new("check_in_time", "TIME"),
        Column::new("check_out_time", "TIME"),
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn from_patch(patch: AttendancePatch) -> Self {
        Attendance {
            id: 0,
            employee_id: patch.employee_id,
            date: patch.date,
            check_in_time: patch.check_in_time,
            check_out_time: patch.check_out_time,
        }
    }

    fn merge(&mut self, patch: AttendancePatch) {
        merge_field(&mut self.employee_id, patch.employee_id);
        merge_field(&mut self.date, patch.date);
        merge_field(&mut self.check_in_time, patch.check_in_time);
        merge_field(&mut self.check_out_time, patch.check_out_time);
    }

    fn bind_columns<'q, O>(&self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(self.employee_id)
            .bind(self.date)
            .bind(self.check_in_time)
            .bind(self.check_out_time)
    }
}
