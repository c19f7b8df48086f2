//! Employee record.

use crate::entity::{merge_field, Column, PgQueryAs, Resource};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
}

impl Resource for Employee {
    type Patch = EmployeePatch;

    const NAME: &'static str = "Employee";
    const PATH: &'static str = "employees";
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "TEXT"),
        Column::new("designation", "TEXT"),
        Column::new("department", "TEXT"),
        Column::new("salary", "DOUBLE PRECISION"),
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn from_patch(patch: EmployeePatch) -> Self {
        Employee {
            id: 0,
            name: patch.name,
            designation: patch.designation,
            department: patch.department,
            salary: patch.salary,
        }
    }

    fn merge(&mut self, patch: EmployeePatch) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.designation, patch.designation);
        merge_field(&mut self.department, patch.department);
        merge_field(&mut self.salary, patch.salary);
    }

    fn bind_columns<'q, O>(&self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(self.name.clone())
            .bind(self.designation.clone())
            .bind(self.department.clone())
            .bind(self.salary)
    }
}
