//! Payroll record. `net_salary` is stored as supplied and never derived from the other amounts.

use crate::entity::{merge_field, Column, PgQueryAs, Resource};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    pub id: i64,
    pub employee_id: Option<i64>,
    pub basic_pay: Option<f64>,
    pub bonus: Option<f64>,
    pub deductions: Option<f64>,
    pub net_salary: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPatch {
    pub employee_id: Option<i64>,
    pub basic_pay: Option<f64>,
    pub bonus: Option<f64>,
    pub deductions: Option<f64>,
    pub net_salary: Option<f64>,
}

impl Resource for Payroll {
    type Patch = PayrollPatch;

    const NAME: &'static str = "Payroll";
    const PATH: &'static str = "payroll";
    const TABLE: &'static str = "payrolls";
    const COLUMNS: &'static [Column] = &[
        Column::new("employee_id", "BIGINT"),
        Column::new("basic_pay", "DOUBLE PRECISION"),
        Column::new("bonus", "DOUBLE PRECISION"),
        Column::new("deductions", "DOUBLE PRECISION"),
        Column::new("net_salary", "DOUBLE PRECISION"),
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn from_patch(patch: PayrollPatch) -> Self {
        Payroll {
            id: 0,
            employee_id: patch.employee_id,
            basic_pay: patch.basic_pay,
            bonus: patch.bonus,
            deductions: patch.deductions,
            net_salary: patch.net_salary,
        }
    }

    fn merge(&mut self, patch: PayrollPatch) {
        merge_field(&mut self.employee_id, patch.employee_id);
        merge_field(&mut self.basic_pay, patch.basic_pay);
        merge_field(&mut self.bonus, patch.bonus);
        merge_field(&mut self.deductions, patch.deductions);
        merge_field(&mut self.net_salary, patch.net_salary);
    }

    fn bind_columns<'q, O>(&self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(self.employee_id)
            .bind(self.basic_pay)
            .bind(self.bonus)
            .bind(self.deductions)
            .bind(self.net_salary)
    }
}
