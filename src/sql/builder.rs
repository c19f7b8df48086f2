//! Builds parameterized DDL, INSERT, SELECT, UPDATE, DELETE for a resource table.
//! Identifiers come from the resource definitions and the validated schema name only;
//! every value is a `$n` placeholder bound through [`Resource::bind_columns`].

use crate::entity::Resource;

/// Identity column shared by every resource table.
pub const ID_COLUMN: &str = "id";

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table<E: Resource>(schema: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(E::TABLE))
}

/// `"id", "col1", ...` in the order rows are decoded.
fn select_column_list<E: Resource>() -> String {
    std::iter::once(ID_COLUMN)
        .chain(E::COLUMNS.iter().map(|c| c.name))
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

/// CREATE TABLE IF NOT EXISTS with a BIGSERIAL identity and nullable value columns.
pub fn create_table<E: Resource>(schema: &str) -> String {
    let mut defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted(ID_COLUMN))];
    defs.extend(
        E::COLUMNS
            .iter()
            .map(|c| format!("{} {}", quoted(c.name), c.sql_type)),
    );
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        qualified_table::<E>(schema),
        defs.join(", ")
    )
}

/// SELECT every row in identity order.
pub fn select_all<E: Resource>(schema: &str) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list::<E>(),
        qualified_table::<E>(schema),
        quoted(ID_COLUMN)
    )
}

/// SELECT by id ($1). With `for_update` the row stays locked until the transaction ends.
pub fn select_by_id<E: Resource>(schema: &str, for_update: bool) -> String {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list::<E>(),
        qualified_table::<E>(schema),
        quoted(ID_COLUMN)
    );
    if for_update {
        sql.push_str(" FOR UPDATE");
    }
    sql
}

/// INSERT all value columns ($1..$n); the store assigns the id.
pub fn insert<E: Resource>(schema: &str) -> String {
    let cols: Vec<String> = E::COLUMNS.iter().map(|c| quoted(c.name)).collect();
    let placeholders: Vec<String> = (1..=cols.len()).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        qualified_table::<E>(schema),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list::<E>()
    )
}

/// UPDATE all value columns ($1..$n) of the row whose id is $n+1.
pub fn update<E: Resource>(schema: &str) -> String {
    let sets: Vec<String> = E::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", quoted(c.name), i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        qualified_table::<E>(schema),
        sets.join(", "),
        quoted(ID_COLUMN),
        E::COLUMNS.len() + 1,
        select_column_list::<E>()
    )
}

/// DELETE by id ($1), returning the deleted id.
pub fn delete<E: Resource>(schema: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1 RETURNING {}",
        qualified_table::<E>(schema),
        quoted(ID_COLUMN),
        quoted(ID_COLUMN)
    )
}
