//! Person store
//!
//! Executes builder-generated fragments against SQLite. Fragments arrive with
//! their own `$N` numbering; this module only appends placeholders at the
//! fragment's `next_index` (pagination, the identity of an update).

use persona_common::{Error, Gender, PersonRecord, Result};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::query::{SqlArg, SqlFragment};

const SELECT_COLUMNS: &str =
    "SELECT id, name, surname, patronymic, age, gender, country FROM persons";

/// Relational store operations used by the person service
#[async_trait::async_trait]
pub trait PersonRepository: Send + Sync {
    async fn create(&self, record: &PersonRecord) -> Result<()>;

    /// Apply `assignments` to the row with `id`; `None` when no such row exists
    async fn update(&self, id: Uuid, assignments: &SqlFragment) -> Result<Option<PersonRecord>>;

    /// `false` when no such row exists
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Rows matching `predicates` (conjoined), ordered by id
    async fn list(
        &self,
        predicates: &SqlFragment,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<PersonRecord>>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<PersonRecord>>;
}

/// SQLite-backed person store
#[derive(Clone)]
pub struct SqlitePersonRepository {
    db: SqlitePool,
}

impl SqlitePersonRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_args<'q>(mut query: SqliteQuery<'q>, args: &[SqlArg]) -> SqliteQuery<'q> {
    for arg in args {
        query = match arg {
            SqlArg::Text(value) => query.bind(value.clone()),
            SqlArg::Integer(value) => query.bind(*value),
        };
    }
    query
}

/// `SELECT` text for a predicate fragment plus pagination, with its full argument list
pub fn list_statement(
    predicates: &SqlFragment,
    limit: Option<u32>,
    offset: Option<u32>,
) -> (String, Vec<SqlArg>) {
    let mut fragment = predicates.clone();
    let mut sql = String::from(SELECT_COLUMNS);

    if !fragment.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&fragment.join(" AND "));
    }
    sql.push_str(" ORDER BY id");

    match (limit, offset) {
        (Some(limit), _) => {
            let placeholder = fragment.bind(limit);
            sql.push_str(&format!(" LIMIT {}", placeholder));
        }
        // SQLite needs a LIMIT before OFFSET; -1 means unbounded
        (None, Some(_)) => sql.push_str(" LIMIT -1"),
        (None, None) => {}
    }
    if let Some(offset) = offset {
        let placeholder = fragment.bind(offset);
        sql.push_str(&format!(" OFFSET {}", placeholder));
    }

    (sql, fragment.args)
}

/// `UPDATE` text for an assignment fragment, with the identity appended at `next_index`
pub fn update_statement(id: Uuid, assignments: &SqlFragment) -> (String, Vec<SqlArg>) {
    let mut fragment = assignments.clone();
    let id_placeholder = fragment.bind(id);
    let sql = format!(
        "UPDATE persons SET {} WHERE id = {}",
        fragment.join(", "),
        id_placeholder
    );
    (sql, fragment.args)
}

fn decode_row(row: &SqliteRow) -> Result<PersonRecord> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| Error::Internal(format!("Invalid person id '{}': {}", id, e)))?;

    let age: i64 = row.try_get("age")?;
    let age = u32::try_from(age)
        .map_err(|_| Error::Internal(format!("Invalid age {} for person {}", age, id)))?;

    let gender: String = row.try_get("gender")?;
    let gender = gender
        .parse::<Gender>()
        .map_err(|e| Error::Internal(format!("Invalid gender for person {}: {}", id, e)))?;

    Ok(PersonRecord {
        id,
        name: row.try_get("name")?,
        surname: row.try_get("surname")?,
        patronymic: row.try_get("patronymic")?,
        age,
        gender,
        country: row.try_get("country")?,
    })
}

#[async_trait::async_trait]
impl PersonRepository for SqlitePersonRepository {
    async fn create(&self, record: &PersonRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO persons (id, name, surname, patronymic, age, gender, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.name.as_str())
        .bind(record.surname.as_str())
        .bind(record.patronymic.as_deref())
        .bind(i64::from(record.age))
        .bind(record.gender.as_str())
        .bind(record.country.as_str())
        .execute(&self.db)
        .await?;

        tracing::debug!(person_id = %record.id, "Inserted person");
        Ok(())
    }

    async fn update(&self, id: Uuid, assignments: &SqlFragment) -> Result<Option<PersonRecord>> {
        let (sql, args) = update_statement(id, assignments);
        tracing::debug!(person_id = %id, query = %sql, "Updating person");

        let mut tx = self.db.begin().await?;

        let result = bind_args(sqlx::query(&sql), &args)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await?;
        let record = decode_row(&row)?;

        tx.commit().await?;

        Ok(Some(record))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        predicates: &SqlFragment,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<PersonRecord>> {
        let (sql, args) = list_statement(predicates, limit, offset);
        tracing::debug!(query = %sql, args_count = args.len(), "Listing persons");

        let rows = bind_args(sqlx::query(&sql), &args)
            .fetch_all(&self.db)
            .await?;

        rows.iter().map(decode_row).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<PersonRecord>> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.db)
            .await?;

        row.as_ref().map(decode_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{FilterCriteria, UpdateCriteria};
    use crate::query::{build_assignments, build_predicates};

    #[test]
    fn test_list_statement_without_filters() {
        let (sql, args) = list_statement(&SqlFragment::default(), None, None);
        assert_eq!(sql, format!("{} ORDER BY id", SELECT_COLUMNS));
        assert!(args.is_empty());
    }

    #[test]
    fn test_list_statement_appends_pagination_after_predicates() {
        let predicates = build_predicates(&FilterCriteria {
            names: Some(vec!["Ivan".to_string()]),
            low_age: Some(25),
            ..Default::default()
        });

        let (sql, args) = list_statement(&predicates, Some(10), Some(20));

        assert_eq!(
            sql,
            format!(
                "{} WHERE name IN ($1) AND age >= $2 ORDER BY id LIMIT $3 OFFSET $4",
                SELECT_COLUMNS
            )
        );
        assert_eq!(
            args,
            vec![
                SqlArg::Text("Ivan".to_string()),
                SqlArg::Integer(25),
                SqlArg::Integer(10),
                SqlArg::Integer(20),
            ]
        );
    }

    #[test]
    fn test_list_statement_offset_without_limit() {
        let (sql, args) = list_statement(&SqlFragment::default(), None, Some(5));
        assert_eq!(
            sql,
            format!("{} ORDER BY id LIMIT -1 OFFSET $1", SELECT_COLUMNS)
        );
        assert_eq!(args, vec![SqlArg::Integer(5)]);
    }

    #[test]
    fn test_update_statement_appends_identity() {
        let id = Uuid::new_v4();
        let assignments = build_assignments(&UpdateCriteria {
            country: Some("EN".to_string()),
            ..Default::default()
        })
        .unwrap();

        let (sql, args) = update_statement(id, &assignments);

        assert_eq!(sql, "UPDATE persons SET country = $1 WHERE id = $2");
        assert_eq!(
            args,
            vec![SqlArg::Text("EN".to_string()), SqlArg::Text(id.to_string())]
        );
    }
}
