//! Repositories for database operations
//!
//! One repository struct per entity, each holding the connection pool. The
//! partial-update statements are assembled here from an explicitly ordered
//! list of (field, value) pairs, so the generated SQL text is deterministic
//! and the bind positions always line up with the pair order.

use chrono::NaiveDate;
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;

pub mod account;
pub mod comment;
pub mod post;

pub use account::AccountRepository;
pub use comment::CommentRepository;
pub use post::PostRepository;

/// Rows per page for every list query
pub const PAGE_SIZE: i64 = 10;

/// Largest page number whose offset still fits in an i64
pub const MAX_PAGE: i64 = i64::MAX / PAGE_SIZE;

/// Offset for a 1-based page number
///
/// Callers must have bounded the page to [`MAX_PAGE`] already; page
/// validation does this before any data access.
pub fn page_offset(page: i64) -> i64 {
    (page - 1) * PAGE_SIZE
}

/// A value destined for one column of a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
}

/// Build a partial UPDATE statement for the supplied fields
///
/// Only the listed fields appear in the SET clause, parameterized by
/// position in pair order. The statement is always scoped by the target id
/// and by `<guard> = false`, so soft-deleted rows are never updated.
pub fn build_update_query(table: &str, fields: &[(&str, FieldValue)], guard: &str) -> String {
    let clauses: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{} = ${}", name, i + 1))
        .collect();

    format!(
        "UPDATE {} SET {} WHERE id = ${} AND {} = false",
        table,
        clauses.join(", "),
        fields.len() + 1,
        guard
    )
}

/// Bind the field values in pair order; the caller binds the id afterwards
pub fn bind_fields<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    fields: &'q [(&str, FieldValue)],
) -> Query<'q, Postgres, PgArguments> {
    for (_, value) in fields {
        query = match value {
            FieldValue::Text(s) => query.bind(s),
            FieldValue::Date(d) => query.bind(d),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_query_parameterizes_exactly_the_supplied_fields() {
        let fields = vec![
            ("content", FieldValue::Text("edited".to_string())),
            (
                "updated_at",
                FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            ),
        ];

        let sql = build_update_query("comment", &fields, "removed");
        assert_eq!(
            sql,
            "UPDATE comment SET content = $1, updated_at = $2 WHERE id = $3 AND removed = false"
        );
    }

    #[test]
    fn update_query_respects_pair_order() {
        let forward = vec![
            ("username", FieldValue::Text("a".to_string())),
            ("email", FieldValue::Text("b".to_string())),
        ];
        let reversed = vec![
            ("email", FieldValue::Text("b".to_string())),
            ("username", FieldValue::Text("a".to_string())),
        ];

        assert_eq!(
            build_update_query("account", &forward, "deleted"),
            "UPDATE account SET username = $1, email = $2 WHERE id = $3 AND deleted = false"
        );
        assert_eq!(
            build_update_query("account", &reversed, "deleted"),
            "UPDATE account SET email = $1, username = $2 WHERE id = $3 AND deleted = false"
        );
    }

    #[test]
    fn single_field_update_places_id_second() {
        let fields = vec![("content", FieldValue::Text("x".to_string()))];
        assert_eq!(
            build_update_query("post", &fields, "removed"),
            "UPDATE post SET content = $1 WHERE id = $2 AND removed = false"
        );
    }

    #[test]
    fn page_offset_is_zero_based_from_page_one() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), PAGE_SIZE);
        assert_eq!(page_offset(5), 4 * PAGE_SIZE);
    }

    #[test]
    fn page_offset_at_the_page_cap_does_not_overflow() {
        assert_eq!(page_offset(MAX_PAGE), (MAX_PAGE - 1) * PAGE_SIZE);
    }
}
