//! Sparse-field SQL fragment builders
//!
//! Both builders share one placeholder-numbering discipline: placeholders are
//! `$N`, numbered from 1 with no gaps, one per bound argument. The returned
//! `next_index` is the next unused placeholder number so callers can append
//! their own placeholders (pagination, the `WHERE id = $n` of an update).

mod assignment;
mod predicate;

pub use assignment::build_assignments;
pub use predicate::build_predicates;

use persona_common::Gender;
use thiserror::Error;
use uuid::Uuid;

/// Raised when an update would change nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no fields to update")]
pub struct NoFieldsToUpdate;

/// One positional bind value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlArg {
    Text(String),
    Integer(i64),
}

impl From<&str> for SqlArg {
    fn from(value: &str) -> Self {
        SqlArg::Text(value.to_string())
    }
}

impl From<String> for SqlArg {
    fn from(value: String) -> Self {
        SqlArg::Text(value)
    }
}

impl From<u32> for SqlArg {
    fn from(value: u32) -> Self {
        SqlArg::Integer(i64::from(value))
    }
}

impl From<Uuid> for SqlArg {
    fn from(value: Uuid) -> Self {
        SqlArg::Text(value.to_string())
    }
}

impl From<Gender> for SqlArg {
    fn from(value: Gender) -> Self {
        SqlArg::Text(value.as_str().to_string())
    }
}

/// Ordered clauses, their arguments and the next free placeholder number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFragment {
    pub clauses: Vec<String>,
    pub args: Vec<SqlArg>,
    pub next_index: usize,
}

impl Default for SqlFragment {
    fn default() -> Self {
        Self {
            clauses: Vec::new(),
            args: Vec::new(),
            next_index: 1,
        }
    }
}

impl SqlFragment {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Reserve the next placeholder for `arg`, returning its text (`$N`)
    pub fn bind(&mut self, arg: impl Into<SqlArg>) -> String {
        let placeholder = format!("${}", self.next_index);
        self.args.push(arg.into());
        self.next_index += 1;
        placeholder
    }

    /// `column = $N`
    fn push_comparison(&mut self, column: &str, op: &str, arg: impl Into<SqlArg>) {
        let placeholder = self.bind(arg);
        self.clauses.push(format!("{} {} {}", column, op, placeholder));
    }

    /// `column IN ($N, $N+1, ...)`, or `FALSE` for an empty set
    fn push_membership<T: Clone + Into<SqlArg>>(&mut self, column: &str, values: &[T]) {
        if values.is_empty() {
            self.clauses.push("FALSE".to_string());
            return;
        }

        let placeholders: Vec<String> = values.iter().map(|v| self.bind(v.clone())).collect();
        self.clauses
            .push(format!("{} IN ({})", column, placeholders.join(", ")));
    }

    /// Clauses joined with `sep`
    pub fn join(&self, sep: &str) -> String {
        self.clauses.join(sep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_numbers_from_one() {
        let mut fragment = SqlFragment::default();
        assert_eq!(fragment.bind("a"), "$1");
        assert_eq!(fragment.bind(7u32), "$2");
        assert_eq!(fragment.next_index, 3);
        assert_eq!(
            fragment.args,
            vec![SqlArg::Text("a".to_string()), SqlArg::Integer(7)]
        );
    }

    #[test]
    fn test_membership_empty_set_is_false() {
        let mut fragment = SqlFragment::default();
        fragment.push_membership::<String>("name", &[]);
        assert_eq!(fragment.clauses, vec!["FALSE"]);
        assert!(fragment.args.is_empty());
        assert_eq!(fragment.next_index, 1);
    }

    #[test]
    fn test_gender_and_uuid_args_are_text() {
        let id = Uuid::new_v4();
        assert_eq!(SqlArg::from(Gender::Female), SqlArg::Text("female".to_string()));
        assert_eq!(SqlArg::from(id), SqlArg::Text(id.to_string()));
    }
}
