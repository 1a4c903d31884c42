//! Listing SQL
//!
//! Builds the data and count queries for the user listing from one
//! [`FilterPredicate`], so both always filter on exactly the same clauses.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::value_object::{PageRequest, UserFilter};

pub(crate) const LISTING_COLUMNS: &str = "\
u.username, p.name, u.role, p.gender, p.dob, p.education, p.city, p.province, \
p.address, p.phone_number, s.job_role, s.status, pl.city AS placement, \
d.name AS department_name";

pub(crate) const LISTING_JOINS: &str = "\
FROM users u \
LEFT JOIN profiles p ON p.id = u.profile_id \
LEFT JOIN status s ON s.id = u.status_id \
LEFT JOIN placement pl ON pl.id = u.placement_id \
LEFT JOIN department d ON d.id = u.dept_id";

/// `ILIKE` pattern matching `value` literally anywhere in the column
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Ordered `(column, pattern)` clauses built once from a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    clauses: Vec<(&'static str, String)>,
}

impl FilterPredicate {
    pub fn from_filter(filter: &UserFilter) -> Self {
        let clauses = filter
            .active()
            .map(|(field, value)| (field.column(), like_pattern(value)))
            .collect();
        Self { clauses }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Append ` WHERE a ILIKE $n AND b ILIKE $m ...`; nothing when empty
    pub fn push_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, (column, pattern)) in self.clauses.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            qb.push(*column);
            qb.push(" ILIKE ");
            qb.push_bind(pattern.clone());
        }
    }
}

/// Page of rows, in a total order so pages never overlap
pub fn data_query<'a>(predicate: &FilterPredicate, page: &PageRequest) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(LISTING_COLUMNS);
    qb.push(" ");
    qb.push(LISTING_JOINS);
    predicate.push_to(&mut qb);
    qb.push(" ORDER BY u.created_at, u.id LIMIT ");
    qb.push_bind(page.size() as i64);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset() as i64);
    qb
}

/// Total number of rows matching the predicate
pub fn count_query<'a>(predicate: &FilterPredicate) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) ");
    qb.push(LISTING_JOINS);
    predicate.push_to(&mut qb);
    qb
}
