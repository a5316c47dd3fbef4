use super::SqlFragment;
use crate::criteria::FilterCriteria;

/// Translate a sparse filter into `WHERE` clauses
///
/// Emission order is fixed: ids, names, surnames, patronymics, low age,
/// high age, gender, countries. Pagination fields are left to the caller.
pub fn build_predicates(filter: &FilterCriteria) -> SqlFragment {
    let mut fragment = SqlFragment::default();

    if let Some(ids) = &filter.ids {
        fragment.push_membership("id", ids);
    }
    if let Some(names) = &filter.names {
        fragment.push_membership("name", names);
    }
    if let Some(surnames) = &filter.surnames {
        fragment.push_membership("surname", surnames);
    }
    if let Some(patronymics) = &filter.patronymics {
        fragment.push_membership("patronymic", patronymics);
    }
    if let Some(low_age) = filter.low_age {
        fragment.push_comparison("age", ">=", low_age);
    }
    if let Some(high_age) = filter.high_age {
        fragment.push_comparison("age", "<=", high_age);
    }
    if let Some(gender) = filter.gender {
        fragment.push_comparison("gender", "=", gender);
    }
    if let Some(countries) = &filter.countries {
        fragment.push_membership("country", countries);
    }

    fragment
}
