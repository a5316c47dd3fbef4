use super::{NoFieldsToUpdate, SqlFragment};
use crate::criteria::UpdateCriteria;

/// Translate a sparse update into `SET` assignments
///
/// Emission order: name, surname, patronymic, age, gender, country. The
/// identity placeholder is appended by the caller at `next_index`.
pub fn build_assignments(update: &UpdateCriteria) -> Result<SqlFragment, NoFieldsToUpdate> {
    let mut fragment = SqlFragment::default();

    if let Some(name) = &update.name {
        fragment.push_comparison("name", "=", name.as_str());
    }
    if let Some(surname) = &update.surname {
        fragment.push_comparison("surname", "=", surname.as_str());
    }
    if let Some(patronymic) = &update.patronymic {
        fragment.push_comparison("patronymic", "=", patronymic.as_str());
    }
    if let Some(age) = update.age {
        fragment.push_comparison("age", "=", age);
    }
    if let Some(gender) = update.gender {
        fragment.push_comparison("gender", "=", gender);
    }
    if let Some(country) = &update.country {
        fragment.push_comparison("country", "=", country.as_str());
    }

    if fragment.is_empty() {
        return Err(NoFieldsToUpdate);
    }

    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SqlArg;
    use persona_common::Gender;

    #[test]
    fn test_country_only() {
        let update = UpdateCriteria {
            country: Some("EN".to_string()),
            ..Default::default()
        };

        let fragment = build_assignments(&update).unwrap();

        assert_eq!(fragment.clauses, vec!["country = $1"]);
        assert_eq!(fragment.args, vec![SqlArg::Text("EN".to_string())]);
        assert_eq!(fragment.next_index, 2);
    }

    #[test]
    fn test_no_fields() {
        assert_eq!(
            build_assignments(&UpdateCriteria::default()),
            Err(NoFieldsToUpdate)
        );
    }

    #[test]
    fn test_all_fields_in_fixed_order() {
        let update = UpdateCriteria {
            name: Some("Ivan".to_string()),
            surname: Some("Ivanov".to_string()),
            patronymic: Some("Ivanovich".to_string()),
            age: Some(33),
            gender: Some(Gender::Male),
            country: Some("BY".to_string()),
        };

        let fragment = build_assignments(&update).unwrap();

        assert_eq!(
            fragment.join(", "),
            "name = $1, surname = $2, patronymic = $3, age = $4, gender = $5, country = $6"
        );
        assert_eq!(fragment.args[3], SqlArg::Integer(33));
        assert_eq!(fragment.args[4], SqlArg::Text("male".to_string()));
        assert_eq!(fragment.next_index, 7);
    }

    #[test]
    fn test_deterministic() {
        let update = UpdateCriteria {
            surname: Some("Petrova".to_string()),
            gender: Some(Gender::Female),
            ..Default::default()
        };

        let first = build_assignments(&update).unwrap();
        let second = build_assignments(&update).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.clauses, vec!["surname = $1", "gender = $2"]);
    }
}
