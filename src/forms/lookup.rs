use crate::errors::AdminError;
use crate::models::Entity;

/// Resolve a selected id against an already-fetched list. A blank selection
/// means "none"; a selection missing from the list is an error.
pub fn find_by_id<T: Entity>(entities: &[T], selected: &str) -> Result<Option<T>, AdminError> {
    let selected = selected.trim();
    if selected.is_empty() {
        return Ok(None);
    }
    entities
        .iter()
        .find(|e| e.id().map(|id| id.to_string()).as_deref() == Some(selected))
        .cloned()
        .map(Some)
        .ok_or_else(|| AdminError::Validation(format!("No {} with id {}", T::NAME, selected)))
}

/// Turn multi-select values into id-only references, dropping blanks.
pub fn map_id_list<T: Entity>(ids: &[String]) -> Result<Vec<T>, AdminError> {
    ids.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| parse_id::<T>(s).map(T::reference))
        .collect()
}

pub fn parse_id<T: Entity>(value: &str) -> Result<i64, AdminError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AdminError::Validation(format!("Invalid {} id '{}'", T::NAME, value)))
}

/// Id of a single reference as a form value (`""` when unset).
pub fn id_string<T: Entity>(reference: Option<&T>) -> String {
    reference
        .and_then(|r| r.id())
        .map(|id| id.to_string())
        .unwrap_or_default()
}

/// Ids of a reference list as form values.
pub fn id_strings<T: Entity>(references: Option<&Vec<T>>) -> Vec<String> {
    references
        .into_iter()
        .flatten()
        .filter_map(|r| r.id())
        .map(|id| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Engine, Rule};

    fn engines() -> Vec<Engine> {
        vec![
            Engine { id: Some(1), name: Some("yara".into()) },
            Engine { id: Some(12), name: Some("semgrep".into()) },
        ]
    }

    #[test]
    fn test_find_by_id_compares_as_strings() {
        let found = find_by_id(&engines(), " 12 ").unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("semgrep"));
    }

    #[test]
    fn test_find_by_id_blank_is_none() {
        assert!(find_by_id(&engines(), "").unwrap().is_none());
    }

    #[test]
    fn test_find_by_id_unknown_is_error() {
        let err = find_by_id(&engines(), "7").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: No engine with id 7");
    }

    #[test]
    fn test_map_id_list_drops_blanks() {
        let refs: Vec<Rule> = map_id_list(&["3".into(), "".into(), " 5".into()]).unwrap();
        assert_eq!(refs, vec![Rule::reference(3), Rule::reference(5)]);
    }

    #[test]
    fn test_map_id_list_rejects_garbage() {
        assert!(map_id_list::<Rule>(&["x".into()]).is_err());
    }

    #[test]
    fn test_id_strings() {
        let list = vec![Rule::reference(2), Rule::default(), Rule::reference(8)];
        assert_eq!(id_strings(Some(&list)), vec!["2", "8"]);
        assert!(id_strings::<Rule>(None).is_empty());
        assert_eq!(id_string(Some(&Engine::reference(4))), "4");
        assert_eq!(id_string::<Engine>(None), "");
    }
}
