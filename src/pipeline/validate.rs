use crate::config::{FactColumns, HierarchyColumns};
use crate::error::{SchemaError, TableKind};
use std::collections::BTreeSet;

/// Checks the header names of both uploads before anything else runs.
///
/// A swap is reported ahead of missing columns: swapped files are missing columns too, and "you
/// put the files in the wrong slots" is the message the user can act on.
pub fn validate(
    fact_columns: &BTreeSet<String>,
    hierarchy_columns: &BTreeSet<String>,
    facts: &FactColumns,
    hierarchies: &HierarchyColumns,
) -> Result<(), SchemaError> {
    let mut clues = Vec::new();
    if fact_columns.contains(&hierarchies.dimension) {
        clues.push(format!(
            "the intersections file has the hierarchy column '{}'",
            hierarchies.dimension
        ));
    }
    if hierarchy_columns.contains(&facts.value) {
        clues.push(format!(
            "the hierarchies file has the intersections column '{}'",
            facts.value
        ));
    }
    if !clues.is_empty() {
        return Err(SchemaError::SwappedFiles {
            detail: clues.join(" and "),
        });
    }

    check_required(TableKind::Intersections, fact_columns, facts.required())?;
    check_required(
        TableKind::Hierarchies,
        hierarchy_columns,
        hierarchies.required(),
    )
}

/// Checks only the intersections upload, for commands that do not need the hierarchies.
pub fn validate_facts(
    fact_columns: &BTreeSet<String>,
    facts: &FactColumns,
    hierarchies: &HierarchyColumns,
) -> Result<(), SchemaError> {
    if fact_columns.contains(&hierarchies.dimension) {
        return Err(SchemaError::SwappedFiles {
            detail: format!(
                "the intersections file has the hierarchy column '{}'",
                hierarchies.dimension
            ),
        });
    }
    check_required(TableKind::Intersections, fact_columns, facts.required())
}

fn check_required<'a>(
    table: TableKind,
    present: &BTreeSet<String>,
    required: impl IntoIterator<Item = &'a str>,
) -> Result<(), SchemaError> {
    let missing: Vec<String> = required
        .into_iter()
        .filter(|name| !present.contains(*name))
        .map(String::from)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns { table, missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn fact_names() -> BTreeSet<String> {
        names(&["_Account", "_Department", "_Year", "_Period", "_Scenario", "_value"])
    }

    fn hierarchy_names() -> BTreeSet<String> {
        names(&["_dim", "_member_name", "_member_alias", "_parent_name"])
    }

    fn run(facts: &BTreeSet<String>, hierarchies: &BTreeSet<String>) -> Result<(), SchemaError> {
        validate(
            facts,
            hierarchies,
            &FactColumns::default(),
            &HierarchyColumns::default(),
        )
    }

    #[test]
    fn test_valid() {
        run(&fact_names(), &hierarchy_names()).unwrap();
    }

    #[test]
    fn test_extra_columns_are_fine() {
        let mut facts = fact_names();
        facts.insert("_Currency".to_string());
        run(&facts, &hierarchy_names()).unwrap();
    }

    #[test]
    fn test_missing_fact_columns() {
        let mut facts = fact_names();
        facts.remove("_Period");
        facts.remove("_Account");
        let e = run(&facts, &hierarchy_names()).unwrap_err();
        assert_eq!(
            e,
            SchemaError::MissingColumns {
                table: TableKind::Intersections,
                missing: vec!["_Account".to_string(), "_Period".to_string()],
            }
        );
    }

    #[test]
    fn test_missing_hierarchy_columns() {
        let hierarchies = names(&["_dim", "_member_name"]);
        let e = run(&fact_names(), &hierarchies).unwrap_err();
        assert_eq!(
            e,
            SchemaError::MissingColumns {
                table: TableKind::Hierarchies,
                missing: vec!["_member_alias".to_string(), "_parent_name".to_string()],
            }
        );
    }

    #[test]
    fn test_swapped_files() {
        let e = run(&hierarchy_names(), &fact_names()).unwrap_err();
        match e {
            SchemaError::SwappedFiles { detail } => {
                assert!(detail.contains("'_dim'"));
                assert!(detail.contains("'_value'"));
            }
            other => panic!("expected SwappedFiles, got {other:?}"),
        }
    }

    #[test]
    fn test_one_sided_swap_marker() {
        let mut facts = fact_names();
        facts.insert("_dim".to_string());
        assert!(matches!(
            run(&facts, &hierarchy_names()),
            Err(SchemaError::SwappedFiles { .. })
        ));
    }

    #[test]
    fn test_validate_facts() {
        let columns = FactColumns::default();
        let hierarchy = HierarchyColumns::default();
        validate_facts(&fact_names(), &columns, &hierarchy).unwrap();
        assert!(matches!(
            validate_facts(&hierarchy_names(), &columns, &hierarchy),
            Err(SchemaError::SwappedFiles { .. })
        ));
        let mut facts = fact_names();
        facts.remove("_Year");
        assert!(matches!(
            validate_facts(&facts, &columns, &hierarchy),
            Err(SchemaError::MissingColumns { .. })
        ));
    }
}
