//! Dimension hierarchies: parent/child/alias relationships for accounts and departments.

use crate::config::HierarchyColumns;
use crate::model::{Code, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Parent links are followed at most this many times when computing a member's depth.
pub const MAX_DEPTH: usize = 10;

/// The dimensions this program reads from the hierarchies export.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Account,
    Department,
}

serde_plain::derive_display_from_serialize!(Dimension);
serde_plain::derive_fromstr_from_deserialize!(Dimension);

/// One row of the hierarchies export.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HierarchyRecord {
    pub dimension: String,
    pub member_code: Code,
    pub alias: Option<String>,
    pub parent_code: Option<Code>,
}

impl HierarchyRecord {
    pub fn new(
        dimension: impl Into<String>,
        member_code: impl Into<Code>,
        alias: Option<&str>,
        parent_code: Option<&str>,
    ) -> Self {
        Self {
            dimension: dimension.into(),
            member_code: member_code.into(),
            alias: non_empty(alias).map(String::from),
            parent_code: non_empty(parent_code).map(Code::new),
        }
    }

    /// Reads every row of `table`. Columns are assumed to be present; run schema validation
    /// first. Blank alias and parent cells are treated as absent.
    pub fn from_table(table: &Table, columns: &HierarchyColumns) -> Vec<HierarchyRecord> {
        table
            .rows()
            .map(|row| {
                HierarchyRecord::new(
                    row.text(&columns.dimension).trim(),
                    row.text(&columns.member_code),
                    row.get(&columns.alias),
                    row.get(&columns.parent_code),
                )
            })
            .filter(|record| !record.member_code.is_empty())
            .collect()
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct Member {
    alias: String,
    parent: Option<Code>,
}

/// A read-only lookup of the members of one dimension, keyed by member code.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct HierarchyIndex {
    dimension: String,
    members: HashMap<Code, Member>,
}

impl HierarchyIndex {
    /// Builds the index for `dimension` from `records`. When a member code appears more than
    /// once, the later row wins.
    pub fn build<'a>(
        records: impl IntoIterator<Item = &'a HierarchyRecord>,
        dimension: Dimension,
    ) -> Self {
        let dimension = dimension.to_string();
        let mut members = HashMap::new();
        let mut duplicates = 0usize;
        for record in records
            .into_iter()
            .filter(|r| r.dimension == dimension)
        {
            let member = Member {
                alias: record
                    .alias
                    .clone()
                    .unwrap_or_else(|| record.member_code.to_string()),
                parent: record.parent_code.clone(),
            };
            if members.insert(record.member_code.clone(), member).is_some() {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            warn!(
                "The {dimension} hierarchy lists {duplicates} member code(s) more than once, \
                the last row for each was used"
            );
        }
        debug!("Built the {dimension} hierarchy with {} members", members.len());
        Self { dimension, members }
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, code: &Code) -> bool {
        self.members.contains_key(code)
    }

    /// The member's alias, or its code when the export had no alias for it.
    pub fn alias(&self, code: &Code) -> Option<&str> {
        self.members.get(code).map(|m| m.alias.as_str())
    }

    pub fn parent(&self, code: &Code) -> Option<&Code> {
        self.members.get(code).and_then(|m| m.parent.as_ref())
    }

    /// Counts the parent links above `code`, stopping at a member with no parent, at a code that
    /// is not in the index, or after `MAX_DEPTH` links. The cap makes cyclic data terminate;
    /// such data renders with an indent of `MAX_DEPTH`.
    pub fn depth(&self, code: &Code) -> usize {
        let mut depth = 0;
        let mut current = code;
        while depth < MAX_DEPTH {
            match self.parent(current) {
                Some(parent) => {
                    depth += 1;
                    current = parent;
                }
                None => break,
            }
        }
        depth
    }

    /// Every member below `root`, at any distance. The root is never part of the result, and
    /// each member is visited once so cycles terminate.
    pub fn descendants(&self, root: &Code) -> BTreeSet<Code> {
        let mut children: HashMap<&Code, Vec<&Code>> = HashMap::new();
        for (code, member) in &self.members {
            if let Some(parent) = &member.parent {
                children.entry(parent).or_default().push(code);
            }
        }

        let mut visited: HashSet<&Code> = HashSet::from([root]);
        let mut queue: VecDeque<&Code> = VecDeque::from([root]);
        let mut found = BTreeSet::new();
        while let Some(current) = queue.pop_front() {
            for &child in children.get(current).into_iter().flatten() {
                if visited.insert(child) {
                    found.insert(child.clone());
                    queue.push_back(child);
                }
            }
        }
        found
    }

    /// The alias for a known code, otherwise the code itself.
    pub fn label(&self, code: &Code) -> String {
        match self.alias(code) {
            Some(alias) => alias.to_string(),
            None => code.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(code: &str, alias: Option<&str>, parent: Option<&str>) -> HierarchyRecord {
        HierarchyRecord::new("Account", code, alias, parent)
    }

    fn chain(len: usize) -> Vec<HierarchyRecord> {
        // m0 is the root, m{len} is the deepest member
        (0..=len)
            .map(|i| {
                let parent = if i == 0 {
                    None
                } else {
                    Some(format!("m{}", i - 1))
                };
                account(&format!("m{i}"), None, parent.as_deref())
            })
            .collect()
    }

    fn tree() -> Vec<HierarchyRecord> {
        vec![
            account("Net Income", None, None),
            account("Revenue", None, Some("Net Income")),
            account("Expenses", None, Some("Net Income")),
            account("4100", Some("4100 Contributions"), Some("Revenue")),
            account("4200", Some("Grants"), Some("Revenue")),
            account("5000", Some("Salaries"), Some("Expenses")),
            account("5010", Some("Payroll Taxes"), Some("5000")),
            account("Balance Sheet", None, None),
            account("1000", Some("Cash"), Some("Balance Sheet")),
            HierarchyRecord::new("Department", "100", Some("Programs"), None),
        ]
    }

    #[test]
    fn test_build_filters_dimension() {
        let records = tree();
        let accounts = HierarchyIndex::build(&records, Dimension::Account);
        let departments = HierarchyIndex::build(&records, Dimension::Department);
        assert_eq!(accounts.len(), 9);
        assert_eq!(departments.len(), 1);
        assert_eq!(departments.alias(&Code::new("100")), Some("Programs"));
        assert!(!accounts.contains(&Code::new("100")));
    }

    #[test]
    fn test_depth_of_root_is_zero() {
        let index = HierarchyIndex::build(&tree(), Dimension::Account);
        assert_eq!(index.depth(&Code::new("Net Income")), 0);
        assert_eq!(index.depth(&Code::new("Balance Sheet")), 0);
    }

    #[test]
    fn test_depth_counts_links() {
        let index = HierarchyIndex::build(&tree(), Dimension::Account);
        assert_eq!(index.depth(&Code::new("Revenue")), 1);
        assert_eq!(index.depth(&Code::new("4100")), 2);
        assert_eq!(index.depth(&Code::new("5010")), 3);
    }

    #[test]
    fn test_depth_of_unknown_code_is_zero() {
        let index = HierarchyIndex::build(&tree(), Dimension::Account);
        assert_eq!(index.depth(&Code::new("9999")), 0);
    }

    #[test]
    fn test_depth_counts_link_to_missing_parent() {
        let records = vec![account("4100", None, Some("Not Exported"))];
        let index = HierarchyIndex::build(&records, Dimension::Account);
        assert_eq!(index.depth(&Code::new("4100")), 1);
    }

    #[test]
    fn test_depth_of_chains() {
        for k in 0..=MAX_DEPTH {
            let index = HierarchyIndex::build(&chain(k), Dimension::Account);
            assert_eq!(index.depth(&Code::new(format!("m{k}"))), k);
        }
    }

    #[test]
    fn test_depth_is_capped() {
        let index = HierarchyIndex::build(&chain(25), Dimension::Account);
        assert_eq!(index.depth(&Code::new("m25")), MAX_DEPTH);
        assert_eq!(index.depth(&Code::new("m11")), MAX_DEPTH);
    }

    #[test]
    fn test_depth_terminates_on_cycles() {
        let records = vec![
            account("self", None, Some("self")),
            account("a", None, Some("b")),
            account("b", None, Some("a")),
        ];
        let index = HierarchyIndex::build(&records, Dimension::Account);
        assert_eq!(index.depth(&Code::new("self")), MAX_DEPTH);
        assert_eq!(index.depth(&Code::new("a")), MAX_DEPTH);
    }

    #[test]
    fn test_descendants() {
        let index = HierarchyIndex::build(&tree(), Dimension::Account);
        let found = index.descendants(&Code::new("Net Income"));
        let expected: BTreeSet<Code> = ["Revenue", "Expenses", "4100", "4200", "5000", "5010"]
            .into_iter()
            .map(Code::new)
            .collect();
        assert_eq!(found, expected);
        assert!(!found.contains(&Code::new("Net Income")));
        assert!(!found.contains(&Code::new("1000")));
    }

    #[test]
    fn test_descendants_ignores_row_order() {
        let mut records = tree();
        let forward = HierarchyIndex::build(&records, Dimension::Account)
            .descendants(&Code::new("Net Income"));
        records.reverse();
        let backward = HierarchyIndex::build(&records, Dimension::Account)
            .descendants(&Code::new("Net Income"));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_descendants_of_leaf_and_unknown() {
        let index = HierarchyIndex::build(&tree(), Dimension::Account);
        assert!(index.descendants(&Code::new("5010")).is_empty());
        assert!(index.descendants(&Code::new("Nope")).is_empty());
    }

    #[test]
    fn test_descendants_terminates_on_cycles() {
        let records = vec![
            account("root", None, None),
            account("self", None, Some("self")),
            account("a", None, Some("root")),
            account("b", None, Some("a")),
            account("c", None, Some("b")),
            // "root" is re-parented under "c" by a later row, closing a loop
            account("root", None, Some("c")),
        ];
        let index = HierarchyIndex::build(&records, Dimension::Account);
        let found = index.descendants(&Code::new("root"));
        let expected: BTreeSet<Code> = ["a", "b", "c"].into_iter().map(Code::new).collect();
        assert_eq!(found, expected);
        assert!(index.descendants(&Code::new("self")).is_empty());
    }

    #[test]
    fn test_label() {
        let records = vec![
            account("4100.0", Some("Contributions"), None),
            account("4200", None, None),
        ];
        let index = HierarchyIndex::build(&records, Dimension::Account);
        assert_eq!(index.label(&Code::new("4100")), "Contributions");
        assert_eq!(index.label(&Code::new("4200")), "4200");
        assert_eq!(index.label(&Code::new("4300.0")), "4300");
    }

    #[test]
    fn test_blank_cells_are_absent() {
        let record = account("4100", Some("  "), Some(""));
        assert_eq!(record.alias, None);
        assert_eq!(record.parent_code, None);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let records = vec![
            account("4100", Some("Old"), None),
            account("4100", Some("New"), None),
        ];
        let index = HierarchyIndex::build(&records, Dimension::Account);
        assert_eq!(index.len(), 1);
        assert_eq!(index.label(&Code::new("4100")), "New");
    }

    #[test]
    fn test_from_table() {
        let table = crate::test::hierarchy_table();
        let records = HierarchyRecord::from_table(&table, &HierarchyColumns::default());
        assert_eq!(records.len(), table.len());
        let payroll = records
            .iter()
            .find(|r| r.member_code.as_str() == "5010")
            .unwrap();
        assert_eq!(payroll.parent_code, Some(Code::new("5000")));
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::Account.to_string(), "Account");
        assert_eq!("Department".parse::<Dimension>().unwrap(), Dimension::Department);
    }
}
