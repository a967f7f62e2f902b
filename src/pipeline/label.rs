use crate::model::{Code, HierarchyIndex};

/// One level of account indentation.
pub const INDENT: &str = "   ";

/// Renders an account row label: the alias, prefixed with the numeric code when the alias does
/// not already start with it, indented by the account's depth in the hierarchy. Codes missing
/// from the hierarchy render as themselves.
pub fn format_account(code: &Code, accounts: &HierarchyIndex) -> String {
    let Some(alias) = accounts.alias(code) else {
        return code.to_string();
    };
    let text = if code.is_numeric() && !alias.starts_with(code.as_str()) {
        format!("{code} {alias}")
    } else {
        alias.to_string()
    };
    format!("{}{text}", INDENT.repeat(accounts.depth(code)))
}

/// The title of a department sheet: the code, or the hierarchy alias when `use_alias` is set.
pub fn department_title(code: &Code, departments: &HierarchyIndex, use_alias: bool) -> String {
    if use_alias {
        departments.label(code)
    } else {
        code.to_string()
    }
}
