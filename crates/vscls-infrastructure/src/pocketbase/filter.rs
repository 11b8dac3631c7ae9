//! PocketBase filter expressions.
//!
//! Values are emitted as single-quoted string literals. Inside a literal the
//! grammar only understands `\'`, so quotes are escaped and backslashes are
//! rejected: a trailing backslash would otherwise swallow the closing quote.

use vscls_core::{Result, VsclsError};

/// Builds `a='x' && b='y'` expressions.
#[derive(Debug, Default, Clone)]
pub struct FilterBuilder {
    clauses: Vec<String>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact string-equality clause joined with AND.
    pub fn eq(mut self, field: &str, value: &str) -> Result<Self> {
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(VsclsError::validation(format!(
                "'{}' is not a valid filter field name",
                field
            )));
        }
        self.clauses.push(format!("{}={}", field, quote_literal(field, value)?));
        Ok(self)
    }

    pub fn build(self) -> String {
        self.clauses.join(" && ")
    }
}

fn quote_literal(field: &str, value: &str) -> Result<String> {
    if value.contains('\\') {
        return Err(VsclsError::validation(format!(
            "{} must not contain a backslash",
            field
        )));
    }
    Ok(format!("'{}'", value.replace('\'', "\\'")))
}

/// Filter matching one session identity.
pub fn identity_filter(machine_id: &str, project_name: &str, device_name: &str) -> Result<String> {
    Ok(FilterBuilder::new()
        .eq("machineId", machine_id)?
        .eq("projectName", project_name)?
        .eq("deviceName", device_name)?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits an expression into (operators outside literals, literal values).
    fn scan(expr: &str) -> (Vec<String>, Vec<String>) {
        let mut operators = Vec::new();
        let mut literals = Vec::new();
        let mut outside = String::new();
        let mut chars = expr.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '\'' {
                outside.push(c);
                continue;
            }
            let mut literal = String::new();
            loop {
                match chars.next() {
                    Some('\\') if chars.peek() == Some(&'\'') => {
                        chars.next();
                        literal.push('\'');
                    }
                    Some('\'') | None => break,
                    Some(other) => literal.push(other),
                }
            }
            literals.push(literal);
            outside.push(' ');
        }

        for token in outside.split_whitespace() {
            if matches!(token, "&&" | "||") {
                operators.push(token.to_string());
            }
        }
        (operators, literals)
    }

    #[test]
    fn test_identity_filter_plain_values() {
        let filter = identity_filter("M1", "P1", "D1").unwrap();
        assert_eq!(
            filter,
            "machineId='M1' && projectName='P1' && deviceName='D1'"
        );
    }

    #[test]
    fn test_quote_in_project_name_cannot_change_structure() {
        let project = "x' || machineId!='";
        let filter = identity_filter("M1", project, "D1").unwrap();

        let (operators, literals) = scan(&filter);
        assert_eq!(operators, vec!["&&", "&&"]);
        assert_eq!(literals, vec!["M1".to_string(), project.to_string(), "D1".to_string()]);
    }

    #[test]
    fn test_double_quotes_pass_through() {
        let filter = identity_filter("M1", "say \"hi\"", "D1").unwrap();
        let (_, literals) = scan(&filter);
        assert_eq!(literals[1], "say \"hi\"");
    }

    #[test]
    fn test_backslash_is_rejected() {
        let err = identity_filter("M1", "C:\\", "D1").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("projectName"));
    }

    #[test]
    fn test_invalid_field_name_is_rejected() {
        let err = FilterBuilder::new().eq("a || b", "x").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_builder() {
        assert_eq!(FilterBuilder::new().build(), "");
    }
}
