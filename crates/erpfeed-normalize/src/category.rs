//! Keyword-driven category classification with display-name rewriting.
//!
//! Rules are visited longest keyword first and every rule gets a chance to
//! fire, so one name can be rewritten several times (a series tag stripped,
//! then a scale tag). Only the first hit sets the category code. Names that
//! happen to contain several unrelated keywords will be rewritten by all of
//! them.

use erpfeed_core::{CategoryCommand, CategoryRule, CategoryTable};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub display_name: String,
    /// Code of the longest matching keyword; empty when nothing matched.
    pub category_code: String,
    /// Keywords that fired, in application order.
    pub matched: Vec<String>,
}

/// Classify a product and rewrite its display name.
///
/// `sku` and `hints` widen the search text but are never rewritten. Matching
/// is re-evaluated against the updated name after every rule that fires.
#[must_use]
pub fn classify(
    display_name: &str,
    sku: &str,
    hints: &[&str],
    table: &CategoryTable,
) -> Classification {
    if display_name.is_empty() {
        return Classification::default();
    }

    let mut result = Classification {
        display_name: display_name.to_string(),
        ..Classification::default()
    };

    for rule in table.iter() {
        let context = search_context(&result.display_name, sku, hints);
        if !context.contains(rule.keyword.as_str()) {
            continue;
        }

        if result.matched.is_empty() {
            result.category_code.clone_from(&rule.category_code);
        }

        let before = std::mem::take(&mut result.display_name);
        result.display_name = apply_rule(&before, rule);
        tracing::debug!(
            keyword = %rule.keyword,
            command = ?rule.command,
            before = %before,
            after = %result.display_name,
            "category rule applied"
        );
        result.matched.push(rule.keyword.clone());
    }

    result
}

fn search_context(name: &str, sku: &str, hints: &[&str]) -> String {
    let mut context = format!("{name} {sku}");
    for hint in hints {
        context.push(' ');
        context.push_str(hint);
    }
    context
}

fn apply_rule(name: &str, rule: &CategoryRule) -> String {
    let base = match rule.command {
        CategoryCommand::Keep => name.to_string(),
        CategoryCommand::Strip => name.replacen(rule.keyword.as_str(), "", 1),
    };
    match rule.suffix() {
        Some(suffix) => format!("{} {suffix}", base.trim()).trim().to_string(),
        None if rule.command == CategoryCommand::Strip => base.trim().to_string(),
        None => base,
    }
}
