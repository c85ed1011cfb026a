//! Asset filter evaluation
//!
//! A filter expression is a list of AND-groups. An entity matches when every rule
//! of at least one AND-group finds its regex (unanchored) in the named attribute.
//! The empty expression matches everything.

use coffeecloud_persistence::{FilterExpression, FilterRule};
use regex::Regex;

use crate::attribute::Attributed;

#[derive(Debug, Clone, thiserror::Error)]
pub enum FilterError {
    #[error("invalid regex '{pattern}' for parameter '{parameter}': {source}")]
    InvalidRegex {
        parameter: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

struct CompiledRule {
    parameter: String,
    pattern: String,
    regex: Result<Regex, regex::Error>,
}

impl CompiledRule {
    fn compile(rule: &FilterRule) -> Self {
        Self {
            parameter: rule.parameter.clone(),
            pattern: rule.regex.clone(),
            regex: Regex::new(&rule.regex),
        }
    }

    fn matches<T: Attributed>(&self, entity: &T) -> Result<bool, FilterError> {
        let regex = self.regex.as_ref().map_err(|e| FilterError::InvalidRegex {
            parameter: self.parameter.clone(),
            pattern: self.pattern.clone(),
            source: e.clone(),
        })?;

        Ok(entity
            .filter_attribute(&self.parameter)
            .is_some_and(|value| regex.is_match(&value)))
    }
}

/// Filter expression with its regexes compiled once per cycle
pub struct CompiledFilter {
    groups: Vec<Vec<CompiledRule>>,
}

impl CompiledFilter {
    pub fn compile(expression: &FilterExpression) -> Self {
        let groups = expression
            .iter()
            .map(|group| group.iter().map(CompiledRule::compile).collect())
            .collect();
        Self { groups }
    }

    pub fn matches<T: Attributed>(&self, entity: &T) -> Result<bool, FilterError> {
        if self.groups.is_empty() {
            return Ok(true);
        }

        for group in &self.groups {
            let mut all_match = true;
            for rule in group {
                if !rule.matches(entity)? {
                    all_match = false;
                    break;
                }
            }
            if all_match {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Evaluate `expression` against `entity` without reusing compiled regexes
pub fn matches<T: Attributed>(entity: &T, expression: &FilterExpression) -> Result<bool, FilterError> {
    CompiledFilter::compile(expression).matches(entity)
}
