// src/watch/rules.rs

//! Mapping from changed files to the spec files that should run.
//!
//! A changed spec file runs itself; a changed source file runs its spec.
//! Rules are regexes matched against the project-relative path, with an
//! optional target template that can reference capture groups (`$1`,
//! `${1}`, `${name}`).

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::config::{WatchRuleConfig, WatchSection};
use crate::errors::Result;

/// Rules used when `[[watch.rule]]` is not configured.
pub fn default_rule_configs() -> Vec<WatchRuleConfig> {
    vec![
        WatchRuleConfig {
            pattern: r"^spec/javascripts/.+_spec\.(js|coffee|js\.coffee)$".to_string(),
            target: None,
        },
        WatchRuleConfig {
            pattern: r"^app/assets/javascripts/(.+?)\.(js|coffee|js\.coffee)$".to_string(),
            target: Some("spec/javascripts/${1}_spec.${2}".to_string()),
        },
    ]
}

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct WatchRule {
    pattern: Regex,
    target: Option<String>,
}

impl WatchRule {
    pub fn new(pattern: &str, target: Option<String>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            target,
        })
    }

    /// The spec path for `rel_path`, if this rule matches it.
    pub fn apply(&self, rel_path: &str) -> Option<String> {
        let caps = self.pattern.captures(rel_path)?;
        match self.target {
            Some(ref template) => {
                let mut out = String::new();
                caps.expand(template, &mut out);
                Some(out)
            }
            None => Some(rel_path.to_string()),
        }
    }
}

/// All rules plus the exclude globs.
#[derive(Clone)]
pub struct RuleSet {
    rules: Vec<WatchRule>,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl RuleSet {
    pub fn new(rules: Vec<WatchRule>, exclude: &[String]) -> Result<Self> {
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in exclude {
                builder.add(Glob::new(pattern)?);
            }
            Some(builder.build()?)
        };

        Ok(Self { rules, exclude_set })
    }

    /// Compile the `[watch]` section, falling back to the default rules.
    pub fn from_config(section: &WatchSection) -> Result<Self> {
        let configs = if section.rules.is_empty() {
            default_rule_configs()
        } else {
            section.rules.clone()
        };

        let rules = configs
            .iter()
            .map(|c| WatchRule::new(&c.pattern, c.target.clone()))
            .collect::<Result<Vec<_>>>()?;

        Self::new(rules, &section.exclude)
    }

    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude_set
            .as_ref()
            .is_some_and(|set| set.is_match(rel_path))
    }

    /// Map one changed path to its spec paths. Every rule is tried.
    pub fn map_path(&self, rel_path: &str) -> Vec<String> {
        if self.is_excluded(rel_path) {
            return Vec::new();
        }
        self.rules.iter().filter_map(|r| r.apply(rel_path)).collect()
    }

    /// Map a batch of changed paths, keeping first occurrences only.
    pub fn map_paths<'a, I>(&self, rel_paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out: Vec<String> = Vec::new();
        for rel in rel_paths {
            for mapped in self.map_path(rel) {
                if !out.contains(&mapped) {
                    out.push(mapped);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RuleSet {
        RuleSet::from_config(&WatchSection::default()).unwrap()
    }

    #[test]
    fn spec_files_map_to_themselves() {
        assert_eq!(
            defaults().map_path("spec/javascripts/models/user_spec.js"),
            vec!["spec/javascripts/models/user_spec.js".to_string()]
        );
    }

    #[test]
    fn source_files_map_to_their_spec() {
        assert_eq!(
            defaults().map_path("app/assets/javascripts/models/user.js.coffee"),
            vec!["spec/javascripts/models/user_spec.js.coffee".to_string()]
        );
        assert_eq!(
            defaults().map_path("app/assets/javascripts/app.js"),
            vec!["spec/javascripts/app_spec.js".to_string()]
        );
    }

    #[test]
    fn unrelated_files_map_to_nothing() {
        assert!(defaults().map_path("README.md").is_empty());
        assert!(defaults().map_path("spec/javascripts/spec_helper.js").is_empty());
    }

    #[test]
    fn excluded_paths_are_ignored() {
        let section = WatchSection {
            exclude: vec!["spec/javascripts/vendor/**".to_string()],
            ..Default::default()
        };
        let rules = RuleSet::from_config(&section).unwrap();
        assert!(rules.map_path("spec/javascripts/vendor/lib_spec.js").is_empty());
        assert_eq!(rules.map_path("spec/javascripts/a_spec.js").len(), 1);
    }

    #[test]
    fn batches_are_deduplicated_in_order() {
        let mapped = defaults().map_paths([
            "app/assets/javascripts/b.js",
            "spec/javascripts/a_spec.js",
            "spec/javascripts/b_spec.js",
        ]);
        assert_eq!(
            mapped,
            vec![
                "spec/javascripts/b_spec.js".to_string(),
                "spec/javascripts/a_spec.js".to_string(),
            ]
        );
    }

    #[test]
    fn named_captures_in_custom_rules() {
        let rule = WatchRule::new(
            r"^lib/(?P<name>\w+)\.ts$",
            Some("spec/javascripts/${name}.test.ts".to_string()),
        )
        .unwrap();
        assert_eq!(
            rule.apply("lib/parser.ts").as_deref(),
            Some("spec/javascripts/parser.test.ts")
        );
        assert_eq!(rule.apply("lib/nested/parser.ts"), None);
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(WatchRule::new("(unclosed", None).is_err());
    }
}
