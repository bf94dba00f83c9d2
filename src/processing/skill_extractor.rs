//! Category keyword matching over normalized resume text

use crate::error::{Result, ResumeScreenerError};
use crate::processing::text_processor::TextNormalizer;
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Coarse competency bucket backed by a keyword list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Python,
    Leadership,
    Web,
    Data,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Python,
        SkillCategory::Leadership,
        SkillCategory::Web,
        SkillCategory::Data,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Python => "python",
            SkillCategory::Leadership => "leadership",
            SkillCategory::Web => "web",
            SkillCategory::Data => "data",
        }
    }

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::Python => "Python",
            SkillCategory::Leadership => "Leadership",
            SkillCategory::Web => "Web",
            SkillCategory::Data => "Data",
        }
    }

    fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            SkillCategory::Python => &["python", "pandas", "numpy", "sklearn", "tensorflow"],
            SkillCategory::Leadership => &["managed", "team", "supervised", "led", "coordinated"],
            SkillCategory::Web => &["html", "css", "javascript", "react", "angular", "node"],
            SkillCategory::Data => &["sql", "excel", "tableau", "powerbi", "analytics"],
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = ResumeScreenerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "python" => Ok(SkillCategory::Python),
            "leadership" => Ok(SkillCategory::Leadership),
            "web" => Ok(SkillCategory::Web),
            "data" => Ok(SkillCategory::Data),
            other => Err(ResumeScreenerError::InvalidInput(format!(
                "Unknown skill category: {}. Supported: python, leadership, web, data",
                other
            ))),
        }
    }
}

/// Immutable category -> trigger keyword table
#[derive(Debug, Clone, PartialEq)]
pub struct SkillTable {
    categories: BTreeMap<SkillCategory, Vec<String>>,
}

impl Default for SkillTable {
    fn default() -> Self {
        let categories = SkillCategory::ALL
            .iter()
            .map(|category| {
                let keywords = category
                    .default_keywords()
                    .iter()
                    .map(|k| k.to_string())
                    .collect();
                (*category, keywords)
            })
            .collect();

        Self { categories }
    }
}

impl SkillTable {
    /// Table with no keywords; categories are added with `extend_category`
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Append keywords to a category, lower-cased, skipping blanks and duplicates
    pub fn extend_category(&mut self, category: SkillCategory, keywords: &[String]) {
        let entry = self.categories.entry(category).or_default();
        for keyword in keywords {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !entry.contains(&keyword) {
                entry.push(keyword);
            }
        }
    }

    pub fn keywords(&self, category: SkillCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = (SkillCategory, &[String])> + '_ {
        self.categories.iter().map(|(c, k)| (*c, k.as_slice()))
    }

    pub fn keyword_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Sparse category -> matched-keyword count; only positive counts are stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillCounts(BTreeMap<SkillCategory, usize>);

impl SkillCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: SkillCategory) -> usize {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, usize)> + '_ {
        self.0.iter().map(|(c, n)| (*c, *n))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Skill tags of the form `python: 2`, one per present category
    pub fn tag_phrases(&self) -> Vec<String> {
        self.iter()
            .map(|(category, count)| format!("{}: {}", category, count))
            .collect()
    }
}

impl FromIterator<(SkillCategory, usize)> for SkillCounts {
    fn from_iter<I: IntoIterator<Item = (SkillCategory, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|(_, count)| *count > 0).collect())
    }
}

/// Counts which category keywords appear as substrings of normalized text
pub struct SkillExtractor {
    normalizer: TextNormalizer,
    matcher: Option<AhoCorasick>,
    patterns: Vec<String>,
    pattern_categories: Vec<Vec<SkillCategory>>,
}

impl SkillExtractor {
    pub fn new(table: &SkillTable) -> Result<Self> {
        let mut patterns: Vec<String> = Vec::new();
        let mut pattern_categories: Vec<Vec<SkillCategory>> = Vec::new();

        for (category, keywords) in table.categories() {
            for keyword in keywords {
                match patterns.iter().position(|p| p == keyword) {
                    Some(idx) => pattern_categories[idx].push(category),
                    None => {
                        patterns.push(keyword.clone());
                        pattern_categories.push(vec![category]);
                    }
                }
            }
        }

        // Overlapping search requires standard match semantics
        let matcher = if patterns.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::Standard)
                    .build(&patterns)
                    .map_err(|e| {
                        ResumeScreenerError::TextProcessing(format!(
                            "Failed to build skill matcher: {}",
                            e
                        ))
                    })?,
            )
        };

        Ok(Self {
            normalizer: TextNormalizer::new(),
            matcher,
            patterns,
            pattern_categories,
        })
    }

    /// Extract per-category keyword counts from raw resume text
    pub fn extract_skills(&self, text: &str) -> SkillCounts {
        let normalized = self.normalizer.normalize(text);
        self.count_normalized(&normalized)
    }

    /// Count keywords in text that has already been normalized
    pub fn count_normalized(&self, normalized: &str) -> SkillCounts {
        let matcher = match &self.matcher {
            Some(matcher) => matcher,
            None => return SkillCounts::new(),
        };

        let matched: HashSet<usize> = matcher
            .find_overlapping_iter(normalized)
            .map(|mat| mat.pattern().as_usize())
            .collect();

        let mut counts: BTreeMap<SkillCategory, usize> = BTreeMap::new();
        for pattern_id in matched {
            for category in &self.pattern_categories[pattern_id] {
                *counts.entry(*category).or_insert(0) += 1;
            }
        }

        counts.into_iter().collect()
    }

    /// Keywords found in the text, for detailed reports
    pub fn matched_keywords(&self, text: &str) -> Vec<String> {
        let matcher = match &self.matcher {
            Some(matcher) => matcher,
            None => return Vec::new(),
        };

        let normalized = self.normalizer.normalize(text);
        let mut ids: Vec<usize> = matcher
            .find_overlapping_iter(&normalized)
            .map(|mat| mat.pattern().as_usize())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        ids.sort_unstable();

        ids.into_iter().map(|id| self.patterns[id].clone()).collect()
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn keyword_count(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(&SkillTable::default()).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let skills = extractor().extract_skills("managed a team of engineers using python and pandas");

        let expected: SkillCounts = [(SkillCategory::Python, 2), (SkillCategory::Leadership, 2)]
            .into_iter()
            .collect();
        assert_eq!(skills, expected);
        assert_eq!(skills.get(SkillCategory::Web), 0);
    }

    #[test]
    fn test_empty_text_yields_empty_counts() {
        assert!(extractor().extract_skills("").is_empty());
        assert!(extractor().extract_skills("   ").is_empty());
    }

    #[test]
    fn test_keyword_counts_once_regardless_of_repetition() {
        let skills = extractor().extract_skills("Python python PYTHON, python!");
        assert_eq!(skills.get(SkillCategory::Python), 1);
    }

    #[test]
    fn test_substring_containment_matches_inside_tokens() {
        // "led" inside "skilled", "node" inside "nodes"
        let skills = extractor().extract_skills("skilled with nodes");
        assert_eq!(skills.get(SkillCategory::Leadership), 1);
        assert_eq!(skills.get(SkillCategory::Web), 1);
    }

    #[test]
    fn test_nested_keywords_both_count() {
        let mut table = SkillTable::empty();
        table.extend_category(
            SkillCategory::Data,
            &["sql".to_string(), "postgresql".to_string()],
        );
        let extractor = SkillExtractor::new(&table).unwrap();

        assert_eq!(extractor.extract_skills("postgresql").get(SkillCategory::Data), 2);
    }

    #[test]
    fn test_keyword_order_does_not_change_counts() {
        let text = "Built React dashboards with HTML, CSS and JavaScript; SQL and Tableau reporting";

        let forward = extractor().extract_skills(text);

        let mut reversed = SkillTable::empty();
        for category in SkillCategory::ALL {
            let mut keywords = SkillTable::default().keywords(category).to_vec();
            keywords.reverse();
            reversed.extend_category(category, &keywords);
        }
        let backward = SkillExtractor::new(&reversed).unwrap().extract_skills(text);

        assert_eq!(forward, backward);
        assert_eq!(forward.get(SkillCategory::Web), 4);
        assert_eq!(forward.get(SkillCategory::Data), 2);
    }

    #[test]
    fn test_keyword_shared_between_categories_counts_for_each() {
        let mut table = SkillTable::default();
        table.extend_category(SkillCategory::Web, &["python".to_string()]);
        let skills = SkillExtractor::new(&table).unwrap().extract_skills("python");

        assert_eq!(skills.get(SkillCategory::Python), 1);
        assert_eq!(skills.get(SkillCategory::Web), 1);
    }

    #[test]
    fn test_tag_phrases_and_serialization() {
        let skills = extractor().extract_skills("managed a team of engineers using python and pandas");

        assert_eq!(skills.tag_phrases(), vec!["python: 2", "leadership: 2"]);
        assert_eq!(
            serde_json::to_string(&skills).unwrap(),
            r#"{"python":2,"leadership":2}"#
        );
    }

    #[test]
    fn test_matched_keywords() {
        let keywords = extractor().matched_keywords("Excel and Tableau analytics");
        assert_eq!(keywords.len(), 3);
        assert!(keywords.contains(&"tableau".to_string()));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Python".parse::<SkillCategory>().unwrap(), SkillCategory::Python);
        assert!("cooking".parse::<SkillCategory>().is_err());
    }
}
