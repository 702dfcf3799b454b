//! The serialized site report
//!
//! [`SiteReport`] is the artifact written to disk: the module tree, the crawl
//! statistics and every page that was attempted but failed. Records own plain
//! strings so the report can be read back without the crawl that produced it.

use super::stats::CrawlStats;
use super::OutputError;
use crate::crawler::CrawlFailure;
use crate::inference::{ModuleTree, NodeId};
use crate::state::PageState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A page listed under a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
}

/// One node of the module tree, nested recursively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: String,
    pub title: String,
    pub path: String,
    pub description: String,
    pub pages: Vec<PageRecord>,
    pub submodules: Vec<ModuleRecord>,
    #[serde(rename = "virtual", default, skip_serializing_if = "is_false")]
    pub is_virtual: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ModuleRecord {
    /// Converts the whole tree, root first
    pub fn from_tree(tree: &ModuleTree) -> Self {
        Self::from_node(tree, ModuleTree::ROOT)
    }

    fn from_node(tree: &ModuleTree, id: NodeId) -> Self {
        let node = tree.node(id);
        let pages = node
            .pages
            .iter()
            .map(|doc| {
                let doc = tree.document(*doc);
                PageRecord {
                    url: doc.url.to_string(),
                    title: doc.title.clone(),
                }
            })
            .collect();

        Self {
            name: node.name.clone(),
            title: node.title.clone(),
            path: node.path_prefix.clone(),
            description: node.description.clone(),
            pages,
            submodules: node
                .submodules
                .iter()
                .map(|child| Self::from_node(tree, *child))
                .collect(),
            is_virtual: node.is_virtual(),
        }
    }

    /// Number of pages in this record and all records below it
    pub fn page_count(&self) -> usize {
        self.pages.len() + self.submodules.iter().map(Self::page_count).sum::<usize>()
    }

    /// Finds a descendant by its path of names
    pub fn find(&self, names: &[&str]) -> Option<&ModuleRecord> {
        names.iter().try_fold(self, |current, name| {
            current.submodules.iter().find(|child| child.name == *name)
        })
    }

    /// Visits this record and every descendant, depth first
    pub fn walk(&self) -> Vec<&ModuleRecord> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a ModuleRecord>) {
        out.push(self);
        for child in &self.submodules {
            child.collect(out);
        }
    }
}

/// A page that was attempted and failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub url: String,
    pub state: PageState,
    pub reason: String,
}

impl From<&CrawlFailure> for FailureRecord {
    fn from(failure: &CrawlFailure) -> Self {
        Self {
            url: failure.url.to_string(),
            state: failure.state,
            reason: failure.reason.clone(),
        }
    }
}

/// Result of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReport {
    pub seed_url: String,

    /// When the report was assembled (RFC 3339)
    pub generated_at: DateTime<Utc>,

    /// True when the crawl was stopped before the frontier was exhausted
    #[serde(default)]
    pub partial: bool,

    pub stats: CrawlStats,
    pub tree: ModuleRecord,
    pub failures: Vec<FailureRecord>,
}

impl SiteReport {
    pub fn new(
        seed_url: &str,
        tree: &ModuleTree,
        failures: &[CrawlFailure],
        stats: CrawlStats,
        partial: bool,
    ) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            generated_at: Utc::now(),
            partial,
            stats,
            tree: ModuleRecord::from_tree(tree),
            failures: failures.iter().map(FailureRecord::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, OutputError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DescriptionConfig, InferenceConfig};
    use crate::describe::LeadSentences;
    use crate::extract::extract;
    use crate::inference::ModuleInference;
    use std::sync::Arc;
    use url::Url;

    fn sample_tree() -> ModuleTree {
        let docs = [
            ("https://ex.com/docs/intro", "<title>Intro</title><p>Welcome.</p>"),
            ("https://ex.com/docs/guide/setup", "<title>Setup</title><p>Install.</p>"),
            ("https://ex.com/docs/guide/advanced", "<title>Advanced</title><p>Tune.</p>"),
            (
                "https://ex.com/blog/post1",
                "<title>Post</title><h2>A</h2><p>a.</p><h2>B</h2><p>b.</p><h2>C</h2><p>c.</p>",
            ),
        ];
        let documents = docs
            .iter()
            .map(|(url, html)| extract(html, &Url::parse(url).unwrap()).unwrap())
            .collect();

        ModuleInference::new(
            InferenceConfig::default(),
            DescriptionConfig::default(),
            Arc::new(LeadSentences::default()),
        )
        .infer(documents)
        .unwrap()
    }

    #[test]
    fn test_record_mirrors_tree() {
        let record = ModuleRecord::from_tree(&sample_tree());

        assert_eq!(record.name, "ex.com");
        assert_eq!(record.page_count(), 4);

        let guide = record.find(&["docs", "guide"]).unwrap();
        let urls: Vec<_> = guide.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://ex.com/docs/guide/advanced", "https://ex.com/docs/guide/setup"]
        );
        assert_eq!(guide.pages[0].title, "Advanced");
    }

    #[test]
    fn test_json_round_trip() {
        let failures = vec![CrawlFailure {
            url: Url::parse("https://ex.com/missing").unwrap(),
            state: PageState::DeadLink,
            reason: "HTTP 404".to_string(),
        }];
        let report = SiteReport::new(
            "https://ex.com/docs",
            &sample_tree(),
            &failures,
            CrawlStats::default(),
            false,
        );

        let json = report.to_json().unwrap();
        let back = SiteReport::from_json(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(back.failures[0].state, PageState::DeadLink);
    }

    #[test]
    fn test_virtual_flag_only_when_set() {
        let report = SiteReport::new(
            "https://ex.com/",
            &sample_tree(),
            &[],
            CrawlStats::default(),
            false,
        );
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let blog = &value["tree"]["submodules"][0];
        assert_eq!(blog["name"], "blog");
        assert!(blog.get("virtual").is_none());
        assert_eq!(blog["submodules"][0]["virtual"], true);
        assert_eq!(blog["submodules"][0]["path"], "/blog#a");
    }

    #[test]
    fn test_walk_is_depth_first() {
        let record = ModuleRecord::from_tree(&sample_tree());
        let names: Vec<_> = record.walk().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ex.com", "blog", "a", "b", "c", "docs", "guide"]);
    }

    #[test]
    fn test_generated_at_is_rfc3339() {
        let report = SiteReport::new("https://ex.com/", &sample_tree(), &[], CrawlStats::default(), true);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let stamp = value["generated_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert_eq!(value["partial"], true);
    }
}
