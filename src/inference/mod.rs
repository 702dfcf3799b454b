//! Module inference
//!
//! Turns the flat set of crawled documents into a [`ModuleTree`]:
//!
//! 1. Group documents by URL path (see `grouping`)
//! 2. Split single-page modules along their headings (see `sections`)
//! 3. Describe every node with the injected [`DescriptionGenerator`]
//!
//! Every document ends up as a page of exactly one node. Pages at the site
//! root, which have no path to group by, go to a catch-all module.

mod grouping;
mod naming;
mod sections;
mod tree;

pub use naming::{clean_segments, humanize, slugify, strip_extension};
pub use tree::{DocId, ModuleNode, ModuleTree, NodeId, SectionRef};

use crate::config::{DescriptionConfig, InferenceConfig};
use crate::describe::sentences::{truncate_at_sentence, truncate_at_word};
use crate::describe::DescriptionGenerator;
use crate::extract::NormalizedDocument;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Errors that abort inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("no documents to infer modules from")]
    NoDocuments,
}

/// Builds a described module tree from crawled documents
pub struct ModuleInference {
    config: InferenceConfig,
    description: DescriptionConfig,
    generator: Arc<dyn DescriptionGenerator>,
    seed: Option<Url>,
}

impl ModuleInference {
    pub fn new(
        config: InferenceConfig,
        description: DescriptionConfig,
        generator: Arc<dyn DescriptionGenerator>,
    ) -> Self {
        Self {
            config,
            description,
            generator,
            seed: None,
        }
    }

    /// Sets the seed URL, used for the root name and `strip-seed-prefix`
    pub fn with_seed(mut self, seed: Url) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Infers the module tree
    ///
    /// Documents may arrive in any order; pages are ordered by URL so the
    /// result does not depend on crawl scheduling.
    pub fn infer(&self, mut documents: Vec<NormalizedDocument>) -> Result<ModuleTree, InferenceError> {
        if documents.is_empty() {
            return Err(InferenceError::NoDocuments);
        }

        documents.sort_by(|a, b| a.url.as_str().cmp(b.url.as_str()));
        documents.dedup_by(|a, b| a.url == b.url);

        let (mut tree, catch_all) =
            grouping::group_documents(documents, &self.config, self.seed.as_ref());
        let virtual_nodes = sections::add_virtual_sections(&mut tree, &self.config, catch_all);
        self.describe(&mut tree);

        info!(
            "Inferred {} modules ({} virtual) over {} pages, depth {}",
            tree.module_count(),
            virtual_nodes,
            tree.page_count(),
            tree.depth()
        );

        Ok(tree)
    }

    /// Fills in the description of every node
    fn describe(&self, tree: &mut ModuleTree) {
        let max_length = self.description.max_length;

        for id in 0..tree.nodes().len() {
            let text = self.source_text(tree, id);
            let generated = self.generator.generate(&text, max_length);
            // Generators are trusted to respect the limit, but a plug-in might not
            let description = truncate_at_word(&generated, max_length).to_string();

            debug!(
                "Described {} with {} ({} chars)",
                tree.node(id).path_prefix,
                self.generator.name(),
                description.chars().count()
            );
            tree.node_mut(id).description = description;
        }
    }

    /// Collects the text a node is described from, within the input budget
    ///
    /// Virtual nodes use their section of the page. Other nodes use the bodies
    /// of their own pages, or of all pages below them when they own none.
    fn source_text(&self, tree: &ModuleTree, id: NodeId) -> String {
        let budget = self.description.input_budget;
        let node = tree.node(id);

        if let Some(section) = node.section {
            let text = tree.document(section.doc).section_text(section.heading);
            return truncate_at_sentence(text, budget).to_string();
        }

        let pages = if node.pages.is_empty() {
            tree.pages_under(id)
        } else {
            node.pages.clone()
        };

        let mut text = String::new();
        for doc in pages {
            if text.chars().count() >= budget {
                break;
            }
            let body = tree.document(doc).body_text.trim();
            if body.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(body);
        }

        truncate_at_sentence(&text, budget).to_string()
    }
}
