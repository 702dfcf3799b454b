//! Path-based grouping of documents into modules
//!
//! Documents are keyed by their cleaned URL path segments. The first
//! `grouping-depth` segments pick the top-level module; each following segment
//! opens a submodule, up to `max-nesting` levels. A segment that only one page
//! ends on becomes a page of the current node instead of a submodule, and
//! submodules left with a single page and no children fold back into their
//! parent.

use super::naming::{clean_segments, humanize};
use super::tree::{DocId, ModuleNode, ModuleTree, NodeId};
use crate::config::InferenceConfig;
use crate::extract::NormalizedDocument;
use crate::url::path_segments;
use std::collections::BTreeMap;
use tracing::trace;
use url::Url;

/// A document with the path segments not yet consumed by its ancestors
type Member = (DocId, Vec<String>);

/// Builds the module tree skeleton (no descriptions, no virtual sections)
///
/// `documents` must already be sorted by URL. Returns the tree and the id of
/// the catch-all module, if one was needed.
pub(crate) fn group_documents(
    documents: Vec<NormalizedDocument>,
    config: &InferenceConfig,
    seed: Option<&Url>,
) -> (ModuleTree, Option<NodeId>) {
    let seed_prefix = match seed {
        Some(seed) if config.strip_seed_prefix => clean_segments(&path_segments(seed)),
        _ => Vec::new(),
    };

    let mut uncategorized: Vec<DocId> = Vec::new();
    let mut top_level: BTreeMap<Vec<String>, Vec<Member>> = BTreeMap::new();

    for (id, doc) in documents.iter().enumerate() {
        let mut segments = clean_segments(&path_segments(&doc.url));
        if !seed_prefix.is_empty() && segments.starts_with(&seed_prefix) {
            segments.drain(..seed_prefix.len());
        }

        if segments.is_empty() {
            uncategorized.push(id);
            continue;
        }

        let split = config.grouping_depth.min(segments.len());
        let rest = segments.split_off(split);
        top_level.entry(segments).or_default().push((id, rest));
    }

    let root = root_node(&documents, seed);
    let mut tree = ModuleTree::new(root, documents);
    let grouper = Grouper { config };

    for (key, members) in top_level {
        let name = key.join("/");
        let path = format!("/{}", name);
        let id = tree.add_child(ModuleTree::ROOT, ModuleNode::new(&name, "", &path));
        grouper.fill(&mut tree, id, members, 0);
    }

    let catch_all = if uncategorized.is_empty() {
        None
    } else {
        let name = &config.uncategorized_name;
        let mut node = ModuleNode::new(name, name, "/");
        node.pages = uncategorized;
        Some(tree.add_child(ModuleTree::ROOT, node))
    };

    (tree, catch_all)
}

fn root_node(documents: &[NormalizedDocument], seed: Option<&Url>) -> ModuleNode {
    let host = seed
        .or_else(|| documents.first().map(|d| &d.url))
        .and_then(|u| u.host_str())
        .unwrap_or("site")
        .to_string();

    ModuleNode::new(&host, &host, "/")
}

struct Grouper<'a> {
    config: &'a InferenceConfig,
}

impl Grouper<'_> {
    /// Distributes `members` into the pages and submodules of node `id`
    ///
    /// `depth` counts submodule levels below the top-level module.
    fn fill(&self, tree: &mut ModuleTree, id: NodeId, members: Vec<Member>, depth: usize) {
        let mut pages: Vec<DocId> = Vec::new();
        let mut index_page: Option<DocId> = None;
        let mut groups: BTreeMap<String, Vec<Member>> = BTreeMap::new();

        for (doc, mut rest) in members {
            if rest.is_empty() {
                index_page.get_or_insert(doc);
                pages.push(doc);
            } else if depth >= self.config.max_nesting {
                pages.push(doc);
            } else {
                let head = rest.remove(0);
                groups.entry(head).or_default().push((doc, rest));
            }
        }

        let parent_path = tree.node(id).path_prefix.clone();
        for (segment, group) in groups {
            if let [(doc, rest)] = group.as_slice() {
                if rest.is_empty() {
                    pages.push(*doc);
                    continue;
                }
            }

            let path = format!("{}/{}", parent_path, segment);
            let child = tree.add_child(id, ModuleNode::new(&segment, "", &path));
            self.fill(tree, child, group, depth + 1);

            let single_page = {
                let node = tree.node(child);
                node.is_leaf() && node.pages.len() == 1
            };
            if self.config.collapse_single_page && single_page {
                if let Some(folded) = tree.pop_leaf(child) {
                    trace!("Folding single-page submodule {} into parent", folded.path_prefix);
                    pages.extend(folded.pages);
                }
            }
        }

        pages.sort_unstable();
        let title = index_page
            .and_then(|doc| {
                tree.document(doc)
                    .headings
                    .iter()
                    .find(|h| h.level == 1)
                    .map(|h| h.text.clone())
            })
            .unwrap_or_else(|| humanize(&tree.node(id).name));

        let node = tree.node_mut(id);
        node.pages = pages;
        node.title = title;
    }
}
