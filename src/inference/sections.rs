//! Virtual submodules derived from page headings
//!
//! A module that ends up with a single page and no children says little about
//! how its content is organized. When that page has enough top-level sections,
//! each section becomes a virtual submodule pointing at its heading.

use super::naming::slugify;
use super::tree::{ModuleNode, ModuleTree, NodeId, SectionRef};
use crate::config::InferenceConfig;
use crate::extract::NormalizedDocument;
use std::collections::HashSet;

/// Adds heading-derived children to every eligible single-page module
///
/// The root and the catch-all module are never split. Returns the number of
/// virtual nodes created.
pub(crate) fn add_virtual_sections(
    tree: &mut ModuleTree,
    config: &InferenceConfig,
    catch_all: Option<NodeId>,
) -> usize {
    if !config.virtual_sections {
        return 0;
    }

    let candidates: Vec<NodeId> = (0..tree.nodes().len())
        .filter(|&id| id != ModuleTree::ROOT && Some(id) != catch_all)
        .filter(|&id| {
            let node = tree.node(id);
            !node.is_virtual() && node.is_leaf() && node.pages.len() == 1
        })
        .collect();

    let mut created = 0;
    for id in candidates {
        let doc = tree.node(id).pages[0];
        let headings = section_headings(tree.document(doc));
        if headings.len() < config.min_virtual_sections {
            continue;
        }

        let prefix = tree.node(id).path_prefix.clone();
        let mut used = HashSet::new();
        for heading in headings {
            let text = tree.document(doc).headings[heading].text.clone();
            let slug = unique_slug(&mut used, slugify(&text));

            let mut node = ModuleNode::new(&slug, &text, &format!("{}#{}", prefix, slug));
            node.section = Some(SectionRef { doc, heading });
            tree.add_child(id, node);
            created += 1;
        }
    }

    created
}

/// Picks the headings that split a page into sections
///
/// A page with a single `<h1>` is titled by it, so its direct subheadings are
/// the sections. Otherwise the top-level headings are.
fn section_headings(doc: &NormalizedDocument) -> Vec<usize> {
    let top = doc.top_level_headings();
    match top.as_slice() {
        [only] if doc.headings[*only].level == 1 => doc
            .headings
            .iter()
            .enumerate()
            .filter(|(_, h)| h.parent == Some(*only))
            .map(|(i, _)| i)
            .collect(),
        _ => top,
    }
}

fn unique_slug(used: &mut HashSet<String>, slug: String) -> String {
    if used.insert(slug.clone()) {
        return slug;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", slug, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
