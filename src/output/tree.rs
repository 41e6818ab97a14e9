//! Tree and flat-list views of a finished frontier

use crate::crawler::{FrontierSnapshot, Link, Page};
use serde::Serialize;

/// One entry of the rendered link tree
///
/// Only the URL, the depth and the links are rendered; page state is
/// internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNode {
    pub url: String,
    pub depth: u32,
    pub links: Vec<PageNode>,
}

impl PageNode {
    fn leaf(page: &Page, depth: u32) -> Self {
        Self {
            url: page.url.to_string(),
            depth,
            links: Vec::new(),
        }
    }

    /// Number of entries in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.links.iter().map(PageNode::count).sum::<usize>()
    }
}

/// Builds the link tree rooted at the seed page
///
/// Child edges are expanded in discovery order. A link to a page that was
/// already known when it was found is rendered as a leaf one level below the
/// page it was found on, so every page's subtree appears exactly once.
///
/// The traversal keeps its own stack of open pages, so tree depth is bounded
/// by memory rather than by the call stack.
pub fn build_tree(snapshot: &FrontierSnapshot) -> PageNode {
    let root_page = snapshot.root();
    let mut root = PageNode::leaf(root_page, root_page.depth);
    let mut stack = vec![OpenNode::new(root_page)];

    while let Some(open) = stack.last_mut() {
        match open.page.links.get(open.next).copied() {
            Some(link) => {
                open.next += 1;
                let Some(target) = snapshot.page(link.target()) else {
                    continue;
                };
                match link {
                    Link::Child(_) => stack.push(OpenNode::new(target)),
                    Link::Reference(_) => {
                        let depth = open.page.depth + 1;
                        open.links.push(PageNode::leaf(target, depth));
                    }
                }
            }
            None => {
                let Some(done) = stack.pop() else {
                    break;
                };
                let node = done.into_node();
                match stack.last_mut() {
                    Some(parent) => parent.links.push(node),
                    None => root = node,
                }
            }
        }
    }

    root
}

/// A page whose links are still being expanded
struct OpenNode<'a> {
    page: &'a Page,
    next: usize,
    links: Vec<PageNode>,
}

impl<'a> OpenNode<'a> {
    fn new(page: &'a Page) -> Self {
        Self {
            page,
            next: 0,
            links: Vec::with_capacity(page.links.len()),
        }
    }

    fn into_node(self) -> PageNode {
        PageNode {
            url: self.page.url.to_string(),
            depth: self.page.depth,
            links: self.links,
        }
    }
}

/// Every canonical URL in the frontier, in discovery order
pub fn url_list(snapshot: &FrontierSnapshot) -> Vec<&str> {
    snapshot.pages().iter().map(|page| page.url.as_str()).collect()
}
