//! Depth-first traversal and rendering
//!
//! Gantree: L2_Executable → Visit

use crate::executable::QuantumExecutable;
use crate::group::{ProgramGroup, ProgramNode};
use std::fmt::Write;

/// Traversal event
#[derive(Debug, Clone, Copy)]
pub enum VisitEvent<'a> {
    /// About to descend into a group
    Enter(&'a ProgramGroup),
    /// Finished a group's children
    Leave(&'a ProgramGroup),
    /// An executable
    Leaf(&'a QuantumExecutable),
}

/// Walk the tree depth-first, calling `visit(event, depth)` at every node
/// Gantree: visit_depth_first(root, f) // 깊이 우선 순회
pub fn visit_depth_first<'a, F>(root: &'a ProgramGroup, visit: &mut F)
where
    F: FnMut(VisitEvent<'a>, usize),
{
    walk(root, 0, visit);
}

fn walk<'a, F>(group: &'a ProgramGroup, depth: usize, visit: &mut F)
where
    F: FnMut(VisitEvent<'a>, usize),
{
    visit(VisitEvent::Enter(group), depth);
    for child in group.children() {
        match child {
            ProgramNode::Executable(e) => visit(VisitEvent::Leaf(e), depth + 1),
            ProgramNode::Group(g) => walk(g, depth + 1, visit),
        }
    }
    visit(VisitEvent::Leave(group), depth);
}

/// Indented text listing: group info, child count, then children
/// Gantree: render_tree(root) -> String // 텍스트 트리
pub fn render_tree(root: &ProgramGroup) -> String {
    let mut out = String::new();
    visit_depth_first(root, &mut |event, depth| {
        let indent = "  ".repeat(depth);
        // Writing to a String cannot fail.
        let _ = match event {
            VisitEvent::Enter(g) => writeln!(
                out,
                "{}{}\n{}Has {} children",
                indent,
                g.info(),
                indent,
                g.children().len()
            ),
            VisitEvent::Leaf(e) => writeln!(out, "{}{}", indent, e),
            VisitEvent::Leave(_) => Ok(()),
        };
    });
    out
}

/// Nested `<ul>` listing
/// Gantree: render_html(root) -> String // HTML 트리
pub fn render_html(root: &ProgramGroup) -> String {
    let mut out = String::from("<ul>\n");
    visit_depth_first(root, &mut |event, depth| {
        let indent = " ".repeat(depth);
        let _ = match event {
            VisitEvent::Enter(g) => writeln!(
                out,
                "{}<li>Group {}<ul>",
                indent,
                escape_html(&g.info().to_string())
            ),
            VisitEvent::Leaf(e) => {
                writeln!(out, "{}<li>{}</li>", indent, escape_html(&e.to_string()))
            }
            VisitEvent::Leave(_) => writeln!(out, "{}</ul></li>", indent),
        };
    });
    out.push_str("</ul>\n");
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
}
