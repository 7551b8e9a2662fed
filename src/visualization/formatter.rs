use super::node::NodeIndex;
use super::tree::VisualizationTree;
use ahash::AHashSet;
use std::fmt;

/// Human-readable dump of a visualization tree, for debugging.
///
/// Chained steps share an indentation level; children are indented one level
/// deeper than their parent.
pub struct TreeDisplay<'a> {
    pub tree: &'a VisualizationTree,
    pub root: NodeIndex,
    pub name: &'a str,
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "======== FLOW: {} ========", self.name)?;
        let mut line = 0;
        let mut visited = AHashSet::new();
        self.fmt_chain(f, self.root, 0, &mut line, &mut visited)?;
        writeln!(f, "================ END OF FLOW ================")
    }
}

impl TreeDisplay<'_> {
    fn fmt_chain(
        &self,
        f: &mut fmt::Formatter<'_>,
        head: NodeIndex,
        depth: usize,
        line: &mut usize,
        visited: &mut AHashSet<NodeIndex>,
    ) -> fmt::Result {
        let mut current = Some(head);
        while let Some(index) = current {
            if !visited.insert(index) {
                writeln!(f, "{:04}: {}<cycle>", line, "  ".repeat(depth))?;
                return Ok(());
            }
            let node = self.tree.node(index);
            writeln!(
                f,
                "{:04}: {}{:<24} {:<16} @ {}",
                line,
                "  ".repeat(depth),
                node.id(),
                format!("[{}]", self.tree.node_label(index)),
                node.path()
            )?;
            *line += 1;

            match node.children() {
                Some([]) => writeln!(f, "      {}(no branches)", "  ".repeat(depth + 1))?,
                Some(children) => {
                    for child in children {
                        self.fmt_chain(f, *child, depth + 1, line, visited)?;
                    }
                }
                None => {}
            }
            current = node.next();
        }
        Ok(())
    }
}
