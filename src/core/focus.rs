use crate::core::editor::PartField;
use crate::core::tree::{ConfigTree, NodeKey};

/// A focusable row of the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Node(NodeKey),
    Field(NodeKey, PartField),
}

impl FocusTarget {
    pub fn node(self) -> NodeKey {
        match self {
            FocusTarget::Node(key) | FocusTarget::Field(key, _) => key,
        }
    }
}

/// Focusable rows in display order: each node row, then the editable
/// fields of its panel when expanded, then its children.
pub fn focus_targets(tree: &ConfigTree) -> Vec<FocusTarget> {
    let mut targets = Vec::new();
    for key in tree.display_order() {
        targets.push(FocusTarget::Node(key));
        if tree.panel(key).is_some() {
            targets.push(FocusTarget::Field(key, PartField::Unit));
            targets.push(FocusTarget::Field(key, PartField::Status));
        }
    }
    targets
}

/// Moves `current` by `delta` rows, clamped to the ends of the list.
pub fn step(targets: &[FocusTarget], current: Option<FocusTarget>, delta: isize) -> Option<FocusTarget> {
    if targets.is_empty() {
        return None;
    }
    let Some(index) = current.and_then(|c| targets.iter().position(|t| *t == c)) else {
        return targets.first().copied();
    };
    let last = targets.len() as isize - 1;
    let next = (index as isize + delta).clamp(0, last);
    targets.get(next as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ConfigNode, Part};
    use crate::core::tree::ResolvedChild;

    fn child(uuid: &str) -> ResolvedChild {
        ResolvedChild {
            config: ConfigNode {
                uuid: uuid.into(),
                part_uuid: format!("part-{uuid}"),
                parent_uuid: None,
                end_unit_serial_no: None,
            },
            part: Part {
                uuid: format!("part-{uuid}"),
                name: Some(uuid.to_uppercase()),
                unit: None,
                status: None,
                version: None,
            },
        }
    }

    #[test]
    fn expanded_nodes_contribute_their_fields() {
        let mut tree = ConfigTree::new();
        tree.begin_root_load();
        tree.finish_root_load(vec![child("a"), child("b")]);
        let a = tree.roots()[0];
        let b = tree.roots()[1];

        tree.toggle(a);
        let part = child("a").part;
        tree.finish_expand(a, part, vec![child("a1")]);

        let targets = focus_targets(&tree);
        assert_eq!(targets.len(), 5);
        assert_eq!(targets[0], FocusTarget::Node(a));
        assert_eq!(targets[1], FocusTarget::Field(a, PartField::Unit));
        assert_eq!(targets[2], FocusTarget::Field(a, PartField::Status));
        assert_eq!(targets[4], FocusTarget::Node(b));
    }

    #[test]
    fn step_clamps_at_both_ends() {
        let mut tree = ConfigTree::new();
        tree.begin_root_load();
        tree.finish_root_load(vec![child("a"), child("b")]);
        let targets = focus_targets(&tree);

        assert_eq!(step(&targets, None, 1), Some(targets[0]));
        assert_eq!(step(&targets, Some(targets[0]), -1), Some(targets[0]));
        assert_eq!(step(&targets, Some(targets[0]), 1), Some(targets[1]));
        assert_eq!(step(&targets, Some(targets[1]), 1), Some(targets[1]));
        assert_eq!(step(&[], Some(targets[1]), 1), None);
    }
}
