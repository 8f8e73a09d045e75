use crate::api::{ConfigNode, Part};
use crate::core::panel::PartPanel;
use indexmap::IndexMap;
use std::fmt;

/// Identity of one rendered tree node.
///
/// Allocated per render, so the same configuration or part shown twice gets
/// two independent keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A listed configuration together with its resolved part.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChild {
    pub config: ConfigNode,
    pub part: Part,
}

/// Sorts siblings by `(part_uuid, serial or "")`, keeping server order for ties.
pub fn sort_configs(configs: &mut [ConfigNode]) {
    configs.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

pub fn child_label(config: &ConfigNode, part: &Part) -> String {
    match config.serial() {
        Some(serial) => format!("{} (SN: {})", part.name(), serial),
        None => part.name().to_string(),
    }
}

pub enum Expansion {
    Collapsed,
    Loading,
    Expanded(Box<PartPanel>),
}

impl Expansion {
    pub fn is_expanded(&self) -> bool {
        matches!(self, Expansion::Expanded(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Expansion::Loading)
    }
}

pub struct TreeNode {
    pub key: NodeKey,
    pub parent: Option<NodeKey>,
    pub depth: usize,
    pub config: ConfigNode,
    pub label: String,
    pub expansion: Expansion,
    pub children: Vec<NodeKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootState {
    Idle,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Node moved to `Loading`; the caller fetches its part and children.
    Load(ConfigNode),
    Collapsed { removed: usize },
    /// A fetch for this node is already in flight.
    Busy,
    Missing,
}

pub struct ConfigTree {
    nodes: IndexMap<NodeKey, TreeNode>,
    roots: Vec<NodeKey>,
    root_state: RootState,
    next_key: u64,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            roots: Vec::new(),
            root_state: RootState::Idle,
            next_key: 1,
        }
    }

    pub fn root_state(&self) -> RootState {
        self.root_state
    }

    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn get(&self, key: NodeKey) -> Option<&TreeNode> {
        self.nodes.get(&key)
    }

    pub fn parent_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(&key).and_then(|node| node.parent)
    }

    pub fn panel(&self, key: NodeKey) -> Option<&PartPanel> {
        match &self.nodes.get(&key)?.expansion {
            Expansion::Expanded(panel) => Some(&**panel),
            _ => None,
        }
    }

    pub fn panel_mut(&mut self, key: NodeKey) -> Option<&mut PartPanel> {
        match &mut self.nodes.get_mut(&key)?.expansion {
            Expansion::Expanded(panel) => Some(&mut **panel),
            _ => None,
        }
    }

    pub fn panels_mut(&mut self) -> impl Iterator<Item = (NodeKey, &mut PartPanel)> {
        self.nodes
            .iter_mut()
            .filter_map(|(key, node)| match &mut node.expansion {
                Expansion::Expanded(panel) => Some((*key, &mut **panel)),
                _ => None,
            })
    }

    /// Starts the root listing; drops whatever was rendered before.
    pub fn begin_root_load(&mut self) -> bool {
        if self.root_state == RootState::Loading {
            return false;
        }
        self.nodes.clear();
        self.roots.clear();
        self.root_state = RootState::Loading;
        true
    }

    pub fn finish_root_load(&mut self, children: Vec<ResolvedChild>) {
        self.roots = children
            .into_iter()
            .map(|child| self.insert(None, 0, child))
            .collect();
        self.root_state = RootState::Loaded;
    }

    pub fn fail_root_load(&mut self) {
        self.root_state = RootState::Loaded;
    }

    /// Activating a node: collapsed nodes start loading, expanded nodes
    /// drop their panel and every descendant.
    pub fn toggle(&mut self, key: NodeKey) -> ToggleOutcome {
        let Some(node) = self.nodes.get_mut(&key) else {
            return ToggleOutcome::Missing;
        };
        if node.expansion.is_loading() {
            return ToggleOutcome::Busy;
        }
        if node.expansion.is_expanded() {
            return ToggleOutcome::Collapsed {
                removed: self.collapse(key),
            };
        }
        node.expansion = Expansion::Loading;
        ToggleOutcome::Load(node.config.clone())
    }

    /// Collapses an expanded node, returning how many descendants were removed.
    pub fn collapse(&mut self, key: NodeKey) -> usize {
        let Some(node) = self.nodes.get_mut(&key) else {
            return 0;
        };
        if !node.expansion.is_expanded() {
            return 0;
        }
        node.expansion = Expansion::Collapsed;
        let mut pending = std::mem::take(&mut node.children);
        let mut removed = 0;
        while let Some(child) = pending.pop() {
            if let Some(child_node) = self.nodes.shift_remove(&child) {
                pending.extend(child_node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Completes a load started by [`ConfigTree::toggle`].
    ///
    /// Returns false when the node disappeared or was not loading; the
    /// result is then discarded.
    pub fn finish_expand(
        &mut self,
        key: NodeKey,
        part: Part,
        children: Vec<ResolvedChild>,
    ) -> bool {
        let depth = match self.nodes.get(&key) {
            Some(node) if node.expansion.is_loading() => node.depth + 1,
            _ => return false,
        };
        let child_keys: Vec<NodeKey> = children
            .into_iter()
            .map(|child| self.insert(Some(key), depth, child))
            .collect();
        if let Some(node) = self.nodes.get_mut(&key) {
            node.children = child_keys;
            node.expansion = Expansion::Expanded(Box::new(PartPanel::new(part)));
        }
        true
    }

    pub fn fail_expand(&mut self, key: NodeKey) -> bool {
        match self.nodes.get_mut(&key) {
            Some(node) if node.expansion.is_loading() => {
                node.expansion = Expansion::Collapsed;
                true
            }
            _ => false,
        }
    }

    /// Node keys in display order: depth-first, children after their panel.
    pub fn display_order(&self) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(&key) else {
                continue;
            };
            out.push(key);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn insert(&mut self, parent: Option<NodeKey>, depth: usize, child: ResolvedChild) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        let label = child_label(&child.config, &child.part);
        self.nodes.insert(
            key,
            TreeNode {
                key,
                parent,
                depth,
                config: child.config,
                label,
                expansion: Expansion::Collapsed,
                children: Vec::new(),
            },
        );
        key
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(uuid: &str, part: &str, serial: Option<&str>) -> ConfigNode {
        ConfigNode {
            uuid: uuid.into(),
            part_uuid: part.into(),
            parent_uuid: None,
            end_unit_serial_no: serial.map(str::to_string),
        }
    }

    fn part(uuid: &str, name: &str) -> Part {
        Part {
            uuid: uuid.into(),
            name: Some(name.into()),
            unit: None,
            status: None,
            version: None,
        }
    }

    fn child(uuid: &str, part_uuid: &str) -> ResolvedChild {
        ResolvedChild {
            config: config(uuid, part_uuid, None),
            part: part(part_uuid, part_uuid),
        }
    }

    fn loaded_tree(roots: Vec<ResolvedChild>) -> ConfigTree {
        let mut tree = ConfigTree::new();
        assert!(tree.begin_root_load());
        tree.finish_root_load(roots);
        tree
    }

    fn expand(tree: &mut ConfigTree, key: NodeKey, children: Vec<ResolvedChild>) {
        assert!(matches!(tree.toggle(key), ToggleOutcome::Load(_)));
        let part_uuid = tree.get(key).map(|n| n.config.part_uuid.clone()).unwrap_or_default();
        assert!(tree.finish_expand(key, part(&part_uuid, "x"), children));
    }

    #[test]
    fn sort_orders_by_part_then_serial() {
        let mut configs = vec![
            config("c3", "p2", None),
            config("c2", "p1", Some("SN2")),
            config("c1", "p1", None),
            config("c4", "p1", Some("SN10")),
        ];
        sort_configs(&mut configs);
        let order: Vec<&str> = configs.iter().map(|c| c.uuid.as_str()).collect();
        assert_eq!(order, ["c1", "c4", "c2", "c3"]);
    }

    #[test]
    fn label_includes_serial_only_when_present() {
        let widget = part("p1", "Widget");
        assert_eq!(child_label(&config("c1", "p1", None), &widget), "Widget");
        assert_eq!(
            child_label(&config("c2", "p1", Some("SN2")), &widget),
            "Widget (SN: SN2)"
        );
        assert_eq!(child_label(&config("c3", "p1", Some("")), &widget), "Widget");
    }

    #[test]
    fn toggle_walks_collapsed_loading_expanded() {
        let mut tree = loaded_tree(vec![child("c1", "p1")]);
        let key = tree.roots()[0];

        assert!(matches!(tree.toggle(key), ToggleOutcome::Load(ref c) if c.uuid == "c1"));
        assert_eq!(tree.toggle(key), ToggleOutcome::Busy);
        assert!(tree.finish_expand(key, part("p1", "Widget"), vec![child("c2", "p2")]));
        assert!(tree.panel(key).is_some());
        assert_eq!(tree.len(), 2);

        assert_eq!(tree.toggle(key), ToggleOutcome::Collapsed { removed: 1 });
        assert!(tree.panel(key).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn collapse_removes_exactly_the_added_subtree() {
        let mut tree = loaded_tree(vec![child("a", "p1"), child("b", "p2")]);
        let (a, b) = (tree.roots()[0], tree.roots()[1]);

        expand(&mut tree, b, vec![child("b1", "p3")]);
        let untouched: Vec<NodeKey> = tree.display_order();

        expand(&mut tree, a, vec![child("a1", "p4"), child("a2", "p5")]);
        let a1 = tree.get(a).map(|n| n.children[0]).expect("a1");
        expand(&mut tree, a1, vec![child("a1x", "p6")]);
        assert_eq!(tree.len(), 6);

        assert_eq!(tree.collapse(a), 3);
        assert_eq!(tree.display_order(), untouched);
        assert!(tree.panel(b).is_some());
    }

    #[test]
    fn late_results_for_removed_nodes_are_discarded() {
        let mut tree = loaded_tree(vec![child("a", "p1")]);
        let a = tree.roots()[0];
        expand(&mut tree, a, vec![child("a1", "p2")]);
        let a1 = tree.get(a).map(|n| n.children[0]).expect("a1");
        assert!(matches!(tree.toggle(a1), ToggleOutcome::Load(_)));

        tree.collapse(a);
        assert!(!tree.finish_expand(a1, part("p2", "late"), Vec::new()));
        assert!(!tree.fail_expand(a1));
        assert!(!tree.contains(a1));
    }

    #[test]
    fn same_part_gets_distinct_keys() {
        let mut tree = loaded_tree(vec![child("c1", "shared"), child("c2", "shared")]);
        let (first, second) = (tree.roots()[0], tree.roots()[1]);
        assert_ne!(first, second);

        expand(&mut tree, first, Vec::new());
        expand(&mut tree, second, Vec::new());
        assert_eq!(tree.panels_mut().count(), 2);
    }

    #[test]
    fn display_order_is_depth_first() {
        let mut tree = loaded_tree(vec![child("a", "p1"), child("b", "p2")]);
        let (a, b) = (tree.roots()[0], tree.roots()[1]);
        expand(&mut tree, a, vec![child("a1", "p3")]);
        let a1 = tree.get(a).map(|n| n.children[0]).expect("a1");

        assert_eq!(tree.display_order(), vec![a, a1, b]);
        assert_eq!(tree.parent_of(a1), Some(a));
        assert_eq!(tree.get(a1).map(|n| n.depth), Some(1));
    }

    #[test]
    fn failed_expand_returns_to_collapsed() {
        let mut tree = loaded_tree(vec![child("a", "p1")]);
        let a = tree.roots()[0];
        tree.toggle(a);
        assert!(tree.fail_expand(a));
        assert!(matches!(tree.toggle(a), ToggleOutcome::Load(_)));
    }
}
