//! Layered layout for the table graph.
//!
//! Sugiyama-style: cycle-tolerant ranking, barycenter ordering within ranks,
//! then coordinate assignment along the axis implied by the requested
//! direction. A pure function of (nodes, edges, direction): no shared state,
//! no randomness, and a direction change recomputes every position from
//! scratch.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::flow::FlowGraph;
use crate::measure::NodeMetrics;

/// Rank axis orientation, from the consumer strings LR / TB / RL / BT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    TopToBottom,
    RightToLeft,
    BottomToTop,
}

impl Direction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LR" => Some(Self::LeftToRight),
            "TB" => Some(Self::TopToBottom),
            "RL" => Some(Self::RightToLeft),
            "BT" => Some(Self::BottomToTop),
            _ => None,
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Self::TopToBottom | Self::BottomToTop)
    }

    fn is_reversed(self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomToTop)
    }
}

/// A positioned node, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The complete layout result. Nodes are in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub width: f64,
    pub height: f64,
}

pub struct LayoutEngine {
    metrics: NodeMetrics,
    node_gap_horizontal: f64, // between rank siblings in TB/BT
    node_gap_vertical: f64,   // between rank siblings in LR/RL
    rank_gap_vertical: f64,   // between ranks in TB/BT
    rank_gap_horizontal: f64, // between ranks in LR/RL
    margin: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            metrics: NodeMetrics::default(),
            node_gap_horizontal: 100.0,
            node_gap_vertical: 150.0,
            rank_gap_vertical: 150.0,
            rank_gap_horizontal: 200.0,
            margin: 30.0,
        }
    }
}

impl LayoutEngine {
    /// Compute positions for every node of the graph.
    pub fn layout(&self, graph: &FlowGraph, direction: Direction) -> Layout {
        let n = graph.nodes.len();
        if n == 0 {
            return Layout {
                nodes: Vec::new(),
                width: 0.0,
                height: 0.0,
            };
        }

        // Adjacency over node indices. Edges pointing at tables that were
        // never parsed have no box to route to and are ignored here, as are
        // self references.
        let index: HashMap<&str, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();
        let mut succs: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in &graph.edges {
            let (Some(&from), Some(&to)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if from != to {
                succs[from].push(to);
            }
        }

        let back_edges = find_back_edges(n, &succs);
        let (dag_succs, dag_preds) = orient_edges(n, &succs, &back_edges);
        let rank = assign_ranks(n, &dag_succs, &dag_preds);
        let ranks = order_ranks(n, &rank, &dag_succs, &dag_preds);
        self.place(graph, &ranks, direction)
    }

    /// Phase 4: coordinate assignment. Ranks advance along the primary axis;
    /// nodes stack along the cross axis, centered per rank. RL and BT mirror
    /// the primary axis afterwards.
    fn place(&self, graph: &FlowGraph, ranks: &[Vec<usize>], direction: Direction) -> Layout {
        let n = graph.nodes.len();
        let sizes: Vec<(f64, f64)> = graph
            .nodes
            .iter()
            .map(|node| self.metrics.node_size(node.columns.len()))
            .collect();

        let vertical = direction.is_vertical();
        let node_gap = if vertical {
            self.node_gap_horizontal
        } else {
            self.node_gap_vertical
        };
        let rank_gap = if vertical {
            self.rank_gap_vertical
        } else {
            self.rank_gap_horizontal
        };

        let cross_size = |i: usize| if vertical { sizes[i].0 } else { sizes[i].1 };
        let main_size = |i: usize| if vertical { sizes[i].1 } else { sizes[i].0 };
        let cross_extent = |rank: &[usize]| -> f64 {
            let total: f64 = rank.iter().map(|&i| cross_size(i)).sum();
            total + rank.len().saturating_sub(1) as f64 * node_gap
        };
        let max_cross = ranks.iter().map(|r| cross_extent(r)).fold(0.0, f64::max);

        let mut main_pos = vec![0.0f64; n];
        let mut cross_pos = vec![0.0f64; n];
        let mut main_cursor = self.margin;
        for rank_nodes in ranks {
            if rank_nodes.is_empty() {
                continue;
            }
            let thickness = rank_nodes
                .iter()
                .map(|&i| main_size(i))
                .fold(0.0, f64::max);
            let mut cross_cursor = self.margin + (max_cross - cross_extent(rank_nodes)) / 2.0;
            for &i in rank_nodes {
                main_pos[i] = main_cursor + (thickness - main_size(i)) / 2.0;
                cross_pos[i] = cross_cursor;
                cross_cursor += cross_size(i) + node_gap;
            }
            main_cursor += thickness + rank_gap;
        }
        let main_extent = main_cursor - rank_gap + self.margin;
        let cross_total = max_cross + 2.0 * self.margin;
        let (width, height) = if vertical {
            (cross_total, main_extent)
        } else {
            (main_extent, cross_total)
        };

        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let (w, h) = sizes[i];
                let (mut x, mut y) = if vertical {
                    (cross_pos[i], main_pos[i])
                } else {
                    (main_pos[i], cross_pos[i])
                };
                if direction.is_reversed() {
                    if vertical {
                        y = height - y - h;
                    } else {
                        x = width - x - w;
                    }
                }
                LayoutNode {
                    id: node.id.clone(),
                    x,
                    y,
                    width: w,
                    height: h,
                }
            })
            .collect();

        Layout {
            nodes,
            width,
            height,
        }
    }
}

/// Phase 1: DFS over the directed graph; edges that close a cycle are
/// collected so ranking can treat them as reversed.
fn find_back_edges(n: usize, succs: &[Vec<usize>]) -> HashSet<(usize, usize)> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        White,
        Gray,
        Black,
    }
    let mut mark = vec![Mark::White; n];
    let mut back = HashSet::new();
    for root in 0..n {
        if mark[root] != Mark::White {
            continue;
        }
        mark[root] = Mark::Gray;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            if frame.1 < succs[node].len() {
                let child = succs[node][frame.1];
                frame.1 += 1;
                match mark[child] {
                    Mark::Gray => {
                        back.insert((node, child));
                    }
                    Mark::White => {
                        mark[child] = Mark::Gray;
                        stack.push((child, 0));
                    }
                    Mark::Black => {}
                }
            } else {
                mark[node] = Mark::Black;
                stack.pop();
            }
        }
    }
    back
}

/// Build the acyclic adjacency used for ranking: back edges run reversed.
fn orient_edges(
    n: usize,
    succs: &[Vec<usize>],
    back: &HashSet<(usize, usize)>,
) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let mut dag_succs: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dag_preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    for from in 0..n {
        for &to in &succs[from] {
            let (f, t) = if back.contains(&(from, to)) {
                (to, from)
            } else {
                (from, to)
            };
            dag_succs[f].push(t);
            dag_preds[t].push(f);
        }
    }
    (dag_succs, dag_preds)
}

/// Phase 2: longest-path ranking in topological order. Sources and isolated
/// nodes land on rank 0.
fn assign_ranks(n: usize, dag_succs: &[Vec<usize>], dag_preds: &[Vec<usize>]) -> Vec<usize> {
    let mut indegree: Vec<usize> = dag_preds.iter().map(|p| p.len()).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut topo = Vec::with_capacity(n);
    while let Some(node) = queue.pop_front() {
        topo.push(node);
        for &succ in &dag_succs[node] {
            indegree[succ] -= 1;
            if indegree[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    let mut rank = vec![0usize; n];
    for &node in &topo {
        for &succ in &dag_succs[node] {
            rank[succ] = rank[succ].max(rank[node] + 1);
        }
    }
    rank
}

/// Phase 3: group nodes by rank (first-seen order) and run four barycenter
/// sweeps, down by predecessors then up by successors. Ties and neighborless
/// nodes keep their current position; the sort is stable, so the result is
/// deterministic.
fn order_ranks(
    n: usize,
    rank: &[usize],
    dag_succs: &[Vec<usize>],
    dag_preds: &[Vec<usize>],
) -> Vec<Vec<usize>> {
    let max_rank = rank.iter().copied().max().unwrap_or(0);
    let mut ranks: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for i in 0..n {
        ranks[rank[i]].push(i);
    }

    for _ in 0..4 {
        for r in 1..ranks.len() {
            let (before, rest) = ranks.split_at_mut(r);
            barycenter_pass(&mut rest[0], dag_preds, &before[r - 1]);
        }
        for r in (0..ranks.len().saturating_sub(1)).rev() {
            let (head, tail) = ranks.split_at_mut(r + 1);
            barycenter_pass(&mut head[r], dag_succs, &tail[0]);
        }
    }
    ranks
}

fn barycenter_pass(layer: &mut Vec<usize>, neighbors: &[Vec<usize>], other: &[usize]) {
    let other_pos: HashMap<usize, f64> = other
        .iter()
        .enumerate()
        .map(|(i, &node)| (node, i as f64))
        .collect();
    let mut scored: Vec<(usize, f64)> = layer
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let positions: Vec<f64> = neighbors[node]
                .iter()
                .filter_map(|p| other_pos.get(p).copied())
                .collect();
            let score = if positions.is_empty() {
                i as f64
            } else {
                positions.iter().sum::<f64>() / positions.len() as f64
            };
            (node, score)
        })
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    *layer = scored.into_iter().map(|(node, _)| node).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowGraph;
    use crate::sql;

    const DIRECTIONS: [Direction; 4] = [
        Direction::LeftToRight,
        Direction::TopToBottom,
        Direction::RightToLeft,
        Direction::BottomToTop,
    ];

    fn flow(ddl: &str) -> FlowGraph {
        FlowGraph::from_schema(&sql::parse(ddl))
    }

    fn node<'a>(layout: &'a Layout, id: &str) -> &'a LayoutNode {
        layout.nodes.iter().find(|n| n.id == id).unwrap()
    }

    fn overlaps(a: &LayoutNode, b: &LayoutNode) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn test_empty_graph() {
        let layout = LayoutEngine::default().layout(&FlowGraph::default(), Direction::LeftToRight);
        assert!(layout.nodes.is_empty());
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.height, 0.0);
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!(Direction::from_str("LR"), Some(Direction::LeftToRight));
        assert_eq!(Direction::from_str("tb"), Some(Direction::TopToBottom));
        assert_eq!(Direction::from_str("diagonal"), None);
        assert_eq!(Direction::default(), Direction::LeftToRight);
    }

    #[test]
    fn test_ranks_follow_edges() {
        let graph = flow(
            "CREATE TABLE users (id int PRIMARY KEY);\n\
             CREATE TABLE orders (id int PRIMARY KEY, user_id int REFERENCES users (id));",
        );
        let engine = LayoutEngine::default();

        // edge runs orders -> users, so users sits one rank further along
        let lr = engine.layout(&graph, Direction::LeftToRight);
        assert!(node(&lr, "users").x > node(&lr, "orders").x);

        let rl = engine.layout(&graph, Direction::RightToLeft);
        assert!(node(&rl, "users").x < node(&rl, "orders").x);

        let tb = engine.layout(&graph, Direction::TopToBottom);
        assert!(node(&tb, "users").y > node(&tb, "orders").y);

        let bt = engine.layout(&graph, Direction::BottomToTop);
        assert!(node(&bt, "users").y < node(&bt, "orders").y);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let graph = flow(
            "CREATE TABLE a (id int PRIMARY KEY);\n\
             CREATE TABLE b (id int PRIMARY KEY, a_id int REFERENCES a (id));\n\
             CREATE TABLE c (id int PRIMARY KEY, a_id int REFERENCES a (id));",
        );
        let engine = LayoutEngine::default();
        for direction in DIRECTIONS {
            let first = engine.layout(&graph, direction);
            let second = engine.layout(&graph, direction);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_skewed_sizes_do_not_overlap() {
        let mut ddl = String::from("CREATE TABLE wide (");
        for i in 0..40 {
            if i > 0 {
                ddl.push_str(", ");
            }
            ddl.push_str(&format!("col_{i} text"));
        }
        ddl.push_str(");\nCREATE TABLE narrow (a int, b int, c int);");
        let graph = flow(&ddl);
        let engine = LayoutEngine::default();

        for direction in DIRECTIONS {
            let layout = engine.layout(&graph, direction);
            let wide = node(&layout, "wide");
            let narrow = node(&layout, "narrow");
            assert!(wide.height > narrow.height);
            assert!(
                !overlaps(wide, narrow),
                "overlap in {direction:?}: {wide:?} vs {narrow:?}"
            );
        }
    }

    #[test]
    fn test_all_pairs_disjoint_in_larger_graph() {
        let graph = flow(
            "CREATE TABLE a (id int PRIMARY KEY);\n\
             CREATE TABLE b (id int PRIMARY KEY, a_id int REFERENCES a (id));\n\
             CREATE TABLE c (id int PRIMARY KEY, a_id int REFERENCES a (id), b_id int REFERENCES b (id));\n\
             CREATE TABLE d (id int PRIMARY KEY, c_id int REFERENCES c (id));\n\
             CREATE TABLE loner (id int PRIMARY KEY);",
        );
        let engine = LayoutEngine::default();
        for direction in DIRECTIONS {
            let layout = engine.layout(&graph, direction);
            for i in 0..layout.nodes.len() {
                for j in i + 1..layout.nodes.len() {
                    assert!(
                        !overlaps(&layout.nodes[i], &layout.nodes[j]),
                        "overlap in {direction:?}"
                    );
                }
            }
            assert!(layout.width > 0.0 && layout.height > 0.0);
        }
    }

    #[test]
    fn test_cyclic_references_do_not_hang() {
        let graph = flow(
            "CREATE TABLE a (id int PRIMARY KEY, b_id int REFERENCES b (id));\n\
             CREATE TABLE b (id int PRIMARY KEY, a_id int REFERENCES a (id));",
        );
        let layout = LayoutEngine::default().layout(&graph, Direction::LeftToRight);
        assert_eq!(layout.nodes.len(), 2);
        assert!(!overlaps(&layout.nodes[0], &layout.nodes[1]));
    }

    #[test]
    fn test_edge_to_unknown_table_is_ignored() {
        let graph = flow("CREATE TABLE a (id int, ghost_id int REFERENCES ghost (id));");
        let layout = LayoutEngine::default().layout(&graph, Direction::LeftToRight);
        assert_eq!(layout.nodes.len(), 1);
        assert_eq!(layout.nodes[0].x, 30.0);
        assert_eq!(layout.nodes[0].y, 30.0);
    }

    #[test]
    fn test_node_order_matches_input() {
        let graph = flow(
            "CREATE TABLE z (id int);\nCREATE TABLE a (id int);\nCREATE TABLE m (id int);",
        );
        let layout = LayoutEngine::default().layout(&graph, Direction::TopToBottom);
        let ids: Vec<&str> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }
}
