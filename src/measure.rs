/// Node box sizing for the rendered table cards.
///
/// Width is fixed; height grows with the column count and is never clamped,
/// so a wide table gets a proportionally taller box.
pub struct NodeMetrics {
    pub node_width: f64,
    pub header_height: f64,
    pub row_height: f64,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            node_width: 240.0,
            header_height: 60.0, // title bar + padding
            row_height: 33.0,
        }
    }
}

impl NodeMetrics {
    pub fn node_size(&self, column_count: usize) -> (f64, f64) {
        (
            self.node_width,
            self.header_height + column_count as f64 * self.row_height,
        )
    }
}
