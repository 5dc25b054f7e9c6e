//! Test data builders for creating pipelines

use pipeline_editor::{Edge, PipelineNode, PipelineStore, Position};

/// Builder for a single node with a fixed id
pub struct NodeBuilder {
    id: String,
    type_id: String,
    label: String,
    position: Position,
}

impl NodeBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            type_id: "transformer".to_string(),
            label: id.to_string(),
            position: Position::default(),
        }
    }

    pub fn type_id(mut self, type_id: &str) -> Self {
        self.type_id = type_id.to_string();
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn build(self) -> PipelineNode {
        PipelineNode::new(self.id, self.type_id, self.label, self.position)
    }
}

/// Builder for a whole graph with readable ids
#[derive(Default)]
pub struct PipelineBuilder {
    nodes: Vec<PipelineNode>,
    edges: Vec<Edge>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: &str, type_id: &str, label: &str) -> Self {
        let x = self.nodes.len() as f64 * 200.0;
        self.nodes
            .push(NodeBuilder::new(id).type_id(type_id).label(label).at(x, 0.0).build());
        self
    }

    /// Add an edge without validation
    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push(Edge::new(source, target));
        self
    }

    pub fn build(self) -> (Vec<PipelineNode>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    /// Load the graph into `store`, bypassing connection validation
    pub fn load_into(self, store: &PipelineStore) {
        let (nodes, edges) = self.build();
        store
            .replace_nodes(nodes)
            .expect("builder produced duplicate node ids");
        store.replace_edges(edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_builder() {
        let (nodes, edges) = PipelineBuilder::new()
            .node("a", "data-source", "CSV")
            .node("b", "sink", "S3")
            .edge("a", "b")
            .build();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].position, Position::new(200.0, 0.0));
        assert_eq!(edges[0].id.as_str(), "a->b");
    }
}
