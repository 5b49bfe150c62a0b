//! Graphviz DOT conversion.

use crate::record::{
    ACCOUNT_ID, BYTES, DST_PORT, END, FlowRecord, INTERFACE_ID, PACKETS, PROTOCOL, SRC_PORT, START,
};
use std::collections::BTreeMap;
use std::fmt::Write;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;
use vf_error::{DigestError, Result};

/// Prefix of the machine-readable edge attributes.
const ATTR_NAMESPACE: &str = "govpc_";

/// Edge annotations, in output order.
static EDGE_LABELS: [(usize, &str); 9] = [
    (ACCOUNT_ID, "accountID"),
    (INTERFACE_ID, "eniID"),
    (SRC_PORT, "srcPort"),
    (DST_PORT, "dstPort"),
    (PROTOCOL, "protocol"),
    (PACKETS, "packets"),
    (BYTES, "bytes"),
    (START, "start"),
    (END, "end"),
];

/// Builds a directed graph with one edge per flow record.
///
/// Nodes are addresses. Each edge carries the record's fields both as
/// `govpc_*` attributes and as a rendered label, and is red for rejected
/// traffic, green otherwise. Works on raw records as well as digests.
#[derive(Debug, Default)]
pub struct DotGraph {
    edges: Vec<String>,
    nodes: BTreeMap<String, String>,
    lines: u64,
}

impl DotGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one line of input.
    pub fn add_line(&mut self, line: &str) -> Result<()> {
        self.lines += 1;
        let Some(record) = FlowRecord::parse(line, self.lines)? else {
            return Ok(());
        };

        let src = self.node(record.src_addr());
        let dst = self.node(record.dst_addr());

        let mut attrs = Vec::with_capacity(EDGE_LABELS.len() + 2);
        let mut label = Vec::with_capacity(EDGE_LABELS.len());
        for (index, name) in EDGE_LABELS {
            let value = record.fields[index];
            attrs.push(format!("{ATTR_NAMESPACE}{name}={}", quote(value)));
            label.push(format!("{name}={value}"));
        }
        let color = if record.is_reject() { "red" } else { "green" };
        attrs.push(format!("color={color}"));
        attrs.push(format!("label={}", quote(&label.join("\\n"))));

        self.edges
            .push(format!("{src} -> {dst} [{}]", attrs.join(" ")));
        Ok(())
    }

    fn node(&mut self, addr: &str) -> String {
        let id = node_id(addr);
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| addr.to_string());
        id
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Render the graph: edges in input order, then nodes sorted by id.
    pub fn render(&self) -> String {
        let mut out = String::from("digraph {\n");
        for edge in &self.edges {
            let _ = writeln!(out, "\t{edge}");
        }
        for (id, addr) in &self.nodes {
            let _ = writeln!(out, "\t{id} [label={}]", quote(addr));
        }
        out.push_str("}\n");
        out
    }
}

/// Graphviz node id for an address: `n` followed by the address without
/// `.` and `:` separators.
fn node_id(addr: &str) -> String {
    let mut id = String::with_capacity(addr.len() + 1);
    id.push('n');
    id.extend(addr.chars().filter(|c| *c != '.' && *c != ':'));
    id
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Convert every record readable from `reader` into a DOT graph.
pub async fn to_dot<R: AsyncRead + Unpin>(reader: R) -> Result<String> {
    let mut lines = BufReader::new(reader).lines();
    let mut graph = DotGraph::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| DigestError::Io(e.to_string()))?
    {
        graph.add_line(&line)?;
    }

    debug!(
        edges = graph.edge_count(),
        nodes = graph.node_count(),
        "Graph complete"
    );
    Ok(graph.render())
}
