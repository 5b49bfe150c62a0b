//! Record digests.

use crate::record::{
    BYTES, DST_PORT, END, FIELD_COUNT, FlowRecord, KEY_FIELDS, PACKETS, SRC_PORT, START,
};
use std::collections::BTreeMap;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;
use vf_error::{DigestError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
    packets: u64,
    bytes: u64,
}

/// Compacts flow records into one line per group of stable fields.
///
/// Records sharing version, account, interface, addresses, service port,
/// protocol, action and log status form a group. Packets and bytes are
/// summed per group; the time bounds are those of the whole input.
///
/// The service port is the lower of the two ports and is reported as the
/// destination port, with the source port zeroed, so both directions of a
/// conversation land in the same group.
#[derive(Debug, Default)]
pub struct Digester {
    groups: BTreeMap<String, Totals>,
    start: Option<i64>,
    end: Option<i64>,
    lines: u64,
    records: u64,
}

impl Digester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one line of input. Skipped lines still count toward line numbers.
    pub fn add_line(&mut self, line: &str) -> Result<()> {
        self.lines += 1;
        let Some(record) = FlowRecord::parse(line, self.lines)? else {
            return Ok(());
        };
        self.records += 1;

        let mut fields = record.fields.map(str::to_string);
        if record.src_port < record.dst_port {
            fields[DST_PORT] = record.src_port.to_string();
        }

        let key = fields
            .iter()
            .enumerate()
            .map(|(i, f)| if KEY_FIELDS[i] { f.as_str() } else { "-" })
            .collect::<Vec<_>>()
            .join(" ");

        let totals = self.groups.entry(key).or_default();
        totals.packets = totals.packets.saturating_add(record.packets);
        totals.bytes = totals.bytes.saturating_add(record.bytes);

        self.start = Some(self.start.map_or(record.start, |s| s.min(record.start)));
        self.end = Some(self.end.map_or(record.end, |e| e.max(record.end)));
        Ok(())
    }

    /// Number of lines seen, skipped ones included.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Number of accepted records.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn finish(self) -> Digest {
        let start = self.start.unwrap_or_default();
        let end = self.end.unwrap_or_default();

        let lines = self
            .groups
            .into_iter()
            .map(|(key, totals)| {
                let mut fields: Vec<String> = key.split(' ').map(str::to_string).collect();
                fields.resize(FIELD_COUNT, "-".to_string());
                fields[SRC_PORT] = "0".to_string();
                fields[PACKETS] = totals.packets.to_string();
                fields[BYTES] = totals.bytes.to_string();
                fields[START] = start.to_string();
                fields[END] = end.to_string();
                fields.join(" ")
            })
            .collect();

        Digest {
            lines,
            records: self.records,
        }
    }
}

/// The result of digesting a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digest {
    lines: Vec<String>,
    records: u64,
}

impl Digest {
    /// Digested records, sorted by their group fields.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of input records summarized.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The digest as newline-terminated text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Digest every record readable from `reader`.
pub async fn digest<R: AsyncRead + Unpin>(reader: R) -> Result<Digest> {
    let mut lines = BufReader::new(reader).lines();
    let mut digester = Digester::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| DigestError::Io(e.to_string()))?
    {
        digester.add_line(&line)?;
    }

    debug!(
        lines = digester.lines(),
        records = digester.records(),
        groups = digester.groups.len(),
        "Digest complete"
    );
    Ok(digester.finish())
}
