//! Flow log version 2 records.

use vf_error::{DigestError, Result};

/// Number of fields in a version 2 record.
pub const FIELD_COUNT: usize = 14;

pub(crate) const VERSION: usize = 0;
pub(crate) const ACCOUNT_ID: usize = 1;
pub(crate) const INTERFACE_ID: usize = 2;
pub(crate) const SRC_ADDR: usize = 3;
pub(crate) const DST_ADDR: usize = 4;
pub(crate) const SRC_PORT: usize = 5;
pub(crate) const DST_PORT: usize = 6;
pub(crate) const PROTOCOL: usize = 7;
pub(crate) const PACKETS: usize = 8;
pub(crate) const BYTES: usize = 9;
pub(crate) const START: usize = 10;
pub(crate) const END: usize = 11;
pub(crate) const ACTION: usize = 12;
pub(crate) const LOG_STATUS: usize = 13;

/// Fields that identify a digest group, indexed by field position.
///
/// The others (source port, counters, time bounds) vary from record to
/// record and are aggregated.
pub static KEY_FIELDS: [bool; FIELD_COUNT] = [
    true,  // version
    true,  // account-id
    true,  // interface-id
    true,  // srcaddr
    true,  // dstaddr
    false, // srcport
    true,  // dstport
    true,  // protocol
    false, // packets
    false, // bytes
    false, // start
    false, // end
    true,  // action
    true,  // log-status
];

/// One accepted flow record.
///
/// ```text
/// version account-id interface-id srcaddr dstaddr srcport dstport protocol packets bytes start end action log-status
/// 2 123456789010 eni-abc123de 172.31.16.139 172.31.16.21 20641 22 6 20 4249 1418530010 1418530070 ACCEPT OK
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRecord<'a> {
    pub fields: [&'a str; FIELD_COUNT],
    pub src_port: u32,
    pub dst_port: u32,
    pub packets: u64,
    pub bytes: u64,
    pub start: i64,
    pub end: i64,
}

impl<'a> FlowRecord<'a> {
    /// Parse one line.
    ///
    /// Returns `Ok(None)` for blank lines, records of other versions and
    /// records whose log status is not `OK`. `line_number` is only used in
    /// error messages.
    pub fn parse(line: &'a str, line_number: u64) -> Result<Option<Self>> {
        let mut fields = [""; FIELD_COUNT];
        let mut count = 0;
        for field in line.split_whitespace() {
            if count < FIELD_COUNT {
                fields[count] = field;
            }
            count += 1;
        }

        if count == 0 {
            return Ok(None);
        }
        if count < FIELD_COUNT {
            return Err(malformed(
                line_number,
                format!("expected {FIELD_COUNT} fields, found {count}"),
            ));
        }

        if fields[VERSION] != "2" || !fields[LOG_STATUS].eq_ignore_ascii_case("ok") {
            return Ok(None);
        }

        Ok(Some(Self {
            src_port: number(&fields, SRC_PORT, "srcport", line_number)?,
            dst_port: number(&fields, DST_PORT, "dstport", line_number)?,
            packets: number(&fields, PACKETS, "packets", line_number)?,
            bytes: number(&fields, BYTES, "bytes", line_number)?,
            start: number(&fields, START, "start", line_number)?,
            end: number(&fields, END, "end", line_number)?,
            fields,
        }))
    }

    pub fn src_addr(&self) -> &'a str {
        self.fields[SRC_ADDR]
    }

    pub fn dst_addr(&self) -> &'a str {
        self.fields[DST_ADDR]
    }

    pub fn is_reject(&self) -> bool {
        self.fields[ACTION].eq_ignore_ascii_case("reject")
    }

    pub fn account_id(&self) -> &'a str {
        self.fields[ACCOUNT_ID]
    }

    pub fn interface_id(&self) -> &'a str {
        self.fields[INTERFACE_ID]
    }

    pub fn protocol(&self) -> &'a str {
        self.fields[PROTOCOL]
    }
}

fn number<T: std::str::FromStr>(
    fields: &[&str; FIELD_COUNT],
    index: usize,
    name: &str,
    line_number: u64,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    fields[index].parse().map_err(|e| {
        malformed(
            line_number,
            format!("invalid {name} '{}': {e}", fields[index]),
        )
    })
}

fn malformed(line: u64, reason: String) -> vf_error::VfError {
    DigestError::MalformedRecord { line, reason }.into()
}
