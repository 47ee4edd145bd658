//! Line-oriented network description format
//!
//! One command per line, fields comma-separated, the first field selecting
//! the command:
//!
//! ```text
//! node,<label>,<x>,<y>,<population>
//! road,<label>,<from>,<to>,<length>,<speed_limit>,<lanes>
//! route,<label>,<label>[,<label>...]
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. The parser only
//! fills a [`NetworkBuilder`]; the engine itself always receives a
//! fully-built graph object.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::builder::NetworkBuilder;

/// Parses a network description into a builder.
pub fn parse_network(text: &str) -> Result<NetworkBuilder> {
    let mut builder = NetworkBuilder::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match fields[0] {
            "node" => {
                if fields.len() != 5 {
                    bail!("line {line_no}: node takes 4 fields, got {}", fields.len() - 1);
                }
                let x = parse_field(fields[2], "x", line_no)?;
                let y = parse_field(fields[3], "y", line_no)?;
                let population: u32 = parse_field(fields[4], "population", line_no)?;
                builder
                    .add_node(fields[1], x, y, population)
                    .with_context(|| format!("line {line_no}"))?;
            }
            "road" => {
                if fields.len() != 7 {
                    bail!("line {line_no}: road takes 6 fields, got {}", fields.len() - 1);
                }
                let length = parse_field(fields[4], "length", line_no)?;
                let speed_limit = parse_field(fields[5], "speed_limit", line_no)?;
                let lanes: u32 = parse_field(fields[6], "lanes", line_no)?;
                builder
                    .add_edge(fields[1], fields[2], fields[3], length, speed_limit, lanes)
                    .with_context(|| format!("line {line_no}"))?;
            }
            "route" => {
                builder
                    .add_trip(&fields[1..])
                    .with_context(|| format!("line {line_no}"))?;
            }
            other => bail!("line {line_no}: unknown command '{other}'"),
        }
    }

    Ok(builder)
}

/// Reads and parses a network description file.
pub fn load_network(path: &Path) -> Result<NetworkBuilder> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading network file {}", path.display()))?;
    parse_network(&text)
}

fn parse_field<T>(field: &str, name: &str, line_no: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    field
        .parse()
        .with_context(|| format!("line {line_no}: invalid {name} '{field}'"))
}
