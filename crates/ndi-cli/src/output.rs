//! Result formatting for the tool's commands.

use crate::OutputFormat;
use anyhow::Result;
use lib_ndi_types::Source;
use serde::Serialize;
use std::io::Write;

/// What `info` reports about the loaded runtime.
#[derive(Clone, Debug, Serialize)]
pub struct RuntimeInfo {
    pub library: String,
    pub version: Option<String>,
    pub supported_cpu: bool,
    pub entries: Vec<RevisionEntries>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RevisionEntries {
    pub revision: String,
    pub entries: usize,
}

/// One captured frame, as `recv` reports it.
#[derive(Clone, Debug, Serialize)]
pub struct FrameReport {
    pub index: usize,
    pub kind: String,
    /// Resolution, sample layout or text length, depending on the kind.
    pub detail: String,
    pub timecode: Option<i64>,
}

pub fn write_info(out: &mut impl Write, info: &RuntimeInfo, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "NDI Runtime")?;
            writeln!(out, "===========")?;
            writeln!(out, "Library:       {}", info.library)?;
            writeln!(out, "Version:       {}", info.version.as_deref().unwrap_or("unknown"))?;
            writeln!(out, "Supported CPU: {}", if info.supported_cpu { "yes" } else { "no" })?;
            writeln!(out)?;
            writeln!(out, "Entry points by SDK revision:")?;
            for rev in &info.entries {
                writeln!(out, "  {:<5} {}", rev.revision, rev.entries)?;
            }
            let total: usize = info.entries.iter().map(|r| r.entries).sum();
            writeln!(out, "  total {}", total)?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(info)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "revision,entries")?;
            for rev in &info.entries {
                writeln!(out, "{},{}", rev.revision, rev.entries)?;
            }
        }
    }
    Ok(())
}

pub fn write_sources(out: &mut impl Write, sources: &[Source], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if sources.is_empty() {
                writeln!(out, "No sources found.")?;
            }
            for (i, source) in sources.iter().enumerate() {
                match &source.url_address {
                    Some(url) => writeln!(out, "{:>3}. {} ({})", i + 1, source.name, url)?,
                    None => writeln!(out, "{:>3}. {}", i + 1, source.name)?,
                }
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(sources)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "name,url_address")?;
            for source in sources {
                writeln!(
                    out,
                    "{},{}",
                    csv_field(&source.name),
                    csv_field(source.url_address.as_deref().unwrap_or(""))
                )?;
            }
        }
    }
    Ok(())
}

pub fn write_frames(out: &mut impl Write, frames: &[FrameReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for frame in frames {
                writeln!(out, "{:>5} {:<13} {}", frame.index, frame.kind, frame.detail)?;
            }
            writeln!(out, "{} frame(s)", frames.len())?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(frames)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "index,kind,detail,timecode")?;
            for frame in frames {
                let timecode = frame.timecode.map(|t| t.to_string()).unwrap_or_default();
                writeln!(out, "{},{},{},{}", frame.index, frame.kind, csv_field(&frame.detail), timecode)?;
            }
        }
    }
    Ok(())
}

/// Quote a field if it contains a separator or quote.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
