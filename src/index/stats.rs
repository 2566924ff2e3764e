use serde::Serialize;
use std::io::{self, Write};

/// Shape of a built suffix tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub words: usize,
    /// Including the root
    pub nodes: usize,
    pub leaves: usize,
    /// Total length of all edge labels
    pub edge_bytes: u64,
    /// Total intervals stored across all nodes
    pub annotations: usize,
    /// Longest root-to-leaf path in bytes, sentinel included
    pub max_depth: usize,
}

/// Display tree statistics
pub fn write_stats(out: &mut impl Write, stats: &TreeStats, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, stats)?;
        return writeln!(out);
    }

    writeln!(out, "Suffix Tree Statistics")?;
    writeln!(out, "======================")?;
    writeln!(out)?;
    writeln!(out, "Words:            {}", stats.words)?;
    writeln!(out, "Nodes:            {}", stats.nodes)?;
    writeln!(out, "Leaves:           {}", stats.leaves)?;
    writeln!(out, "Edge bytes:       {}", format_size(stats.edge_bytes))?;
    writeln!(out, "Annotations:      {}", stats.annotations)?;
    writeln!(out, "Max depth:        {}", stats.max_depth)?;

    if stats.nodes > 0 {
        writeln!(
            out,
            "Per node:         {:.2} annotations",
            stats.annotations as f64 / stats.nodes as f64
        )?;
    }

    Ok(())
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
