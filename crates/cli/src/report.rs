//! Simulation report.
//!
//! Prints the configuration, the final contents of every level (most
//! recently used first, `D` marking dirty lines), the stream buffers, and
//! the lettered measurement block. The same numbers are available as JSON.

use std::io::{self, Write};
use std::path::Path;

use cachesim_core::config::HierarchyConfig;
use cachesim_core::{Cache, CacheHierarchy, CacheStats};
use serde::Serialize;

const RULE: &str = "=====";

/// Writes the configuration header.
pub fn configuration(
    out: &mut impl Write,
    config: &HierarchyConfig,
    trace: &Path,
) -> io::Result<()> {
    writeln!(out, "{RULE} Simulator configuration {RULE}")?;
    for level in &config.levels {
        writeln!(
            out,
            "{:<3} {} B, {}-way, {} B blocks, {} stream buffer(s) x {} block(s)",
            level.name,
            level.size_bytes,
            level.associativity,
            level.block_bytes,
            level.stream_buffers,
            if level.stream_buffers > 0 { level.stream_buffer_depth } else { 0 },
        )?;
    }
    writeln!(out, "trace_file: {}", trace.display())?;
    writeln!(out)
}

/// Writes the resident tags of every level, then any stream buffers.
pub fn contents(out: &mut impl Write, hierarchy: &CacheHierarchy) -> io::Result<()> {
    for level in hierarchy.levels() {
        level_contents(out, level)?;
    }
    for level in hierarchy.levels().filter(|level| !level.stream_buffers().is_empty()) {
        stream_buffer_contents(out, level)?;
    }
    Ok(())
}

fn level_contents(out: &mut impl Write, cache: &Cache) -> io::Result<()> {
    writeln!(out, "{RULE} {} contents {RULE}", cache.name())?;
    // Every set gets a row; empty sets leave it blank.
    for (index, set) in cache.sets().enumerate() {
        if !set.is_empty() {
            write!(out, "set      {index}: ")?;
        }
        for line in set.iter().rev() {
            let dirty = if line.is_dirty() { 'D' } else { ' ' };
            write!(out, "  {:x} {dirty}", line.tag())?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn stream_buffer_contents(out: &mut impl Write, cache: &Cache) -> io::Result<()> {
    writeln!(out, "{RULE} {} stream buffer(s) contents {RULE}", cache.name())?;
    for buffer in cache.stream_buffers().iter().rev() {
        for key in buffer.keys() {
            write!(out, " {key:x} ")?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

/// Writes the lettered measurement block.
///
/// L1 fills `a.` through `g.`, L2 (or zeros when there is none) fills
/// `h.` through `p.`, and `q.` is the traffic between the last level and
/// memory. Levels below L2 repeat the `h.`..`p.` block.
pub fn measurements(out: &mut impl Write, hierarchy: &CacheHierarchy) -> io::Result<()> {
    writeln!(out, "{RULE} Measurements {RULE}")?;

    let mut levels = hierarchy.levels();
    if let Some(l1) = levels.next() {
        let (name, s) = (l1.name(), l1.stats());
        row(out, 'a', &format!("{name} reads"), s.reads)?;
        row(out, 'b', &format!("{name} read misses"), s.read_misses)?;
        row(out, 'c', &format!("{name} writes"), s.writes)?;
        row(out, 'd', &format!("{name} write misses"), s.write_misses)?;
        rate(out, 'e', &format!("{name} miss rate"), s.miss_rate())?;
        row(out, 'f', &format!("{name} writebacks"), s.write_backs)?;
        row(out, 'g', &format!("{name} prefetches"), s.prefetches)?;
    }

    let mut lower = levels.peekable();
    if lower.peek().is_none() {
        lower_block(out, "L2", &CacheStats::default())?;
    }
    for level in lower {
        lower_block(out, level.name(), level.stats())?;
    }

    row(out, 'q', "memory traffic", hierarchy.memory_traffic())
}

fn lower_block(out: &mut impl Write, name: &str, s: &CacheStats) -> io::Result<()> {
    row(out, 'h', &format!("{name} reads (demand)"), s.reads)?;
    row(out, 'i', &format!("{name} read misses (demand)"), s.read_misses)?;
    // Stream buffers fetch from memory directly, so no level sees prefetch reads.
    row(out, 'j', &format!("{name} reads (prefetch)"), 0)?;
    row(out, 'k', &format!("{name} read misses (prefetch)"), 0)?;
    row(out, 'l', &format!("{name} writes"), s.writes)?;
    row(out, 'm', &format!("{name} write misses"), s.write_misses)?;
    rate(out, 'n', &format!("{name} miss rate"), s.read_miss_rate())?;
    row(out, 'o', &format!("{name} writebacks"), s.write_backs)?;
    row(out, 'p', &format!("{name} prefetches"), s.prefetches)
}

fn row(out: &mut impl Write, letter: char, label: &str, value: u64) -> io::Result<()> {
    writeln!(out, "{letter}. {:<30}{value}", format!("{label}:"))
}

fn rate(out: &mut impl Write, letter: char, label: &str, value: f64) -> io::Result<()> {
    writeln!(out, "{letter}. {:<30}{value:.4}", format!("{label}:"))
}

/// Per-level figures of the JSON report.
#[derive(Debug, Serialize)]
struct LevelReport<'a> {
    name: &'a str,
    miss_rate: f64,
    traffic: u64,
    stats: CacheStats,
    stream_buffers: Vec<Vec<u32>>,
}

/// The JSON report.
#[derive(Debug, Serialize)]
struct Report<'a> {
    config: &'a HierarchyConfig,
    records: u64,
    levels: Vec<LevelReport<'a>>,
    memory_traffic: u64,
}

/// Writes the configuration and every level's counters as pretty-printed JSON.
pub fn json(
    out: &mut impl Write,
    config: &HierarchyConfig,
    hierarchy: &CacheHierarchy,
    records: u64,
) -> serde_json::Result<()> {
    let levels = hierarchy
        .levels()
        .enumerate()
        .map(|(depth, level)| LevelReport {
            name: level.name(),
            miss_rate: hierarchy.miss_rate(depth).unwrap_or_default(),
            traffic: level.stats().traffic(),
            stats: *level.stats(),
            stream_buffers: level
                .stream_buffers()
                .iter()
                .rev()
                .map(|buffer| buffer.keys().collect())
                .collect(),
        })
        .collect();

    let report = Report {
        config,
        records,
        levels,
        memory_traffic: hierarchy.memory_traffic(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out).map_err(serde_json::Error::io)
}
