//! Rank projects by chain depth and render the report.
//!
//! The assembled graph (`project → its references`) is inverted once so the
//! analysis input runs prerequisite → dependent, then every project's
//! longest prerequisite chain is computed and the deepest `top` projects are
//! reported, each with one reconstructed chain.

use std::io::{self, Write};

use refdepth_graph::{DirectedGraph, GraphError, LongestPathFinder};
use serde::Serialize;
use tracing::info;

use crate::output::{OutputMode, pretty_rule, render};

/// The ranked depth report.
#[derive(Debug, Serialize)]
pub struct DepthReport {
    /// Total number of projects in the graph.
    pub projects: usize,
    /// Total number of reference edges in the graph.
    pub references: usize,
    /// The deepest projects, depth descending.
    pub entries: Vec<DepthEntry>,
}

/// One ranked project with its reconstructed chain.
#[derive(Debug, Serialize)]
pub struct DepthEntry {
    /// Project directory (normalized, relative to the base dir).
    pub project: String,
    /// Number of projects on the longest prerequisite chain, this one
    /// included. Lower-bounds the sequential build steps behind it.
    pub len: usize,
    /// One longest chain, from this project back to a leaf prerequisite.
    pub longest_path: Vec<String>,
}

/// Analyze `graph` (edges `project → its references`) and rank the `top`
/// deepest projects.
///
/// Ties in depth break by project name so reports are stable run to run.
///
/// # Errors
///
/// Propagates [`GraphError`]: cycle errors when the reference graph is not
/// a DAG (reportable), missing-node errors on invariant breaches (defects).
pub fn build_report(graph: &DirectedGraph<String>, top: usize) -> Result<DepthReport, GraphError> {
    let finder = LongestPathFinder::new(&graph.invert())?;

    let mut ranked: Vec<(&String, usize)> = finder
        .lengths()
        .iter()
        .map(|(project, &len)| (project, len))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut entries = Vec::with_capacity(top.min(ranked.len()));
    for (project, len) in ranked.into_iter().take(top) {
        let longest_path = finder.longest_path_ending_with(project)?;
        entries.push(DepthEntry {
            project: project.clone(),
            len,
            longest_path,
        });
    }
    info!(
        projects = graph.node_count(),
        reported = entries.len(),
        "depth ranking computed"
    );

    Ok(DepthReport {
        projects: graph.node_count(),
        references: graph.edge_count(),
        entries,
    })
}

/// Render the report in the requested output mode.
///
/// # Errors
///
/// Fails only on stdout I/O or JSON serialization errors.
pub fn render_report(report: &DepthReport, mode: OutputMode) -> anyhow::Result<()> {
    render(mode, report, |report, w| match mode {
        OutputMode::Text => render_text(report, w),
        _ => render_human(report, w),
    })
}

fn render_human(report: &DepthReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "Deepest build chains ({} projects, {} references)",
        report.projects, report.references
    )?;
    pretty_rule(w)?;
    for entry in &report.entries {
        writeln!(w, "{:>4}  {}", entry.len, entry.project)?;
        for step in entry.longest_path.iter().skip(1) {
            writeln!(w, "      ↳ {step}")?;
        }
    }
    Ok(())
}

/// One tab-separated row per project: depth, project, chain joined by `->`.
fn render_text(report: &DepthReport, w: &mut dyn Write) -> io::Result<()> {
    for entry in &report.entries {
        writeln!(
            w,
            "{}\t{}\t{}",
            entry.len,
            entry.project,
            entry.longest_path.join(" -> ")
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
