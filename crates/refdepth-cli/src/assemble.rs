//! Build the project-reference graph from a tsconfig list file.
//!
//! Input is a newline-delimited list of tsconfig paths relative to a base
//! directory (the shape produced by `git ls-files '**/tsconfig.json'` or
//! similar). Each config contributes one node — its containing directory,
//! lexically normalized — plus one edge per `references` entry, pointing at
//! the referenced project's directory.
//!
//! Node identity is the normalized relative directory string. Two list
//! entries naming the same directory collapse into one node; the graph's
//! union semantics make that safe.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use path_clean::PathClean;
use refdepth_graph::DirectedGraph;
use tracing::{debug, info};

use crate::config;

/// Read the newline-delimited tsconfig list, skipping blank lines.
///
/// # Errors
///
/// Fails when the list file cannot be read.
pub fn read_tsconfig_list(list_path: &Path) -> Result<Vec<PathBuf>> {
    let text = fs::read_to_string(list_path)
        .with_context(|| format!("reading tsconfig list {}", list_path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| PathBuf::from(line).clean())
        .collect())
}

/// Assemble the dependency graph: `project dir → the project dirs it
/// references`. Projects without references still get a node.
///
/// # Errors
///
/// Fails when the list file or any tsconfig cannot be read or parsed; the
/// error names the offending file.
pub fn assemble_graph(list_path: &Path, base_dir: &Path) -> Result<DirectedGraph<String>> {
    let configs = read_tsconfig_list(list_path)?;
    info!(configs = configs.len(), "assembling project-reference graph");

    let mut graph = DirectedGraph::new();
    for config_rel in &configs {
        let project_dir = config_rel
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let config_path = base_dir.join(config_rel).clean();
        let text = fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let tsconfig = config::parse_tsconfig(&text)
            .with_context(|| format!("parsing {}", config_path.display()))?;

        let references: Vec<String> = tsconfig
            .references
            .iter()
            .map(|reference| node_id(&project_dir.join(&reference.path)))
            .collect();
        debug!(
            project = %project_dir.display(),
            references = references.len(),
            "registered project"
        );
        graph.add(node_id(&project_dir), references);
    }
    Ok(graph)
}

/// Canonical node identifier: the lexically normalized directory path.
fn node_id(dir: &Path) -> String {
    dir.clean().to_string_lossy().into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(root: &Path, dir: &str, references: &[&str]) {
        let project = root.join(dir);
        fs::create_dir_all(&project).expect("mkdir");
        let refs = references
            .iter()
            .map(|path| format!("{{ \"path\": \"{path}\" }}"))
            .collect::<Vec<_>>()
            .join(", ");
        fs::write(
            project.join("tsconfig.json"),
            format!("{{ \"references\": [{refs}] }}"),
        )
        .expect("write tsconfig");
    }

    fn write_list(root: &Path, entries: &[&str]) -> PathBuf {
        let list = root.join("tsconfigs.txt");
        fs::write(&list, entries.join("\n")).expect("write list");
        list
    }

    #[test]
    fn builds_edges_from_references() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        write_config(root, "packages/app", &["../core", "../util"]);
        write_config(root, "packages/core", &["../util"]);
        write_config(root, "packages/util", &[]);
        let list = write_list(
            root,
            &[
                "packages/app/tsconfig.json",
                "packages/core/tsconfig.json",
                "packages/util/tsconfig.json",
            ],
        );

        let graph = assemble_graph(&list, root).expect("assembles");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        let app_refs = graph
            .successors(&"packages/app".to_string())
            .expect("app registered");
        assert!(app_refs.contains("packages/core"));
        assert!(app_refs.contains("packages/util"));
    }

    #[test]
    fn config_without_references_contributes_an_isolated_node() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        let project = root.join("standalone");
        fs::create_dir_all(&project).expect("mkdir");
        fs::write(
            project.join("tsconfig.json"),
            r#"{ "compilerOptions": {} }"#,
        )
        .expect("write tsconfig");
        let list = write_list(root, &["standalone/tsconfig.json"]);

        let graph = assemble_graph(&list, root).expect("assembles");
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains(&"standalone".to_string()));
    }

    #[test]
    fn blank_lines_in_the_list_are_skipped() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        write_config(root, "a", &[]);
        let list = write_list(root, &["", "a/tsconfig.json", "  ", ""]);

        let configs = read_tsconfig_list(&list).expect("readable");
        assert_eq!(configs, vec![PathBuf::from("a/tsconfig.json")]);
    }

    #[test]
    fn reference_paths_are_normalized_against_the_config_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        write_config(root, "packages/app", &["../core/./"]);
        write_config(root, "packages/core", &[]);
        let list = write_list(
            root,
            &["packages/app/tsconfig.json", "packages/core/tsconfig.json"],
        );

        let graph = assemble_graph(&list, root).expect("assembles");
        // "packages/app" + "../core/./" collapses onto the core node.
        assert!(
            graph
                .successors(&"packages/app".to_string())
                .expect("app registered")
                .contains("packages/core")
        );
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn missing_config_file_names_the_file_in_the_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        let list = write_list(root, &["gone/tsconfig.json"]);

        let err = assemble_graph(&list, root).expect_err("missing file");
        assert!(format!("{err:#}").contains("gone"));
    }
}
