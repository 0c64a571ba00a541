//! Test fixture loader for the shared MWCS graph instances.
//!
//! Fixtures are plain JSON so any crate in the workspace can load them
//! without depending on the engine itself.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// A scored node of a fixture graph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureNode {
    pub label: String,
    pub score: f64,
}

/// Outcome a fixture expects from the default reduction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureExpectation {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    /// Best connected-subgraph score of the instance.
    pub optimum: f64,
}

/// A scored undirected graph with optional root labels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<FixtureNode>,
    pub edges: Vec<(String, String)>,
    #[serde(default)]
    pub roots: Vec<String>,
    #[serde(default)]
    pub expected: Option<FixtureExpectation>,
}

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("graphs").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a graph fixture by name, e.g. `load_graph("scenario_a")`.
pub fn load_graph(name: &str) -> GraphFixture {
    load_fixture(&format!("graphs/{name}.json"))
}

/// List all JSON files in a fixture subdirectory, sorted by path.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// Names of every graph fixture.
pub fn graph_names() -> Vec<String> {
    list_fixtures("graphs")
        .iter()
        .filter_map(|p| p.file_stem()?.to_str().map(str::to_string))
        .collect()
}
