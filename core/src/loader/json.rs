//! JSON problem files

use super::{GenerationProblem, LoadError, LoadResult};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Load a single problem from a JSON file
pub fn load_problem<P: AsRef<Path>>(path: P) -> LoadResult<GenerationProblem> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path)
        .map_err(|e| LoadError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    let problem: GenerationProblem =
        serde_json::from_str(&contents).map_err(|e| LoadError::ParseError(e.to_string()))?;

    Ok(problem)
}

/// Load every problem in a directory, skipping files that fail to parse
pub fn load_problems<P: AsRef<Path>>(dir: P) -> LoadResult<Vec<GenerationProblem>> {
    let dir = dir.as_ref();

    if !dir.is_dir() {
        return Err(LoadError::FileNotFound(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| LoadError::FileNotFound(format!("{}: {}", dir.display(), e)))? {
        let entry = entry.map_err(|e| LoadError::FileNotFound(e.to_string()))?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut problems = Vec::new();
    for path in paths {
        match load_problem(&path) {
            Ok(problem) => problems.push(problem),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping problem file"),
        }
    }

    Ok(problems)
}
