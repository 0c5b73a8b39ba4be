// src/pipeline/accumulator.rs
//! State threaded from the scan phase through execution to the revisit phase.

use crate::parse::report::RuleInstance;
use crate::types::{InputKind, SourceNode};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Per-step, per-pass state. Built fresh for every step of every pass.
#[derive(Debug)]
pub struct Accumulator {
    directory: PathBuf,
    baselines: BTreeMap<PathBuf, SystemTime>,
    modified: BTreeSet<PathBuf>,
    project_files: Vec<PathBuf>,
    solution_files: Vec<PathBuf>,
    file_errors: HashMap<PathBuf, String>,
    file_results: HashMap<PathBuf, Vec<RuleInstance>>,
    rule_labels: HashMap<String, String>,
}

impl Accumulator {
    #[must_use]
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            baselines: BTreeMap::new(),
            modified: BTreeSet::new(),
            project_files: Vec::new(),
            solution_files: Vec::new(),
            file_errors: HashMap::new(),
            file_results: HashMap::new(),
            rule_labels: HashMap::new(),
        }
    }

    /// Scratch root for this step.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Where a node lives inside the scratch root.
    #[must_use]
    pub fn resolved_path(&self, node: &SourceNode) -> PathBuf {
        self.directory.join(node.path())
    }

    /// Records the baseline for a freshly written path. The first recording
    /// wins; later calls for the same path are ignored.
    pub fn record_baseline(&mut self, path: PathBuf, modified_at: SystemTime) {
        self.baselines.entry(path).or_insert(modified_at);
    }

    #[must_use]
    pub fn baselines(&self) -> &BTreeMap<PathBuf, SystemTime> {
        &self.baselines
    }

    #[must_use]
    pub fn baseline(&self, path: &Path) -> Option<SystemTime> {
        self.baselines.get(path).copied()
    }

    /// Appends a project or solution path to the discovered inputs.
    pub fn record_input(&mut self, path: &Path) {
        match InputKind::classify(path) {
            InputKind::Project => self.project_files.push(path.to_path_buf()),
            InputKind::Solution => self.solution_files.push(path.to_path_buf()),
            InputKind::Other => {}
        }
    }

    #[must_use]
    pub fn project_files(&self) -> &[PathBuf] {
        &self.project_files
    }

    #[must_use]
    pub fn solution_files(&self) -> &[PathBuf] {
        &self.solution_files
    }

    /// Flags a path as changed. Returns true if it was not flagged before.
    pub fn mark_modified(&mut self, path: PathBuf) -> bool {
        self.modified.insert(path)
    }

    #[must_use]
    pub fn was_modified(&self, path: &Path) -> bool {
        self.modified.contains(path)
    }

    #[must_use]
    pub fn modified(&self) -> &BTreeSet<PathBuf> {
        &self.modified
    }

    pub fn record_file_error(&mut self, path: PathBuf, error: String) {
        self.file_errors.insert(path, error);
    }

    #[must_use]
    pub fn file_error(&self, path: &Path) -> Option<&str> {
        self.file_errors.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn file_errors(&self) -> &HashMap<PathBuf, String> {
        &self.file_errors
    }

    pub fn add_file_result(&mut self, path: PathBuf, instance: RuleInstance) {
        self.file_results.entry(path).or_default().push(instance);
    }

    #[must_use]
    pub fn file_results(&self, path: &Path) -> Option<&[RuleInstance]> {
        self.file_results.get(path).map(Vec::as_slice)
    }

    pub fn add_rule(&mut self, rule_id: String, label: String) {
        self.rule_labels.insert(rule_id, label);
    }

    /// Human-readable label for a rule, if the report declared one.
    #[must_use]
    pub fn rule_label(&self, rule_id: &str) -> Option<&str> {
        self.rule_labels.get(rule_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn baseline_is_set_once() {
        let mut acc = Accumulator::new(PathBuf::from("/scratch/repo"));
        let first = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let later = SystemTime::UNIX_EPOCH + Duration::from_secs(20);
        acc.record_baseline(PathBuf::from("/scratch/repo/a.cs"), first);
        acc.record_baseline(PathBuf::from("/scratch/repo/a.cs"), later);
        assert_eq!(acc.baseline(Path::new("/scratch/repo/a.cs")), Some(first));
        assert_eq!(acc.baselines().len(), 1);
    }

    #[test]
    fn inputs_keep_write_order() {
        let mut acc = Accumulator::new(PathBuf::from("/r"));
        acc.record_input(Path::new("/r/b/B.csproj"));
        acc.record_input(Path::new("/r/Program.cs"));
        acc.record_input(Path::new("/r/All.sln"));
        acc.record_input(Path::new("/r/a/A.fsproj"));
        assert_eq!(
            acc.project_files(),
            &[PathBuf::from("/r/b/B.csproj"), PathBuf::from("/r/a/A.fsproj")]
        );
        assert_eq!(acc.solution_files(), &[PathBuf::from("/r/All.sln")]);
    }

    #[test]
    fn modified_has_set_semantics() {
        let mut acc = Accumulator::new(PathBuf::from("/r"));
        assert!(acc.mark_modified(PathBuf::from("/r/a")));
        assert!(!acc.mark_modified(PathBuf::from("/r/a")));
        assert_eq!(acc.modified().len(), 1);
        assert!(acc.was_modified(Path::new("/r/a")));
    }

    #[test]
    fn resolved_path_joins_directory() {
        let acc = Accumulator::new(PathBuf::from("/r"));
        let node = SourceNode::new("src/Proj.csproj", "");
        assert_eq!(acc.resolved_path(&node), PathBuf::from("/r/src/Proj.csproj"));
    }

    #[test]
    fn unknown_rule_has_no_label() {
        let mut acc = Accumulator::new(PathBuf::from("/r"));
        acc.add_rule("UA101".into(), "Update package".into());
        assert_eq!(acc.rule_label("UA101"), Some("Update package"));
        assert_eq!(acc.rule_label("UA999"), None);
    }
}
