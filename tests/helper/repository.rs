//! Source repository test double

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use release_train::git::{CommitSummary, GitError, SourceRepository};

/// Clones by writing the configured files; records every call
pub struct FakeSourceRepository {
    branches: Vec<String>,
    files: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSourceRepository {
    pub fn new() -> Self {
        Self {
            branches: vec!["main".to_string()],
            files: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branches.push(branch.to_string());
        self
    }

    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.files.insert(relative.to_string(), content.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SourceRepository for FakeSourceRepository {
    async fn clone_repository(&self, url: &str, destination: &Path) -> Result<(), GitError> {
        self.record(format!("clone {}", url));
        std::fs::create_dir_all(destination.join(".git")).unwrap();
        for (relative, content) in &self.files {
            let path = destination.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        Ok(())
    }

    async fn checkout(&self, _repo: &Path, branch: &str) -> Result<(), GitError> {
        self.record(format!("checkout {}", branch));
        Ok(())
    }

    async fn has_branch(&self, _repo: &Path, branch: &str) -> Result<bool, GitError> {
        Ok(self.branches.iter().any(|b| b == branch))
    }

    async fn commit(&self, _repo: &Path, message: &str) -> Result<(), GitError> {
        self.record(format!("commit {}", message));
        Ok(())
    }

    async fn tag(&self, _repo: &Path, tag: &str) -> Result<(), GitError> {
        self.record(format!("tag {}", tag));
        Ok(())
    }

    async fn push_tag(&self, _repo: &Path, tag: &str) -> Result<(), GitError> {
        self.record(format!("push tag {}", tag));
        Ok(())
    }

    async fn push_branch(&self, _repo: &Path, branch: &str) -> Result<(), GitError> {
        self.record(format!("push branch {}", branch));
        Ok(())
    }

    async fn log_between(
        &self,
        _repo: &Path,
        _from: &str,
        _to: &str,
    ) -> Result<Vec<CommitSummary>, GitError> {
        Ok(Vec::new())
    }
}
