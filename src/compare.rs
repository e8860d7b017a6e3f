//! Repository file-set comparison
//!
//! Finds files present in one downloaded tree but missing from another,
//! by relative path. Walk errors are logged and produce an empty result
//! rather than aborting the session.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::error;
use walkdir::WalkDir;

/// Returns the relative paths of files under `repo1` that are absent
/// under `repo2`, sorted for deterministic output
pub fn compare_repositories(repo1: &Path, repo2: &Path) -> Vec<PathBuf> {
    let files1 = match collect_files(repo1) {
        Ok(files) => files,
        Err(e) => {
            error!("Error comparing repositories: {}", e);
            return Vec::new();
        }
    };
    let files2 = match collect_files(repo2) {
        Ok(files) => files,
        Err(e) => {
            error!("Error comparing repositories: {}", e);
            return Vec::new();
        }
    };

    files1.difference(&files2).cloned().collect()
}

fn collect_files(root: &Path) -> Result<BTreeSet<PathBuf>, walkdir::Error> {
    let mut files = BTreeSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("walked path is under its root")
                .to_path_buf();
            files.insert(relative);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "contents").unwrap();
    }

    #[test]
    fn test_missing_file_is_reported() {
        let repo1 = tempfile::tempdir().unwrap();
        let repo2 = tempfile::tempdir().unwrap();

        for repo in [repo1.path(), repo2.path()] {
            touch(repo, "README.md");
            touch(repo, "src/main.py");
        }
        touch(repo1.path(), "src/util.py");

        let missing = compare_repositories(repo1.path(), repo2.path());
        assert_eq!(missing, vec![PathBuf::from("src/util.py")]);
    }

    #[test]
    fn test_identical_trees_have_no_missing_files() {
        let repo1 = tempfile::tempdir().unwrap();
        let repo2 = tempfile::tempdir().unwrap();

        for repo in [repo1.path(), repo2.path()] {
            touch(repo, "README.md");
            touch(repo, "src/app.py");
        }

        assert!(compare_repositories(repo1.path(), repo2.path()).is_empty());
    }

    #[test]
    fn test_extra_files_in_second_repo_are_ignored() {
        let repo1 = tempfile::tempdir().unwrap();
        let repo2 = tempfile::tempdir().unwrap();

        touch(repo1.path(), "README.md");
        touch(repo2.path(), "README.md");
        touch(repo2.path(), "only-in-two.txt");

        assert!(compare_repositories(repo1.path(), repo2.path()).is_empty());
    }

    #[test]
    fn test_result_is_sorted() {
        let repo1 = tempfile::tempdir().unwrap();
        let repo2 = tempfile::tempdir().unwrap();

        touch(repo1.path(), "zebra.txt");
        touch(repo1.path(), "alpha.txt");
        touch(repo1.path(), "src/middle.py");

        let missing = compare_repositories(repo1.path(), repo2.path());
        assert_eq!(
            missing,
            vec![
                PathBuf::from("alpha.txt"),
                PathBuf::from("src/middle.py"),
                PathBuf::from("zebra.txt"),
            ]
        );
    }

    #[test]
    fn test_unreadable_root_yields_empty_result() {
        let repo2 = tempfile::tempdir().unwrap();
        let missing = compare_repositories(Path::new("/nonexistent/repo"), repo2.path());
        assert!(missing.is_empty());
    }
}
