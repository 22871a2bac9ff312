//! Test harness for treegen integration tests

use std::path::Path;
use std::process::Command;

pub use treegen::test_utils::TestTree;

/// Run the treegen binary on `dir` with settings-file lookup disabled.
pub fn run_treegen(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_treegen");
    let output = Command::new(binary)
        .arg(dir)
        .arg("--no-config")
        .arg("--color=never")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run treegen");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let tree = TestTree::new();
        assert!(tree.path().exists());
    }

    #[test]
    fn test_harness_named_root() {
        let tree = TestTree::named("proj");
        assert_eq!(tree.path().file_name().unwrap(), "proj");
    }

    #[test]
    fn test_harness_add_file() {
        let tree = TestTree::new();
        let file_path = tree.add_file("nested/test.rs", "fn main() {}");
        assert!(file_path.exists());
    }
}
