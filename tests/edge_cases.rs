//! Edge case and error handling tests for treegen

mod harness;

use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::Path;

use harness::{TestTree, run_treegen};
use treegen::{TreeConfig, TreeRenderer, generate_directory_tree};

fn bare() -> TreeConfig {
    TreeConfig {
        tree_depth: 10,
        ..TreeConfig::permissive()
    }
}

// ============================================================================
// Symlink Edge Cases
// ============================================================================

#[test]
fn test_symlink_to_file_is_listed_as_file() {
    let tree = TestTree::named("proj");
    tree.add_file("target.txt", "x");
    symlink(tree.path().join("target.txt"), tree.path().join("link.txt"))
        .expect("Failed to create symlink");

    let output = TreeRenderer::new(&bare()).render(tree.path());
    assert_eq!(output, "proj\n├───link.txt\n└───target.txt\n");
}

#[test]
fn test_broken_symlink_is_skipped() {
    let tree = TestTree::named("proj");
    tree.add_file("real.txt", "x");
    symlink("nonexistent.txt", tree.path().join("broken.txt"))
        .expect("Failed to create broken symlink");

    let output = TreeRenderer::new(&bare()).render(tree.path());
    assert_eq!(output, "proj\n└───real.txt\n");
}

#[test]
fn test_symlink_to_parent_stops_at_depth_limit() {
    let tree = TestTree::named("proj");
    tree.add_file("subdir/file.txt", "x");
    symlink("..", tree.path().join("subdir").join("parent"))
        .expect("Failed to create parent symlink");

    let config = TreeConfig {
        tree_depth: 3,
        ..TreeConfig::permissive()
    };
    let output = TreeRenderer::new(&config).render(tree.path());
    assert!(output.contains("parent"), "symlinked dir is followed: {}", output);
    assert!(output.lines().count() > 3);
}

#[test]
fn test_symlinked_root_keeps_link_name() {
    let tree = TestTree::named("real");
    tree.add_dir("sub");
    let link = tree.path().with_file_name("current");
    symlink(tree.path(), &link).expect("Failed to create root symlink");

    let (stdout, _, success) = run_treegen(&link, &["--root-emoji", ""]);
    assert!(success);
    assert_eq!(stdout, "current\n└───📁sub\n");
}

#[test]
fn test_symlinked_root_scopes_recursive_rules_by_link_name() {
    let tree = TestTree::named("real");
    tree.add_file("lib/app.min.js", "x");
    tree.add_file("lib/app.js", "x");
    let link = tree.path().with_file_name("current");
    symlink(tree.path(), &link).expect("Failed to create root symlink");

    let mut config = bare();
    config.exclude_files_in_dirs_recursive.insert(
        "current".to_string(),
        treegen::DirRule::Patterns(vec!["*.min.js".to_string()]),
    );
    let output = TreeRenderer::new(&config).render(&link);
    assert_eq!(output, "current\n└───lib\n    └───app.js\n");
}

// ============================================================================
// Permission Error Handling
// ============================================================================

#[test]
fn test_unreadable_directory() {
    let tree = TestTree::named("proj");
    tree.add_file("readable/file.txt", "x");
    let unreadable = tree.add_dir("unreadable");
    fs::write(unreadable.join("hidden.txt"), "x").expect("Failed to write file");

    fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o000))
        .expect("Failed to set permissions");
    let denied = fs::read_dir(&unreadable).is_err();

    let (stdout, _stderr, success) = run_treegen(tree.path(), &[]);

    fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o755))
        .expect("Failed to restore permissions");

    assert!(success, "treegen should handle unreadable directories");
    assert!(stdout.contains("readable"), "should show readable directory");
    assert!(stdout.contains("file.txt"), "should show readable file");
    if denied {
        assert!(stdout.contains("└───Access Denied"), "inline report: {}", stdout);
        assert!(!stdout.contains("hidden.txt"));
    }
}

// ============================================================================
// Special Filenames
// ============================================================================

#[test]
fn test_filename_with_spaces() {
    let tree = TestTree::named("proj");
    tree.add_file("file with spaces.txt", "x");
    tree.add_file("dir with spaces/nested.txt", "x");

    let output = TreeRenderer::new(&bare()).render(tree.path());
    assert_eq!(
        output,
        "proj\n├───dir with spaces\n│   └───nested.txt\n└───file with spaces.txt\n"
    );
}

#[test]
fn test_filename_with_unicode() {
    let tree = TestTree::named("proj");
    tree.add_file("日本語.txt", "x");
    tree.add_file("émoji_🎉.txt", "x");
    tree.add_file("中文目录/文件.txt", "x");

    let output = TreeRenderer::new(&bare()).render(tree.path());
    assert!(output.contains("日本語.txt"), "should show Japanese filename");
    assert!(output.contains("émoji_🎉.txt"), "should show emoji filename");
    assert!(output.contains("中文目录"), "should show Chinese directory");
    assert!(output.contains("文件.txt"));
}

#[test]
fn test_root_with_trailing_separator() {
    let tree = TestTree::named("proj");
    tree.add_file("a.txt", "x");
    let root = format!("{}/", tree.path().display());

    let output = TreeRenderer::new(&bare()).render(Path::new(&root));
    assert_eq!(output, "proj\n└───a.txt\n");
}

// ============================================================================
// Rule Interplay
// ============================================================================

#[test]
fn test_recursive_include_only_scenario() {
    let tree = TestTree::named("proj");
    tree.add_dir("src/core_utils/helpers");
    tree.add_dir("src/core_utils/core_db");

    let mut config = bare();
    config
        .only_show_folders_with_specific_char_indir_recursive
        .insert(
            "src".to_string(),
            vec![treegen::RecursivePattern::new("core*", true)],
        );

    let output = TreeRenderer::new(&config).render(tree.path());
    assert_eq!(
        output,
        "proj\n└───src\n    └───core_utils\n        └───core_db\n"
    );
}

#[test]
fn test_directory_rules_from_flat_settings() {
    let tree = TestTree::named("proj");
    tree.add_file("docs/draft_v2.md", "x");
    tree.add_file("docs/guide.md", "x");
    tree.add_dir("docs/drafts_old");
    tree.add_dir("docs/api");

    let flat: HashMap<String, String> = [
        ("tree_depth", "3"),
        ("root_emoji", ""),
        ("subdir_emoji", ""),
        (
            "directory_rules",
            r#"[{"directory": "docs", "type": "exclude_file_and_folder", "pattern": "draft*", "recursive": false}]"#,
        ),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let config = TreeConfig::from_flat_settings(&flat).unwrap();

    let output = generate_directory_tree(tree.path(), &config, None);
    assert_eq!(
        output,
        "proj\n└───docs\n    ├───api\n    └───guide.md\n"
    );
}

#[test]
fn test_exclusion_never_adds_entries() {
    let tree = TestTree::named("proj");
    tree.add_file("a/x.txt", "x");
    tree.add_file("b/y.txt", "x");
    tree.add_file("b/c/z.txt", "x");
    tree.add_file("top.txt", "x");

    let base = bare();
    let before = TreeRenderer::new(&base).render(tree.path());

    for name in ["a", "b", "c", "unrelated"] {
        let mut config = bare();
        config.exclude_folders.insert(name.to_string());
        let after = TreeRenderer::new(&config).render(tree.path());
        let names = |text: &str| -> Vec<String> {
            text.lines()
                .map(|l| l.trim_start_matches(['│', '├', '└', '─', ' ']).to_string())
                .collect()
        };
        let before_names = names(&before);
        for entry in names(&after) {
            assert!(before_names.contains(&entry), "{} appeared after excluding {}", entry, name);
        }
        assert!(after.lines().count() <= before.lines().count());
    }
}
