use flagrefs_protocol::{DiffContents, FlagAliasMap};
use flagrefs_scanner::{
    parse_multi_file_diff, preprocess, scan_pull_request, ScanReport, ScanRequest,
};
use flagrefs_search::{generate_aliases, AliasConfig, DelimitedMatcher, Delimiters};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const PR_DIFF: &str = "\
diff --git a/src/app.ts b/src/app.ts
index 1111111..2222222 100644
--- a/src/app.ts
+++ b/src/app.ts
@@ -1,5 +1,3 @@
 import { enabled } from './flags';
-const a = enabled('old-flag');
-const b = enabled('both-flag');
-const c = enabled('moved-flag');
-if (enabled(LegacyFlag)) {}
+const a = enabled('new-flag');
+const b = enabled('both-flag', true);
diff --git a/src/removed.ts b/src/removed.ts
deleted file mode 100644
index 3333333..0000000
--- a/src/removed.ts
+++ /dev/null
@@ -1,1 +0,0 @@
-export const LegacyFlag = 'legacy-flag';
diff --git a/.env b/.env
index 4444444..5555555 100644
--- a/.env
+++ b/.env
@@ -1 +1 @@
-FLAG='hidden-flag'
+FLAG='other'
diff --git a/src/old.ts b/src/renamed.ts
similarity index 90%
rename from src/old.ts
rename to src/renamed.ts
index 6666666..7777777 100644
--- a/src/old.ts
+++ b/src/renamed.ts
@@ -1 +1 @@
-const x = 'renamed-flag';
+const y = 'renamed-flag';
";

const FLAGS: &[&str] = &[
    "new-flag",
    "old-flag",
    "both-flag",
    "moved-flag",
    "legacy-flag",
    "hidden-flag",
    "renamed-flag",
    "unused-flag",
];

fn checkout() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/app.ts"),
        "import { enabled } from './flags';\nconst a = enabled('new-flag');\nconst b = enabled('both-flag', true);\n",
    )
    .unwrap();
    fs::write(root.join("src/still.ts"), "const moved = enabled(\"moved-flag\");\n").unwrap();
    fs::write(root.join("src/renamed.ts"), "const y = \"renamed-flag\";\n").unwrap();
    fs::write(root.join(".env"), "FLAG='other'\n").unwrap();
    temp
}

fn scan(root: &Path, max_flags: usize, check_extinctions: bool) -> ScanReport {
    let file_diffs = parse_multi_file_diff(PR_DIFF).unwrap();
    let contents: DiffContents = preprocess(root, &file_diffs);

    let keys: Vec<String> = FLAGS.iter().map(|k| k.to_string()).collect();
    let configs = vec![
        AliasConfig::CamelCase,
        AliasConfig::FilePattern {
            paths: vec!["src/**/*.ts".to_string()],
            patterns: vec!["const (\\w+) = 'FLAG_KEY'".to_string()],
        },
    ];
    let aliases: FlagAliasMap = generate_aliases(&keys, &configs, root, &contents).unwrap();
    let matcher = DelimitedMatcher::new(&keys, &aliases, Delimiters::default().resolve());

    scan_pull_request(
        ScanRequest {
            base_dir: root,
            contents: &contents,
            max_flags,
            check_extinctions,
        },
        &matcher,
    )
    .unwrap()
}

#[test]
fn summarizes_added_removed_and_extinct_flags() {
    let temp = checkout();
    let report = scan(temp.path(), 10, true);
    let summary = &report.summary;

    assert_eq!(report.files_scanned, 2);
    assert!(!report.budget_reached);
    assert!(report.extinctions_checked);

    assert_eq!(summary.added_keys(), vec!["both-flag", "new-flag"]);
    assert_eq!(
        summary.removed_keys(),
        vec!["legacy-flag", "moved-flag", "old-flag"]
    );
    assert_eq!(
        summary.flags_removed().get("legacy-flag"),
        Some(&vec!["LegacyFlag".to_string()])
    );
    assert_eq!(summary.extinct_keys(), vec!["legacy-flag", "old-flag"]);
    assert!(!summary.is_extinct("moved-flag"));
}

#[test]
fn dotfiles_and_renames_are_not_reported() {
    let temp = checkout();
    let summary = scan(temp.path(), 10, false).summary;

    let changed = summary.changed_keys();
    assert!(!changed.contains(&"hidden-flag".to_string()));
    assert!(!changed.contains(&"renamed-flag".to_string()));
    assert_eq!(summary.extinct_flags(), None);
}

#[test]
fn budget_limits_distinct_flags() {
    let temp = checkout();
    let report = scan(temp.path(), 2, false);

    assert!(report.budget_reached);
    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.summary.removed_keys(), vec!["both-flag", "old-flag"]);
    assert!(report.summary.added_keys().is_empty());
}

#[test]
fn repeated_scans_are_identical() {
    let temp = checkout();
    let first = scan(temp.path(), 10, true);
    let second = scan(temp.path(), 10, true);
    assert_eq!(first, second);
}
