//! Module resolver integration tests over real filesystem fixtures

mod common;

use common::TestProject;
use importjs::{FileEditor, ModuleResolver};
use std::path::Path;

#[test]
fn test_fuzzy_name_matches_multiple_spellings() {
    let project = TestProject::new();
    project.add_file("app/mock_user.js", "");
    project.add_file("app/mocks/user.js", "");
    project.add_file("app/mockuser.jsx", "");
    project.add_file("app/unrelated.js", "");

    let mut settings = project.settings();
    settings.imports.lookup_paths = vec!["app".to_string()];
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("mockUser", Path::new("app/main.js"))
        .unwrap();
    let paths: Vec<&str> = modules.iter().map(|m| m.import_path.as_str()).collect();
    assert_eq!(paths, vec!["mock_user", "mocks/user", "mockuser"]);
}

#[test]
fn test_index_and_package_segments_collapse() {
    let project = TestProject::new();
    project.add_file("app/components/button/index.js", "");

    let mut settings = project.settings();
    settings.imports.lookup_paths = vec!["app".to_string()];
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("button", Path::new("app/main.js"))
        .unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].import_path, "components/button");
}

#[test]
fn test_node_modules_are_not_searched() {
    let project = TestProject::new();
    project.add_file("node_modules/foo/foo.js", "");
    project.add_file("lib/foo.js", "");

    let settings = project.settings();
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("foo", Path::new("main.js"))
        .unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].import_path, "lib/foo");
}

#[test]
fn test_exclude_globs_reject_candidates() {
    let project = TestProject::new();
    project.add_file("app/foo.js", "");
    project.add_file("spec/foo.js", "");

    let mut settings = project.settings();
    settings.imports.excludes = vec!["spec/**".to_string()];
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("foo", Path::new("main.js"))
        .unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].import_path, "app/foo");
}

#[test]
fn test_same_import_path_is_deduplicated() {
    let project = TestProject::new();
    project.add_file("app/user.js", "");
    project.add_file("app/user/index.js", "");

    let mut settings = project.settings();
    settings.imports.lookup_paths = vec!["app".to_string()];
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("user", Path::new("app/main.js"))
        .unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].import_path, "user");
}

#[test]
fn test_package_dependencies_match_with_ignored_prefix() {
    let project = TestProject::new();
    project.add_file(
        "package.json",
        r#"{ "dependencies": { "my-company-users": "1.0.0", "left-pad": "1.0.0" } }"#,
    );

    let mut settings = project.settings();
    settings.imports.ignore_package_prefixes = vec!["my-company-".to_string()];
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("users", Path::new("main.js"))
        .unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].import_path, "my-company-users");
    assert_eq!(modules[0].lookup_path.as_deref(), Some("node_modules"));
}

#[test]
fn test_alias_short_circuits_the_search() {
    let project = TestProject::new();
    // A file that would otherwise match
    project.add_file("underscore.js", "");

    let mut settings = project.settings();
    settings
        .aliases
        .insert("underscore".to_string(), "third-party/underscore".to_string());
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("underscore", Path::new("main.js"))
        .unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].import_path, "third-party/underscore");
    assert!(modules[0].file_path.is_none());
}

#[test]
fn test_empty_lookup_path_is_fatal() {
    let project = TestProject::new();
    let mut settings = project.settings();
    settings.imports.lookup_paths = vec!["".to_string()];
    let resolver = ModuleResolver::new(&settings);

    let error = resolver
        .find_js_modules("foo", Path::new("main.js"))
        .unwrap_err();
    assert_eq!(error.status_code(), "EMPTY_LOOKUP_PATH");
}

#[test]
fn test_missing_lookup_path_is_fatal() {
    let project = TestProject::new();
    let mut settings = project.settings();
    settings.imports.lookup_paths = vec!["no-such-dir".to_string()];
    let resolver = ModuleResolver::new(&settings);

    let error = resolver
        .find_js_modules("foo", Path::new("main.js"))
        .unwrap_err();
    assert_eq!(error.status_code(), "SEARCH_FAILED");
}

#[test]
fn test_resolve_one_honors_user_selection() {
    let project = TestProject::new();
    project.add_file("a/user.js", "");
    project.add_file("b/user.js", "");

    let mut settings = project.settings();
    settings.imports.lookup_paths = vec!["a".to_string(), "b".to_string()];
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("user", Path::new("main.js"))
        .unwrap();
    assert_eq!(modules.len(), 2);

    let mut editor = FileEditor::from_content("main.js", "\n").with_selection(Some(1));
    let chosen = resolver.resolve_one(modules, "user", &mut editor).unwrap();
    assert_eq!(chosen.lookup_path.as_deref(), Some("b"));

    // A dismissed prompt resolves nothing
    let modules = resolver
        .find_js_modules("user", Path::new("main.js"))
        .unwrap();
    let mut editor = FileEditor::from_content("main.js", "\n").with_selection(None);
    assert!(resolver.resolve_one(modules, "user", &mut editor).is_none());
}

#[test]
fn test_relative_paths_for_files_under_the_same_lookup_path() {
    let project = TestProject::new();
    project.add_file("app/lib/util.js", "");

    let mut settings = project.settings();
    settings.imports.lookup_paths = vec!["app".to_string()];
    settings.imports.use_relative_paths = true;
    let resolver = ModuleResolver::new(&settings);

    let modules = resolver
        .find_js_modules("util", Path::new("app/components/nav.js"))
        .unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].import_path, "../lib/util");
}
