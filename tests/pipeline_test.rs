//! End-to-end export pipeline tests over the in-memory host

use layerport::adapters::host::ImageHost;
use layerport::adapters::manifest::{self, ProjectManifest};
use layerport::adapters::memory::{FileBackend, MemoryHost};
use layerport::adapters::progress::NullProgress;
use layerport::core::export::{ExportOptions, Exporter, ExporterBuilder, OverwriteMode};
use layerport::core::ops::{ArgValue, OperationSpec};
use std::path::Path;

const SCENE: &str = r#"{
    "name": "scene",
    "metadata": {"author": "jo"},
    "layers": [
        {"name": "bg", "content": "sky"},
        {"name": "chars", "layers": [
            {"name": "hero", "content": "h"},
            {"name": "villain", "content": "v"}
        ]},
        {"name": "notes", "layers": []}
    ]
}"#;

fn build_exporter(
    manifest_json: &str,
    options: ExportOptions,
    procedures: Vec<OperationSpec>,
    constraints: Vec<OperationSpec>,
) -> Exporter {
    let project: ProjectManifest = serde_json::from_str(manifest_json).unwrap();
    let (host, image, tree) = manifest::build_project(&project).unwrap();
    ExporterBuilder::new(Box::new(host), image, tree, project.name.clone())
        .backend(Box::new(FileBackend::new()))
        .progress(Box::new(NullProgress))
        .options(options)
        .procedures(procedures)
        .constraints(constraints)
        .build()
        .expect("exporter should build")
}

fn options_for(output: &Path) -> ExportOptions {
    ExportOptions {
        output_directory: output.to_path_buf(),
        ..ExportOptions::default()
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

#[test]
fn test_export_mirrors_group_structure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut exporter = build_exporter(SCENE, options_for(&out), vec![], vec![]);

    let summary = exporter.export().expect("export should succeed");

    assert_eq!(summary.exported_count(), 3);
    assert_eq!(summary.skipped_count(), 0);
    assert_eq!(read(&out.join("bg.png")), "sky");
    assert_eq!(read(&out.join("chars/hero.png")), "h");
    assert_eq!(read(&out.join("chars/villain.png")), "v");
    assert!(out.join("notes").is_dir());

    // Paths come back in depth-first pre-order.
    let names: Vec<_> = summary
        .exported_paths()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, ["bg.png", "hero.png", "villain.png"]);
}

#[test]
fn test_sibling_name_collisions_get_numeric_suffixes() {
    let manifest = r#"{
        "name": "doc",
        "layers": [
            {"name": "a", "content": "1"},
            {"name": "a", "content": "2"},
            {"name": "g", "layers": [
                {"name": "a", "content": "3"}
            ]}
        ]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut exporter = build_exporter(manifest, options_for(&out), vec![], vec![]);

    let summary = exporter.export().unwrap();

    assert_eq!(summary.exported_count(), 3);
    assert_eq!(read(&out.join("a.png")), "1");
    assert_eq!(read(&out.join("a (2).png")), "2");
    // A same-named layer under a different parent keeps its plain name.
    assert_eq!(read(&out.join("g/a.png")), "3");
}

#[test]
fn test_constraints_limit_exported_layers() {
    let manifest = r#"{
        "name": "doc",
        "layers": [
            {"name": "bg", "content": "sky"},
            {"name": "chars", "layers": [
                {"name": "hero", "content": "h"},
                {"name": "villain", "content": "v", "visible": false}
            ]},
            {"name": "notes", "layers": []}
        ]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let constraints = vec![
        OperationSpec::for_function("layers"),
        OperationSpec::for_function("visible"),
    ];
    let mut exporter = build_exporter(manifest, options_for(&out), vec![], constraints);

    let summary = exporter.export().unwrap();

    assert_eq!(summary.exported_count(), 2);
    assert!(out.join("bg.png").exists());
    assert!(out.join("chars/hero.png").exists());
    assert!(!out.join("chars/villain.png").exists());
    // The `layers` constraint excludes groups, so the empty group creates
    // no directory of its own.
    assert!(!out.join("notes").exists());
}

#[test]
fn test_name_matches_subfilters_combine_with_or() {
    let manifest = r#"{
        "name": "doc",
        "layers": [
            {"name": "bg", "content": "1"},
            {"name": "hero", "content": "2"},
            {"name": "scratch", "content": "3"}
        ]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let mut first = OperationSpec::for_function("name_matches")
        .with_args(vec![ArgValue::Str("^bg".to_string())]);
    first.subfilter = Some("names".to_string());
    first.match_mode = Some(layerport::core::tree::MatchMode::Any);
    let mut second = OperationSpec::for_function("name_matches")
        .with_args(vec![ArgValue::Str("^hero".to_string())]);
    second.subfilter = Some("names".to_string());
    second.match_mode = Some(layerport::core::tree::MatchMode::Any);

    let mut exporter = build_exporter(manifest, options_for(&out), vec![], vec![first, second]);
    let summary = exporter.export().unwrap();

    assert_eq!(summary.exported_count(), 2);
    assert!(out.join("bg.png").exists());
    assert!(out.join("hero.png").exists());
    assert!(!out.join("scratch.png").exists());
}

#[test]
fn test_flatten_folders_exports_into_output_root() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let options = ExportOptions {
        flatten_folders: true,
        ..options_for(&out)
    };
    let mut exporter = build_exporter(SCENE, options, vec![], vec![]);

    let summary = exporter.export().unwrap();

    assert_eq!(summary.exported_count(), 3);
    assert!(out.join("bg.png").exists());
    assert!(out.join("hero.png").exists());
    assert!(out.join("villain.png").exists());
    assert!(!out.join("chars").exists());
    assert!(!out.join("notes").exists());
}

#[test]
fn test_overwrite_skip_keeps_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("bg.png"), "old").unwrap();

    let options = ExportOptions {
        overwrite_mode: OverwriteMode::Skip,
        ..options_for(&out)
    };
    let mut exporter = build_exporter(SCENE, options, vec![], vec![]);
    let summary = exporter.export().unwrap();

    assert_eq!(summary.skipped_count(), 1);
    assert_eq!(summary.exported_count(), 2);
    assert_eq!(read(&out.join("bg.png")), "old");
    assert_eq!(read(&out.join("chars/hero.png")), "h");

    // Skipped items are not recorded as exported.
    let find = |name: &str| {
        exporter
            .tree()
            .iterate(false)
            .find(|i| i.orig_name() == name)
            .unwrap()
            .id()
    };
    assert!(!exporter.has_exported(find("bg")));
    assert!(exporter.has_exported(find("hero")));
    assert_eq!(exporter.exported_items().len(), 2);
}

#[test]
fn test_overwrite_rename_writes_next_free_name() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("bg.png"), "old").unwrap();

    let options = ExportOptions {
        overwrite_mode: OverwriteMode::Rename,
        ..options_for(&out)
    };
    let mut exporter = build_exporter(SCENE, options, vec![], vec![]);
    let summary = exporter.export().unwrap();

    assert_eq!(summary.exported_count(), 3);
    assert_eq!(read(&out.join("bg.png")), "old");
    assert_eq!(read(&out.join("bg (2).png")), "sky");
}

#[test]
fn test_overwrite_replace_overwrites_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("bg.png"), "old").unwrap();

    let mut exporter = build_exporter(SCENE, options_for(&out), vec![], vec![]);
    let summary = exporter.export().unwrap();

    assert_eq!(summary.exported_count(), 3);
    assert_eq!(summary.skipped_count(), 0);
    assert_eq!(read(&out.join("bg.png")), "sky");
}

#[test]
fn test_filename_pattern_fields() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let options = ExportOptions {
        filename_pattern: "[document]_[name]_[00]".to_string(),
        ..options_for(&out)
    };
    let mut exporter = build_exporter(SCENE, options, vec![], vec![]);

    let summary = exporter.export().unwrap();

    assert_eq!(summary.exported_count(), 3);
    assert!(out.join("scene_bg_01.png").exists());
    assert!(out.join("chars/scene_hero_02.png").exists());
    assert!(out.join("chars/scene_villain_03.png").exists());
}

#[test]
fn test_infer_file_extensions_uses_layer_extension() {
    let manifest = r#"{
        "name": "doc",
        "layers": [
            {"name": "sprite.tif", "content": "t"},
            {"name": "plain", "content": "p"}
        ]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let options = ExportOptions {
        infer_file_extensions: true,
        ..options_for(&out)
    };
    let mut exporter = build_exporter(manifest, options, vec![], vec![]);
    exporter.export().unwrap();

    assert_eq!(read(&out.join("sprite.tif")), "t");
    assert_eq!(read(&out.join("plain.png")), "p");
}

#[test]
fn test_without_inference_the_default_extension_replaces() {
    let manifest = r#"{
        "name": "doc",
        "layers": [{"name": "sprite.tif", "content": "t"}]
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut exporter = build_exporter(manifest, options_for(&out), vec![], vec![]);
    exporter.export().unwrap();

    assert_eq!(read(&out.join("sprite.png")), "t");
    assert!(!out.join("sprite.tif").exists());
}

#[test]
fn test_keep_image_copy_retains_processed_layers() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let options = ExportOptions {
        keep_image_copy: true,
        ..options_for(&out)
    };
    let mut exporter = build_exporter(SCENE, options, vec![], vec![]);
    exporter.export().unwrap();

    let kept = exporter.last_image_copy().expect("copy should be kept");
    let host = exporter
        .host()
        .as_any()
        .downcast_ref::<MemoryHost>()
        .unwrap();
    // Source image plus the kept working copy.
    assert_eq!(host.image_count(), 2);
    assert_eq!(host.layer_count(kept).unwrap(), 3);
}

#[test]
fn test_image_copies_are_released_after_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut exporter = build_exporter(SCENE, options_for(&out), vec![], vec![]);
    exporter.export().unwrap();

    assert!(exporter.last_image_copy().is_none());
    let host = exporter
        .host()
        .as_any()
        .downcast_ref::<MemoryHost>()
        .unwrap();
    assert_eq!(host.image_count(), 1);
}

#[test]
fn test_repeated_runs_produce_identical_names() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut exporter = build_exporter(SCENE, options_for(&out), vec![], vec![]);

    let first = exporter.export().unwrap();
    let second = exporter.export().unwrap();

    assert_eq!(first.exported_paths(), second.exported_paths());
}
