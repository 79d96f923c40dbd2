//! Procedure wiring tests: custom resolvers, local constraints and
//! hook-group procedures.

use layerport::adapters::host::ImageHost;
use layerport::adapters::manifest::{self, ProjectManifest};
use layerport::adapters::memory::{FileBackend, MemoryHost};
use layerport::adapters::progress::NullProgress;
use layerport::core::exec::CallContext;
use layerport::core::export::{
    ExportOptions, Exporter, ExporterBuilder, HOOK_AFTER_CREATE_IMAGE_COPY,
};
use layerport::core::ops::{
    ArgValue, BuiltinResolver, ConstraintFn, OperationResolver, OperationSpec, ProcedureFn,
};
use layerport::domain::{LayerportError, Result};
use std::path::Path;
use std::sync::Arc;

/// Resolver adding test-only procedures on top of the built-in set
struct TestResolver {
    builtin: BuiltinResolver,
}

impl TestResolver {
    fn new() -> Self {
        Self {
            builtin: BuiltinResolver::new(),
        }
    }
}

impl OperationResolver for TestResolver {
    fn resolve_procedure(&self, function: &str) -> Option<ProcedureFn> {
        match function {
            // Replaces the processed layer with an upper-cased copy.
            "uppercase" => Some(Arc::new(
                |ctx: &mut CallContext<'_>, _args: &[ArgValue]| -> Result<()> {
                    let layer = ctx.layer()?;
                    let image = ctx.image;
                    let host = ctx
                        .host
                        .as_any_mut()
                        .downcast_mut::<MemoryHost>()
                        .ok_or_else(|| {
                            LayerportError::Execution("in-memory host required".to_string())
                        })?;
                    let bytes = host.layer_bytes(image, layer)?.to_ascii_uppercase();
                    let name = host.layer_name(image, layer)?.to_string();
                    host.remove_layer(image, layer)?;
                    let replaced = host.add_layer(image, name, bytes, true)?;
                    ctx.layer = Some(replaced);
                    Ok(())
                },
            )),
            // Adds a marker layer to the image of the current phase.
            "stamp" => Some(Arc::new(
                |ctx: &mut CallContext<'_>, _args: &[ArgValue]| -> Result<()> {
                    let image = ctx.image;
                    let host = ctx
                        .host
                        .as_any_mut()
                        .downcast_mut::<MemoryHost>()
                        .ok_or_else(|| {
                            LayerportError::Execution("in-memory host required".to_string())
                        })?;
                    host.add_layer(image, "stamp", b"stamp".to_vec(), true)?;
                    Ok(())
                },
            )),
            _ => self.builtin.resolve_procedure(function),
        }
    }

    fn resolve_constraint(&self, function: &str) -> Option<ConstraintFn> {
        self.builtin.resolve_constraint(function)
    }
}

const SCENE: &str = r#"{
    "name": "doc",
    "layers": [
        {"name": "bg", "content": "sky"},
        {"name": "hero", "content": "hi", "tags": ["fg"]}
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
        .resolver(Arc::new(TestResolver::new()))
        .options(options)
        .procedures(procedures)
        .constraints(constraints)
        .build()
        .unwrap()
}

fn options_for(out: &Path) -> ExportOptions {
    ExportOptions {
        output_directory: out.to_path_buf(),
        ..ExportOptions::default()
    }
}

#[test]
fn test_procedures_transform_exported_contents() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let procedures = vec![OperationSpec::for_function("uppercase")];
    let mut exporter = build_exporter(SCENE, options_for(&out), procedures, vec![]);

    exporter.export().unwrap();

    assert_eq!(std::fs::read_to_string(out.join("bg.png")).unwrap(), "SKY");
    assert_eq!(std::fs::read_to_string(out.join("hero.png")).unwrap(), "HI");
}

#[test]
fn test_local_constraint_gates_a_procedure_per_item() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    // Registered but disabled, so it never filters the tree globally; the
    // procedure references it by name as its per-item gate.
    let mut gate = OperationSpec::for_function("with_tags")
        .with_args(vec![ArgValue::Str("fg".to_string())]);
    gate.enabled = false;

    let mut uppercase = OperationSpec::for_function("uppercase");
    uppercase.local_constraint = Some("with_tags".to_string());

    let mut exporter = build_exporter(SCENE, options_for(&out), vec![uppercase], vec![gate]);
    exporter.export().unwrap();

    assert_eq!(std::fs::read_to_string(out.join("bg.png")).unwrap(), "sky");
    assert_eq!(std::fs::read_to_string(out.join("hero.png")).unwrap(), "HI");
}

#[test]
fn test_hook_group_procedure_needs_the_ignore_flag() {
    let manifest = r#"{
        "name": "doc",
        "layers": [{"name": "bg", "content": "sky"}]
    }"#;

    // With the flag, the procedure runs while the working copy is set up,
    // before any item matches the global constraints.
    let dir = tempfile::tempdir().unwrap();
    let mut stamped = OperationSpec::for_function("stamp");
    stamped.groups = vec![HOOK_AFTER_CREATE_IMAGE_COPY.to_string()];
    stamped.ignore_global_constraints = true;
    let options = ExportOptions {
        keep_image_copy: true,
        ..options_for(&dir.path().join("out"))
    };
    let mut exporter = build_exporter(manifest, options, vec![stamped], vec![]);
    exporter.export().unwrap();

    let kept = exporter.last_image_copy().unwrap();
    let host = exporter
        .host()
        .as_any()
        .downcast_ref::<MemoryHost>()
        .unwrap();
    // Marker layer plus the kept processed layer.
    assert_eq!(host.layer_count(kept).unwrap(), 2);

    // Without the flag the same procedure is skipped outside per-item
    // phases.
    let dir = tempfile::tempdir().unwrap();
    let mut unstamped = OperationSpec::for_function("stamp");
    unstamped.groups = vec![HOOK_AFTER_CREATE_IMAGE_COPY.to_string()];
    let options = ExportOptions {
        keep_image_copy: true,
        ..options_for(&dir.path().join("out"))
    };
    let mut exporter = build_exporter(manifest, options, vec![unstamped], vec![]);
    exporter.export().unwrap();

    let kept = exporter.last_image_copy().unwrap();
    let host = exporter
        .host()
        .as_any()
        .downcast_ref::<MemoryHost>()
        .unwrap();
    assert_eq!(host.layer_count(kept).unwrap(), 1);
}

#[test]
fn test_merge_visible_procedure_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let procedures = vec![OperationSpec::for_function("merge_visible")];
    let mut exporter = build_exporter(SCENE, options_for(&out), procedures, vec![]);

    let summary = exporter.export().unwrap();

    // The working image holds one layer per item, so merging is contents
    // preserving here; the point is that the merged layer is the one
    // exported.
    assert_eq!(summary.exported_count(), 2);
    assert_eq!(std::fs::read_to_string(out.join("bg.png")).unwrap(), "sky");
    assert_eq!(std::fs::read_to_string(out.join("hero.png")).unwrap(), "hi");
}
