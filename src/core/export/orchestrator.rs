//! Export orchestrator
//!
//! The [`Exporter`] drives one export run end to end: it assembles the
//! global constraints, creates the working image copy, walks the filtered
//! item tree in depth-first pre-order, and per leaf runs the contents
//! phase (layer copy plus procedures), the naming phase (pattern,
//! extension, validation, uniquification) and the export phase (overwrite
//! resolution, directory creation, backend call with retries).
//!
//! Image copies are released on every exit path, including cancellation
//! and backend failure; only `keep_image_copy` runs retain the working
//! copy.

use crate::adapters::host::{ExportBackend, ImageHost};
use crate::adapters::progress::{LogProgress, ProgressSink};
use crate::core::exec::{CallContext, CallableFn, CallableId, Invoker};
use crate::core::export::{
    overwrite, ExportOptions, ExportStatus, ExportSummary, ExtensionRegistry,
    NoninteractiveOverwriteChooser, OverwriteChooser, OverwriteMode, Phase, PhaseSet, RunMode,
    StopHandle, GROUP_CONSTRAINTS, GROUP_PROCEDURES, HOOK_AFTER_CREATE_IMAGE_COPY,
    HOOK_AFTER_INSERT_LAYER, HOOK_AFTER_PROCESS_LAYER,
};
use crate::core::ops::{
    ArgValue, BuiltinResolver, ConstraintFn, OperationRegistry, OperationResolver, OperationSpec,
    RegistryKind,
};
use crate::core::rename::Renamer;
use crate::core::tree::{names, ItemFilter, ItemTree};
use crate::domain::{ImageRef, Item, ItemId, ItemKind, LayerRef, LayerportError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Builder assembling an [`Exporter`]
pub struct ExporterBuilder {
    host: Box<dyn ImageHost>,
    source_image: ImageRef,
    tree: ItemTree,
    document_name: String,
    backend: Option<Box<dyn ExportBackend>>,
    chooser: Option<Box<dyn OverwriteChooser>>,
    progress: Option<Box<dyn ProgressSink>>,
    resolver: Arc<dyn OperationResolver>,
    options: ExportOptions,
    procedures: Vec<OperationSpec>,
    constraints: Vec<OperationSpec>,
    stop: StopHandle,
}

impl ExporterBuilder {
    /// Starts a builder over a host, its source image and the item tree
    pub fn new(
        host: Box<dyn ImageHost>,
        source_image: ImageRef,
        tree: ItemTree,
        document_name: impl Into<String>,
    ) -> Self {
        Self {
            host,
            source_image,
            tree,
            document_name: document_name.into(),
            backend: None,
            chooser: None,
            progress: None,
            resolver: Arc::new(BuiltinResolver::new()),
            options: ExportOptions::default(),
            procedures: Vec::new(),
            constraints: Vec::new(),
            stop: StopHandle::new(),
        }
    }

    /// Sets the export backend
    pub fn backend(mut self, backend: Box<dyn ExportBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Sets the overwrite chooser; defaults to a non-interactive chooser
    /// answering with the configured overwrite mode
    pub fn overwrite_chooser(mut self, chooser: Box<dyn OverwriteChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    /// Sets the progress sink; defaults to logging progress
    pub fn progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets the operation resolver; defaults to the built-in operations
    pub fn resolver(mut self, resolver: Arc<dyn OperationResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sets the export options
    pub fn options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds procedure specifications, registered in order
    pub fn procedures(mut self, specs: Vec<OperationSpec>) -> Self {
        self.procedures.extend(specs);
        self
    }

    /// Adds constraint specifications, registered in order
    pub fn constraints(mut self, specs: Vec<OperationSpec>) -> Self {
        self.constraints.extend(specs);
        self
    }

    /// Uses the given stop handle instead of a fresh one
    pub fn stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Resolves all operations and builds the exporter.
    ///
    /// Fails with [`LayerportError::InvalidProcedure`] when a specification
    /// names a function the resolver does not know.
    pub fn build(self) -> Result<Exporter> {
        let backend = self
            .backend
            .ok_or_else(|| LayerportError::Execution("no export backend given".to_string()))?;
        let chooser = self.chooser.unwrap_or_else(|| {
            Box::new(NoninteractiveOverwriteChooser::new(
                self.options.overwrite_mode,
            ))
        });
        let progress = self
            .progress
            .unwrap_or_else(|| Box::new(LogProgress::new()));

        let procedures = OperationRegistry::new(
            "procedures",
            RegistryKind::Procedures,
            self.resolver.clone(),
            self.procedures,
        )?;
        let constraints = OperationRegistry::new(
            "constraints",
            RegistryKind::Constraints,
            self.resolver,
            self.constraints,
        )?;

        Ok(Exporter {
            host: self.host,
            backend,
            chooser,
            progress,
            options: self.options,
            procedures,
            constraints,
            hooks: Invoker::new("hooks"),
            source_image: self.source_image,
            tree: self.tree,
            document_name: self.document_name,
            stop: self.stop,
            last_image_copy: None,
            exported_items: Vec::new(),
        })
    }
}

// Per-run mutable state, rebuilt on every call to `export`.
struct RunState {
    invoker: Invoker,
    phases: PhaseSet,
    renamer: Renamer,
    extensions: ExtensionRegistry,
    default_extension: String,
    current_extension: String,
    status: ExportStatus,
    image_copy: Option<ImageRef>,
    second_copy: Option<ImageRef>,
    use_second_copy: bool,
    last_was_skip: bool,
    exported_paths: Vec<PathBuf>,
    exported_ids: Vec<ItemId>,
    skipped: usize,
}

/// Batch layer exporter
pub struct Exporter {
    host: Box<dyn ImageHost>,
    backend: Box<dyn ExportBackend>,
    chooser: Box<dyn OverwriteChooser>,
    progress: Box<dyn ProgressSink>,
    options: ExportOptions,
    procedures: OperationRegistry,
    constraints: OperationRegistry,
    hooks: Invoker,
    source_image: ImageRef,
    tree: ItemTree,
    document_name: String,
    stop: StopHandle,
    last_image_copy: Option<ImageRef>,
    exported_items: Vec<ItemId>,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("options", &self.options)
            .field("document_name", &self.document_name)
            .field("source_image", &self.source_image)
            .finish_non_exhaustive()
    }
}

impl Exporter {
    /// The procedure registry
    pub fn procedures(&self) -> &OperationRegistry {
        &self.procedures
    }

    /// Mutable access to the procedure registry
    pub fn procedures_mut(&mut self) -> &mut OperationRegistry {
        &mut self.procedures
    }

    /// The constraint registry
    pub fn constraints(&self) -> &OperationRegistry {
        &self.constraints
    }

    /// Mutable access to the constraint registry
    pub fn constraints_mut(&mut self) -> &mut OperationRegistry {
        &mut self.constraints
    }

    /// Registers a callable in a hook group
    pub fn add_hook(&mut self, group: &str, callable: CallableFn) -> CallableId {
        self.hooks.add(callable, &[group])
    }

    /// The image host
    pub fn host(&self) -> &dyn ImageHost {
        self.host.as_ref()
    }

    /// The item tree
    pub fn tree(&self) -> &ItemTree {
        &self.tree
    }

    /// A stop handle for this exporter
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// The working image copy kept by the last `keep_image_copy` run
    pub fn last_image_copy(&self) -> Option<ImageRef> {
        self.last_image_copy
    }

    /// Items exported by the most recent run, in export order
    pub fn exported_items(&self) -> &[ItemId] {
        &self.exported_items
    }

    /// Whether the most recent run exported the given item
    pub fn has_exported(&self, id: ItemId) -> bool {
        self.exported_items.contains(&id)
    }

    /// Runs one export over the filtered item tree.
    ///
    /// The tree's name history, naming snapshots and filter are reset at
    /// the start, so repeated runs over the same exporter behave
    /// identically.
    pub fn export(&mut self) -> Result<ExportSummary> {
        let started = Instant::now();
        info!(
            document = %self.document_name,
            output = %self.options.output_directory.display(),
            "starting export"
        );

        self.tree.reset_name_history();
        self.tree.reset_filter();
        self.tree.restore_hierarchy();
        if let Some(copy) = self.last_image_copy.take() {
            let _ = self.host.delete_image(copy);
        }

        let default_extension = normalize_extension(&self.options.file_extension);
        let mut run = RunState {
            invoker: self.build_invoker()?,
            phases: self.options.phases,
            renamer: Renamer::parse(&self.options.filename_pattern),
            extensions: ExtensionRegistry::with_known_formats(),
            current_extension: default_extension.clone(),
            default_extension,
            status: ExportStatus::NotExportedYet,
            image_copy: None,
            second_copy: None,
            use_second_copy: false,
            last_was_skip: false,
            exported_paths: Vec::new(),
            exported_ids: Vec::new(),
            skipped: 0,
        };

        let result = self.run_phases(&mut run);
        self.release_images(&mut run);
        self.exported_items = std::mem::take(&mut run.exported_ids);

        let summary = ExportSummary::new(run.exported_paths, run.skipped, started.elapsed());
        match result {
            Ok(()) => {
                info!(%summary, "export finished");
                Ok(summary)
            }
            Err(e) => {
                warn!(error = %e, "export aborted");
                Err(e)
            }
        }
    }

    fn run_phases(&mut self, run: &mut RunState) -> Result<()> {
        self.apply_constraints(run)?;
        if self.options.flatten_folders {
            self.tree.strip_hierarchy();
        }

        let matched: Vec<(ItemId, ItemKind)> = self
            .tree
            .iterate(true)
            .filter(|item| !(self.options.flatten_folders && item.kind().is_group()))
            .map(|item| (item.id(), item.kind()))
            .collect();
        let leaf_count = matched
            .iter()
            .filter(|(_, kind)| *kind == ItemKind::Leaf)
            .count();
        run.use_second_copy = self.options.keep_image_copy && leaf_count > 1;
        debug!(matched = matched.len(), leaves = leaf_count, "tree filtered");

        self.progress.reset(matched.len());
        self.setup(run)?;

        for (id, kind) in matched {
            if self.stop.is_stopped() {
                return Err(LayerportError::Cancelled);
            }
            match kind {
                ItemKind::Leaf => self.process_leaf(run, id)?,
                ItemKind::EmptyGroup => self.process_empty_group(run, id)?,
                ItemKind::NonemptyGroup => self.process_group(run, id)?,
            }
        }
        Ok(())
    }

    // Wraps the enabled operations of both registries into invoker
    // callables. Rebuilt per run so registry edits between runs take
    // effect.
    fn build_invoker(&self) -> Result<Invoker> {
        let mut invoker = Invoker::new("export");

        for op in self.constraints.iter_enabled() {
            let func = op.as_constraint().cloned().ok_or_else(|| {
                LayerportError::Execution(format!("'{}' is not a constraint", op.name()))
            })?;
            let args = op.spec().args.clone();
            let rule_name = op.name().to_string();
            let subfilter = op.spec().subfilter.clone();
            let match_mode = op.spec().match_mode.unwrap_or_default();
            let groups: Vec<&str> = op.spec().groups.iter().map(String::as_str).collect();

            invoker.add(
                Arc::new(move |ctx: &mut CallContext<'_>| {
                    let filter = ctx.filter_mut()?;
                    let target = match &subfilter {
                        Some(name) => {
                            if !filter.has_subfilter(name) {
                                filter.add_subfilter(name.clone(), ItemFilter::new(match_mode));
                            }
                            filter.subfilter_mut(name).ok_or_else(|| {
                                LayerportError::Execution(format!("missing sub-filter '{name}'"))
                            })?
                        }
                        None => filter,
                    };
                    let func = func.clone();
                    let args = args.clone();
                    target.add_rule(rule_name.clone(), move |item: &Item| func(item, &args));
                    Ok(())
                }),
                &groups,
            );
        }

        // Keep the layer last touched by a procedure active.
        invoker.add_foreach(
            Arc::new(|ctx: &mut CallContext<'_>| {
                if let Some(layer) = ctx.layer {
                    ctx.host.set_active_layer(ctx.image, layer)?;
                }
                Ok(())
            }),
            &[GROUP_PROCEDURES],
        );

        for op in self.procedures.iter_enabled() {
            let func = op.as_procedure().cloned().ok_or_else(|| {
                LayerportError::Execution(format!("'{}' is not a procedure", op.name()))
            })?;
            let args = op.spec().args.clone();
            let ignore_global = op.spec().ignore_global_constraints;
            let local: Option<(ConstraintFn, Vec<ArgValue>)> = match &op.spec().local_constraint {
                Some(name) => {
                    let constraint = self.constraints.get(name).ok_or_else(|| {
                        LayerportError::NotFound(format!("local constraint '{name}'"))
                    })?;
                    let func = constraint.as_constraint().cloned().ok_or_else(|| {
                        LayerportError::Execution(format!("'{name}' is not a constraint"))
                    })?;
                    Some((func, constraint.spec().args.clone()))
                }
                None => None,
            };
            let groups: Vec<&str> = op.spec().groups.iter().map(String::as_str).collect();

            invoker.add(
                Arc::new(move |ctx: &mut CallContext<'_>| {
                    if !ignore_global && !ctx.matches_global {
                        return Ok(());
                    }
                    if let Some((constraint, cargs)) = &local {
                        if !constraint(ctx.item()?, cargs) {
                            return Ok(());
                        }
                    }
                    func(ctx, &args)
                }),
                &groups,
            );
        }

        Ok(invoker)
    }

    // Runs the constraint callables once; each adds its rule to the tree's
    // filter.
    fn apply_constraints(&mut self, run: &mut RunState) -> Result<()> {
        let mut filter = std::mem::take(self.tree.filter_mut());
        let mut ctx = CallContext {
            host: self.host.as_mut(),
            image: self.source_image,
            layer: None,
            item: None,
            matches_global: false,
            filter: Some(&mut filter),
        };
        let mut result = self.hooks.run(&[GROUP_CONSTRAINTS], &mut ctx);
        if result.is_ok() {
            result = run.invoker.run(&[GROUP_CONSTRAINTS], &mut ctx);
        }
        *self.tree.filter_mut() = filter;
        result
    }

    fn setup(&mut self, run: &mut RunState) -> Result<()> {
        if !run.phases.contains(Phase::Contents) {
            return Ok(());
        }
        let copy = self.host.duplicate_without_contents(self.source_image)?;
        run.image_copy = Some(copy);
        debug!(image = %copy, "created working image copy");

        let mut ctx = CallContext {
            host: self.host.as_mut(),
            image: copy,
            layer: None,
            item: None,
            matches_global: false,
            filter: None,
        };
        self.hooks.run(&[HOOK_AFTER_CREATE_IMAGE_COPY], &mut ctx)?;
        run.invoker.run(&[HOOK_AFTER_CREATE_IMAGE_COPY], &mut ctx)
    }

    fn image_copy(run: &RunState) -> Result<ImageRef> {
        run.image_copy
            .ok_or_else(|| LayerportError::Execution("no working image copy".to_string()))
    }

    fn process_group(&mut self, run: &mut RunState, id: ItemId) -> Result<()> {
        if run.phases.contains(Phase::Naming) {
            self.tree.validate_name(id)?;
            self.tree.uniquify_name(id, None)?;
        }
        self.progress.advance();
        Ok(())
    }

    fn process_empty_group(&mut self, run: &mut RunState, id: ItemId) -> Result<()> {
        if run.phases.contains(Phase::Naming) {
            self.tree.validate_name(id)?;
            self.tree.uniquify_name(id, None)?;
        }
        if run.phases.contains(Phase::Export) {
            let path = self.tree.filepath(id, &self.options.output_directory)?;
            std::fs::create_dir_all(&path).map_err(|e| {
                LayerportError::InvalidOutputDirectory {
                    item_name: self.tree.item(id).map(|i| i.name().to_string()).unwrap_or_default(),
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?;
            debug!(path = %path.display(), "created directory");
        }
        self.progress.advance();
        Ok(())
    }

    fn process_leaf(&mut self, run: &mut RunState, id: ItemId) -> Result<()> {
        let item = self.tree.item(id)?.clone();
        self.progress.set_status(item.name());

        if run.phases.contains(Phase::Naming) {
            let renamed = run.renamer.rename(&self.tree, &item, &self.document_name)?;
            self.tree.set_name(id, renamed)?;
            run.current_extension = self.choose_extension(run, &item);
            self.finalize_name(run, id)?;
        }

        if !run.phases.contains(Phase::Export) {
            self.progress.advance();
            return Ok(());
        }

        // Contents phase: copy the layer into the working image and run
        // the procedures over it.
        let (working, layer) = if run.phases.contains(Phase::Contents) {
            let working = if run.use_second_copy {
                let copy = self.host.duplicate_without_contents(self.source_image)?;
                run.second_copy = Some(copy);
                copy
            } else {
                Self::image_copy(run)?
            };
            let inserted = self
                .host
                .copy_layer_into(self.source_image, item.layer(), working)?;

            let mut ctx = CallContext {
                host: self.host.as_mut(),
                image: working,
                layer: Some(inserted),
                item: Some(&item),
                matches_global: true,
                filter: None,
            };
            self.hooks.run(&[HOOK_AFTER_INSERT_LAYER], &mut ctx)?;
            run.invoker
                .run(&[HOOK_AFTER_INSERT_LAYER, GROUP_PROCEDURES], &mut ctx)?;
            let layer = ctx.layer.unwrap_or(inserted);

            let final_name = self.tree.item(id)?.name().to_string();
            self.host.rename_layer(working, layer, &final_name)?;
            (working, layer)
        } else {
            (self.source_image, item.layer())
        };

        run.last_was_skip = false;
        let mut export_result = self.export_with_retries(run, id, &item, working, layer);

        if export_result.is_ok() && run.phases.contains(Phase::Contents) {
            let mut ctx = CallContext {
                host: self.host.as_mut(),
                image: working,
                layer: Some(layer),
                item: Some(&item),
                matches_global: true,
                filter: None,
            };
            export_result = self.hooks.run(&[HOOK_AFTER_PROCESS_LAYER], &mut ctx);
            if export_result.is_ok() {
                export_result = run.invoker.run(&[HOOK_AFTER_PROCESS_LAYER], &mut ctx);
            }
        }

        // Per-item teardown happens regardless of the export outcome.
        if run.phases.contains(Phase::Contents) {
            if let Some(second) = run.second_copy.take() {
                if export_result.is_ok() && !run.last_was_skip {
                    let kept = Self::image_copy(run)?;
                    self.host.copy_layer_into(second, layer, kept)?;
                }
                self.host.delete_image(second)?;
            } else if !self.options.keep_image_copy {
                self.host.remove_layer(working, layer)?;
            }
        }
        export_result?;

        if run.last_was_skip {
            run.skipped += 1;
            debug!(item = item.name(), "skipped existing file");
        }
        self.progress.advance();
        Ok(())
    }

    fn choose_extension(&self, run: &RunState, item: &Item) -> String {
        if self.options.infer_file_extensions {
            if let Some(ext) = item.orig_file_extension() {
                let ext = ext.to_lowercase();
                if run.extensions.is_valid(&ext) {
                    return ext;
                }
            }
        }
        run.default_extension.clone()
    }

    // Applies the current extension, validates the result and uniquifies it
    // against siblings, keeping the numeric suffix in front of the
    // extension.
    fn finalize_name(&mut self, run: &RunState, id: ItemId) -> Result<()> {
        let name = self.tree.item(id)?.name().to_string();
        let named = names::with_file_extension(&name, &run.current_extension);
        self.tree.set_name(id, named)?;
        self.tree.validate_name(id)?;

        let name = self.tree.item(id)?.name().to_string();
        let position = names::file_extension(&name).map(|ext| name.len() - ext.len() - 1);
        self.tree.uniquify_name(id, position)
    }

    // Retry state machine around the backend call. A calling error in a
    // non-interactive mode retries once interactively; any other failure
    // under a non-default extension invalidates that extension and retries
    // once with the default one.
    fn export_with_retries(
        &mut self,
        run: &mut RunState,
        id: ItemId,
        item: &Item,
        image: ImageRef,
        layer: LayerRef,
    ) -> Result<()> {
        run.status = ExportStatus::NotExportedYet;
        self.try_export(run, id, item, image, layer)?;

        if run.status == ExportStatus::UseDefaultFileExtension {
            run.current_extension = run.default_extension.clone();
            self.finalize_name(run, id)?;
            let final_name = self.tree.item(id)?.name().to_string();
            if run.phases.contains(Phase::Contents) {
                self.host.rename_layer(image, layer, &final_name)?;
            }
            self.try_export(run, id, item, image, layer)?;
        }
        Ok(())
    }

    fn try_export(
        &mut self,
        run: &mut RunState,
        id: ItemId,
        item: &Item,
        image: ImageRef,
        layer: LayerRef,
    ) -> Result<()> {
        let path = self.tree.filepath(id, &self.options.output_directory)?;
        let (mode, path) = overwrite::resolve(&path, self.chooser.as_mut());
        match mode {
            OverwriteMode::Cancel => return Err(LayerportError::Cancelled),
            OverwriteMode::Skip => {
                run.last_was_skip = true;
                run.status = ExportStatus::ExportSuccessful;
                return Ok(());
            }
            OverwriteMode::Replace | OverwriteMode::Rename => {}
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LayerportError::InvalidOutputDirectory {
                    item_name: item.name().to_string(),
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                }
            })?;
        }

        let run_mode = if run.extensions.export_count(&run.current_extension) > 0 {
            RunMode::WithLastVals
        } else {
            self.options.initial_run_mode
        };
        self.export_once(run, run_mode, item, image, layer, &path)?;
        if run.status == ExportStatus::ForceInteractive {
            self.export_once(run, RunMode::Interactive, item, image, layer, &path)?;
        }

        if run.status == ExportStatus::ExportSuccessful && !run.last_was_skip {
            run.extensions.record_export(&run.current_extension);
            run.exported_paths.push(path.clone());
            run.exported_ids.push(id);
            debug!(path = %path.display(), "exported");
        }
        Ok(())
    }

    fn export_once(
        &mut self,
        run: &mut RunState,
        run_mode: RunMode,
        item: &Item,
        image: ImageRef,
        layer: LayerRef,
        path: &std::path::Path,
    ) -> Result<()> {
        match self
            .backend
            .export(run_mode, self.host.as_mut(), image, layer, path)
        {
            Ok(()) => {
                run.status = ExportStatus::ExportSuccessful;
                Ok(())
            }
            Err(e) if e.is_cancellation() => Err(LayerportError::Cancelled),
            Err(e) if e.is_calling_error() && run_mode != RunMode::Interactive => {
                debug!(item = item.name(), "calling error, retrying interactively");
                run.status = ExportStatus::ForceInteractive;
                Ok(())
            }
            Err(e) => {
                if run.current_extension != run.default_extension {
                    warn!(
                        item = item.name(),
                        extension = %run.current_extension,
                        error = %e,
                        "extension failed, falling back to default"
                    );
                    run.extensions.invalidate(&run.current_extension);
                    run.status = ExportStatus::UseDefaultFileExtension;
                    Ok(())
                } else {
                    Err(LayerportError::ExportFailed {
                        item_name: item.name().to_string(),
                        extension: run.current_extension.clone(),
                        message: e.message().to_string(),
                    })
                }
            }
        }
    }

    // Releases per-run image copies; best-effort, runs on every exit path.
    fn release_images(&mut self, run: &mut RunState) {
        if let Some(second) = run.second_copy.take() {
            if let Err(e) = self.host.delete_image(second) {
                warn!(error = %e, "failed to release per-item image copy");
            }
        }
        if let Some(copy) = run.image_copy.take() {
            if self.options.keep_image_copy {
                self.last_image_copy = Some(copy);
            } else if let Err(e) = self.host.delete_image(copy) {
                warn!(error = %e, "failed to release working image copy");
            }
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.').to_lowercase();
    if trimmed.is_empty() {
        "png".to_string()
    } else {
        trimmed
    }
}
