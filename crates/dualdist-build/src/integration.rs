//! Integration package build
//!
//! An integration compiles once, with import normalization, against the
//! primary package it links to. Install and link commands run inside the
//! integration directory by carrying it as their working directory.

use crate::error::BuildResult;
use crate::mode::BuildMode;
use crate::pipeline::{Pipeline, Stage, StageExecutor};
use crate::targets::IntegrationTarget;
use crate::toolchain::Toolchain;
use std::path::Path;

/// Plans and runs one integration build
pub struct IntegrationBuilder<'a> {
    root: &'a Path,
    target: &'a IntegrationTarget,
    /// Name of the primary package to link against
    primary: &'a str,
    toolchain: &'a Toolchain,
}

impl<'a> IntegrationBuilder<'a> {
    pub fn new(
        root: &'a Path,
        target: &'a IntegrationTarget,
        primary: &'a str,
        toolchain: &'a Toolchain,
    ) -> Self {
        Self {
            root,
            target,
            primary,
            toolchain,
        }
    }

    /// Stages for this integration.
    ///
    /// Full mode: install, link primary, clean, compile, declarations.
    /// Fast mode: clean, compile.
    pub fn plan(&self, mode: BuildMode) -> Pipeline {
        let tc = self.toolchain;
        let target = self.target;
        let mut pipeline = Pipeline::new(&target.name);

        if !mode.is_fast() {
            let package_dir = self.root.join(&target.path);
            pipeline = pipeline
                .command(tc.install(&package_dir))
                .command(tc.link_package(self.primary, &package_dir));
        }

        pipeline = pipeline
            .stage(Stage::Clean {
                dir: self.root.join(&target.output_dir),
            })
            .command(tc.compile(&target.source_dir, &target.output_dir, true, self.root));

        if !mode.is_fast() {
            pipeline = pipeline.command(tc.emit_declarations(
                &target.project_dir,
                &target.output_dir,
                self.root,
            ));
        }

        pipeline
    }

    /// Plan and run the build
    pub fn build<E: StageExecutor + ?Sized>(
        &self,
        mode: BuildMode,
        executor: &E,
    ) -> BuildResult<()> {
        self.plan(mode).run(executor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandKind;
    use std::path::PathBuf;

    #[test]
    fn test_full_plan_links_inside_integration_dir() {
        let target = IntegrationTarget::new("plugins/alpha");
        let tc = Toolchain::default();
        let pipeline =
            IntegrationBuilder::new(Path::new("/repo"), &target, "core", &tc).plan(BuildMode::Full);

        let labels: Vec<_> = pipeline.stages.iter().map(Stage::label).collect();
        assert_eq!(
            labels,
            vec!["install", "link-package", "clean", "compile", "declarations"]
        );

        for stage in &pipeline.stages[..2] {
            match stage {
                Stage::Command(cmd) => assert_eq!(cmd.cwd, PathBuf::from("/repo/plugins/alpha")),
                other => panic!("unexpected stage {:?}", other),
            }
        }
        match &pipeline.stages[1] {
            Stage::Command(cmd) => assert_eq!(cmd.command, "yarn link core"),
            other => panic!("unexpected stage {:?}", other),
        }
        match &pipeline.stages[3] {
            Stage::Command(cmd) => {
                assert_eq!(cmd.kind, CommandKind::Compile);
                assert_eq!(cmd.cwd, PathBuf::from("/repo"));
                assert!(cmd.command.contains("plugins/alpha/src -d plugins/alpha/dist"));
            }
            other => panic!("unexpected stage {:?}", other),
        }
    }

    #[test]
    fn test_fast_plan_has_two_stages() {
        let target = IntegrationTarget::new("plugins/alpha");
        let tc = Toolchain::default();
        let pipeline =
            IntegrationBuilder::new(Path::new("/repo"), &target, "core", &tc).plan(BuildMode::Fast);

        assert_eq!(pipeline.stages.len(), 2);
        assert_eq!(
            pipeline.stages[0],
            Stage::Clean {
                dir: PathBuf::from("/repo/plugins/alpha/dist")
            }
        );
    }
}
