//! Primary package build
//!
//! The primary package ships two module formats from one output tree. The
//! first compiler pass is retagged by the renamer, then the second pass
//! (with import normalization) writes the default extension next to it.

use crate::error::BuildResult;
use crate::mode::BuildMode;
use crate::pipeline::{Pipeline, Stage, StageExecutor};
use crate::targets::PrimaryTarget;
use crate::toolchain::Toolchain;
use std::path::Path;

/// Plans and runs the primary package build
pub struct PackageBuilder<'a> {
    root: &'a Path,
    target: &'a PrimaryTarget,
    toolchain: &'a Toolchain,
}

impl<'a> PackageBuilder<'a> {
    pub fn new(root: &'a Path, target: &'a PrimaryTarget, toolchain: &'a Toolchain) -> Self {
        Self {
            root,
            target,
            toolchain,
        }
    }

    /// Stages for the primary package.
    ///
    /// Full mode: clean, first pass, rename, second pass, declarations, link.
    /// Fast mode: clean, second pass.
    pub fn plan(&self, mode: BuildMode) -> Pipeline {
        let tc = self.toolchain;
        let target = self.target;
        let output = self.root.join(&target.output_dir);

        let mut pipeline = Pipeline::new(&target.name).stage(Stage::Clean {
            dir: output.clone(),
        });

        if !mode.is_fast() {
            pipeline = pipeline
                .command(tc.compile(&target.source_dir, &target.output_dir, false, self.root))
                .stage(Stage::RenameModules {
                    root: output,
                    from: tc.compiled_extension.clone(),
                    to: tc.renamed_extension.clone(),
                });
        }

        pipeline = pipeline.command(tc.compile(
            &target.source_dir,
            &target.output_dir,
            true,
            self.root,
        ));

        if !mode.is_fast() {
            pipeline = pipeline
                .command(tc.emit_declarations(&target.project_dir, &target.output_dir, self.root))
                // Integrations built after this point link against this output
                .command(tc.link_self(self.root));
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

    fn labels(pipeline: &Pipeline) -> Vec<&'static str> {
        pipeline.stages.iter().map(Stage::label).collect()
    }

    #[test]
    fn test_full_plan() {
        let target = PrimaryTarget::new("core");
        let tc = Toolchain::default();
        let pipeline = PackageBuilder::new(Path::new("/repo"), &target, &tc).plan(BuildMode::Full);

        assert_eq!(pipeline.name, "core");
        assert_eq!(
            labels(&pipeline),
            vec!["clean", "compile", "rename", "compile", "declarations", "link"]
        );
        assert_eq!(
            pipeline.stages[0],
            Stage::Clean {
                dir: PathBuf::from("/repo/dist")
            }
        );
    }

    #[test]
    fn test_fast_plan() {
        let target = PrimaryTarget::new("core");
        let tc = Toolchain::default();
        let pipeline = PackageBuilder::new(Path::new("/repo"), &target, &tc).plan(BuildMode::Fast);

        assert_eq!(labels(&pipeline), vec!["clean", "compile"]);
        match &pipeline.stages[1] {
            Stage::Command(cmd) => {
                assert_eq!(cmd.kind, CommandKind::Compile);
                assert!(cmd.command.contains("imports"));
            }
            other => panic!("unexpected stage {:?}", other),
        }
    }
}
