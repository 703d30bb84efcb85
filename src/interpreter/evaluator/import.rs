use std::{fs, path::Path, time::Instant};

use crate::{
    ast::{Node, Position, RunMode},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        parser::core::parse_source,
        value::core::Value,
    },
    toolchain,
};

impl Context {
    /// Evaluates `import [-c] [-r] name`.
    ///
    /// Without flags the script `name.soul` is parsed in full and evaluated
    /// in the current environment, so its definitions become visible to the
    /// importer. With `-c` it is transpiled and written next to the script
    /// instead; `-r` additionally hands the generated file to the configured
    /// toolchain.
    ///
    /// # Returns
    /// The value of the script's last statement when included, or the
    /// `Compiled in: ... seconds` report when compiled.
    pub fn eval_run(&mut self, file: &str, mode: RunMode, position: Position) -> EvalResult<Flow> {
        match mode {
            RunMode::Include => {
                let program = self.load_script(file, position)?;
                self.descend(position, |context| context.eval(&program))
            },
            RunMode::Compile { execute } => {
                self.descend(position, |context| context.compile_script(file, execute, position))
                    .map(|report| Flow::Normal(Value::Str(report)))
            },
        }
    }

    /// Reads and parses the script an import names.
    ///
    /// # Errors
    /// `Io` if the script cannot be read, `Import` if it does not parse.
    pub(crate) fn load_script(&self, file: &str, position: Position) -> EvalResult<Node> {
        let path = self.config().script_path(file);
        tracing::info!(path = %path.display(), "importing script");

        let source = fs::read_to_string(&path).map_err(|source| RuntimeError::Io { path: path.display()
                                                                                             .to_string(),
                                                                                   source,
                                                                                   position })?;

        let (program, diagnostics) = parse_source(&source);
        for diagnostic in &diagnostics {
            tracing::warn!(path = %path.display(), %diagnostic, "lexical problem in imported script");
        }

        program.map_err(|source| RuntimeError::Import { file: file.to_string(),
                                                        source,
                                                        position })
    }

    /// Transpiles an imported script to its target file.
    ///
    /// # Returns
    /// The timing report.
    pub(crate) fn compile_script(&mut self, file: &str, execute: bool, position: Position) -> EvalResult<String> {
        let start = Instant::now();
        let program = self.load_script(file, position)?;
        let text = self.render_program(&program)?;

        let source_path = self.config().script_path(file);
        let target = self.config().target_path(&source_path);
        write_target(&target, &text, position)?;

        let report = format!("Compiled in: {} seconds", start.elapsed().as_secs_f64());
        tracing::info!(target = %target.display(), elapsed = ?start.elapsed(), "compiled script");

        if execute {
            self.write_line(&report, position)?;
            let status = toolchain::invoke(self.config(), &target).map_err(|source| {
                             RuntimeError::Io { path: self.config().toolchain.join(" "),
                                                source,
                                                position }
                         })?;
            if !status.success() {
                tracing::warn!(%status, target = %target.display(), "toolchain reported failure");
            }
        }

        Ok(report)
    }
}

/// Writes generated text, ending it with a newline.
pub(crate) fn write_target(path: &Path, text: &str, position: Position) -> EvalResult<()> {
    let mut contents = text.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }

    fs::write(path, contents).map_err(|source| RuntimeError::Io { path: path.display().to_string(),
                                                                  source,
                                                                  position })
}
