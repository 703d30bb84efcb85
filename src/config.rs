use std::path::{Path, PathBuf};

/// Settings shared by the interpreter, the transpiler and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Extension appended to imported script names.
    pub source_extension: String,
    /// Extension of generated files.
    pub target_extension: String,
    /// Directory that imports and file builtins resolve against.
    pub search_dir:       PathBuf,
    /// Spaces per indentation level in generated code.
    pub indent_width:     usize,
    /// Maximum nesting of user function calls.
    pub max_call_depth:   usize,
    /// Command that compiles and runs a generated file; the file path is
    /// appended as the last argument.
    pub toolchain:        Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self { source_extension: "soul".to_string(),
               target_extension: "nim".to_string(),
               search_dir:       PathBuf::from("."),
               indent_width:     4,
               max_call_depth:   2_000,
               toolchain:        vec!["nim".to_string(), "c".to_string(), "-r".to_string()], }
    }
}

impl Config {
    /// Returns a copy of this configuration resolving files against `dir`.
    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = dir.into();
        self
    }

    /// Returns the path of the script an `import name` statement loads.
    #[must_use]
    pub fn script_path(&self, name: &str) -> PathBuf {
        self.search_dir.join(format!("{name}.{}", self.source_extension))
    }

    /// Returns the path generated code for `source` is written to.
    #[must_use]
    pub fn target_path(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.target_extension)
    }

    /// Resolves a path given to a file builtin.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.search_dir.join(path)
    }

    /// Returns the leading whitespace for an indentation level.
    #[must_use]
    pub fn indentation(&self, level: usize) -> String {
        " ".repeat(self.indent_width * level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_scripts_and_targets() {
        let config = Config::default().with_search_dir("lib");
        assert_eq!(config.script_path("math"), PathBuf::from("lib/math.soul"));
        assert_eq!(config.target_path(Path::new("lib/math.soul")),
                   PathBuf::from("lib/math.nim"));
    }

    #[test]
    fn indentation_scales_with_width() {
        let config = Config { indent_width: 2,
                              ..Config::default() };
        assert_eq!(config.indentation(0), "");
        assert_eq!(config.indentation(3), "      ");
    }
}
