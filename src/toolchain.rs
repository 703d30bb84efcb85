use std::{
    io,
    path::Path,
    process::{Command, ExitStatus},
};

use crate::config::Config;

/// Hands a generated file to the configured toolchain and waits for it.
///
/// The first element of `Config::toolchain` is the program; the remaining
/// elements are passed before the file path. The child inherits the standard
/// streams, so whatever the compiled program prints goes straight to the
/// terminal.
///
/// # Errors
/// Returns an `InvalidInput` error if no toolchain is configured, or the
/// spawn error if the program cannot be started.
pub fn invoke(config: &Config, path: &Path) -> io::Result<ExitStatus> {
    let Some((program, args)) = config.toolchain.split_first() else {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "no toolchain configured"));
    };

    tracing::info!(%program, ?args, path = %path.display(), "invoking toolchain");
    Command::new(program).args(args).arg(path).status()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toolchain_is_rejected() {
        let config = Config { toolchain: Vec::new(),
                              ..Config::default() };
        let error = invoke(&config, Path::new("out.nim")).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let config = Config { toolchain: vec!["soul-no-such-toolchain".to_string()],
                              ..Config::default() };
        assert!(invoke(&config, Path::new("out.nim")).is_err());
    }
}
