use std::rc::Rc;

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{expect_file, expect_str},
        },
        value::{
            core::Value,
            file::{FileHandle, FileMode},
        },
    },
};

/// Opens a file relative to the search directory.
///
/// The optional mode is `"r"` (the default), `"w"` or `"a"`.
///
/// # Errors
/// `InvalidArgument` for an unknown mode, `Io` if the file cannot be opened.
pub fn open(context: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let name = expect_str("open", &args[0], position)?;
    let mode = match args.get(1) {
        Some(mode) => {
            let mode = expect_str("open", mode, position)?;
            FileMode::parse(mode).ok_or_else(|| RuntimeError::InvalidArgument { details: format!("open(): unknown mode '{mode}'"),
                                                                                position })?
        },
        None => FileMode::Read,
    };

    let path = context.config().resolve(name);
    tracing::debug!(path = %path.display(), ?mode, "opening file");

    let handle = FileHandle::open(path, mode).map_err(|source| RuntimeError::Io { path: name.to_string(),
                                                                                  source,
                                                                                  position })?;
    Ok(Value::File(Rc::new(handle)))
}

/// Reads the rest of a file as a string.
///
/// # Errors
/// `InvalidArgument` if the file was opened for writing or appending.
pub fn read(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let handle = expect_file("read", &args[0], position)?;
    if handle.mode() != FileMode::Read {
        return Err(wrong_mode("read", &handle, "reading", position));
    }

    handle.read_to_string()
          .map(Value::Str)
          .map_err(|source| io_error(&handle, source, position))
}

/// Writes the display text of a value to a file.
///
/// # Errors
/// `InvalidArgument` if the file was opened for reading.
pub fn write(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let handle = expect_file("write", &args[0], position)?;
    if handle.mode() == FileMode::Read {
        return Err(wrong_mode("write", &handle, "writing", position));
    }

    handle.write_str(&args[1].to_string())
          .map_err(|source| io_error(&handle, source, position))?;
    Ok(Value::None)
}

/// Closes a file. Closing twice is harmless.
pub fn close(_: &mut Context, args: &[Value], position: Position) -> EvalResult<Value> {
    let handle = expect_file("close", &args[0], position)?;

    if !handle.close() {
        tracing::debug!(path = %handle.path().display(), "file was already closed");
    }
    Ok(Value::None)
}

fn wrong_mode(builtin: &str, handle: &FileHandle, purpose: &str, position: Position) -> RuntimeError {
    RuntimeError::InvalidArgument { details: format!("{builtin}(): '{}' is not open for {purpose}",
                                                     handle.path().display()),
                                    position }
}

fn io_error(handle: &FileHandle, source: std::io::Error, position: Position) -> RuntimeError {
    RuntimeError::Io { path: handle.path().display().to_string(),
                       source,
                       position }
}
