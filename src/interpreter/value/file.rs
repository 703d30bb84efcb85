use std::{
    cell::RefCell,
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

/// How a file was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// `"r"`
    Read,
    /// `"w"`: truncates or creates.
    Write,
    /// `"a"`: appends or creates.
    Append,
}

impl FileMode {
    /// Parses the mode argument of `open`.
    #[must_use]
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "r" => Some(Self::Read),
            "w" => Some(Self::Write),
            "a" => Some(Self::Append),
            _ => None,
        }
    }
}

/// An open file. Closing releases the OS handle; later reads and writes fail.
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    mode: FileMode,
    file: RefCell<Option<File>>,
}

impl FileHandle {
    /// Opens `path` in `mode`.
    pub fn open(path: PathBuf, mode: FileMode) -> io::Result<Self> {
        let file = match mode {
            FileMode::Read => File::open(&path)?,
            FileMode::Write => File::create(&path)?,
            FileMode::Append => OpenOptions::new().append(true).create(true).open(&path)?,
        };
        Ok(Self { path,
                  mode,
                  file: RefCell::new(Some(file)) })
    }

    /// Returns the path the file was opened with.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the mode the file was opened with.
    #[must_use]
    pub const fn mode(&self) -> FileMode {
        self.mode
    }

    /// Reads the rest of the file.
    pub fn read_to_string(&self) -> io::Result<String> {
        let mut slot = self.file.borrow_mut();
        let file = slot.as_mut().ok_or_else(closed)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Writes `text` at the current position.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut slot = self.file.borrow_mut();
        let file = slot.as_mut().ok_or_else(closed)?;
        file.write_all(text.as_bytes())
    }

    /// Closes the file. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        self.file.borrow_mut().take().is_some()
    }
}

fn closed() -> io::Error {
    io::Error::other("file is closed")
}
