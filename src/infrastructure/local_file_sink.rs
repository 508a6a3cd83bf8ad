//! Local-filesystem implementation of the `FileSink` port.
//!
//! Every append opens the target in append mode and writes through, so a
//! concurrent `size()` always reflects completed appends. No buffering layer
//! sits between the engine and the file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;

use crate::domain::errors::Result;
use crate::ports::file_sink::FileSink;

pub struct LocalFileSink;

impl FileSink for LocalFileSink {
    fn truncate_and_open(&self, target: &str) -> Result<()> {
        File::create(target)?;
        Ok(())
    }

    fn append_line(&self, target: &str, content: &str) -> Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(target)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    fn size(&self, target: &str) -> Result<u64> {
        Ok(fs::metadata(target)?.len())
    }

    fn delete(&self, target: &str) -> Result<()> {
        fs::remove_file(target)?;
        Ok(())
    }
}
