//! Injected output sinks.
//!
//! The engine never opens files: the runner hands it writers, and the
//! engine owns only the row semantics. Progress lines, CSV rows and
//! metadata entries are the experiment's data product, so they bypass
//! `tracing` entirely.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// The four output channels of a run.
///
/// The mempool channel is optional; it is only opened when per-miner
/// mempool statistics were requested.
pub struct OutputSinks {
    progress: Box<dyn Write>,
    data: Box<dyn Write>,
    metadata: Box<dyn Write>,
    mempool: Option<Box<dyn Write>>,
}

impl std::fmt::Debug for OutputSinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSinks")
            .field("mempool", &self.mempool.is_some())
            .finish_non_exhaustive()
    }
}

impl OutputSinks {
    pub fn new(
        progress: Box<dyn Write>,
        data: Box<dyn Write>,
        metadata: Box<dyn Write>,
        mempool: Option<Box<dyn Write>>,
    ) -> Self {
        Self {
            progress,
            data,
            metadata,
            mempool,
        }
    }

    /// Sinks that discard everything; for tests that only inspect state.
    pub fn discard() -> Self {
        Self::new(
            Box::new(io::sink()),
            Box::new(io::sink()),
            Box::new(io::sink()),
            None,
        )
    }

    pub fn has_mempool_sink(&self) -> bool {
        self.mempool.is_some()
    }

    /// One human-readable progress line (newline appended).
    pub fn progress_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.progress, "{line}")
    }

    pub fn data_header(&mut self) -> io::Result<()> {
        writeln!(self.data, "TransactionID,Fee,BlockID,Depth,MinerID")
    }

    /// One row per transaction included in a mined block.
    pub fn data_row(
        &mut self,
        tx_id: u64,
        fee: u32,
        block_id: u32,
        depth: u32,
        miner_id: u32,
    ) -> io::Result<()> {
        writeln!(self.data, "{tx_id},{fee},{block_id},{depth},{miner_id}")
    }

    pub fn mempool_header(&mut self) -> io::Result<()> {
        match &mut self.mempool {
            Some(sink) => writeln!(sink, "MinerID,Progress,MempoolSize"),
            None => Ok(()),
        }
    }

    /// One row per miner at a progress tick.
    pub fn mempool_row(&mut self, miner_id: u32, progress: u32, size: usize) -> io::Result<()> {
        match &mut self.mempool {
            Some(sink) => writeln!(sink, "{miner_id},{progress},{size}"),
            None => Ok(()),
        }
    }

    /// One `key=value` metadata line.
    pub fn metadata_entry(&mut self, key: &str, value: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.metadata, "{key}={value}")
    }

    pub fn flush_all(&mut self) -> io::Result<()> {
        self.progress.flush()?;
        self.data.flush()?;
        self.metadata.flush()?;
        if let Some(sink) = &mut self.mempool {
            sink.flush()?;
        }
        Ok(())
    }
}

/// Cloneable in-memory writer for tests: every clone appends to the same
/// buffer, and the contents stay readable after the sinks are moved into a
/// simulation.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer contents decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
