//! Output-file layout for a run.
//!
//! Every run writes into `outputs/` next to the working directory, with
//! file names derived from the configuration file name plus a four-digit
//! run id — the first id in `0000..=9999` whose progress file does not
//! exist yet:
//!
//! ```text
//! outputs/progress_<cfg>_<id>.out     human-readable progress log
//! outputs/data_<cfg>_<id>.csv         per-transaction block inclusion rows
//! outputs/metadata_<cfg>_<id>.data    key=value run description
//! outputs/mempool_<cfg>_<id>.csv      per-miner sizes (only with --mp_print_data)
//! ```
//!
//! Progress output is teed to stdout so a foreground run stays watchable.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use sim_engine::{OutputSinks, Scenario, SimParams};

const OUTPUT_DIR: &str = "outputs";
const MAX_RUN_ID: u32 = 9999;

/// Output preparation failures; all fatal before the calendar runs.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot access or create the \"{OUTPUT_DIR}\" directory: {0}")]
    OutputDir(std::io::Error),

    #[error("\"{OUTPUT_DIR}\" exists but is not a directory")]
    NotADirectory,

    #[error("maximum number of output files for the same config exceeded ({MAX_RUN_ID})")]
    RunIdsExhausted,

    #[error("cannot create output file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Identity of one run's output set.
#[derive(Clone, Debug)]
pub struct RunContext {
    /// `<cfg>_<id>`, the run's name in the banner and metadata.
    pub run_name: String,
    /// Absolute (canonicalized where possible) configuration path.
    pub config_path: PathBuf,
}

/// Creates the output directory and the run's files, returning the engine
/// sinks plus the run identity.
pub fn prepare_sinks(
    config_path: &Path,
    mp_print_data: bool,
) -> Result<(OutputSinks, RunContext), OutputError> {
    prepare_sinks_in(Path::new(OUTPUT_DIR), config_path, mp_print_data)
}

fn prepare_sinks_in(
    dir: &Path,
    config_path: &Path,
    mp_print_data: bool,
) -> Result<(OutputSinks, RunContext), OutputError> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => return Err(OutputError::NotADirectory),
        Ok(_) => {}
        Err(_) => fs::create_dir_all(dir).map_err(OutputError::OutputDir)?,
    }

    let config_filename = config_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config_path.to_string_lossy().into_owned());

    let run_id = (0..=MAX_RUN_ID)
        .find(|id| !dir.join(progress_name(&config_filename, *id)).exists())
        .ok_or(OutputError::RunIdsExhausted)?;
    let run_name = format!("{config_filename}_{run_id:04}");

    // Row sinks are buffered; the progress tee stays line-by-line so a
    // foreground run remains watchable.
    let progress = create(dir.join(progress_name(&config_filename, run_id)))?;
    let data = create(dir.join(format!("data_{run_name}.csv")))?;
    let metadata = create(dir.join(format!("metadata_{run_name}.data")))?;
    let mempool = if mp_print_data {
        let file = create(dir.join(format!("mempool_{run_name}.csv")))?;
        Some(Box::new(BufWriter::new(file)) as Box<dyn Write>)
    } else {
        None
    };

    let sinks = OutputSinks::new(
        Box::new(Tee::new(progress)),
        Box::new(BufWriter::new(data)),
        Box::new(BufWriter::new(metadata)),
        mempool,
    );
    let context = RunContext {
        run_name,
        config_path: config_path
            .canonicalize()
            .unwrap_or_else(|_| config_path.to_path_buf()),
    };
    Ok((sinks, context))
}

/// Writes the start banner to the progress sink and the full key=value
/// block to the metadata sink, mirroring each other's fields.
pub fn write_run_preamble(
    sinks: &mut OutputSinks,
    context: &RunContext,
    params: &SimParams,
    scenario: &Scenario,
) -> io::Result<()> {
    let honest_power = scenario.honest_power() * 100.0;
    let malicious_power = scenario.malicious_power() * 100.0;

    sinks.progress_line(&format!(
        "Simulation: {}\n\
         Config: {}\n\
         Blocks: {}\n\
         Honest miners: {} ({honest_power:.2}% power)\n\
         Malicious miners: {} ({malicious_power:.2}% power)\n\
         Seed: {}\n\
         Mempool capacity: {}\n\
         Block size: {}\n\
         Lambda: {}\n\
         Min. transaction generation time: {} sec\n\
         Max. transaction generation time: {} sec\n\
         Min. transaction generation count: {}\n\
         Max. transaction generation count: {}\n\
         ========================================================",
        context.run_name,
        context.config_path.display(),
        params.blocks,
        scenario.honest_count(),
        scenario.malicious_count(),
        params.seed,
        params.mp_capacity,
        params.block_size,
        params.lambda,
        params.min_tx_gen_time,
        params.max_tx_gen_time,
        params.min_tx_gen_count,
        params.max_tx_gen_count,
    ))?;

    sinks.metadata_entry("name", &context.run_name)?;
    sinks.metadata_entry("cfg_path", context.config_path.display())?;
    sinks.metadata_entry("blocks", params.blocks)?;
    sinks.metadata_entry("seed", params.seed)?;
    sinks.metadata_entry("block_size", params.block_size)?;
    sinks.metadata_entry("mempool_capacity", params.mp_capacity)?;
    sinks.metadata_entry("malicious_miners", scenario.malicious_count())?;
    sinks.metadata_entry("honest_miners", scenario.honest_count())?;
    sinks.metadata_entry("malicious_power", format!("{:.5}", scenario.malicious_power()))?;
    sinks.metadata_entry("honest_power", format!("{:.5}", scenario.honest_power()))?;
    Ok(())
}

fn progress_name(config_filename: &str, run_id: u32) -> String {
    format!("progress_{config_filename}_{run_id:04}.out")
}

fn create(path: PathBuf) -> Result<File, OutputError> {
    File::create(&path).map_err(|source| OutputError::Create { path, source })
}

/// Writer that duplicates everything to stdout.
struct Tee {
    file: File,
}

impl Tee {
    fn new(file: File) -> Self {
        Self { file }
    }
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stdout().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stdout().flush()
    }
}
