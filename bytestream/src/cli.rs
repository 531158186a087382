use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bytestream")]
#[command(version, about = "Read files from a remote filesystem through a byte stream", long_about = None)]
pub struct Cli {
    /// Directory served as the filesystem root
    #[arg(long, env = "BYTESTREAM_ROOT", default_value = ".")]
    pub root: String,

    /// Log filter, e.g. `info` or `bytestream=debug`
    #[arg(long, env = "BYTESTREAM_LOG", default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Write a byte range of a file to stdout")]
    Cat {
        #[arg(value_name = "PATH")]
        path: String,

        /// Offset to seek to before reading
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Maximum number of bytes to read; reads to end of file when omitted
        #[arg(long)]
        length: Option<u64>,

        /// Size of each read request
        #[arg(long, default_value_t = 64 * 1024)]
        chunk: usize,
    },
    #[command(about = "Print file metadata as JSON")]
    Stat {
        #[arg(value_name = "PATH")]
        path: String,
    },
    #[command(about = "Render the subscribers status page from a JSON file of rows")]
    Status {
        #[arg(value_name = "ROWS_JSON")]
        rows: String,
    },
}
