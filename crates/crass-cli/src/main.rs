use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crass_lib::builder::parse::parse_reads;
use crass_lib::scan::annotate_read;
use crass_lib::{BuildConfiguration, GraphBuilder};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "crass")]
#[command(version = "0.1.0")]
#[command(about = "crass: CRISPR repeat and spacer assembly graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report direct repeat arrays found in each read
    Scan {
        /// Input FASTA/FASTQ file
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        repeats: RepeatArgs,
    },

    /// Build the repeat graph and write it as Graphviz DOT
    Graph {
        /// Input FASTA/FASTQ file
        #[arg(short, long)]
        input: String,

        /// Output DOT file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// K-mer length of graph nodes
        #[arg(short, long, default_value = "8")]
        k: usize,

        /// Number of threads (0 = all available cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,

        #[command(flatten)]
        repeats: RepeatArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Length windows for the direct repeat scan
#[derive(Args)]
struct RepeatArgs {
    /// Shortest repeat
    #[arg(long, default_value = "23")]
    min_repeat: usize,

    /// Longest repeat
    #[arg(long, default_value = "47")]
    max_repeat: usize,

    /// Shortest spacer
    #[arg(long, default_value = "26")]
    min_spacer: usize,

    /// Longest spacer
    #[arg(long, default_value = "50")]
    max_spacer: usize,

    /// Minimum number of repeat copies in an array
    #[arg(long, default_value = "2")]
    min_copies: usize,
}

impl RepeatArgs {
    fn apply(&self, config: &mut BuildConfiguration) {
        config.min_repeat_len = self.min_repeat;
        config.max_repeat_len = self.max_repeat;
        config.min_spacer_len = self.min_spacer;
        config.max_spacer_len = self.max_spacer;
        config.min_repeat_copies = self.min_copies;
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, repeats } => {
            scan_command(input, repeats)?;
        }
        Commands::Graph { input, output, k, threads, repeats, verbose } => {
            graph_command(input, output, k, threads, repeats, verbose)?;
        }
    }

    Ok(())
}

/// Print every read that carries a repeat array with its repeat spans
fn scan_command(input: String, repeats: RepeatArgs) -> anyhow::Result<()> {
    let mut config = BuildConfiguration::default();
    repeats.apply(&mut config);
    config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

    info!("Scanning {} for direct repeats...", input);
    let reads = parse_reads(&input)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut num_hits = 0;
    for mut read in reads {
        let found = annotate_read(&mut read, &config);
        if found == 0 {
            debug!("  {}: no repeats", read.header());
            continue;
        }
        num_hits += 1;
        writeln!(out, "{}\t{}", read.header(), read.repeats())?;
    }
    out.flush()?;

    info!("{} reads with a direct repeat array", num_hits);
    Ok(())
}

/// Build the repeat graph from FASTA/FASTQ input
fn graph_command(
    input: String,
    output: Option<String>,
    k: usize,
    threads: usize,
    repeats: RepeatArgs,
    verbose: bool,
) -> anyhow::Result<()> {
    info!("Building repeat graph...");
    info!("  Input: {}", input);
    info!("  k: {}", k);

    let reads = parse_reads(&input)?;
    info!("  Loaded {} reads", reads.len());

    let mut config = BuildConfiguration::new(k).map_err(|e| anyhow::anyhow!("{}", e))?;
    repeats.apply(&mut config);
    config.num_threads = threads;
    config.verbose = verbose;

    let builder = GraphBuilder::new(config).map_err(|e| anyhow::anyhow!("{}", e))?;
    let built = builder
        .build_from_reads(reads)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if built.graph.is_empty() {
        warn!("No read carried a direct repeat array; the graph is empty");
    }

    match output {
        Some(path) => {
            info!("Writing graph to {}...", path);
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            let mut out = BufWriter::new(file);
            built.graph.to_graphviz(&built.tokens, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            built.graph.to_graphviz(&built.tokens, &mut out)?;
            out.flush()?;
        }
    }

    let counts = built.node_type_counts();
    info!(
        "Graph: {} nodes ({} repeat, {} mixed, {} spacer, {} undefined), {} jumping edges",
        built.graph.num_nodes(),
        counts.repeat,
        counts.mixed,
        counts.spacer,
        counts.undefined,
        built.jump_edges
    );

    Ok(())
}
