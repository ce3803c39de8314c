//! Stratum CLI - Command line interface for transition log analysis

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use stratum_trace::{
    parse_log, render_aggregate, render_dot, render_jpg, render_summary, Edge, ParsedLog,
    ReportOptions, TransitionGraph,
};

#[derive(Parser)]
#[command(name = "stratum-trace")]
#[command(about = "Analyze strategy transition logs", long_about = None)]
struct Cli {
    /// Log file to read, or '-' for stdin
    logfile: String,

    #[command(subcommand)]
    command: Commands,

    /// Report skipped log lines
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Show percentages
    #[arg(short, long, global = true)]
    percentages: bool,

    /// Include non-storage nodes
    #[arg(short, long = "all", global = true)]
    all_nodes: bool,

    /// Per-edge breakdown in summaries
    #[arg(short, long, global = true)]
    detailed: bool,

    /// Per-class breakdown
    #[arg(short = 'c', long = "classes", global = true)]
    per_class: bool,

    /// Suppress slot counts
    #[arg(short = 's', long = "suppress-slots", global = true)]
    suppress_slots: bool,

    /// Emit JSON instead of text where applicable
    #[arg(short = 'j', long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
#[command(rename_all = "snake_case")]
enum Commands {
    /// Print per-node transition summaries
    Summarize,
    /// Print the transition graph as DOT source
    PrintDot,
    /// Render the transition graph to a JPG via an external dot
    Dot {
        /// Output file (defaults to <logfile>.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print aggregated transition entries
    Aggregate,
    /// Print each parsed log entry
    PrintEntries,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        process::exit(1);
    });

    let parsed = match read_log(&cli.logfile) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.logfile, e);
            process::exit(1);
        }
    };

    if cli.verbose {
        for skipped in &parsed.skipped {
            eprintln!(
                "skipping line {}: {} ({})",
                skipped.line_number, skipped.content, skipped.reason
            );
        }
    }

    let options = ReportOptions {
        percentages: cli.percentages,
        all_nodes: cli.all_nodes,
        detailed: cli.detailed,
        per_class: cli.per_class,
        suppress_slots: cli.suppress_slots,
    };
    let graph = TransitionGraph::from_entries(&parsed.entries);

    match cli.command {
        Commands::Summarize => print!("{}", render_summary(&graph, &options)),
        Commands::PrintDot => print!("{}", render_dot(&graph, &options)),
        Commands::Dot { output } => cmd_dot(&graph, &options, output, &cli.logfile),
        Commands::Aggregate => cmd_aggregate(&graph, &options, cli.json),
        Commands::PrintEntries => cmd_print_entries(&parsed, cli.json),
    }
}

fn read_log(logfile: &str) -> io::Result<ParsedLog> {
    if logfile == "-" {
        let stdin = io::stdin();
        parse_log(stdin.lock())
    } else {
        parse_log(BufReader::new(File::open(logfile)?))
    }
}

fn cmd_dot(
    graph: &TransitionGraph,
    options: &ReportOptions,
    output: Option<PathBuf>,
    logfile: &str,
) {
    let output = output.unwrap_or_else(|| default_output(logfile));
    let source = render_dot(graph, options);
    if let Err(e) = render_jpg(&source, &output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
    println!("wrote {}", output.display());
}

fn default_output(logfile: &str) -> PathBuf {
    if logfile == "-" {
        PathBuf::from("strategies.jpg")
    } else {
        PathBuf::from(format!("{}.jpg", logfile))
    }
}

fn cmd_aggregate(graph: &TransitionGraph, options: &ReportOptions, json: bool) {
    if json {
        let edges: Vec<&Edge> = graph.edges().collect();
        println!("{}", serde_json::to_string_pretty(&edges).unwrap());
    } else {
        print!("{}", render_aggregate(graph, options));
    }
}

fn cmd_print_entries(parsed: &ParsedLog, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.entries).unwrap());
    } else {
        for entry in &parsed.entries {
            println!("{}", entry);
        }
    }
}
