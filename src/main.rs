//! tagdoc — resolve `@tag` doc comments into a JSON array of doclets.
//!
//! Two modes:
//!
//! - **stdin mode**: `tagdoc < file.js`
//! - **file mode**: `tagdoc -o docs src/*.js lib/**/*.js`

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tagdoc::{augment, borrow, scan};
use tagdoc::{Config, Diagnostics, DocletIndex, EventBus, Severity};
use tagdoc::event::{Event, EventData};

#[derive(Parser)]
#[command(
    name = "tagdoc",
    about = "Resolve @tag doc comments into a JSON array of doclets"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory; doclets are written to <dir>/doclets.json.
    /// Without it, JSON goes to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Exit nonzero when any error-severity diagnostic was recorded
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(diags) => {
            report(&diags);
            if cli.strict && diags.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Diagnostics> {
    let config = match cli.config {
        Some(ref path) => Config::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => Config::default(),
    };
    let dict = tagdoc::core_dictionary(&config);
    let mut bus = EventBus::new();
    let mut diags = Diagnostics::new();
    let mut index = DocletIndex::new();

    let sourcefiles: Vec<String> = if cli.files.is_empty() {
        vec!["<stdin>".to_string()]
    } else {
        expand_globs(&cli.files)?
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect()
    };

    let mut event = Event::new(EventData::ParseBegin {
        sourcefiles: sourcefiles.clone(),
    });
    bus.emit(&mut event)?;

    if cli.files.is_empty() {
        // stdin mode
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        for doclet in
            scan::process_source(&input, "<stdin>", &dict, &config, &mut bus, &mut diags)?
        {
            index.push(doclet);
        }
    } else {
        for filename in &sourcefiles {
            let content = fs::read_to_string(filename)
                .with_context(|| format!("failed to read {}", filename))?;
            for doclet in
                scan::process_source(&content, filename, &dict, &config, &mut bus, &mut diags)?
            {
                index.push(doclet);
            }
        }
    }

    let mut event = Event::new(EventData::ParseComplete {
        sourcefiles,
        doclet_count: index.len(),
    });
    bus.emit(&mut event)?;

    // whole-index passes run only after every file has been parsed, so a
    // borrow or ancestor defined in a later file still resolves
    borrow::resolve_borrows(&mut index);
    augment::augment_all(&mut index, &mut diags);

    let mut event = Event::new(EventData::ProcessingComplete {
        doclet_count: index.len(),
    });
    bus.emit(&mut event)?;

    let json = serde_json::to_string_pretty(index.doclets())
        .context("failed to serialize doclets")?;
    write_output(cli.output.as_deref(), &json)?;

    Ok(diags)
}

fn write_output(output_dir: Option<&Path>, json: &str) -> Result<()> {
    match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
            let out_path = dir.join("doclets.json");
            fs::write(&out_path, json)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn report(diags: &Diagnostics) {
    for d in diags.iter() {
        let label = match d.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        match (&d.filename, d.lineno) {
            (Some(file), Some(line)) => eprintln!("{}: {}:{}: {}", label, file, line, d.message),
            _ => eprintln!("{}: {}", label, d.message),
        }
    }
}

/// Expand glob patterns into a sorted, deduplicated list of file paths.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}
