//! `refchk` - CLI for refcheck
//!
//! This binary provides the command-line interface for checking documentation
//! trees and querying the persistent index.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;

use refcheck::cli::{
    CheckCommand, Cli, Command, ConfigCommand, IndexCommand, OutputFormat, RefsCommand,
    SymbolsCommand,
};
use refcheck::{
    init_logging, Config, CorpusWalker, Index, Reference, Resolver, ScannedDocument, Scanner,
    ScannerConfig, Symbol, SymbolKind,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Check(check_cmd) => handle_check(&config, &check_cmd),
        Command::Symbols(symbols_cmd) => handle_symbols(&config, &symbols_cmd),
        Command::Refs(refs_cmd) => handle_refs(&config, &refs_cmd),
        Command::Index(index_cmd) => handle_index(&config, index_cmd),
        Command::Stats(stats_cmd) => handle_stats(&config, stats_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

/// Walk the corpus rooted at `path` and scan every document.
fn scan_corpus(config: &Config, path: Option<&PathBuf>) -> anyhow::Result<Vec<ScannedDocument>> {
    let root = path.cloned().unwrap_or_else(|| PathBuf::from("."));
    let documents = CorpusWalker::new(&config.scan).load(root)?;

    let scanner = Scanner::with_config(ScannerConfig::from_roles(&config.roles));
    Ok(documents
        .into_iter()
        .map(|document| {
            let outcome = scanner.scan(&document);
            ScannedDocument { document, outcome }
        })
        .collect())
}

fn handle_check(config: &Config, cmd: &CheckCommand) -> anyhow::Result<()> {
    let scanned = scan_corpus(config, cmd.path.as_ref())?;
    let resolver = Resolver::new(config.report.code_languages.clone());
    let resolution = resolver.resolve(&scanned);

    match cmd.format {
        OutputFormat::Plain => {
            print!("{}", refcheck::report::render_plain(&resolution.diagnostics));
        }
        OutputFormat::Table => {
            if !resolution.diagnostics.is_empty() {
                print!("{}", refcheck::report::render_table(&resolution.diagnostics));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
    }

    if cmd.update_index {
        let mut index = Index::open(config.database_path())?;
        for sd in &scanned {
            index.upsert(&sd.document, &sd.outcome)?;
        }
    }

    let fail_on_warnings = cmd.strict || config.report.fail_on_warnings;
    if cmd.format != OutputFormat::Json {
        println!(
            "{} documents, {} symbols, {} references: {} errors, {} warnings",
            resolution.documents,
            resolution.symbols,
            resolution.references,
            resolution.errors(),
            resolution.warnings()
        );
    }

    if !resolution.passed(fail_on_warnings) {
        std::process::exit(1);
    }
    Ok(())
}

fn handle_symbols(config: &Config, cmd: &SymbolsCommand) -> anyhow::Result<()> {
    let kind = cmd.kind.map(SymbolKind::from);

    let symbols: Vec<Symbol> = if cmd.path.is_some() {
        let scanned = scan_corpus(config, cmd.path.as_ref())?;
        let table = Resolver::build_symbol_table(&scanned);
        let mut collected: Vec<Symbol> = table
            .iter()
            .filter(|(k, _, _)| kind.map_or(true, |want| *k == want))
            .flat_map(|(k, name, locations)| {
                locations.iter().map(move |location| Symbol {
                    kind: k,
                    name: name.to_string(),
                    location: location.clone(),
                })
            })
            .collect();
        collected.sort_by(|a, b| (&a.name, &a.location.path).cmp(&(&b.name, &b.location.path)));
        collected.truncate(cmd.limit);
        collected
    } else {
        Index::open(config.database_path())?.symbols(kind, cmd.limit)?
    };

    match cmd.format {
        OutputFormat::Plain => {
            for symbol in &symbols {
                println!("{} {} {}", symbol.kind, symbol.name, symbol.location);
            }
        }
        OutputFormat::Table => print_symbol_table(&symbols),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&symbols)?),
    }
    Ok(())
}

fn handle_refs(config: &Config, cmd: &RefsCommand) -> anyhow::Result<()> {
    let index = Index::open(config.database_path())?;
    let references = index.find_references(&cmd.target, cmd.limit)?;

    match cmd.format {
        OutputFormat::Plain => {
            for reference in &references {
                println!(
                    "{} {} {}",
                    reference.kind, reference.target, reference.location
                );
            }
        }
        OutputFormat::Table => print_reference_table(&references),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&references)?),
    }
    Ok(())
}

fn handle_index(config: &Config, cmd: IndexCommand) -> anyhow::Result<()> {
    match cmd {
        IndexCommand::Update { path, prune } => {
            let scanned = scan_corpus(config, path.as_ref())?;
            let mut index = Index::open(config.database_path())?;

            let mut inserted = 0;
            let mut updated = 0;
            let mut unchanged = 0;
            for sd in &scanned {
                match index.upsert(&sd.document, &sd.outcome)? {
                    refcheck::index::UpsertOutcome::Inserted => inserted += 1,
                    refcheck::index::UpsertOutcome::Updated => updated += 1,
                    refcheck::index::UpsertOutcome::Unchanged => unchanged += 1,
                }
            }

            let pruned = if prune {
                let keep: HashSet<String> =
                    scanned.iter().map(|sd| sd.document.path.clone()).collect();
                index.prune_missing(&keep)?
            } else {
                0
            };

            println!(
                "{inserted} inserted, {updated} updated, {unchanged} unchanged, {pruned} pruned"
            );
        }
        IndexCommand::Status { json } => {
            let index = Index::open(config.database_path())?;
            let stats = index.stats()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats, &config.database_path());
            }
        }
        IndexCommand::Clear { yes } => {
            if yes {
                let index = Index::open(config.database_path())?;
                index.clear()?;
                println!("Index cleared.");
            } else {
                println!("This will remove all indexed documents.");
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn handle_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    let index = Index::open(config.database_path())?;
    let stats = index.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats, &config.database_path());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Scan]");
                println!("  Extensions:      {}", config.scan.extensions.join(", "));
                println!("  Excluded dirs:   {}", config.scan.excluded_dirs.join(", "));
                println!("  Max file size:   {} bytes", config.scan.max_file_size);
                println!();
                println!("[Roles]");
                println!("  Anchor roles:    {}", config.roles.anchor_roles.join(", "));
                println!("  Term roles:      {}", config.roles.term_roles.join(", "));
                println!("  Doc roles:       {}", config.roles.doc_roles.join(", "));
                println!("  Ignored roles:   {}", config.roles.ignored_roles.len());
                println!();
                println!("[Report]");
                println!("  Fail on warnings: {}", config.report.fail_on_warnings);
                println!(
                    "  Code languages:   {}",
                    config.report.code_languages.len()
                );
                println!();
                println!("[Index]");
                println!("  Database path:   {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}

fn print_symbol_table(symbols: &[Symbol]) {
    let name_width = symbols
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(4)
        .max("NAME".len());

    println!("{:<6}  {:<name_width$}  LOCATION", "KIND", "NAME");
    for symbol in symbols {
        println!(
            "{:<6}  {:<name_width$}  {}",
            symbol.kind.to_string(),
            symbol.name,
            symbol.location
        );
    }
}

fn print_reference_table(references: &[Reference]) {
    let target_width = references
        .iter()
        .map(|r| r.target.len())
        .max()
        .unwrap_or(6)
        .max("TARGET".len());

    println!("{:<6}  {:<target_width$}  LOCATION", "KIND", "TARGET");
    for reference in references {
        println!(
            "{:<6}  {:<target_width$}  {}",
            reference.kind.to_string(),
            reference.target,
            reference.location
        );
    }
}

fn print_stats(stats: &refcheck::IndexStats, db_path: &std::path::Path) {
    println!("refchk index");
    println!("------------");
    println!("Database:    {}", db_path.display());
    println!("Documents:   {}", stats.documents);
    println!("Symbols:     {}", stats.symbols);
    println!("References:  {}", stats.references);
    match &stats.last_scanned {
        Some(ts) => println!("Last scan:   {}", ts.to_rfc3339()),
        None => println!("Last scan:   never"),
    }
    println!("Size:        {} bytes", stats.db_size_bytes);
}
