use anyhow::{bail, Context, Result};
use gacha_core::{ActiveFilter, DrawError, EventBus, GachaSession, RngState};
use gacha_data::{
    audit_scholars, import_csv_file, load_gacha_config, load_scholars, load_scholars_or_empty,
    save_scholars,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_PATH: &str = "assets/scholars.json";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Pull,
    Audit,
    Tags,
    Import(Vec<PathBuf>),
    Help,
}

#[derive(Debug, Clone)]
struct CliOptions {
    command: Command,
    data_path: PathBuf,
    seed: Option<u64>,
    count: usize,
    filter: ActiveFilter,
    json: bool,
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_options(&args)?;
    match &options.command {
        Command::Pull => run_pull(&options),
        Command::Audit => run_audit(&options),
        Command::Tags => run_tags(&options),
        Command::Import(files) => run_import(&options, files),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

fn parse_options(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions {
        command: Command::Help,
        data_path: std::env::var_os("GACHA_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
        seed: None,
        count: 1,
        filter: ActiveFilter::All,
        json: false,
        out: None,
    };
    let mut positional = Vec::new();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "--data" | "--seed" | "--count" | "-n" | "--filter" | "-f" | "--out" | "-o" => {
                let Some(value) = args.get(idx + 1) else {
                    bail!("missing value for {flag}");
                };
                match flag {
                    "--data" => options.data_path = PathBuf::from(value),
                    "--seed" => {
                        options.seed = Some(value.parse().with_context(|| format!("seed {value}"))?)
                    }
                    "--count" | "-n" => {
                        options.count = value.parse().with_context(|| format!("count {value}"))?
                    }
                    "--filter" | "-f" => options.filter = ActiveFilter::parse(value),
                    _ => options.out = Some(PathBuf::from(value)),
                }
                idx += 1;
            }
            "--json" => options.json = true,
            "--help" | "-h" => {
                options.command = Command::Help;
                return Ok(options);
            }
            _ => positional.push(args[idx].clone()),
        }
        idx += 1;
    }
    let mut positional = positional.into_iter();
    options.command = match positional.next().as_deref() {
        None | Some("help") => Command::Help,
        Some("pull") => Command::Pull,
        Some("audit") => Command::Audit,
        Some("tags") => Command::Tags,
        Some("import") => {
            let files: Vec<PathBuf> = positional.map(PathBuf::from).collect();
            if files.is_empty() {
                bail!("import needs at least one csv file");
            }
            Command::Import(files)
        }
        Some(other) => bail!("unknown command {other}"),
    };
    Ok(options)
}

fn run_pull(options: &CliOptions) -> Result<()> {
    let assets_dir = options.data_path.parent().unwrap_or_else(|| Path::new("."));
    let config = load_gacha_config(assets_dir)?;
    let dataset = load_scholars_or_empty(&options.data_path);
    let rng = match options.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    tracing::info!(seed = rng.seed(), "pull session");
    let mut session = GachaSession::new(dataset, config, rng);
    let mut events = EventBus::default();
    session.set_filter(options.filter.clone(), &mut events);
    let mut cards = Vec::new();
    for _ in 0..options.count {
        match session.pull(&mut events) {
            Ok(pull) => {
                if !options.json {
                    let marker = if pull.history_reset { " (reset)" } else { "" };
                    println!(
                        "[{:>3}] {} / {} - {}{marker}",
                        pull.record.rarity.code(),
                        pull.card.name_ja,
                        pull.card.name_en,
                        pull.card.affiliation
                    );
                }
                cards.push(pull.card);
            }
            Err(DrawError::NoMatchingCategory(tag)) => {
                eprintln!("no scholars in category {tag}");
                break;
            }
            Err(DrawError::EmptyDataset) => break,
        }
    }
    if options.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    }
    Ok(())
}

fn run_audit(options: &CliOptions) -> Result<()> {
    let records = load_scholars(&options.data_path)?;
    let findings = audit_scholars(&records);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&findings)?);
        return Ok(());
    }
    println!("incomplete scholars: {}", findings.len());
    for (idx, finding) in findings.iter().enumerate() {
        println!("{}. {}", idx + 1, finding.describe());
    }
    Ok(())
}

fn run_tags(options: &CliOptions) -> Result<()> {
    let records = load_scholars(&options.data_path)?;
    let session = GachaSession::new(records, Default::default(), RngState::from_seed(0));
    for tag in session.tags() {
        let count = session
            .dataset()
            .iter()
            .filter(|record| record.has_tag(tag))
            .count();
        println!("{tag}\t{count}");
    }
    Ok(())
}

/// Appends imported rows to the dataset, writing to `--out` or stdout.
fn run_import(options: &CliOptions, files: &[PathBuf]) -> Result<()> {
    let mut records = if options.data_path.exists() {
        load_scholars(&options.data_path)?
    } else {
        Vec::new()
    };
    let mut existing: HashSet<String> = records.iter().map(|record| record.id.clone()).collect();
    let today = chrono::Local::now().date_naive();
    let mut added = Vec::new();
    for file in files {
        added.extend(import_csv_file(file, &mut existing, today)?);
    }
    for record in &added {
        eprintln!("+ {}: {} ({})", record.id, record.name.ja, record.rarity);
    }
    records.extend(added);
    match options.out.as_ref() {
        Some(path) => save_scholars(path, &records)?,
        None => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

fn print_help() {
    println!("usage: gacha-cli <command> [options]");
    println!("  pull    [--count N] [--filter TAG] [--seed N] [--json]");
    println!("  audit   [--json]   list scholars missing contribution or trivia");
    println!("  tags               list categories with scholar counts");
    println!("  import  <csv>... [--out PATH]   add spreadsheet rows to the dataset");
    println!("common: --data PATH (default {DEFAULT_DATA_PATH}, env GACHA_DATA)");
}
