//! Quotaload CLI - Transform quota request exports to canonical records
//!
//! # Main Commands
//!
//! ```bash
//! quotaload serve                    # Start HTTP server (port 3000)
//! quotaload transform export.tsv     # Transform an export to canonical JSON
//! quotaload export export.tsv        # Re-serialize as delimited text
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! quotaload detect export.tsv        # Show encoding, separator and header
//! quotaload validate records.json    # Validate JSON against the record schema
//! quotaload vocabulary               # Show request type and status tables
//! ```

use clap::{Parser, Subcommand};
use quotaload::config::DEFAULT_PORT;
use quotaload::parser::{content_lines, format_separator, parse_table, read_file_auto};
use quotaload::transform::columns::{detect_shape, HeaderMap};
use quotaload::transform::vocabulary::{DISPLAY_LABELS, REQUEST_TYPE_RENAMES, STATUS_MAPPINGS};
use quotaload::{
    locate_header, to_delimited, transform_file, validate_canonical_records, with_rd_quota_column,
    ExportOptions, HeaderDetection, RegionCleaning, TransformOptions,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quotaload")]
#[command(about = "Transform quota request exports to canonical records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: export file → canonical JSON records
    Transform {
        /// Input export file (TSV, CSV or semicolon separated)
        input: PathBuf,

        /// Output file for records (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write records grouped by request type
        #[arg(short, long)]
        groups: Option<PathBuf>,

        /// Header detection: primary, row-scan or first-row
        #[arg(long)]
        header_detection: Option<HeaderDetection>,

        /// Region cleaning: trim or strip-code
        #[arg(long)]
        region_cleaning: Option<RegionCleaning>,

        /// Skip validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Show what the parser detects without transforming
    Detect {
        /// Input export file
        input: PathBuf,
    },

    /// Transform and re-serialize as delimited text (with RDQuota column)
    Export {
        /// Input export file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output delimiter (default: tab)
        #[arg(short, long, default_value = "\t")]
        delimiter: char,

        /// Append the Original ID column
        #[arg(long)]
        original_id: bool,
    },

    /// Validate JSON records against the canonical record schema
    Validate {
        /// Input JSON file (array of records)
        input: PathBuf,
    },

    /// Show request type and status vocabularies
    Vocabulary,

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Transform {
            input,
            output,
            groups,
            header_detection,
            region_cleaning,
            no_validate,
        } => {
            let mut options = TransformOptions::from_env();
            if let Some(detection) = header_detection {
                options.header_detection = detection;
            }
            if let Some(cleaning) = region_cleaning {
                options.region_cleaning = cleaning;
            }
            if no_validate {
                options.validate = false;
            }
            cmd_transform(&input, &options, output.as_deref(), groups.as_deref())
        }

        Commands::Detect { input } => cmd_detect(&input),

        Commands::Export {
            input,
            output,
            delimiter,
            original_id,
        } => cmd_export(&input, delimiter, original_id, output.as_deref()),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Vocabulary => cmd_vocabulary(),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_transform(
    input: &Path,
    options: &TransformOptions,
    output: Option<&Path>,
    groups_output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let result = transform_file(input, options)?;
    let records = &result.output.records;

    eprintln!("\n⚙️  Transformed: {} records", records.len());

    if options.validate && result.invalid_count > 0 {
        for (i, errors) in result.validation_errors.iter().take(5) {
            eprintln!("\n   Record {}:", i);
            for err in errors.iter().take(3) {
                eprintln!("     - {}", err);
            }
        }
    }

    let json = serde_json::to_string_pretty(records)?;
    write_output(&json, output)?;

    if let Some(path) = groups_output {
        eprintln!("\n📦 Grouped: {} categories", result.output.groups.len());
        let groups_json = serde_json::to_string_pretty(&result.output.groups)?;
        fs::write(path, &groups_json)?;
        eprintln!("   💾 Saved to: {}", path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_detect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔎 Inspecting: {}", input.display());

    let (text, encoding) = read_file_auto(input)?;
    let lines = content_lines(&text);
    let table = parse_table(&text);

    println!("Encoding:  {}", encoding);
    println!("Lines:     {}", lines.len());
    println!("Separator: '{}'", format_separator(table.separator));

    let header = locate_header(&table.rows, TransformOptions::from_env().header_detection)?;
    let shape = detect_shape(&HeaderMap::new(&header.cells));

    println!("Header:    row {} ({:?})", header.index, header.strategy);
    println!("Columns:   {}", header.cells.join(", "));
    println!("Shape:     {}", shape);
    println!("Data rows: {}", table.rows.len() - header.index - 1);

    Ok(())
}

fn cmd_export(
    input: &Path,
    delimiter: char,
    include_original_id: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !delimiter.is_ascii() {
        return Err(format!("Delimiter must be a single ASCII character, got '{}'", delimiter).into());
    }

    let mut options = TransformOptions::from_env();
    options.validate = false;

    let result = transform_file(input, &options)?;
    let records = with_rd_quota_column(&result.output.records);

    let text = to_delimited(
        &records,
        &ExportOptions {
            delimiter: delimiter as u8,
            include_original_id,
        },
    )?;
    write_output(&text, output)?;

    eprintln!("✅ Exported {} records", records.len());
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let records: Vec<Value> = serde_json::from_str(&content)?;

    validate_canonical_records(&records)?;
    eprintln!("\n📊 All {} records valid", records.len());

    Ok(())
}

fn cmd_vocabulary() -> Result<(), Box<dyn std::error::Error>> {
    println!("Request types (raw → label, code):");
    for (raw, label, code) in REQUEST_TYPE_RENAMES.iter() {
        println!("  {:<32} → {:<24} {}", raw, label, code);
    }

    println!("\nDisplay labels (code: EN / PT-BR):");
    for (code, en, pt) in DISPLAY_LABELS.iter() {
        println!("  {:<24} {} / {}", code, en, pt);
    }

    println!("\nStatuses (raw → display):");
    for (raw, display) in STATUS_MAPPINGS.iter() {
        println!("  {:<32} → {}", raw, display);
    }

    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    quotaload::server::start_server(port).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("   💾 Saved to: {}", p.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_command_returns_schema_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"Subscription ID": "sub", "Zone": ""}]"#).unwrap();

        let err = cmd_validate(file.path()).unwrap_err();
        assert!(err.to_string().contains("record 0"));
    }

    #[test]
    fn test_validate_command_accepts_transformed_records() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        input
            .write_all(b"ID\tSubscription ID\tRegion\tUTC Ticket\n1\tsub\tEast US\tQuota Increase\n")
            .unwrap();
        let result = transform_file(input.path(), &TransformOptions::default()).unwrap();

        let mut records = tempfile::NamedTempFile::new().unwrap();
        records
            .write_all(serde_json::to_string(&result.output.records).unwrap().as_bytes())
            .unwrap();

        assert!(cmd_validate(records.path()).is_ok());
    }
}
