//! Command-line interface for xsd-retrieval

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
use std::io::Read;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xsd_retrieval::limits::Limits;
#[cfg(feature = "cli")]
use xsd_retrieval::locations::Location;
#[cfg(feature = "cli")]
use xsd_retrieval::paths;
#[cfg(feature = "cli")]
use xsd_retrieval::validators::{
    analyze_with_limits, validate_with_limits, AnalysisResult, ValidationResult,
};
#[cfg(feature = "cli")]
use xsd_retrieval::Loader;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsd-retrieval")]
#[command(author, version, about = "Retrieve, validate and inspect XSD schemas", long_about = None)]
struct Cli {
    /// Confine local reads and writes to this directory
    #[arg(long, global = true, value_name = "DIR")]
    sandbox: Option<PathBuf>,

    /// Allow fetching schemas over HTTP(S)
    #[arg(long, global = true)]
    allow_remote: bool,

    /// Resource limits preset: default, strict, permissive
    #[arg(long, global = true, default_value = "default")]
    limits: String,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Retrieve an XSD file from a URL or file path
    Retrieve {
        /// URL or file path of the XSD
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Save the retrieved XSD to this path
        #[arg(short, long, value_name = "PATH")]
        save: Option<String>,

        /// Create missing parent directories of the save path
        #[arg(long)]
        create_dirs: bool,
    },

    /// Check whether a document is structurally an XSD
    Validate {
        /// URL or file path of the XSD, or `-` for stdin
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the elements and types declared in an XSD
    Elements {
        /// URL or file path of the XSD, or `-` for stdin
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Normalize a path through the path safety gate
    #[command(name = "check-path")]
    CheckPath {
        /// Path to check
        #[arg(value_name = "PATH")]
        path: String,

        /// Additional check on the normalized path
        #[arg(short, long, value_enum, default_value_t = PathMode::Any)]
        mode: PathMode,
    },
}

#[cfg(feature = "cli")]
#[derive(ValueEnum, Clone, Copy, Debug)]
enum PathMode {
    /// Normalize and confine only
    Any,
    /// Require an existing regular file
    Read,
    /// Require an existing parent directory
    Write,
}

#[cfg(feature = "cli")]
type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = build_loader(&cli).and_then(|loader| match cli.command {
        Commands::Retrieve {
            source,
            save,
            create_dirs,
        } => cmd_retrieve(loader.with_create_dirs(create_dirs), &source, save.as_deref()),
        Commands::Validate { source, json } => cmd_validate(&loader, &source, json),
        Commands::Elements { source, json } => cmd_elements(&loader, &source, json),
        Commands::CheckPath { path, mode } => cmd_check_path(&loader, &path, mode),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn build_loader(cli: &Cli) -> CliResult<Loader> {
    let limits = Limits::preset(&cli.limits).ok_or_else(|| {
        format!(
            "Unknown limits preset: {}. Use: default, strict, permissive",
            cli.limits
        )
    })?;

    let mut loader = Loader::new()
        .with_limits(limits)
        .with_allow_remote(cli.allow_remote);
    if let Some(root) = &cli.sandbox {
        loader = loader.with_sandbox_root(root);
    }
    Ok(loader)
}

#[cfg(feature = "cli")]
fn read_source(loader: &Loader, source: &str) -> CliResult<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let location: Location = source.parse()?;
    Ok(loader.load(&location)?)
}

#[cfg(feature = "cli")]
fn cmd_retrieve(loader: Loader, source: &str, save: Option<&str>) -> CliResult<()> {
    let retrieved = loader.retrieve(source, save)?;

    println!("Successfully retrieved XSD from: {}", source);
    println!();
    println!("Content length: {} characters", retrieved.content.chars().count());
    if let Some(path) = &retrieved.saved_to {
        println!("Saved to: {}", path.display());
    }
    println!();
    println!("XSD Content:");
    println!("{}", retrieved.content);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_validate(loader: &Loader, source: &str, json: bool) -> CliResult<()> {
    let text = read_source(loader, source)?;
    let result = validate_with_limits(&text, loader.limits())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_validation(&result));
    }

    if !result.is_valid {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_elements(loader: &Loader, source: &str, json: bool) -> CliResult<()> {
    let text = read_source(loader, source)?;
    let result = analyze_with_limits(&text, loader.limits())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_analysis(&result));
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_check_path(loader: &Loader, path: &str, mode: PathMode) -> CliResult<()> {
    let root = loader.sandbox_root();
    let resolved = match mode {
        PathMode::Any => paths::normalize_and_confine(path, root)?,
        PathMode::Read => paths::validate_read_path(path, root)?,
        PathMode::Write => paths::validate_write_path(path, root)?,
    };
    println!("{}", resolved.display());
    Ok(())
}

#[cfg(feature = "cli")]
fn render_validation(result: &ValidationResult) -> String {
    let mut out = String::from("XSD Validation Result:\n\n");
    out.push_str(&format!("Valid XSD: {}\n", result.is_valid));
    out.push_str(&format!("Has XML Declaration: {}\n", result.has_xml_declaration));
    out.push_str(&format!("Has Schema Element: {}\n", result.has_schema_element));
    out.push_str(&format!("Namespaces Found: {}\n", result.namespaces.len()));
    out.push_str(&format!("Elements Defined: {}\n", result.element_names.len()));

    out.push_str("\nNamespaces:\n");
    for ns in &result.namespaces {
        out.push_str(&format!("  - {}\n", ns));
    }

    out.push_str("\nElements:\n");
    for name in &result.element_names {
        out.push_str(&format!("  - {}\n", name));
    }
    out
}

#[cfg(feature = "cli")]
fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = String::from("XSD Analysis Results:\n\n");

    out.push_str(&format!("Elements ({}):\n", result.elements.len()));
    for decl in &result.elements {
        out.push_str(&format!("  - {}\n", decl));
    }

    out.push_str(&format!("\nComplex Types ({}):\n", result.complex_type_names.len()));
    for name in &result.complex_type_names {
        out.push_str(&format!("  - {}\n", name));
    }

    out.push_str(&format!("\nSimple Types ({}):\n", result.simple_type_names.len()));
    for name in &result.simple_type_names {
        out.push_str(&format!("  - {}\n", name));
    }
    out
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
