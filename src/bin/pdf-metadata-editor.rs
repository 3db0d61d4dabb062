//! PDF Metadata Editor CLI tool
//!
//! A command-line front end for viewing, editing and clearing PDF metadata.

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::Level;

use pdf_metadata_editor::date::{display_pdf_date, now_pdf_date};
use pdf_metadata_editor::session::path_from_uri_list;
use pdf_metadata_editor::{MetadataKey, Session};

/// PDF Metadata Editor - View and edit PDF document information
#[derive(Parser)]
#[command(name = "pdf-metadata-editor")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Show the metadata of a PDF
    pdf-metadata-editor show report.pdf

    # Change the title and remove the keywords
    pdf-metadata-editor set report.pdf --title \"Final Report\" --keywords \"\"

    # Set any field by name and stamp the modification date
    pdf-metadata-editor set report.pdf --field creation-date=D:20240101120000Z --touch

    # Remove all eight fields
    pdf-metadata-editor clear report.pdf --yes")]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the metadata fields of a PDF
    Show {
        /// PDF file path or file:// URI
        input: String,

        /// Print date fields exactly as stored
        #[arg(long)]
        raw: bool,
    },

    /// Edit metadata fields and save the PDF in place (an empty value removes the field)
    Set {
        /// PDF file path or file:// URI
        input: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        keywords: Option<String>,

        #[arg(long)]
        creator: Option<String>,

        #[arg(long)]
        producer: Option<String>,

        /// PDF date, e.g. "D:20240101120000+00'00'"
        #[arg(long)]
        creation_date: Option<String>,

        /// PDF date, e.g. "D:20240101120000+00'00'"
        #[arg(long)]
        mod_date: Option<String>,

        /// Set a field by name (repeatable)
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        /// Set ModDate to the current time
        #[arg(long)]
        touch: bool,
    },

    /// Remove all eight metadata fields and save the PDF in place
    Clear {
        /// PDF file path or file:// URI
        input: String,

        /// Confirm clearing; this cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Show { input, raw } => cmd_show(&input, raw),
        Commands::Set {
            input, title, author, subject, keywords, creator, producer,
            creation_date, mod_date, fields, touch,
        } => {
            let named = [
                (MetadataKey::Title, title),
                (MetadataKey::Author, author),
                (MetadataKey::Subject, subject),
                (MetadataKey::Keywords, keywords),
                (MetadataKey::Creator, creator),
                (MetadataKey::Producer, producer),
                (MetadataKey::CreationDate, creation_date),
                (MetadataKey::ModDate, mod_date),
            ];
            cmd_set(&input, named, fields, touch)
        }
        Commands::Clear { input, yes } => cmd_clear(&input, yes),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Accept either a plain path or a file:// URI (as produced by drag and drop)
fn resolve_input(input: &str) -> anyhow::Result<PathBuf> {
    if input.starts_with("file://") {
        return path_from_uri_list(input)
            .with_context(|| format!("Could not decode file URI: {}", input));
    }
    Ok(PathBuf::from(input))
}

/// Open `input` in a fresh session, reporting the session's status on failure
fn open_session(input: &str) -> anyhow::Result<Session> {
    let path = resolve_input(input)?;
    let mut session = Session::new();
    if let Err(e) = session.open(&path) {
        return Err(anyhow::Error::new(e).context(session.status().to_string()));
    }
    Ok(session)
}

fn save_session(session: &mut Session) -> anyhow::Result<()> {
    if let Err(e) = session.save() {
        return Err(anyhow::Error::new(e).context(session.status().to_string()));
    }
    eprintln!("{}", session.status());
    Ok(())
}

/// Show the metadata of a PDF
fn cmd_show(input: &str, raw: bool) -> anyhow::Result<()> {
    let session = open_session(input)?;

    if let Some(path) = session.current_path() {
        println!("File: {}", path.display());
    }

    for (key, value) in session.fields().iter() {
        let shown = if key.is_date() && !raw {
            display_pdf_date(value)
        } else {
            value.to_string()
        };
        println!("{:<19}{}", format!("{}:", key.label()), shown);
    }

    Ok(())
}

/// Apply field edits and save
fn cmd_set(
    input: &str,
    named: [(MetadataKey, Option<String>); 8],
    fields: Vec<String>,
    touch: bool,
) -> anyhow::Result<()> {
    let mut edits: Vec<(MetadataKey, String)> = named
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();

    for assignment in &fields {
        let Some((name, value)) = assignment.split_once('=') else {
            bail!("Expected KEY=VALUE, got: {}", assignment);
        };
        let key: MetadataKey = name.parse()?;
        edits.push((key, value.to_string()));
    }

    if touch {
        edits.push((MetadataKey::ModDate, now_pdf_date()));
    }

    if edits.is_empty() {
        bail!("Nothing to set; pass at least one field option, --field or --touch");
    }

    let mut session = open_session(input)?;
    for (key, value) in edits {
        tracing::debug!(field = %key, value = %value, "setting field");
        session.set_field(key, value);
    }

    save_session(&mut session)
}

/// Clear all metadata fields and save
fn cmd_clear(input: &str, yes: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("Refusing to clear all metadata of {} without --yes", input);
    }

    let mut session = open_session(input)?;
    session.clear_fields();
    eprintln!("{}", session.status());

    save_session(&mut session)
}
