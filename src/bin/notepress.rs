//! Export a note to PDF
//!
//! Reads a note stored as JSON (`title`, `content`, `createdAt`, optional
//! `updatedAt`) and writes the themed PDF next to it or into `--output-dir`.
//!
//! Usage:
//!   notepress note.json
//!   notepress note.json --theme classic --plain --output-dir out/
//!   RUST_LOG=debug notepress note.json --compress --no-page-numbers

use notepress::{DocumentComposer, ExportConfig, Note, ThemeId};
use std::path::PathBuf;
use std::process::ExitCode;

struct CliArgs {
    input: PathBuf,
    theme: ThemeId,
    use_markdown: bool,
    compress: bool,
    page_numbers: bool,
    output_dir: Option<PathBuf>,
}

impl CliArgs {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut theme = ThemeId::default();
        let mut use_markdown = true;
        let mut compress = false;
        let mut page_numbers = true;
        let mut output_dir = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--theme" => {
                    i += 1;
                    let id = args.get(i).ok_or("--theme needs a value")?;
                    theme = ThemeId::parse(id);
                },
                "--output-dir" => {
                    i += 1;
                    let dir = args.get(i).ok_or("--output-dir needs a value")?;
                    output_dir = Some(PathBuf::from(dir));
                },
                "--plain" => use_markdown = false,
                "--compress" => compress = true,
                "--no-page-numbers" => page_numbers = false,
                "--help" | "-h" => return Err(String::new()),
                other if other.starts_with("--") => {
                    return Err(format!("unknown option {}", other));
                },
                other => input = Some(PathBuf::from(other)),
            }
            i += 1;
        }

        Ok(Self {
            input: input.ok_or("missing note file")?,
            theme,
            use_markdown,
            compress,
            page_numbers,
            output_dir,
        })
    }
}

fn print_usage() {
    eprintln!(
        "Usage: notepress <note.json> [--theme classic|modern|colorful|minimal] [--plain] \
         [--compress] [--output-dir <dir>] [--no-page-numbers]"
    );
}

fn run(args: CliArgs) -> notepress::Result<PathBuf> {
    let json = std::fs::read_to_string(&args.input)?;
    let note: Note = serde_json::from_str(&json)?;

    let config = ExportConfig::new()
        .with_compress(args.compress)
        .with_page_numbers(args.page_numbers);
    let doc = DocumentComposer::with_config(config).export_note(&note, args.theme, args.use_markdown)?;

    let dir = match args.output_dir {
        Some(dir) => dir,
        None => args
            .input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&dir)?;
    doc.save(&dir)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match CliArgs::from_args() {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("Error: {}", message);
            }
            print_usage();
            return ExitCode::from(2);
        },
    };

    match run(args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
