mod caption;
mod detect;
mod error;
mod readers;
mod serialiser;
mod timestamp;

use crate::detect::Format;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[command(about = "Convert RTF, TXT, VTT, XML and SBV caption files to SRT")]
struct Cli {
    #[arg(help = "The caption file to convert, or a directory of caption files.")]
    input: PathBuf,
    #[arg(
        help = "The file to write to. Defaults to the input path with its extension \
                replaced by .srt. When converting a directory, the directory to \
                write converted files into."
    )]
    output: Option<PathBuf>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.input.is_dir() {
        convert_directory(&cli.input, cli.output.as_deref())
    } else {
        let output = match cli.output {
            Some(output) => output,
            None => cli.input.with_extension("srt"),
        };
        convert_file(&cli.input, &output).map(|_| ())
    }
}

/// Converts a single file, returning the number of captions written.
fn convert_file(input: &Path, output: &Path) -> Result<usize> {
    if input == output {
        return Err(anyhow!(
            "Input and output both point to '{}'.",
            input.display()
        ));
    }

    let format = Format::from_path(input)?;
    let data = read_caption_file(input)?;
    let captions = format
        .parse(&data)
        .context(format!("Failed to parse input file: '{}'", input.display()))?;
    if captions.is_empty() {
        eprintln!(
            "Warning: no captions found in '{}', writing an empty file",
            input.display()
        );
    }
    let count = captions.len();

    let file = std::fs::File::create(output).context(format!(
        "Failed to create output file: '{}'",
        output.display()
    ))?;
    serialiser::serialise(captions, file).context(format!(
        "Failed to write output file: '{}'",
        output.display()
    ))?;
    Ok(count)
}

/// Converts every supported caption file in the directory, writing each
/// result next to its source, or into `output_dir` when given. A file
/// that fails to convert is reported and skipped.
fn convert_directory(input_dir: &Path, output_dir: Option<&Path>) -> Result<()> {
    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir).context(format!(
            "Failed to create output directory: '{}'",
            dir.display()
        ))?;
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .context(format!("Failed to read directory: '{}'", input_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();

    let mut converted = 0;
    let mut failed = 0;
    for path in paths {
        if !path.is_file() || is_hidden(&path) || Format::from_path(&path).is_err() {
            continue;
        }
        let name = match path.file_name() {
            Some(name) => Path::new(name).with_extension("srt"),
            None => continue,
        };
        let output = match output_dir {
            Some(dir) => dir.join(&name),
            None => path.with_extension("srt"),
        };
        if output == path {
            continue;
        }

        match convert_file(&path, &output) {
            Ok(count) => {
                println!(
                    "Converted '{}' -> '{}' ({} captions)",
                    path.display(),
                    output.display(),
                    count
                );
                converted += 1;
            }
            Err(err) => {
                eprintln!("Failed to convert '{}': {:#}", path.display(), err);
                failed += 1;
            }
        }
    }

    println!("Converted {} file(s), {} failed", converted, failed);
    if converted == 0 && failed > 0 {
        return Err(anyhow!(
            "None of the files in '{}' could be converted.",
            input_dir.display()
        ));
    }
    Ok(())
}

/// Reads the input as UTF-8, dropping a leading BOM and normalising
/// line endings.
fn read_caption_file(path: &Path) -> Result<String> {
    let data = std::fs::read_to_string(path)
        .context(format!("Failed to open input file: '{}'", path.display()))?;
    Ok(data
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n"))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with('.'))
}
