//! Reads a command file, one line per command in the fixed one-letter grammar, and drives a
//! `FileSystem` with it. Argument parsing is done by hand, matching `mkfs`/`fdisk`'s own
//! `parse_args` rather than reaching for a parsing crate.

use std::env;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use blockfs::{EntryKind, FileSystem, Outcome};

struct Args {
    command_file: PathBuf,
}

impl Args {
    fn parse() -> Option<Self> {
        let mut args = env::args_os();
        let _argv0 = args.next();
        let command_file = args.next()?;
        if args.next().is_some() {
            return None;
        }
        Some(Args {
            command_file: PathBuf::from(command_file),
        })
    }
}

fn main() -> ExitCode {
    let args = match Args::parse() {
        Some(a) => a,
        None => {
            let argv0 = env::args().next().unwrap_or_else(|| "blockfs".to_string());
            eprintln!("Usage: {argv0} <input_file>");
            return ExitCode::FAILURE;
        }
    };

    let file = match File::open(&args.command_file) {
        Ok(f) => f,
        Err(_) => {
            eprintln!("Error: Cannot find disk {}", args.command_file.display());
            return ExitCode::FAILURE;
        }
    };

    let mut fs = FileSystem::new();
    let reader = io::BufReader::new(file);
    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        run_line(&mut fs, &line, &args.command_file, line_num);
    }

    ExitCode::SUCCESS
}

/// Parses and dispatches one line of the command grammar. Any grammar violation is reported as
/// a command error identifying the file and line; the driver always continues to the next line.
fn run_line(fs: &mut FileSystem, line: &str, path: &PathBuf, line_num: usize) {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        return;
    }

    let mut parts = trimmed.splitn(2, ' ');
    let letter = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default();

    let result = match letter {
        "M" => dispatch_mount(fs, rest),
        "C" => dispatch_name_and_num(rest, |name, size| fs.create(name, size)),
        "D" => dispatch_name(rest, |name| fs.delete(name)),
        "R" => dispatch_name_and_num(rest, |name, block| fs.read(name, block)),
        "W" => dispatch_name_and_num(rest, |name, block| fs.write(name, block)),
        "B" => Some(fs.buff(rest.as_bytes())),
        "L" => Some(fs.ls().map(Outcome::Listing)),
        "E" => dispatch_name_and_num(rest, |name, size| fs.resize(name, size)),
        "O" => Some(fs.defrag()),
        "Y" => dispatch_name(rest, |name| fs.cd(name)),
        _ => None,
    };

    match result {
        Some(Ok(outcome)) => render(&outcome),
        Some(Err(e)) => eprintln!("{e}"),
        None => eprintln!("Command Error: {}, {line_num}", path.display()),
    }
}

fn dispatch_mount(fs: &mut FileSystem, rest: &str) -> Option<blockfs::Result<Outcome>> {
    let path = rest.trim();
    if path.is_empty() {
        return None;
    }
    Some(fs.mount(path))
}

fn dispatch_name(
    rest: &str,
    op: impl FnOnce([u8; 5]) -> blockfs::Result<Outcome>,
) -> Option<blockfs::Result<Outcome>> {
    let name = parse_name(rest.trim())?;
    Some(op(name))
}

fn dispatch_name_and_num(
    rest: &str,
    op: impl FnOnce([u8; 5], i64) -> blockfs::Result<Outcome>,
) -> Option<blockfs::Result<Outcome>> {
    let mut parts = rest.trim().splitn(2, ' ');
    let name = parse_name(parts.next()?)?;
    let num: i64 = parts.next()?.trim().parse().ok()?;
    Some(op(name, num))
}

/// Names longer than 5 bytes don't fit the grammar; shorter ones are zero-padded.
fn parse_name(raw: &str) -> Option<[u8; 5]> {
    let bytes = raw.as_bytes();
    if bytes.is_empty() || bytes.len() > 5 {
        return None;
    }
    let mut name = [0u8; 5];
    name[..bytes.len()].copy_from_slice(bytes);
    Some(name)
}

fn render(outcome: &Outcome) {
    match outcome {
        Outcome::Mounted { path } => println!("Mounted {}", path.display()),
        Outcome::Created { .. } => {}
        Outcome::Deleted { .. } => {}
        Outcome::BlockRead { .. } => {}
        Outcome::BlockWritten { .. } => {}
        Outcome::BufferLoaded => {}
        Outcome::Resized { .. } => {}
        Outcome::ResizeNoop { .. } => {}
        Outcome::Defragged => {}
        Outcome::ChangedDir { .. } => {}
        Outcome::Listing(entries) => {
            for entry in entries {
                let name = String::from_utf8_lossy(&entry.name)
                    .trim_end_matches('\0')
                    .to_string();
                match entry.kind {
                    EntryKind::Dir(count) => println!("{name:<5} {count:>3}"),
                    EntryKind::File(size) => println!("{name:<5} {size:>3} KB"),
                }
            }
        }
    }
}
