//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! msgfmt - compile message catalog to binary format
//!
//! The msgfmt utility compiles portable message object (.po) files
//! into machine object (.mo) files for use by gettext functions.
//! With `--po` it writes the parsed catalog back as normalized .po text.

use clap::Parser;
use plib::io::{read_chunks, write_output};
use pomo::catalog_lib::table::Section;
use pomo::charset_lib::{supported_charsets, DEFAULT_CHARSET};
use pomo::{
    Endianness, MoCompileOptions, MoCompiler, PoCompileOptions, PoCompiler, PoError,
    PoParseOptions, PoStreamParser, SortMode, TranslationTable,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::exit;

/// msgfmt - compile message catalog to binary format
#[derive(Parser)]
#[command(version, about = "msgfmt - compile message catalog to binary format")]
struct Args {
    #[arg(
        short = 'c',
        long = "strict",
        help = "Reject duplicate messages and wrong plural form counts"
    )]
    check: bool,

    #[arg(short = 'f', long = "use-fuzzy", help = "Include fuzzy entries in the output")]
    include_fuzzy: bool,

    #[arg(short = 'v', long, help = "Print statistics for each catalog")]
    verbose: bool,

    #[arg(
        long = "default-charset",
        default_value = DEFAULT_CHARSET,
        help = "Charset of input that does not declare one"
    )]
    default_charset: String,

    #[arg(long = "big-endian", help = "Write the .mo file in big-endian byte order")]
    big_endian: bool,

    #[arg(long = "po", help = "Write normalized .po text instead of a .mo file")]
    po_output: bool,

    #[arg(
        short = 'w',
        long = "width",
        default_value_t = 76,
        help = "Fold .po strings at this column (0 disables folding)"
    )]
    width: usize,

    #[arg(short = 's', long = "sort-output", help = "Sort .po output by msgid")]
    sort: bool,

    #[arg(
        short = 'o',
        long = "output-file",
        help = "Output file name, - for standard output"
    )]
    output: Option<PathBuf>,

    #[arg(long = "list-charsets", help = "List the supported charsets and exit")]
    list_charsets: bool,

    #[arg(
        required_unless_present = "list_charsets",
        help = "Input .po files, - for standard input"
    )]
    files: Vec<PathBuf>,
}

/// Warning or error from processing
#[derive(Debug)]
struct Diagnostic {
    file: String,
    message: String,
    is_error: bool,
}

impl Diagnostic {
    fn error(path: &Path, message: impl ToString) -> Self {
        Diagnostic {
            file: path.display().to_string(),
            message: message.to_string(),
            is_error: true,
        }
    }

    fn warning(path: &Path, message: impl ToString) -> Self {
        Diagnostic {
            file: path.display().to_string(),
            message: message.to_string(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.file,
            if self.is_error { "error" } else { "warning" },
            self.message
        )
    }
}

/// Parse one input through the streaming parser
fn parse_input(args: &Args, path: &Path) -> Result<TranslationTable, Diagnostic> {
    let mut parser = PoStreamParser::new(PoParseOptions {
        default_charset: args.default_charset.clone(),
        validation: args.check,
        ..Default::default()
    });

    // a parse failure stops the read; the error is kept to be reported
    let mut failure: Option<PoError> = None;
    let result = read_chunks(path, true, |chunk| {
        parser.feed(chunk).map_err(|e| {
            let message = e.to_string();
            failure = Some(e);
            io::Error::new(io::ErrorKind::InvalidData, message)
        })
    });

    if let Some(e) = failure {
        return Err(Diagnostic::error(path, e));
    }
    result.map_err(|e| Diagnostic::error(path, e))?;
    parser.finish().map_err(|e| Diagnostic::error(path, e))
}

/// Copy of `table` without the entries flagged fuzzy
fn without_fuzzy(table: &TranslationTable) -> TranslationTable {
    let mut kept = TranslationTable {
        translations: Section::new(),
        ..table.clone()
    };
    for entry in table.entries() {
        if !entry.comments.has_flag("fuzzy") {
            kept.insert(entry.clone());
        }
    }
    kept
}

/// Get the output file path
fn get_output_path(args: &Args, input: &Path) -> PathBuf {
    if let Some(ref output) = args.output {
        return output.clone();
    }

    // normalized .po goes to stdout rather than over the input
    if args.po_output {
        return PathBuf::from("-");
    }

    if input.as_os_str() == "-" {
        return PathBuf::from("messages.mo");
    }

    let mut output = input.to_path_buf();
    output.set_extension("mo");
    output
}

fn compile_file(args: &Args, input: &Path) -> Result<Option<Diagnostic>, Diagnostic> {
    let mut table = parse_input(args, input)?;
    if !args.include_fuzzy && !args.po_output {
        table = without_fuzzy(&table);
    }

    let data = if args.po_output {
        let compiler = PoCompiler::new(PoCompileOptions {
            fold_length: args.width,
            sort: if args.sort {
                SortMode::ById
            } else {
                SortMode::Off
            },
            default_charset: args.default_charset.clone(),
            ..Default::default()
        });
        compiler
            .compile(&table)
            .map_err(|e| Diagnostic::error(input, e))?
    } else {
        let compiler = MoCompiler::new(MoCompileOptions {
            endianness: if args.big_endian {
                Endianness::Big
            } else {
                Endianness::Little
            },
            default_charset: args.default_charset.clone(),
            ..Default::default()
        });
        compiler
            .compile(&table)
            .map_err(|e| Diagnostic::error(input, e))?
    };

    let output_path = get_output_path(args, input);
    write_output(&output_path, true, &data).map_err(|e| Diagnostic::error(&output_path, e))?;

    if !args.verbose {
        return Ok(None);
    }

    let translated = table
        .entries()
        .filter(|e| e.translations.iter().any(|t| !t.is_empty()))
        .count();
    let obsolete = table.obsolete_entries().count();
    Ok(Some(Diagnostic::warning(
        input,
        format!("{} translated messages, {} obsolete", translated, obsolete),
    )))
}

fn main() {
    let args = Args::parse();

    if args.list_charsets {
        for name in supported_charsets() {
            println!("{}", name);
        }
        exit(0);
    }

    if args.output.is_some() && args.files.len() > 1 {
        eprintln!("msgfmt: -o cannot be used with more than one input file");
        exit(1);
    }

    let mut exit_code = 0;

    for input_path in &args.files {
        match compile_file(&args, input_path) {
            Ok(Some(stats)) => eprintln!("msgfmt: {}", stats),
            Ok(None) => {}
            Err(diag) => {
                eprintln!("msgfmt: {}", diag);
                exit_code = 1;
            }
        }
    }

    exit(exit_code);
}
