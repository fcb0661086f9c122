//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! msgunfmt - decompile message catalog from binary format
//!
//! The msgunfmt utility reads a machine object (.mo) file and writes the
//! catalog it contains as portable object (.po) text.

use clap::Parser;
use plib::io::{read_input, write_output};
use pomo::charset_lib::DEFAULT_CHARSET;
use pomo::{MoParseOptions, MoParser, PoCompileOptions, PoCompiler, SortMode};
use std::path::{Path, PathBuf};
use std::process::exit;

/// msgunfmt - decompile message catalog from binary format
#[derive(Parser)]
#[command(version, about = "msgunfmt - decompile message catalog from binary format")]
struct Args {
    #[arg(short = 'v', long, help = "Print statistics for the catalog")]
    verbose: bool,

    #[arg(
        long = "default-charset",
        default_value = DEFAULT_CHARSET,
        help = "Charset of a catalog that does not declare one"
    )]
    default_charset: String,

    #[arg(
        short = 'w',
        long = "width",
        default_value_t = 76,
        help = "Fold strings at this column (0 disables folding)"
    )]
    width: usize,

    #[arg(short = 's', long = "sort-output", help = "Sort output by msgid")]
    sort: bool,

    #[arg(
        short = 'o',
        long = "output-file",
        default_value = "-",
        help = "Output file name, - for standard output"
    )]
    output: PathBuf,

    #[arg(help = "Input .mo file, - for standard input")]
    file: PathBuf,
}

fn decompile(args: &Args, input: &Path) -> Result<String, String> {
    let data = read_input(input, true).map_err(|e| e.to_string())?;

    let parser = MoParser::new(MoParseOptions {
        default_charset: args.default_charset.clone(),
        ..Default::default()
    });
    let table = match parser.parse(&data) {
        Ok(Some(table)) => table,
        Ok(None) => return Err("not a valid .mo file".to_string()),
        Err(e) => return Err(e.to_string()),
    };

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
    let text = compiler.compile(&table).map_err(|e| e.to_string())?;

    write_output(&args.output, true, &text)
        .map_err(|e| format!("{}: {}", args.output.display(), e))?;

    Ok(format!("{} translated messages", table.translations.len()))
}

fn main() {
    let args = Args::parse();

    match decompile(&args, &args.file) {
        Ok(stats) => {
            if args.verbose {
                eprintln!("msgunfmt: {}: {}", args.file.display(), stats);
            }
        }
        Err(e) => {
            eprintln!("msgunfmt: {}: {}", args.file.display(), e);
            exit(1);
        }
    }
}
