//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::BUFSZ;

fn is_stdio(pathname: &Path, dashed: bool) -> bool {
    let path_str = pathname.as_os_str();
    (dashed && path_str == "-") || (!dashed && path_str.is_empty())
}

/// Open a file for reading, or stdin for `-` (or the empty path when
/// `dashed_stdin` is false)
pub fn input_stream(pathname: &Path, dashed_stdin: bool) -> io::Result<Box<dyn Read>> {
    let file: Box<dyn Read> = if is_stdio(pathname, dashed_stdin) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(fs::File::open(pathname)?)
    };

    Ok(file)
}

/// Read a whole input, file or stdin, into memory
pub fn read_input(pathname: &Path, dashed_stdin: bool) -> io::Result<Vec<u8>> {
    let mut data = Vec::with_capacity(BUFSZ);
    input_stream(pathname, dashed_stdin)?.read_to_end(&mut data)?;
    Ok(data)
}

/// Read an input in `BUFSZ` pieces, handing each to `sink`
///
/// Reading stops at the first error returned by `sink`.
pub fn read_chunks<F>(pathname: &Path, dashed_stdin: bool, sink: F) -> io::Result<()>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    read_chunks_from(input_stream(pathname, dashed_stdin)?, sink)
}

/// [`read_chunks`] over an open reader
pub fn read_chunks_from<R, F>(mut reader: R, mut sink: F) -> io::Result<()>
where
    R: Read,
    F: FnMut(&[u8]) -> io::Result<()>,
{
    let mut buf = vec![0u8; BUFSZ];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            return Ok(());
        }
        sink(&buf[..n])?;
    }
}

/// Open a file for writing, or stdout for `-`
pub fn output_stream(pathname: &Path, dashed_stdout: bool) -> io::Result<Box<dyn Write>> {
    let file: Box<dyn Write> = if is_stdio(pathname, dashed_stdout) {
        Box::new(io::stdout().lock())
    } else {
        Box::new(fs::File::create(pathname)?)
    };

    Ok(file)
}

/// Write `data` to a file, or stdout for `-`
pub fn write_output(pathname: &Path, dashed_stdout: bool, data: &[u8]) -> io::Result<()> {
    let mut out = output_stream(pathname, dashed_stdout)?;
    out.write_all(data)?;
    out.flush()
}
