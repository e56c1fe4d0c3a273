/*
 * Copyright (C) 2021 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base85.
 *
 * base85 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base85 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base85. If not, see <https://www.gnu.org/licenses/>.
 */

use std::ffi::OsStr;
use std::fmt::{self, Debug, Display};
use std::fs::File;
use std::io::{stdin, stdout, BufWriter, Read, Write};
use std::path::Path;
use std::process::exit;

use base85::decode::{decode_in_place_with, DecodeConfig};
use base85::encode::encode_to_bytes;

const USAGE: &str = "\
Usage: base85 [options] [file]

Encodes or decodes RFC 1924 base-85 data from [file] and writes the result to
standard output. If [file] is missing or \"-\", the data is read from standard
input.

Encoded output always decodes to a multiple of 4 bytes; input of any other
length is padded with zero bytes.

Options:
  -d --decode   Decode data instead of encoding
  -s --strict   When decoding, reject groups that overflow 32 bits and any
                data after the last group other than a null byte
  -h --help     Show this help message
  -v --version  Show program version
";

#[macro_use]
mod error_exit {
    use super::{exit, Display};

    macro_rules! error_exit {
        ($($args:tt)*) => {
            crate::error_exit::__run(format_args!($($args)*));
        };
    }

    #[doc(hidden)]
    pub fn __run(args: impl Display) -> ! {
        eprintln!("error: {}", args);
        if cfg!(feature = "cli-panic") {
            panic!("error: {}", args);
        } else {
            exit(1);
        }
    }
}

fn expect<T, E: Debug>(result: Result<T, E>, msg: impl Display) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("error: {}", msg);
        if cfg!(feature = "cli-panic") {
            panic!("error: {}: {:?}", msg, e);
        } else {
            exit(1);
        }
    })
}

#[derive(Debug, PartialEq)]
enum Action {
    Run,
    Help,
    Version,
}

#[derive(Debug)]
struct ParsedArgs<'a> {
    pub action: Action,
    pub decode: bool,
    pub strict: bool,
    /// `None` means standard input.
    pub path: Option<&'a Path>,
}

#[derive(Debug, PartialEq)]
enum ArgsError {
    UnrecognizedOption(String),
    UnexpectedArgument(String),
}

impl Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedOption(s) => {
                write!(f, "unrecognized option: {}", s)
            }
            Self::UnexpectedArgument(s) => {
                write!(f, "unexpected argument: {}", s)
            }
        }
    }
}

fn show_usage() -> ! {
    print!("{}", USAGE);
    exit(0);
}

fn show_version() -> ! {
    println!("{}", env!("CARGO_PKG_VERSION"));
    exit(0);
}

macro_rules! args_error {
    ($($args:tt)*) => {
        error_exit!(
            "{}\n{}",
            format_args!($($args)*),
            "See `base85 --help` for usage information.",
        );
    };
}

/// Parses command-line arguments. `--help` and `--version` stop parsing
/// where they appear, so later arguments are not checked.
fn parse_args<'a, Args>(args: Args) -> Result<ParsedArgs<'a>, ArgsError>
where
    Args: IntoIterator<Item = &'a OsStr>,
{
    let mut parsed = ParsedArgs {
        action: Action::Run,
        decode: false,
        strict: false,
        path: None,
    };
    let mut input_seen = false;
    let mut options_done = false;

    for arg in args {
        let astr = arg.to_string_lossy();
        if !options_done {
            match &*astr {
                "--" => {
                    options_done = true;
                    continue;
                }
                "--help" => parsed.action = Action::Help,
                "--version" => parsed.action = Action::Version,
                "--decode" => parsed.decode = true,
                "--strict" => parsed.strict = true,
                s if s.starts_with("--") => {
                    return Err(ArgsError::UnrecognizedOption(s.to_owned()));
                }
                s if s.starts_with('-') && s != "-" => {
                    for c in s.chars().skip(1) {
                        match c {
                            'h' => parsed.action = Action::Help,
                            'v' => parsed.action = Action::Version,
                            'd' => parsed.decode = true,
                            's' => parsed.strict = true,
                            c => {
                                let opt = format!("-{}", c);
                                return Err(ArgsError::UnrecognizedOption(opt));
                            }
                        }
                        if parsed.action != Action::Run {
                            return Ok(parsed);
                        }
                    }
                }
                _ => {
                    if input_seen {
                        return Err(ArgsError::UnexpectedArgument(
                            astr.to_string(),
                        ));
                    }
                    input_seen = true;
                    parsed.path = (astr != "-").then(|| Path::new(arg));
                }
            }
            if parsed.action != Action::Run {
                return Ok(parsed);
            }
            continue;
        }
        if input_seen {
            return Err(ArgsError::UnexpectedArgument(astr.into_owned()));
        }
        input_seen = true;
        parsed.path = (astr != "-").then(|| Path::new(arg));
    }
    Ok(parsed)
}

fn read_input(stream: &mut impl Read) -> Vec<u8> {
    let mut data = Vec::new();
    expect(stream.read_to_end(&mut data), "could not read input");
    data
}

fn write_output(data: impl IntoIterator<Item = u8>) {
    let mut writer = BufWriter::new(stdout());
    data.into_iter().for_each(|b| {
        expect(writer.write_all(&[b]), "could not write to standard output");
    });
    expect(writer.flush(), "could not write to standard output");
}

fn encode(stream: &mut impl Read) {
    let data = read_input(stream);
    write_output(encode_to_bytes(&data));
}

fn decode(stream: &mut impl Read, config: DecodeConfig) {
    let mut data = read_input(stream);
    match decode_in_place_with(&mut data, config) {
        Ok(len) => {
            data.truncate(len);
            write_output(data);
        }
        Err(e) => {
            error_exit!("input is not valid base-85 data: {}", e);
        }
    }
}

fn run(stream: &mut impl Read, args: &ParsedArgs<'_>) {
    if args.decode {
        let config = if args.strict {
            DecodeConfig::strict()
        } else {
            DecodeConfig::new()
        };
        decode(stream, config);
    } else {
        encode(stream);
    }
}

fn main() {
    let args: Vec<_> = std::env::args_os().skip(1).collect();
    let parsed = parse_args(args.iter().map(|s| s.as_os_str()))
        .unwrap_or_else(|e| {
            args_error!("{}", e);
        });

    match parsed.action {
        Action::Help => show_usage(),
        Action::Version => show_version(),
        Action::Run => {}
    }

    match parsed.path {
        Some(path) => {
            let mut file = File::open(path).unwrap_or_else(|e| {
                error_exit!("could not open file '{}': {}", path.display(), e);
            });
            run(&mut file, &parsed);
        }
        None => run(&mut stdin(), &parsed),
    }
}
