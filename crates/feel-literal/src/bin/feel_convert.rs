//! `feel-convert`: decode a JSON document as FEEL literals and encode it
//! back.
//!
//! Reads JSON from the file named on the command line, or stdin, and writes
//! the re-encoded JSON to stdout.
//!
//! ```text
//! feel-convert [--plain] [--quote-strings] [--zone-suffix] [FILE]
//! ```

use std::io::{self, Read};
use std::process::ExitCode;

use feel_literal::{EncoderOptions, LiteralDecoder, LiteralEncoder, StringPolicy, WrapMode};

const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_NOINPUT: u8 = 66;

fn main() -> ExitCode {
    let mut options = EncoderOptions::default();
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--plain" => options.wrap = WrapMode::Plain,
            "--wrapped" => options.wrap = WrapMode::Wrapped,
            "--quote-strings" => options.strings = StringPolicy::Quoted,
            "--zone-suffix" => options.zone_suffix = true,
            "-h" | "--help" => {
                println!("usage: feel-convert [--plain] [--quote-strings] [--zone-suffix] [FILE]");
                return ExitCode::SUCCESS;
            }
            flag if flag.starts_with('-') => {
                eprintln!("feel-convert: unknown option {flag}");
                return ExitCode::from(EX_USAGE);
            }
            file => path = Some(file.to_owned()),
        }
    }

    let input = match read_input(path.as_deref()) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("feel-convert: {err}");
            return ExitCode::from(EX_NOINPUT);
        }
    };
    let wire: serde_json::Value = match serde_json::from_str(&input) {
        Ok(wire) => wire,
        Err(err) => {
            eprintln!("feel-convert: invalid JSON: {err}");
            return ExitCode::from(EX_DATAERR);
        }
    };

    let value = match LiteralDecoder::new().decode(&wire) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("feel-convert: {err}");
            return ExitCode::from(EX_DATAERR);
        }
    };
    let out = LiteralEncoder::with_options(options).encode(&value);
    match serde_json::to_string_pretty(&out) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("feel-convert: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}
