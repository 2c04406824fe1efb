// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Stream decompressor
//!
//! This program decodes a nybble stream as written by the `compress` example
//! and prints one line per decoded record. As the stream is padded to whole
//! bytes, a trailing `skip` may be reported for streams with an odd number of
//! nybbles.

use std::path::PathBuf;

use nybble_trace::codec;

fn main() {
    let matches = clap::Command::new("Trace decompressor")
        .arg(clap::arg!(<input> "Path to the stream").value_parser(clap::value_parser!(PathBuf)))
        .arg(
            clap::arg!(-o --offset <NYBBLES> "Nybble offset at which to start decoding")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            clap::arg!(-d --debug "Enable additional debug output")
                .env("DEBUG")
                .action(clap::ArgAction::SetTrue)
                .value_parser(clap::builder::FalseyValueParser::new()),
        )
        .get_matches();

    let debug = matches.get_flag("debug");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if debug {
        "trace"
    } else {
        "warn"
    }))
    .init();

    let input = matches
        .get_one::<PathBuf>("input")
        .expect("No input file specified");
    let data = std::fs::read(input).expect("Could not read input file");
    let offset = matches.get_one::<usize>("offset").copied().unwrap_or(0);

    let mut decoder = codec::builder().decoder(&data);
    decoder.seek(offset);
    while decoder.nybbles_left() > 0 {
        let pos = decoder.nybble_pos();
        match decoder.decode_record() {
            Ok(record) if debug => println!("{pos:>8}: {record}"),
            Ok(record) => println!("{record}"),
            Err(e) => {
                eprintln!("Could not decode record at nybble {pos}: {e}");
                std::process::exit(1);
            }
        }
    }
}
