// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! CSV-driven compressor
//!
//! This program compresses raw per-cycle trace records supplied as a CSV with
//! a header line. Every subsequent line holds one record with the columns
//! listed in [`HEADER`]. Flags are given as `0` or `1`, the privilege level as
//! its two-bit encoding, the register index and breakpoint reason in decimal
//! and all other values in hexadecimal.
//!
//! The output file may be either derived from the input's file name or
//! specified explicitly. Optionally, the trace control may be supplied in the
//! form of a TOML file, e.g.
//!
//! ```toml
//! enable_pc = 0
//! enable_rfd = false
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;

use nybble_trace::{codec, config, packer, trace, types};

/// Expected header of the input CSV
const HEADER: &str = "instr_valid,priv,pc,instruction,branch_taken,branch_target,trap,ret,jalr,retire,rfw_valid,rfw_rd,rfw_data,bkpt_valid,bkpt_reason";

fn main() {
    let matches = clap::Command::new("Trace compressor")
        .arg(
            clap::arg!(<input> "Path to the raw trace records")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file").value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            clap::arg!(-p --params <FILE> "Trace control parameters")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            clap::arg!(--"skip-fill" "Emit a skip nybble for every idle cycle")
                .action(clap::ArgAction::SetTrue),
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
        "debug"
    } else {
        "warn"
    }))
    .init();

    // We get the paths first because we may want to infer the output path
    let input = matches
        .get_one::<PathBuf>("input")
        .expect("No input file specified");
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| input.with_extension("nyb"));

    let input = std::fs::File::open(input).expect("Could not open input file");
    let mut input = std::io::BufReader::new(input).lines();

    let header = input
        .next()
        .expect("No header in input")
        .expect("Could not extract header from input");
    assert_eq!(header.trim_end(), HEADER);

    let control: config::Control = matches
        .get_one::<PathBuf>("params")
        .map(|p| {
            let params = std::fs::read_to_string(p).expect("Could not load parameters");
            toml::from_str(params.as_ref()).expect("Could not parse parameters")
        })
        .unwrap_or_default();
    log::info!("Control: {control:?}");

    let mut packer = packer::builder().with_control(control).build();
    let encoder = codec::builder()
        .with_skip_fill(matches.get_flag("skip-fill"))
        .encoder();
    let mut writer = codec::builder().writer(Vec::new());

    let mut encode = |record: codec::PackedRecord| {
        log::debug!("Encoding record: {record:?}");
        writer
            .write(&encoder.encode(&record))
            .expect("Could not write record");
    };

    input
        .map(|l| {
            l.expect("Could not read line")
                .parse::<CSVLine>()
                .expect("Could not parse line")
        })
        .for_each(|l| encode(packer.pack(&l.0).expect("Could not pack record")));
    if let Some(record) = packer.flush() {
        encode(record);
    }

    let nybbles = writer.nybbles();
    let (buffer, len) = writer.finish();
    log::info!("Compressed into {nybbles} nybbles");

    log::debug!("Writing output file: {}", output.display());
    let mut output = std::fs::File::create(output).expect("Could not create output file");
    output
        .write_all(&buffer[..len])
        .expect("Could not write trace to file");
}

/// A single line of the input CSV
#[derive(Copy, Clone, Debug)]
struct CSVLine(trace::Record);

impl std::str::FromStr for CSVLine {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<_> = line.trim_end().split(',').map(str::trim).collect();
        let [
            instr_valid,
            mode,
            pc,
            instruction,
            branch_taken,
            branch_target,
            trap,
            ret,
            jalr,
            retire,
            rfw_valid,
            rfw_rd,
            rfw_data,
            bkpt_valid,
            bkpt_reason,
        ] = fields.as_slice()
        else {
            return Err(line.into());
        };

        let flag = |f: &str| match f {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(line.to_string()),
        };
        let hex = |f: &str| {
            u32::from_str_radix(f.trim_start_matches("0x"), 16).map_err(|_| line.to_string())
        };

        Ok(Self(trace::Record {
            instr_valid: flag(instr_valid)?,
            mode: mode
                .parse::<u8>()
                .ok()
                .and_then(|m| types::Privilege::try_from(m).ok())
                .ok_or(line)?,
            pc: hex(pc)?,
            instruction: hex(instruction)?,
            branch_taken: flag(branch_taken)?,
            branch_target: hex(branch_target)?,
            trap: flag(trap)?,
            ret: flag(ret)?,
            jalr: flag(jalr)?,
            retire: flag(retire)?,
            rfw_valid: flag(rfw_valid)?,
            rfw_rd: rfw_rd.parse().map_err(|_| line.to_string())?,
            rfw_data: hex(rfw_data)?,
            bkpt_valid: flag(bkpt_valid)?,
            bkpt_reason: bkpt_reason.parse().map_err(|_| line.to_string())?,
        }))
    }
}
