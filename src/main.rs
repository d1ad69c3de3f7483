use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use data_encoding::{BASE64, HEXLOWER_PERMISSIVE};
use scte35_cue::fmt::format_identifier_to_string;
use scte35_cue::types::SCTE35_TABLE_ID;
use scte35_cue::{
    ParseError, SegmentationDescriptor, SpliceCommand, SpliceDescriptor, SpliceInfoSection, State,
    parse_splice_info_section, parse_splice_info_section_checked, parse_with_pointer_field,
    parse_with_pointer_field_checked,
};
use serde_json::json;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Decode SCTE-35 cues from base64 or hex payloads
#[derive(Parser, Debug)]
#[command(name = "scte35-cue", version)]
struct Cli {
    /// Base64 or hex encoded SCTE-35 payloads, in arrival order
    #[arg(required = true)]
    payloads: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Payload encoding
    #[arg(short, long, value_enum, default_value_t = InputEncoding::Auto)]
    input: InputEncoding,

    /// Feed every segmentation descriptor through one state tracker and
    /// report what each payload opens and closes
    #[arg(long)]
    track: bool,

    /// Reject payloads whose CRC-32 does not match
    #[arg(long)]
    verify_crc: bool,

    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum InputEncoding {
    Auto,
    Base64,
    Hex,
}

/// What one payload did to the tracked state.
#[derive(Debug, Default)]
struct Tracking {
    closed: Vec<SegmentationDescriptor>,
    rejected: Vec<(SegmentationDescriptor, String)>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut state = State::new();
    let mut failed = false;

    for (index, payload) in cli.payloads.iter().enumerate() {
        match decode_payload(payload, cli.input).and_then(|bytes| decode_section(&bytes, cli.verify_crc)) {
            Ok((section, crc_valid)) => {
                let tracking = cli.track.then(|| track(&mut state, &section));
                match cli.output {
                    OutputFormat::Text => print_text(index, &section, crc_valid, tracking.as_ref(), &state),
                    OutputFormat::Json => print_json(index, &section, crc_valid, tracking.as_ref(), &state),
                }
            }
            Err(error) => {
                failed = true;
                match cli.output {
                    OutputFormat::Text => eprintln!("{error}"),
                    OutputFormat::Json => println!(
                        "{}",
                        json!({ "status": "error", "index": index, "error": error })
                    ),
                }
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn decode_payload(payload: &str, encoding: InputEncoding) -> Result<Vec<u8>, String> {
    let payload = payload.trim();
    let encoding = match encoding {
        InputEncoding::Auto if looks_like_hex(payload) => InputEncoding::Hex,
        InputEncoding::Auto => InputEncoding::Base64,
        explicit => explicit,
    };

    match encoding {
        InputEncoding::Hex => {
            let digits = payload
                .strip_prefix("0x")
                .or_else(|| payload.strip_prefix("0X"))
                .unwrap_or(payload);
            HEXLOWER_PERMISSIVE
                .decode(digits.as_bytes())
                .map_err(|e| format!("Error decoding hex string: {e}"))
        }
        _ => BASE64
            .decode(payload.as_bytes())
            .map_err(|e| format!("Error decoding base64 string: {e}")),
    }
}

fn looks_like_hex(payload: &str) -> bool {
    let digits = payload
        .strip_prefix("0x")
        .or_else(|| payload.strip_prefix("0X"))
        .unwrap_or(payload);
    !digits.is_empty() && digits.len() % 2 == 0 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses the section, skipping a leading pointer field when present.
///
/// Returns the section and whether its CRC-32 matched.
fn decode_section(bytes: &[u8], verify_crc: bool) -> Result<(SpliceInfoSection, bool), String> {
    let pointer_field = bytes.first().is_some_and(|&first| first != SCTE35_TABLE_ID);
    if pointer_field {
        debug!("payload starts with a pointer field");
    }

    let checked = if pointer_field {
        parse_with_pointer_field_checked(bytes)
    } else {
        parse_splice_info_section_checked(bytes)
    };

    match checked {
        Ok(section) => Ok((section, true)),
        Err(error @ ParseError::ChecksumMismatch { .. }) if !verify_crc => {
            warn!(%error, "CRC-32 mismatch");
            let section = if pointer_field {
                parse_with_pointer_field(bytes)
            } else {
                parse_splice_info_section(bytes)
            };
            section
                .map(|section| (section, false))
                .map_err(|e| format!("Error parsing SCTE-35 payload: {e}"))
        }
        Err(e) => Err(format!("Error parsing SCTE-35 payload: {e}")),
    }
}

fn track(state: &mut State, section: &SpliceInfoSection) -> Tracking {
    let mut tracking = Tracking::default();
    for descriptor in section.segmentation_descriptors() {
        match state.process_descriptor(descriptor.clone()) {
            Ok(closed) => tracking.closed.extend(closed),
            Err(error) => {
                debug!(%error, event_id = descriptor.segmentation_event_id(), "descriptor rejected");
                tracking.rejected.push((descriptor.clone(), error.to_string()));
            }
        }
    }
    tracking
}

fn print_json(
    index: usize,
    section: &SpliceInfoSection,
    crc_valid: bool,
    tracking: Option<&Tracking>,
    state: &State,
) {
    let mut report = json!({
        "status": "success",
        "index": index,
        "data": section,
        "crc_valid": crc_valid,
    });

    if let Some(tracking) = tracking {
        let rejected: Vec<_> = tracking
            .rejected
            .iter()
            .map(|(descriptor, error)| json!({ "descriptor": descriptor, "error": error }))
            .collect();
        let open: Vec<_> = state.open().collect();
        report["tracking"] = json!({
            "closed": tracking.closed,
            "rejected": rejected,
            "open": open,
            "in_blackout": state.in_blackout(),
        });
    }

    println!("{report}");
}

fn print_text(
    index: usize,
    section: &SpliceInfoSection,
    crc_valid: bool,
    tracking: Option<&Tracking>,
    state: &State,
) {
    println!("Payload #{index}");
    println!("  Table ID: 0x{:02x}", section.table_id());
    println!("  SAP Type: {:?}", section.sap_type());
    println!("  Protocol Version: {}", section.protocol_version());
    println!("  PTS Adjustment: {}", section.pts_adjustment());
    println!("  CW Index: 0x{:02x}", section.cw_index());
    println!("  Tier: 0x{:03x}", section.tier());
    println!(
        "  Splice Command: {} (0x{:02x})",
        section.splice_command().name(),
        section.splice_command_type()
    );

    match section.splice_command() {
        SpliceCommand::SpliceNull => {}
        SpliceCommand::SpliceInsert(insert) => {
            println!("    Splice Event ID: 0x{:08x}", insert.splice_event_id);
            println!("    Cancelled: {}", insert.splice_event_cancel_indicator);
            if !insert.splice_event_cancel_indicator {
                println!("    Out Of Network: {}", insert.out_of_network_indicator);
                println!("    Program Splice: {}", insert.program_splice_flag);
                println!("    Splice Immediate: {}", insert.splice_immediate_flag);
                for component in &insert.components {
                    println!("    Component Tag: {}", component.component_tag);
                }
                if let Some(break_duration) = &insert.break_duration {
                    println!(
                        "    Break Duration: {:.3} seconds (auto return: {})",
                        break_duration.to_duration().as_secs_f64(),
                        break_duration.auto_return
                    );
                }
                println!("    Unique Program ID: {}", insert.unique_program_id);
                println!("    Avail: {}/{}", insert.avail_num, insert.avails_expected);
            }
        }
        SpliceCommand::TimeSignal(signal) => {
            println!("    Time Specified: {}", signal.splice_time.time_specified_flag());
        }
    }

    match section.pts() {
        Some(pts) => println!("  PTS: {} ({pts})", pts.ticks()),
        None => println!("  PTS: none"),
    }

    println!("  Descriptors: {}", section.splice_descriptors().len());
    for descriptor in section.splice_descriptors() {
        match descriptor {
            SpliceDescriptor::Segmentation(segmentation) => print_segmentation(segmentation, "    "),
            SpliceDescriptor::Unknown { tag, data } => {
                println!("    Descriptor tag 0x{tag:02x}, {} bytes", data.len());
            }
        }
    }

    println!("  CRC-32: {}", if crc_valid { "valid" } else { "invalid" });

    if let Some(tracking) = tracking {
        println!("  Closed: {}", tracking.closed.len());
        for closed in &tracking.closed {
            print_segmentation(closed, "    ");
        }
        for (descriptor, error) in &tracking.rejected {
            println!(
                "  Rejected 0x{:08x} ({}): {error}",
                descriptor.segmentation_event_id(),
                descriptor.segmentation_type()
            );
        }
        println!(
            "  Open: {}{}",
            state.open().count(),
            if state.in_blackout() { " (breakaway)" } else { "" }
        );
        for open in state.open() {
            print_segmentation(open, "    ");
        }
    }
}

fn print_segmentation(descriptor: &SegmentationDescriptor, indent: &str) {
    if descriptor.segmentation_event_cancel_indicator() {
        println!(
            "{indent}Segmentation Event ID: 0x{:08x} (cancelled)",
            descriptor.segmentation_event_id()
        );
        return;
    }

    println!(
        "{indent}Segmentation Event ID: 0x{:08x}, {} (0x{:02x})",
        descriptor.segmentation_event_id(),
        descriptor.segmentation_type(),
        descriptor.segmentation_type_id()
    );
    println!("{indent}  Identifier: {}", format_identifier_to_string(descriptor.identifier()));
    if !descriptor.segmentation_upid().is_empty() {
        println!(
            "{indent}  UPID ({}): {}",
            descriptor.segmentation_upid_type(),
            descriptor.segmentation_upid()
        );
    }
    if let Some(duration) = descriptor.duration() {
        println!("{indent}  Duration: {:.3} seconds", duration.as_secs_f64());
    }
    println!(
        "{indent}  Segment: {}/{}",
        descriptor.segment_num(),
        descriptor.segments_expected()
    );
    if let (Some(num), Some(expected)) = (descriptor.sub_segment_num(), descriptor.sub_segments_expected()) {
        println!("{indent}  Sub-segment: {num}/{expected}");
    }
}
