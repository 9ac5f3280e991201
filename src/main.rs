mod cli;

use mkvdemux::{config, extract};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mkvdemux_ebml::{ByteSource, Seekable, Streamed};
use mkvdemux_matroska::{
    Demuxer, EbmlHeader, SegmentInfo, SegmentPosition, TopLevelPositions, TrackInfo,
};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, StdinLock};
use std::path::{Path, PathBuf};

/// Where the document is read from.
enum Input {
    File(PathBuf),
    Stdin,
}

impl Input {
    fn from_args(file: Option<PathBuf>, stdin: bool) -> Result<Self> {
        match (file, stdin) {
            (_, true) => Ok(Self::Stdin),
            (Some(path), false) => Ok(Self::File(path)),
            (None, false) => anyhow::bail!("No input file given (use --stdin to read a stream)"),
        }
    }
}

fn open_file(path: &Path, config: &config::Config) -> Result<Demuxer<Seekable<BufReader<File>>>> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {:?}", path);
    }

    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    Demuxer::with_options(
        Seekable::new(BufReader::new(file)),
        config.demux.to_options(),
    )
    .with_context(|| format!("Failed to read Matroska metadata from {:?}", path))
}

fn open_stdin(config: &config::Config) -> Result<Demuxer<Streamed<StdinLock<'static>>>> {
    Demuxer::with_options(
        Streamed::new(io::stdin().lock()),
        config.demux.to_options(),
    )
    .context("Failed to read Matroska metadata from standard input")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mkvdemux=trace,mkvdemux_matroska=trace,mkvdemux_ebml=debug".to_string()
        } else {
            "mkvdemux=info,mkvdemux_matroska=info,mkvdemux_ebml=warn".to_string()
        }
    });

    // Logs go to stderr so packet listings and JSON stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Info { file, json, stdin } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            match Input::from_args(file, stdin)? {
                Input::File(path) => print_info(&open_file(&path, &config)?, json),
                Input::Stdin => print_info(&open_stdin(&config)?, json),
            }
        }
        Commands::Packets { file, limit, stdin } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            match Input::from_args(file, stdin)? {
                Input::File(path) => list_packets(&mut open_file(&path, &config)?, limit),
                Input::Stdin => list_packets(&mut open_stdin(&config)?, limit),
            }
        }
        Commands::Extract {
            file,
            output,
            tracks,
            raw,
            stdin,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if let Some(output) = output {
                config.extract.output_dir = output;
            }
            if !tracks.is_empty() {
                config.extract.tracks = tracks;
            }
            if raw {
                config.extract.annexb = false;
                config.extract.subtitles_as_srt = false;
            }

            match Input::from_args(file, stdin)? {
                Input::File(path) => extract_tracks(&mut open_file(&path, &config)?, &config),
                Input::Stdin => extract_tracks(&mut open_stdin(&config)?, &config),
            }
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mkvdemux {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct InfoReport<'a> {
    header: &'a EbmlHeader,
    segment: &'a SegmentPosition,
    info: Option<&'a SegmentInfo>,
    positions: &'a TopLevelPositions,
    tracks: &'a [TrackInfo],
}

fn print_info<S: ByteSource>(demuxer: &Demuxer<S>, json: bool) -> Result<()> {
    if json {
        let report = InfoReport {
            header: demuxer.header(),
            segment: demuxer.segment_position(),
            info: demuxer.segment_info(),
            positions: demuxer.positions(),
            tracks: demuxer.tracks(),
        };
        let json_str = serde_json::to_string_pretty(&report)?;
        println!("{}", json_str);
        return Ok(());
    }

    let header = demuxer.header();
    println!(
        "Doc type: {} (version {}, read version {})",
        header.doc_type, header.doc_type_version, header.doc_type_read_version
    );

    let segment = demuxer.segment_position();
    if segment.is_unknown_size() {
        println!("Segment: offset {}, unknown size", segment.offset);
    } else {
        println!("Segment: offset {}, {} bytes", segment.offset, segment.size);
    }

    println!("Timestamp scale: {} ns", demuxer.timestamp_scale());
    if let Some(info) = demuxer.segment_info() {
        if let Some(ref title) = info.title {
            println!("Title: {}", title);
        }
        if let Some(ms) = info.duration_ms() {
            println!("Duration: {}", format_duration(ms));
        }
        if let Some(date) = info.date_utc_datetime() {
            println!("Date: {}", date.to_rfc3339());
        }
        if let Some(ref app) = info.muxing_app {
            println!("Muxing app: {}", app);
        }
        if let Some(ref app) = info.writing_app {
            println!("Writing app: {}", app);
        }
    }

    let positions = demuxer.positions();
    let spans = [
        ("SeekHead", positions.seek_head),
        ("Cues", positions.cues),
        ("Chapters", positions.chapters),
        ("Tags", positions.tags),
        ("Attachments", positions.attachments),
    ];
    for (name, span) in spans {
        if let Some(span) = span {
            println!("{}: {}..{}", name, span.offset, span.end);
        }
    }

    println!("\nTracks: {}", demuxer.track_count());
    for (i, track) in demuxer.tracks().iter().enumerate() {
        print!(
            "  [{}] #{} {} {} ({})",
            i,
            track.number,
            track.track_type,
            track.codec_id,
            track.codec_name()
        );
        if let Some(ref video) = track.video {
            print!(" {}x{}", video.pixel_width, video.pixel_height);
        }
        if let Some(ref audio) = track.audio {
            print!(
                " {} Hz {}ch",
                audio.sampling_frequency, audio.channels
            );
        }
        print!(" ({})", track.language);
        if track.default {
            print!(" [default]");
        }
        if track.forced {
            print!(" [forced]");
        }
        println!();
    }

    Ok(())
}

fn format_duration(ms: f64) -> String {
    let total = ms.max(0.0) as u64;
    let secs = total / 1000;
    let mins = secs / 60;
    let hours = mins / 60;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        hours,
        mins % 60,
        secs % 60,
        total % 1000
    )
}

fn list_packets<S: ByteSource>(demuxer: &mut Demuxer<S>, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut count = 0u64;

    for packet in demuxer.packets().take(limit) {
        let packet = packet.context("Failed to read packet")?;
        count += 1;
        println!(
            "track {} start {} end {} size {} pos {} flags {}",
            packet.track,
            packet.start_ms,
            packet.end_ms,
            packet.data.len(),
            packet.file_pos,
            packet.flags
        );
    }

    extract::warn_on_skipped_clusters(demuxer, count);
    Ok(())
}

fn extract_tracks<S: ByteSource>(
    demuxer: &mut Demuxer<S>,
    config: &config::Config,
) -> Result<()> {
    let summary = extract::extract_tracks(demuxer, &config.extract)?;

    for track in &summary.tracks {
        println!(
            "Track {} (#{} {}): {} packets -> {}",
            track.index,
            track.number,
            track.codec_id,
            track.packets,
            track.path.display()
        );
    }
    println!("Total: {} packets", summary.total_packets());

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Max element size: {}", config.demux.max_element_size);
            println!("  Output dir: {}", config.extract.output_dir.display());
            println!("  Annex-B: {}", config.extract.annexb);
            println!("  SRT subtitles: {}", config.extract.subtitles_as_srt);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Max element size: {}", config.demux.max_element_size);
            println!("  Output dir: {}", config.extract.output_dir.display());
        }
    }

    Ok(())
}
