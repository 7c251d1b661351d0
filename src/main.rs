//! chordflow - parse and voice chord progressions
//!
//! Subcommands:
//! - `chordflow render <file>` - render a progression document
//! - `chordflow chords <text>` - classify chord symbols
//! - `chordflow roman <text> --key <key>` - classify roman numerals
//! - `chordflow voice <text>` - voice a progression and print note names

use chordflow::{
    degree_for_chord, parse, parse_document, render, render_progression, to_musicxml, ChordflowError, InputKind, KeySpec, Metadata,
    ParsedItem, PitchClass, ProgressionData, VoicingOptions,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::process;
use tracing::debug;

#[derive(Parser)]
#[command(name = "chordflow")]
#[command(about = "Parse chord symbols and roman numerals into voiced progressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a progression document (YAML frontmatter + chords)
    Render {
        /// Path to the document
        file: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// Transpose to this tonic, overriding the document
        #[arg(short, long)]
        transpose: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Classify chord symbols
    Chords {
        /// Chord text, e.g. "Fmaj7 E7 Am7"
        text: String,

        /// Key used to derive degree labels
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Classify roman numerals
    Roman {
        /// Roman numeral text, e.g. "ii V7 I" or "251"
        text: String,

        /// Key the numerals resolve against
        #[arg(short, long)]
        key: String,
    },

    /// Voice a progression and print note names per chord
    Voice {
        /// Chord or roman numeral text
        text: String,

        /// Key (needed for roman numerals)
        #[arg(short, long, default_value = "C")]
        key: String,

        /// Read the text as roman numerals
        #[arg(short, long)]
        roman: bool,

        /// Octave whose C anchors the voicing
        #[arg(short, long, default_value = "4")]
        center: i32,

        /// Number of voices
        #[arg(short, long, default_value = "4")]
        voices: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Musicxml,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), ChordflowError> {
    match command {
        Commands::Render {
            file,
            format,
            transpose,
            output,
        } => {
            let source = fs::read_to_string(&file)
                .map_err(|e| ChordflowError::Io(format!("cannot read '{}': {}", file, e)))?;
            let data = match transpose {
                Some(tonic) => render_transposed(&source, &tonic)?,
                None => render(&source)?,
            };
            debug!(file = %file, steps = data.steps.len(), "rendered document");

            let text = match format {
                Format::Text => progression_to_text(&data),
                Format::Json => serde_json::to_string_pretty(&data).map_err(|e| ChordflowError::Io(e.to_string()))?,
                Format::Musicxml => to_musicxml(&data),
            };
            write_output(output.as_deref(), &text)
        }
        Commands::Chords { text, key } => {
            let key = key.map(|k| k.parse::<KeySpec>()).transpose()?;
            let items = parse(&text, InputKind::Chord, &key.unwrap_or_default());
            for item in &items {
                println!("{}", item_line(item, key.as_ref()));
            }
            Ok(())
        }
        Commands::Roman { text, key } => {
            let key: KeySpec = key.parse()?;
            for item in &parse(&text, InputKind::Roman, &key) {
                println!("{}", item_line(item, None));
            }
            Ok(())
        }
        Commands::Voice {
            text,
            key,
            roman,
            center,
            voices,
        } => {
            let voicing = VoicingOptions {
                voice_count: voices,
                ..VoicingOptions::default()
            };
            let metadata = Metadata {
                key: key.parse()?,
                input: if roman { InputKind::Roman } else { InputKind::Chord },
                center_register: center,
                voicing,
                ..Metadata::default()
            };
            metadata.validate()?;
            print!("{}", progression_to_text(&render_progression(&text, &metadata)));
            Ok(())
        }
    }
}

/// Render a document with its transpose target replaced.
fn render_transposed(source: &str, tonic: &str) -> Result<ProgressionData, ChordflowError> {
    let tonic: PitchClass = tonic
        .parse()
        .map_err(|_| ChordflowError::InvalidKey(tonic.to_string()))?;
    let (mut metadata, body) = parse_document(source)?;
    metadata.transpose = Some(tonic);
    Ok(render_progression(&body, &metadata))
}

fn item_line(item: &ParsedItem, key: Option<&KeySpec>) -> String {
    let status = format!("{:?}", item.status).to_lowercase();
    let mut line = format!("{:>3}  {:<6} {:<12}", item.index, status, item.raw);
    if let Some(chord) = &item.chord {
        line.push_str(&format!(" {:<12}", chord.to_string()));
        let degree = match key {
            Some(key) => Some(degree_for_chord(chord, key)),
            None => item.degree.clone(),
        };
        if let Some(degree) = degree {
            line.push_str(&format!(" {}", degree));
        }
    }
    if let Some(message) = &item.message {
        line.push_str(&format!("  ({})", message));
    }
    line
}

fn progression_to_text(data: &ProgressionData) -> String {
    let mut text = String::new();
    if let Some(title) = &data.title {
        text.push_str(&format!("{}\n", title));
    }
    text.push_str(&format!("Key: {}", data.key));
    if data.is_transposed() {
        text.push_str(&format!(" (from {})", data.source_key));
    }
    text.push('\n');

    for step in &data.steps {
        let chord = step.chord.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
        text.push_str(&format!(
            "{:>3}  {:<10} {:<12} {}",
            step.index,
            step.label,
            chord,
            step.voicing.note_names().join(" ")
        ));
        if let Some(message) = &step.item.message {
            text.push_str(&format!("  ({})", message));
        }
        text.push('\n');
    }
    text
}

fn write_output(path: Option<&str>, text: &str) -> Result<(), ChordflowError> {
    match path {
        Some(path) => {
            fs::write(path, text).map_err(|e| ChordflowError::Io(format!("cannot write '{}': {}", path, e)))?;
            eprintln!("Wrote {}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
