use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use palsav_core::{
    Compression, ConvertError, Converter, CustomProperties, Direction, ExternalCodec, HttpServer,
    Indent, JsonOpts, JsonToSavOpts, NanPolicy, ProjectionService, SavToJsonOpts, SaveMode,
    ServerConfig, TerminalPrompt,
};

#[derive(Parser, Debug)]
#[command(
    name = "palsav",
    about = "Converts Palworld save files to and from JSON",
    version
)]
struct Cli {
    /// .sav or .json file to convert
    filename: Option<PathBuf>,
    /// Override heuristics and convert SAV file to JSON
    #[arg(long)]
    to_json: bool,
    /// Override heuristics and convert JSON file to SAV
    #[arg(long)]
    from_json: bool,
    /// Output file (default: <filename>.json or <filename>.sav)
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Force overwriting output file if it already exists without prompting
    #[arg(long, short)]
    force: bool,
    /// Compression library used to convert JSON files to SAV files
    #[arg(long, short, value_enum, default_value_t = Library::Libooz)]
    library: Library,
    /// Convert NaN/Inf/-Inf floats to null when converting from SAV to JSON
    #[arg(long)]
    convert_nan_to_null: bool,
    /// Comma-separated list of custom properties to decode, or 'all'
    /// (default: every known property except the disabled ones)
    #[arg(long)]
    custom_properties: Option<String>,
    /// Minify JSON output
    #[arg(long)]
    minify_json: bool,
    /// Keep only the keys the given projection mode reads
    #[arg(long, value_enum)]
    prune: Option<Mode>,

    /// Start REST server
    #[arg(long)]
    serve: bool,
    /// Server host
    #[arg(long, env = "PALSAV_HOST", default_value = "127.0.0.1")]
    host: String,
    /// Server port
    #[arg(long, env = "PALSAV_PORT", default_value_t = 8009)]
    port: u16,
    /// Number of worker threads for the REST server (0 = auto)
    #[arg(long, env = "PALSAV_WORKERS", default_value_t = 0)]
    workers: usize,

    /// Save codec program
    #[arg(long, env = "PALSAV_CODEC", default_value = "palsav-codec")]
    codec: PathBuf,
    /// Extra leading argument for the codec program (repeatable)
    #[arg(long = "codec-arg", value_name = "ARG")]
    codec_args: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Library {
    Zlib,
    Libooz,
}

impl From<Library> for Compression {
    fn from(l: Library) -> Self {
        match l {
            Library::Zlib => Compression::Zlib,
            Library::Libooz => Compression::Libooz,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Server,
    Player,
}

impl From<Mode> for SaveMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Server => SaveMode::Server,
            Mode::Player => SaveMode::Player,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.to_json && cli.from_json {
        eprintln!("{}", ConvertError::ConflictingDirection);
        std::process::exit(1);
    }

    let codec = ExternalCodec::new(&cli.codec).with_args(&cli.codec_args);

    if cli.serve {
        cmd_serve(&cli, codec);
        return;
    }

    let Some(input) = cli.filename.clone() else {
        eprintln!("filename is required unless --serve is specified");
        std::process::exit(1);
    };
    if let Err(e) = cmd_convert(&cli, &codec, input) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(cli: &Cli, codec: &ExternalCodec, input: PathBuf) -> Result<(), ConvertError> {
    palsav_core::convert::check_input(&input)?;
    let direction = Direction::detect(&input, cli.to_json, cli.from_json)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| direction.default_output(&input));
    let mut converter = Converter::new(codec, TerminalPrompt::stdio());
    match direction {
        Direction::ToJson => {
            let opts = SavToJsonOpts {
                force: cli.force,
                json: JsonOpts {
                    indent: if cli.minify_json {
                        Indent::Minified
                    } else {
                        Indent::Tab
                    },
                    nan: NanPolicy::from_convert_to_null(cli.convert_nan_to_null),
                },
                custom_properties: cli
                    .custom_properties
                    .as_deref()
                    .map(CustomProperties::parse_list)
                    .unwrap_or_else(CustomProperties::recommended),
                prune: cli.prune.map(SaveMode::from),
            };
            converter.sav_to_json(&input, &output, &opts)
        }
        Direction::FromJson => {
            let opts = JsonToSavOpts {
                force: cli.force,
                compression: cli.library.into(),
            };
            converter.json_to_sav(&input, &output, &opts)
        }
    }
}

fn cmd_serve(cli: &Cli, codec: ExternalCodec) {
    let config = ServerConfig {
        host: cli.host.clone(),
        port: cli.port,
        workers: cli.workers,
    };
    let service = Arc::new(ProjectionService::new(Arc::new(codec)));
    match HttpServer::start(&config, service) {
        Ok(server) => server.join(),
        Err(e) => {
            eprintln!("error: cannot start server: {}", e);
            std::process::exit(2);
        }
    }
}
