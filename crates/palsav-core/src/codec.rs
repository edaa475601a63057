//! Boundary to the save codec (container decompression + GVAS property tree).
//!
//! The codec itself lives outside this crate. [`SaveCodec`] is the contract the
//! rest of the crate relies on, and [`ExternalCodec`] binds it to a converter
//! program speaking a small stdin/stdout protocol:
//!
//! - `<program> decode --custom-properties <list|all> [--convert-nan-to-null]`
//!   reads `.sav` bytes on stdin and writes the decoded tree as JSON on stdout.
//! - `<program> encode --save-type <0x31|0x32> --library <zlib|libooz>`
//!   reads the JSON tree on stdin and writes `.sav` bytes on stdout.
use std::ffi::OsString;
use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::str::FromStr;

use crate::Document;
use crate::error::CodecError;
use crate::json::{self, JsonOpts, NanPolicy};

/// Schema-specific property decoders known to the codec.
pub const KNOWN_CUSTOM_PROPERTIES: &[&str] = &[
    ".worldSaveData.GroupSaveDataMap",
    ".worldSaveData.CharacterSaveParameterMap.Value.RawData",
    ".worldSaveData.ItemContainerSaveData.Value.RawData",
    ".worldSaveData.ItemContainerSaveData.Value.Slots.Slots.RawData",
    ".worldSaveData.CharacterContainerSaveData.Value.Slots.Slots.RawData",
    ".worldSaveData.DynamicItemSaveData.DynamicItemSaveData.RawData",
    ".worldSaveData.FoliageGridSaveDataMap.Value.ModelMap.Value.RawData",
    ".worldSaveData.FoliageGridSaveDataMap.Value.ModelMap.Value.InstanceDataMap.Value.RawData",
    ".worldSaveData.BaseCampSaveData.Value.RawData",
    ".worldSaveData.BaseCampSaveData.Value.WorkerDirector.RawData",
    ".worldSaveData.BaseCampSaveData.Value.WorkCollection.RawData",
    ".worldSaveData.BaseCampSaveData.Value.ModuleMap",
    ".worldSaveData.WorkSaveData",
    ".worldSaveData.MapObjectSaveData",
    ".worldSaveData.GuildExtraSaveDataMap.Value.GuildItemStorage.RawData",
];

/// Decoders left out of the command-line default selection.
pub const DISABLED_PROPERTIES: &[&str] = &[
    ".worldSaveData.BaseCampSaveData.Value.ModuleMap",
    ".worldSaveData.MapObjectSaveData",
];

/// Which custom property decoders to enable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CustomProperties {
    #[default]
    All,
    Only(Vec<String>),
}

impl CustomProperties {
    /// Every known decoder except the disabled ones.
    pub fn recommended() -> Self {
        CustomProperties::Only(
            KNOWN_CUSTOM_PROPERTIES
                .iter()
                .copied()
                .filter(|p| !DISABLED_PROPERTIES.contains(p))
                .map(|p| p.to_string())
                .collect(),
        )
    }

    /// Parses a comma-separated list; a leading `all` selects everything.
    pub fn parse_list(s: &str) -> Self {
        let items: Vec<String> = s
            .split(',')
            .map(|x| x.trim().to_string())
            .filter(|x| !x.is_empty())
            .collect();
        match items.first() {
            Some(first) if first == "all" => CustomProperties::All,
            _ => CustomProperties::Only(items),
        }
    }

    /// Known decoders selected by this filter, in catalogue order. Unknown
    /// names are ignored.
    pub fn resolve(&self) -> Vec<&'static str> {
        match self {
            CustomProperties::All => KNOWN_CUSTOM_PROPERTIES.to_vec(),
            CustomProperties::Only(keys) => KNOWN_CUSTOM_PROPERTIES
                .iter()
                .copied()
                .filter(|p| keys.iter().any(|k| k == p))
                .collect(),
        }
    }
}

/// Container sub-format discriminator byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SaveType {
    Single = 0x31,
    Double = 0x32,
}

/// Save classes written with the double-layer format.
const DOUBLE_LAYER_CLASSES: [&str; 2] = ["Pal.PalWorldSaveGame", "Pal.PalLocalWorldSaveGame"];

impl SaveType {
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Picks the discriminator from the decoded header. Forcing zlib always
    /// wins over the header.
    pub fn select(save_game_class_name: Option<&str>, compression: Compression) -> Self {
        let from_header = match save_game_class_name {
            Some(name) if DOUBLE_LAYER_CLASSES.iter().any(|c| name.contains(c)) => {
                SaveType::Double
            }
            _ => SaveType::Single,
        };
        if compression == Compression::Zlib {
            return SaveType::Double;
        }
        from_header
    }

    pub fn for_document(doc: &Document, compression: Compression) -> Self {
        let class = crate::path::get(doc, &["header", "save_game_class_name"])
            .and_then(|v| v.as_str());
        Self::select(class, compression)
    }

    /// Reads the discriminator from raw container bytes, if the header is
    /// one of the known magics.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        let magic = data.get(8..11)?;
        if magic != b"PlZ" && magic != b"PlM" {
            return None;
        }
        match *data.get(11)? {
            0x31 => Some(SaveType::Single),
            0x32 => Some(SaveType::Double),
            _ => None,
        }
    }
}

impl fmt::Display for SaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.byte())
    }
}

/// Compression library used when writing `.sav` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    Zlib,
    #[default]
    Libooz,
}

impl Compression {
    pub fn as_str(self) -> &'static str {
        match self {
            Compression::Zlib => "zlib",
            Compression::Libooz => "libooz",
        }
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zlib" => Ok(Compression::Zlib),
            "libooz" => Ok(Compression::Libooz),
            other => Err(format!("unknown compression library '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub custom_properties: CustomProperties,
    pub nan: NanPolicy,
}

#[derive(Debug, Clone)]
pub struct Decoded {
    pub document: Document,
    /// Discriminator found in the container header, when recognisable
    pub save_type: Option<SaveType>,
}

pub trait SaveCodec: Send + Sync {
    fn decode(&self, data: &[u8], opts: &DecodeOptions) -> Result<Decoded, CodecError>;

    fn encode(
        &self,
        doc: &Document,
        save_type: SaveType,
        compression: Compression,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Gateway backed by an external converter program.
#[derive(Debug, Clone)]
pub struct ExternalCodec {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCodec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Leading arguments passed before the sub-command (e.g. a script path).
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn run(&self, sub_args: &[String], input: &[u8]) -> Result<Vec<u8>, CodecError> {
        log::debug!("running {} {:?}", self.program.display(), sub_args);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(sub_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let (Some(mut stdin), Some(mut stdout), Some(mut stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(CodecError::Format("codec pipes unavailable".to_string()));
        };
        // stdin and stderr are pumped on their own threads so no pipe can fill up
        let (out, err) = std::thread::scope(|s| {
            let writer = s.spawn(move || stdin.write_all(input));
            let errs = s.spawn(move || {
                let mut buf = Vec::new();
                stderr.read_to_end(&mut buf).map(|_| buf)
            });
            let mut out = Vec::new();
            let read = stdout.read_to_end(&mut out);
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("codec writer panicked")));
            let err = errs.join().ok().and_then(Result::ok).unwrap_or_default();
            (read.and(written).map(|_| out), err)
        });
        let status = child.wait()?;
        if !status.success() {
            let msg = String::from_utf8_lossy(&err).trim().to_string();
            return Err(CodecError::Format(if msg.is_empty() {
                format!("codec exited with {}", status)
            } else {
                msg
            }));
        }
        Ok(out?)
    }
}

impl SaveCodec for ExternalCodec {
    fn decode(&self, data: &[u8], opts: &DecodeOptions) -> Result<Decoded, CodecError> {
        let list = match &opts.custom_properties {
            CustomProperties::All => "all".to_string(),
            selected => selected.resolve().join(","),
        };
        let mut args = vec![
            "decode".to_string(),
            "--custom-properties".to_string(),
            list,
        ];
        if !opts.nan.allows_nan() {
            args.push("--convert-nan-to-null".to_string());
        }
        let out = self.run(&args, data)?;
        let text = std::str::from_utf8(&out)
            .map_err(|_| CodecError::Format("codec produced non-utf8 JSON".to_string()))?;
        Ok(Decoded {
            document: json::parse_document(text)?,
            save_type: SaveType::sniff(data),
        })
    }

    fn encode(
        &self,
        doc: &Document,
        save_type: SaveType,
        compression: Compression,
    ) -> Result<Vec<u8>, CodecError> {
        let text = json::write_document(doc, &JsonOpts::minified(NanPolicy::Preserve));
        let args = [
            "encode".to_string(),
            "--save-type".to_string(),
            save_type.to_string(),
            "--library".to_string(),
            compression.as_str().to_string(),
        ];
        self.run(&args, text.as_bytes())
    }
}
