// File-to-file conversion between .sav and JSON.
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::codec::{Compression, CustomProperties, DecodeOptions, SaveCodec, SaveType};
use crate::error::ConvertError;
use crate::json::{self, JsonOpts};
use crate::prune::{self, SaveMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToJson,
    FromJson,
}

impl Direction {
    /// Explicit flags win; otherwise the file suffix decides.
    pub fn detect(input: &Path, to_json: bool, from_json: bool) -> Result<Self, ConvertError> {
        match (to_json, from_json) {
            (true, true) => Err(ConvertError::ConflictingDirection),
            (true, false) => Ok(Direction::ToJson),
            (false, true) => Ok(Direction::FromJson),
            (false, false) => {
                let name = input.to_string_lossy();
                if name.ends_with(".sav") {
                    Ok(Direction::ToJson)
                } else if name.ends_with(".json") {
                    Ok(Direction::FromJson)
                } else {
                    Err(ConvertError::UnknownDirection(input.to_path_buf()))
                }
            }
        }
    }

    /// `<file>.json` for sav→json; the path with `.json` removed otherwise.
    pub fn default_output(self, input: &Path) -> PathBuf {
        let name = input.to_string_lossy();
        match self {
            Direction::ToJson => PathBuf::from(format!("{}.json", name)),
            Direction::FromJson => PathBuf::from(name.replace(".json", "")),
        }
    }
}

/// Yes/no confirmation before a destructive step.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Blocking `(y/n)` prompt; anything but `y`/`n` asks again. End of input
/// counts as "no".
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let mut line = String::new();
        loop {
            write!(self.output, "{} (y/n): ", question)?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(false);
            }
            match line.trim_end_matches(['\r', '\n']).to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SavToJsonOpts {
    pub force: bool,
    pub json: JsonOpts,
    pub custom_properties: CustomProperties,
    /// Reduce the dump to the whitelist of this mode before writing
    pub prune: Option<SaveMode>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonToSavOpts {
    pub force: bool,
    pub compression: Compression,
}

pub struct Converter<'a, C> {
    codec: &'a dyn SaveCodec,
    confirm: C,
}

impl<'a, C: Confirm> Converter<'a, C> {
    pub fn new(codec: &'a dyn SaveCodec, confirm: C) -> Self {
        Self { codec, confirm }
    }

    pub fn sav_to_json(
        &mut self,
        input: &Path,
        output: &Path,
        opts: &SavToJsonOpts,
    ) -> Result<(), ConvertError> {
        check_input(input)?;
        println!(
            "Converting {} to JSON, saving to {}",
            input.display(),
            output.display()
        );
        self.check_overwrite(output, opts.force)?;
        println!("Decompressing sav file");
        let data = std::fs::read(input)?;
        println!("Loading GVAS file");
        let decoded = self.codec.decode(
            &data,
            &DecodeOptions {
                custom_properties: opts.custom_properties.clone(),
                nan: opts.json.nan,
            },
        )?;
        if let Some(t) = decoded.save_type {
            log::debug!("{} uses save type {}", input.display(), t);
        }
        let doc = match opts.prune {
            Some(mode) => prune::pruned(&decoded.document, mode),
            None => decoded.document,
        };
        println!("Writing JSON to {}", output.display());
        let text = json::write_document(&doc, &opts.json);
        write_atomic(output, text.as_bytes())?;
        Ok(())
    }

    pub fn json_to_sav(
        &mut self,
        input: &Path,
        output: &Path,
        opts: &JsonToSavOpts,
    ) -> Result<(), ConvertError> {
        check_input(input)?;
        println!(
            "Converting {} to SAV, saving to {}",
            input.display(),
            output.display()
        );
        self.check_overwrite(output, opts.force)?;
        println!("Loading JSON from {}", input.display());
        let text = std::fs::read_to_string(input)?;
        let doc = json::parse_document(&text)?;
        println!("Compressing SAV file");
        let save_type = SaveType::for_document(&doc, opts.compression);
        log::debug!("encoding with save type {}", save_type);
        let bytes = self.codec.encode(&doc, save_type, opts.compression)?;
        println!("Writing SAV file to {}", output.display());
        write_atomic(output, &bytes)?;
        Ok(())
    }

    fn check_overwrite(&mut self, output: &Path, force: bool) -> Result<(), ConvertError> {
        if !output.exists() {
            return Ok(());
        }
        println!(
            "{} already exists, this will overwrite the file",
            output.display()
        );
        if force || self.confirm.confirm("Are you sure you want to continue?")? {
            Ok(())
        } else {
            Err(ConvertError::Declined(output.to_path_buf()))
        }
    }
}

pub fn check_input(path: &Path) -> Result<(), ConvertError> {
    if !path.exists() {
        return Err(ConvertError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ConvertError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// Writes through a temp file in the destination directory and renames it
/// into place, so a failed write never leaves a truncated destination.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
