//! DGIndex project (`.d2v`) files.
//!
//! A D2V file is what the MPEG-2 indexer leaves behind: the list of source
//! files, a block of `Key=Value` settings, and one data line per GOP with a
//! flag byte for every picture in it. [`D2vIndex`] parses that text and
//! turns the flag bytes into the [`FrameFlags`] sequence the rest of the
//! crate works on.
//!
//! ```text
//! DGIndexProjectFile16
//! 1
//! /media/VTS_01_1.VOB
//!
//! Stream_Type=1
//! Aspect_Ratio=4:3
//! Picture_Size=720x480
//! Frame_Rate=29970 (30000/1001)
//!
//! 900 5 0 2048 0 0 0 d2 f0 e3 f1 e2 f0
//! 900 5 0 10240 0 0 1 92 b2 a2 b2 a2 b2 ff
//!
//! FINISHED  100.00% VIDEO
//! ```
//!
//! # Example
//!
//! ```no_run
//! use untelecine::{D2vIndex, UntelecineError};
//!
//! let index = D2vIndex::open("VTS_01_1.d2v")?;
//! println!("{} frames @ {}", index.frame_count(), index.frame_rate()?);
//! # Ok::<(), UntelecineError>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::UntelecineError;
use crate::flags::FrameFlags;
use crate::rational::FrameRate;

const HEADER_PREFIX: &str = "DGIndexProjectFile";
const END_OF_STREAM: u8 = 0xff;

const FLAG_RFF: u8 = 0x01;
const FLAG_TFF: u8 = 0x02;
const FLAG_PICTURE_TYPE: u8 = 0x30;
const FLAG_PROGRESSIVE: u8 = 0x40;
const FLAG_CLOSED_GOP: u8 = 0x80;

/// MPEG picture coding type stored in bits 4-5 of a flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureType {
    /// Intra-coded.
    I,
    /// Predicted.
    P,
    /// Bidirectionally predicted.
    B,
}

impl PictureType {
    fn from_flag(flag: u8) -> Option<Self> {
        match (flag & FLAG_PICTURE_TYPE) >> 4 {
            1 => Some(PictureType::I),
            2 => Some(PictureType::P),
            3 => Some(PictureType::B),
            _ => None,
        }
    }
}

/// One data line of a D2V file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct D2vEntry {
    /// Info field (hex).
    pub info: u32,
    /// Colour matrix.
    pub matrix: u32,
    /// Index into the source file list.
    pub file: u32,
    /// Byte position of the GOP in that file.
    pub position: u64,
    /// Leading pictures to skip.
    pub skip: u32,
    /// VOB identifier.
    pub vob: u32,
    /// Cell identifier.
    pub cell: u32,
    /// One flag byte per picture, end-of-stream marker removed.
    pub flags: Vec<u8>,
}

impl D2vEntry {
    /// Whether the GOP can be decoded without the previous one.
    pub fn is_closed_gop(&self) -> bool {
        self.flags.first().is_some_and(|flag| flag & FLAG_CLOSED_GOP != 0)
    }
}

/// A parsed DGIndex project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct D2vIndex {
    /// Format version from the header line, e.g. `16`.
    pub version: u32,
    /// Source files the index points at.
    pub videos: Vec<PathBuf>,
    /// Raw settings, parenthetical comments included.
    pub settings: BTreeMap<String, String>,
    /// Data lines in file order.
    pub entries: Vec<D2vEntry>,
    /// Path the index was read from, if it came from disk.
    pub path: Option<PathBuf>,
}

fn parse_error(line: usize, reason: impl Into<String>) -> UntelecineError {
    UntelecineError::IndexParse {
        line,
        reason: reason.into(),
    }
}

fn parse_entry(line_number: usize, line: &str) -> Result<D2vEntry, UntelecineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 7 {
        return Err(parse_error(
            line_number,
            format!("expected at least 7 fields, found {}", fields.len()),
        ));
    }
    let decimal = |position: usize, name: &str| -> Result<u64, UntelecineError> {
        fields[position]
            .parse()
            .map_err(|_| parse_error(line_number, format!("invalid {name} '{}'", fields[position])))
    };
    let narrow = |value: u64, name: &str| -> Result<u32, UntelecineError> {
        u32::try_from(value).map_err(|_| parse_error(line_number, format!("{name} out of range")))
    };

    let info = u32::from_str_radix(fields[0], 16)
        .map_err(|_| parse_error(line_number, format!("invalid info '{}'", fields[0])))?;
    let flags = fields[7..]
        .iter()
        .map(|flag| {
            u8::from_str_radix(flag, 16)
                .map_err(|_| parse_error(line_number, format!("invalid flag byte '{flag}'")))
        })
        .filter(|flag| !matches!(flag, Ok(END_OF_STREAM)))
        .collect::<Result<Vec<u8>, UntelecineError>>()?;

    Ok(D2vEntry {
        info,
        matrix: narrow(decimal(1, "matrix")?, "matrix")?,
        file: narrow(decimal(2, "file")?, "file")?,
        position: decimal(3, "position")?,
        skip: narrow(decimal(4, "skip")?, "skip")?,
        vob: narrow(decimal(5, "vob")?, "vob")?,
        cell: narrow(decimal(6, "cell")?, "cell")?,
        flags,
    })
}

impl D2vIndex {
    /// Read and parse a D2V file.
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::IndexOpen`] if the file cannot be read and
    /// [`UntelecineError::IndexParse`] if it is malformed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, UntelecineError> {
        let path = path.as_ref();
        log::debug!("Opening D2V index: {}", path.display());
        let text = fs::read_to_string(path).map_err(|error| UntelecineError::IndexOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        let mut index = Self::parse(&text)?;
        index.path = Some(path.to_path_buf());
        Ok(index)
    }

    /// Parse D2V text.
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::IndexParse`] naming the first bad line.
    pub fn parse(text: &str) -> Result<Self, UntelecineError> {
        let mut lines = text.lines().enumerate().map(|(index, line)| (index + 1, line.trim_end()));

        let (_, header) = lines.next().ok_or_else(|| parse_error(1, "empty file"))?;
        let version = header
            .strip_prefix(HEADER_PREFIX)
            .ok_or_else(|| parse_error(1, format!("expected '{HEADER_PREFIX}NN' header")))?
            .parse::<u32>()
            .map_err(|_| parse_error(1, "invalid header version"))?;

        let (count_line, count) = lines.next().ok_or_else(|| parse_error(2, "missing file count"))?;
        let count: usize = count
            .trim()
            .parse()
            .map_err(|_| parse_error(count_line, format!("invalid file count '{count}'")))?;
        let mut videos = Vec::with_capacity(count);
        for _ in 0..count {
            let (line_number, video) = lines
                .next()
                .ok_or_else(|| parse_error(count_line, "file list is shorter than its count"))?;
            if video.is_empty() {
                return Err(parse_error(line_number, "empty source file path"));
            }
            videos.push(PathBuf::from(video));
        }

        let mut settings = BTreeMap::new();
        let mut in_settings = false;
        let mut entries = Vec::new();
        for (line_number, line) in lines.by_ref() {
            if line.is_empty() {
                if in_settings {
                    break;
                }
                continue;
            }
            in_settings = true;
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| parse_error(line_number, format!("expected Key=Value, found '{line}'")))?;
            settings.insert(key.trim().to_string(), value.trim().to_string());
        }

        for (line_number, line) in lines {
            if line.is_empty() {
                continue;
            }
            if line.starts_with("FINISHED") {
                break;
            }
            entries.push(parse_entry(line_number, line)?);
        }

        let index = Self {
            version,
            videos,
            settings,
            entries,
            path: None,
        };
        log::debug!(
            "Parsed D2V v{}: {} files, {} GOPs, {} frames",
            index.version,
            index.videos.len(),
            index.entries.len(),
            index.frame_count()
        );
        Ok(index)
    }

    /// A setting with any trailing `(comment)` removed.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(|value| match value.find(" (") {
            Some(end) => value[..end].trim(),
            None => value.as_str(),
        })
    }

    /// Number of frames described by the index.
    pub fn frame_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.flags.len()).sum()
    }

    /// Per-frame scan flags.
    pub fn flags(&self) -> Vec<FrameFlags> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry.flags.iter().map(|&flag| FrameFlags {
                    progressive: flag & FLAG_PROGRESSIVE != 0,
                    rff: flag & FLAG_RFF != 0,
                    tff: flag & FLAG_TFF != 0,
                    vob: entry.vob,
                    cell: entry.cell,
                })
            })
            .collect()
    }

    /// Per-frame picture coding types.
    pub fn picture_types(&self) -> Vec<Option<PictureType>> {
        self.entries
            .iter()
            .flat_map(|entry| entry.flags.iter().map(|&flag| PictureType::from_flag(flag)))
            .collect()
    }

    /// Declared frame rate from `Frame_Rate`.
    ///
    /// Uses the exact `(num/den)` comment when present, otherwise the value
    /// in thousandths of a frame per second.
    ///
    /// # Errors
    ///
    /// Returns [`UntelecineError::InvalidFrameRate`] if the setting is
    /// missing or unreadable.
    pub fn frame_rate(&self) -> Result<FrameRate, UntelecineError> {
        let raw = self
            .settings
            .get("Frame_Rate")
            .ok_or_else(|| UntelecineError::InvalidFrameRate("no Frame_Rate setting".to_string()))?;
        if let Some(exact) = raw
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(inside, _)| inside)
        {
            return exact.parse();
        }
        let millis: u64 = raw
            .trim()
            .parse()
            .map_err(|_| UntelecineError::InvalidFrameRate(raw.clone()))?;
        match millis {
            23976 => Ok(FrameRate::NTSC_FILM),
            29970 => Ok(FrameRate::NTSC),
            59940 => Ok(FrameRate::NTSC_FIELDS),
            _ => FrameRate::new(millis, 1000),
        }
    }

    /// Display aspect ratio, the first one if several are listed.
    pub fn aspect_ratio(&self) -> Option<&str> {
        self.setting("Aspect_Ratio")
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Coded picture size as `(width, height)`.
    pub fn picture_size(&self) -> Option<(u32, u32)> {
        let (width, height) = self.setting("Picture_Size")?.split_once('x')?;
        Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
    }
}
