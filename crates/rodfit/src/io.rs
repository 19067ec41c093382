//! Numbered image files as a [`FrameSource`].
//!
//! A sequence is described by a printf-style pattern with exactly one integer
//! placeholder (`%d`, `%5d` or `%05d`; `%%` is a literal percent sign) and a
//! start index. Files are discovered once, at open, by probing consecutive
//! indices until the first missing file. Decoding happens on every `get`.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use log::debug;
use rodfit_core::{Frame, FrameError, FrameSource};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors raised while opening an image sequence.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("invalid frame pattern `{pattern}`: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("no such file: {}", path.display())]
    NoFrames { path: PathBuf },
}

/// Channel layout frames are decoded into.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// One luma channel.
    #[default]
    Gray,
    /// Three RGB channels.
    Color,
}

impl ReadMode {
    pub fn channels(self) -> usize {
        match self {
            ReadMode::Gray => 1,
            ReadMode::Color => 3,
        }
    }
}

/// Widest `%Nd` field accepted.
const MAX_FIELD_WIDTH: usize = 64;

enum Piece {
    Literal(String),
    Index { width: usize, zero_pad: bool },
}

fn parse_pattern(pattern: &str) -> Result<Vec<Piece>, IoError> {
    let invalid = |reason| IoError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut placeholders = 0;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            literal.push('%');
            continue;
        }
        let zero_pad = chars.next_if_eq(&'0').is_some();
        let mut width = 0usize;
        while let Some(d) = chars.next_if(char::is_ascii_digit) {
            width = d
                .to_digit(10)
                .and_then(|v| width.checked_mul(10)?.checked_add(v as usize))
                .filter(|&w| w <= MAX_FIELD_WIDTH)
                .ok_or_else(|| invalid("field width too large"))?;
        }
        if chars.next() != Some('d') {
            return Err(invalid("only %d, %Nd, %0Nd and %% are supported"));
        }
        placeholders += 1;
        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        pieces.push(Piece::Index { width, zero_pad });
    }
    pieces.push(Piece::Literal(literal));

    match placeholders {
        1 => Ok(pieces),
        0 => Err(invalid("no integer placeholder")),
        _ => Err(invalid("more than one integer placeholder")),
    }
}

fn render(pieces: &[Piece], index: usize) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Literal(s) => out.push_str(s),
            &Piece::Index { width, zero_pad } => {
                if zero_pad {
                    out.push_str(&format!("{index:0width$}"));
                } else {
                    out.push_str(&format!("{index:width$}"));
                }
            }
        }
    }
    out
}

/// Substitute `index` into `pattern`.
///
/// ```
/// use rodfit::io::format_pattern;
///
/// assert_eq!(format_pattern("frames/img%04d.png", 7).unwrap(), "frames/img0007.png");
/// assert_eq!(format_pattern("100%%_%d.tif", 12).unwrap(), "100%_12.tif");
/// ```
pub fn format_pattern(pattern: &str, index: usize) -> Result<String, IoError> {
    Ok(render(&parse_pattern(pattern)?, index))
}

/// Lazily decoded sequence of numbered image files.
#[derive(Clone, Debug)]
pub struct ImageSequence {
    pattern: String,
    start: usize,
    mode: ReadMode,
    paths: Vec<PathBuf>,
}

impl ImageSequence {
    /// Discover `pattern % start`, `pattern % (start + 1)`, ... up to the
    /// first missing file.
    #[cfg_attr(feature = "tracing", instrument(level = "info"))]
    pub fn open(pattern: &str, start: usize, mode: ReadMode) -> Result<Self, IoError> {
        let pieces = parse_pattern(pattern)?;
        let paths: Vec<PathBuf> = (start..)
            .map(|i| PathBuf::from(render(&pieces, i)))
            .take_while(|p| p.is_file())
            .collect();
        if paths.is_empty() {
            return Err(IoError::NoFrames {
                path: PathBuf::from(render(&pieces, start)),
            });
        }
        debug!("found {} frames for `{pattern}` from {start}", paths.len());
        Ok(Self {
            pattern: pattern.to_string(),
            start,
            mode,
            paths,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }
}

/// Convert a decoded image into a `u8` frame in the requested layout.
pub fn frame_from_image(img: DynamicImage, mode: ReadMode) -> Result<Frame<u8>, FrameError> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let data = match mode {
        ReadMode::Gray => img.into_luma8().into_raw(),
        ReadMode::Color => img.into_rgb8().into_raw(),
    };
    Frame::from_vec(width, height, mode.channels(), data)
}

impl FrameSource for ImageSequence {
    type Pixel = u8;

    fn len(&self) -> usize {
        self.paths.len()
    }

    fn get(&self, index: usize) -> Result<Frame<u8>, FrameError> {
        self.check_index(index)?;
        let path = &self.paths[index];
        let img = image::open(path).map_err(|e| FrameError::Source {
            index,
            source: Box::new(e),
        })?;
        frame_from_image(img, self.mode)
    }
}
