//! Font resolution for PDF reports.
//!
//! The built-in PDF fonts only cover Latin-1, so the PDF backend tries to
//! embed a TrueType font with wider script coverage first. How that font is
//! found is a [`FontResolver`] strategy, so that tests never touch the
//! filesystem.

use std::collections::HashMap;
use std::path::PathBuf;

use log::{debug, info};

use crate::config::{FontCandidate, ReportFeat};

/// A TrueType font loaded into memory.
#[derive(Clone)]
pub struct ResolvedFont {
    /// The name the font is registered under.
    pub name: String,
    /// Where the font was found, if it came from disk.
    pub path: Option<PathBuf>,
    /// The raw font file.
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Finds a font to embed. `None` means the backend falls back to its
/// built-in serif font.
pub trait FontResolver {
    /// Looks the font up. Called once per build.
    fn resolve(&self) -> Option<ResolvedFont>;
}

impl<R: FontResolver + ?Sized> FontResolver for Box<R> {
    fn resolve(&self) -> Option<ResolvedFont> {
        (**self).resolve()
    }
}

/// Probes a fixed list of font files across a fixed list of directories.
///
/// Candidates are tried in order, and for each candidate every directory in
/// order. The first readable file wins.
#[derive(Debug, Clone)]
pub struct ProbeFontResolver {
    candidates: Vec<FontCandidate>,
    dirs: Vec<PathBuf>,
}

impl ProbeFontResolver {
    /// Probes `candidates` across `dirs`.
    pub fn new(candidates: Vec<FontCandidate>, dirs: Vec<PathBuf>) -> Self {
        Self { candidates, dirs }
    }

    /// Probes the candidates and directories configured in `feat`.
    pub fn from_feat(feat: &ReportFeat) -> Self {
        Self::new(feat.font_candidates.clone(), feat.font_dirs.clone())
    }
}

impl FontResolver for ProbeFontResolver {
    fn resolve(&self) -> Option<ResolvedFont> {
        for candidate in &self.candidates {
            for dir in &self.dirs {
                let path = dir.join(&candidate.file);
                if !path.is_file() {
                    continue;
                }

                match std::fs::read(&path) {
                    Ok(data) => {
                        info!("using font {} from {}", candidate.name, path.display());
                        return Some(ResolvedFont {
                            name: candidate.name.clone(),
                            path: Some(path),
                            data,
                        });
                    }
                    Err(err) => debug!("cannot read font {}: {err}", path.display()),
                }
            }
        }

        info!("no font candidate found, using the built-in font");
        None
    }
}

/// Queries the system font database by family name.
#[derive(Debug, Clone)]
pub struct SystemFontResolver {
    families: Vec<String>,
}

impl SystemFontResolver {
    /// Queries `families` in order.
    pub fn new(families: Vec<String>) -> Self {
        Self { families }
    }
}

impl Default for SystemFontResolver {
    fn default() -> Self {
        Self::new(
            ["Times New Roman", "Arial", "DejaVu Sans"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }
}

impl FontResolver for SystemFontResolver {
    fn resolve(&self) -> Option<ResolvedFont> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        for family in &self.families {
            let families = [fontdb::Family::Name(family.as_str())];
            let query = fontdb::Query {
                families: &families,
                ..Default::default()
            };

            let Some(id) = db.query(&query) else {
                continue;
            };
            // Only collections need a face index, which the PDF backend
            // cannot select, so skip them.
            let data = db.with_face_data(id, |data, index| (index == 0).then(|| data.to_vec()));
            if let Some(Some(data)) = data {
                let path = match db.face_source(id) {
                    Some((fontdb::Source::File(path), _)) => Some(path),
                    _ => None,
                };
                info!("using system font {family}");
                return Some(ResolvedFont {
                    name: family.replace(' ', ""),
                    path,
                    data,
                });
            }
        }

        info!("no system font found, using the built-in font");
        None
    }
}

/// Always falls back to the built-in font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFontResolver;

impl FontResolver for BuiltinFontResolver {
    fn resolve(&self) -> Option<ResolvedFont> {
        None
    }
}

/// Horizontal text metrics used for line wrapping.
pub enum FontMetrics {
    /// The built-in serif font. Widths are approximated.
    Builtin,
    /// An embedded TrueType font: advances from its `hmtx` table, in ems,
    /// keyed by character.
    External(HashMap<char, f32>),
}

/// Average advance of a Times-Roman glyph, as a fraction of the font size.
const BUILTIN_AVG_ADVANCE: f32 = 0.5;

impl FontMetrics {
    /// Reads the advance of every character mapped by the font. `None` if
    /// the data is not a font `ttf-parser` understands.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units = face.units_per_em() as f32;

        let mut codepoints = Vec::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if subtable.is_unicode() {
                    subtable.codepoints(|cp| codepoints.push(cp));
                }
            }
        }

        let advances: HashMap<char, f32> = codepoints
            .into_iter()
            .filter_map(char::from_u32)
            .filter_map(|c| {
                let advance = face.glyph_hor_advance(face.glyph_index(c)?)?;
                Some((c, advance as f32 / units))
            })
            .collect();
        debug!("measured {} glyph advances", advances.len());

        Some(FontMetrics::External(advances))
    }

    /// The advance width of `text` at `size`, in points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        match self {
            FontMetrics::Builtin => text.chars().count() as f32 * size * BUILTIN_AVG_ADVANCE,
            FontMetrics::External(advances) => {
                let advance: f32 = text
                    .chars()
                    .map(|c| advances.get(&c).copied().unwrap_or(BUILTIN_AVG_ADVANCE))
                    .sum();
                advance * size
            }
        }
    }

    /// Breaks `text` into lines no wider than `max_width` points.
    ///
    /// Explicit newlines are kept. A single word wider than the line is
    /// split between characters.
    pub fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if line.is_empty() {
                    word.to_owned()
                } else {
                    format!("{line} {word}")
                };

                if self.text_width(&candidate, size) <= max_width {
                    line = candidate;
                    continue;
                }

                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                for c in word.chars() {
                    line.push(c);
                    if self.text_width(&line, size) > max_width && line.chars().count() > 1 {
                        line.pop();
                        lines.push(std::mem::take(&mut line));
                        line.push(c);
                    }
                }
            }
            lines.push(line);
        }

        lines
    }
}
