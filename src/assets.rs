use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;

use crate::{
    error::{CartolinaError, CartolinaResult},
    export::Artifact,
    model::{BackMode, FontFamily, Postcard, Stamp},
};

/// The seam through which every external byte enters the pipeline. Rendering
/// itself never performs IO; everything a plan can reference is resolved and
/// decoded by [`PreparedAssets::prepare`] before any drawing starts.
pub trait AssetSource {
    fn load(&self, rel_path: &str) -> CartolinaResult<Vec<u8>>;
}

/// Loads assets from a root directory using sanitized relative paths.
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, rel_path: &str) -> CartolinaResult<Vec<u8>> {
        let norm = normalize_rel_path(rel_path)?;
        let path = self.root.join(&norm);
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(CartolinaError::from)
    }
}

/// In-process source for embedders and tests.
#[derive(Default)]
pub struct MemoryAssetSource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rel_path: &str, bytes: Vec<u8>) -> CartolinaResult<()> {
        self.files.insert(normalize_rel_path(rel_path)?, bytes);
        Ok(())
    }
}

impl AssetSource for MemoryAssetSource {
    fn load(&self, rel_path: &str) -> CartolinaResult<Vec<u8>> {
        let norm = normalize_rel_path(rel_path)?;
        self.files
            .get(&norm)
            .cloned()
            .ok_or_else(|| CartolinaError::asset(format!("no asset at '{norm}'")))
    }
}

/// Normalize and validate source-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CartolinaResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CartolinaError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(CartolinaError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CartolinaError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CartolinaError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Decoded bitmap in premultiplied RGBA8 form, ready for the rasterizer.
#[derive(Clone, Debug)]
pub struct PreparedBitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major, tightly packed, premultiplied.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedBitmap {
    #[cfg(test)]
    pub(crate) fn solid(width: u32, height: u32, premul_rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&premul_rgba);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }
}

/// Decode any format the `image` crate understands and premultiply.
pub fn decode_bitmap(bytes: &[u8]) -> CartolinaResult<PreparedBitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode bitmap from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedBitmap {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Font roles the faces draw with. The first four are user-selectable
/// message families; `Sans` covers labels, the stamp glyph and the postmark;
/// `Serif` is the shared fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontSlot {
    Kaiti,
    Simsun,
    Yahei,
    Cursive,
    Sans,
    Serif,
}

impl FontSlot {
    pub const ALL: [FontSlot; 6] = [
        FontSlot::Kaiti,
        FontSlot::Simsun,
        FontSlot::Yahei,
        FontSlot::Cursive,
        FontSlot::Sans,
        FontSlot::Serif,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            FontSlot::Kaiti => "kaiti",
            FontSlot::Simsun => "simsun",
            FontSlot::Yahei => "yahei",
            FontSlot::Cursive => "cursive",
            FontSlot::Sans => "sans",
            FontSlot::Serif => "serif",
        }
    }

    pub fn for_family(family: FontFamily) -> Self {
        match family {
            FontFamily::Kaiti => FontSlot::Kaiti,
            FontFamily::Simsun => FontSlot::Simsun,
            FontFamily::Yahei => FontSlot::Yahei,
            FontFamily::Cursive => FontSlot::Cursive,
        }
    }
}

/// Raw font bytes per slot, loaded by convention from `fonts/<slug>.ttf`
/// (then `.otf`) under the asset source. Absent files are not errors: a
/// missing slot falls back to `Serif`, and a missing fallback means text ops
/// are skipped while geometry still renders.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    slots: BTreeMap<FontSlot, Arc<Vec<u8>>>,
}

impl FontLibrary {
    pub fn load(source: &dyn AssetSource) -> Self {
        let mut slots = BTreeMap::new();
        for slot in FontSlot::ALL {
            for ext in ["ttf", "otf"] {
                let rel = format!("fonts/{}.{ext}", slot.slug());
                if let Ok(bytes) = source.load(&rel) {
                    slots.insert(slot, Arc::new(bytes));
                    break;
                }
            }
        }
        Self { slots }
    }

    pub fn bytes(&self, slot: FontSlot) -> Option<Arc<Vec<u8>>> {
        self.slots.get(&slot).cloned()
    }

    /// The slot actually used for a request: itself if loaded, else the
    /// serif fallback, else nothing.
    pub fn resolve(&self, slot: FontSlot) -> Option<FontSlot> {
        if self.slots.contains_key(&slot) {
            Some(slot)
        } else if self.slots.contains_key(&FontSlot::Serif) {
            Some(FontSlot::Serif)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn with_slot(slot: FontSlot, bytes: Vec<u8>) -> Self {
        let mut slots = BTreeMap::new();
        slots.insert(slot, Arc::new(bytes));
        Self { slots }
    }
}

/// Everything the requested faces can reference, resolved up front. After
/// `prepare` returns, rendering runs synchronously with no further IO.
#[derive(Clone, Debug, Default)]
pub struct PreparedAssets {
    pub front: Option<PreparedBitmap>,
    pub back_content: Option<PreparedBitmap>,
    pub stamp: Option<PreparedBitmap>,
    pub fonts: FontLibrary,
}

impl PreparedAssets {
    /// Resolve and decode every bitmap the artifact's faces draw and load
    /// the font slots. Handles nothing will draw stay untouched: the face
    /// the artifact leaves out, and the back handle not selected by
    /// `back_mode`. A missing or undecodable bitmap that would be drawn
    /// aborts the whole prepare; fonts degrade silently.
    #[tracing::instrument(skip(card, source))]
    pub fn prepare(
        card: &Postcard,
        source: &dyn AssetSource,
        artifact: Artifact,
    ) -> CartolinaResult<Self> {
        let wants_front = matches!(artifact, Artifact::Front | Artifact::Both);
        let wants_back = matches!(artifact, Artifact::Back | Artifact::Both);

        let front = match &card.front_image {
            Some(bitmap) if wants_front => Some(decode_bitmap(&source.load(bitmap.as_str())?)?),
            _ => None,
        };
        let back_content = match &card.back_image {
            Some(bitmap) if wants_back && card.back_mode == BackMode::Image => {
                Some(decode_bitmap(&source.load(bitmap.as_str())?)?)
            }
            _ => None,
        };
        let stamp = match &card.stamp {
            Stamp::PresetImage { bitmap } | Stamp::CustomImage { bitmap } if wants_back => {
                Some(decode_bitmap(&source.load(bitmap.as_str())?)?)
            }
            _ => None,
        };

        Ok(Self {
            front,
            back_content,
            stamp,
            fonts: FontLibrary::load(source),
        })
    }
}
