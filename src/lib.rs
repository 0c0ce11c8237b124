#![forbid(unsafe_code)]

pub mod assets;
pub mod compose;
pub mod error;
pub mod export;
pub mod guide;
pub mod layout;
pub mod model;
pub mod plan;
pub mod render;
pub mod text;

pub use assets::{
    AssetSource, FontLibrary, FontSlot, FsAssetSource, MemoryAssetSource, PreparedAssets,
    PreparedBitmap,
};
pub use error::{CartolinaError, CartolinaResult};
pub use export::Artifact;
pub use model::{
    BackMode, BitmapRef, FontFamily, Postcard, Postmark, Recipient, Stamp, TextStyle,
    VerticalAlign,
};
pub use plan::{DrawOp, FacePlan};
pub use render::{FaceRaster, Rasterizer};

/// Render one export artifact for `card`.
///
/// `Front` and `Back` return a single face; `Both` renders both faces and
/// stacks them on one sheet. `assets` must have been prepared for this
/// artifact (`Both` covers the single faces). Callers validate the card at
/// the boundary where it was read.
#[tracing::instrument(skip(card, assets, raster))]
pub fn render_artifact(
    card: &Postcard,
    assets: &PreparedAssets,
    raster: &mut Rasterizer,
    artifact: Artifact,
) -> CartolinaResult<FaceRaster> {
    match artifact {
        Artifact::Front => front_raster(card, assets, raster),
        Artifact::Back => back_raster(card, assets, raster),
        Artifact::Both => {
            let front = front_raster(card, assets, raster)?;
            let back = back_raster(card, assets, raster)?;
            compose::stack_vertical(&front, &back)
        }
    }
}

fn front_raster(
    card: &Postcard,
    assets: &PreparedAssets,
    raster: &mut Rasterizer,
) -> CartolinaResult<FaceRaster> {
    let plan = plan::front_plan(card, assets);
    raster.render_face(&plan, assets)
}

fn back_raster(
    card: &Postcard,
    assets: &PreparedAssets,
    raster: &mut Rasterizer,
) -> CartolinaResult<FaceRaster> {
    let plan = {
        let slot = FontSlot::for_family(card.text_style.font_family);
        let mut measure =
            raster.measure_for(&assets.fonts, slot, card.text_style.font_size as f32);
        plan::back_plan(card, assets, &mut measure)
    };
    raster.render_face(&plan, assets)
}
