use std::io::Cursor;
use std::path::Path;

use crate::{
    error::{CartolinaError, CartolinaResult},
    render::FaceRaster,
};

/// Which export a render request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Artifact {
    Front,
    Back,
    /// Both faces stacked on one sheet, front above back.
    Both,
}

impl Artifact {
    pub fn filename(self) -> &'static str {
        match self {
            Artifact::Front => "front.png",
            Artifact::Back => "back.png",
            Artifact::Both => "both.png",
        }
    }
}

/// Convert premultiplied RGBA8 back to straight alpha for PNG.
pub fn unpremultiply_rgba8_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        } else if a != 255 {
            for c in &mut px[..3] {
                *c = unmul(*c, a);
            }
        }
    }
}

fn unmul(c: u8, a: u8) -> u8 {
    ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
}

/// Encode a face raster as a PNG in memory.
pub fn encode_png(raster: &FaceRaster) -> CartolinaResult<Vec<u8>> {
    let mut data = raster.data.clone();
    unpremultiply_rgba8_in_place(&mut data);

    let img = image::RgbaImage::from_raw(raster.width, raster.height, data)
        .ok_or_else(|| CartolinaError::encode("raster byte length does not match dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CartolinaError::encode(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Write a face raster as a PNG file.
pub fn write_png(path: &Path, raster: &FaceRaster) -> CartolinaResult<()> {
    let mut data = raster.data.clone();
    unpremultiply_rgba8_in_place(&mut data);

    image::save_buffer_with_format(
        path,
        &data,
        raster.width,
        raster.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| CartolinaError::encode(format!("write png '{}': {e}", path.display())))?;
    Ok(())
}
