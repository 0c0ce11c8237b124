use crate::{
    error::{CartolinaError, CartolinaResult},
    layout,
    render::FaceRaster,
};

pub type PremulRgba8 = [u8; 4];

/// Gap and border fill for the merged sheet, premultiplied white.
pub const MERGE_FILL: PremulRgba8 = [255, 255, 255, 255];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> CartolinaResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CartolinaError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Stack two face rasters into one sheet with a white gap between them.
///
/// Both faces must be exactly [`layout::FACE_WIDTH`] by
/// [`layout::FACE_HEIGHT`]; the result is [`layout::merged_height`] tall.
pub fn stack_vertical(top: &FaceRaster, bottom: &FaceRaster) -> CartolinaResult<FaceRaster> {
    check_face(top)?;
    check_face(bottom)?;

    let width = layout::FACE_WIDTH;
    let height = layout::merged_height();
    let mut data = vec![0u8; width as usize * height as usize * 4];
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&MERGE_FILL);
    }

    let row_bytes = width as usize * 4;
    let face_bytes = row_bytes * layout::FACE_HEIGHT as usize;
    let bottom_start = row_bytes * (layout::FACE_HEIGHT + layout::MERGE_GAP) as usize;
    over_in_place(&mut data[..face_bytes], &top.data)?;
    over_in_place(&mut data[bottom_start..bottom_start + face_bytes], &bottom.data)?;

    Ok(FaceRaster {
        width,
        height,
        data,
    })
}

fn check_face(face: &FaceRaster) -> CartolinaResult<()> {
    if face.width != layout::FACE_WIDTH || face.height != layout::FACE_HEIGHT {
        return Err(CartolinaError::render(format!(
            "face raster is {}x{}, expected {}x{}",
            face.width,
            face.height,
            layout::FACE_WIDTH,
            layout::FACE_HEIGHT
        )));
    }
    if face.data.len() != face.width as usize * face.height as usize * 4 {
        return Err(CartolinaError::render("face raster byte length mismatch"));
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
