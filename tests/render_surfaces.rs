use std::io::Cursor;

use cartolina::{
    Artifact, BackMode, BitmapRef, FaceRaster, MemoryAssetSource, Postcard, PreparedAssets,
    Rasterizer, render_artifact,
};

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut img = image::RgbaImage::new(width, height);
    for px in img.pixels_mut() {
        *px = image::Rgba(rgba);
    }
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn pixel(raster: &FaceRaster, x: u32, y: u32) -> [u8; 4] {
    let i = (y as usize * raster.width as usize + x as usize) * 4;
    [
        raster.data[i],
        raster.data[i + 1],
        raster.data[i + 2],
        raster.data[i + 3],
    ]
}

// The test environment installs no fonts, so text ops drop out and every
// sampled pixel below lands on deterministic geometry.

#[test]
fn back_face_renders_fixed_furniture() {
    let card = Postcard::sample();
    let assets = PreparedAssets::prepare(&card, &MemoryAssetSource::new(), Artifact::Back).unwrap();
    let mut raster = Rasterizer::new();
    let back = render_artifact(&card, &assets, &mut raster, Artifact::Back).unwrap();

    assert_eq!(back.width, 1500);
    assert_eq!(back.height, 1000);
    assert_eq!(back.data.len(), 1500 * 1000 * 4);

    // cornsilk background on the message half
    assert_eq!(pixel(&back, 20, 20), [255, 248, 220, 255]);
    // divider column
    assert_eq!(pixel(&back, 750, 500), [212, 165, 116, 255]);
    // top edge of the first postal-code box
    assert_eq!(pixel(&back, 835, 60), [211, 47, 47, 255]);
    // stamp interior stays white (the glyph needs a font)
    assert_eq!(pixel(&back, 1330, 200), [255, 255, 255, 255]);
    // perforation dot punches background color into the stamp edge
    assert_eq!(pixel(&back, 1242, 60), [255, 248, 220, 255]);
}

#[test]
fn postmark_ring_tints_the_background() {
    let card = Postcard::sample();
    let assets = PreparedAssets::prepare(&card, &MemoryAssetSource::new(), Artifact::Back).unwrap();
    let mut raster = Rasterizer::new();
    let back = render_artifact(&card, &assets, &mut raster, Artifact::Back).unwrap();

    // on the ring at (1270, 300): translucent red over cornsilk
    let on_ring = pixel(&back, 1270, 300);
    assert_ne!(on_ring, [255, 248, 220, 255]);
    assert!(on_ring[0] > on_ring[2], "ring should read red: {on_ring:?}");
    assert_eq!(on_ring[3], 255);

    // inside the ring the background shows through untouched
    assert_eq!(pixel(&back, 1200, 300), [255, 248, 220, 255]);
}

#[test]
fn back_render_is_deterministic() {
    let card = Postcard::sample();
    let assets = PreparedAssets::prepare(&card, &MemoryAssetSource::new(), Artifact::Back).unwrap();
    let mut raster = Rasterizer::new();

    let a = render_artifact(&card, &assets, &mut raster, Artifact::Back).unwrap();
    let b = render_artifact(&card, &assets, &mut raster, Artifact::Back).unwrap();

    assert_eq!(digest_u64(&a.data), digest_u64(&b.data));
    assert!(a.data.iter().any(|&x| x != 0));
}

#[test]
fn front_without_photo_is_the_placeholder() {
    let card = Postcard::default();
    let assets =
        PreparedAssets::prepare(&card, &MemoryAssetSource::new(), Artifact::Front).unwrap();
    let mut raster = Rasterizer::new();
    let front = render_artifact(&card, &assets, &mut raster, Artifact::Front).unwrap();

    assert_eq!(pixel(&front, 0, 0), [224, 224, 224, 255]);
    assert_eq!(pixel(&front, 1499, 999), [224, 224, 224, 255]);
}

#[test]
fn front_photo_stretches_edge_to_edge() {
    let mut card = Postcard::default();
    card.front_image = Some(BitmapRef::new("front.png"));

    let mut source = MemoryAssetSource::new();
    source
        .insert("front.png", png_bytes(30, 20, [10, 20, 30, 255]))
        .unwrap();
    let assets = PreparedAssets::prepare(&card, &source, Artifact::Front).unwrap();

    let mut raster = Rasterizer::new();
    let front = render_artifact(&card, &assets, &mut raster, Artifact::Front).unwrap();

    assert_eq!(pixel(&front, 100, 100), [10, 20, 30, 255]);
    assert_eq!(pixel(&front, 1400, 900), [10, 20, 30, 255]);
}

#[test]
fn back_image_mode_places_the_scan() {
    let mut card = Postcard::default();
    card.back_mode = BackMode::Image;
    card.back_image = Some(BitmapRef::new("scan.png"));

    let mut source = MemoryAssetSource::new();
    source
        .insert("scan.png", png_bytes(65, 84, [0, 200, 0, 255]))
        .unwrap();
    let assets = PreparedAssets::prepare(&card, &source, Artifact::Back).unwrap();

    let mut raster = Rasterizer::new();
    let back = render_artifact(&card, &assets, &mut raster, Artifact::Back).unwrap();

    // inside the content frame (60, 80, 650x840)
    assert_eq!(pixel(&back, 100, 100), [0, 200, 0, 255]);
    assert_eq!(pixel(&back, 600, 800), [0, 200, 0, 255]);
    // outside the frame the background remains
    assert_eq!(pixel(&back, 30, 30), [255, 248, 220, 255]);
}

#[test]
fn back_export_ignores_handles_it_never_draws() {
    // text mode keeps the hidden scan handle; the front photo is not part
    // of a back-only export at all
    let mut card = Postcard::sample();
    card.front_image = Some(BitmapRef::new("photos/not-shipped.jpg"));
    card.back_image = Some(BitmapRef::new("scans/not-shipped.png"));

    let assets = PreparedAssets::prepare(&card, &MemoryAssetSource::new(), Artifact::Back).unwrap();
    let mut raster = Rasterizer::new();
    let back = render_artifact(&card, &assets, &mut raster, Artifact::Back).unwrap();

    assert_eq!(pixel(&back, 20, 20), [255, 248, 220, 255]);
}

#[test]
fn both_sheet_stacks_front_above_back() {
    let card = Postcard::sample();
    let assets = PreparedAssets::prepare(&card, &MemoryAssetSource::new(), Artifact::Both).unwrap();
    let mut raster = Rasterizer::new();
    let sheet = render_artifact(&card, &assets, &mut raster, Artifact::Both).unwrap();

    assert_eq!(sheet.width, 1500);
    assert_eq!(sheet.height, 2040);
    // front placeholder on top
    assert_eq!(pixel(&sheet, 20, 20), [224, 224, 224, 255]);
    // white gap between the faces
    assert_eq!(pixel(&sheet, 750, 1020), [255, 255, 255, 255]);
    // back background below the gap
    assert_eq!(pixel(&sheet, 20, 1060), [255, 248, 220, 255]);
}
