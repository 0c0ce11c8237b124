use cartolina::{
    Artifact, MemoryAssetSource, Postcard, PreparedAssets, Rasterizer, compose, export,
    render_artifact,
};

#[test]
fn merged_sheet_encodes_to_png() {
    let card = Postcard::sample();
    let assets = PreparedAssets::prepare(&card, &MemoryAssetSource::new(), Artifact::Both).unwrap();
    let mut raster = Rasterizer::new();

    let front = render_artifact(&card, &assets, &mut raster, Artifact::Front).unwrap();
    let back = render_artifact(&card, &assets, &mut raster, Artifact::Back).unwrap();
    let sheet = compose::stack_vertical(&front, &back).unwrap();

    let png = export::encode_png(&sheet).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();

    assert_eq!(decoded.width(), 1500);
    assert_eq!(decoded.height(), 2040);
    // the gap is opaque white in the straight-alpha PNG too
    assert_eq!(decoded.get_pixel(750, 1010).0, [255, 255, 255, 255]);
    // back background shows in the lower half
    assert_eq!(decoded.get_pixel(20, 1060).0, [255, 248, 220, 255]);
}

#[test]
fn single_face_png_keeps_face_dimensions() {
    let card = Postcard::sample();
    let assets = PreparedAssets::prepare(&card, &MemoryAssetSource::new(), Artifact::Back).unwrap();
    let mut raster = Rasterizer::new();

    let back = render_artifact(&card, &assets, &mut raster, Artifact::Back).unwrap();
    let png = export::encode_png(&back).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();

    assert_eq!(decoded.width(), 1500);
    assert_eq!(decoded.height(), 1000);
}
