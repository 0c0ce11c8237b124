use cartolina::{Postcard, PreparedAssets};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/sample_postcard.json");
    let card: Postcard = serde_json::from_str(s)?;
    card.validate()?;

    let assets = PreparedAssets::prepare(
        &card,
        &cartolina::MemoryAssetSource::new(),
        cartolina::Artifact::Back,
    )?;
    let mut raster = cartolina::Rasterizer::new();
    let back = cartolina::render_artifact(&card, &assets, &mut raster, cartolina::Artifact::Back)?;

    println!(
        "back face: {}x{}, {} bytes",
        back.width,
        back.height,
        back.data.len()
    );
    Ok(())
}
