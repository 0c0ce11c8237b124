//! # Cartolina guide (v0.1.0)
//!
//! This module is a standalone, end-to-end walkthrough of Cartolina's architecture and public
//! API. It is intentionally detailed so future phases (and external integrations) can build on a
//! shared mental model of what "a render" means in this codebase.
//!
//! If you are looking for copy/paste commands, start with the repository `README.md`.
//! If you are implementing new features, start here.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`Postcard`](crate::Postcard): the full description of one card (front image, back content,
//!   recipient, stamp, postmark)
//! - [`FacePlan`](crate::FacePlan): backend-agnostic display list for a single face
//! - [`Rasterizer`](crate::Rasterizer): executes a plan into pixels on the CPU
//! - [`FaceRaster`](crate::FaceRaster): the output pixels (RGBA8, premultiplied alpha)
//! - [`PreparedAssets`](crate::PreparedAssets): decoded bitmaps and font bytes, loaded up front
//! - [`AssetSource`](crate::AssetSource): the only place external IO is allowed
//! - [`Artifact`](crate::Artifact): which export is being produced (`front.png`, `back.png`,
//!   `both.png`)
//!
//! The rendering pipeline is explicitly staged:
//!
//! 1. Plan a face: [`plan::front_plan`](crate::plan::front_plan) /
//!    [`plan::back_plan`](crate::plan::back_plan)
//! 2. Execute the plan: [`Rasterizer::render_face`](crate::Rasterizer::render_face)
//! 3. Merge and encode: [`compose::stack_vertical`](crate::compose::stack_vertical),
//!    [`export::encode_png`](crate::export::encode_png)
//!
//! The convenience wrapper for all three is [`render_artifact`](crate::render_artifact).
//!
//! ---
//!
//! ## "No IO in the renderer" (and why)
//!
//! Cartolina wants planning and rendering to be deterministic, testable, and portable. To do
//! that, planner and rasterizer code never reaches into the filesystem (or network). Instead:
//!
//! - IO and decoding happen through [`AssetSource`](crate::AssetSource) at
//!   [`PreparedAssets::prepare`](crate::PreparedAssets::prepare) time
//! - renderers consume **prepared** assets:
//!   - [`PreparedBitmap`](crate::PreparedBitmap) (premultiplied RGBA8)
//!   - [`FontLibrary`](crate::FontLibrary) (raw font bytes by slot)
//!
//! The default implementation is [`FsAssetSource`](crate::FsAssetSource), which loads assets
//! from a root directory. [`MemoryAssetSource`](crate::MemoryAssetSource) serves tests and
//! embedders without touching disk.
//!
//! Preparation is scoped to the artifact being rendered: only bitmaps its faces actually draw
//! are resolved. A back-only export never touches the front photo, and the back handle not
//! selected by `back_mode` is ignored outright: a card that toggled from image mode back to
//! text keeps its stale scan handle and still exports. Within that scope, a bitmap that fails
//! to load or decode aborts preparation with a structured error.
//!
//! Fonts are different: a missing or unreadable font file is skipped silently, and text ops
//! whose font never arrived are dropped at draw time while everything else still renders. A
//! postcard with no fonts installed still produces every box, rule, and perforation dot.
//!
//! ---
//!
//! ## Premultiplied alpha (Cartolina's pixel contract)
//!
//! Cartolina's internal pixel convention is **premultiplied RGBA8**:
//!
//! - decoded bitmaps are premultiplied at ingest
//! - [`Rasterizer::render_face`](crate::Rasterizer::render_face) outputs premultiplied pixels in
//!   [`FaceRaster`](crate::FaceRaster)
//! - CPU compositing ([`compose::over`](crate::compose::over)) assumes premultiplied alpha
//! - PNG export converts back to straight alpha at the last moment
//!   ([`export::unpremultiply_rgba8_in_place`](crate::export::unpremultiply_rgba8_in_place))
//!
//! Every plan opens with an opaque background fill, so exported faces are fully opaque and the
//! straight-alpha conversion is exact.
//!
//! ---
//!
//! ## Canvas geometry
//!
//! Both faces are fixed at 1500x1000 logical pixels ([`layout::FACE_WIDTH`](crate::layout::FACE_WIDTH)
//! by [`layout::FACE_HEIGHT`](crate::layout::FACE_HEIGHT)); there is no DPI or page-size
//! configuration. The merged sheet is 1500x2040: front above back with a 40 pixel white gap
//! ([`layout::merged_height`](crate::layout::merged_height)).
//!
//! All back-face furniture (divider, zip boxes, stamp box, perforation dots, postmark, recipient
//! rules) is placed by pure functions in [`layout`](crate::layout). Tests assert against those
//! functions rather than hard-coding pixel positions twice.
//!
//! ---
//!
//! ## Fonts
//!
//! Fonts are resolved by slot ([`FontSlot`](crate::FontSlot)), not by system lookup, so renders
//! are reproducible across machines. [`FontLibrary::load`](crate::FontLibrary::load) tries
//! `fonts/<slug>.ttf` (then `.otf`) under the asset root for each slot: `kaiti`, `simsun`,
//! `yahei`, `cursive`, `sans`, `serif`.
//!
//! At draw time a text op asks for its slot; if that font never loaded, the serif slot is the
//! single fallback, and if that is missing too the op is skipped. System fonts are never
//! consulted.
//!
//! ---
//!
//! ## Rendering a postcard
//!
//! The following example builds the bundled sample card, prepares assets from an in-memory
//! source (no external IO needed), then renders the back face on the CPU.
//!
//! ```rust,no_run
//! use cartolina::{
//!     Artifact, MemoryAssetSource, Postcard, PreparedAssets, Rasterizer, render_artifact,
//! };
//!
//! # fn main() -> cartolina::CartolinaResult<()> {
//! let card = Postcard::sample();
//! card.validate()?;
//!
//! let source = MemoryAssetSource::new();
//! let assets = PreparedAssets::prepare(&card, &source, Artifact::Back)?;
//!
//! let mut raster = Rasterizer::new();
//! let back = render_artifact(&card, &assets, &mut raster, Artifact::Back)?;
//! assert_eq!(back.width, 1500);
//! assert_eq!(back.height, 1000);
//! assert_eq!(back.data.len(), 1500 * 1000 * 4);
//!
//! let png = cartolina::export::encode_png(&back)?;
//! std::fs::write("back.png", png).map_err(anyhow::Error::from)?;
//! # Ok(())
//! # }
//! ```
//!
//! Notes:
//!
//! - [`Postcard::validate`](crate::Postcard::validate) is called at the boundary where a card is
//!   read; [`render_artifact`](crate::render_artifact) assumes a validated card.
//! - The sample card references no bitmaps, so an empty asset source is enough.
//!
//! ---
//!
//! ## Export artifacts
//!
//! Three artifacts exist, named by [`Artifact::filename`](crate::Artifact::filename):
//!
//! - `front.png`: the front face
//! - `back.png`: the back face
//! - `both.png`: one 1500x2040 sheet, front stacked above back
//!
//! `Both` renders each face once and stacks the rasters; it never re-renders at a different
//! size. The CLI (`cartolina render`) wraps exactly this flow and nothing else.
