use std::collections::HashMap;
use std::sync::Arc;

use kurbo::{Affine, Circle, PathEl, Point, Rect, Shape as _, Vec2};

use crate::{
    assets::{FontLibrary, FontSlot, PreparedAssets, PreparedBitmap},
    error::{CartolinaError, CartolinaResult},
    layout,
    plan::{BitmapSlot, DrawOp, FacePlan, HAnchor, Rgba8, TextOp, VAnchor},
    text::TextMeasure,
};

/// Rendered face pixels. Premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct FaceRaster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

#[derive(Clone)]
struct RegisteredFont {
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Executes face plans on the CPU. Holds the Parley contexts and the fonts
/// registered so far; reusable across renders, `&mut self` per render.
pub struct Rasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<FontSlot, RegisteredFont>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    /// Text measurer bound to one font slot and size, for line breaking.
    pub fn measure_for<'a>(
        &'a mut self,
        fonts: &'a FontLibrary,
        slot: FontSlot,
        size: f32,
    ) -> ParleyMeasure<'a> {
        ParleyMeasure {
            raster: self,
            fonts,
            slot,
            size,
        }
    }

    /// Execute `plan` into a fresh face surface.
    #[tracing::instrument(skip(self, plan, assets))]
    pub fn render_face(
        &mut self,
        plan: &FacePlan,
        assets: &PreparedAssets,
    ) -> CartolinaResult<FaceRaster> {
        let width = layout::FACE_WIDTH as u16;
        let height = layout::FACE_HEIGHT as u16;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for op in &plan.ops {
            self.draw_op(&mut ctx, op, assets)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FaceRaster {
            width: layout::FACE_WIDTH,
            height: layout::FACE_HEIGHT,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        assets: &PreparedAssets,
    ) -> CartolinaResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillRect { rect, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_paint(*color));
                ctx.fill_rect(&rect_to_cpu(*rect));
            }
            DrawOp::StrokeRect { rect, width, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_paint(*color));
                for edge in stroke_rect_edges(*rect, *width) {
                    ctx.fill_rect(&rect_to_cpu(edge));
                }
            }
            DrawOp::FillCircle { circle, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_paint(*color));
                ctx.fill_path(&bezpath_to_cpu(&circle_path(*circle)));
            }
            DrawOp::StrokeCircle {
                circle,
                width,
                color,
            } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_paint(*color));
                ctx.fill_path(&bezpath_to_cpu(&annulus_path(*circle, *width)));
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                if let Some(path) = line_path(*from, *to, *width) {
                    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_paint(color_to_paint(*color));
                    ctx.fill_path(&bezpath_to_cpu(&path));
                }
            }
            DrawOp::Image { slot, dst } => {
                let bitmap = bitmap_for_slot(assets, *slot).ok_or_else(|| {
                    CartolinaError::render(format!("image op references unprepared slot {slot:?}"))
                })?;
                if bitmap.width == 0 || bitmap.height == 0 {
                    return Ok(());
                }

                let pixmap = pixmap_from_bitmap(bitmap)?;
                let paint = vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                };

                let sx = dst.width() / f64::from(bitmap.width);
                let sy = dst.height() / f64::from(bitmap.height);
                ctx.set_transform(affine_to_cpu(
                    Affine::translate((dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy),
                ));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(bitmap.width),
                    f64::from(bitmap.height),
                ));
            }
            DrawOp::Text(text_op) => self.draw_text(ctx, text_op, &assets.fonts),
        }

        Ok(())
    }

    /// Draw one pre-broken text run. Missing fonts skip the run; geometry
    /// around it still renders.
    fn draw_text(&mut self, ctx: &mut vello_cpu::RenderContext, op: &TextOp, fonts: &FontLibrary) {
        if op.text.is_empty() {
            return;
        }
        let Some(reg) = self.font_for(op.font, fonts) else {
            return;
        };

        let brush = TextBrushRgba8 {
            r: op.color.r,
            g: op.color.g,
            b: op.color.b,
            a: op.color.a,
        };
        let layout = self.layout_line(&op.text, &reg.family_name, op.size as f32, op.bold, brush);

        let Some(line) = layout.lines().next() else {
            return;
        };
        let m = line.metrics();
        let dx = match op.h_anchor {
            HAnchor::Left => 0.0,
            HAnchor::Center => -f64::from(m.advance) / 2.0,
        };
        let baseline_target = match op.v_anchor {
            VAnchor::Top => op.origin.y + f64::from(m.ascent),
            VAnchor::Middle => op.origin.y + f64::from(m.ascent - m.descent) / 2.0,
            VAnchor::Bottom => op.origin.y,
        };

        let mut baseline_in_layout = None;
        let mut runs: Vec<(f32, TextBrushRgba8, Vec<vello_cpu::Glyph>)> = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut glyphs = Vec::new();
                for g in run.glyphs() {
                    if baseline_in_layout.is_none() {
                        baseline_in_layout = Some(f64::from(g.y));
                    }
                    glyphs.push(vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                }
                runs.push((run.run().font_size(), run.style().brush, glyphs));
            }
        }
        let Some(baseline_in_layout) = baseline_in_layout else {
            return;
        };

        let local = Affine::translate((op.origin.x + dx, baseline_target - baseline_in_layout));
        ctx.set_transform(affine_to_cpu(op.transform * local));
        for (font_size, run_brush, glyphs) in runs {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                run_brush.r,
                run_brush.g,
                run_brush.b,
                run_brush.a,
            ));
            ctx.glyph_run(&reg.font)
                .font_size(font_size)
                .fill_glyphs(glyphs.into_iter());
        }
    }

    fn measure_width(&mut self, text: &str, slot: FontSlot, size: f32, fonts: &FontLibrary) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let Some(reg) = self.font_for(slot, fonts) else {
            return 0.0;
        };
        let layout = self.layout_line(
            text,
            &reg.family_name,
            size,
            false,
            TextBrushRgba8::default(),
        );
        let mut w = 0.0f64;
        for line in layout.lines() {
            w = w.max(f64::from(line.metrics().advance));
        }
        w
    }

    fn layout_line(
        &mut self,
        text: &str,
        family_name: &str,
        size: f32,
        bold: bool,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Requested slot if its font registers, else the serif fallback, else
    /// nothing.
    fn font_for(&mut self, slot: FontSlot, fonts: &FontLibrary) -> Option<RegisteredFont> {
        if let Some(reg) = self.register_slot(slot, fonts) {
            return Some(reg);
        }
        if slot != FontSlot::Serif {
            return self.register_slot(FontSlot::Serif, fonts);
        }
        None
    }

    fn register_slot(&mut self, slot: FontSlot, fonts: &FontLibrary) -> Option<RegisteredFont> {
        if let Some(reg) = self.registered.get(&slot) {
            return Some(reg.clone());
        }

        let bytes = fonts.bytes(slot)?;
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id)?;
        let family_name = self.font_ctx.collection.family_name(family_id)?.to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        let reg = RegisteredFont { family_name, font };
        self.registered.insert(slot, reg.clone());
        Some(reg)
    }
}

/// [`TextMeasure`] backed by a [`Rasterizer`], bound to one font and size.
pub struct ParleyMeasure<'a> {
    raster: &'a mut Rasterizer,
    fonts: &'a FontLibrary,
    slot: FontSlot,
    size: f32,
}

impl TextMeasure for ParleyMeasure<'_> {
    fn measure(&mut self, text: &str) -> f64 {
        self.raster
            .measure_width(text, self.slot, self.size, self.fonts)
    }
}

fn bitmap_for_slot(assets: &PreparedAssets, slot: BitmapSlot) -> Option<&PreparedBitmap> {
    match slot {
        BitmapSlot::Front => assets.front.as_ref(),
        BitmapSlot::BackContent => assets.back_content.as_ref(),
        BitmapSlot::Stamp => assets.stamp.as_ref(),
    }
}

fn color_to_paint(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn circle_path(circle: Circle) -> kurbo::BezPath {
    kurbo::BezPath::from_vec(circle.path_elements(0.1).collect())
}

/// Ring between `radius - width/2` and `radius + width/2`, the filled
/// equivalent of a centered circle stroke. The inner contour runs reversed
/// so the nonzero fill leaves the hole open.
fn annulus_path(circle: Circle, width: f64) -> kurbo::BezPath {
    let half = width / 2.0;
    let outer = Circle::new(circle.center, circle.radius + half);
    let inner = Circle::new(circle.center, (circle.radius - half).max(0.0));

    let mut els: Vec<PathEl> = outer.path_elements(0.1).collect();
    let inner_path = kurbo::BezPath::from_vec(inner.path_elements(0.1).collect());
    els.extend(inner_path.reverse_subpaths().elements().iter().copied());
    kurbo::BezPath::from_vec(els)
}

/// Filled quad equivalent of a butt-capped line stroke.
fn line_path(from: Point, to: Point, width: f64) -> Option<kurbo::BezPath> {
    let v = to - from;
    let len = v.hypot();
    if len == 0.0 {
        return None;
    }
    let n = Vec2::new(-v.y / len, v.x / len) * (width / 2.0);

    let mut path = kurbo::BezPath::new();
    path.move_to(from + n);
    path.line_to(to + n);
    path.line_to(to - n);
    path.line_to(from - n);
    path.close_path();
    Some(path)
}

/// Four filled edge rects straddling the outline, the filled equivalent of
/// a centered rect stroke with miter corners.
fn stroke_rect_edges(rect: Rect, width: f64) -> [Rect; 4] {
    let h = width / 2.0;
    [
        Rect::new(rect.x0 - h, rect.y0 - h, rect.x1 + h, rect.y0 + h),
        Rect::new(rect.x0 - h, rect.y1 - h, rect.x1 + h, rect.y1 + h),
        Rect::new(rect.x0 - h, rect.y0 + h, rect.x0 + h, rect.y1 - h),
        Rect::new(rect.x1 - h, rect.y0 + h, rect.x1 + h, rect.y1 - h),
    ]
}

fn pixmap_from_bitmap(bitmap: &PreparedBitmap) -> CartolinaResult<vello_cpu::Pixmap> {
    let w: u16 = bitmap
        .width
        .try_into()
        .map_err(|_| CartolinaError::render("bitmap width exceeds u16"))?;
    let h: u16 = bitmap
        .height
        .try_into()
        .map_err(|_| CartolinaError::render("bitmap height exceeds u16"))?;
    let expected = bitmap.width as usize * bitmap.height as usize * 4;
    if bitmap.rgba8_premul.len() != expected {
        return Err(CartolinaError::render(
            "prepared bitmap byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(bitmap.width as usize * bitmap.height as usize);
    for px in bitmap.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}
