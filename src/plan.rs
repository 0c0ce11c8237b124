use kurbo::{Affine, Circle, Point, Rect};

use crate::{
    assets::{FontSlot, PreparedAssets},
    layout,
    model::{BackMode, Postcard, Stamp},
    text::{self, TextMeasure},
};

/// Ordered display list for one postcard face.
///
/// Plans are pure data: compiling one touches no fonts, no bitmaps beyond
/// their prepared dimensions, and no rasterizer. Backends execute the ops in
/// sequence; later ops may overlap earlier ones on purpose (perforation dots
/// punch into the stamp edge, for example).
#[derive(Clone, Debug)]
pub struct FacePlan {
    pub ops: Vec<DrawOp>,
}

/// A single draw operation. Geometry is in face coordinates (1500x1000).
#[derive(Clone, Debug)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    /// Outline centered on the rect edge, like a canvas stroke.
    StrokeRect {
        rect: Rect,
        width: f64,
        color: Rgba8,
    },
    FillCircle {
        circle: Circle,
        color: Rgba8,
    },
    StrokeCircle {
        circle: Circle,
        width: f64,
        color: Rgba8,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba8,
    },
    /// Stretch a prepared bitmap over `dst` (aspect handling happened at
    /// plan time).
    Image {
        slot: BitmapSlot,
        dst: Rect,
    },
    Text(TextOp),
}

/// One run of already line-broken text.
#[derive(Clone, Debug)]
pub struct TextOp {
    pub text: String,
    pub font: FontSlot,
    pub size: f64,
    pub bold: bool,
    pub color: Rgba8,
    /// Anchor point in the op's local space; `transform` maps local space
    /// into face coordinates.
    pub origin: Point,
    pub h_anchor: HAnchor,
    pub v_anchor: VAnchor,
    pub transform: Affine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAnchor {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAnchor {
    /// `origin.y` is the top of the em box.
    Top,
    /// `origin.y` is the vertical middle of the em box.
    Middle,
    /// `origin.y` is the alphabetic baseline.
    Bottom,
}

/// Which prepared bitmap a [`DrawOp::Image`] references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitmapSlot {
    Front,
    BackContent,
    Stamp,
}

/// Straight-alpha color as authored. Backends premultiply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);
pub const BACK_BACKGROUND: Rgba8 = Rgba8::rgb(255, 248, 220);
pub const DIVIDER_TAN: Rgba8 = Rgba8::rgb(212, 165, 116);
pub const MESSAGE_INK: Rgba8 = Rgba8::rgb(51, 51, 51);
pub const ZIP_BOX_RED: Rgba8 = Rgba8::rgb(211, 47, 47);
pub const POSTMARK_RED: Rgba8 = Rgba8::rgba(180, 40, 40, 204);
pub const RULE_GRAY: Rgba8 = Rgba8::rgb(102, 102, 102);
pub const RECIPIENT_INK: Rgba8 = Rgba8::rgb(0, 0, 0);
pub const FRONT_PLACEHOLDER_BG: Rgba8 = Rgba8::rgb(224, 224, 224);
pub const FRONT_PLACEHOLDER_FG: Rgba8 = Rgba8::rgb(153, 153, 153);

/// Compile the front face: the photo stretched edge to edge, or the neutral
/// placeholder when no photo is bound.
pub fn front_plan(card: &Postcard, assets: &PreparedAssets) -> FacePlan {
    let mut ops = Vec::new();

    if card.front_image.is_some() && assets.front.is_some() {
        ops.push(DrawOp::Image {
            slot: BitmapSlot::Front,
            dst: layout::face_rect(),
        });
    } else {
        ops.push(DrawOp::FillRect {
            rect: layout::face_rect(),
            color: FRONT_PLACEHOLDER_BG,
        });
        ops.push(DrawOp::Text(TextOp {
            text: "No front image".to_string(),
            font: FontSlot::Sans,
            size: layout::PLACEHOLDER_LABEL_SIZE,
            bold: false,
            color: FRONT_PLACEHOLDER_FG,
            origin: layout::face_center(),
            h_anchor: HAnchor::Center,
            v_anchor: VAnchor::Middle,
            transform: Affine::IDENTITY,
        }));
    }

    FacePlan { ops }
}

/// Compile the back face. Pass order is fixed: background and divider, left
/// half content, postal boxes, stamp, perforations, postmark, recipient
/// block.
pub fn back_plan(
    card: &Postcard,
    assets: &PreparedAssets,
    measure: &mut dyn TextMeasure,
) -> FacePlan {
    let mut ops = Vec::new();

    ops.push(DrawOp::FillRect {
        rect: layout::face_rect(),
        color: BACK_BACKGROUND,
    });
    ops.push(DrawOp::Line {
        from: Point::new(layout::DIVIDER_X, layout::DIVIDER_TOP),
        to: Point::new(layout::DIVIDER_X, layout::DIVIDER_BOTTOM),
        width: layout::DIVIDER_WIDTH,
        color: DIVIDER_TAN,
    });

    push_left_half(card, assets, measure, &mut ops);
    push_zip_boxes(&mut ops);
    push_stamp(card, assets, &mut ops);
    push_perforations(&mut ops);
    push_postmark(card, &mut ops);
    push_recipient(card, &mut ops);

    FacePlan { ops }
}

fn push_left_half(
    card: &Postcard,
    assets: &PreparedAssets,
    measure: &mut dyn TextMeasure,
    ops: &mut Vec<DrawOp>,
) {
    match card.back_mode {
        BackMode::Text => {
            let size = card.text_style.font_size;
            let lines = text::break_lines(measure, &card.back_text, layout::TEXT_MAX_WIDTH);
            let lh = text::line_height(size);
            let start = text::block_start_y(
                card.text_style.vertical_align,
                lines.len() as f64 * lh,
                layout::TEXT_CONTAINER_HEIGHT,
                layout::TEXT_TOP,
            );
            let font = FontSlot::for_family(card.text_style.font_family);
            for (i, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                ops.push(DrawOp::Text(TextOp {
                    text: line.clone(),
                    font,
                    size,
                    bold: false,
                    color: MESSAGE_INK,
                    origin: Point::new(layout::TEXT_X, start + i as f64 * lh),
                    h_anchor: HAnchor::Left,
                    v_anchor: VAnchor::Top,
                    transform: Affine::IDENTITY,
                }));
            }
        }
        BackMode::Image => {
            if card.back_image.is_some() && assets.back_content.is_some() {
                ops.push(DrawOp::Image {
                    slot: BitmapSlot::BackContent,
                    dst: layout::back_image_rect(),
                });
            }
        }
    }
}

fn push_zip_boxes(ops: &mut Vec<DrawOp>) {
    for i in 0..layout::ZIP_BOX_COUNT {
        ops.push(DrawOp::StrokeRect {
            rect: layout::zip_box(i),
            width: layout::ZIP_BOX_STROKE,
            color: ZIP_BOX_RED,
        });
    }
}

fn push_stamp(card: &Postcard, assets: &PreparedAssets, ops: &mut Vec<DrawOp>) {
    ops.push(DrawOp::FillRect {
        rect: layout::stamp_rect(),
        color: WHITE,
    });

    match &card.stamp {
        Stamp::None => {}
        Stamp::PresetText { value } => {
            if !value.is_empty() {
                ops.push(DrawOp::Text(TextOp {
                    text: value.clone(),
                    font: FontSlot::Sans,
                    size: layout::STAMP_GLYPH_SIZE,
                    bold: false,
                    color: MESSAGE_INK,
                    origin: layout::stamp_glyph_center(),
                    h_anchor: HAnchor::Center,
                    v_anchor: VAnchor::Middle,
                    transform: Affine::IDENTITY,
                }));
            }
        }
        Stamp::PresetImage { .. } | Stamp::CustomImage { .. } => {
            if let Some(bitmap) = &assets.stamp {
                ops.push(DrawOp::Image {
                    slot: BitmapSlot::Stamp,
                    dst: layout::fit_contain(
                        f64::from(bitmap.width),
                        f64::from(bitmap.height),
                        layout::stamp_rect(),
                        layout::STAMP_MARGIN,
                    ),
                });
            }
        }
    }
}

fn push_perforations(ops: &mut Vec<DrawOp>) {
    for center in layout::perforation_centers() {
        ops.push(DrawOp::FillCircle {
            circle: Circle::new(center, layout::PERF_RADIUS),
            color: BACK_BACKGROUND,
        });
    }
}

fn push_postmark(card: &Postcard, ops: &mut Vec<DrawOp>) {
    ops.push(DrawOp::StrokeCircle {
        circle: Circle::new(layout::POSTMARK_CENTER, layout::POSTMARK_RADIUS),
        width: layout::POSTMARK_STROKE,
        color: POSTMARK_RED,
    });

    let transform = Affine::translate(layout::POSTMARK_CENTER.to_vec2())
        * Affine::rotate(layout::POSTMARK_ROTATION_DEG.to_radians());

    if !card.postmark.date.is_empty() {
        ops.push(DrawOp::Text(TextOp {
            text: card.postmark.date.clone(),
            font: FontSlot::Sans,
            size: layout::POSTMARK_DATE_SIZE,
            bold: true,
            color: POSTMARK_RED,
            origin: layout::POSTMARK_DATE_OFFSET,
            h_anchor: HAnchor::Center,
            v_anchor: VAnchor::Bottom,
            transform,
        }));
    }

    let location = if card.postmark.location.is_empty() {
        "POST OFFICE".to_string()
    } else {
        card.postmark.location.to_uppercase()
    };
    let size = if location.chars().count() > layout::POSTMARK_LOCATION_MAX_CHARS {
        layout::POSTMARK_LOCATION_SIZE_SMALL
    } else {
        layout::POSTMARK_LOCATION_SIZE
    };
    ops.push(DrawOp::Text(TextOp {
        text: location,
        font: FontSlot::Sans,
        size,
        bold: false,
        color: POSTMARK_RED,
        origin: layout::POSTMARK_LOCATION_OFFSET,
        h_anchor: HAnchor::Center,
        v_anchor: VAnchor::Bottom,
        transform,
    }));
}

fn push_recipient(card: &Postcard, ops: &mut Vec<DrawOp>) {
    let name_rule_y = layout::recipient_rule_y(0);
    ops.push(DrawOp::Line {
        from: Point::new(layout::RECIPIENT_RULE_X0, name_rule_y),
        to: Point::new(layout::RECIPIENT_NAME_RULE_X1, name_rule_y),
        width: layout::RECIPIENT_RULE_WIDTH,
        color: RULE_GRAY,
    });
    if !card.recipient.name.is_empty() {
        ops.push(recipient_text(
            format!("To: {}", card.recipient.name),
            name_rule_y,
        ));
    }

    let address = &card.recipient.address;
    let address_lines: Vec<&str> = if address.is_empty() {
        vec![""; layout::RECIPIENT_BLANK_RULES]
    } else {
        address.split('\n').collect()
    };
    for (i, line) in address_lines.iter().enumerate() {
        let y = layout::recipient_rule_y(i + 1);
        ops.push(DrawOp::Line {
            from: Point::new(layout::RECIPIENT_RULE_X0, y),
            to: Point::new(layout::RECIPIENT_RULE_X1, y),
            width: layout::RECIPIENT_RULE_WIDTH,
            color: RULE_GRAY,
        });
        if !line.is_empty() {
            ops.push(recipient_text(line.to_string(), y));
        }
    }
}

fn recipient_text(text: String, rule_y: f64) -> DrawOp {
    DrawOp::Text(TextOp {
        text,
        font: FontSlot::Kaiti,
        size: layout::RECIPIENT_TEXT_SIZE,
        bold: false,
        color: RECIPIENT_INK,
        origin: Point::new(
            layout::RECIPIENT_RULE_X0,
            rule_y - layout::RECIPIENT_TEXT_LIFT,
        ),
        h_anchor: HAnchor::Left,
        v_anchor: VAnchor::Bottom,
        transform: Affine::IDENTITY,
    })
}
