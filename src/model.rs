use crate::error::{CartolinaError, CartolinaResult};

/// Opaque handle to a pre-cropped bitmap, resolved through an
/// [`AssetSource`](crate::AssetSource). Always a relative path.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BitmapRef(pub String);

impl BitmapRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything needed to render both faces of one postcard.
///
/// The model is read-only input to the planner; rendering never mutates it.
/// Both `back_text` and `back_image` are kept regardless of `back_mode` so a
/// UI can toggle modes without losing the hidden one.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Postcard {
    #[serde(default)]
    pub front_image: Option<BitmapRef>,
    #[serde(default)]
    pub back_mode: BackMode,
    #[serde(default)]
    pub back_text: String,
    #[serde(default)]
    pub back_image: Option<BitmapRef>,
    #[serde(default)]
    pub text_style: TextStyle,
    #[serde(default)]
    pub recipient: Recipient,
    #[serde(default)]
    pub stamp: Stamp,
    #[serde(default)]
    pub postmark: Postmark,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackMode {
    #[default]
    Text,
    Image,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub font_size: f64, // UI slider offers 35..=120; not re-validated here
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 45.0,
            font_family: FontFamily::default(),
            vertical_align: VerticalAlign::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    #[default]
    Kaiti,
    Simsun,
    Yahei,
    Cursive,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Recipient {
    #[serde(default)]
    pub name: String,
    /// Multi-line, `'\n'`-separated.
    #[serde(default)]
    pub address: String,
}

/// The kind/value pairing is enforced by the enum shape: a text stamp cannot
/// carry a bitmap and vice versa.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stamp {
    #[default]
    None,
    /// One glyph (typically an emoji) drawn centered on the stamp area.
    PresetText { value: String },
    PresetImage { bitmap: BitmapRef },
    CustomImage { bitmap: BitmapRef },
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Postmark {
    #[serde(default)]
    pub date: String,
    /// Uppercased at render time; empty renders as "POST OFFICE".
    #[serde(default)]
    pub location: String,
}

impl Postcard {
    /// Structural sanity only. Out-of-range but well-formed values (an
    /// oversized font, an empty message) are legal inputs by design.
    pub fn validate(&self) -> CartolinaResult<()> {
        if !self.text_style.font_size.is_finite() {
            return Err(CartolinaError::validation("font_size must be finite"));
        }
        if self.text_style.font_size <= 0.0 {
            return Err(CartolinaError::validation("font_size must be > 0"));
        }
        Ok(())
    }

    /// Starter model used by the CLI `init` command and fixtures.
    pub fn sample() -> Self {
        Self {
            front_image: None,
            back_mode: BackMode::Text,
            back_text: "Dear friend,\nGreetings from the road.".to_string(),
            back_image: None,
            text_style: TextStyle::default(),
            recipient: Recipient {
                name: "Ada".to_string(),
                address: "17 Cable St\nLondon".to_string(),
            },
            stamp: Stamp::PresetText {
                value: "\u{1F409}".to_string(),
            },
            postmark: Postmark {
                date: "2026/01/01".to_string(),
                location: "Shanghai".to_string(),
            },
        }
    }
}
