use cartolina::{FontFamily, Postcard, Stamp};

#[test]
fn json_fixture_validates() {
    let s = include_str!("data/sample_postcard.json");
    let card: Postcard = serde_json::from_str(s).unwrap();
    card.validate().unwrap();

    assert_eq!(card.front_image.unwrap().as_str(), "photos/lisbon.jpg");
    assert_eq!(card.text_style.font_family, FontFamily::Kaiti);
    assert!(matches!(card.stamp, Stamp::PresetText { .. }));
    assert_eq!(card.postmark.location, "Lisboa");
}

#[test]
fn fixture_without_optional_sections_still_parses() {
    let card: Postcard = serde_json::from_str(r#"{"back_text":"hi"}"#).unwrap();
    card.validate().unwrap();
    assert_eq!(card.back_text, "hi");
    assert!(card.back_image.is_none());
    assert_eq!(card.stamp, Stamp::None);
}

#[test]
fn zero_font_size_fails_validation_at_the_boundary() {
    let card: Postcard =
        serde_json::from_str(r#"{"text_style":{"font_size":0.0}}"#).unwrap();
    assert!(card.validate().is_err());
}
