//! Converting parsed values into typed values.

use lcss::{
    Color, Converter, CssError, Font, FontPosture, FontWeight, Insets, ParsedValue, Size,
    StyledValue,
};

fn font() -> Font {
    Font::new("Arial", 20.0)
}

// =============================================================================
// Sizes
// =============================================================================

#[test]
fn test_relative_sizes_use_reference_font() {
    let converted = Converter::Size.convert(&ParsedValue::em(1.5), &font()).unwrap();
    assert_eq!(converted, StyledValue::Number(30.0));

    // Percentages of a font size are shares of the reference size.
    let converted = Converter::FontSize
        .convert(&ParsedValue::Size(Size::percent(150.0)), &font())
        .unwrap();
    assert_eq!(converted, StyledValue::Number(30.0));
}

#[test]
fn test_relative_size_detection() {
    assert!(ParsedValue::em(1.0).contains_font_relative_size(false));
    assert!(!ParsedValue::px(1.0).contains_font_relative_size(false));
    let percent = ParsedValue::Size(Size::percent(50.0));
    assert!(!percent.contains_font_relative_size(false));
    assert!(percent.contains_font_relative_size(true));
}

#[test]
fn test_insets_expand_like_css_shorthand() {
    let two = ParsedValue::Sequence(vec![ParsedValue::px(1.0), ParsedValue::px(2.0)]);
    assert_eq!(
        Converter::Insets.convert(&two, &font()).unwrap(),
        StyledValue::Insets(Insets::new(1.0, 2.0, 1.0, 2.0))
    );

    let five = ParsedValue::Sequence(vec![ParsedValue::px(1.0); 5]);
    assert!(matches!(
        Converter::Insets.convert(&five, &font()),
        Err(CssError::InvalidArgument(_))
    ));
}

#[test]
fn test_insets_from_sides() {
    let subs = vec![
        ("padding-top".to_string(), StyledValue::Number(4.0)),
        ("padding-left".to_string(), StyledValue::Number(8.0)),
    ];
    assert_eq!(
        Converter::Insets.convert_subs(&subs).unwrap(),
        StyledValue::Insets(Insets::new(4.0, 0.0, 0.0, 8.0))
    );
}

// =============================================================================
// Paints and fonts
// =============================================================================

#[test]
fn test_named_colors_convert_to_paint() {
    assert_eq!(
        Converter::Paint.convert(&ParsedValue::ident("white"), &font()).unwrap(),
        StyledValue::Color(Color::WHITE)
    );
    assert!(matches!(
        Converter::Paint.convert(&ParsedValue::ident("no-such-color"), &font()),
        Err(CssError::Conversion { expected: "paint", .. })
    ));
}

#[test]
fn test_font_shorthand_sizes_against_reference() {
    let shorthand = ParsedValue::Font(
        lcss::FontShorthand::new(Size::em(2.0), "Courier")
            .weight(FontWeight::Bold)
            .posture(FontPosture::Italic),
    );
    assert_eq!(
        Converter::Font.convert(&shorthand, &font()).unwrap(),
        StyledValue::Font(Font::font("Courier", FontWeight::Bold, FontPosture::Italic, 40.0))
    );
}

#[test]
fn test_font_weight_keywords_and_numbers() {
    assert_eq!(
        Converter::FontWeight.convert(&ParsedValue::ident("semi-bold"), &font()).unwrap(),
        StyledValue::FontWeight(FontWeight::SemiBold)
    );
    assert_eq!(
        Converter::FontWeight.convert(&ParsedValue::Number(700.0), &font()).unwrap(),
        StyledValue::FontWeight(FontWeight::Bold)
    );
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_unresolved_lookup_is_a_missing_value() {
    let err = Converter::Paint
        .convert(&ParsedValue::lookup("Accent"), &font())
        .unwrap_err();
    assert_eq!(err, CssError::MissingValue("accent".to_string()));
}

#[test]
fn test_null_converts_for_every_converter() {
    for converter in [Converter::Size, Converter::Paint, Converter::Font] {
        assert_eq!(
            converter.convert(&ParsedValue::Null, &font()).unwrap(),
            StyledValue::Null
        );
    }
}
