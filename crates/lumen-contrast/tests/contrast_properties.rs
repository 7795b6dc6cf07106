//! Behavioral properties of the contrast math, checked across the public API.

use lumen_contrast::{
    apca_contrast, contrast_ratio, hsl_to_rgb, is_large_text, meets_wcag, parse_color,
    relative_luminance, rgb_to_hsl, suggest_fixed_color, suggest_fixed_color_for_apca, Rgb,
};
use lumen_core::WcagLevel;

fn color(input: &str) -> Rgb {
    parse_color(input).expect("valid color")
}

#[test]
fn test_black_white_ratio_is_21() {
    let ratio = contrast_ratio(color("black"), color("white"));
    assert!((ratio - 21.0).abs() < 0.01, "got {ratio}");
}

#[test]
fn test_identical_colors_have_ratio_one() {
    for input in ["#000", "#7f7f7f", "rgb(12, 200, 99)", "hsl(210, 50%, 40%)", "white"] {
        let c = color(input);
        assert!((contrast_ratio(c, c) - 1.0).abs() < 1e-9, "{input}");
    }
}

#[test]
fn test_ratio_is_symmetric_and_bounded() {
    let palette: Vec<Rgb> = ["#123456", "#fedcba", "red", "navy", "#ccc", "orange"]
        .iter()
        .map(|c| color(c))
        .collect();

    for &a in &palette {
        for &b in &palette {
            let ab = contrast_ratio(a, b);
            assert!((ab - contrast_ratio(b, a)).abs() < 1e-12);
            assert!((1.0..=21.0).contains(&ab));
        }
    }
}

#[test]
fn test_primary_luminance_order() {
    let green = relative_luminance(color("#00ff00"));
    let red = relative_luminance(color("#ff0000"));
    let blue = relative_luminance(color("#0000ff"));
    assert!(green > red && red > blue);
}

#[test]
fn test_meets_wcag_boundaries_are_inclusive() {
    assert!(meets_wcag(4.5, WcagLevel::AA, false));
    assert!(!meets_wcag(4.49, WcagLevel::AA, false));
    assert!(meets_wcag(3.0, WcagLevel::AA, true));
    assert!(!meets_wcag(2.99, WcagLevel::AA, true));
    assert!(meets_wcag(7.0, WcagLevel::AAA, false));
    assert!(!meets_wcag(6.99, WcagLevel::AAA, false));
    assert!(meets_wcag(4.5, WcagLevel::AAA, true));
}

#[test]
fn test_large_text_boundaries() {
    assert!(is_large_text(24.0, 400));
    assert!(!is_large_text(23.9, 400));
    assert!(is_large_text(18.5, 700));
    assert!(!is_large_text(18.4, 700));
    assert!(!is_large_text(18.5, 600));
}

#[test]
fn test_hsl_round_trip_within_one_step() {
    for r in (0..=255).step_by(51) {
        for g in (0..=255).step_by(51) {
            for b in (0..=255).step_by(51) {
                let original = Rgb::new(r, g, b);
                let back = hsl_to_rgb(rgb_to_hsl(original));
                assert!(original.r.abs_diff(back.r) <= 1, "{original} -> {back}");
                assert!(original.g.abs_diff(back.g) <= 1, "{original} -> {back}");
                assert!(original.b.abs_diff(back.b) <= 1, "{original} -> {back}");
            }
        }
    }
}

#[test]
fn test_fix_reaches_target_for_realistic_pairs() {
    let pairs = [
        ("#999", "#fff", 4.5),
        ("#aaa", "#fff", 7.0),
        ("#444", "#000", 4.5),
        ("rgb(255, 100, 100)", "white", 4.5),
        ("#6a9", "#f8f8f8", 3.0),
        ("#ffd700", "#fffacd", 4.5),
    ];

    for (fg, bg, target) in pairs {
        let (fg, bg) = (color(fg), color(bg));
        let fix = suggest_fixed_color(fg, bg, target);
        assert!(fix.meets_target, "{fg} on {bg}");
        assert!(
            contrast_ratio(fix.foreground, bg) >= target - 0.1,
            "{fg} on {bg}: {}",
            contrast_ratio(fix.foreground, bg)
        );
    }
}

#[test]
fn test_fix_leaves_passing_pair_no_worse() {
    let fg = color("#222");
    let bg = color("#fafafa");
    let fix = suggest_fixed_color(fg, bg, 4.5);
    assert_eq!(fix.foreground, fg);
    assert!(contrast_ratio(fix.foreground, bg) >= contrast_ratio(fg, bg));
}

#[test]
fn test_fix_never_flips_polarity() {
    let bg = color("#808080");
    let dark = suggest_fixed_color(color("#707070"), bg, 4.5);
    assert!(relative_luminance(dark.foreground) < relative_luminance(bg));
    let light = suggest_fixed_color(color("#909090"), bg, 3.0);
    assert!(relative_luminance(light.foreground) > relative_luminance(bg));
}

#[test]
fn test_apca_polarity_and_zero() {
    assert!(apca_contrast(color("black"), color("white")) > 0.0);
    assert!(apca_contrast(color("white"), color("black")) < 0.0);
    let gray = color("#888");
    assert!(apca_contrast(gray, gray).abs() < 1.0);
}

#[test]
fn test_apca_fix_reaches_body_threshold() {
    let fix = suggest_fixed_color_for_apca(color("#999"), color("#fff"), 75.0);
    assert!(fix.meets_target);
    assert!(apca_contrast(fix.foreground, color("#fff")).abs() >= 75.0);
}
