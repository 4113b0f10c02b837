#![no_main]

use libfuzzer_sys::fuzz_target;
use reorder_core::easing::Easing;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 256 {
        return;
    }

    // Parsing must never panic.
    let Ok(easing) = text.parse::<Easing>() else {
        return;
    };

    // Anything accepted renders to CSS that parses back to the same curve.
    let css = easing.css();
    assert_eq!(css.parse::<Easing>(), Ok(easing), "css round trip: {css}");

    // Endpoints are fixed for every accepted curve.
    assert_eq!(easing.apply(0.0), 0.0);
    assert_eq!(easing.apply(1.0), 1.0);

    // Extreme y control points may overflow; only sample sane curves.
    if let Easing::CubicBezier { y1, y2, .. } = easing
        && (y1.abs() > 1e6 || y2.abs() > 1e6)
    {
        return;
    }
    for i in 0..=16 {
        let t = i as f32 / 16.0;
        let v = easing.apply(t);
        assert!(!v.is_nan(), "{easing}: apply({t}) is NaN");
    }
});
