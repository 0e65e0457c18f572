// segment/tests/properties.rs
//
// Properties that must hold for every text and boundary kind:
// - Walking backward finds exactly the boundaries found walking forward
// - 0 and the length of non-empty text are boundaries
// - previous_boundary(next_boundary(b)) == b for every boundary b
// - Canonically decomposed text has as many clusters as composed text

use unicode_normalization::UnicodeNormalization;
use unicorn_segment::{next_boundary, previous_boundary, BoundaryKind, Text};

const SAMPLES: &[&str] = &[
    "Hello World",
    "Hello there. How are you? Fine.",
    "\u{1F468}\u{1F3FC}\u{200D}\u{1F680}\u{1F468}\u{1F3FD}\u{200D}\u{1F680} landed on the \u{1F315}",
    "can't stop 3.14 \u{5E9}\u{5DC}\u{5D5}\u{5DD} \u{30AB}\u{30BF}\u{30AB}\u{30CA}",
    "line one\r\nline two\n\nU.S. report, e.g. this.",
    "\u{1F1FA}\u{1F1F8}\u{1F1EB}\u{1F1F7}\u{1F1E9}",
    "\u{915}\u{94D}\u{937}\u{93F} \u{1100}\u{1161}\u{11A8}",
    "x",
];

fn forward(kind: BoundaryKind, text: &Text<'_>) -> Vec<usize> {
    let mut out = vec![0];
    let mut cursor = 0;
    while let Some(b) = next_boundary(kind, text, cursor).unwrap() {
        assert!(b > cursor, "{kind}: {b} does not advance past {cursor}");
        out.push(b);
        cursor = b;
    }
    out
}

fn backward(kind: BoundaryKind, text: &Text<'_>) -> Vec<usize> {
    let mut out = vec![text.end()];
    let mut cursor = text.end();
    while let Some(b) = previous_boundary(kind, text, cursor).unwrap() {
        assert!(b < cursor, "{kind}: {b} does not retreat before {cursor}");
        out.push(b);
        cursor = b;
    }
    out.reverse();
    out
}

#[test]
fn test_directional_symmetry() {
    for s in SAMPLES {
        let text = Text::from(*s);
        for kind in BoundaryKind::ALL {
            assert_eq!(forward(kind, &text), backward(kind, &text), "{kind}: {s:?}");
        }
    }
}

#[test]
fn test_directional_symmetry_utf16() {
    for s in SAMPLES {
        let units: Vec<u16> = s.encode_utf16().collect();
        let text = Text::utf16(&units);
        for kind in BoundaryKind::ALL {
            assert_eq!(forward(kind, &text), backward(kind, &text), "{kind}: {s:?}");
        }
    }
}

#[test]
fn test_text_edges_are_boundaries() {
    for s in SAMPLES {
        let text = Text::from(*s);
        for kind in BoundaryKind::ALL {
            let found = forward(kind, &text);
            assert_eq!(found.first(), Some(&0));
            assert_eq!(found.last(), Some(&s.len()), "{kind}: {s:?}");
        }
    }
}

#[test]
fn test_next_then_previous_round_trip() {
    for s in SAMPLES {
        let text = Text::from(*s);
        for kind in BoundaryKind::ALL {
            let found = forward(kind, &text);
            for pair in found.windows(2) {
                assert_eq!(
                    previous_boundary(kind, &text, pair[1]),
                    Ok(Some(pair[0])),
                    "{kind}: {s:?}"
                );
                assert_eq!(next_boundary(kind, &text, pair[0]), Ok(Some(pair[1])));
            }
        }
    }
}

#[test]
fn test_decomposition_keeps_cluster_count() {
    for s in ["r\u{E9}sum\u{E9}", "\u{1EC7}\u{1EBF}t", "\u{C5}ngstr\u{F6}m", "\u{D55C}\u{AE00}"] {
        let composed: String = s.nfc().collect();
        let decomposed: String = s.nfd().collect();
        let count = |t: &str| forward(BoundaryKind::Grapheme, &Text::from(t)).len() - 1;
        assert_eq!(count(&decomposed), composed.chars().count(), "{s:?}");
    }
}

#[test]
fn test_every_boundary_is_on_a_code_point() {
    for s in SAMPLES {
        let text = Text::from(*s);
        for kind in BoundaryKind::ALL {
            for b in forward(kind, &text) {
                assert!(s.is_char_boundary(b), "{kind}: {b} in {s:?}");
            }
        }
    }
}
