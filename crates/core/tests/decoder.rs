//! Importer tests: running context, emitted objects, skipped content, and
//! the documented losses of an encode/decode round trip.

mod common;

use common::{barcode, diag_codes, find_diag, rectangle, text};
use zpl_label_core::scene::object::{DEFAULT_BARCODE_DATA, DEFAULT_FONT_SIZE};
use zpl_label_core::{
    LabelSettings, ObjectKind, ObjectType, Scene, Severity, Symbology, codes, decode, decode_zpl,
    encode_scene,
};

// ─── Running context ─────────────────────────────────────────────────────────

#[test]
fn field_data_uses_running_origin_and_font() {
    let objects = decode("^XA\n^FO40,60\n^AD,N,48,48\n^FDPallet 7^FS\n^XZ\n");
    assert_eq!(objects.len(), 1);
    let t = &objects[0];
    assert_eq!((t.x, t.y, t.width, t.height), (40, 60, 100, 30));
    assert_eq!(
        t.kind,
        ObjectKind::Text {
            text: "Pallet 7".into(),
            font: 'D',
            font_size: 48,
        }
    );
}

#[test]
fn initial_context_is_origin_and_font_a() {
    let objects = decode("^FDno origin");
    assert_eq!((objects[0].x, objects[0].y), (0, 0));
    assert!(matches!(
        objects[0].kind,
        ObjectKind::Text {
            font: 'A',
            font_size: DEFAULT_FONT_SIZE,
            ..
        }
    ));
}

#[test]
fn compact_font_form_is_understood() {
    let objects = decode("^A0N,22,22\n^FDx^FS");
    assert!(matches!(
        objects[0].kind,
        ObjectKind::Text {
            font: '0',
            font_size: 22,
            ..
        }
    ));
}

#[test]
fn every_field_separator_is_stripped_from_text() {
    let objects = decode("^FDa^FSb^FS");
    assert_eq!(objects[0].text(), Some("ab"));
}

#[test]
fn lines_are_trimmed_and_blank_lines_skipped() {
    let result = decode_zpl("  ^FO5,5  \n\n\t^GB10,20,3^FS\r\n");
    assert_eq!(result.objects.len(), 1);
    assert_eq!((result.objects[0].x, result.objects[0].y), (5, 5));
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

// ─── Shapes and barcodes ─────────────────────────────────────────────────────

#[test]
fn box_without_thickness_defaults_to_two() {
    let objects = decode("^FO1,2\n^GB30,40^FS");
    assert_eq!((objects[0].width, objects[0].height), (30, 40));
    assert_eq!(
        objects[0].kind,
        ObjectKind::Rectangle {
            border_thickness: 2
        }
    );
}

#[test]
fn circle_is_square_of_diameter() {
    let objects = decode("^GC44,5^FS\n^GC10^FS");
    assert_eq!((objects[0].width, objects[0].height), (44, 44));
    assert_eq!(
        objects[0].kind,
        ObjectKind::Circle {
            border_thickness: 5
        }
    );
    assert_eq!(
        objects[1].kind,
        ObjectKind::Circle {
            border_thickness: 2
        }
    );
}

#[test]
fn barcode_symbology_comes_from_command_letter() {
    let cases = [
        ("^BCN,60,Y,N,Y", Symbology::Code128),
        ("^B3N,N,60,Y,N,Y", Symbology::Code39),
        ("^BAN,60,Y,N,Y", Symbology::Code93),
        ("^B2N,N,60,Y,N,Y", Symbology::Interleaved2of5),
        ("^BEN,60,Y,N,Y", Symbology::Ean13),
        ("^B8N,60,Y,N", Symbology::Ean8),
        ("^BUN,60,Y,N,Y", Symbology::UpcA),
        ("^B9N,60,Y,N,Y", Symbology::UpcE),
    ];
    for (line, expected) in cases {
        let objects = decode(line);
        assert_eq!(objects.len(), 1, "{line}");
        assert!(
            matches!(objects[0].kind, ObjectKind::Barcode { symbology, .. } if symbology == expected),
            "{line} -> {:?}",
            objects[0].kind
        );
    }
}

#[test]
fn bar_parameters_do_not_start_a_barcode() {
    let objects = decode("^BY2,3,80");
    assert!(objects.is_empty());
}

#[test]
fn unsupported_symbology_imports_as_code128() {
    let result = decode_zpl("^FO0,0\n^BQN,2,10");
    assert_eq!(result.objects.len(), 1);
    assert!(matches!(
        result.objects[0].kind,
        ObjectKind::Barcode {
            symbology: Symbology::Code128,
            ..
        }
    ));
    let d = find_diag(&result.diagnostics, codes::DECODER_INCOMPLETE_COMMAND).unwrap();
    assert_eq!(d.severity, Severity::Info);
    let context = d.context.as_ref().unwrap();
    assert_eq!(context["line"], "2");
    assert_eq!(context["command"], "^BQ");
}

#[test]
fn qr_label_keeps_its_barcode_and_data() {
    let result = decode_zpl("^XA\n^FO10,10\n^BQN,2,10\n^FDQA,hello^FS\n^XZ\n");
    assert_eq!(result.objects.len(), 2);
    let b = &result.objects[0];
    assert_eq!((b.x, b.y, b.width, b.height), (10, 10, 120, 60));
    assert_eq!(b.object_type(), ObjectType::Barcode);
    assert!(matches!(
        b.kind,
        ObjectKind::Barcode {
            symbology: Symbology::Code128,
            ..
        }
    ));
    assert!(matches!(
        &result.objects[1].kind,
        ObjectKind::Text { text, .. } if text == "QA,hello"
    ));
    assert_eq!(
        diag_codes(&result.diagnostics),
        [codes::DECODER_INCOMPLETE_COMMAND]
    );
}

#[test]
fn bare_barcode_prefix_is_incomplete() {
    let result = decode_zpl("^B");
    assert!(result.objects.is_empty());
    assert_eq!(
        diag_codes(&result.diagnostics),
        [codes::DECODER_INCOMPLETE_COMMAND]
    );
}

// ─── Skipped content ─────────────────────────────────────────────────────────

#[test]
fn unrecognized_text_yields_nothing() {
    let result = decode_zpl("hello\nworld");
    assert!(result.objects.is_empty());
    assert_eq!(
        diag_codes(&result.diagnostics),
        [
            codes::DECODER_UNRECOGNIZED_LINE,
            codes::DECODER_UNRECOGNIZED_LINE
        ]
    );
    assert!(decode("").is_empty());
}

#[test]
fn unrecognized_line_span_points_at_the_line() {
    let input = "^XA\n  ^LH0,0\n^XZ";
    let result = decode_zpl(input);
    let d = find_diag(&result.diagnostics, codes::DECODER_UNRECOGNIZED_LINE).unwrap();
    let span = d.span.unwrap();
    assert_eq!(&input[span.start..span.end], "^LH0,0");
}

#[test]
fn origin_with_one_coordinate_keeps_previous_position() {
    let result = decode_zpl("^FO10,20\n^FO99\n^GB5,5,1^FS");
    assert_eq!((result.objects[0].x, result.objects[0].y), (10, 20));
    assert_eq!(
        diag_codes(&result.diagnostics),
        [codes::DECODER_INCOMPLETE_COMMAND]
    );
}

#[test]
fn structural_lines_are_skipped_silently() {
    let result = decode_zpl("^XA\n^POI\n^BY3,2,100\n^FWR\n^XGLOGO,1,1^FS\n^FS\n^XZ");
    assert!(result.objects.is_empty());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn decoded_ids_are_unique() {
    let input = "^GB1,1,1\n".repeat(200);
    let objects = decode(&input);
    let mut ids: Vec<_> = objects.iter().map(|o| o.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 200);
}

// ─── Round trips ─────────────────────────────────────────────────────────────

fn round_trip(objects: Vec<zpl_label_core::SceneObject>) -> Vec<zpl_label_core::SceneObject> {
    let zpl = encode_scene(&Scene::from_objects(objects), &LabelSettings::default());
    decode(&zpl)
}

#[test]
fn rectangle_round_trips() {
    let back = round_trip(vec![rectangle("r", 12, 34, 150, 75, 4)]);
    assert_eq!(back.len(), 1);
    let r = &back[0];
    assert_eq!(r.object_type(), ObjectType::Rectangle);
    assert_eq!((r.x, r.y, r.width, r.height), (12, 34, 150, 75));
    assert_eq!(r.kind, ObjectKind::Rectangle { border_thickness: 4 });
}

#[test]
fn text_round_trip_loses_geometry_and_rotation() {
    let mut t = text("t", "Fragile", 30, 40, 240);
    t.height = 90;
    t.rotation = 90;
    if let ObjectKind::Text { font_size, .. } = &mut t.kind {
        *font_size = 60;
    }
    let back = round_trip(vec![t]);
    assert_eq!(back.len(), 1);
    let t = &back[0];
    assert_eq!((t.x, t.y), (30, 40));
    assert_eq!(t.text(), Some("Fragile"));
    assert_eq!((t.width, t.height), (100, 30), "size is not carried");
    assert_eq!(t.rotation, 0, "rotation is not carried");
}

#[test]
fn barcode_round_trip_keeps_only_symbology_and_position() {
    let mut b = barcode("b", "555000111", 8, 16, 300, 140);
    if let ObjectKind::Barcode { symbology, .. } = &mut b.kind {
        *symbology = Symbology::Code39;
    }
    let back = round_trip(vec![b]);

    let codes_back: Vec<_> = back
        .iter()
        .filter(|o| o.object_type() == ObjectType::Barcode)
        .collect();
    assert_eq!(codes_back.len(), 1);
    let b = codes_back[0];
    assert_eq!((b.x, b.y), (8, 16));
    assert_eq!((b.width, b.height), (120, 60), "geometry stays at defaults");
    assert_eq!(b.text(), Some(DEFAULT_BARCODE_DATA));
    assert!(matches!(
        b.kind,
        ObjectKind::Barcode {
            symbology: Symbology::Code39,
            module_width: 3,
            ratio: 2,
            bar_height: 100,
            ..
        }
    ));

    // The barcode's field data comes back as a separate text object.
    let caption = back
        .iter()
        .find(|o| o.object_type() == ObjectType::Text)
        .unwrap();
    assert_eq!(caption.text(), Some("555000111"));
}
