// tests/render_paths.rs
use glam::Vec2;
use proptest::prelude::*;
use turtle_lesson::{
    Command, CommandRecord, RenderConfig, RenderError, Rgb, StrokeColor, SvgSurface,
    TurtleRenderer, parse_commands, render,
};

const W: f32 = 400.0;
const H: f32 = 300.0;

fn square() -> Vec<Command> {
    (0..4)
        .flat_map(|_| [Command::Forward(100.0), Command::TurnRight(90.0)])
        .collect()
}

#[test]
fn test_empty_sequence_leaves_cursor_at_center() {
    let path = render(&[], W, H).unwrap();

    assert!(path.is_empty());
    assert_eq!(path.command_count, 0);
    assert_eq!(path.cursor.position, Vec2::new(200.0, 150.0));
    assert_eq!(path.cursor.heading, 0.0);
}

#[test]
fn test_square_closes_on_start() {
    let path = render(&square(), W, H).unwrap();

    assert_eq!(path.segment_count(), 4);
    assert!(
        path.cursor.position.distance(Vec2::new(200.0, 150.0)) < 1e-3,
        "square should return to its start, ended at {:?}",
        path.cursor.position
    );
    assert!(path.cursor.heading.abs() < 1e-3 || (360.0 - path.cursor.heading) < 1e-3);

    // Heading 0 points along +x; a right turn points down the screen (+y).
    let first = path.segments[0];
    assert!(first.end.distance(Vec2::new(300.0, 150.0)) < 1e-3);
    let second = path.segments[1];
    assert!(second.end.distance(Vec2::new(300.0, 250.0)) < 1e-3);
}

#[test]
fn test_left_turn_mirrors_right_turn() {
    let path = render(&[Command::TurnLeft(90.0), Command::Forward(50.0)], W, H).unwrap();

    assert_eq!(path.cursor.heading, 270.0);
    assert!(path.cursor.position.distance(Vec2::new(200.0, 100.0)) < 1e-3);
}

#[test]
fn test_negative_distance_moves_backward() {
    let path = render(&[Command::Forward(-30.0)], W, H).unwrap();

    assert!(path.cursor.position.distance(Vec2::new(170.0, 150.0)) < 1e-4);
    assert_eq!(path.segments[0].start, Vec2::new(200.0, 150.0));
}

#[test]
fn test_zero_distance_emits_degenerate_segment() {
    let path = render(
        &[Command::Forward(0.0), Command::TurnRight(0.0), Command::Forward(0.0)],
        W,
        H,
    )
    .unwrap();

    assert_eq!(path.segment_count(), 2, "zero-length forwards still emit segments");
    assert!(path.segments.iter().all(|s| s.length() == 0.0));
    assert_eq!(path.segments[1].command_index, 2);
}

#[test]
fn test_paths_are_not_clipped() {
    let path = render(&[Command::Forward(10_000.0)], W, H).unwrap();
    let (_, max) = path.bounds().unwrap();

    assert!(max.x > W, "segment should extend past the surface");
}

#[test]
fn test_below_threshold_uses_fixed_color() {
    let commands: Vec<Command> = (0..49).map(|_| Command::Forward(1.0)).collect();
    let path = render(&commands, W, H).unwrap();

    let base = StrokeColor::Fixed(Rgb(0x3B, 0x82, 0xF6));
    assert!(path.segments.iter().all(|s| s.color == base));
    assert!(path.segments.iter().all(|s| s.width == 2.0));
}

#[test]
fn test_at_threshold_rotates_hue_across_sequence() {
    let commands: Vec<Command> = (0..50).map(|_| Command::Forward(1.0)).collect();
    let path = render(&commands, W, H).unwrap();

    let hues: Vec<f32> = path
        .segments
        .iter()
        .map(|s| match s.color {
            StrokeColor::Hsl { hue, .. } => hue,
            StrokeColor::Fixed(_) => panic!("expected gradient color"),
        })
        .collect();

    assert_eq!(hues[0], 0.0);
    assert!((hues[25] - 180.0).abs() < 1e-3);
    assert!((hues[49] - 352.8).abs() < 1e-3);
    assert!(hues.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_hue_index_counts_turns() {
    let commands: Vec<Command> = (0..30)
        .flat_map(|i| [Command::Forward(i as f32), Command::TurnRight(91.0)])
        .collect();
    let path = render(&commands, W, H).unwrap();

    // Forward at index 2 of 60 commands.
    match path.segments[1].color {
        StrokeColor::Hsl { hue, .. } => assert!((hue - 12.0).abs() < 1e-4),
        other => panic!("unexpected color {other:?}"),
    }
}

#[test]
fn test_custom_threshold() {
    let renderer = TurtleRenderer::new(RenderConfig {
        gradient_threshold: 2,
        ..Default::default()
    });
    let path = renderer
        .render(&[Command::Forward(1.0), Command::Forward(1.0)], W, H)
        .unwrap();

    assert!(matches!(path.segments[0].color, StrokeColor::Hsl { .. }));
}

#[test]
fn test_invalid_surface_fails_loudly() {
    assert!(matches!(
        render(&[], f32::NAN, H),
        Err(RenderError::InvalidSurface { .. })
    ));
    assert!(render(&[], W, f32::INFINITY).is_err());
    assert!(render(&[], -1.0, H).is_err());
    assert!(render(&[], 0.0, 0.0).is_ok(), "an empty surface is still valid");
}

#[test]
fn test_malformed_entries_are_skipped() {
    let json = r#"[
        {"type": "forward", "distance": 100},
        {"type": "penup"},
        {"type": "right"},
        "garbage",
        {"type": "right", "degrees": 90},
        {"distance": 5},
        {"type": "forward", "distance": 50.5}
    ]"#;
    let trace = parse_commands(json).unwrap();

    assert_eq!(trace.len(), 7, "skipped entries keep their slot");
    assert_eq!(trace.skipped(), 4);
    assert_eq!(
        trace.commands().copied().collect::<Vec<_>>(),
        vec![
            Command::Forward(100.0),
            Command::TurnRight(90.0),
            Command::Forward(50.5)
        ]
    );
    assert_eq!(trace.entries()[1], None);
}

#[test]
fn test_non_array_payload_is_an_error() {
    assert!(parse_commands(r#"{"type": "forward"}"#).is_err());
    assert!(parse_commands("not json").is_err());
}

#[test]
fn test_skipped_record_is_a_no_op_in_place() {
    let records = vec![
        CommandRecord::forward(10.0),
        CommandRecord::left(45.0),
        CommandRecord {
            kind: "jump".into(),
            ..Default::default()
        },
        CommandRecord::forward(10.0),
    ];
    let renderer = TurtleRenderer::default();
    let from_records = renderer.render_records(&records, W, H).unwrap();
    let direct = renderer
        .render(
            &[
                Command::Forward(10.0),
                Command::TurnLeft(45.0),
                Command::Forward(10.0),
            ],
            W,
            H,
        )
        .unwrap();

    assert_eq!(from_records.cursor, direct.cursor);
    assert_eq!(from_records.segment_count(), 2);
    for (a, b) in from_records.segments.iter().zip(&direct.segments) {
        assert_eq!((a.start, a.end), (b.start, b.end));
    }
    assert_eq!(from_records.command_count, 4);
    assert_eq!(from_records.segments[1].command_index, 3);
}

#[test]
fn test_skipped_entry_counts_toward_gradient() {
    let mut entries = vec![r#"{"type": "penup"}"#.to_string()];
    entries.extend((0..49).map(|_| r#"{"type": "forward", "distance": 2}"#.to_string()));
    let json = format!("[{}]", entries.join(","));

    let trace = parse_commands(&json).unwrap();
    assert_eq!(trace.len(), 50);

    let path = TurtleRenderer::default().render_trace(&trace, W, H).unwrap();
    assert_eq!(path.segment_count(), 49);
    match path.segments[0].color {
        StrokeColor::Hsl { hue, .. } => assert!((hue - 7.2).abs() < 1e-4, "hue {hue}"),
        other => panic!("50 entries should use the gradient, got {other:?}"),
    }
}

#[test]
fn test_empty_total_never_yields_nan_hue() {
    let config = RenderConfig {
        gradient_threshold: 0,
        ..Default::default()
    };

    assert_eq!(
        config.color_for(0, 0),
        StrokeColor::Fixed(config.base_color)
    );
    let path = TurtleRenderer::new(config).render(&[], W, H).unwrap();
    assert!(path.is_empty());
}

#[test]
fn test_svg_surface_replays_path() {
    let path = render(&square(), W, H).unwrap();
    let mut svg = SvgSurface::new(W, H);
    path.draw(&mut svg);
    path.draw(&mut svg);

    assert_eq!(svg.stroke_count(), 4, "drawing again replaces the previous frame");
    let doc = svg.to_svg();
    assert!(doc.starts_with("<svg"));
    assert!(doc.contains(r##"stroke="#3B82F6""##));
    assert!(doc.contains("M 200 150 L 300 150"));
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (-500.0f32..500.0).prop_map(Command::Forward),
        (-720.0f32..720.0).prop_map(Command::TurnRight),
        (-720.0f32..720.0).prop_map(Command::TurnLeft),
    ]
}

proptest! {
    #[test]
    fn prop_render_is_pure(commands in prop::collection::vec(command(), 0..120)) {
        let a = render(&commands, W, H).unwrap();
        let b = render(&commands, W, H).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_one_segment_per_forward(commands in prop::collection::vec(command(), 0..120)) {
        let path = render(&commands, W, H).unwrap();
        let forwards = commands
            .iter()
            .filter(|c| matches!(c, Command::Forward(_)))
            .count();
        prop_assert_eq!(path.segment_count(), forwards);
        prop_assert_eq!(path.command_count, commands.len());
        prop_assert!(path.cursor.heading >= 0.0 && path.cursor.heading < 360.0);
    }

    #[test]
    fn prop_segments_are_contiguous(commands in prop::collection::vec(command(), 1..60)) {
        let path = render(&commands, W, H).unwrap();
        for pair in path.segments.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        if let Some(last) = path.segments.last() {
            prop_assert_eq!(last.end, path.cursor.position);
        }
    }
}
