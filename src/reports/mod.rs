use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use strum::IntoEnumIterator;
use virtual_mouse::action::ActionKind;
use virtual_mouse::config::Config;
use virtual_mouse::gesture::InteractionMode;
use virtual_mouse::session::SessionStats;

pub fn print_gesture_guide(config: &Config) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Gesture").add_attribute(Attribute::Bold),
        Cell::new("Hand pose").add_attribute(Attribute::Bold),
        Cell::new("Mouse").add_attribute(Attribute::Bold),
    ]);

    let hold_ms = config.gestures.drag_hold_secs * 1000.0;
    let rows = [
        ("Move", "Index finger up", "Cursor follows index tip".to_string(), Color::Cyan),
        (
            "Left click",
            "Index + middle up, pinch their tips",
            "One click per pinch".to_string(),
            Color::Green,
        ),
        (
            "Right click",
            "Pointing, quick thumb-index pinch",
            format!("Click on release (< {:.0} ms)", hold_ms),
            Color::Yellow,
        ),
        (
            "Drag",
            "Pointing, hold thumb-index pinch",
            format!("Button down after {:.0} ms, up on release", hold_ms),
            Color::Magenta,
        ),
        (
            "Scroll",
            "Ring + pinky up, others down",
            "Hand above/below centre band scrolls up/down".to_string(),
            Color::Blue,
        ),
    ];
    for (name, pose, effect, color) in rows {
        table.add_row(vec![
            Cell::new(name).fg(color).add_attribute(Attribute::Bold),
            Cell::new(pose),
            Cell::new(effect),
        ]);
    }

    println!("\n{}", table);
}

pub fn print_session_summary(stats: &SessionStats) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Session").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    let hand_pct = if stats.frames > 0 {
        stats.hand_frames as f64 / stats.frames as f64 * 100.0
    } else {
        0.0
    };
    table.add_row(vec![Cell::new("Frames"), Cell::new(stats.frames)]);
    table.add_row(vec![
        Cell::new("Hand visible"),
        Cell::new(format!("{} ({:.1}%)", stats.hand_frames, hand_pct)),
    ]);
    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(format!("{:.2} s", stats.duration.as_secs_f64())),
    ]);
    table.add_row(vec![
        Cell::new("Average FPS"),
        Cell::new(format!("{:.1}", stats.avg_fps)).fg(Color::Cyan),
    ]);

    for mode in InteractionMode::iter() {
        table.add_row(vec![
            Cell::new(format!("Frames in {}", mode)),
            Cell::new(stats.mode_count(mode)),
        ]);
    }
    for kind in ActionKind::iter() {
        let n = stats.action_count(kind);
        let cell = if n > 0 {
            Cell::new(n).fg(Color::Green)
        } else {
            Cell::new(n)
        };
        table.add_row(vec![Cell::new(format!("{} actions", kind)), cell]);
    }
    if stats.dispatch_errors > 0 {
        table.add_row(vec![
            Cell::new("Dispatch errors"),
            Cell::new(stats.dispatch_errors).fg(Color::Red),
        ]);
    }

    println!("\n{}", table);
}
