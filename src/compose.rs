//! # Sheet Composer
//!
//! Orchestrates one generation run: drives the identifier sequencer, the
//! template expander and the QR payload builder per distinct label, asks
//! the grid packer for each placement cell, and emits one draw-command
//! batch per physical slot. Slot order is fixed: outer loop over distinct
//! identifiers, inner loop over repetitions.
//!
//! The composer is purely sequential and allocates nothing shared; a run
//! owns its packer and cursor, and the result is a materialized [`Sheet`].

use tracing::{debug, warn};

use crate::error::EtiquetaError;
use crate::layout::{Cell, GridPacker};
use crate::model::{DrawCommand, LabelSlot, Metrics, Page, Sheet, SheetConfig};
use crate::qr::build_payload;
use crate::sequence::Sequencer;
use crate::template::{expand, unbound_placeholders, Bindings};

/// Distance from the label's top edge to the first text baseline, points.
const TEXT_TOP_INSET: f64 = 10.0;

/// One fully resolved label, built once per distinct identifier and reused
/// across its repetitions. Discarded after its slots are emitted.
struct LabelInstance {
    identifier: String,
    lines: Vec<String>,
    payload: Option<String>,
}

/// Compose a sheet with the built-in `REF` binding only.
pub fn compose(config: &SheetConfig) -> Result<Sheet, EtiquetaError> {
    compose_with(config, |_, _| {})
}

/// Compose a sheet with caller-derived auxiliary bindings.
///
/// `derive` runs once per distinct identifier with the zero-based index
/// and the bindings map already holding `REF`; whatever it inserts is
/// available to template lines and the QR payload. Derivations must be
/// deterministic functions of the index for the run to stay reproducible.
pub fn compose_with<F>(config: &SheetConfig, derive: F) -> Result<Sheet, EtiquetaError>
where
    F: Fn(u32, &mut Bindings),
{
    let metrics = config.validate()?;
    let sequencer = Sequencer::derive(&config.start);

    // Warn once per unbound placeholder, probing with the first label's
    // bindings rather than per slot.
    let probe = resolve_bindings(&sequencer, 0, &derive);
    for name in unbound_placeholders(&config.lines, &probe) {
        warn!(placeholder = %name, "no binding for template placeholder; left verbatim");
    }

    let mut packer = GridPacker::new(&metrics);
    let mut sheet = Sheet {
        page_width: metrics.page_width,
        page_height: metrics.page_height,
        pages: vec![Page::default()],
    };

    for index in 0..config.count {
        let instance = resolve_instance(config, &metrics, &sequencer, index, &derive);
        for _ in 0..config.repetitions {
            let cell = packer.next_cell();
            while sheet.pages.len() <= cell.page {
                debug!(page = sheet.pages.len(), "page break");
                sheet.pages.push(Page::default());
            }
            sheet.pages[cell.page].slots.push(LabelSlot {
                identifier: instance.identifier.clone(),
                commands: draw_label(config, &metrics, &cell, &instance),
            });
        }
    }

    debug!(
        slots = sheet.slot_count(),
        pages = sheet.pages.len(),
        "composed sheet"
    );
    Ok(sheet)
}

fn resolve_bindings<F>(sequencer: &Sequencer, index: u32, derive: &F) -> Bindings
where
    F: Fn(u32, &mut Bindings),
{
    let mut bindings = Bindings::new();
    bindings.insert("REF".to_string(), sequencer.nth(index));
    derive(index, &mut bindings);
    bindings
}

fn resolve_instance<F>(
    config: &SheetConfig,
    metrics: &Metrics,
    sequencer: &Sequencer,
    index: u32,
    derive: &F,
) -> LabelInstance
where
    F: Fn(u32, &mut Bindings),
{
    let bindings = resolve_bindings(sequencer, index, derive);
    let lines = expand(&config.lines, &bindings);
    let payload = (config.qr && metrics.qr_size > 0.0)
        .then(|| build_payload(&config.qr_payload, &bindings));
    LabelInstance {
        identifier: bindings["REF"].clone(),
        lines,
        payload,
    }
}

/// The draw-command batch for one slot: border, text rows, optional QR.
fn draw_label(
    config: &SheetConfig,
    m: &Metrics,
    cell: &Cell,
    instance: &LabelInstance,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(instance.lines.len() + 2);

    commands.push(DrawCommand::Rect {
        x: cell.x,
        y: cell.y,
        width: m.label_width,
        height: m.label_height,
    });

    let mut offset = TEXT_TOP_INSET;
    for line in &instance.lines {
        commands.push(DrawCommand::Text {
            x: cell.x + m.padding,
            y: cell.y + m.label_height - offset,
            content: line.clone(),
            font_size: config.font_size,
        });
        offset += config.line_spacing;
    }

    if let Some(payload) = &instance.payload {
        commands.push(DrawCommand::Qr {
            x: cell.x + m.label_width - m.qr_size - m.padding,
            y: cell.y + m.padding,
            size: m.qr_size,
            payload: payload.clone(),
        });
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageSize, Unit};
    use crate::qr::QrPayload;

    fn config() -> SheetConfig {
        SheetConfig {
            start: "JB-0001".to_string(),
            count: 3,
            repetitions: 2,
            page: PageSize::Custom {
                width: 216.0,
                height: 279.0,
            },
            unit: Unit::Pt,
            label_width: 70.0,
            label_height: 50.0,
            margin_x: 10.0,
            margin_y: 10.0,
            padding: 5.0,
            font_size: 6.0,
            line_spacing: 8.0,
            lines: vec!["REF: {REF}".to_string()],
            qr: false,
            qr_size: 0.0,
            qr_payload: QrPayload::default(),
        }
    }

    #[test]
    fn test_slot_count_is_count_times_repetitions() {
        let sheet = compose(&config()).unwrap();
        assert_eq!(sheet.slot_count(), 6);
    }

    #[test]
    fn test_repetitions_are_adjacent() {
        let sheet = compose(&config()).unwrap();
        let ids: Vec<&str> = sheet.slots().map(|s| s.identifier.as_str()).collect();
        assert_eq!(
            ids,
            ["JB-0001", "JB-0001", "JB-0002", "JB-0002", "JB-0003", "JB-0003"]
        );
    }

    #[test]
    fn test_text_rows_stack_downward_from_top_inset() {
        let mut c = config();
        c.count = 1;
        c.repetitions = 1;
        c.lines = vec!["one".to_string(), "two".to_string()];
        let sheet = compose(&c).unwrap();
        let slot = sheet.slots().next().unwrap();

        // Label at (10, 219), height 50: first baseline at 219+50-10.
        match &slot.commands[1] {
            DrawCommand::Text { x, y, content, .. } => {
                assert_eq!(content, "one");
                assert!((x - 15.0).abs() < 0.001);
                assert!((y - 259.0).abs() < 0.001);
            }
            other => panic!("expected text, got {:?}", other),
        }
        match &slot.commands[2] {
            DrawCommand::Text { y, content, .. } => {
                assert_eq!(content, "two");
                assert!((y - 251.0).abs() < 0.001); // 259 - line_spacing
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_qr_anchored_bottom_right() {
        let mut c = config();
        c.count = 1;
        c.repetitions = 1;
        c.qr = true;
        c.qr_size = 30.0;
        let sheet = compose(&c).unwrap();
        let slot = sheet.slots().next().unwrap();

        let qr = slot
            .commands
            .iter()
            .find(|cmd| matches!(cmd, DrawCommand::Qr { .. }))
            .expect("qr command");
        match qr {
            DrawCommand::Qr { x, y, size, payload } => {
                // x = 10 + 70 - 30 - 5, y = 219 + 5
                assert!((x - 45.0).abs() < 0.001);
                assert!((y - 224.0).abs() < 0.001);
                assert!((size - 30.0).abs() < 0.001);
                assert_eq!(payload, "REF-JB-0001");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_qr_size_zero_emits_no_glyph() {
        let mut c = config();
        c.qr = true;
        c.qr_size = 0.0;
        let sheet = compose(&c).unwrap();
        assert!(sheet
            .slots()
            .all(|s| !s.commands.iter().any(|cmd| matches!(cmd, DrawCommand::Qr { .. }))));
    }

    #[test]
    fn test_derived_bindings_reach_lines_and_payload() {
        let mut c = config();
        c.count = 2;
        c.repetitions = 1;
        c.lines = vec!["LOT: {LOT}".to_string()];
        c.qr = true;
        c.qr_size = 20.0;
        c.qr_payload = QrPayload::Plain {
            template: "{REF}/{LOT}".to_string(),
        };

        let base_lot = 340u32;
        let sheet = compose_with(&c, |index, bindings| {
            bindings.insert("LOT".to_string(), format!("L{}", base_lot + index));
        })
        .unwrap();

        let slots: Vec<_> = sheet.slots().collect();
        match &slots[1].commands[1] {
            DrawCommand::Text { content, .. } => assert_eq!(content, "LOT: L341"),
            other => panic!("expected text, got {:?}", other),
        }
        match slots[1].commands.last().unwrap() {
            DrawCommand::Qr { payload, .. } => assert_eq!(payload, "JB-0002/L341"),
            other => panic!("expected qr, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_output() {
        let mut c = config();
        c.label_width = 500.0; // wider than the 216pt page
        assert!(matches!(
            compose(&c),
            Err(EtiquetaError::InvalidConfig(_))
        ));
    }
}
