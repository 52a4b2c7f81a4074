use egui::{Pos2, Rect, pos2, vec2};

use super::InputEvent;
use crate::canvas::{CanvasSurface, DrawOp, TextRasterizer};
use crate::color::{ColorModel, clamp_lenient};
use crate::config::EngineConfig;
use crate::history::HistoryManager;
use crate::state::{DragAction, EditorState, Gesture, TextEdit};
use crate::tools::{Shape, Tool};

/// Routes one input event through the gesture state machine.
///
/// Returns `true` when the event committed an action to history.
pub fn route_event(
    event: &InputEvent,
    state: &mut EditorState,
    colors: &ColorModel,
    canvas: &mut CanvasSurface,
    history: &mut HistoryManager,
    text: Option<&TextRasterizer>,
    config: &EngineConfig,
) -> bool {
    match event {
        InputEvent::PointerDown { position } => {
            let position = clamp_to_canvas(canvas, *position);
            // At most one gesture is open at a time
            let committed = resolve_open_gesture(state, canvas, history, text, config);
            begin(state, colors, position);
            committed
        }
        InputEvent::PointerMove { position } => {
            let position = clamp_to_canvas(canvas, *position);
            if let Gesture::Dragging(action) = &mut state.gesture {
                drag_sample(action, canvas, position);
            }
            false
        }
        InputEvent::PointerUp { position } => {
            let position = clamp_to_canvas(canvas, *position);
            if !matches!(state.gesture, Gesture::Dragging(_)) {
                return false;
            }
            let Gesture::Dragging(mut action) = state.take_gesture() else {
                return false;
            };
            drag_sample(&mut action, canvas, position);
            finish_drag(action, canvas, history, config)
        }
        InputEvent::TextTyped(typed) => {
            if let Some(edit) = state.text_edit_mut() {
                edit.buffer.push_str(typed);
            }
            false
        }
        InputEvent::TextBackspace => {
            if let Some(edit) = state.text_edit_mut() {
                edit.buffer.pop();
            }
            false
        }
        InputEvent::TextConfirm | InputEvent::TextFocusLost => {
            if state.text_edit().is_none() {
                return false;
            }
            resolve_open_gesture(state, canvas, history, text, config)
        }
        InputEvent::TextCancel => {
            if let Gesture::TextEditing(edit) = state.take_gesture() {
                log::debug!("Text entry cancelled ({} chars dropped)", edit.buffer.len());
            }
            false
        }
    }
}

/// Close whatever gesture is open: a drag is released at its last point,
/// a text field is confirmed (blank content is discarded).
///
/// Returns `true` when this committed an action to history.
pub fn resolve_open_gesture(
    state: &mut EditorState,
    canvas: &mut CanvasSurface,
    history: &mut HistoryManager,
    text: Option<&TextRasterizer>,
    config: &EngineConfig,
) -> bool {
    match state.take_gesture() {
        Gesture::Idle => false,
        Gesture::Dragging(action) => finish_drag(action, canvas, history, config),
        Gesture::TextEditing(edit) => finish_text(edit, canvas, history, text, config),
    }
}

fn clamp_to_canvas(canvas: &CanvasSurface, position: Pos2) -> Pos2 {
    pos2(
        clamp_lenient(position.x, 0.0, canvas.width() as f32),
        clamp_lenient(position.y, 0.0, canvas.height() as f32),
    )
}

fn begin(state: &mut EditorState, colors: &ColorModel, position: Pos2) {
    let tool = state.active_tool();
    let settings = colors.render_settings();
    state.gesture = match tool {
        Tool::Text => Gesture::TextEditing(TextEdit {
            anchor: position,
            settings,
            buffer: String::new(),
        }),
        _ => Gesture::Dragging(DragAction::new(tool, position, settings)),
    };
    log::debug!("{} gesture started at {position:?}", tool.name());
}

fn drag_sample(action: &mut DragAction, canvas: &mut CanvasSurface, position: Pos2) {
    let Some(previous) = action.advance(position) else {
        return;
    };
    let settings = action.settings;
    match action.tool {
        Tool::Pencil => canvas.commit(&DrawOp::Segment {
            from: previous,
            to: position,
            color: settings.outline,
            width: settings.stroke_width,
            opacity: settings.opacity,
        }),
        Tool::Eraser => canvas.commit(&DrawOp::Erase {
            center: position,
            side: settings.stroke_width,
        }),
        tool => {
            if let Some(kind) = tool.shape_kind() {
                canvas.clear_preview();
                canvas.draw_preview(&DrawOp::Shape {
                    shape: Shape::from_drag(kind, action.anchor, position),
                    settings,
                });
            }
        }
    }
}

fn finish_drag(
    action: DragAction,
    canvas: &mut CanvasSurface,
    history: &mut HistoryManager,
    config: &EngineConfig,
) -> bool {
    if let Some(kind) = action.tool.shape_kind() {
        canvas.clear_preview();
        let shape = Shape::from_drag(kind, action.anchor, action.last);
        if shape.is_degenerate(config.min_shape_extent) {
            log::debug!(
                "Discarded {} ({}x{} is below the minimum extent)",
                action.tool.name(),
                shape.width(),
                shape.height()
            );
            return false;
        }
        canvas.commit(&DrawOp::Shape {
            shape,
            settings: action.settings,
        });
    } else if action.points < 2 {
        log::debug!("Discarded {} stroke with a single point", action.tool.name());
        return false;
    }
    history.commit_snapshot(canvas.snapshot());
    true
}

fn finish_text(
    edit: TextEdit,
    canvas: &mut CanvasSurface,
    history: &mut HistoryManager,
    text: Option<&TextRasterizer>,
    config: &EngineConfig,
) -> bool {
    let content = edit.buffer.trim();
    if content.is_empty() {
        log::debug!("Discarded empty text entry");
        return false;
    }
    let Some(rasterizer) = text else {
        log::warn!("No font loaded, discarding text {content:?}");
        return false;
    };
    let size = vec2(canvas.width() as f32, canvas.height() as f32);
    let clip = Rect::from_min_size(Pos2::ZERO, size);
    let mask = rasterizer.rasterize(content, edit.anchor, config.text_size, clip);
    if mask.is_empty() {
        log::debug!("Text {content:?} has no glyph coverage on the canvas");
        return false;
    }
    canvas.commit(&DrawOp::Glyphs {
        mask,
        color: edit.settings.fill,
        opacity: edit.settings.opacity,
    });
    history.commit_snapshot(canvas.snapshot());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    struct Fixture {
        state: EditorState,
        colors: ColorModel,
        canvas: CanvasSurface,
        history: HistoryManager,
        config: EngineConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let config = EngineConfig {
                canvas_width: 60,
                canvas_height: 40,
                ..EngineConfig::default()
            };
            let canvas = CanvasSurface::new(60, 40, config.background);
            let history = HistoryManager::new(canvas.snapshot(), config.history_depth);
            Self {
                state: EditorState::default(),
                colors: ColorModel::default(),
                canvas,
                history,
                config,
            }
        }

        fn send(&mut self, event: InputEvent) -> bool {
            route_event(
                &event,
                &mut self.state,
                &self.colors,
                &mut self.canvas,
                &mut self.history,
                None,
                &self.config,
            )
        }

        fn drag(&mut self, points: &[(f32, f32)]) -> bool {
            let (first, rest) = points.split_first().expect("at least one point");
            self.send(InputEvent::PointerDown {
                position: pos2(first.0, first.1),
            });
            for (x, y) in rest {
                self.send(InputEvent::PointerMove {
                    position: pos2(*x, *y),
                });
            }
            let (x, y) = points[points.len() - 1];
            self.send(InputEvent::PointerUp {
                position: pos2(x, y),
            })
        }
    }

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_pencil_draws_while_dragging() {
        let mut fx = Fixture::new();
        fx.send(InputEvent::PointerDown {
            position: pos2(5.0, 20.0),
        });
        fx.send(InputEvent::PointerMove {
            position: pos2(40.0, 20.0),
        });
        // Segments land on the persisted buffer before release
        assert_eq!(*fx.canvas.persisted().get_pixel(20, 20), Rgba([0, 0, 0, 255]));
        assert_eq!(fx.history.len(), 1);

        assert!(fx.send(InputEvent::PointerUp {
            position: pos2(40.0, 20.0),
        }));
        assert_eq!(fx.history.len(), 2);
        assert!(fx.state.is_idle());
    }

    #[test]
    fn test_single_point_stroke_is_discarded() {
        let mut fx = Fixture::new();
        let blank = fx.canvas.persisted().clone();
        assert!(!fx.drag(&[(10.0, 10.0)]));
        assert_eq!(fx.history.len(), 1);
        assert_eq!(fx.canvas.persisted(), &blank);
    }

    #[test]
    fn test_shape_previews_then_commits() {
        let mut fx = Fixture::new();
        fx.state.set_active_tool(Tool::Rectangle);
        fx.send(InputEvent::PointerDown {
            position: pos2(5.0, 5.0),
        });
        fx.send(InputEvent::PointerMove {
            position: pos2(30.0, 30.0),
        });
        assert_eq!(*fx.canvas.persisted().get_pixel(15, 15), WHITE);
        assert_eq!(*fx.canvas.composite().get_pixel(15, 15), Rgba([255, 0, 0, 255]));

        assert!(fx.send(InputEvent::PointerUp {
            position: pos2(30.0, 30.0),
        }));
        assert_eq!(*fx.canvas.persisted().get_pixel(15, 15), Rgba([255, 0, 0, 255]));
        assert_eq!(fx.canvas.composite(), *fx.canvas.persisted());
    }

    #[test]
    fn test_settings_fixed_at_press() {
        let mut fx = Fixture::new();
        fx.state.set_active_tool(Tool::Rectangle);
        fx.send(InputEvent::PointerDown {
            position: pos2(5.0, 5.0),
        });
        fx.colors.set_opacity(0.0);
        fx.send(InputEvent::PointerUp {
            position: pos2(30.0, 30.0),
        });
        assert_eq!(*fx.canvas.persisted().get_pixel(15, 15), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_eraser_clears_to_background() {
        let mut fx = Fixture::new();
        fx.state.set_active_tool(Tool::Rectangle);
        fx.drag(&[(0.0, 0.0), (60.0, 40.0)]);

        fx.state.set_active_tool(Tool::Eraser);
        assert!(fx.drag(&[(10.0, 10.0), (20.0, 20.0)]));
        assert_eq!(*fx.canvas.persisted().get_pixel(20, 20), WHITE);
        assert_eq!(*fx.canvas.persisted().get_pixel(40, 30), Rgba([255, 0, 0, 255]));
        assert_eq!(fx.history.len(), 3);
    }

    #[test]
    fn test_single_point_erase_is_discarded() {
        let mut fx = Fixture::new();
        fx.state.set_active_tool(Tool::Rectangle);
        fx.drag(&[(0.0, 0.0), (60.0, 40.0)]);
        let before = fx.canvas.persisted().clone();

        fx.state.set_active_tool(Tool::Eraser);
        assert!(!fx.drag(&[(10.0, 10.0)]));
        assert!(fx.state.is_idle());
        assert_eq!(fx.history.len(), 2);
        assert_eq!(fx.canvas.persisted().as_raw(), before.as_raw());
    }

    #[test]
    fn test_pointer_coordinates_are_clamped() {
        let mut fx = Fixture::new();
        fx.state.set_active_tool(Tool::Rectangle);
        assert!(fx.drag(&[(-50.0, f32::NAN), (500.0, 500.0)]));
        assert_eq!(*fx.canvas.persisted().get_pixel(59, 39), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_text_without_font_is_discarded() {
        let mut fx = Fixture::new();
        fx.state.set_active_tool(Tool::Text);
        fx.send(InputEvent::PointerDown {
            position: pos2(10.0, 10.0),
        });
        fx.send(InputEvent::TextTyped("Hi".to_owned()));
        assert_eq!(fx.state.text_edit().map(|e| e.buffer.as_str()), Some("Hi"));
        assert!(!fx.send(InputEvent::TextConfirm));
        assert!(fx.state.is_idle());
        assert_eq!(fx.history.len(), 1);
    }

    #[test]
    fn test_text_cancel_and_backspace() {
        let mut fx = Fixture::new();
        fx.state.set_active_tool(Tool::Text);
        fx.send(InputEvent::PointerDown {
            position: pos2(10.0, 10.0),
        });
        fx.send(InputEvent::TextTyped("abc".to_owned()));
        fx.send(InputEvent::TextBackspace);
        assert_eq!(fx.state.text_edit().map(|e| e.buffer.as_str()), Some("ab"));
        fx.send(InputEvent::TextCancel);
        assert!(fx.state.is_idle());
        assert_eq!(fx.history.len(), 1);
    }

    #[test]
    fn test_press_resolves_previous_text_field() {
        let mut fx = Fixture::new();
        fx.state.set_active_tool(Tool::Text);
        fx.send(InputEvent::PointerDown {
            position: pos2(10.0, 10.0),
        });
        fx.send(InputEvent::PointerDown {
            position: pos2(30.0, 20.0),
        });
        let edit = fx.state.text_edit().expect("a fresh text field");
        assert_eq!(edit.anchor, pos2(30.0, 20.0));
        assert!(edit.buffer.is_empty());
    }
}
