//! Scripted swipe-cell session: synthesized pointer input through the
//! recognizer and dispatcher into a [`SwipeCellController`].

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use serde::Deserialize;

use patchwork_gesture::{GestureDispatcher, GestureRecognizer, NodeId};
use patchwork_swipe::{
    SwipeAction, SwipeActivation, SwipeCellController, SwipeMenuState, SwipePhase,
};
use patchwork_types::config::PatchworkConfig;
use patchwork_types::geometry::Point;
use patchwork_types::input::{GestureEvent, PointerEvent};

const LIST: NodeId = NodeId(1);
const CELL: NodeId = NodeId(2);
const FRAME_MS: u64 = 16;

/// Per-side action lists, as read from a TOML menu file.
#[derive(Debug, Default, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub start: Vec<SwipeAction>,
    #[serde(default)]
    pub end: Vec<SwipeAction>,
}

impl Menu {
    /// Read a `[[start]]` / `[[end]]` menu file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Build a side from `--start` / `--end` labels; a trailing `*` marks
    /// the action as swipe-activated.
    pub fn actions_from_labels(labels: &[String]) -> Vec<SwipeAction> {
        labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| match l.strip_suffix('*') {
                Some(text) => SwipeAction::new(text).swipe_activated(),
                None => SwipeAction::new(l),
            })
            .collect()
    }
}

/// Synthesized input for one session.
#[derive(Debug, Clone)]
pub struct Script {
    pub width: f32,
    /// Signed horizontal drag distance.
    pub drag: f32,
    pub steps: u32,
    /// Optional tap after the drag settles, cell-local x.
    pub tap: Option<f32>,
    /// Hold the tap past the long-press threshold.
    pub long_press: bool,
}

/// What a session printed and triggered.
#[derive(Debug)]
pub struct Report {
    pub lines: Vec<String>,
    pub activations: Vec<SwipeActivation>,
    /// Taps that fell through to the list item.
    pub item_taps: usize,
    /// Released long presses that fell through to the list item.
    pub item_long_presses: usize,
    pub phase: SwipePhase,
    pub state: SwipeMenuState,
}

/// Play `script` against a cell with `menu` and collect the outcome.
pub fn run(config: &PatchworkConfig, menu: Menu, script: &Script) -> Report {
    let activations = Rc::new(RefCell::new(Vec::new()));
    let item_taps = Rc::new(RefCell::new(0usize));
    let item_long_presses = Rc::new(RefCell::new(0usize));

    let mut controller = SwipeCellController::new(config.swipe.clone(), menu.start, menu.end);
    controller.set_width(script.width);
    let sink = Rc::clone(&activations);
    controller.set_action_handler(Box::new(move |a| sink.borrow_mut().push(a.clone())));
    let controller = Rc::new(RefCell::new(controller));

    let mut dispatcher = GestureDispatcher::new();
    dispatcher.attach(LIST, None);
    dispatcher.attach(CELL, Some(LIST));
    let taps = Rc::clone(&item_taps);
    let long_presses = Rc::clone(&item_long_presses);
    dispatcher.listen(
        LIST,
        Box::new(move |event| match event {
            GestureEvent::Tapped(_) => {
                *taps.borrow_mut() += 1;
                true
            }
            GestureEvent::LongPressing(_) => true,
            GestureEvent::LongPressed(_) => {
                *long_presses.borrow_mut() += 1;
                true
            }
            _ => false,
        }),
    );
    let cell = Rc::clone(&controller);
    dispatcher.listen(CELL, Box::new(move |event| cell.borrow_mut().handle(event)));

    let mut recognizer = GestureRecognizer::new(config.gesture.clone());
    let hold_ms = if script.long_press {
        config.gesture.long_press_ms + 100
    } else {
        60
    };
    let mut lines = Vec::new();
    let mut clock = 0u64;

    let y = 22.0;
    let origin = if script.drag < 0.0 { script.width - 10.0 } else { 10.0 };
    let steps = script.steps.max(1);
    let mut pointer = vec![PointerEvent::Down {
        at: Point::new(origin, y),
        timestamp_ms: clock,
    }];
    for i in 1..=steps {
        clock += FRAME_MS;
        let x = origin + script.drag * i as f32 / steps as f32;
        pointer.push(PointerEvent::Move {
            at: Point::new(x, y),
            timestamp_ms: clock,
        });
    }
    clock += FRAME_MS;
    pointer.push(PointerEvent::Up {
        at: Point::new(origin + script.drag, y),
        timestamp_ms: clock,
    });

    let mut feed = |pointer: Vec<PointerEvent>, lines: &mut Vec<String>| {
        for ev in pointer {
            for gesture in recognizer.process(ev) {
                let consumed = dispatcher.dispatch(CELL, &gesture).is_some();
                let c = controller.borrow();
                lines.push(format!(
                    "{:>5} ms  {:<8} {:<9} x={:>7.1}{}",
                    ev.timestamp_ms(),
                    gesture_name(&gesture),
                    phase_name(c.phase()),
                    c.state().translation_x,
                    if consumed { "" } else { "  (unhandled)" }
                ));
            }
        }
    };
    feed(pointer, &mut lines);

    let mut animated_ms = 0u64;
    while controller.borrow_mut().tick(FRAME_MS as u32) {
        animated_ms += FRAME_MS;
    }
    clock += animated_ms + FRAME_MS;
    {
        let c = controller.borrow();
        lines.push(format!(
            "{:>5} ms  settled  {:<9} x={:>7.1}",
            clock,
            phase_name(c.phase()),
            c.state().translation_x
        ));
        for frame in c.button_positions() {
            lines.push(format!(
                "          button {} at x={:.1} width={:.1}",
                frame.slot, frame.x, frame.width
            ));
        }
    }

    if let Some(tap_x) = script.tap {
        clock += 200;
        let at = Point::new(tap_x, y);
        feed(
            vec![
                PointerEvent::Down {
                    at,
                    timestamp_ms: clock,
                },
                PointerEvent::Up {
                    at,
                    timestamp_ms: clock + hold_ms,
                },
            ],
            &mut lines,
        );
        while controller.borrow_mut().tick(FRAME_MS as u32) {}
    }

    let (phase, state) = {
        let c = controller.borrow();
        (c.phase(), c.state())
    };
    let activations = activations.borrow().clone();
    let item_taps = *item_taps.borrow();
    let item_long_presses = *item_long_presses.borrow();
    Report {
        lines,
        activations,
        item_taps,
        item_long_presses,
        phase,
        state,
    }
}

fn phase_name(phase: SwipePhase) -> &'static str {
    match phase {
        SwipePhase::Idle => "Idle",
        SwipePhase::Tracking => "Tracking",
        SwipePhase::Revealed => "Revealed",
        SwipePhase::Executing => "Executing",
    }
}

fn gesture_name(event: &GestureEvent) -> &'static str {
    match event {
        GestureEvent::Down(_) => "down",
        GestureEvent::Up(_) => "up",
        GestureEvent::Panning(_) => "panning",
        GestureEvent::Panned(_) => "panned",
        GestureEvent::Tapped(_) => "tapped",
        GestureEvent::LongPressing(_) => "holding",
        GestureEvent::LongPressed(_) => "held",
    }
}
