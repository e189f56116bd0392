//! Dialog lifecycle: open and close walk through transient animation states
//! that chain into their settled successors within a single frame, plus a
//! privileged forced dismissal that skips the close animation.
//!
//! Run with: cargo run --example dialog_flow

use flywheel::{Control, HookResult, State, StateMachineBuilder};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum DialogEvent {
    Open,
    Opened,
    Close,
    Closed,
}

#[derive(Default)]
struct DialogUi {
    open_count: u32,
}

#[derive(Default)]
struct Hidden;

impl State<DialogUi, DialogEvent> for Hidden {
    fn enter(&mut self, _mx: &mut Control<'_, DialogUi, DialogEvent>) -> HookResult {
        println!("[dialog] hidden");
        Ok(())
    }
}

#[derive(Default)]
struct Opening;

impl State<DialogUi, DialogEvent> for Opening {
    fn enter(&mut self, mx: &mut Control<'_, DialogUi, DialogEvent>) -> HookResult {
        println!("[dialog] fade-in");
        // chains into Shown during the same update call
        let _ = mx.transition(DialogEvent::Opened)?;
        Ok(())
    }
}

#[derive(Default)]
struct Shown;

impl State<DialogUi, DialogEvent> for Shown {
    fn enter(&mut self, mx: &mut Control<'_, DialogUi, DialogEvent>) -> HookResult {
        mx.context_mut().open_count += 1;
        println!("[dialog] shown");
        Ok(())
    }
}

#[derive(Default)]
struct Closing;

impl State<DialogUi, DialogEvent> for Closing {
    fn enter(&mut self, mx: &mut Control<'_, DialogUi, DialogEvent>) -> HookResult {
        println!("[dialog] fade-out");
        let _ = mx.transition(DialogEvent::Closed)?;
        Ok(())
    }
}

fn main() {
    let mut machine = StateMachineBuilder::new(DialogUi::default())
        .transition::<Hidden, Opening>(DialogEvent::Open)
        .unwrap()
        .transition::<Opening, Shown>(DialogEvent::Opened)
        .unwrap()
        .transition::<Shown, Closing>(DialogEvent::Close)
        .unwrap()
        .transition::<Closing, Hidden>(DialogEvent::Closed)
        .unwrap()
        .initial::<Hidden>()
        .allow_forced(true)
        .trace_capacity(16)
        .build()
        .unwrap();

    machine.update().unwrap(); // enters Hidden

    let _ = machine.transition(DialogEvent::Open).unwrap();
    machine.update().unwrap(); // Hidden -> Opening -> Shown in one frame
    assert!(machine.is_current_state::<Shown>().unwrap());

    let _ = machine.transition(DialogEvent::Close).unwrap();
    machine.update().unwrap(); // Shown -> Closing -> Hidden

    // privileged dismissal: no fade-out
    let _ = machine.transition(DialogEvent::Open).unwrap();
    machine.update().unwrap();
    machine.force_transition::<Hidden>().unwrap();
    machine.update().unwrap();

    println!("\nopened {} times", machine.context().open_count);
    println!("visited: {}", machine.trace().unwrap().path().join(" -> "));
}
