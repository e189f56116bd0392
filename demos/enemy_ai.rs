//! Enemy AI driven by the engine: patrol until the player is seen, chase
//! while visible, sweep the area after losing them, then give up and resume
//! the patrol route.
//!
//! Run with: cargo run --example enemy_ai

use flywheel::{transitions, Control, HookResult, State, StateMachine};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum AiEvent {
    PlayerSpotted,
    PlayerLost,
    SearchExhausted,
    Waypoint,
}

#[derive(Default)]
struct Senses {
    player_visible: bool,
    frames_searched: u32,
    waypoint: u32,
}

#[derive(Default)]
struct Patrol;

impl State<Senses, AiEvent> for Patrol {
    fn enter(&mut self, mx: &mut Control<'_, Senses, AiEvent>) -> HookResult {
        println!("[patrol] resuming route at waypoint {}", mx.context().waypoint);
        Ok(())
    }

    fn update(&mut self, mx: &mut Control<'_, Senses, AiEvent>) -> HookResult {
        if mx.context().player_visible {
            let _ = mx.transition(AiEvent::PlayerSpotted)?;
            return Ok(());
        }
        mx.context_mut().waypoint += 1;
        if mx.context().waypoint % 3 == 0 {
            // re-entry: restart the route leg from the checkpoint
            let _ = mx.transition(AiEvent::Waypoint)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Chase;

impl State<Senses, AiEvent> for Chase {
    fn enter(&mut self, _mx: &mut Control<'_, Senses, AiEvent>) -> HookResult {
        println!("[chase] target acquired");
        Ok(())
    }

    fn update(&mut self, mx: &mut Control<'_, Senses, AiEvent>) -> HookResult {
        if !mx.context().player_visible {
            let _ = mx.transition(AiEvent::PlayerLost)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Search;

impl State<Senses, AiEvent> for Search {
    fn enter(&mut self, mx: &mut Control<'_, Senses, AiEvent>) -> HookResult {
        mx.context_mut().frames_searched = 0;
        println!("[search] sweeping last known position");
        Ok(())
    }

    fn update(&mut self, mx: &mut Control<'_, Senses, AiEvent>) -> HookResult {
        if mx.context().player_visible {
            let _ = mx.transition(AiEvent::PlayerSpotted)?;
            return Ok(());
        }
        mx.context_mut().frames_searched += 1;
        if mx.context().frames_searched >= 3 {
            let _ = mx.transition(AiEvent::SearchExhausted)?;
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut machine = StateMachine::new(Senses::default());
    transitions!(machine, {
        (AiEvent::PlayerSpotted) Patrol => Chase,
        (AiEvent::PlayerSpotted) Search => Chase,
        (AiEvent::PlayerLost) Chase => Search,
        (AiEvent::SearchExhausted) Search => Patrol,
        (AiEvent::Waypoint) @ Patrol,
    })
    .expect("table registers cleanly");
    machine.set_init_state::<Patrol>().expect("machine has not started");
    machine.enable_trace(32);

    // scripted player visibility per frame
    let sightings = [
        false, false, false, true, true, false, false, false, false, false, false,
    ];
    for (frame, visible) in sightings.into_iter().enumerate() {
        machine.context_mut().player_visible = visible;
        machine.update().expect("no hook fails in this demo");
        println!(
            "frame {frame:2}: {}",
            machine.current_state_name().unwrap_or("-")
        );
    }

    let trace = machine.trace().expect("trace was enabled");
    println!("\nvisited: {}", trace.path().join(" -> "));
}
