//! Property-based tests for the engine protocol.
//!
//! These tests use proptest to drive a small ring machine with randomly
//! generated event sequences and check it against an independent model.

use flywheel::{RequestOutcome, State, StateMachine};
use proptest::prelude::*;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum RingEvent {
    Advance,
    Retreat,
    Hold,
    Noise,
}

#[derive(Default)]
struct A;
#[derive(Default)]
struct B;
#[derive(Default)]
struct C;

impl State<(), RingEvent> for A {}
impl State<(), RingEvent> for B {}
impl State<(), RingEvent> for C {}

/// A --Advance--> B --Advance--> C --Advance--> A, with retreats back down,
/// a re-entry on A for Hold, and Noise never registered.
fn ring_machine() -> StateMachine<(), RingEvent> {
    let mut machine = StateMachine::new(());
    machine.add_transition::<A, B>(RingEvent::Advance).unwrap();
    machine.add_transition::<B, C>(RingEvent::Advance).unwrap();
    machine.add_transition::<C, A>(RingEvent::Advance).unwrap();
    machine.add_transition::<B, A>(RingEvent::Retreat).unwrap();
    machine.add_transition::<C, B>(RingEvent::Retreat).unwrap();
    machine.add_reentry::<A>(RingEvent::Hold).unwrap();
    machine.set_init_state::<A>().unwrap();
    machine
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Model {
    A,
    B,
    C,
}

fn model_step(current: Model, event: &RingEvent) -> Option<Model> {
    match (current, event) {
        (Model::A, RingEvent::Advance) => Some(Model::B),
        (Model::B, RingEvent::Advance) => Some(Model::C),
        (Model::C, RingEvent::Advance) => Some(Model::A),
        (Model::B, RingEvent::Retreat) => Some(Model::A),
        (Model::C, RingEvent::Retreat) => Some(Model::B),
        (Model::A, RingEvent::Hold) => Some(Model::A),
        _ => None,
    }
}

fn current_state(machine: &StateMachine<(), RingEvent>) -> Model {
    if machine.is_current_state::<A>().unwrap() {
        Model::A
    } else if machine.is_current_state::<B>().unwrap() {
        Model::B
    } else {
        Model::C
    }
}

prop_compose! {
    fn arbitrary_event()(variant in 0..4u8) -> RingEvent {
        match variant {
            0 => RingEvent::Advance,
            1 => RingEvent::Retreat,
            2 => RingEvent::Hold,
            _ => RingEvent::Noise,
        }
    }
}

proptest! {
    #[test]
    fn machine_agrees_with_the_model(
        events in prop::collection::vec(arbitrary_event(), 0..48)
    ) {
        let mut machine = ring_machine();
        machine.update().unwrap();
        let mut model = Model::A;

        for event in events {
            let outcome = machine.transition(event.clone()).unwrap();
            match (outcome, model_step(model, &event)) {
                (RequestOutcome::Accepted, Some(next)) => model = next,
                (RequestOutcome::Rejected, None) => {}
                (outcome, expected) => prop_assert!(
                    false,
                    "outcome {:?} disagrees with model expectation {:?} for {:?}",
                    outcome,
                    expected,
                    event
                ),
            }
            machine.update().unwrap();
            prop_assert_eq!(current_state(&machine), model);
        }
    }

    #[test]
    fn at_most_one_request_is_queued_between_updates(
        events in prop::collection::vec(arbitrary_event(), 1..16)
    ) {
        let mut machine = ring_machine();
        machine.update().unwrap();

        let mut queued: Option<Model> = None;
        for event in &events {
            match machine.transition(event.clone()).unwrap() {
                RequestOutcome::Accepted => {
                    prop_assert!(queued.is_none());
                    queued = model_step(Model::A, event);
                    prop_assert!(queued.is_some());
                }
                RequestOutcome::Waiting => prop_assert!(queued.is_some()),
                RequestOutcome::Rejected => {
                    prop_assert!(queued.is_none());
                    prop_assert!(model_step(Model::A, event).is_none());
                }
            }
        }

        machine.update().unwrap();
        prop_assert_eq!(current_state(&machine), queued.unwrap_or(Model::A));
    }

    #[test]
    fn last_event_tracks_the_most_recent_accepted_request(
        events in prop::collection::vec(arbitrary_event(), 0..32)
    ) {
        let mut machine = ring_machine();
        machine.update().unwrap();
        let mut model = Model::A;
        let mut last_accepted: Option<RingEvent> = None;

        for event in events {
            if machine.transition(event.clone()).unwrap() == RequestOutcome::Accepted {
                model = model_step(model, &event).unwrap();
                last_accepted = Some(event);
            }
            machine.update().unwrap();
        }

        prop_assert_eq!(machine.last_event().cloned(), last_accepted);
    }

    #[test]
    fn trace_stays_within_capacity_and_counts_evictions(
        events in prop::collection::vec(arbitrary_event(), 0..64),
        capacity in 1..8usize
    ) {
        let mut machine = ring_machine();
        machine.enable_trace(capacity);
        machine.update().unwrap();

        let mut completed: u64 = 1; // the cold-start record
        for event in events {
            if machine.transition(event).unwrap() == RequestOutcome::Accepted {
                completed += 1;
            }
            machine.update().unwrap();
        }

        let trace = machine.trace().unwrap();
        prop_assert!(trace.len() <= capacity);
        prop_assert_eq!(trace.len() as u64 + trace.dropped(), completed);
    }

    #[test]
    fn duplicate_registration_always_fails_whatever_came_before(
        earlier in prop::collection::vec(arbitrary_event(), 0..4)
    ) {
        let mut machine: StateMachine<(), RingEvent> = StateMachine::new(());
        for event in earlier {
            // distinct from-states keep these registrations independent
            let _ = machine.add_transition::<B, C>(event);
        }
        machine.add_transition::<A, B>(RingEvent::Advance).unwrap();
        let second = machine.add_transition::<A, C>(RingEvent::Advance);
        prop_assert!(second.is_err());
    }
}
