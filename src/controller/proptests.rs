//! Property-based tests for the controller state machine

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,30}"
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,5}"
}

fn arb_at() -> impl Strategy<Value = String> {
    (0u8..24, 0u8..60).prop_map(|(h, m)| format!("{h:02}:{m:02}"))
}

fn arb_stage() -> impl Strategy<Value = Stage> {
    prop_oneof![
        Just(Stage::Welcome),
        Just(Stage::MoodSelection),
        Just(Stage::AskMood),
        Just(Stage::Chat),
    ]
}

fn arb_state() -> impl Strategy<Value = ControllerState> {
    (arb_stage(), any::<bool>(), proptest::collection::vec(arb_text(), 0..4)).prop_map(
        |(stage, pending, texts)| {
            let mut state = ControllerState::at_stage(stage);
            state.pending = pending;
            state.messages = texts
                .into_iter()
                .map(|t| Message::user(t, "00:00"))
                .collect();
            state
        },
    )
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        prop_oneof![arb_text(), arb_blank()].prop_map(|name| Event::SubmitName { name }),
        (prop_oneof![arb_text(), arb_blank()], arb_at())
            .prop_map(|(mood, at)| Event::SelectMood { mood, at }),
        (prop_oneof![arb_text(), arb_blank()], arb_at())
            .prop_map(|(text, at)| Event::SubmitText { text, at }),
        (arb_text(), arb_at()).prop_map(|(text, at)| Event::RelayReplied { text, at }),
        arb_at().prop_map(|at| Event::RelayFailed { at }),
    ]
}

/// One chat exchange: the user's text and whether the relay succeeds
fn arb_exchange() -> impl Strategy<Value = (String, Option<String>)> {
    (arb_text(), proptest::option::of(arb_text()))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_stage_never_regresses(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            prop_assert!(result.new_state.stage.rank() >= state.stage.rank());
        }
    }

    #[test]
    fn prop_log_is_append_only(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            let new = &result.new_state.messages;
            prop_assert!(new.len() >= state.messages.len());
            prop_assert_eq!(&new[..state.messages.len()], &state.messages[..]);
        }
    }

    #[test]
    fn prop_effect_implies_pending(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            if result.effect.is_some() {
                prop_assert!(!state.pending);
                prop_assert!(result.new_state.pending);
            }
        }
    }

    #[test]
    fn prop_blank_submission_is_rejected(
        stage in arb_stage(),
        blank in arb_blank(),
        at in arb_at(),
    ) {
        let state = ControllerState::at_stage(stage);
        for event in [
            Event::SubmitName { name: blank.clone() },
            Event::SelectMood { mood: blank.clone(), at: at.clone() },
            Event::SubmitText { text: blank.clone(), at: at.clone() },
        ] {
            prop_assert!(transition(&state, event).is_err());
        }
    }

    #[test]
    fn prop_pending_blocks_user_input(stage in arb_stage(), text in arb_text(), at in arb_at()) {
        let mut state = ControllerState::at_stage(stage);
        state.pending = true;
        let result = transition(&state, Event::SubmitText { text: text.clone(), at: at.clone() });
        prop_assert!(result.is_err());
        let result = transition(&state, Event::SelectMood { mood: text, at });
        prop_assert!(result.is_err());
    }

    #[test]
    fn prop_exchanges_alternate_user_bot(exchanges in proptest::collection::vec(arb_exchange(), 0..12)) {
        let mut controller = Controller::from_state(ControllerState::at_stage(Stage::Chat));

        for (text, reply) in &exchanges {
            prop_assert!(controller.submit(UserInput::Text(text.clone())).is_some());
            // A second submission mid-flight is a no-op
            let len = controller.messages().len();
            prop_assert!(controller.submit(UserInput::Text(text.clone())).is_none());
            prop_assert_eq!(controller.messages().len(), len);

            let outcome = reply
                .clone()
                .ok_or_else(|| crate::relay::RelayError::Transport("down".to_string()));
            controller.resolve(outcome);
        }

        let messages = controller.messages();
        prop_assert_eq!(messages.len(), exchanges.len() * 2);
        for (i, (text, reply)) in exchanges.iter().enumerate() {
            prop_assert_eq!(messages[2 * i].sender, Sender::User);
            prop_assert_eq!(&messages[2 * i].text, text);
            prop_assert_eq!(messages[2 * i + 1].sender, Sender::Bot);
            let expected = reply.as_deref().unwrap_or(FALLBACK_REPLY);
            prop_assert_eq!(messages[2 * i + 1].text.as_str(), expected);
        }
    }
}
