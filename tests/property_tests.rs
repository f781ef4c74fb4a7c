//! Property-based tests for the codecs and the engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use homebus::core::{Device, DeviceKind, DeviceState};
use homebus::engine::StateMachine;
use homebus::protocol::{
    make_event, AnalogPayload, DeviceEvent, ProtocolError, DURATION_STEP, MAX_DURATION,
    MIN_DURATION,
};
use proptest::prelude::*;

prop_compose! {
    fn arbitrary_kind()(variant in 0..4u8) -> DeviceKind {
        match variant {
            0 => DeviceKind::Switch,
            1 => DeviceKind::Dimmer,
            2 => DeviceKind::Directional,
            _ => DeviceKind::DirectionalGroup,
        }
    }
}

prop_compose! {
    fn arbitrary_event()(address in 0..4i64, command in 0..16i32) -> DeviceEvent {
        DeviceEvent::new(address, command).unwrap()
    }
}

fn device_of(kind: DeviceKind) -> Device {
    let addresses: &[i64] = match kind {
        DeviceKind::DirectionalGroup => &[0, 1, 2],
        _ => &[0],
    };
    Device::new(kind, addresses).unwrap()
}

proptest! {
    #[test]
    fn analog_round_trip_is_close(
        brightness in 0.0..=1.0f64,
        duration in MIN_DURATION..=MAX_DURATION,
    ) {
        let bytes = AnalogPayload::new(brightness, duration, 0).pack().unwrap();
        let decoded = AnalogPayload::from_bytes(bytes);

        prop_assert!((decoded.brightness - brightness).abs() <= 1.0 / 255.0);
        // at most half a linear step off, in either encoding range
        prop_assert!((decoded.duration - duration).abs() <= DURATION_STEP / 2.0 + 1e-9);
        prop_assert_eq!(decoded.direction, 0);
    }

    #[test]
    fn short_durations_keep_relative_precision(duration in MIN_DURATION..0.5f64) {
        let bytes = AnalogPayload::new(0.0, duration, 0).pack().unwrap();
        let decoded = AnalogPayload::from_bytes(bytes);

        prop_assert!(bytes[0] >= 64);
        prop_assert!((decoded.duration - duration).abs() / duration < 0.12);
    }

    #[test]
    fn direction_requires_full_brightness(brightness in 0.0..1.0f64) {
        let result = AnalogPayload::new(brightness, 1.0, 1).pack();
        let is_invalid_direction = matches!(result, Err(ProtocolError::InvalidDirection { .. }));
        prop_assert!(is_invalid_direction);
    }

    #[test]
    fn from_bytes_stays_in_range(control in any::<u8>(), level in any::<u8>()) {
        let decoded = AnalogPayload::from_bytes([control, level]);

        prop_assert!((0.0..=1.0).contains(&decoded.brightness));
        prop_assert!(decoded.duration <= 63.0 * DURATION_STEP);
        prop_assert!(decoded.direction <= 1);
    }

    #[test]
    fn valid_events_always_build(
        address in 0..=242i64,
        command in 0..=255i32,
        b0 in 0..=255i64,
        b1 in 0..=255i64,
    ) {
        let event = make_event(address, command, Some(&[b0, b1])).unwrap();
        prop_assert_eq!(i64::from(event.address().value()), address);
        prop_assert_eq!(i32::from(event.command()), command);
        prop_assert_eq!(event.data(), Some([b0 as u8, b1 as u8]));
    }

    #[test]
    fn out_of_range_addresses_are_rejected(address in 243..10_000i64) {
        prop_assert_eq!(
            make_event(address, 0, None),
            Err(ProtocolError::InvalidAddress(address))
        );
    }

    #[test]
    fn receive_only_lands_in_defined_states(
        kind in arbitrary_kind(),
        events in prop::collection::vec(arbitrary_event(), 0..32),
    ) {
        let machine = StateMachine::for_kind(kind);
        let mut device = device_of(kind);

        for event in &events {
            let before = device.state;
            match machine.receive(&mut device, event) {
                Some(result) => {
                    prop_assert_eq!(result.previous, before);
                    prop_assert_eq!(result.state, device.state);
                    prop_assert!(kind.table().state(device.state).is_some());
                }
                None => prop_assert_eq!(device.state, before),
            }
        }
    }

    #[test]
    fn dimmer_brightness_stays_in_range(
        events in prop::collection::vec(
            (0..16i32, prop::option::of((any::<u8>(), any::<u8>()))),
            0..32,
        ),
    ) {
        let machine = StateMachine::for_kind(DeviceKind::Dimmer);
        let mut device = device_of(DeviceKind::Dimmer);

        for (command, data) in events {
            let mut event = DeviceEvent::new(0, command).unwrap();
            if let Some((b0, b1)) = data {
                event = event.with_payload(&[i64::from(b0), i64::from(b1)]).unwrap();
            }
            machine.receive(&mut device, &event);

            let brightness = device.brightness().unwrap();
            prop_assert!((0.0..=1.0).contains(&brightness));
            if device.state == DeviceState::Off {
                prop_assert_eq!(brightness, 0.0);
            }
        }
    }
}
