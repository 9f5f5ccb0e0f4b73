//! Property-based tests for the MikroBUS pin model.
//! The socket table is the only wiring contract, so it must stay collision-free.

use platform::{PinName, PinRole, Socket};

#[test]
fn every_role_resolves_to_a_connected_pin() {
    for socket in [Socket::Mikrobus1, Socket::Mikrobus2] {
        for role in PinRole::ALL {
            let pin = socket.pin(role);
            assert!(pin.is_connected(), "{socket:?}/{role:?} must not be NC");
            assert_eq!(pin.require(role), Ok(pin));
        }
    }
}

#[test]
fn sockets_never_share_a_pin() {
    let mut seen = std::collections::HashSet::new();
    for socket in [Socket::Mikrobus1, Socket::Mikrobus2] {
        for role in PinRole::ALL {
            assert!(
                seen.insert(socket.pin(role)),
                "{socket:?}/{role:?} collides with another socket pin"
            );
        }
    }
}

#[test]
fn nc_is_the_default_and_is_rejected() {
    assert_eq!(PinName::default(), PinName::NC);
    assert_eq!(PinName::NC.number(), None);
    assert_eq!(
        PinName::NC.require(PinRole::Int),
        Err(platform::Error::UnmappedPin(PinRole::Int))
    );
}

proptest::proptest! {
    /// Any HAL pin number other than the sentinel is connected and round-trips.
    #[test]
    fn pin_numbers_round_trip(n in 0u16..u16::MAX) {
        let pin = PinName::new(n);
        assert!(pin.is_connected());
        assert_eq!(pin.number(), Some(n));
    }
}
