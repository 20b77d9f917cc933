//! Maps `Box<dyn Error>` from trait boundaries to typed `DialError`.
//!
//! The traits in `dial_traits` use `Box<dyn Error + Send + Sync>`; this module
//! converts those to our typed error enum, downcasting
//! `dial_hardware::error::HwError` when the `hardware-errors` feature is on.

use crate::error::DialError;

/// Map a trait-boundary error to a typed `DialError`.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> DialError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<dial_hardware::error::HwError>() {
            return match hw {
                dial_hardware::error::HwError::Gpio(msg) => DialError::HardwareFault(msg.clone()),
                dial_hardware::error::HwError::Io(io) => DialError::Io(io.to_string()),
                other => DialError::Hardware(other.to_string()),
            };
        }
    }

    if let Some(io) = e.downcast_ref::<std::io::Error>() {
        return DialError::Io(io.to_string());
    }
    DialError::Hardware(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_kind() {
        let e = std::io::Error::other("disk gone");
        assert!(matches!(map_hw_error(&e), DialError::Io(m) if m.contains("disk gone")));
    }

    #[test]
    fn unknown_errors_become_hardware() {
        let e: Box<dyn std::error::Error + Send + Sync> = "pin busy".into();
        assert!(matches!(map_hw_error(e.as_ref()), DialError::Hardware(m) if m == "pin busy"));
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn gpio_errors_are_faults() {
        let e = dial_hardware::error::HwError::Gpio("export failed".into());
        assert!(matches!(map_hw_error(&e), DialError::HardwareFault(_)));
    }
}
