//! Hardware backends for the dial: simulated coils/buttons/observations for
//! development, a file-backed metric setting, an HTTP observation source and
//! (with the `hardware` feature) rppal GPIO coils and buttons.
pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod gpio;
pub mod http;
pub mod setting;

pub use http::HttpObservationSource;
pub use setting::FileMetricSetting;

use dial_traits::{ButtonPanel, ButtonState, CoilDriver, ObservationSource};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Payload served by `SimulatedObservation` when none is supplied.
pub const SIM_PAYLOAD: &str = r#"{
  "current_observation": {
    "observation_time_rfc822": "Sat, 18 Oct 2026 09:00:00 -0500",
    "relative_humidity": "63%",
    "feelslike_f": "71",
    "dewpoint_f": 58,
    "precip_today_in": "0.12",
    "wind_gust_mph": "14.0",
    "visibility_mi": "10.0"
  }
}"#;

/// Simulated coil outputs; records every pattern written.
#[derive(Clone, Default)]
pub struct SimulatedCoils {
    written: Rc<RefCell<Vec<u8>>>,
    released: Rc<RefCell<usize>>,
}

impl SimulatedCoils {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns written so far, oldest first.
    pub fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }

    /// Number of times `release` was called.
    pub fn release_count(&self) -> usize {
        *self.released.borrow()
    }
}

impl CoilDriver for SimulatedCoils {
    fn write_pattern(&mut self, mask: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::trace!(mask, "coil pattern (simulated)");
        self.written.borrow_mut().push(mask & 0x0F);
        Ok(())
    }

    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        *self.released.borrow_mut() += 1;
        tracing::debug!("coils released (simulated)");
        Ok(())
    }
}

/// Simulated buttons replaying a scripted sequence, then reporting released.
#[derive(Clone, Default)]
pub struct SimulatedButtons {
    script: Rc<RefCell<VecDeque<ButtonState>>>,
}

impl SimulatedButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(states: impl IntoIterator<Item = ButtonState>) -> Self {
        Self {
            script: Rc::new(RefCell::new(states.into_iter().collect())),
        }
    }

    /// Parse a script such as `"L*20,-*5,R*3"`: `L` left, `R` right, `B` both,
    /// `-` released, each optionally repeated with `*n`.
    pub fn from_script(script: &str) -> error::Result<Self> {
        let mut states = Vec::new();
        for token in script.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (key, count) = match token.split_once('*') {
                Some((k, n)) => {
                    let n = n.trim().parse::<usize>().map_err(|e| {
                        error::HwError::Gpio(format!("bad repeat count in {token:?}: {e}"))
                    })?;
                    (k.trim(), n)
                }
                None => (token, 1),
            };
            let state = match key {
                "L" | "l" => ButtonState {
                    left: true,
                    right: false,
                },
                "R" | "r" => ButtonState {
                    left: false,
                    right: true,
                },
                "B" | "b" => ButtonState {
                    left: true,
                    right: true,
                },
                "-" => ButtonState::RELEASED,
                other => {
                    return Err(error::HwError::Gpio(format!(
                        "unknown button token {other:?}"
                    )));
                }
            };
            states.extend(std::iter::repeat_n(state, count));
        }
        Ok(Self::scripted(states))
    }

    pub fn push(&self, state: ButtonState) {
        self.script.borrow_mut().push_back(state);
    }
}

impl ButtonPanel for SimulatedButtons {
    fn read(&mut self) -> Result<ButtonState, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or(ButtonState::RELEASED))
    }
}

/// Observation source serving a fixed payload. Clones share the fetch count.
#[derive(Clone)]
pub struct SimulatedObservation {
    payload: String,
    fetches: Rc<Cell<usize>>,
}

impl SimulatedObservation {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            fetches: Rc::new(Cell::new(0)),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl Default for SimulatedObservation {
    fn default() -> Self {
        Self::new(SIM_PAYLOAD)
    }
}

impl ObservationSource for SimulatedObservation {
    fn fetch(&mut self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.fetches.set(self.fetches.get() + 1);
        tracing::debug!(fetches = self.fetches.get(), "observation fetch (simulated)");
        Ok(self.payload.clone())
    }
}
