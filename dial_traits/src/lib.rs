pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Level of the two jog buttons sampled on one control tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub left: bool,
    pub right: bool,
}

impl ButtonState {
    pub const RELEASED: Self = Self {
        left: false,
        right: false,
    };

    #[inline]
    pub fn any(&self) -> bool {
        self.left || self.right
    }
}

/// Four unipolar coil outputs driven as one 4-bit mask (bit 0 = A1, 1 = A2, 2 = B1, 3 = B2).
pub trait CoilDriver {
    fn write_pattern(&mut self, mask: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// De-energize every coil and hand the outputs back to the OS.
    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub trait ButtonPanel {
    fn read(&mut self) -> Result<ButtonState, Box<dyn std::error::Error + Send + Sync>>;
}

/// Remote weather observation; returns the raw response body.
pub trait ObservationSource {
    fn fetch(&mut self) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Runtime-selectable metric name (e.g. written by a web form).
pub trait MetricSetting {
    fn read(&mut self) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: CoilDriver + ?Sized> CoilDriver for Box<T> {
    fn write_pattern(&mut self, mask: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).write_pattern(mask)
    }
    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).release()
    }
}

impl<T: ButtonPanel + ?Sized> ButtonPanel for Box<T> {
    fn read(&mut self) -> Result<ButtonState, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read()
    }
}

impl<T: ObservationSource + ?Sized> ObservationSource for Box<T> {
    fn fetch(&mut self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        (**self).fetch()
    }
}

impl<T: MetricSetting + ?Sized> MetricSetting for Box<T> {
    fn read(&mut self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read()
    }
}
