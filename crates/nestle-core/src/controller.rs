//! Standard joypads behind the `$4016/$4017` controller port.
//!
//! Each pad holds an 8-bit shift register. While the strobe bit written to
//! `$4016` is high the register is reloaded from the pad's [`InputSource`]
//! on every CPU cycle; once it drops, reads clock bits out MSB first
//! (Right, Left, Down, Up, Start, Select, B, A).

use bitflags::bitflags;

/// Button ordering follows the snapshot bit layout (A in bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A = 0,
    B = 1,
    Select = 2,
    Start = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
}

bitflags! {
    /// Pressed-button snapshot of one pad.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const A      = 1 << Button::A as u8;
        const B      = 1 << Button::B as u8;
        const SELECT = 1 << Button::Select as u8;
        const START  = 1 << Button::Start as u8;
        const UP     = 1 << Button::Up as u8;
        const DOWN   = 1 << Button::Down as u8;
        const LEFT   = 1 << Button::Left as u8;
        const RIGHT  = 1 << Button::Right as u8;
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        Buttons::from_bits_retain(1 << button as u8)
    }
}

/// Host-side provider of button state, polled while the strobe is high.
pub trait InputSource {
    fn poll(&mut self) -> Buttons;
}

/// An input source that always reports the same buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedInput(pub Buttons);

impl FixedInput {
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.0.set(button.into(), pressed);
    }
}

impl InputSource for FixedInput {
    fn poll(&mut self) -> Buttons {
        self.0
    }
}

/// Upper bits float high on the NES data bus.
const OPEN_BUS_BITS: u8 = 0x40;

/// One pad slot: the attached device plus its output shift register.
#[derive(Default)]
struct Pad {
    source: Option<Box<dyn InputSource>>,
    shift: u8,
}

impl Pad {
    fn reload(&mut self) {
        if let Some(source) = self.source.as_mut() {
            self.shift = source.poll().bits();
        }
    }

    fn clock(&mut self) -> u8 {
        if self.source.is_none() {
            return OPEN_BUS_BITS;
        }
        let bit = self.shift >> 7;
        // Past the eighth read the register drains to all ones.
        self.shift = (self.shift << 1) | 0x01;
        OPEN_BUS_BITS | bit
    }
}

/// The two controller sockets sharing one strobe latch.
#[derive(Default)]
pub struct ControllerPort {
    strobe: u8,
    pads: [Pad; 2],
}

impl std::fmt::Debug for ControllerPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerPort")
            .field("strobe", &self.strobe)
            .field("connected", &[self.is_connected(0), self.is_connected(1)])
            .finish()
    }
}

impl ControllerPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plugs a device into `port` (0 or 1), replacing any previous one.
    pub fn connect(&mut self, port: usize, source: Box<dyn InputSource>) {
        if let Some(pad) = self.pads.get_mut(port) {
            pad.source = Some(source);
            pad.shift = 0;
        }
    }

    pub fn disconnect(&mut self, port: usize) {
        if let Some(pad) = self.pads.get_mut(port) {
            *pad = Pad::default();
        }
    }

    pub fn is_connected(&self, port: usize) -> bool {
        self.pads.get(port).is_some_and(|pad| pad.source.is_some())
    }

    /// `$4016` write. The latch is broadcast to both pads.
    pub fn write(&mut self, data: u8) {
        self.strobe = data;
    }

    pub fn strobe(&self) -> u8 {
        self.strobe
    }

    /// Per-CPU-cycle update: reload every pad while the strobe is held.
    pub fn tick(&mut self) {
        if self.strobe & 0x01 == 0 {
            return;
        }
        for pad in &mut self.pads {
            pad.reload();
        }
    }

    /// `$4016`/`$4017` read: one serial bit from the addressed pad.
    pub fn read(&mut self, port: usize) -> u8 {
        match self.pads.get_mut(port) {
            Some(pad) => pad.clock(),
            None => OPEN_BUS_BITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latched(buttons: Buttons) -> ControllerPort {
        let mut port = ControllerPort::new();
        port.connect(0, Box::new(FixedInput(buttons)));
        port.write(1);
        port.tick();
        port.write(0);
        port
    }

    #[test]
    fn reads_buttons_msb_first() {
        let mut port = latched(Buttons::RIGHT | Buttons::START | Buttons::A);
        let bits: Vec<u8> = (0..8).map(|_| port.read(0) & 0x01).collect();
        // Right, Left, Down, Up, Start, Select, B, A
        assert_eq!(bits, [1, 0, 0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn reads_past_eight_return_one() {
        let mut port = latched(Buttons::empty());
        for _ in 0..8 {
            assert_eq!(port.read(0), 0x40);
        }
        assert_eq!(port.read(0), 0x41);
        assert_eq!(port.read(0), 0x41);
    }

    #[test]
    fn held_strobe_keeps_reloading() {
        let mut port = ControllerPort::new();
        port.connect(0, Box::new(FixedInput(Buttons::RIGHT)));
        port.write(1);
        port.tick();
        assert_eq!(port.read(0), 0x41);
        port.tick();
        assert_eq!(port.read(0), 0x41);
    }

    #[test]
    fn no_reload_without_strobe() {
        let mut port = ControllerPort::new();
        port.connect(0, Box::new(FixedInput(Buttons::RIGHT)));
        port.tick();
        assert_eq!(port.read(0), 0x40);
    }

    #[test]
    fn empty_socket_reads_open_bus() {
        let mut port = latched(Buttons::all());
        assert!(!port.is_connected(1));
        assert_eq!(port.read(1), 0x40);
    }

    #[test]
    fn fixed_input_toggles_single_buttons() {
        let mut input = FixedInput::default();
        input.set_button(Button::Up, true);
        input.set_button(Button::B, true);
        input.set_button(Button::B, false);
        assert_eq!(input.poll(), Buttons::UP);
    }
}
