//! In-memory transport that records every call
//!
//! Used to check command ordering without hardware. It keeps two logs:
//! [`RecordingTransport::calls`] holds the transport operations in the order
//! the driver issued them, [`RecordingTransport::commands`] holds the command
//! and data bytes that would have gone over the wire.

use crate::bitarray::BitArray;
use crate::dfr0591::interface::{
    send_display_ram, send_power_off, send_power_on, send_ram_data_window, send_ram_pointer,
    send_update_display, DisplayTransport,
};
use crate::dfr0591::Mode;
use display_interface::DisplayError;

/// One transport operation, named after the [`DisplayTransport`] method
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `write_cmd_and_data` called directly by the driver
    Command(Command),
    PowerOn,
    PowerOff,
    SetRamDataWindow {
        x_start: u8,
        x_end: u8,
        y_start: u8,
        y_start_high: u8,
        y_end: u8,
        y_end_high: u8,
    },
    SetRamPointer {
        x: u8,
        y: u8,
        y_high: u8,
    },
    WriteDisplayRam {
        size_x: u8,
        size_y: u8,
    },
    UpdateDisplay(Mode),
}

/// A command byte and the data bytes sent after it (empty when there were none)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command byte
    pub cmd: u8,
    /// Data bytes
    pub data: Vec<u8>,
}

impl Command {
    /// Build an expected command, mostly for assertions
    pub fn new(cmd: u8, data: &[u8]) -> Self {
        Command {
            cmd,
            data: data.to_vec(),
        }
    }
}

/// Records calls instead of talking to a bus, optionally failing on a chosen command
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Vec<Call>,
    commands: Vec<Command>,
    fail_at: Option<(usize, DisplayError)>,
    attempted: usize,
    nested: bool,
}

impl RecordingTransport {
    /// Empty recorder that never fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `index`-th wire command (counting from 0) with `err`.
    ///
    /// The failing command is not added to [`Self::commands`].
    pub fn fail_on_command(mut self, index: usize, err: DisplayError) -> Self {
        self.fail_at = Some((index, err));
        self
    }

    /// Transport operations in issue order
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Wire-level commands that were sent successfully
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Just the command bytes of [`Self::commands`]
    pub fn command_bytes(&self) -> Vec<u8> {
        self.commands.iter().map(|c| c.cmd).collect()
    }

    /// Forget everything recorded so far, keeping the failure setting
    pub fn clear(&mut self) {
        self.calls.clear();
        self.commands.clear();
        self.attempted = 0;
    }

    fn record<F>(&mut self, call: Call, send: F) -> Result<(), DisplayError>
    where
        F: FnOnce(&mut Self) -> Result<(), DisplayError>,
    {
        self.calls.push(call);
        self.nested = true;
        let result = send(self);
        self.nested = false;
        result
    }
}

impl DisplayTransport for RecordingTransport {
    fn write_cmd_and_data(&mut self, cmd: u8, data: Option<&[u8]>) -> Result<(), DisplayError> {
        let command = Command {
            cmd,
            data: data.map(<[u8]>::to_vec).unwrap_or_default(),
        };
        if !self.nested {
            self.calls.push(Call::Command(command.clone()));
        }

        let index = self.attempted;
        self.attempted += 1;
        if let Some((fail_index, err)) = &self.fail_at {
            if *fail_index == index {
                return Err(err.clone());
            }
        }

        self.commands.push(command);
        Ok(())
    }

    fn power_on(&mut self) -> Result<(), DisplayError> {
        self.record(Call::PowerOn, |t| send_power_on(t))
    }

    fn power_off(&mut self) -> Result<(), DisplayError> {
        self.record(Call::PowerOff, |t| send_power_off(t))
    }

    fn set_ram_data_window(
        &mut self,
        x_start: u8,
        x_end: u8,
        y_start: u8,
        y_start_high: u8,
        y_end: u8,
        y_end_high: u8,
    ) -> Result<(), DisplayError> {
        let call = Call::SetRamDataWindow {
            x_start,
            x_end,
            y_start,
            y_start_high,
            y_end,
            y_end_high,
        };
        self.record(call, |t| {
            send_ram_data_window(t, x_start, x_end, y_start, y_start_high, y_end, y_end_high)
        })
    }

    fn set_ram_pointer(&mut self, x: u8, y: u8, y_high: u8) -> Result<(), DisplayError> {
        self.record(Call::SetRamPointer { x, y, y_high }, |t| {
            send_ram_pointer(t, x, y, y_high)
        })
    }

    fn write_display_ram(
        &mut self,
        buffer: &BitArray,
        size_x: u8,
        size_y: u8,
    ) -> Result<(), DisplayError> {
        self.record(Call::WriteDisplayRam { size_x, size_y }, |t| {
            send_display_ram(t, buffer, size_x, size_y)
        })
    }

    fn update_display(&mut self, mode: Mode) -> Result<(), DisplayError> {
        self.record(Call::UpdateDisplay(mode), |t| send_update_display(t, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_commands_are_recorded_as_calls() {
        let mut t = RecordingTransport::new();
        t.write_cmd_and_data(0x11, Some(&[0x01])).unwrap();
        t.write_cmd_and_data(0x20, None).unwrap();

        assert_eq!(
            t.calls(),
            &[
                Call::Command(Command::new(0x11, &[0x01])),
                Call::Command(Command::new(0x20, &[])),
            ]
        );
        assert_eq!(t.command_bytes(), vec![0x11, 0x20]);
    }

    #[test]
    fn high_level_calls_hide_their_commands() {
        let mut t = RecordingTransport::new();
        t.power_off().unwrap();

        assert_eq!(t.calls(), &[Call::PowerOff]);
        assert_eq!(
            t.commands(),
            &[
                Command::new(0x12, &[]),
                Command::new(0x82, &[0x00]),
                Command::new(0x01, &[0x02, 0x00, 0x00, 0x00, 0x00]),
                Command::new(0x02, &[]),
            ]
        );
    }

    #[test]
    fn injected_failure_stops_at_that_command() {
        let mut t = RecordingTransport::new().fail_on_command(1, DisplayError::BusWriteError);

        assert!(matches!(t.power_on(), Err(DisplayError::BusWriteError)));
        assert_eq!(t.commands(), &[Command::new(0x22, &[0xC0])]);

        // Recording continues normally after the failure
        t.write_cmd_and_data(0x20, None).unwrap();
        assert_eq!(t.command_bytes(), vec![0x22, 0x20]);
        assert_eq!(
            t.calls(),
            &[Call::PowerOn, Call::Command(Command::new(0x20, &[]))]
        );
    }
}
