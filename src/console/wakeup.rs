// src/console/wakeup.rs

use super::{Console, WakeState};
use crate::common::{
    command::Command,
    error::VantageError,
    hal_traits::{VantageSerial, VantageTimer},
};

/// What an awake console answers to a bare line feed.
pub(super) const WAKE_REPLY: &[u8; 2] = b"\n\r";

impl<IF> Console<IF>
where
    IF: VantageSerial + VantageTimer,
{
    /// Runs the wake-up handshake.
    ///
    /// Sends a line feed and expects `\n\r` back. A wrong or missing answer
    /// is retried after the settle time, up to the configured number of
    /// attempts; there is no pause after the last one. A link error aborts
    /// at once. Either way a failed handshake leaves the session
    /// [`WakeState::Unreachable`].
    pub fn wake_up(&mut self) -> Result<(), VantageError<IF::Error>> {
        if self.closed {
            return Err(VantageError::NotAwake);
        }
        let attempts = self.settings.wake_attempts;

        for attempt in 1..=attempts {
            self.state = WakeState::Probing { attempt };
            log::debug!("Wake-up attempt {}/{}", attempt, attempts);

            match self.probe() {
                Ok(true) => {
                    self.state = WakeState::Awake;
                    log::info!("Console is awake");
                    return Ok(());
                }
                Ok(false) => {
                    log::warn!("No wake-up reply on attempt {}", attempt);
                    if attempt < attempts {
                        self.interface
                            .delay_ms(self.settings.wake_settle.as_millis() as u32);
                    }
                }
                Err(e) => {
                    self.state = WakeState::Unreachable;
                    return Err(e);
                }
            }
        }

        self.state = WakeState::Unreachable;
        Err(VantageError::HandshakeFailed { attempts })
    }

    /// One probe. `Ok(false)` means the console did not answer correctly.
    fn probe(&mut self) -> Result<bool, VantageError<IF::Error>> {
        let mut reply = [0u8; 2];
        let got = match self.write_command(&Command::Wake) {
            Ok(()) => self.read_exact(&mut reply)?,
            Err(e) if e.is_fatal() => return Err(e),
            Err(_) => return Ok(false),
        };
        Ok(got == reply.len() && &reply == WAKE_REPLY)
    }
}
