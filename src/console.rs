//! Maintenance Console
//!
//! Serviced between pipeline cycles. Turns inbound serial bytes into
//! commands, answers them through a [`Transport`], and forwards update
//! requests to the [`UpdateService`] as events.

use crate::protocol::{Command, CommandParser, Response};
use crate::sink::Transport;
use crate::types::PlatformInfo;
use crate::update::{QueuedListener, UpdateAction, UpdateError, UpdateEvent, UpdateService};

/// Pipeline state the console reports on
#[derive(Clone, Copy, Debug)]
pub struct ConsoleContext<'a> {
    /// Device identifier
    pub device: &'a str,
    /// Build capability description
    pub platform: PlatformInfo,
    /// Successful cycles so far
    pub cycles: u32,
    /// Abandoned cycles so far
    pub failures: u32,
    /// Latest JSON document, if any
    pub latest: Option<&'a [u8]>,
}

/// Command console plus update service
pub struct Console {
    parser: CommandParser,
    response: Response,
    updates: UpdateService,
    pending: QueuedListener<4>,
}

impl Console {
    /// Create a console owning `updates`
    #[must_use]
    pub const fn new(updates: UpdateService) -> Self {
        Self {
            parser: CommandParser::new(),
            response: Response::new(),
            updates,
            pending: QueuedListener::new(),
        }
    }

    /// Update service state
    #[must_use]
    pub const fn updates(&self) -> &UpdateService {
        &self.updates
    }

    /// Process inbound bytes, answering every complete command
    ///
    /// Responses that the transport cannot take are dropped.
    pub fn feed<T: Transport + ?Sized>(&mut self, bytes: &[u8], ctx: &ConsoleContext<'_>, out: &mut T) {
        for &byte in bytes {
            if let Some(cmd) = self.parser.feed(byte) {
                self.execute(&cmd, ctx, out);
            }
        }
    }

    /// Run one command
    pub fn execute<T: Transport + ?Sized>(&mut self, cmd: &Command, ctx: &ConsoleContext<'_>, out: &mut T) {
        match cmd {
            Command::Query => {
                if let Some(doc) = ctx.latest {
                    if out.send(doc).is_ok() {
                        let _ = out.send(b"\n");
                    }
                    return;
                }
                self.response.no_data();
            }
            Command::Identify => self.response.identify(ctx.device, ctx.platform),
            Command::Status => self.response.status(ctx.cycles, ctx.failures, self.updates.status()),
            Command::Update(password) => {
                let accepted = self.updates.authorize(password);
                if accepted {
                    self.pending.push(UpdateEvent::Start);
                    self.pending.push(UpdateEvent::End);
                } else {
                    self.pending.push(UpdateEvent::Error(UpdateError::Auth));
                }
                self.response.update(accepted);
            }
            Command::Unknown(_) => self.response.unknown(),
        }
        let _ = out.send(self.response.as_bytes());
    }

    /// Drain pending update events
    pub fn service_updates(&mut self) -> UpdateAction {
        self.updates.service(&mut self.pending)
    }
}
