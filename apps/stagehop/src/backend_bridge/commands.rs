//! Backend commands queued from the screen to the backend worker.

use crate::controller::events::RequestTicket;

pub enum BackendCommand {
    FetchEvents { ticket: RequestTicket },
    StartLocation,
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchEvents { .. } => "fetch_events",
            BackendCommand::StartLocation => "start_location",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
