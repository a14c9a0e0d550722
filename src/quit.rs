//! Host-side quit protocol.
//!
//! A front-end receives a [`QuitEvent`] when the user asks to leave and answers
//! through the [`QuitResponse`] it was handed, exactly once.

/// Request to end the session. Carries no data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuitEvent;

pub trait QuitResponse {
    fn perform_quit(&mut self);
    fn cancel_quit(&mut self);
}

pub trait QuitHandler {
    fn handle_quit_request_with(&mut self, event: QuitEvent, response: &mut dyn QuitResponse);
}
