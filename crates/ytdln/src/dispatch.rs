//! The request loop.
//!
//! [`serve`] reads one request at a time from the transport and hands it to
//! the request handler, which sends every status message for that request
//! before the next frame is read. The loop ends when the parent closes its
//! end of the stream, or on the first fault the handler could not turn into
//! an `error` status.

use ytdln_protocol::{ProtocolError, Request, StatusMessage, Transport};
use ytdln_supervisor::RequestHandler;

/// Prefix of the message sent before the host stops on a fatal fault.
pub const FATAL_MESSAGE_PREFIX: &str = "An unexpected error occurred: ";

/// How the request loop ended.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The parent closed the stream between requests.
    Shutdown,
    /// A fault escaped request handling; the host must exit non-zero.
    Fatal(ProtocolError),
}

/// Serve requests until end of input or the first fatal fault.
///
/// On a fatal fault one last `error` status is sent, best effort, before
/// returning.
pub fn serve<T, H>(transport: &mut T, handler: &mut H) -> DispatchOutcome
where
    T: Transport,
    H: RequestHandler,
{
    let mut sequence: u64 = 0;
    loop {
        let value = match transport.receive() {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::info!(requests = sequence, "input closed, shutting down");
                return DispatchOutcome::Shutdown;
            }
            Err(err) => return fail(transport, err),
        };

        sequence += 1;
        let request = match Request::from_value(value) {
            Ok(request) => request,
            Err(err) => return fail(transport, err),
        };

        tracing::info!(
            seq = sequence,
            url = request.url.as_deref(),
            use_aria2c = request.uses_aria2c(),
            "handling request"
        );

        if let Err(err) = handler.handle(&request, transport) {
            return fail(transport, err);
        }
        tracing::debug!(seq = sequence, "request complete");
    }
}

fn fail<T: Transport>(transport: &mut T, err: ProtocolError) -> DispatchOutcome {
    tracing::error!(error = %err, "fatal dispatch fault");
    let message = StatusMessage::error(format!("{FATAL_MESSAGE_PREFIX}{err}"));
    if let Err(send_err) = transport.send(&message) {
        tracing::warn!(error = %send_err, "failed sending fatal error status");
    }
    DispatchOutcome::Fatal(err)
}
