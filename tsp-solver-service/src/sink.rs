//! Destinations for response envelopes.

use std::io::Write;

use crate::{ResponseEnvelope, ServiceError};

/// Publishes response envelopes as they are produced.
pub trait ResponseSink {
    /// Publish one envelope.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] when the envelope cannot be encoded or
    /// delivered.
    fn publish(&mut self, envelope: &ResponseEnvelope) -> Result<(), ServiceError>;

    /// Deliver anything still buffered.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::WriteOutput`] when buffered output cannot be
    /// written.
    fn flush(&mut self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Collects envelopes in memory.
impl ResponseSink for Vec<ResponseEnvelope> {
    fn publish(&mut self, envelope: &ResponseEnvelope) -> Result<(), ServiceError> {
        self.push(envelope.clone());
        Ok(())
    }
}

/// Writes each envelope as one line of JSON.
///
/// # Examples
///
/// ```
/// use tsp_solver_service::{
///     BAD_REQUEST, JsonLinesSink, ResponseEnvelope, ResponseSink, UNSUPPORTED_MESSAGE_TYPE,
/// };
///
/// let mut sink = JsonLinesSink::new(Vec::new());
/// let envelope = ResponseEnvelope::failure(None, BAD_REQUEST, UNSUPPORTED_MESSAGE_TYPE);
/// sink.publish(&envelope)?;
/// let output = String::from_utf8(sink.into_inner()).unwrap();
/// assert_eq!(output.lines().count(), 1);
/// # Ok::<(), tsp_solver_service::ServiceError>(())
/// ```
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResponseSink for JsonLinesSink<W> {
    fn publish(&mut self, envelope: &ResponseEnvelope) -> Result<(), ServiceError> {
        serde_json::to_writer(&mut self.writer, envelope).map_err(ServiceError::SerializeResponse)?;
        self.writer
            .write_all(b"\n")
            .map_err(ServiceError::WriteOutput)
    }

    fn flush(&mut self) -> Result<(), ServiceError> {
        self.writer.flush().map_err(ServiceError::WriteOutput)
    }
}
