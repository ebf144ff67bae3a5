/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Encoding of typed messages into wire frames.

use fixp_core::document::{Document, MessageKind};
use fixp_core::error::EncodeError;
use serde::Serialize;

/// A message that can be written to the wire as a JSON text frame.
pub trait WireMessage: Serialize + Sized {
    /// Returns the message kind carried in the discriminator field.
    fn kind(&self) -> MessageKind;

    /// Encodes the message as a compact JSON text frame.
    ///
    /// # Errors
    /// Returns [`EncodeError::Serialize`] if serialization fails.
    fn encode(&self) -> Result<String, EncodeError> {
        serde_json::to_string(self).map_err(|e| EncodeError::Serialize(e.to_string()))
    }

    /// Converts the message into a [`Document`].
    ///
    /// # Errors
    /// Returns an [`EncodeError`] if the message does not serialize to an object.
    fn to_document(&self) -> Result<Document, EncodeError> {
        Document::from_message(self)
    }
}
