use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use licensure_model::Result;

use crate::{decode, encode, Codec};

/// Container produced by the repository context; carries the codec-encoded
/// license payload plus its signature.
///
/// The round-trip law the core relies on — `verify(sign(m, bean))` yields a
/// decoder whose decoded value equals `bean` — holds as long as
/// `signed_payload` is exactly what was handed to the signer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryModel {
    /// The codec-encoded license bean, prior to signing.
    pub signed_payload: Vec<u8>,
    /// The signature over `signed_payload`, produced by an `Authentication`.
    pub signature: Vec<u8>,
}

impl RepositoryModel {
    /// An empty model, ready to be filled in by an `Authentication::sign`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Bundles a [`RepositoryModel`] with the codec used to encode/decode the
/// payload it carries, so callers never have to thread the codec through
/// separately from the model it was paired with at signing time.
pub struct RepositoryController {
    codec: Arc<dyn Codec>,
}

impl RepositoryController {
    /// Build a controller bound to `codec`.
    #[must_use]
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    /// Encode a payload value (e.g. a license bean) via the bound codec.
    pub fn encode_payload<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        encode(self.codec.as_ref(), value)
    }

    /// Decode a payload value (e.g. a license bean) via the bound codec.
    pub fn decode_payload<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        decode(self.codec.as_ref(), bytes)
    }

    /// Encode a whole [`RepositoryModel`] via the bound codec, for writing
    /// to a sink.
    pub fn encode_model(&self, model: &RepositoryModel) -> Result<Vec<u8>> {
        encode(self.codec.as_ref(), model)
    }

    /// Decode a whole [`RepositoryModel`] via the bound codec, from bytes
    /// read off a source.
    pub fn decode_model(&self, bytes: &[u8]) -> Result<RepositoryModel> {
        decode(self.codec.as_ref(), bytes)
    }

    /// The codec this controller was bound to, for collaborators (e.g. an
    /// `Authentication` implementation) that need to build their own
    /// decoder over a payload slice.
    #[must_use]
    pub fn codec(&self) -> Arc<dyn Codec> {
        Arc::clone(&self.codec)
    }
}

/// Produces repository models and the controllers that operate on them.
///
/// The original interface is generic over the model type (`RepositoryContext<M>`);
/// this domain only ever produces one model shape, so the generic parameter
/// collapses to the concrete [`RepositoryModel`] rather than carrying a
/// type parameter with no second implementation to justify it.
pub trait RepositoryContext: Send + Sync {
    /// Produce a fresh, empty model.
    fn model(&self) -> RepositoryModel {
        RepositoryModel::new()
    }

    /// Build a controller for operating on models produced by this context.
    fn controller(&self, codec: Arc<dyn Codec>) -> RepositoryController {
        RepositoryController::new(codec)
    }
}

/// The only `RepositoryContext` shipped in-tree; stateless, so there is
/// nothing to configure.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRepositoryContext;

impl RepositoryContext for DefaultRepositoryContext {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonCodec;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Payload {
        amount: i64,
    }

    #[test]
    fn controller_round_trips_payload_and_model() {
        let codec: Arc<dyn Codec> = Arc::new(JsonCodec::new());
        let controller = DefaultRepositoryContext.controller(codec);

        let payload = Payload { amount: 7 };
        let payload_bytes = controller.encode_payload(&payload).unwrap();

        let mut model = RepositoryModel::new();
        model.signed_payload = payload_bytes.clone();
        model.signature = vec![1, 2, 3];

        let model_bytes = controller.encode_model(&model).unwrap();
        let restored_model = controller.decode_model(&model_bytes).unwrap();
        assert_eq!(restored_model, model);

        let restored_payload: Payload = controller.decode_payload(&payload_bytes).unwrap();
        assert_eq!(restored_payload, payload);
    }
}
