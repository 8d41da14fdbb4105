use std::sync::Arc;

use licensure_codec::RepositoryModel;
use licensure_context::Context;
use licensure_model::{License, Result};
use licensure_store::Sink;
use once_cell::sync::OnceCell;

use crate::parameters::ManagerParameters;

/// The effective bean plus the signed model built from it, computed once and
/// shared by every later call.
struct Effective {
    license: License,
    model: RepositoryModel,
}

/// Lazily computes the effective license and its signature, returned by
/// `generateKeyFrom`.
///
/// `license()` and `save_to()` are both idempotent/repeatable: the
/// duplicate-via-codec, initialize, validate, and sign steps run exactly
/// once no matter how many times either method is called.
pub struct KeyGenerator {
    context: Arc<Context>,
    parameters: Arc<ManagerParameters>,
    input: License,
    effective: OnceCell<Effective>,
}

impl KeyGenerator {
    pub(crate) fn new(context: Arc<Context>, parameters: Arc<ManagerParameters>, input: License) -> Self {
        Self {
            context,
            parameters,
            input,
            effective: OnceCell::new(),
        }
    }

    fn effective(&self) -> Result<&Effective> {
        self.effective.get_or_try_init(|| {
            let codec = self.context.codec();

            // Defensive copy: round-trip the caller's bean through the codec
            // into a fresh value, independent of any later mutation the
            // caller makes to their own copy.
            let bytes = licensure_codec::encode(codec.as_ref(), &self.input)?;
            let mut license: License = licensure_codec::decode(codec.as_ref(), &bytes)?;

            self.parameters.initialize(&self.context, &mut license)?;
            self.context.validate(&license)?;

            let controller = self.context.repository_context().controller(codec);
            let (model, _decoder) = self
                .parameters
                .authentication()
                .sign(&controller, &license)?;

            crate::telemetry::record_key_generated();
            Ok(Effective { license, model })
        })
    }

    /// The effective license: the input bean after duplication,
    /// initialization, and validation. Idempotent.
    pub fn license(&self) -> Result<License> {
        Ok(self.effective()?.license.clone())
    }

    /// Encode the signed repository model through the write-direction
    /// transform (compress, then encrypt) and write it to `sink`.
    /// Repeatable.
    pub fn save_to(&self, sink: &dyn Sink) -> Result<()> {
        let effective = self.effective()?;
        let encryption = self.parameters.encryption();
        let payload = licensure_codec::encode(self.context.codec().as_ref(), &effective.model)?;
        let bytes = crate::pipeline::encode_artifact(&self.context, encryption.as_ref(), payload)?;
        sink.write_all(&bytes)
    }
}
