use licensure_model::Result;

/// A reversible byte-stream filter (compression, encryption), composable
/// left-to-right via [`Transformation::and_then`].
///
/// `apply` is the write direction (e.g. compress-then-encrypt when two
/// transformations are chained); `invert` is its exact inverse, applied in
/// reverse order by [`Chain`].
pub trait Transformation: Send + Sync {
    /// Apply the transformation in the write direction.
    fn apply(&self, data: Vec<u8>) -> Result<Vec<u8>>;

    /// Apply the transformation's inverse, in the read direction.
    fn invert(&self, data: Vec<u8>) -> Result<Vec<u8>>;

    /// Compose `self` followed by `next` into a single transformation.
    fn and_then(self, next: Box<dyn Transformation>) -> Chain
    where
        Self: Sized + 'static,
    {
        Chain(vec![Box::new(self), next])
    }
}

/// A left-to-right composition of transformations.
///
/// `apply` runs the chain forwards (e.g. compress, then encrypt);
/// `invert` runs it backwards (decrypt, then decompress) so that
/// `chain.invert(chain.apply(data)?)? == data`.
pub struct Chain(Vec<Box<dyn Transformation>>);

impl Chain {
    /// Append another transformation to the chain.
    #[must_use]
    pub fn and_then(mut self, next: Box<dyn Transformation>) -> Chain {
        self.0.push(next);
        self
    }
}

impl Transformation for Chain {
    fn apply(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        self.0.iter().try_fold(data, |acc, t| t.apply(acc))
    }

    fn invert(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        self.0.iter().rev().try_fold(data, |acc, t| t.invert(acc))
    }
}
