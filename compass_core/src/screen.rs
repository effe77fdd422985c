/// Ordered list of screen rotation providers.
///
/// Providers are tried in insertion order; the first one that yields a finite
/// angle wins. With no answer the rotation is 0.
pub struct ScreenRotationChain<'a> {
    providers: Vec<Box<dyn Fn() -> Option<f64> + 'a>>,
}

impl<'a> ScreenRotationChain<'a> {
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    pub fn with_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Option<f64> + 'a,
    {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn resolve(&self) -> f64 {
        self.providers
            .iter()
            .find_map(|provider| provider().filter(|angle| angle.is_finite()))
            .unwrap_or(0.0)
    }
}

impl Default for ScreenRotationChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}
