//! The canonical invocation request.

/// Spectrum number passed when the caller does not choose one.
pub const DEFAULT_SPECTRUM: i32 = 1;

/// Everything a model evaluation needs, independent of calling convention.
///
/// The flux buffer is sized by the caller to the number of output bins.
/// Its incoming contents are visible to the routine, which is how
/// convolution models receive the spectrum they transform.
#[derive(Debug)]
pub struct ModelRequest<'a> {
    /// Energy grid (bin edges for the pointer-based kinds).
    pub energy: &'a [f64],
    pub params: &'a [f64],
    /// Output buffer, one value per bin.
    pub flux: &'a mut [f64],
    /// Optional per-bin error output, same length as `flux`.
    pub flux_error: Option<&'a mut [f64]>,
    pub spectrum: i32,
    /// Auxiliary string for kinds that accept one.
    pub init: Option<&'a str>,
}

impl<'a> ModelRequest<'a> {
    pub fn new(energy: &'a [f64], params: &'a [f64], flux: &'a mut [f64]) -> Self {
        Self {
            energy,
            params,
            flux,
            flux_error: None,
            spectrum: DEFAULT_SPECTRUM,
            init: None,
        }
    }

    pub fn with_spectrum(mut self, spectrum: i32) -> Self {
        self.spectrum = spectrum;
        self
    }

    pub fn with_init(mut self, init: &'a str) -> Self {
        self.init = Some(init);
        self
    }

    pub fn with_flux_error(mut self, flux_error: &'a mut [f64]) -> Self {
        self.flux_error = Some(flux_error);
        self
    }

    /// Number of output bins.
    pub fn bins(&self) -> usize {
        self.flux.len()
    }
}
