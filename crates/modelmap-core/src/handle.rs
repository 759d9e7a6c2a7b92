//! Callable handles for model routines.
//!
//! A [`ModelHandle`] is a tagged variant: the tag is the calling convention
//! and the payload is a callable of exactly that shape. There is no way to
//! build a handle whose payload disagrees with its kind.
//!
//! # Routine layouts
//!
//! | Kind | Payload |
//! |---|---|
//! | `Native` | [`NativeFn`], a shared Rust callable over a [`NativeCall`] |
//! | `Fortran` | [`FortranFn`], `(ear, ne, param, ifl, photar, photer)` in `f32` |
//! | `C` | [`CFn`], `(energy, nFlux, params, spectrum, flux, fluxError, init)` in `f64` |
//! | `FortranDouble` | [`FortranDoubleFn`], as `Fortran` in `f64` |

use std::ffi::{c_char, c_int};
use std::fmt;
use std::sync::Arc;

use crate::{NativeError, SignatureKind};

/// Single-precision Fortran model routine.
///
/// `ear` holds `ne + 1` bin edges, `photar` and `photer` hold `ne` values.
pub type FortranFn = unsafe extern "C" fn(
    ear: *const f32,
    ne: *const c_int,
    param: *const f32,
    ifl: *const c_int,
    photar: *mut f32,
    photer: *mut f32,
);

/// Double-precision Fortran model routine.
pub type FortranDoubleFn = unsafe extern "C" fn(
    ear: *const f64,
    ne: *const c_int,
    param: *const f64,
    ifl: *const c_int,
    photar: *mut f64,
    photer: *mut f64,
);

/// C model routine with an init string.
///
/// `energy` holds `n_flux + 1` bin edges; `init` is NUL terminated.
pub type CFn = unsafe extern "C" fn(
    energy: *const f64,
    n_flux: c_int,
    params: *const f64,
    spectrum: c_int,
    flux: *mut f64,
    flux_error: *mut f64,
    init: *const c_char,
);

/// Arguments of a native call.
///
/// The slices carry their own lengths, so a native routine reads and
/// writes through bounds-checked views of the caller's buffers.
pub struct NativeCall<'a> {
    energy: &'a [f64],
    params: &'a [f64],
    spectrum: i32,
    flux: &'a mut [f64],
    flux_error: &'a mut [f64],
    init: &'a str,
}

impl<'a> NativeCall<'a> {
    pub fn new(
        energy: &'a [f64],
        params: &'a [f64],
        spectrum: i32,
        flux: &'a mut [f64],
        flux_error: &'a mut [f64],
        init: &'a str,
    ) -> Self {
        Self {
            energy,
            params,
            spectrum,
            flux,
            flux_error,
            init,
        }
    }

    /// The energy grid.
    pub fn energy(&self) -> &[f64] {
        self.energy
    }

    /// All parameter values.
    pub fn params(&self) -> &[f64] {
        self.params
    }

    /// Parameter at `index`, or [`NativeError::MissingParameter`].
    pub fn param(&self, index: usize) -> Result<f64, NativeError> {
        self.params
            .get(index)
            .copied()
            .ok_or(NativeError::MissingParameter {
                index,
                count: self.params.len(),
            })
    }

    pub fn spectrum(&self) -> i32 {
        self.spectrum
    }

    /// Number of output bins.
    pub fn bins(&self) -> usize {
        self.flux.len()
    }

    /// Current flux. For convolution models this is the input spectrum.
    pub fn flux(&self) -> &[f64] {
        self.flux
    }

    pub fn flux_mut(&mut self) -> &mut [f64] {
        self.flux
    }

    pub fn flux_error_mut(&mut self) -> &mut [f64] {
        self.flux_error
    }

    /// Auxiliary init string; empty when the caller supplied none.
    pub fn init(&self) -> &str {
        self.init
    }
}

/// Trait for native model routines.
pub trait NativeCallable {
    /// Evaluate the model into `call`'s flux buffer.
    fn call(&self, call: &mut NativeCall<'_>) -> Result<(), NativeError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&mut NativeCall<'_>) -> Result<(), NativeError>,
{
    fn call(&self, call: &mut NativeCall<'_>) -> Result<(), NativeError> {
        (self)(call)
    }
}

/// Type-erased native routine.
///
/// Cloning shares the underlying callable.
#[derive(Clone)]
pub struct NativeFn {
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn call(&self, call: &mut NativeCall<'_>) -> Result<(), NativeError> {
        self.inner.call(call)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}

/// Callable handle to a model routine, tagged by calling convention.
#[derive(Clone)]
pub enum ModelHandle {
    Native(NativeFn),
    Fortran(FortranFn),
    C(CFn),
    FortranDouble(FortranDoubleFn),
}

impl ModelHandle {
    /// Wrap a Rust callable as a native handle.
    pub fn native<F>(f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        ModelHandle::Native(NativeFn::new(f))
    }

    /// The calling convention this handle must be invoked with.
    pub fn kind(&self) -> SignatureKind {
        match self {
            ModelHandle::Native(_) => SignatureKind::Native,
            ModelHandle::Fortran(_) => SignatureKind::Fortran,
            ModelHandle::C(_) => SignatureKind::C,
            ModelHandle::FortranDouble(_) => SignatureKind::FortranDouble,
        }
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelHandle::Native(_) => write!(f, "ModelHandle::Native(...)"),
            ModelHandle::Fortran(func) => write!(f, "ModelHandle::Fortran({:p})", *func),
            ModelHandle::C(func) => write!(f, "ModelHandle::C({:p})", *func),
            ModelHandle::FortranDouble(func) => {
                write!(f, "ModelHandle::FortranDouble({:p})", *func)
            }
        }
    }
}
