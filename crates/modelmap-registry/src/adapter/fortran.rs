//! Adapters for Fortran routines.
//!
//! Fortran passes every argument by reference, so the bin count and the
//! spectrum number go in as pointers to locals.

use std::ffi::c_int;

use modelmap_core::{FortranDoubleFn, FortranFn, InvocationError, ModelRequest, SignatureKind};

use super::{check_error_buffer, pointer_bins};

/// Single precision: the grid, parameters and flux are narrowed to `f32`
/// copies for the call and the outputs widened back afterwards.
pub(super) fn call_single(f: FortranFn, request: &mut ModelRequest<'_>) -> Result<(), InvocationError> {
    let ne = pointer_bins(SignatureKind::Fortran, request)?;
    check_error_buffer(request)?;
    let ifl: c_int = request.spectrum;

    let ear = narrow(request.energy);
    let param = narrow(request.params);
    let mut photar = narrow(request.flux);
    let mut photer = match request.flux_error.as_deref() {
        Some(errors) => narrow(errors),
        None => vec![0.0; photar.len()],
    };

    // SAFETY: `ear` holds `ne + 1` values and `photar`/`photer` hold `ne`
    // values, checked by `pointer_bins` and `check_error_buffer`. All
    // buffers outlive the call.
    unsafe {
        f(
            ear.as_ptr(),
            &ne,
            param.as_ptr(),
            &ifl,
            photar.as_mut_ptr(),
            photer.as_mut_ptr(),
        );
    }

    widen_into(&photar, request.flux);
    if let Some(errors) = request.flux_error.as_deref_mut() {
        widen_into(&photer, errors);
    }
    Ok(())
}

/// Double precision: the caller's buffers are passed straight through.
pub(super) fn call_double(
    f: FortranDoubleFn,
    request: &mut ModelRequest<'_>,
) -> Result<(), InvocationError> {
    let ne = pointer_bins(SignatureKind::FortranDouble, request)?;
    check_error_buffer(request)?;
    let ifl: c_int = request.spectrum;

    let mut scratch = Vec::new();
    let photer = match request.flux_error.as_deref_mut() {
        Some(errors) => errors,
        None => {
            scratch.resize(request.flux.len(), 0.0);
            scratch.as_mut_slice()
        }
    };

    // SAFETY: same length contract as `call_single`; `photer` has
    // `ne` values whether it is the caller's buffer or the scratch one.
    unsafe {
        f(
            request.energy.as_ptr(),
            &ne,
            request.params.as_ptr(),
            &ifl,
            request.flux.as_mut_ptr(),
            photer.as_mut_ptr(),
        );
    }
    Ok(())
}

fn narrow(values: &[f64]) -> Vec<f32> {
    values.iter().map(|&v| v as f32).collect()
}

fn widen_into(src: &[f32], dst: &mut [f64]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = f64::from(*s);
    }
}
