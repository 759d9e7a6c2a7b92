//! Adapter for native (slice-based) routines.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use modelmap_core::{InvocationError, ModelRequest, NativeCall, NativeFn};

use super::check_error_buffer;

pub(super) fn call(f: &NativeFn, request: &mut ModelRequest<'_>) -> Result<(), InvocationError> {
    let bins = request.flux.len();
    if bins == 0 {
        return Err(InvocationError::EmptyOutput);
    }
    check_error_buffer(request)?;

    let mut scratch = Vec::new();
    let flux_error = match request.flux_error.as_deref_mut() {
        Some(errors) => errors,
        None => {
            scratch.resize(bins, 0.0);
            scratch.as_mut_slice()
        }
    };

    let mut call = NativeCall::new(
        request.energy,
        request.params,
        request.spectrum,
        request.flux,
        flux_error,
        request.init.unwrap_or(""),
    );

    // A panicking routine leaves the flux buffer in an unspecified state,
    // which the caller discards on error.
    match panic::catch_unwind(AssertUnwindSafe(|| f.call(&mut call))) {
        Ok(result) => result.map_err(InvocationError::from),
        Err(payload) => Err(InvocationError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
