//! Adapter for C routines taking an init string.

use std::ffi::CString;

use modelmap_core::{CFn, InvocationError, ModelRequest, SignatureKind};

use super::{check_error_buffer, pointer_bins};

pub(super) fn call(f: CFn, request: &mut ModelRequest<'_>) -> Result<(), InvocationError> {
    let n_flux = pointer_bins(SignatureKind::C, request)?;
    check_error_buffer(request)?;
    let init = CString::new(request.init.unwrap_or(""))?;

    let mut scratch = Vec::new();
    let flux_error = match request.flux_error.as_deref_mut() {
        Some(errors) => errors,
        None => {
            scratch.resize(request.flux.len(), 0.0);
            scratch.as_mut_slice()
        }
    };

    // SAFETY: `energy` holds `n_flux + 1` values, `flux` and `flux_error`
    // hold `n_flux` values, and `init` is NUL terminated. All of them
    // outlive the call.
    unsafe {
        f(
            request.energy.as_ptr(),
            n_flux,
            request.params.as_ptr(),
            request.spectrum,
            request.flux.as_mut_ptr(),
            flux_error.as_mut_ptr(),
            init.as_ptr(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, c_char, c_int};

    /// flux[i] = energy[i] + params[0] + strlen(init)
    unsafe extern "C" fn echo_with_init(
        energy: *const f64,
        n_flux: c_int,
        params: *const f64,
        _spectrum: c_int,
        flux: *mut f64,
        _flux_error: *mut f64,
        init: *const c_char,
    ) {
        unsafe {
            let n = n_flux as usize;
            let energy = std::slice::from_raw_parts(energy, n + 1);
            let flux = std::slice::from_raw_parts_mut(flux, n);
            let extra = CStr::from_ptr(init).to_bytes().len() as f64;
            for i in 0..n {
                flux[i] = energy[i] + *params + extra;
            }
        }
    }

    #[test]
    fn c_call_passes_init_string() {
        let mut flux = [0.0; 2];
        let mut req = ModelRequest::new(&[1.0, 2.0, 3.0], &[10.0], &mut flux).with_init("ab");
        call(echo_with_init, &mut req).unwrap();
        assert_eq!(flux, [13.0, 14.0]);
    }

    #[test]
    fn c_call_without_init_passes_empty_string() {
        let mut flux = [0.0; 2];
        let mut req = ModelRequest::new(&[1.0, 2.0, 3.0], &[10.0], &mut flux);
        call(echo_with_init, &mut req).unwrap();
        assert_eq!(flux, [11.0, 12.0]);
    }

    #[test]
    fn c_call_rejects_interior_nul() {
        let mut flux = [0.0; 2];
        let mut req = ModelRequest::new(&[1.0, 2.0, 3.0], &[10.0], &mut flux).with_init("a\0b");
        assert!(matches!(
            call(echo_with_init, &mut req),
            Err(InvocationError::InvalidInit(_))
        ));
    }
}
