//! Call adapters.
//!
//! One adapter per [`SignatureKind`]. [`invoke`] is the single entry point:
//! it selects the adapter from the handle's tag and hands it the request.
//! Adapters hold no state, so concurrent calls only share the routine
//! itself.
//!
//! Length rules:
//!
//! - Every kind needs at least as many parameters as the declaration says
//!   the routine reads. Pointer-based routines cannot see the slice length.
//! - Pointer-based kinds read `bins + 1` grid values and write `bins`
//!   outputs, so the grid must be exactly one longer than the flux buffer.
//! - In-code native routines get slices and cannot overrun them, so they
//!   define their own grid contract; only an empty output is rejected.
//!   Native handles backed by a library routine (the `C_` wrappers) check
//!   `bins + 1` themselves, as the wrapped routine is pointer-based.
//! - A caller-supplied flux error buffer must match the flux length.
//!   Without one, the adapter passes a zeroed scratch buffer.

mod c;
mod fortran;
mod native;

use std::ffi::c_int;

use modelmap_core::{InvocationError, ModelHandle, ModelRequest, SignatureKind};

/// Invoke `handle` with `request` using the adapter for its kind.
///
/// `params` is the number of parameter values the routine reads. On success
/// the routine's output is in `request.flux` (and in `request.flux_error`
/// when one was supplied).
pub(crate) fn invoke(
    handle: &ModelHandle,
    params: usize,
    request: &mut ModelRequest<'_>,
) -> Result<(), InvocationError> {
    check_params(params, request)?;
    match handle {
        ModelHandle::Native(f) => native::call(f, request),
        ModelHandle::Fortran(f) => fortran::call_single(*f, request),
        ModelHandle::C(f) => c::call(*f, request),
        ModelHandle::FortranDouble(f) => fortran::call_double(*f, request),
    }
}

/// Validate the grid and flux lengths for a pointer-based kind and return
/// the bin count as a C int.
fn pointer_bins(kind: SignatureKind, request: &ModelRequest<'_>) -> Result<c_int, InvocationError> {
    let bins = request.flux.len();
    if bins == 0 {
        return Err(InvocationError::EmptyOutput);
    }
    if request.energy.len() != bins + 1 {
        return Err(InvocationError::GridMismatch {
            kind,
            grid: request.energy.len(),
            bins,
        });
    }
    c_int::try_from(bins).map_err(|_| InvocationError::TooManyBins(bins))
}

fn check_params(expected: usize, request: &ModelRequest<'_>) -> Result<(), InvocationError> {
    let got = request.params.len();
    if got < expected {
        return Err(InvocationError::ParamMismatch { expected, got });
    }
    Ok(())
}

fn check_error_buffer(request: &ModelRequest<'_>) -> Result<(), InvocationError> {
    match request.flux_error.as_deref() {
        Some(errors) if errors.len() != request.flux.len() => {
            Err(InvocationError::ErrorBufferMismatch {
                bins: request.flux.len(),
                errors: errors.len(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelmap_core::{NativeCall, NativeError};

    #[test]
    fn pointer_bins_requires_one_extra_edge() {
        let mut flux = [0.0; 3];
        let req = ModelRequest::new(&[1.0, 2.0, 3.0], &[], &mut flux);
        assert_eq!(
            pointer_bins(SignatureKind::C, &req),
            Err(InvocationError::GridMismatch {
                kind: SignatureKind::C,
                grid: 3,
                bins: 3,
            })
        );

        let mut flux = [0.0; 2];
        let req = ModelRequest::new(&[1.0, 2.0, 3.0], &[], &mut flux);
        assert_eq!(pointer_bins(SignatureKind::C, &req), Ok(2));
    }

    #[test]
    fn pointer_bins_rejects_empty_output() {
        let mut flux: [f64; 0] = [];
        let req = ModelRequest::new(&[1.0], &[], &mut flux);
        assert_eq!(
            pointer_bins(SignatureKind::Fortran, &req),
            Err(InvocationError::EmptyOutput)
        );
    }

    #[test]
    fn error_buffer_length_checked() {
        let mut flux = [0.0; 2];
        let mut errors = [0.0; 3];
        let req = ModelRequest::new(&[1.0, 2.0, 3.0], &[], &mut flux).with_flux_error(&mut errors);
        assert_eq!(
            check_error_buffer(&req),
            Err(InvocationError::ErrorBufferMismatch { bins: 2, errors: 3 })
        );
    }

    #[test]
    fn invoke_selects_adapter_by_tag() {
        let handle = ModelHandle::native(|call: &mut NativeCall<'_>| -> Result<(), NativeError> {
            if call.init() != "tag" {
                return Err(NativeError::failed("wrong init"));
            }
            call.flux_mut().fill(7.0);
            Ok(())
        });
        let mut flux = [0.0; 2];
        let mut req = ModelRequest::new(&[0.0, 1.0, 2.0], &[], &mut flux).with_init("tag");
        invoke(&handle, 0, &mut req).unwrap();
        assert_eq!(flux, [7.0, 7.0]);
    }

    unsafe extern "C" fn fortran_reads_two(
        _ear: *const f32,
        ne: *const c_int,
        param: *const f32,
        _ifl: *const c_int,
        photar: *mut f32,
        _photer: *mut f32,
    ) {
        unsafe {
            for i in 0..*ne as usize {
                *photar.add(i) = *param + *param.add(1);
            }
        }
    }

    unsafe extern "C" fn fortran_double_reads_two(
        _ear: *const f64,
        ne: *const c_int,
        param: *const f64,
        _ifl: *const c_int,
        photar: *mut f64,
        _photer: *mut f64,
    ) {
        unsafe {
            for i in 0..*ne as usize {
                *photar.add(i) = *param + *param.add(1);
            }
        }
    }

    unsafe extern "C" fn c_reads_two(
        _energy: *const f64,
        n_flux: c_int,
        params: *const f64,
        _spectrum: c_int,
        flux: *mut f64,
        _flux_error: *mut f64,
        _init: *const std::ffi::c_char,
    ) {
        unsafe {
            for i in 0..n_flux as usize {
                *flux.add(i) = *params + *params.add(1);
            }
        }
    }

    fn pointer_handles() -> [ModelHandle; 3] {
        [
            ModelHandle::Fortran(fortran_reads_two),
            ModelHandle::FortranDouble(fortran_double_reads_two),
            ModelHandle::C(c_reads_two),
        ]
    }

    #[test]
    fn short_params_never_reach_pointer_routines() {
        for handle in pointer_handles() {
            for params in [&[][..], &[1.0][..]] {
                let mut flux = [-1.0; 2];
                let mut req = ModelRequest::new(&[0.0, 1.0, 2.0], params, &mut flux);
                assert_eq!(
                    invoke(&handle, 2, &mut req),
                    Err(InvocationError::ParamMismatch {
                        expected: 2,
                        got: params.len(),
                    }),
                    "{handle:?}"
                );
                assert_eq!(flux, [-1.0; 2]);
            }
        }
    }

    #[test]
    fn declared_params_reach_pointer_routines() {
        for handle in pointer_handles() {
            let mut flux = [0.0; 2];
            let mut req = ModelRequest::new(&[0.0, 1.0, 2.0], &[1.5, 2.5, 9.0], &mut flux);
            invoke(&handle, 2, &mut req).unwrap();
            assert_eq!(flux, [4.0, 4.0]);
        }
    }

    #[test]
    fn native_params_checked_against_declaration() {
        let handle =
            ModelHandle::native(|_: &mut NativeCall<'_>| -> Result<(), NativeError> { Ok(()) });
        let mut flux = [0.0; 1];
        let mut req = ModelRequest::new(&[0.0, 1.0], &[], &mut flux);
        assert_eq!(
            invoke(&handle, 1, &mut req),
            Err(InvocationError::ParamMismatch { expected: 1, got: 0 })
        );
    }
}
