//! Handle resolution from a shared library.
//!
//! The library is opened once and stays loaded for as long as the resolver
//! or any native handle it produced is alive.

use std::ffi::{CString, c_int, c_void};
use std::fmt;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;

use modelmap_core::{CFn, ModelDecl, ModelHandle, NativeCall, NativeError, SignatureKind};
use modelmap_registry::HandleResolver;

/// Resolves model routines by link symbol from one shared library.
pub struct LibraryResolver {
    library: Arc<Library>,
    path: PathBuf,
}

impl LibraryResolver {
    /// Load the library at `path`.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initialisers. The caller must trust the
    /// library, and every routine it exports under a table symbol must have
    /// the layout the table declares for it.
    pub unsafe fn open(path: impl AsRef<Path>) -> Result<Self, libloading::Error> {
        let path = path.as_ref();
        // SAFETY: forwarded to the caller.
        let library = unsafe { Library::new(path)? };
        tracing::info!(path = %path.display(), "opened model library");
        Ok(Self::from_library(library, path))
    }

    fn from_library(library: Library, path: &Path) -> Self {
        Self {
            library: Arc::new(library),
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn address(&self, symbol: &str) -> Result<*mut c_void, String> {
        // SAFETY: the symbol is read as an untyped address and not called here.
        let sym = unsafe { self.library.get::<*mut c_void>(symbol.as_bytes()) }
            .map_err(|e| e.to_string())?;
        non_null(*sym, symbol)
    }
}

impl HandleResolver for LibraryResolver {
    fn resolve(&self, decl: &ModelDecl) -> Result<ModelHandle, String> {
        let address = self.address(&decl.symbol())?;
        // SAFETY: `address` is a non-null routine address in a library that
        // stays loaded while the handle exists; `open`'s contract guarantees
        // it has the layout of `decl.kind`.
        Ok(unsafe { handle_at(decl.kind, address, &self.library) })
    }
}

fn non_null(address: *mut c_void, symbol: &str) -> Result<*mut c_void, String> {
    if address.is_null() {
        return Err(format!("symbol '{symbol}' is null"));
    }
    Ok(address)
}

/// Reinterpret a routine address as a handle of `kind`.
///
/// # Safety
///
/// `address` must be a routine with the layout of `kind` that stays valid
/// while `library` is loaded.
unsafe fn handle_at(
    kind: SignatureKind,
    address: *mut c_void,
    library: &Arc<Library>,
) -> ModelHandle {
    // SAFETY: forwarded to the caller.
    unsafe {
        match kind {
            SignatureKind::Fortran => ModelHandle::Fortran(mem::transmute(address)),
            SignatureKind::FortranDouble => ModelHandle::FortranDouble(mem::transmute(address)),
            SignatureKind::C => ModelHandle::C(mem::transmute(address)),
            SignatureKind::Native => {
                let wrapper: CFn = mem::transmute(address);
                native_wrapper(wrapper, Arc::clone(library))
            }
        }
    }
}

impl fmt::Debug for LibraryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryResolver")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Native routines are C++; their exported `C_` wrapper has the C layout.
fn native_wrapper(wrapper: CFn, library: Arc<Library>) -> ModelHandle {
    ModelHandle::native(move |call: &mut NativeCall<'_>| -> Result<(), NativeError> {
        let _library = &library;

        let bins = call.bins();
        if call.energy().len() != bins + 1 {
            return Err(NativeError::failed(format!(
                "library routine needs {} grid values for {bins} bins, got {}",
                bins + 1,
                call.energy().len()
            )));
        }
        let n_flux = c_int::try_from(bins)
            .map_err(|_| NativeError::failed(format!("{bins} bins exceed the range of a C int")))?;
        let init = CString::new(call.init()).map_err(|e| NativeError::failed(e.to_string()))?;

        let energy = call.energy().as_ptr();
        let params = call.params().as_ptr();
        let spectrum = call.spectrum();
        let flux = call.flux_mut().as_mut_ptr();
        let flux_error = call.flux_error_mut().as_mut_ptr();

        // SAFETY: `energy` holds `n_flux + 1` values; the flux and error
        // buffers hold `n_flux` values each (the adapter sizes the error
        // buffer to the flux). Both stay borrowed by `call` for the call.
        unsafe { wrapper(energy, n_flux, params, spectrum, flux, flux_error, init.as_ptr()) };
        Ok(())
    })
}
