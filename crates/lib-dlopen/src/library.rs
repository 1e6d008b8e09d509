//! Dynamic library handle lifecycle.
//!
//! A [`Library`] owns exactly one native loader handle:
//! - Open (`dlopen` / `LoadLibraryExW`)
//! - Symbol lookup (`dlsym` / `GetProcAddress`)
//! - Close (`dlclose` / `FreeLibrary`)
//!
//! The handle moves from `Open` to `Closed` once and never back. Dropping an
//! open library closes it.

use crate::error::{DlError, DlResult};
use crate::platform::with_native_suffix;
use crate::symbol::Symbol;
use std::ffi::{c_void, CString, OsStr};
use std::fmt;

/// State of a library handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryState {
    /// The native handle is valid.
    Open,
    /// The native handle has been released.
    Closed,
}

/// An open dynamic library, or the running process image.
///
/// # Thread Safety
///
/// No internal locking is done. [`Library::get`] takes `&self` and
/// [`Library::close`] takes `&mut self`, so a close can never race a lookup
/// on the same handle. To close a library shared between threads, wrap it
/// in a `Mutex` or `RwLock`.
///
/// `Library` is not `Clone`: the native handle has exactly one owner.
pub struct Library {
    /// The underlying loader handle, `None` once closed.
    inner: Option<libloading::Library>,

    /// Name the library was opened with, `None` for the process image.
    path: Option<String>,
}

impl Library {
    /// Open a dynamic library.
    ///
    /// An empty `path` opens the running process image, like [`Library::this`].
    /// Otherwise `path` is handed to the platform loader unchanged, including
    /// its search path rules for bare file names.
    ///
    /// # Safety
    ///
    /// Opening a library runs its initialization routines. The crate cannot
    /// check what those do; loading an untrusted library is unsound.
    pub fn open<P: AsRef<OsStr>>(path: P) -> DlResult<Self> {
        let path = path.as_ref();
        if path.is_empty() {
            return Self::this();
        }

        let path_str = path.to_string_lossy().into_owned();
        tracing::debug!(library = %path_str, "Opening library");

        let library = unsafe { libloading::Library::new(path) }
            .map_err(|e| DlError::open_error(Some(path_str.as_str()), e))?;

        tracing::debug!(library = %path_str, "Opened library");

        Ok(Self {
            inner: Some(library),
            path: Some(path_str),
        })
    }

    /// Open a library by name, appending the platform suffix if missing.
    ///
    /// `"libm"` opens `libm.so` on Linux, `libm.dylib` on macOS and
    /// `libm.dll` on Windows. An empty name opens the process image.
    pub fn open_named(name: &str) -> DlResult<Self> {
        let path = with_native_suffix(name);
        if path != name {
            tracing::debug!(name, library = %path, "Appended dynamic library suffix");
        }
        Self::open(path)
    }

    /// Open the running process image.
    ///
    /// Symbols of the executable and every library already loaded into the
    /// global namespace can be resolved through the returned handle.
    pub fn this() -> DlResult<Self> {
        tracing::debug!("Opening process image");

        let library = open_self()?;

        Ok(Self {
            inner: Some(library),
            path: None,
        })
    }

    /// Resolve an exported symbol to its address.
    ///
    /// `name` is passed to the loader exactly as given: no mangling, no
    /// prefix or suffix handling. A NUL byte anywhere in `name`, trailing
    /// included, is rejected.
    ///
    /// # Errors
    ///
    /// [`DlError::Closed`] if the library has been closed, [`DlError::Symbol`]
    /// with the loader's diagnostic if the symbol cannot be resolved.
    pub fn get(&self, name: &str) -> DlResult<Symbol> {
        let library = self.inner.as_ref().ok_or(DlError::Closed)?;

        tracing::trace!(symbol = name, library = ?self.path, "Resolving symbol");

        // libloading strips a trailing NUL, so terminate the name here.
        let c_name = CString::new(name).map_err(|e| DlError::Symbol {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        // SAFETY: the symbol is read as an untyped pointer and never
        // dereferenced or called here.
        let ptr: *mut c_void = unsafe {
            *library
                .get::<*mut c_void>(c_name.as_bytes_with_nul())
                .map_err(|e| DlError::symbol_error(name, e))?
        };

        Ok(Symbol::new(name, ptr))
    }

    /// Release the native handle.
    ///
    /// Closing an already-closed library does nothing. A close failure
    /// reported by the platform is logged and otherwise ignored; the library
    /// is `Closed` afterwards in every case.
    pub fn close(&mut self) {
        let Some(library) = self.inner.take() else {
            return;
        };

        match library.close() {
            Ok(()) => tracing::debug!(library = ?self.path, "Closed library"),
            Err(e) => tracing::warn!(
                library = ?self.path,
                error = %e,
                "Platform loader failed to close library"
            ),
        }
    }

    /// Get the current state.
    pub fn state(&self) -> LibraryState {
        if self.inner.is_some() {
            LibraryState::Open
        } else {
            LibraryState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Name the library was opened with, `None` for the process image.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("path", &self.path)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(unix)]
fn open_self() -> DlResult<libloading::Library> {
    Ok(libloading::os::unix::Library::this().into())
}

#[cfg(windows)]
fn open_self() -> DlResult<libloading::Library> {
    libloading::os::windows::Library::this()
        .map(Into::into)
        .map_err(|e| DlError::open_error(None, e))
}
