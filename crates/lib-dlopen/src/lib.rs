//! # lib-dlopen
//!
//! Owned handles to native dynamic libraries.
//!
//! This crate opens shared libraries (`.so`/`.dylib`/`.dll`) or the running
//! process image and resolves exported symbols to raw addresses. It handles:
//!
//! - Dynamic library loading with `libloading`
//! - Handle lifecycle (open/get/close) with release on drop
//! - Verbatim platform loader diagnostics
//! - Platform library suffixes
//!
//! Resolved addresses are untyped. Turning them into callable function
//! pointers is left to the caller.
//!
//! ```no_run
//! use lib_dlopen::Library;
//!
//! let mut lib = Library::open_named("libm")?;
//! let cos = lib.get("cos")?;
//! println!("{cos}");
//! lib.close();
//! # Ok::<(), lib_dlopen::DlError>(())
//! ```

pub mod error;
pub mod library;
pub mod platform;
pub mod symbol;

pub use error::{DlError, DlResult};
pub use library::{Library, LibraryState};
pub use platform::LibraryFormat;
pub use symbol::Symbol;
