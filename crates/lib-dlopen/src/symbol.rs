//! Resolved symbol addresses.

use std::ffi::c_void;
use std::fmt;
use std::mem::size_of;

/// Width in bytes of a resolved address.
pub const ADDRESS_SIZE: usize = size_of::<usize>();

/// Address of an exported symbol.
///
/// The value is untyped: the caller must know the symbol's signature and
/// calling convention before reinterpreting it. A `Symbol` does not borrow
/// the library it came from, so it stays valid as a value after the
/// library is closed even though the address it holds may not.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: String,
    addr: usize,
}

impl Symbol {
    pub(crate) fn new(name: impl Into<String>, ptr: *mut c_void) -> Self {
        Self {
            name: name.into(),
            addr: ptr as usize,
        }
    }

    /// The exported name this address was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw address as an integer.
    pub fn addr(&self) -> usize {
        self.addr
    }

    /// Raw address as a pointer.
    pub fn as_ptr(&self) -> *mut c_void {
        self.addr as *mut c_void
    }

    pub fn is_null(&self) -> bool {
        self.addr == 0
    }

    /// Pointer-width buffer holding the address in native byte order.
    pub fn to_ne_bytes(&self) -> [u8; ADDRESS_SIZE] {
        self.addr.to_ne_bytes()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name)
            .field("addr", &format_args!("{:#x}", self.addr))
            .finish()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:#x}", self.name, self.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_buffer_is_pointer_width() {
        let sym = Symbol::new("x", 0x1234usize as *mut c_void);
        assert_eq!(sym.to_ne_bytes().len(), size_of::<*mut c_void>());
        assert_eq!(usize::from_ne_bytes(sym.to_ne_bytes()), 0x1234);
        assert_eq!(sym.as_ptr() as usize, 0x1234);
        assert!(!sym.is_null());
    }

    #[test]
    fn test_symbol_display() {
        let sym = Symbol::new("cos", 0xffusize as *mut c_void);
        assert_eq!(sym.to_string(), "cos @ 0xff");
        assert_eq!(sym.name(), "cos");
    }
}
