//! Manifest resolution.

use crate::config::{LibraryEntry, Manifest};
use lib_dlopen::{DlResult, Library};
use serde::Serialize;

/// Outcome of resolving a whole manifest.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolveReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub libraries: Vec<LibraryReport>,
}

/// Outcome for one library entry.
#[derive(Clone, Debug, Serialize)]
pub struct LibraryReport {
    /// Path as given, `None` for the process image.
    pub library: Option<String>,

    /// Loader diagnostic if the library failed to open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub symbols: Vec<SymbolReport>,
}

/// Outcome for one symbol.
#[derive(Clone, Debug, Serialize)]
pub struct SymbolReport {
    pub name: String,

    /// Address formatted as `0x...`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LibraryReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.symbols.iter().all(|s| s.error.is_none())
    }
}

impl ResolveReport {
    pub fn is_success(&self) -> bool {
        self.libraries.iter().all(LibraryReport::is_success)
    }

    /// Number of failed entries: unopenable libraries plus unresolved symbols.
    pub fn failure_count(&self) -> usize {
        self.libraries
            .iter()
            .map(|lib| {
                if lib.error.is_some() {
                    1
                } else {
                    lib.symbols.iter().filter(|s| s.error.is_some()).count()
                }
            })
            .sum()
    }
}

/// Resolves every symbol of every manifest entry.
pub struct Resolver {
    manifest: Manifest,
}

impl Resolver {
    pub fn new(manifest: Manifest) -> Self {
        Self { manifest }
    }

    /// Run all entries. Failures are recorded in the report, never returned.
    pub fn run(&self) -> ResolveReport {
        if let Some(name) = &self.manifest.name {
            tracing::info!("Resolving manifest: {}", name);
        }

        ResolveReport {
            name: self.manifest.name.clone(),
            libraries: self.manifest.libraries.iter().map(resolve_entry).collect(),
        }
    }
}

fn open_entry(entry: &LibraryEntry) -> DlResult<Library> {
    match entry.path.as_deref() {
        None => Library::this(),
        Some(path) if entry.append_suffix => Library::open_named(path),
        Some(path) => Library::open(path),
    }
}

/// Open one library, resolve its symbols, then close it.
pub fn resolve_entry(entry: &LibraryEntry) -> LibraryReport {
    let mut library = match open_entry(entry) {
        Ok(library) => library,
        Err(e) => {
            tracing::warn!(library = entry.label(), error = %e, "Failed to open library");
            return LibraryReport {
                library: entry.path.clone(),
                error: Some(e.to_string()),
                symbols: Vec::new(),
            };
        }
    };

    let symbols = entry
        .symbols
        .iter()
        .map(|name| match library.get(name) {
            Ok(sym) => SymbolReport {
                name: name.clone(),
                address: Some(format!("{:#x}", sym.addr())),
                error: None,
            },
            Err(e) => {
                tracing::info!(
                    library = entry.label(),
                    symbol = %name,
                    error = %e,
                    "Unresolved symbol"
                );
                SymbolReport {
                    name: name.clone(),
                    address: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    library.close();

    LibraryReport {
        library: entry.path.clone(),
        error: None,
        symbols,
    }
}
