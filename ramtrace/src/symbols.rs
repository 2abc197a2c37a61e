//! Symbol lookup in the firmware's ELF symbol table

use crate::domain::{ExtractError, VirtAddr};
use log::{debug, info};
use object::{Object, ObjectSymbol};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Anything that can map a symbol name to its address
pub trait SymbolResolver {
    fn resolve_symbol_address(&self, name: &str) -> Option<VirtAddr>;
}

impl SymbolResolver for HashMap<String, VirtAddr> {
    fn resolve_symbol_address(&self, name: &str) -> Option<VirtAddr> {
        self.get(name).copied()
    }
}

/// Symbol table loaded from an ELF file
#[derive(Debug, Default)]
pub struct SymbolFile {
    symbols: HashMap<String, VirtAddr>,
}

impl SymbolFile {
    /// Load the symbol table of the ELF file at `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid object file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let symbols = Self::parse(&data).map_err(|source| ExtractError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded {} symbols from {}", symbols.len(), path.display());
        Ok(symbols)
    }

    /// Parse an in-memory ELF image
    ///
    /// # Errors
    /// Returns an error if `data` is not a valid object file
    pub fn parse(data: &[u8]) -> Result<Self, object::Error> {
        let obj = object::File::parse(data)?;

        let mut symbols = HashMap::new();
        for symbol in obj.symbols() {
            let Ok(name) = symbol.name() else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            // First definition wins, like a linear search of the table would
            symbols.entry(name.to_string()).or_insert(VirtAddr(symbol.address()));
        }

        Ok(Self { symbols })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolResolver for SymbolFile {
    fn resolve_symbol_address(&self, name: &str) -> Option<VirtAddr> {
        let addr = self.symbols.get(name).copied();
        debug!("symbol {name} -> {addr:?}");
        addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    #[test]
    fn test_parse_finds_symbols() {
        let image = fixture::symbol_file(&[("ram_trace_buf", 0x2000_0000), ("main", 0x0000_1234)]);
        let symbols = SymbolFile::parse(&image).unwrap();

        assert_eq!(symbols.resolve_symbol_address("ram_trace_buf"), Some(VirtAddr(0x2000_0000)));
        assert_eq!(symbols.resolve_symbol_address("main"), Some(VirtAddr(0x1234)));
        assert_eq!(symbols.resolve_symbol_address("missing"), None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let image = fixture::symbol_file(&[("dup", 0x10), ("dup", 0x20)]);
        let symbols = SymbolFile::parse(&image).unwrap();
        assert_eq!(symbols.resolve_symbol_address("dup"), Some(VirtAddr(0x10)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SymbolFile::parse(b"definitely not an ELF file").is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = SymbolFile::open("/nonexistent/path/to/zephyr.elf").unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn test_hash_map_resolver() {
        let mut map = HashMap::new();
        map.insert("ram_trace_buf".to_string(), VirtAddr(0x2000_0000));
        assert_eq!(map.resolve_symbol_address("ram_trace_buf"), Some(VirtAddr(0x2000_0000)));
    }
}
