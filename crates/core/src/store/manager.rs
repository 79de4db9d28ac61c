use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::book::PortfolioBook;

/// Format tag written into every snapshot.
pub const FORMAT: &str = "stock-portfolio";

/// Current snapshot format version.
pub const CURRENT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    format: String,
    version: u16,
    book: PortfolioBook,
}

/// High-level storage operations: save/load a store's book to/from JSON
/// bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a book to snapshot bytes.
    pub fn save_to_bytes(book: &PortfolioBook) -> Result<Vec<u8>, CoreError> {
        let snapshot = Snapshot {
            format: FORMAT.to_string(),
            version: CURRENT_VERSION,
            book: book.clone(),
        };
        serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
    }

    /// Parse snapshot bytes, checking the format tag and version.
    pub fn load_from_bytes(data: &[u8]) -> Result<PortfolioBook, CoreError> {
        let snapshot: Snapshot = serde_json::from_slice(data)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse snapshot: {e}")))?;

        if snapshot.format != FORMAT {
            return Err(CoreError::Deserialization(format!(
                "Not a portfolio snapshot (format '{}')",
                snapshot.format
            )));
        }
        if snapshot.version == 0 || snapshot.version > CURRENT_VERSION {
            return Err(CoreError::Deserialization(format!(
                "Unsupported snapshot version: {}",
                snapshot.version
            )));
        }

        Ok(snapshot.book)
    }

    /// Save a book to a snapshot file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(book: &PortfolioBook, path: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(book)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a book from a snapshot file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<PortfolioBook, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }
}
