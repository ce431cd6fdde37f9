//! Record trait for typed collections.

use userdb_codec::{Decode, Encode};

/// A keyed entity stored in its own collection.
///
/// Implementors provide:
/// - `COLLECTION`: the name of the table holding every record of the type
/// - `id()` / `set_id()`: access to the store-assigned identifier
/// - `encode()` / `decode()` via the codec traits
///
/// The store owns the identifier. It assigns `id` on creation from the
/// collection's sequence and restores it after updates, so implementations
/// should treat `set_id` as a plain setter.
///
/// # Example
///
/// ```rust,ignore
/// use userdb_codec::{CodecResult, Decode, Encode, RecordReader, RecordWriter};
/// use userdb_core::Record;
///
/// #[derive(Clone)]
/// struct Team {
///     id: u64,
///     name: String,
/// }
///
/// impl Encode for Team {
///     fn encode(&self) -> CodecResult<Vec<u8>> {
///         let mut w = RecordWriter::new();
///         w.put_uint(1, self.id)?;
///         w.put_text(2, &self.name, 128)?;
///         w.finish()
///     }
/// }
///
/// impl Decode for Team {
///     fn decode(bytes: &[u8]) -> CodecResult<Self> {
///         let r = RecordReader::from_bytes(bytes)?;
///         Ok(Team { id: r.uint(1)?, name: r.text(2)? })
///     }
/// }
///
/// impl Record for Team {
///     const COLLECTION: &'static str = "Teams";
///     fn id(&self) -> u64 { self.id }
///     fn set_id(&mut self, id: u64) { self.id = id }
/// }
/// ```
pub trait Record: Encode + Decode + Clone {
    /// Name of the collection (engine table) holding this record type.
    const COLLECTION: &'static str;

    /// Returns the record's identifier (`0` until created).
    fn id(&self) -> u64;

    /// Sets the record's identifier.
    fn set_id(&mut self, id: u64);
}
