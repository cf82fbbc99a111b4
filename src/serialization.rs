//! Serialization of learned selector parameters.
//!
//! Parameters are plain `ndarray` data, so any serde type gets the compact
//! bincode form through [`SerializableParams`]. The reduced selector also has a
//! human-readable JSON file form.

use crate::error::{Result, SelectionError};
use crate::model::ReducedSelector;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A trait for parameter representations that can be serialized to and from bytes.
pub trait SerializableParams: Sized {
    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl ReducedSelector {
    /// Writes the selector as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a selector written by [`save_to_file`](Self::save_to_file).
    ///
    /// # Errors
    /// [`SelectionError::Shape`] if the stored weights have an empty axis.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let selector: ReducedSelector = serde_json::from_reader(reader)?;
        let (o, d) = selector.size();
        if o == 0 || d == 0 {
            return Err(SelectionError::shape(
                "stored selector",
                "all axes positive",
                (o, d),
            ));
        }
        Ok(selector)
    }
}
