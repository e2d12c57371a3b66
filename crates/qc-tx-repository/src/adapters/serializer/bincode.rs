use crate::domain::errors::CodecError;
use crate::ports::outbound::TxCodec;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Width of the version prefix.
const VERSION_LEN: usize = 2;

/// Transaction codec using bincode behind a 2-byte big-endian version prefix.
pub struct BincodeTxCodec<T> {
    supported_versions: Vec<u16>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for BincodeTxCodec<T> {
    fn default() -> Self {
        Self::new(vec![0])
    }
}

impl<T> BincodeTxCodec<T> {
    /// Codec accepting the given versions on decode.
    pub fn new(supported_versions: Vec<u16>) -> Self {
        Self {
            supported_versions,
            _marker: PhantomData,
        }
    }

    fn check_version(&self, version: u16) -> Result<(), CodecError> {
        if self.supported_versions.contains(&version) {
            Ok(())
        } else {
            Err(CodecError::UnknownVersion { version })
        }
    }

    fn encode<V: Serialize + ?Sized>(&self, version: u16, value: &V) -> Result<Vec<u8>, CodecError> {
        self.check_version(version)?;
        let body = bincode::serialize(value).map_err(|e| CodecError::Encode {
            message: e.to_string(),
        })?;

        let mut out = Vec::with_capacity(VERSION_LEN + body.len());
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<V, CodecError> {
        if bytes.len() < VERSION_LEN {
            return Err(CodecError::Truncated { len: bytes.len() });
        }
        let (version_bytes, body) = bytes.split_at(VERSION_LEN);
        self.check_version(u16::from_be_bytes([version_bytes[0], version_bytes[1]]))?;

        bincode::deserialize(body).map_err(|e| CodecError::Decode {
            message: e.to_string(),
        })
    }
}

impl<T> TxCodec<T> for BincodeTxCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn marshal_tx(&self, version: u16, tx: &T) -> Result<Vec<u8>, CodecError> {
        self.encode(version, tx)
    }

    fn unmarshal_tx(&self, bytes: &[u8]) -> Result<T, CodecError> {
        self.decode(bytes)
    }

    fn marshal_batch(&self, version: u16, txs: &[T]) -> Result<Vec<u8>, CodecError> {
        self.encode(version, txs)
    }

    fn unmarshal_batch(&self, bytes: &[u8]) -> Result<Vec<T>, CodecError> {
        self.decode(bytes)
    }
}
