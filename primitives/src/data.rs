use {
  serde::{Deserialize, Serialize},
  thiserror::Error,
};

/// Binary-level failures of the constructor codec.
///
/// Anything that makes a byte stream unreadable as a [`Data`] tree lands
/// here. Shape-level failures (right tree, wrong datum) are reported one
/// layer up by the datum decoders.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
  #[error("unexpected end of datum byte stream")]
  Truncated,

  #[error("unrecognized value kind byte {0:#04x}")]
  InvalidKind(u8),

  #[error("unrecognized integer sign byte {0:#04x}")]
  InvalidSign(u8),

  #[error("integer magnitude of {0} bytes exceeds the supported range")]
  IntTooLarge(usize),

  #[error("integer magnitude has a leading zero byte")]
  NonMinimalInt,

  #[error("variable-length integer is malformed")]
  InvalidVarint,

  #[error("{0} trailing bytes after a complete value")]
  TrailingBytes(usize),

  #[error("value nesting exceeds {MAX_DEPTH} levels")]
  NestingTooDeep,
}

/// Upper bound on constructor/list nesting when decoding. Keeps the
/// recursive decoder's stack usage bounded regardless of input.
const MAX_DEPTH: usize = 128;

/// A value in the tagged constructor format attached to UTXOs as datums
/// and redeemers.
///
/// Every composite value is a constructor: a small integer tag followed by
/// an ordered sequence of fields. Primitives are length-prefixed byte
/// strings and variable-length integers. The binary layout is:
///
/// - kind byte: 0 = constr, 1 = int, 2 = bytes, 3 = list;
/// - constr: LEB128 tag, LEB128 field count, then the fields;
/// - int: sign byte (0 non-negative, 1 negative), LEB128 magnitude length,
///   minimal big-endian magnitude;
/// - bytes: LEB128 length, raw bytes;
/// - list: LEB128 element count, then the elements.
///
/// Integers are variable-length on the wire. Decoding one that does not fit
/// the host representation fails with [`DataError::IntTooLarge`], it is
/// never truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Data {
  Constr { tag: u64, fields: Vec<Data> },
  Int(i128),
  Bytes(Vec<u8>),
  List(Vec<Data>),
}

const KIND_CONSTR: u8 = 0;
const KIND_INT: u8 = 1;
const KIND_BYTES: u8 = 2;
const KIND_LIST: u8 = 3;

impl Data {
  pub fn constr(tag: u64, fields: Vec<Data>) -> Self {
    Data::Constr { tag, fields }
  }

  /// Encodes a UTF-8 string as a byte-string value.
  pub fn text(s: &str) -> Self {
    Data::Bytes(s.as_bytes().to_vec())
  }

  /// Explicit presence encoding for optional fields: constr 0 with no
  /// fields when absent, constr 1 wrapping the value when present. A
  /// sentinel byte string would be ambiguous with a legitimately empty
  /// one, so options are always spelled out as constructors.
  pub fn option(value: Option<Data>) -> Self {
    match value {
      None => Data::constr(0, vec![]),
      Some(v) => Data::constr(1, vec![v]),
    }
  }

  pub fn as_constr(&self) -> Option<(u64, &[Data])> {
    match self {
      Data::Constr { tag, fields } => Some((*tag, fields)),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i128> {
    match self {
      Data::Int(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_bytes(&self) -> Option<&[u8]> {
    match self {
      Data::Bytes(b) => Some(b),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[Data]> {
    match self {
      Data::List(items) => Some(items),
      _ => None,
    }
  }

  pub fn encode(&self) -> Vec<u8> {
    let mut out = Vec::new();
    self.encode_into(&mut out);
    out
  }

  fn encode_into(&self, out: &mut Vec<u8>) {
    match self {
      Data::Constr { tag, fields } => {
        out.push(KIND_CONSTR);
        write_varint(*tag, out);
        write_varint(fields.len() as u64, out);
        for field in fields {
          field.encode_into(out);
        }
      }
      Data::Int(n) => {
        out.push(KIND_INT);
        let negative = *n < 0;
        out.push(negative as u8);
        let magnitude = n.unsigned_abs();
        let bytes = minimal_be_bytes(magnitude);
        write_varint(bytes.len() as u64, out);
        out.extend_from_slice(&bytes);
      }
      Data::Bytes(bytes) => {
        out.push(KIND_BYTES);
        write_varint(bytes.len() as u64, out);
        out.extend_from_slice(bytes);
      }
      Data::List(items) => {
        out.push(KIND_LIST);
        write_varint(items.len() as u64, out);
        for item in items {
          item.encode_into(out);
        }
      }
    }
  }

  /// Decodes exactly one value from the byte stream. Trailing bytes after
  /// a complete value are an error: a datum is always a single value.
  pub fn decode(bytes: &[u8]) -> Result<Self, DataError> {
    let mut cursor = Cursor { bytes, pos: 0 };
    let value = cursor.read_value(0)?;
    match cursor.remaining() {
      0 => Ok(value),
      n => Err(DataError::TrailingBytes(n)),
    }
  }
}

/// Strips leading zero bytes so equal integers always encode identically.
fn minimal_be_bytes(magnitude: u128) -> Vec<u8> {
  let bytes = magnitude.to_be_bytes();
  let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
  bytes[first..].to_vec()
}

fn write_varint(mut value: u64, out: &mut Vec<u8>) {
  loop {
    let byte = (value & 0x7f) as u8;
    value >>= 7;
    if value == 0 {
      out.push(byte);
      return;
    }
    out.push(byte | 0x80);
  }
}

struct Cursor<'a> {
  bytes: &'a [u8],
  pos: usize,
}

impl<'a> Cursor<'a> {
  fn remaining(&self) -> usize {
    self.bytes.len() - self.pos
  }

  fn read_byte(&mut self) -> Result<u8, DataError> {
    let byte = *self.bytes.get(self.pos).ok_or(DataError::Truncated)?;
    self.pos += 1;
    Ok(byte)
  }

  fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DataError> {
    if self.remaining() < len {
      return Err(DataError::Truncated);
    }
    let slice = &self.bytes[self.pos..self.pos + len];
    self.pos += len;
    Ok(slice)
  }

  fn read_varint(&mut self) -> Result<u64, DataError> {
    let mut value: u64 = 0;
    let mut shift = 0;
    loop {
      let byte = self.read_byte()?;
      if shift == 63 && byte > 1 {
        return Err(DataError::InvalidVarint);
      }
      value |= u64::from(byte & 0x7f) << shift;
      if byte & 0x80 == 0 {
        return Ok(value);
      }
      shift += 7;
      if shift > 63 {
        return Err(DataError::InvalidVarint);
      }
    }
  }

  fn read_value(&mut self, depth: usize) -> Result<Data, DataError> {
    if depth >= MAX_DEPTH {
      return Err(DataError::NestingTooDeep);
    }
    match self.read_byte()? {
      KIND_CONSTR => {
        let tag = self.read_varint()?;
        let count = self.read_varint()? as usize;
        let mut fields = Vec::with_capacity(count.min(64));
        for _ in 0..count {
          fields.push(self.read_value(depth + 1)?);
        }
        Ok(Data::Constr { tag, fields })
      }
      KIND_INT => {
        let sign = self.read_byte()?;
        if sign > 1 {
          return Err(DataError::InvalidSign(sign));
        }
        let len = self.read_varint()? as usize;
        if len > 16 {
          return Err(DataError::IntTooLarge(len));
        }
        let bytes = self.read_slice(len)?;
        if bytes.first() == Some(&0) {
          return Err(DataError::NonMinimalInt);
        }
        let mut magnitude: u128 = 0;
        for byte in bytes {
          magnitude = (magnitude << 8) | u128::from(*byte);
        }
        let value = if sign == 1 {
          if magnitude > (i128::MAX as u128) + 1 {
            return Err(DataError::IntTooLarge(len));
          }
          (magnitude as i128).wrapping_neg()
        } else {
          if magnitude > i128::MAX as u128 {
            return Err(DataError::IntTooLarge(len));
          }
          magnitude as i128
        };
        Ok(Data::Int(value))
      }
      KIND_BYTES => {
        let len = self.read_varint()? as usize;
        Ok(Data::Bytes(self.read_slice(len)?.to_vec()))
      }
      KIND_LIST => {
        let count = self.read_varint()? as usize;
        let mut items = Vec::with_capacity(count.min(64));
        for _ in 0..count {
          items.push(self.read_value(depth + 1)?);
        }
        Ok(Data::List(items))
      }
      other => Err(DataError::InvalidKind(other)),
    }
  }
}
