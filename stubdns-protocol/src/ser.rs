//! A serializer/deserializer compatible with the DNS wire format.
//!
//! Various notes about the wire format:
//!
//! - All integers are in big endian format.
//! - Names consist of a series of labels, each prefixed with a length byte.
//! - Names end with a zero byte.
//! - Names are compressed by using a pointer to a previous name.
//! - This means that we need access to the entire buffer.

use super::Error;

use core::cmp;
use core::fmt;
use core::hash;
use core::mem;
use core::str;

use memchr::Memchr;

/// The longest label that fits behind a length byte.
pub(crate) const MAX_LABEL_LEN: usize = 63;

/// The longest name, in wire bytes, including length bytes and the terminator.
pub(crate) const MAX_NAME_LEN: usize = 255;

const PTR_MASK: u8 = 0b1100_0000;

/// An object that is able to be serialized to or deserialized from a series of bytes.
pub(crate) trait Serialize<'a> {
    /// The number of bytes needed to serialize this object.
    fn serialized_len(&self) -> usize;

    /// Serialize this object into a series of bytes.
    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error>;

    /// Deserialize this object from a series of bytes.
    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error>;
}

/// A cursor into a series of bytes.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Cursor<'a> {
    /// The bytes being read.
    bytes: &'a [u8],

    /// The index into the bytes that we've read so far.
    cursor: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor from a series of bytes.
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Get the original bytes that this cursor was created from.
    pub(crate) fn original(&self) -> &'a [u8] {
        self.bytes
    }

    /// Get the absolute position of this cursor.
    pub(crate) fn position(&self) -> usize {
        self.cursor
    }

    /// Get the slice of remaining bytes.
    pub(crate) fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.cursor..).unwrap_or(&[])
    }

    /// Get the length of the slice of remaining bytes.
    pub(crate) fn len(&self) -> usize {
        self.bytes.len().saturating_sub(self.cursor)
    }

    /// Get a new cursor at the given absolute position.
    pub(crate) fn at(&self, pos: usize) -> Self {
        Self {
            bytes: self.bytes,
            cursor: pos,
        }
    }

    /// Advance the cursor by the given number of bytes.
    pub(crate) fn advance(mut self, n: usize) -> Result<Self, Error> {
        if n > self.len() {
            return Err(self.read_error(n));
        }

        self.cursor += n;
        Ok(self)
    }

    /// Split off the next `n` bytes, returning them and the advanced cursor.
    pub(crate) fn take(self, n: usize) -> Result<(&'a [u8], Self), Error> {
        let bytes = self
            .remaining()
            .get(..n)
            .ok_or_else(|| self.read_error(n))?;
        Ok((bytes, self.advance(n)?))
    }

    /// Error for when a read of `n` bytes failed.
    pub(crate) fn read_error(&self, n: usize) -> Error {
        Error::NotEnoughReadBytes {
            tried_to_read: n,
            available: self.len(),
        }
    }
}

/// Make sure that `bytes` can hold `needed` more bytes.
pub(crate) fn check_space(bytes: &[u8], needed: usize) -> Result<(), Error> {
    if bytes.len() < needed {
        return Err(Error::NotEnoughWriteSpace {
            tried_to_write: needed,
            available: bytes.len(),
        });
    }

    Ok(())
}

/// A DNS name.
///
/// A name is either borrowed from a message that was read off the wire, in which case
/// compression pointers are followed lazily, or it is built from a dotted string such
/// as `"example.com"`. Both forms compare equal when they spell the same labels.
#[derive(Clone, Copy)]
pub struct Label<'a> {
    repr: Repr<'a>,
}

/// Internal representation of a DNS name.
#[derive(Clone, Copy)]
enum Repr<'a> {
    /// The name starts at `start` in the message it was parsed from.
    ///
    /// **Invariant:** the name was fully validated when it was deserialized, so
    /// walking it again cannot fail.
    Bytes {
        /// The original buffer, in totality, that this name was parsed from.
        original: &'a [u8],

        /// The starting position of this name in the original buffer.
        start: usize,
    },

    /// The label will be the parsed version of this string.
    String {
        /// The string representation of the label.
        string: &'a str,
    },
}

impl Default for Label<'_> {
    fn default() -> Self {
        // The root name.
        Self {
            repr: Repr::String { string: "" },
        }
    }
}

impl PartialEq for Label<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.segments().eq(other.segments())
    }
}

impl Eq for Label<'_> {}

impl PartialOrd for Label<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.segments().partial_cmp(other.segments())
    }
}

impl Ord for Label<'_> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.segments().cmp(other.segments())
    }
}

impl hash::Hash for Label<'_> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for segment in self.segments() {
            segment.hash(state);
        }
    }
}

impl<'a> Label<'a> {
    /// Get an iterator over the label segments in this name.
    ///
    /// Compression pointers are resolved, so the iterator yields every string label
    /// followed by a single [`LabelSegment::Empty`] terminator.
    pub fn segments(&self) -> impl Iterator<Item = LabelSegment<'a>> {
        match self.repr {
            Repr::Bytes { .. } => Either::A(
                self.names()
                    .map(LabelSegment::String)
                    .chain(Some(LabelSegment::Empty)),
            ),
            Repr::String { string } => Either::B(parse_string(string)),
        }
    }

    /// Get an iterator over the raw labels making up this name.
    ///
    /// Labels read off the wire are not required to be UTF-8, so they are yielded as bytes.
    pub fn names(&self) -> impl Iterator<Item = &'a [u8]> {
        match self.repr {
            Repr::String { string } => {
                Either::A(parse_string(string).filter_map(|seg| seg.as_bytes()))
            }
            Repr::Bytes { original, start } => {
                Either::B(Names::new(original, start).map_while(Result::ok))
            }
        }
    }

    /// Get the number of bytes this name takes up when written without compression.
    pub fn wire_len(&self) -> usize {
        self.names()
            .map(|name| name.len() + 1)
            .fold(1, |a, b| a.saturating_add(b))
    }
}

impl<'a> From<&'a str> for Label<'a> {
    fn from(string: &'a str) -> Self {
        Self {
            repr: Repr::String { string },
        }
    }
}

impl fmt::Debug for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct LabelFmt<'a>(&'a Label<'a>);

        impl fmt::Debug for LabelFmt<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self.0, f)
            }
        }

        f.debug_tuple("Label").field(&LabelFmt(self)).finish()
    }
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.names().enumerate().try_for_each(|(i, name)| {
            if i > 0 {
                f.write_str(".")?;
            }

            write_label(f, name)
        })
    }
}

/// Write one label, escaping bytes that are not part of valid UTF-8 as `\DDD`.
fn write_label(f: &mut fmt::Formatter<'_>, mut label: &[u8]) -> fmt::Result {
    loop {
        match str::from_utf8(label) {
            Ok(text) => return f.write_str(text),
            Err(err) => {
                let (valid, rest) = label.split_at(err.valid_up_to());
                f.write_str(str::from_utf8(valid).map_err(|_| fmt::Error)?)?;

                let bad = err.error_len().unwrap_or(rest.len());
                for byte in &rest[..bad] {
                    write!(f, "\\{:03}", byte)?;
                }

                label = &rest[bad..];
            }
        }
    }
}

impl<'a> Serialize<'a> for Label<'a> {
    fn serialized_len(&self) -> usize {
        self.wire_len()
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        if let Some(name) = self.names().find(|name| name.len() > MAX_LABEL_LEN) {
            return Err(Error::LabelTooLong(name.len()));
        }

        let len = self.wire_len();
        if len > MAX_NAME_LEN {
            return Err(Error::NameTooLong(len));
        }

        // Names are always written out in full, never compressed.
        self.segments().try_fold(0, |offset, item| {
            let len = item.serialize(&mut bytes[offset..])?;
            Ok(offset + len)
        })
    }

    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        let original = cursor.original();
        let start = cursor.position();

        // Walk the whole name, pointers included, so that a bad name is rejected here
        // rather than when someone looks at it.
        let mut len = 1;
        for name in Names::new(original, start) {
            len += name?.len() + 1;
            if len > MAX_NAME_LEN {
                return Err(Error::NameTooLong(len));
            }
        }

        // Skip past the part of the name that is stored in place.
        let mut cursor = cursor;
        loop {
            let mut segment = LabelSegment::Empty;
            cursor = segment.deserialize(cursor)?;

            if !matches!(segment, LabelSegment::String(_)) {
                break;
            }
        }

        self.repr = Repr::Bytes { original, start };
        Ok(cursor)
    }
}

/// Iterator over the labels of a name stored in a message, following pointers.
///
/// Every pointer has to land before the pointer itself, and every further jump has to
/// land before all of the bytes visited so far. Each chain therefore ends after a
/// bounded number of hops.
struct Names<'a> {
    cursor: Cursor<'a>,

    /// The lowest offset that has been visited while walking this name.
    floor: usize,

    done: bool,
}

impl<'a> Names<'a> {
    fn new(original: &'a [u8], start: usize) -> Self {
        Self {
            cursor: Cursor::new(original).at(start),
            floor: start,
            done: false,
        }
    }
}

impl<'a> Iterator for Names<'a> {
    type Item = Result<&'a [u8], Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let position = self.cursor.position();
            let mut segment = LabelSegment::Empty;

            match segment.deserialize(self.cursor) {
                Ok(cursor) => self.cursor = cursor,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }

            match segment {
                LabelSegment::Empty => {
                    self.done = true;
                    return None;
                }
                LabelSegment::String(label) => return Some(Ok(label)),
                LabelSegment::Pointer(target) => {
                    let target = usize::from(target);

                    if target >= position {
                        self.done = true;
                        return Some(Err(Error::PointerOutOfBounds { target, position }));
                    }

                    if target >= self.floor {
                        self.done = true;
                        return Some(Err(Error::PointerLoop { target, position }));
                    }

                    self.floor = target;
                    self.cursor = self.cursor.at(target);
                }
            }
        }
    }
}

/// Parse a string as a DNS name.
fn parse_string(str: &str) -> impl Iterator<Item = LabelSegment<'_>> + '_ {
    let dot = Memchr::new(b'.', str.as_bytes());
    let mut last_index = 0;

    dot.chain(Some(str.len()))
        .filter_map(move |index| {
            let item = &str[last_index..index];
            last_index = index.saturating_add(1);

            if item.is_empty() {
                None
            } else {
                Some(LabelSegment::String(item.as_bytes()))
            }
        })
        .chain(Some(LabelSegment::Empty))
}

/// A DNS-compatible label segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelSegment<'a> {
    /// The empty terminator.
    Empty,

    /// A literal label, as raw bytes.
    String(&'a [u8]),

    /// A pointer to a previous name.
    Pointer(u16),
}

impl<'a> LabelSegment<'a> {
    fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for LabelSegment<'_> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<'a> Serialize<'a> for LabelSegment<'a> {
    fn serialized_len(&self) -> usize {
        match self {
            Self::Empty => 1,
            Self::Pointer(_) => 2,
            Self::String(s) => 1 + s.len(),
        }
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        check_space(bytes, self.serialized_len())?;

        match self {
            Self::Empty => {
                bytes[0] = 0;
                Ok(1)
            }
            Self::Pointer(ptr) => {
                // Apply the pointer mask to the first byte.
                let [mut b1, b2] = ptr.to_be_bytes();
                b1 |= PTR_MASK;
                bytes[0] = b1;
                bytes[1] = b2;
                Ok(2)
            }
            Self::String(s) => {
                let len = s.len();

                if len > MAX_LABEL_LEN {
                    return Err(Error::LabelTooLong(len));
                }

                bytes[0] = len as u8;
                bytes[1..=len].copy_from_slice(s);
                Ok(len + 1)
            }
        }
    }

    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        // The type is determined by the top two bits of the first byte.
        let b1 = *cursor
            .remaining()
            .first()
            .ok_or_else(|| cursor.read_error(1))?;

        match b1 & PTR_MASK {
            0 if b1 == 0 => {
                *self = Self::Empty;
                cursor.advance(1)
            }
            0 => {
                // A length byte followed by that many bytes of label.
                let (bytes, cursor) = cursor.take(1 + b1 as usize)?;
                *self = Self::String(&bytes[1..]);
                Ok(cursor)
            }
            PTR_MASK => {
                let (bytes, cursor) = cursor.take(2)?;
                let ptr = u16::from_be_bytes([bytes[0] & !PTR_MASK, bytes[1]]);
                *self = Self::Pointer(ptr);
                Ok(cursor)
            }
            _ => Err(Error::InvalidLabelType(b1)),
        }
    }
}

macro_rules! serialize_num {
    ($($num_ty: ident),*) => {
        $(
            impl<'a> Serialize<'a> for $num_ty {
                fn serialized_len(&self) -> usize {
                    mem::size_of::<$num_ty>()
                }

                fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
                    check_space(bytes, mem::size_of::<$num_ty>())?;

                    let value = (*self).to_be_bytes();
                    bytes[..mem::size_of::<$num_ty>()].copy_from_slice(&value);

                    Ok(mem::size_of::<$num_ty>())
                }

                fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
                    let (bytes, cursor) = cursor.take(mem::size_of::<$num_ty>())?;

                    let mut value = [0; mem::size_of::<$num_ty>()];
                    value.copy_from_slice(bytes);
                    *self = $num_ty::from_be_bytes(value);

                    Ok(cursor)
                }
            }
        )*
    }
}

serialize_num! {
    u8, u16, u32
}

/// One iterator or another.
enum Either<A, B> {
    A(A),
    B(B),
}

impl<A: Iterator, Other: Iterator<Item = A::Item>> Iterator for Either<A, Other> {
    type Item = A::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Either::A(a) => a.next(),
            Either::B(b) => b.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Either::A(a) => a.size_hint(),
            Either::B(b) => b.size_hint(),
        }
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        Self: Sized,
        F: FnMut(B, Self::Item) -> B,
    {
        match self {
            Either::A(a) => a.fold(init, f),
            Either::B(b) => b.fold(init, f),
        }
    }
}
