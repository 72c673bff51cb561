//! The wire format for DNS A-record lookups, [sans I/O].
//!
//! [sans I/O]: https://sans-io.readthedocs.io/
//!
//! This crate encodes a query for the IPv4 addresses of a name and decodes the reply a
//! nameserver sends back, including names that were shortened with compression pointers.
//! It does no I/O of its own: the caller moves the bytes over UDP (see the `stubdns`
//! crate) or whatever other transport it likes.
//!
//! The crate is `no_std` and only needs `alloc` for the record lists of a decoded
//! message. Every read is bounds-checked, so malformed or hostile input produces an
//! [`Error`] rather than a panic.
//!
//! This crate is also `#![forbid(unsafe_code)]`, and is intended to remain so.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use stubdns_protocol::{Message, RecordData};
//! use std::net::UdpSocket;
//!
//! // Encode a query for the A records of example.com.
//! let query = Message::query(0x42, "example.com");
//! let bytes = query.to_vec()?;
//!
//! // Write the query to the socket.
//! let socket = UdpSocket::bind("0.0.0.0:0")?;
//! socket.send_to(&bytes, "1.2.3.4:53")?;
//!
//! // Read the reply and parse it.
//! let mut buf = [0; 512];
//! let len = socket.recv(&mut buf)?;
//! let message = Message::read(&buf[..len])?;
//!
//! for answer in message.answers() {
//!     if let RecordData::A(ip) = answer.data() {
//!         println!("{} has address {}", answer.name(), ip);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `std` (enabled by default) - Enables the `std` library for use in `Error` types.
//!   Disable this feature to use on `no_std` targets.

#![forbid(
    unsafe_code,
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    future_incompatible
)]
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

use alloc::vec;
use alloc::vec::Vec;

use core::convert::{TryFrom, TryInto};
use core::fmt;
use core::iter;
use core::mem;
use core::net::Ipv4Addr;

#[cfg(feature = "std")]
use std::error::Error as StdError;

mod ser;
use ser::{check_space, Cursor, Serialize};
pub use ser::{Label, LabelSegment};

/// The `IN` (Internet) class.
pub const CLASS_IN: u16 = 1;

/// Macro to implement `Serialize` for a struct.
macro_rules! serialize {
    (
        $(#[$outer:meta])*
        pub struct $name:ident $(<$lt: lifetime>)? {
            $(
                $(#[$inner:meta])*
                $vis: vis $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[$outer])*
        pub struct $name $(<$lt>)? {
            $(
                $(#[$inner])*
                $vis $field: $ty,
            )*
        }

        impl<'a> Serialize<'a> for $name $(<$lt>)? {
            fn serialized_len(&self) -> usize {
                let mut len = 0;
                $(
                    len += self.$field.serialized_len();
                )*
                len
            }

            fn serialize(&self, cursor: &mut [u8]) -> Result<usize, Error> {
                let mut index = 0;
                $(
                    index += self.$field.serialize(&mut cursor[index..])?;
                )*
                Ok(index)
            }

            fn deserialize(&mut self, mut cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
                $(
                    cursor = self.$field.deserialize(cursor)?;
                )*
                Ok(cursor)
            }
        }
    };
}

/// A `u16` code table with conversions to and from the raw number.
macro_rules! num_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$inner:meta])*
                $variant:ident = $value:expr,
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        // New codes may be added in the future.
        #[non_exhaustive]
        pub enum $name {
            $(
                $(#[$inner])*
                $variant = $value,
            )*
        }

        impl TryFrom<u16> for $name {
            type Error = InvalidCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $(
                        $value => Ok($name::$variant),
                    )*
                    _ => Err(InvalidCode(value)),
                }
            }
        }

        impl From<$name> for u16 {
            fn from(value: $name) -> Self {
                value as u16
            }
        }

        impl<'a> Serialize<'a> for $name {
            fn serialized_len(&self) -> usize {
                mem::size_of::<u16>()
            }

            fn serialize(&self, cursor: &mut [u8]) -> Result<usize, Error> {
                let value: u16 = (*self).into();
                value.serialize(cursor)
            }

            fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
                let mut value = 0;
                let cursor = value.deserialize(cursor)?;
                *self = value.try_into()?;
                Ok(cursor)
            }
        }
    };
}

/// An error that may occur while encoding or decoding a DNS message.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The output buffer is too small for the message.
    NotEnoughWriteSpace {
        /// The bytes the write needed.
        tried_to_write: usize,

        /// The bytes left in the buffer.
        available: usize,
    },

    /// The message ended in the middle of a header, name, field or record.
    ///
    /// On a datagram this means the message was cut short.
    NotEnoughReadBytes {
        /// The bytes the read needed.
        tried_to_read: usize,

        /// The bytes left in the message.
        available: usize,
    },

    /// A label was longer than 63 bytes.
    LabelTooLong(usize),

    /// A name was longer than 255 bytes on the wire.
    NameTooLong(usize),

    /// A label started with one of the reserved `01` or `10` bit patterns.
    InvalidLabelType(u8),

    /// A compression pointer pointed at or past its own position, outside of the part of the
    /// message read so far.
    PointerOutOfBounds {
        /// The offset the pointer targets.
        target: usize,

        /// The offset of the pointer itself.
        position: usize,
    },

    /// A compression pointer did not move strictly backwards from the bytes already visited
    /// for this name, so following it could loop forever.
    PointerLoop {
        /// The offset the pointer targets.
        target: usize,

        /// The offset of the pointer itself.
        position: usize,
    },

    /// The data of a record does not fit its type.
    InvalidRecordData {
        /// The record type.
        ty: u16,

        /// The length of the data.
        len: usize,
    },

    /// A section holds more records than its 16-bit count can describe.
    TooManyRecords(usize),

    /// A raw number is not one of the known codes.
    InvalidCode(InvalidCode),
}

impl Error {
    /// Whether this error means the message ended before a complete value could be read.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::NotEnoughReadBytes { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotEnoughWriteSpace {
                tried_to_write,
                available,
            } => {
                write!(
                    f,
                    "buffer too small: {} bytes needed, {} available",
                    tried_to_write, available
                )
            }
            Error::NotEnoughReadBytes {
                tried_to_read,
                available,
            } => {
                write!(
                    f,
                    "message cut short: {} bytes needed, {} left",
                    tried_to_read, available
                )
            }
            Error::LabelTooLong(len) => {
                write!(f, "label too long: label was {} bytes long", len)
            }
            Error::NameTooLong(len) => {
                write!(f, "name too long: name was {} bytes long", len)
            }
            Error::InvalidLabelType(byte) => {
                write!(f, "invalid label type: {:#04x}", byte)
            }
            Error::PointerOutOfBounds { target, position } => {
                write!(
                    f,
                    "compression pointer at offset {} points forward to offset {}",
                    position, target
                )
            }
            Error::PointerLoop { target, position } => {
                write!(
                    f,
                    "compression pointer at offset {} to offset {} forms a loop",
                    position, target
                )
            }
            Error::InvalidRecordData { ty, len } => {
                write!(f, "invalid data for record type {}: {} bytes", ty, len)
            }
            Error::TooManyRecords(count) => {
                write!(f, "too many records: {} records", count)
            }
            Error::InvalidCode(err) => {
                write!(f, "{}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::InvalidCode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidCode> for Error {
    fn from(err: InvalidCode) -> Self {
        Error::InvalidCode(err)
    }
}

/// Encode a standard query for the A records of `name`.
///
/// This is shorthand for [`Message::query`] followed by [`Message::to_vec`].
pub fn encode_query(id: u16, name: &str) -> Result<Vec<u8>, Error> {
    Message::query(id, name).to_vec()
}

/// Decode a response message.
///
/// This is shorthand for [`Message::read`].
pub fn decode_response(bytes: &[u8]) -> Result<Message<'_>, Error> {
    Message::read(bytes)
}

/// A DNS message.
///
/// Only the question and answer sections are represented. When a message is read, the
/// authority and additional counts are kept in the header, but those records are not parsed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Message<'a> {
    /// The header of the message.
    header: Header,

    /// The questions in the message.
    questions: Vec<Question<'a>>,

    /// The answers in the message.
    answers: Vec<ResourceRecord<'a>>,
}

impl<'a> Message<'a> {
    /// Create a new message from its questions and answers.
    pub fn new(
        id: u16,
        flags: Flags,
        questions: Vec<Question<'a>>,
        answers: Vec<ResourceRecord<'a>>,
    ) -> Self {
        Self {
            header: Header {
                id,
                flags,
                question_count: questions.len().try_into().unwrap_or(u16::MAX),
                answer_count: answers.len().try_into().unwrap_or(u16::MAX),
                authority_count: 0,
                additional_count: 0,
            },
            questions,
            answers,
        }
    }

    /// Create a recursive query for the A records of `name`.
    pub fn query(id: u16, name: &'a str) -> Self {
        Self::new(
            id,
            Flags::standard_query(),
            vec![Question::new(name, ResourceType::A, CLASS_IN)],
            Vec::new(),
        )
    }

    /// Get the ID of this message.
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Get the header of this message.
    pub fn header(&self) -> Header {
        self.header
    }

    /// Get the flags for this message.
    pub fn flags(&self) -> Flags {
        self.header.flags
    }

    /// Get a mutable reference to the flags for this message.
    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.header.flags
    }

    /// Get the questions in this message.
    pub fn questions(&self) -> &[Question<'a>] {
        &self.questions
    }

    /// Get the first question in this message.
    ///
    /// A response echoes the single question of the query it answers.
    pub fn question(&self) -> Option<&Question<'a>> {
        self.questions.first()
    }

    /// Get the answers in this message.
    pub fn answers(&self) -> &[ResourceRecord<'a>] {
        &self.answers
    }

    /// Get the IPv4 addresses of the A records in the answer section, in order.
    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.answers.iter().filter_map(ResourceRecord::address)
    }

    /// Get the buffer space needed to serialize this message.
    pub fn space_needed(&self) -> usize {
        self.serialized_len()
    }

    /// Write this message to a buffer.
    ///
    /// Returns the number of bytes written. Names are written without compression.
    ///
    /// # Errors
    ///
    /// - [`Error::NotEnoughWriteSpace`] if the buffer holds fewer than [`space_needed`] bytes.
    /// - [`Error::LabelTooLong`] or [`Error::NameTooLong`] if a name can't be encoded.
    /// - [`Error::TooManyRecords`] if a section doesn't fit in its 16-bit count.
    ///
    /// [`space_needed`]: Message::space_needed
    pub fn write(&self, buffer: &mut [u8]) -> Result<usize, Error> {
        check_space(buffer, self.space_needed())?;
        self.serialize(buffer)
    }

    /// Write this message to a new vector.
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        let mut buffer = vec![0; self.space_needed()];
        let len = self.write(&mut buffer)?;
        buffer.truncate(len);
        Ok(buffer)
    }

    /// Read a message from a buffer.
    ///
    /// # Errors
    ///
    /// This function may raise one of the following errors:
    ///
    /// - [`Error::NotEnoughReadBytes`] if the message ends before a header, name, field or
    ///   record data is complete.
    /// - [`Error::PointerOutOfBounds`] or [`Error::PointerLoop`] if a compression pointer is
    ///   malformed.
    /// - [`Error::InvalidLabelType`] or [`Error::NameTooLong`] if a name is malformed.
    /// - [`Error::InvalidRecordData`] if an A record doesn't carry exactly four bytes.
    ///
    /// Labels are taken as raw bytes, and record types that aren't known are kept as raw codes.
    pub fn read(buffer: &'a [u8]) -> Result<Message<'a>, Error> {
        let mut message = Message::default();
        message.deserialize(Cursor::new(buffer))?;
        Ok(message)
    }
}

impl<'a> Serialize<'a> for Message<'a> {
    fn serialized_len(&self) -> usize {
        iter::once(self.header.serialized_len())
            .chain(self.questions.iter().map(Serialize::serialized_len))
            .chain(self.answers.iter().map(Serialize::serialized_len))
            .fold(0, |a, b| a.saturating_add(b))
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        fn count(len: usize) -> Result<u16, Error> {
            len.try_into().map_err(|_| Error::TooManyRecords(len))
        }

        // The counts always describe what is actually written.
        let header = Header {
            question_count: count(self.questions.len())?,
            answer_count: count(self.answers.len())?,
            authority_count: 0,
            additional_count: 0,
            ..self.header
        };

        let mut offset = header.serialize(bytes)?;
        for question in self.questions.iter() {
            offset += question.serialize(&mut bytes[offset..])?;
        }
        for answer in self.answers.iter() {
            offset += answer.serialize(&mut bytes[offset..])?;
        }
        Ok(offset)
    }

    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        /// Read a set of `T`, bounded by `count`.
        fn read_set<'a, T: Serialize<'a> + Default>(
            mut cursor: Cursor<'a>,
            count: u16,
            min_len: usize,
        ) -> Result<(Vec<T>, Cursor<'a>), Error> {
            // Don't trust the count further than the bytes we have.
            let mut items = Vec::with_capacity(usize::from(count).min(cursor.len() / min_len));

            for _ in 0..count {
                let mut item = T::default();
                cursor = item.deserialize(cursor)?;
                items.push(item);
            }

            Ok((items, cursor))
        }

        let cursor = self.header.deserialize(cursor)?;

        let (questions, cursor) = read_set(cursor, self.header.question_count, 5)?;
        let (answers, cursor) = read_set(cursor, self.header.answer_count, 11)?;

        // The authority and additional sections are left unread.
        self.questions = questions;
        self.answers = answers;

        Ok(cursor)
    }
}

serialize! {
    /// The header for a DNS message.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Header {
        /// The ID of this message.
        id: u16,

        /// The flags associated with this message.
        flags: Flags,

        /// The number of questions in this message.
        question_count: u16,

        /// The number of answers in this message.
        answer_count: u16,

        /// The number of authorities in this message.
        authority_count: u16,

        /// The number of additional records in this message.
        additional_count: u16,
    }
}

impl Header {
    /// Read only the header from the start of a message.
    ///
    /// This is cheap and can be used to match a reply to its query before decoding the rest.
    pub fn read(buffer: &[u8]) -> Result<Header, Error> {
        let mut header = Header::default();
        header.deserialize(Cursor::new(buffer))?;
        Ok(header)
    }

    /// Get the ID of this message.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Get the flags of this message.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Get the number of questions.
    pub fn question_count(&self) -> u16 {
        self.question_count
    }

    /// Get the number of answers.
    pub fn answer_count(&self) -> u16 {
        self.answer_count
    }

    /// Get the number of authority records.
    pub fn authority_count(&self) -> u16 {
        self.authority_count
    }

    /// Get the number of additional records.
    pub fn additional_count(&self) -> u16 {
        self.additional_count
    }
}

serialize! {
    /// The question in a DNS message.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Question<'a> {
        /// The name of the question.
        name: Label<'a>,

        /// The raw type of the question.
        ty: u16,

        /// The class of the question.
        class: u16,
    }
}

impl<'a> Question<'a> {
    /// Create a new question.
    pub fn new(label: impl Into<Label<'a>>, ty: ResourceType, class: u16) -> Self {
        Self {
            name: label.into(),
            ty: ty.into(),
            class,
        }
    }

    /// Get the name of the question.
    pub fn name(&self) -> Label<'a> {
        self.name
    }

    /// Get the raw type code of the question.
    pub fn ty(&self) -> u16 {
        self.ty
    }

    /// Get the type of the question, if it is a known one.
    pub fn record_type(&self) -> Result<ResourceType, InvalidCode> {
        self.ty.try_into()
    }

    /// Get the class of the question.
    pub fn class(&self) -> u16 {
        self.class
    }
}

/// A resource record in a DNS message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceRecord<'a> {
    /// The name of the resource record.
    name: Label<'a>,

    /// The raw type of the resource record.
    ty: u16,

    /// The class of the resource record.
    class: u16,

    /// The time-to-live of the resource record, in seconds.
    ttl: u32,

    /// The data of the resource record, interpreted according to `ty`.
    data: RecordData<'a>,
}

impl<'a> ResourceRecord<'a> {
    /// Create a new `ResourceRecord` from raw record data.
    ///
    /// The data is interpreted according to `ty`, so this fails for an A record whose data
    /// isn't four bytes long.
    pub fn new(
        name: impl Into<Label<'a>>,
        ty: u16,
        class: u16,
        ttl: u32,
        data: &'a [u8],
    ) -> Result<Self, Error> {
        Ok(Self {
            name: name.into(),
            ty,
            class,
            ttl,
            data: RecordData::parse(ty, data)?,
        })
    }

    /// Create an `IN` class A record.
    pub fn a(name: impl Into<Label<'a>>, ttl: u32, address: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            ty: ResourceType::A.into(),
            class: CLASS_IN,
            ttl,
            data: RecordData::A(address),
        }
    }

    /// Get the name of the resource record.
    pub fn name(&self) -> Label<'a> {
        self.name
    }

    /// Get the raw type code of the resource record.
    pub fn ty(&self) -> u16 {
        self.ty
    }

    /// Get the type of the resource record, if it is a known one.
    pub fn record_type(&self) -> Result<ResourceType, InvalidCode> {
        self.ty.try_into()
    }

    /// Get the class of the resource record.
    pub fn class(&self) -> u16 {
        self.class
    }

    /// Get the time-to-live of the resource record.
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Get the data of the resource record.
    pub fn data(&self) -> RecordData<'a> {
        self.data
    }

    /// Get the IPv4 address, if this is an A record.
    pub fn address(&self) -> Option<Ipv4Addr> {
        match self.data {
            RecordData::A(address) => Some(address),
            RecordData::Opaque(_) => None,
        }
    }
}

impl<'a> Serialize<'a> for ResourceRecord<'a> {
    fn serialized_len(&self) -> usize {
        self.name.serialized_len() + 10 + self.data.len()
    }

    fn serialize(&self, bytes: &mut [u8]) -> Result<usize, Error> {
        let mut index = self.name.serialize(bytes)?;
        index += self.ty.serialize(&mut bytes[index..])?;
        index += self.class.serialize(&mut bytes[index..])?;
        index += self.ttl.serialize(&mut bytes[index..])?;

        let len = self.data.len();
        let rdlength = u16::try_from(len).map_err(|_| Error::InvalidRecordData {
            ty: self.ty,
            len,
        })?;
        index += rdlength.serialize(&mut bytes[index..])?;

        let bytes = &mut bytes[index..];
        check_space(bytes, len)?;
        match self.data {
            RecordData::A(address) => bytes[..len].copy_from_slice(&address.octets()),
            RecordData::Opaque(data) => bytes[..len].copy_from_slice(data),
        }

        Ok(index + len)
    }

    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        let cursor = self.name.deserialize(cursor)?;
        let cursor = self.ty.deserialize(cursor)?;
        let cursor = self.class.deserialize(cursor)?;
        let cursor = self.ttl.deserialize(cursor)?;

        let mut len = 0u16;
        let cursor = len.deserialize(cursor)?;
        let (data, cursor) = cursor.take(len.into())?;

        self.data = RecordData::parse(self.ty, data)?;
        Ok(cursor)
    }
}

/// The data carried by a resource record.
///
/// Only A records are interpreted. The data of every other type is kept as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordData<'a> {
    /// The IPv4 address of an A record.
    A(Ipv4Addr),

    /// The uninterpreted data of any other record type.
    Opaque(&'a [u8]),
}

impl<'a> RecordData<'a> {
    /// Interpret `data` as the data of a record of type `ty`.
    pub fn parse(ty: u16, data: &'a [u8]) -> Result<Self, Error> {
        if ty == u16::from(ResourceType::A) {
            let octets: [u8; 4] = data.try_into().map_err(|_| Error::InvalidRecordData {
                ty,
                len: data.len(),
            })?;
            return Ok(RecordData::A(octets.into()));
        }

        Ok(RecordData::Opaque(data))
    }

    /// Get the length of the data on the wire.
    pub fn len(&self) -> usize {
        match self {
            RecordData::A(_) => 4,
            RecordData::Opaque(data) => data.len(),
        }
    }

    /// Whether there is no data at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordData<'_> {
    fn default() -> Self {
        RecordData::Opaque(&[])
    }
}

/// The flags associated with a DNS message.
#[derive(Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Flags(u16);

impl Flags {
    // Values used to manipulate the inside.
    const RAW_QR: u16 = 1 << 15;
    const RAW_OPCODE_SHIFT: u16 = 11;
    const RAW_OPCODE_MASK: u16 = 0b1111;
    const RAW_AA: u16 = 1 << 10;
    const RAW_TC: u16 = 1 << 9;
    const RAW_RD: u16 = 1 << 8;
    const RAW_RA: u16 = 1 << 7;
    const RAW_RCODE_SHIFT: u16 = 0;
    const RAW_RCODE_MASK: u16 = 0b1111;

    /// Create a new, empty set of flags.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Use the standard set of flags for a DNS query.
    ///
    /// This is identical to `new()` but uses recursive querying.
    pub const fn standard_query() -> Self {
        Self(Self::RAW_RD)
    }

    /// Create flags from their raw value.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Get the query/response flag.
    pub fn qr(&self) -> MessageType {
        if self.0 & Self::RAW_QR != 0 {
            MessageType::Reply
        } else {
            MessageType::Query
        }
    }

    /// Set the message's query/response flag.
    pub fn set_qr(&mut self, qr: MessageType) -> &mut Self {
        self.set_bit(Self::RAW_QR, qr == MessageType::Reply)
    }

    /// Get the opcode.
    pub fn opcode(&self) -> Result<Opcode, InvalidCode> {
        ((self.0 >> Self::RAW_OPCODE_SHIFT) & Self::RAW_OPCODE_MASK).try_into()
    }

    /// Set the opcode.
    pub fn set_opcode(&mut self, opcode: Opcode) -> &mut Self {
        self.set_field(Self::RAW_OPCODE_SHIFT, Self::RAW_OPCODE_MASK, opcode.into())
    }

    /// Get whether this message is authoritative.
    pub fn authoritative(&self) -> bool {
        self.0 & Self::RAW_AA != 0
    }

    /// Set whether this message is authoritative.
    pub fn set_authoritative(&mut self, authoritative: bool) -> &mut Self {
        self.set_bit(Self::RAW_AA, authoritative)
    }

    /// Get whether this message is truncated.
    pub fn truncated(&self) -> bool {
        self.0 & Self::RAW_TC != 0
    }

    /// Set whether this message is truncated.
    pub fn set_truncated(&mut self, truncated: bool) -> &mut Self {
        self.set_bit(Self::RAW_TC, truncated)
    }

    /// Get whether recursion is desired.
    pub fn recursive(&self) -> bool {
        self.0 & Self::RAW_RD != 0
    }

    /// Set whether recursion is desired.
    pub fn set_recursive(&mut self, recursive: bool) -> &mut Self {
        self.set_bit(Self::RAW_RD, recursive)
    }

    /// Get whether recursion is available for this message.
    pub fn recursion_available(&self) -> bool {
        self.0 & Self::RAW_RA != 0
    }

    /// Set whether recursion is available for this message.
    pub fn set_recursion_available(&mut self, recursion_available: bool) -> &mut Self {
        self.set_bit(Self::RAW_RA, recursion_available)
    }

    /// Get the response code.
    pub fn response_code(&self) -> Result<ResponseCode, InvalidCode> {
        ((self.0 >> Self::RAW_RCODE_SHIFT) & Self::RAW_RCODE_MASK).try_into()
    }

    /// Set the response code.
    ///
    /// Only the low four bits of the code fit in the header.
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.set_field(
            Self::RAW_RCODE_SHIFT,
            Self::RAW_RCODE_MASK,
            response_code.into(),
        )
    }

    /// Get the raw value of these flags.
    pub fn raw(self) -> u16 {
        self.0
    }

    fn set_bit(&mut self, bit: u16, value: bool) -> &mut Self {
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }

        self
    }

    fn set_field(&mut self, shift: u16, mask: u16, value: u16) -> &mut Self {
        self.0 = (self.0 & !(mask << shift)) | ((value & mask) << shift);
        self
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();

        list.entry(&self.qr());
        match self.opcode() {
            Ok(opcode) => list.entry(&opcode),
            Err(err) => list.entry(&err),
        };

        if self.authoritative() {
            list.entry(&"authoritative");
        }

        if self.truncated() {
            list.entry(&"truncated");
        }

        if self.recursive() {
            list.entry(&"recursive");
        }

        if self.recursion_available() {
            list.entry(&"recursion available");
        }

        match self.response_code() {
            Ok(code) => list.entry(&code),
            Err(err) => list.entry(&err),
        };

        list.finish()
    }
}

impl<'a> Serialize<'a> for Flags {
    fn serialized_len(&self) -> usize {
        2
    }

    fn serialize(&self, buf: &mut [u8]) -> Result<usize, Error> {
        self.0.serialize(buf)
    }

    fn deserialize(&mut self, bytes: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        u16::deserialize(&mut self.0, bytes)
    }
}

/// Whether a message is a query or a reply.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageType {
    /// The message is a query.
    Query,

    /// The message is a reply.
    Reply,
}

num_enum! {
    /// The operation code for the query.
    pub enum Opcode {
        /// A standard query.
        Query = 0,

        /// A reverse query.
        IQuery = 1,

        /// A server status request.
        Status = 2,
    }
}

num_enum! {
    /// The response code for a query.
    pub enum ResponseCode {
        /// There was no error in the query.
        NoError = 0,

        /// The query was malformed.
        FormatError = 1,

        /// The server failed to fulfill the query.
        ServerFailure = 2,

        /// The name does not exist.
        NameError = 3,

        /// The query is not implemented.
        NotImplemented = 4,

        /// The server refuses to answer.
        Refused = 5,
    }
}

num_enum! {
    /// Well-known resource record types.
    ///
    /// Only [`ResourceType::A`] records have their data interpreted.
    pub enum ResourceType {
        /// The host's IPv4 address.
        A = 1,

        /// The authoritative name servers for a domain.
        NS = 2,

        /// The canonical name for an alias.
        CName = 5,

        /// The start of authority record for a zone.
        Soa = 6,

        /// A domain name pointer.
        Ptr = 12,

        /// The mail exchange for a domain.
        MX = 15,

        /// Text strings.
        Txt = 16,

        /// The host's IPv6 address.
        AAAA = 28,

        /// The server selection for a service.
        Srv = 33,

        /// The EDNS pseudo-record.
        Opt = 41,

        /// The HTTP service binding for a domain.
        Https = 65,

        /// Any records.
        Wildcard = 255,
    }
}

impl Default for ResourceType {
    fn default() -> Self {
        Self::A
    }
}

/// The given value is not a valid code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCode(u16);

impl InvalidCode {
    /// Get the invalid code.
    pub fn code(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for InvalidCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid code: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl StdError for InvalidCode {}
