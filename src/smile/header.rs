// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Smile constants: header, token bytes, limits, and generator features.
//!
//! The header is four bytes: the `:)\n` signature and a flags byte whose low
//! nibble tells the decoder which optional encodings to expect. Once the
//! header is out, the declarations are final. Toggling a feature later can
//! change what the generator does, but not what the header promised.

// ============================================================================
// HEADER
// ============================================================================

/// Signature bytes: ":)\n"
pub const SIGNATURE: [u8; 3] = [0x3A, 0x29, 0x0A];

/// Format version, stored in the high nibble of the flags byte
pub const VERSION: u8 = 0;

pub const HEADER_SHARED_NAMES: u8 = 0b0000_0001;
pub const HEADER_SHARED_STRING_VALUES: u8 = 0b0000_0010;
pub const HEADER_RAW_BINARY: u8 = 0b0000_0100;

// ============================================================================
// VALUE TOKENS
// ============================================================================

pub const TOKEN_EMPTY_STRING: u8 = 0x20;
pub const TOKEN_NULL: u8 = 0x21;
pub const TOKEN_FALSE: u8 = 0x22;
pub const TOKEN_TRUE: u8 = 0x23;
pub const TOKEN_INT32: u8 = 0x24;
pub const TOKEN_INT64: u8 = 0x25;
pub const TOKEN_BIG_INTEGER: u8 = 0x26;
pub const TOKEN_FLOAT32: u8 = 0x28;
pub const TOKEN_FLOAT64: u8 = 0x29;
pub const TOKEN_BIG_DECIMAL: u8 = 0x2A;

/// Tiny ASCII string, 1-32 bytes
pub const TOKEN_TINY_ASCII: u8 = 0x40;
/// Short ASCII string, 33-64 bytes
pub const TOKEN_SHORT_ASCII: u8 = 0x60;
/// Tiny Unicode string, 2-33 bytes
pub const TOKEN_TINY_UNICODE: u8 = 0x80;
/// Short Unicode string, 34-65 bytes
pub const TOKEN_SHORT_UNICODE: u8 = 0xA0;
/// Small int, zigzag -16..=15 in the low 5 bits
pub const TOKEN_SMALL_INT: u8 = 0xC0;

pub const TOKEN_LONG_ASCII: u8 = 0xE0;
pub const TOKEN_LONG_UNICODE: u8 = 0xE4;
pub const TOKEN_BINARY_7BIT: u8 = 0xE8;
/// Long shared string reference, index in low 2 bits + next byte
pub const TOKEN_SHARED_STRING_LONG: u8 = 0xEC;

pub const TOKEN_START_ARRAY: u8 = 0xF8;
pub const TOKEN_END_ARRAY: u8 = 0xF9;
pub const TOKEN_START_OBJECT: u8 = 0xFA;
pub const TOKEN_END_OBJECT: u8 = 0xFB;
/// Terminates long strings
pub const BYTE_END_OF_STRING: u8 = 0xFC;
pub const TOKEN_RAW_BINARY: u8 = 0xFD;
pub const BYTE_END_OF_CONTENT: u8 = 0xFF;

// ============================================================================
// LIMITS
// ============================================================================

pub const MAX_TINY_ASCII: usize = 32;
pub const MAX_SHORT_ASCII: usize = 64;
pub const MAX_TINY_UNICODE: usize = 33;
pub const MAX_SHORT_UNICODE: usize = 65;

/// Strings longer than this are never shared
pub const MAX_SHARED_STRING_LENGTH_BYTES: usize = 64;

/// Back-reference table size (10-bit index)
pub const MAX_SHARED_STRING_VALUES: usize = 1024;

/// Indexes below this fit in a single token byte (0x01..=0x1F)
pub const SHORT_SHARED_REF_LIMIT: usize = 31;

// ============================================================================
// FEATURES
// ============================================================================

/// Boolean generator options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Write the 4-byte header when the generator is created
    WriteHeader,
    /// Write 0xFF when the generator is closed
    WriteEndMarker,
    /// Encode binary values with 7 bits per byte instead of raw
    EncodeBinaryAs7Bit,
    /// Declare shared property names in the header
    CheckSharedNames,
    /// Back-reference repeated short string values
    CheckSharedStringValues,
    /// Replace invalid UTF-8 instead of rejecting it
    LenientUtfEncoding,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::WriteHeader,
        Feature::WriteEndMarker,
        Feature::EncodeBinaryAs7Bit,
        Feature::CheckSharedNames,
        Feature::CheckSharedStringValues,
        Feature::LenientUtfEncoding,
    ];

    pub const fn enabled_by_default(self) -> bool {
        match self {
            Feature::WriteHeader | Feature::EncodeBinaryAs7Bit | Feature::CheckSharedNames => true,
            Feature::WriteEndMarker
            | Feature::CheckSharedStringValues
            | Feature::LenientUtfEncoding => false,
        }
    }

    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Set of enabled features, one bit per `Feature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags(u8);

impl FeatureFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        self.set(feature, enabled);
        self
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        if enabled {
            self.0 |= feature.mask();
        } else {
            self.0 &= !feature.mask();
        }
    }

    pub fn contains(self, feature: Feature) -> bool {
        self.0 & feature.mask() != 0
    }

    /// The flags byte a header written with these features carries.
    pub fn header_byte(self) -> u8 {
        let mut byte = VERSION << 4;
        if self.contains(Feature::CheckSharedNames) {
            byte |= HEADER_SHARED_NAMES;
        }
        if self.contains(Feature::CheckSharedStringValues) {
            byte |= HEADER_SHARED_STRING_VALUES;
        }
        if !self.contains(Feature::EncodeBinaryAs7Bit) {
            byte |= HEADER_RAW_BINARY;
        }
        byte
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Feature::ALL
            .iter()
            .fold(Self::empty(), |flags, &f| flags.with(f, f.enabled_by_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header_byte() {
        // Shared names on, 7-bit binary on, shared values off
        assert_eq!(FeatureFlags::default().header_byte(), HEADER_SHARED_NAMES);
    }

    #[test]
    fn test_header_byte_reflects_every_declaration() {
        let flags = FeatureFlags::empty()
            .with(Feature::CheckSharedNames, true)
            .with(Feature::CheckSharedStringValues, true);
        assert_eq!(flags.header_byte(), 0b0000_0111);
    }

    #[test]
    fn test_masks_are_distinct() {
        let combined = Feature::ALL.iter().fold(0u8, |acc, f| {
            assert_eq!(acc & f.mask(), 0);
            acc | f.mask()
        });
        assert_eq!(combined.count_ones() as usize, Feature::ALL.len());
    }
}
