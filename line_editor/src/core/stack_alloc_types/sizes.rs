// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Stack allocation sizes for the small collections that the editor creates on every
//! keystroke (key sequences, widget names, candidate lists for a single word). Smaller
//! is better here; anything that outgrows these sizes spills onto the heap.

use smallstr::SmallString;
use smallvec::SmallVec;

// PERF: Most widget names and status messages fit in 32 bytes.
pub const DEFAULT_STRING_STORAGE_SIZE: usize = 32;

/// Stack allocated string storage for small strings. When this gets larger than
/// [`DEFAULT_STRING_STORAGE_SIZE`], it will be [`smallvec::SmallVec::spilled`] on the
/// heap.
pub type InlineString = SmallString<[u8; DEFAULT_STRING_STORAGE_SIZE]>;

/// Key sequences are short: a control char, an escape prefix, or a CSI sequence.
pub const DEFAULT_KEY_SEQUENCE_SIZE: usize = 8;

/// Storage for the characters of one key sequence.
pub type KeySequence = SmallString<[u8; DEFAULT_KEY_SEQUENCE_SIZE]>;

/// Stack allocated list, that can [`smallvec::SmallVec::spilled`] into the heap if it
/// gets larger than [`INLINE_VEC_SIZE`].
pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;
pub const INLINE_VEC_SIZE: usize = 8;
