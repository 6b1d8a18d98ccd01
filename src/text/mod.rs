// SPDX-License-Identifier: MPL-2.0

mod codec;
mod spans;

pub use codec::{decode_entities, encode_for_url};
pub use spans::{annotate, Span};
