// SPDX-License-Identifier: MPL-2.0

mod parser;
mod types;

pub use parser::parse_timeline;
pub use types::{Credentials, StatusRecord};
