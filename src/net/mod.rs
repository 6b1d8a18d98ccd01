// SPDX-License-Identifier: MPL-2.0

mod fetcher;

pub use fetcher::{FetchResult, Fetcher};
