// Copyright (c) the dctpress Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)+) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! info {
    ($($arg:tt)+) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)+) => {};
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use {debug, info, trace};
