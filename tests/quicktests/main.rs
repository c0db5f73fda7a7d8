//! Property tests of the public `Tree` API over random payloads.

mod tree;
