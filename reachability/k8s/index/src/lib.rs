//! NetworkPolicy reachability index
//!
//! The index answers whether a flow between two entities is admitted by a set of NetworkPolicy
//! resources. Policies are grouped by namespace, since a policy only governs workloads in its own
//! namespace:
//!
//! - A policy *governs* an entity in a direction when it lives in the entity's namespace, declares
//!   the direction, and its pod selector matches the entity's labels.
//! - An entity that no policy governs in a direction is unrestricted in that direction
//!   (default-allow).
//! - Otherwise, traffic is admitted when any rule of any governing policy admits it.
//!
//! ```text
//! [ source ] --egress--> [ destination ]
//!     ^                        ^
//!     `-- source's policies    `-- destination's policies (ingress)
//! ```
//!
//! A flow is allowed only when the source's egress and the destination's ingress both admit it.
//! The index is immutable once built, so lookups may be shared freely across threads.

#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod index;
mod namespace;
mod policy;


pub use self::{index::Index, policy::UNNAMED_POLICY};
