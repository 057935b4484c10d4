//! Discriminator search across guild member lists

mod coordinator;
mod filter;

pub use coordinator::{EnumerationReport, EnumerationState, MemberEnumeration};
pub use filter::DiscriminatorFilter;
