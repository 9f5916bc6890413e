//! Package data model shared by stores, the projector and the adapter.

mod identity;
mod record;
mod source;

pub use identity::PackageIdentity;
pub use record::{NativePackageRecord, PackageDependency};
pub use source::PackageSource;
