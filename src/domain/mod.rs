//! Domain layer - Entry model and the conversion rules

pub mod attachments;
pub mod content;
pub mod entry;
pub mod merge;
pub mod metadata;
pub mod options;
pub mod placement;
pub mod references;
pub mod report;
pub mod tags;

pub use attachments::{AttachmentMapper, MediaInventory, MediaTarget, ATTACHMENTS_DIR};
pub use content::{ContentTransformer, TransformContext, Transformed};
pub use entry::{Attachment, AttachmentKind, Entry, RawEntry};
pub use merge::{group_by_day, join_bodies, DayGroup};
pub use metadata::{MetadataFormatter, OutputDocument};
pub use options::ConvertOptions;
pub use placement::{place, DayDocument, Disposition, PlacementPolicy};
pub use references::ResolverTable;
pub use report::{Warning, WarningKind};
