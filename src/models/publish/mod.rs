pub mod pipeline;
pub mod resolver;

pub use pipeline::{PublicDocument, PublishOutcome, latest_snapshot_by_slug, publish, slugify};
pub use resolver::{ResolvedBlock, resolve_blocks};
