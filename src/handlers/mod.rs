pub mod auth_handlers;
pub mod block_handlers;
pub mod content_handlers;
pub mod proposal_handlers;
pub mod public_handlers;
pub mod publish_handlers;
