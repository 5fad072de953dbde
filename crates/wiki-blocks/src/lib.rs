//! Placeholder protection for fenced blocks the markup engine must not touch.
//!
//! Two block families are swapped for single-line tokens before conversion
//! and put back afterwards:
//!
//! - diagrams (```` ```mermaid ````) come back as `<pre class="mermaid">` for
//!   the client-side renderer
//! - directional blocks (```` ```rtl ````, ```` ```ltr ````) are converted on
//!   their own and wrapped in `<div class="direction-block" dir="...">`
//!
//! Restore diagrams before directions: directional content is converted
//! HTML by the time it is inserted and must not be scanned for diagram tokens.

mod family;
mod fence;
mod stash;

pub use family::{BlockFamily, TextDirection};
pub use fence::FenceTracker;
pub use stash::{BlockStash, DirectionBlock, Restoration};

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(BlockStash: Send, Sync);
    static_assertions::assert_impl_all!(Restoration: Send, Sync);
}
