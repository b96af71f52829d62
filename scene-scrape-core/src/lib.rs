pub mod input;
pub mod record;

pub use input::{FileEntry, Mode, ScrapeInput};
pub use record::{NamedEntry, SceneRecord, SearchStub};
