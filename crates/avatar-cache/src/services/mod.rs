pub mod avatar_cache;
pub mod content_resolver;
pub mod request_resolver;
pub mod signals;
pub mod snapshot;
pub mod traits;

pub use avatar_cache::{
    AvatarCacheStats, AvatarCollaborators, AvatarService, SecondaryAvatarService,
};
pub use content_resolver::ContentResolver;
pub use request_resolver::resolve_request;
pub use signals::{StateChange, create_state_change_channel};
pub use snapshot::StateSnapshot;
pub use traits::{BitmapStore, KeyValueStore, PolicySource, ProfileSource};
