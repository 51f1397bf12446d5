pub mod bitmap;
pub mod content;
pub mod gradient;
pub mod identity;
pub mod names;
pub mod request;
pub mod subject;

pub use bitmap::{AvatarImage, decode_png, encode_png};
pub use content::{ContentDescriptor, ContentKind, IconGlyph, TemplateImage};
pub use gradient::{AvatarGradient, GradientDirection};
pub use identity::{Address, GroupId, SubjectIdentity, ThemeId};
pub use names::{MAX_INITIALS_LENGTH, NameComponents};
pub use request::{AvatarModel, AvatarModelKind, AvatarRequest, LocalUserDisplayMode, RequestVariant};
pub use subject::{AvatarSubject, DisplayParams, GroupSnapshot, ThreadSnapshot};
