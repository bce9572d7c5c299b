pub mod profile;

pub use profile::{FormField, ProfileForm, ProfilePatch, UserProfile};
