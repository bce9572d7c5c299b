use crate::models::{ProfileForm, UserProfile};
use crate::session::CurrentUser;
use crate::upload::SelectedFile;

/// Lifecycle of one remote write (profile save, resume link save).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OpState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

impl OpState {
    pub fn is_pending(&self) -> bool {
        matches!(self, OpState::Pending)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, OpState::Succeeded)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OpState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Resume file upload: `Idle → FileSelected → Uploading → Succeeded | Failed`.
/// A rejected selection also lands in `Failed`, with no file held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    FileSelected,
    Uploading,
    Succeeded,
    Failed(String),
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Dashboard,
    Login,
    Interview,
}

/// Everything the dashboard view renders. The profile is a cached copy of
/// the remote document, patched locally after each successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub user: Option<CurrentUser>,
    pub loading: bool,
    pub profile: Option<UserProfile>,
    pub form: ProfileForm,
    pub menu_open: bool,
    pub editing_profile: bool,
    pub profile_update: OpState,
    pub resume_link: String,
    pub resume_link_update: OpState,
    pub selected_file: Option<SelectedFile>,
    /// Why the last picked file was rejected. Kept apart from `upload` so a
    /// rejection during an upload is still shown.
    pub selection_error: Option<String>,
    pub upload: UploadState,
    /// Bumped whenever the file input must be reset.
    pub file_input_resets: u64,
    pub show_resume_alert: bool,
    pub route: Route,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            profile: None,
            form: ProfileForm::default(),
            menu_open: false,
            editing_profile: false,
            profile_update: OpState::Idle,
            resume_link: String::new(),
            resume_link_update: OpState::Idle,
            selected_file: None,
            selection_error: None,
            upload: UploadState::Idle,
            file_input_resets: 0,
            show_resume_alert: false,
            route: Route::Dashboard,
        }
    }
}

impl ViewState {
    /// True while a link save and a file upload are both in flight. Both
    /// write `resumeURL`; whichever lands last wins.
    pub fn resume_write_race(&self) -> bool {
        self.resume_link_update.is_pending() && self.upload.is_uploading()
    }

    pub fn can_save_profile(&self) -> bool {
        !self.profile_update.is_pending()
    }

    pub fn can_submit_resume_link(&self) -> bool {
        !self.resume_link.is_empty() && !self.resume_link_update.is_pending()
    }

    pub fn can_upload(&self) -> bool {
        self.selected_file.is_some() && !self.upload.is_uploading()
    }
}
