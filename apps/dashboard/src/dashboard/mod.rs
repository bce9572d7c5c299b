//! Dashboard controller. Loads the profile once, applies edits, saves the
//! resume link or uploads a resume file, and signs the user out.
//!
//! Every write follows the same shape: mark the operation pending, call the
//! remote service, merge the written fields into the cached profile, then
//! show a success state that clears itself after a fixed delay. Nothing is
//! re-fetched after a write.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::errors::DashboardError;
use crate::models::profile::merge_into_cache;
use crate::models::{FormField, ProfileForm, ProfilePatch};
use crate::session::SessionProvider;
use crate::store::ProfileStore;
use crate::upload::{validate_selection, ResumeUploader, SelectedFile};

pub mod state;
pub mod summary;

pub use state::{OpState, Route, UploadState, ViewState};
pub use summary::ProfileSummary;

pub const PROFILE_SUCCESS_DISMISS: Duration = Duration::from_secs(2);
pub const RESUME_SUCCESS_DISMISS: Duration = Duration::from_secs(3);
pub const RESUME_ALERT_DISMISS: Duration = Duration::from_secs(5);

pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile. Please try again.";
pub const INVALID_RESUME_URL: &str = "Please enter a valid URL (include http:// or https://)";
pub const RESUME_LINK_FAILED: &str = "Failed to update resume link. Please try again.";
pub const RESUME_UPLOAD_FAILED: &str = "Failed to upload resume. Please try again.";

/// Result of a user-triggered operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Preconditions not met (no user, empty input, or already in flight).
    Skipped,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct DashboardSettings {
    /// Block "start interview" until a resume is on file.
    pub require_resume_for_interview: bool,
}

/// Accepts any absolute URL.
pub fn validate_resume_url(link: &str) -> Result<url::Url, DashboardError> {
    url::Url::parse(link).map_err(|_| DashboardError::validation(INVALID_RESUME_URL))
}

#[derive(Clone)]
pub struct Dashboard {
    session: Arc<dyn SessionProvider>,
    store: Arc<dyn ProfileStore>,
    uploader: Arc<dyn ResumeUploader>,
    settings: DashboardSettings,
    state: Arc<Mutex<ViewState>>,
}

impl Dashboard {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        store: Arc<dyn ProfileStore>,
        uploader: Arc<dyn ResumeUploader>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            session,
            store,
            uploader,
            settings,
            state: Arc::new(Mutex::new(ViewState::default())),
        }
    }

    /// Snapshot of the current view state.
    pub async fn view(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    pub async fn summary(&self) -> ProfileSummary {
        ProfileSummary::from_view(&*self.state.lock().await)
    }

    /// Loads the profile for the signed-in user. Without a user nothing is
    /// fetched and `loading` stays set.
    pub async fn mount(&self) {
        let Some(user) = self.session.current_user().await else {
            debug!("No signed-in user; profile load skipped");
            return;
        };
        self.state.lock().await.user = Some(user.clone());

        let result = self.store.get(&user.uid).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(Some(profile)) => {
                info!("Loaded profile for {}", user.uid);
                state.form = ProfileForm::from_profile(&profile);
                state.resume_link = profile.resume_url.clone().unwrap_or_default();
                state.profile = Some(profile);
            }
            // TODO: surface a "profile missing" banner once sign-up guarantees the document.
            Ok(None) => info!("No user details found for {}", user.uid),
            Err(e) => error!("Error fetching user details for {}: {e}", user.uid),
        }
        state.loading = false;
    }

    pub async fn toggle_menu(&self) {
        let mut state = self.state.lock().await;
        state.menu_open = !state.menu_open;
        state.editing_profile = false;
    }

    pub async fn toggle_edit_profile(&self) {
        let mut state = self.state.lock().await;
        state.editing_profile = !state.editing_profile;
    }

    pub async fn cancel_edit(&self) {
        self.state.lock().await.editing_profile = false;
    }

    pub async fn set_form_field(&self, field: FormField, value: impl Into<String>) {
        self.state.lock().await.form.set(field, value);
    }

    pub async fn set_resume_link(&self, value: impl Into<String>) {
        self.state.lock().await.resume_link = value.into();
    }

    /// Opens the edit form, applies `edits` over the loaded profile and
    /// saves. Fields not named in `edits` are written back unchanged, which
    /// needs the stored profile to be loaded first.
    pub async fn edit_profile(
        &self,
        edits: &[(FormField, &str)],
    ) -> Result<Submission, DashboardError> {
        if self.session.current_user().await.is_none() {
            return Err(DashboardError::NotSignedIn);
        }
        {
            let mut state = self.state.lock().await;
            if state.profile.is_none() {
                warn!("Edit refused: no profile loaded");
                return Err(DashboardError::ProfileNotLoaded);
            }
            state.editing_profile = true;
            for (field, value) in edits {
                debug!("Editing {}", field.field_name());
                state.form.set(*field, *value);
            }
        }
        Ok(self.submit_profile().await)
    }

    /// Saves the edit form. On success the form closes itself after
    /// [`PROFILE_SUCCESS_DISMISS`].
    pub async fn submit_profile(&self) -> Submission {
        let Some(user) = self.session.current_user().await else {
            return Submission::Skipped;
        };

        let patch = {
            let mut state = self.state.lock().await;
            if !state.can_save_profile() {
                return Submission::Skipped;
            }
            state.profile_update = OpState::Pending;
            state.form.to_patch()
        };

        let result = self.store.update(&user.uid, &patch).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                state.profile = Some(merge_into_cache(state.profile.take(), &patch));
                state.profile_update = OpState::Succeeded;
                drop(state);
                info!("Profile updated for {}", user.uid);
                self.schedule(PROFILE_SUCCESS_DISMISS, |state| {
                    if state.profile_update.is_succeeded() {
                        state.profile_update = OpState::Idle;
                        state.editing_profile = false;
                    }
                });
                Submission::Succeeded
            }
            Err(e) => {
                error!("Profile update error: {e}");
                state.profile_update = OpState::Failed(PROFILE_UPDATE_FAILED.to_string());
                Submission::Failed(PROFILE_UPDATE_FAILED.to_string())
            }
        }
    }

    /// Saves the manually entered resume link after checking it is a URL.
    pub async fn submit_resume_link(&self) -> Submission {
        let Some(user) = self.session.current_user().await else {
            return Submission::Skipped;
        };

        let link = {
            let mut state = self.state.lock().await;
            if !state.can_submit_resume_link() {
                return Submission::Skipped;
            }
            state.resume_link_update = OpState::Pending;
            if state.resume_write_race() {
                warn!("Resume link saved while an upload is in flight; last write wins");
            }
            state.resume_link.clone()
        };

        let result = match validate_resume_url(&link) {
            Ok(_) => {
                let patch = ProfilePatch::resume_link(link);
                self.store.update(&user.uid, &patch).await.map(|()| patch)
            }
            Err(e) => Err(e),
        };

        self.finish_resume_write(
            result,
            RESUME_LINK_FAILED,
            |state, outcome| match outcome {
                Ok(()) => state.resume_link_update = OpState::Succeeded,
                Err(msg) => state.resume_link_update = OpState::Failed(msg),
            },
            |state| {
                if state.resume_link_update.is_succeeded() {
                    state.resume_link_update = OpState::Idle;
                }
            },
        )
        .await
    }

    /// Picks a resume file. Invalid files are rejected and dropped.
    pub async fn select_file(&self, file: SelectedFile) -> Result<(), DashboardError> {
        let mut state = self.state.lock().await;
        if let Err(e) = validate_selection(&file) {
            debug!("Rejected {}: {e}", file.name);
            state.selected_file = None;
            state.selection_error = Some(e.to_string());
            if !state.upload.is_uploading() {
                state.upload = UploadState::Failed(e.to_string());
            }
            return Err(e);
        }
        state.selected_file = Some(file);
        state.selection_error = None;
        if !state.upload.is_uploading() {
            state.upload = UploadState::FileSelected;
        }
        Ok(())
    }

    pub async fn clear_selected_file(&self) {
        let mut state = self.state.lock().await;
        state.selected_file = None;
        state.selection_error = None;
        if state.upload == UploadState::FileSelected {
            state.upload = UploadState::Idle;
        }
    }

    /// Uploads the selected file, then records its hosted URL and name on the
    /// profile. On failure the file stays selected so the user can retry.
    pub async fn upload_resume(&self) -> Submission {
        let Some(user) = self.session.current_user().await else {
            return Submission::Skipped;
        };

        let file = {
            let mut state = self.state.lock().await;
            if !state.can_upload() {
                return Submission::Skipped;
            }
            let Some(file) = state.selected_file.clone() else {
                return Submission::Skipped;
            };
            state.upload = UploadState::Uploading;
            if state.resume_write_race() {
                warn!("Resume upload started while a link save is in flight; last write wins");
            }
            file
        };

        let result = async {
            let file_url = self.uploader.upload(&file, &user.uid).await?;
            let patch = ProfilePatch::uploaded_resume(file_url, file.name.clone());
            self.store.update(&user.uid, &patch).await?;
            Ok::<_, DashboardError>(patch)
        }
        .await;

        self.finish_resume_write(
            result,
            RESUME_UPLOAD_FAILED,
            |state, outcome| match outcome {
                Ok(()) => {
                    state.selected_file = None;
                    state.file_input_resets += 1;
                    state.upload = UploadState::Succeeded;
                }
                Err(msg) => state.upload = UploadState::Failed(msg),
            },
            |state| {
                if state.upload == UploadState::Succeeded {
                    state.upload = UploadState::Idle;
                }
            },
        )
        .await
    }

    pub async fn logout(&self) -> Submission {
        match self.session.logout().await {
            Ok(()) => {
                self.state.lock().await.route = Route::Login;
                Submission::Succeeded
            }
            // TODO: show a sign-out error instead of leaving the user on the dashboard.
            Err(e) => {
                error!("Failed to log out: {e}");
                Submission::Failed(e.to_string())
            }
        }
    }

    /// Navigates to the interview unless a resume is required and missing,
    /// in which case the resume alert is shown for [`RESUME_ALERT_DISMISS`].
    pub async fn start_interview(&self) -> Route {
        let mut state = self.state.lock().await;
        let has_resume = state.profile.as_ref().is_some_and(|p| p.has_resume());
        if self.settings.require_resume_for_interview && !has_resume {
            state.show_resume_alert = true;
            drop(state);
            self.schedule(RESUME_ALERT_DISMISS, |state| state.show_resume_alert = false);
            return Route::Dashboard;
        }
        state.route = Route::Interview;
        Route::Interview
    }

    /// Shared tail of both resume writes: merge on success, record the
    /// outcome, and arm the success dismiss timer.
    async fn finish_resume_write<R, D>(
        &self,
        result: Result<ProfilePatch, DashboardError>,
        fallback: &str,
        record: R,
        dismiss: D,
    ) -> Submission
    where
        R: FnOnce(&mut ViewState, Result<(), String>),
        D: FnOnce(&mut ViewState) + Send + 'static,
    {
        let mut state = self.state.lock().await;
        match result {
            Ok(patch) => {
                state.profile = Some(merge_into_cache(state.profile.take(), &patch));
                record(&mut *state, Ok(()));
                drop(state);
                self.schedule(RESUME_SUCCESS_DISMISS, dismiss);
                Submission::Succeeded
            }
            Err(e) => {
                if e.is_validation() {
                    debug!("Resume write rejected: {e}");
                } else {
                    error!("Resume write error: {e}");
                }
                let message = e.user_message(fallback);
                record(&mut *state, Err(message.clone()));
                Submission::Failed(message)
            }
        }
    }

    fn schedule<F>(&self, delay: Duration, apply: F)
    where
        F: FnOnce(&mut ViewState) + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.lock().await;
            apply(&mut *state);
        });
    }
}
