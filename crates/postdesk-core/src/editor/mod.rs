//! The post editor - resolves create/edit mode from the route, drives the
//! form and image preview, and submits the result.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::config::EditorConfig;
use crate::domain::{ImageFile, ImagePreview, ImageValue, Post, PostId, PostPayload};
use crate::error::{ApiError, EditorError};
use crate::form::{FieldStatus, PostForm, PostFormValue, sniff};
use crate::ports::{Navigator, POST_ID_PARAM, ParamMap, PostsApi, Route};
use crate::preview::data_url;

#[cfg(test)]
mod tests;

/// Where the editor navigates after a successful save.
pub const ROOT_PATH: &str = "/";

const SAVED_EVENT_BUFFER: usize = 16;

/// Whether the editor creates a new post or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(PostId),
}

impl Mode {
    pub fn post_id(&self) -> Option<&PostId> {
        match self {
            Mode::Create => None,
            Mode::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Created,
    Updated,
}

/// Event published after every confirmed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPost {
    pub post: Post,
    pub kind: SaveKind,
    pub saved_at: DateTime<Utc>,
}

/// Why a submission did not reach the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The form has validation errors (summary attached).
    Invalid(String),
    /// Edit mode, but the post to edit has not been loaded.
    NotReady,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(PostId),
    Skipped(SkipReason),
}

/// Raises the loading flag for its lifetime.
struct Loading<'a>(&'a watch::Sender<bool>);

impl<'a> Loading<'a> {
    fn raise(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

async fn cancellable<T, F>(token: &CancellationToken, call: F) -> Result<T, EditorError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(EditorError::Cancelled),
        result = call => result.map_err(EditorError::from),
    }
}

/// Create-or-edit form for a single post.
pub struct PostEditor {
    api: Arc<dyn PostsApi>,
    route: Arc<dyn Route>,
    navigator: Arc<dyn Navigator>,
    mode: Mode,
    post: Option<Post>,
    form: PostForm,
    image_preview: Option<ImagePreview>,
    loading: watch::Sender<bool>,
    last_error: Option<EditorError>,
    saved: broadcast::Sender<SavedPost>,
    params: Option<BoxStream<'static, ParamMap>>,
    cancel: CancellationToken,
}

impl PostEditor {
    pub fn new(
        api: Arc<dyn PostsApi>,
        route: Arc<dyn Route>,
        navigator: Arc<dyn Navigator>,
        config: EditorConfig,
    ) -> Self {
        Self {
            api,
            route,
            navigator,
            mode: Mode::Create,
            post: None,
            form: PostForm::new(&config),
            image_preview: None,
            loading: watch::Sender::new(false),
            last_error: None,
            saved: broadcast::channel(SAVED_EVENT_BUFFER).0,
            params: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Resolve the mode from the first route emission, loading the post in
    /// edit mode.
    pub async fn init(&mut self) -> Result<(), EditorError> {
        let mut params = self.route.param_map();
        let first = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(EditorError::Cancelled),
            first = params.next() => first,
        };
        self.params = Some(params);

        let Some(first) = first else {
            let err = EditorError::Route("route emitted no parameters".to_string());
            self.last_error = Some(err.clone());
            return Err(err);
        };

        self.resolve_mode(&first).await
    }

    /// Wait for the next route change and re-resolve the mode.
    ///
    /// Returns `Ok(false)` once the route stream has ended.
    pub async fn next_route_change(&mut self) -> Result<bool, EditorError> {
        let Some(params) = self.params.as_mut() else {
            return Ok(false);
        };

        let next = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(EditorError::Cancelled),
            next = params.next() => next,
        };

        match next {
            Some(next) => self.resolve_mode(&next).await.map(|()| true),
            None => {
                self.params = None;
                Ok(false)
            }
        }
    }

    /// Switch to create or edit mode depending on the `postId` parameter.
    pub async fn resolve_mode(&mut self, params: &ParamMap) -> Result<(), EditorError> {
        match params.get(POST_ID_PARAM) {
            Some(id) => {
                let id = PostId::new(id);
                tracing::info!(post_id = %id, "Editing existing post");

                self.mode = Mode::Edit(id.clone());
                self.form.image.set_required(false);
                self.load_post(id).await
            }
            None => {
                tracing::info!("Creating new post");

                self.mode = Mode::Create;
                self.post = Some(Post::empty());
                self.image_preview = None;
                self.last_error = None;
                self.form.reset();
                self.form.image.set_required(true);
                Ok(())
            }
        }
    }

    /// Retry loading the post being edited. No-op in create mode.
    pub async fn reload(&mut self) -> Result<(), EditorError> {
        match self.mode.clone() {
            Mode::Edit(id) => self.load_post(id).await,
            Mode::Create => Ok(()),
        }
    }

    async fn load_post(&mut self, id: PostId) -> Result<(), EditorError> {
        // Nothing picked or typed for another post may reach this one.
        self.post = None;
        self.last_error = None;
        self.image_preview = None;
        self.form.reset();
        self.form.image.set_required(false);

        let result = {
            let _loading = Loading::raise(&self.loading);
            cancellable(&self.cancel, self.api.fetch_post(&id)).await
        };

        match result {
            Ok(post) => {
                tracing::debug!(post_id = %id, image_path = %post.image_path, "Post loaded");

                self.image_preview = Some(ImagePreview::Stored(post.image_path.clone()));
                self.form.patch(&post);
                self.post = Some(post);
                Ok(())
            }
            Err(err) => Err(self.record_failure("load post", err)),
        }
    }

    /// Store a user-selected file, validate it and refresh the preview.
    ///
    /// A file with a rejected MIME type clears the preview.
    pub fn on_image_picked(&mut self, file: ImageFile) -> FieldStatus {
        let name = file.name.clone();
        let status = self.form.set_image(ImageValue::File(file));

        self.image_preview = match (status, self.form.image.value()) {
            (FieldStatus::Valid, Some(ImageValue::File(file))) => {
                sniff(&file.bytes).map(|mime| ImagePreview::DataUrl(data_url(mime, &file.bytes)))
            }
            _ => None,
        };

        if self.image_preview.is_some() {
            tracing::debug!(file = %name, "Image accepted");
        } else {
            tracing::warn!(file = %name, errors = %self.form.error_summary(), "Image rejected");
        }

        status
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title.set(title);
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.form.content.set(content);
    }

    /// Validate the form and send it to the API.
    ///
    /// An invalid form is not submitted. On success the form is reset, a
    /// [`SavedPost`] event is published and the editor navigates to `/`.
    /// Failures are recorded in [`last_error`](Self::last_error) and returned.
    pub async fn save(&mut self) -> Result<SubmitOutcome, EditorError> {
        if self.form.is_invalid() {
            let summary = self.form.error_summary();
            tracing::debug!(errors = %summary, "Form invalid, not submitting");
            return Ok(SubmitOutcome::Skipped(SkipReason::Invalid(summary)));
        }

        if matches!(self.mode, Mode::Edit(_)) && self.post.is_none() {
            tracing::warn!("Post not loaded, not submitting");
            return Ok(SubmitOutcome::Skipped(SkipReason::NotReady));
        }

        let payload = self.build_payload(self.form.value())?;
        let mode = self.mode.clone();
        self.last_error = None;

        tracing::info!(
            mode = ?mode,
            title = %payload.title,
            new_image = payload.image.is_file(),
            "Submitting post"
        );

        let result = {
            let _loading = Loading::raise(&self.loading);
            match &mode {
                Mode::Create => cancellable(&self.cancel, self.api.create_post(&payload)).await,
                Mode::Edit(id) => {
                    let updated = cancellable(&self.cancel, self.api.update_post(&payload)).await;
                    updated.map(|()| self.updated_post(payload, id.clone()))
                }
            }
        };

        let saved = result.and_then(|post| match post.id.clone() {
            Some(id) => Ok((id, post)),
            None => Err(EditorError::Api(ApiError::Decode(
                "saved post has no id".to_string(),
            ))),
        });

        match saved {
            Ok((id, post)) => {
                self.finish_save(&mode, post).await;
                Ok(SubmitOutcome::Saved(id))
            }
            Err(err) => Err(self.record_failure("save post", err)),
        }
    }

    // An update only acknowledges; the saved post is the payload plus what the
    // editor already knew about it.
    fn updated_post(&self, payload: PostPayload, id: PostId) -> Post {
        let mut post = payload.into_post(id);
        if let Some(previous) = &self.post {
            post.creator = previous.creator.clone();
        }
        post
    }

    fn build_payload(&self, value: PostFormValue) -> Result<PostPayload, EditorError> {
        let image = match (&self.mode, value.image, &self.image_preview) {
            (_, Some(image), _) => image,
            (Mode::Edit(_), None, Some(ImagePreview::Stored(path))) => {
                ImageValue::Stored(path.clone())
            }
            _ => return Err(EditorError::Validation("no image selected".to_string())),
        };

        Ok(PostPayload {
            id: self.mode.post_id().cloned(),
            title: value.title,
            content: value.content,
            image,
        })
    }

    async fn finish_save(&mut self, mode: &Mode, post: Post) {
        let kind = match mode {
            Mode::Create => SaveKind::Created,
            Mode::Edit(_) => SaveKind::Updated,
        };

        tracing::info!(
            post_id = ?post.id,
            kind = ?kind,
            image_path = %post.image_path,
            "Post saved"
        );

        self.post = None;
        self.form.reset();
        self.image_preview = None;

        // No subscribers is fine.
        let _ = self.saved.send(SavedPost {
            post,
            kind,
            saved_at: Utc::now(),
        });

        self.navigator.navigate_to(ROOT_PATH).await;
    }

    fn record_failure(&mut self, action: &str, err: EditorError) -> EditorError {
        match &err {
            EditorError::Cancelled => tracing::info!(action, "Operation cancelled"),
            _ => tracing::error!(action, error = %err, "Editor operation failed"),
        }
        self.last_error = Some(err.clone());
        err
    }

    /// Cancel any in-flight operation. The editor should not be used after.
    pub fn destroy(&mut self) {
        tracing::debug!("Editor destroyed");
        self.cancel.cancel();
        self.params = None;
    }

    /// Token tied to the editor's lifetime; cancelling it aborts the current
    /// operation.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn subscribe_saved(&self) -> broadcast::Receiver<SavedPost> {
        self.saved.subscribe()
    }

    pub fn loading_changes(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PostForm {
        &mut self.form
    }

    pub fn image_preview(&self) -> Option<&ImagePreview> {
        self.image_preview.as_ref()
    }

    pub fn last_error(&self) -> Option<&EditorError> {
        self.last_error.as_ref()
    }
}

impl Drop for PostEditor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
